//! Integrals over the nodes of a microscale mesh.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::microscale::MicroscaleGeometry;
use crate::params::FieldRegistry;
use crate::term::{AuxContext, AuxKernel};
use crate::types::FieldId;

/// Shared by `MicroscaleIntegralAverage` and `MicroscaleIntegralTotal`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MicroscaleIntegralConfig {
    pub variable: String,
    /// Node fields ordered from the centre (node 0) outward
    pub micro_vars: Vec<String>,
    pub micro_length: f64,
    #[serde(default)]
    pub coord_id: u32,
}

/// Trapezoid integral of the node fields, optionally normalised by the
/// integral of the geometry weight.
#[derive(Clone, Debug)]
pub struct MicroscaleIntegral {
    name: &'static str,
    variable: FieldId,
    nodes: Vec<FieldId>,
    weights: Vec<f64>,
    normalise: bool,
}

impl MicroscaleIntegral {
    fn build(
        name: &'static str,
        config: MicroscaleIntegralConfig,
        registry: &FieldRegistry,
        normalise: bool,
    ) -> Result<Self> {
        let coordinates = MicroscaleGeometry::coordinates_from_id(name, config.coord_id)?;
        let geometry =
            MicroscaleGeometry::new(name, config.micro_vars.len(), config.micro_length, coordinates)?;
        let nodes = config
            .micro_vars
            .iter()
            .map(|v| registry.resolve_field(name, v))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self {
            name,
            variable: registry.resolve_field(name, &config.variable)?,
            nodes,
            weights: geometry.integration_weights(),
            normalise,
        })
    }

    /// Σ wₗ·uₗ / Σ wₗ
    pub fn average(config: MicroscaleIntegralConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build("MicroscaleIntegralAverage", config, registry, true)
    }

    /// Σ wₗ·uₗ
    pub fn total(config: MicroscaleIntegralConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build("MicroscaleIntegralTotal", config, registry, false)
    }
}

impl AuxKernel for MicroscaleIntegral {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_value(&self, ctx: &AuxContext) -> f64 {
        let total: f64 = self
            .nodes
            .iter()
            .zip(&self.weights)
            .map(|(&id, w)| w * ctx.fields[id].value)
            .sum();
        if self.normalise {
            total / self.weights.iter().sum::<f64>()
        } else {
            total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::term::FieldValue;

    const TOL: f64 = 1e-12;

    fn config(coord_id: u32) -> (FieldRegistry, MicroscaleIntegralConfig) {
        let reg = FieldRegistry::with_fields(["avg", "q0", "q1", "q2", "q3", "q4"]);
        let cfg = MicroscaleIntegralConfig {
            variable: "avg".into(),
            micro_vars: ["q0", "q1", "q2", "q3", "q4"].map(String::from).to_vec(),
            micro_length: 2.0,
            coord_id,
        };
        (reg, cfg)
    }

    #[test]
    fn test_uniform_field_average_is_value() {
        let (reg, cfg) = config(2);
        let aux = MicroscaleIntegral::average(cfg, &reg).unwrap();
        let mut f = [FieldValue::new(3.5); 6];
        f[0] = FieldValue::new(0.0);
        assert!((aux.compute_value(&AuxContext::new(&f)) - 3.5).abs() < TOL);
    }

    #[test]
    fn test_planar_total_is_trapezoid() {
        let (reg, cfg) = config(0);
        let aux = MicroscaleIntegral::total(cfg, &reg).unwrap();
        // u = r on [0, 2]: exact integral 2, trapezoid exact for linear data
        let f = [0.0, 0.0, 0.5, 1.0, 1.5, 2.0].map(FieldValue::new);
        assert!((aux.compute_value(&AuxContext::new(&f)) - 2.0).abs() < TOL);
    }

    #[test]
    fn test_single_node_rejected() {
        let reg = FieldRegistry::with_fields(["avg", "q0"]);
        let err = MicroscaleIntegral::total(
            MicroscaleIntegralConfig {
                variable: "avg".into(),
                micro_vars: vec!["q0".into()],
                micro_length: 1.0,
                coord_id: 0,
            },
            &reg,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::OutOfRange { parameter: "num_nodes", .. }));
    }
}
