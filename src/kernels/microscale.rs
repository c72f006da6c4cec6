//! Microscale diffusion kernels on a 1-D fictitious mesh.
//!
//! Each micro node is a separate field on the macro mesh. The kernel for
//! node l is the finite-volume balance
//!
//! R = ψ · [F⁺·(u_l − u_{l+1}) + F⁻·(u_l − u_{l−1})]
//!
//! with F± from [`MicroscaleGeometry`]. The inner boundary (node 0) drops
//! the lower flux; the outer boundary (node N−1) drops the upper flux and
//! exchanges with a macro field through a film:
//!
//! R_film = ψ · g_{N−1} · km/Δr · (u_{N−1} − C_macro)

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::microscale::MicroscaleGeometry;
use crate::params::{self, collect_coupled, Coupled, CoupledInput, FieldRegistry};
use crate::term::{Kernel, QpContext};
use crate::types::{FieldId, MicroNodeIndex};

use super::time_derivative::ProductTimeDerivative;

// =============================================================================
// Configuration
// =============================================================================

/// `MicroscaleDiffusion` (interior node, constant diffusivity)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MicroscaleDiffusionConfig {
    pub variable: String,
    pub node_id: usize,
    pub num_nodes: usize,
    pub micro_length: f64,
    #[serde(default)]
    pub coord_id: u32,
    #[serde(default = "params::one_f64")]
    pub diffusivity: f64,
    pub upper_neighbor: String,
    pub lower_neighbor: String,
}

/// `MicroscaleDiffusionInnerBC` (node 0, constant diffusivity)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MicroscaleDiffusionInnerBCConfig {
    pub variable: String,
    pub num_nodes: usize,
    pub micro_length: f64,
    #[serde(default)]
    pub coord_id: u32,
    #[serde(default = "params::one_f64")]
    pub diffusivity: f64,
    pub upper_neighbor: String,
}

/// `MicroscaleDiffusionOuterBC` (node N−1, constant diffusivity)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MicroscaleDiffusionOuterBCConfig {
    pub variable: String,
    pub num_nodes: usize,
    pub micro_length: f64,
    #[serde(default)]
    pub coord_id: u32,
    #[serde(default = "params::one_f64")]
    pub diffusivity: f64,
    pub lower_neighbor: String,
    /// Macro-scale concentration at the particle surface
    pub macro_variable: String,
    /// Film mass-transfer coefficient km
    #[serde(default = "params::one")]
    pub transfer_rate: CoupledInput,
}

/// `MicroscaleVariableDiffusion`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MicroscaleVariableDiffusionConfig {
    pub variable: String,
    pub node_id: usize,
    pub num_nodes: usize,
    pub micro_length: f64,
    #[serde(default)]
    pub coord_id: u32,
    pub upper_neighbor: String,
    pub lower_neighbor: String,
    pub current_diff: CoupledInput,
    pub upper_diff: CoupledInput,
    pub lower_diff: CoupledInput,
}

/// `MicroscaleVariableDiffusionInnerBC`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MicroscaleVariableDiffusionInnerBCConfig {
    pub variable: String,
    pub num_nodes: usize,
    pub micro_length: f64,
    #[serde(default)]
    pub coord_id: u32,
    pub upper_neighbor: String,
    pub current_diff: CoupledInput,
    pub upper_diff: CoupledInput,
}

/// `MicroscaleVariableDiffusionOuterBC`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MicroscaleVariableDiffusionOuterBCConfig {
    pub variable: String,
    pub num_nodes: usize,
    pub micro_length: f64,
    #[serde(default)]
    pub coord_id: u32,
    pub lower_neighbor: String,
    pub current_diff: CoupledInput,
    pub lower_diff: CoupledInput,
    pub macro_variable: String,
    #[serde(default = "params::one")]
    pub transfer_rate: CoupledInput,
}

/// `MicroscaleCoefTimeDerivative`: R = c · g_l · u̇ · ψ
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MicroscaleCoefTimeDerivativeConfig {
    pub variable: String,
    pub node_id: usize,
    pub num_nodes: usize,
    pub micro_length: f64,
    #[serde(default)]
    pub coord_id: u32,
    #[serde(default = "params::one_f64")]
    pub coefficient: f64,
}

fn geometry(
    object: &'static str,
    num_nodes: usize,
    micro_length: f64,
    coord_id: u32,
) -> Result<MicroscaleGeometry> {
    let coordinates = MicroscaleGeometry::coordinates_from_id(object, coord_id)?;
    MicroscaleGeometry::new(object, num_nodes, micro_length, coordinates)
}

// =============================================================================
// Kernel
// =============================================================================

/// Adjacent micro node and its diffusivity.
#[derive(Clone, Copy, Debug)]
struct Neighbor {
    field: FieldId,
    diffusivity: Coupled,
}

/// Film exchange between the outer node and a macro field.
#[derive(Clone, Copy, Debug)]
struct Film {
    coefficient: Coupled,
    macro_field: FieldId,
}

/// Finite-volume diffusion balance at one micro node.
#[derive(Clone, Debug)]
pub struct MicroscaleDiffusion {
    name: &'static str,
    variable: FieldId,
    geometry: MicroscaleGeometry,
    node: MicroNodeIndex,
    diffusivity: Coupled,
    upper: Option<Neighbor>,
    lower: Option<Neighbor>,
    film: Option<Film>,
}

impl MicroscaleDiffusion {
    pub fn interior(config: MicroscaleDiffusionConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "MicroscaleDiffusion";
        let d = Coupled::Constant(config.diffusivity);
        Self::interior_with(
            NAME,
            registry,
            (&config.variable, &config.upper_neighbor, &config.lower_neighbor),
            geometry(NAME, config.num_nodes, config.micro_length, config.coord_id)?,
            config.node_id,
            [d, d, d],
        )
    }

    pub fn variable_interior(
        config: MicroscaleVariableDiffusionConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "MicroscaleVariableDiffusion";
        Self::interior_with(
            NAME,
            registry,
            (&config.variable, &config.upper_neighbor, &config.lower_neighbor),
            geometry(NAME, config.num_nodes, config.micro_length, config.coord_id)?,
            config.node_id,
            [
                registry.resolve(NAME, &config.current_diff)?,
                registry.resolve(NAME, &config.upper_diff)?,
                registry.resolve(NAME, &config.lower_diff)?,
            ],
        )
    }

    pub fn inner(config: MicroscaleDiffusionInnerBCConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "MicroscaleDiffusionInnerBC";
        let d = Coupled::Constant(config.diffusivity);
        Self::inner_with(
            NAME,
            registry,
            (&config.variable, &config.upper_neighbor),
            geometry(NAME, config.num_nodes, config.micro_length, config.coord_id)?,
            [d, d],
        )
    }

    pub fn variable_inner(
        config: MicroscaleVariableDiffusionInnerBCConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "MicroscaleVariableDiffusionInnerBC";
        Self::inner_with(
            NAME,
            registry,
            (&config.variable, &config.upper_neighbor),
            geometry(NAME, config.num_nodes, config.micro_length, config.coord_id)?,
            [
                registry.resolve(NAME, &config.current_diff)?,
                registry.resolve(NAME, &config.upper_diff)?,
            ],
        )
    }

    pub fn outer(config: MicroscaleDiffusionOuterBCConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "MicroscaleDiffusionOuterBC";
        let d = Coupled::Constant(config.diffusivity);
        let film = Film {
            coefficient: registry.resolve(NAME, &config.transfer_rate)?,
            macro_field: registry.resolve_field(NAME, &config.macro_variable)?,
        };
        Self::outer_with(
            NAME,
            registry,
            (&config.variable, &config.lower_neighbor),
            geometry(NAME, config.num_nodes, config.micro_length, config.coord_id)?,
            [d, d],
            film,
        )
    }

    pub fn variable_outer(
        config: MicroscaleVariableDiffusionOuterBCConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "MicroscaleVariableDiffusionOuterBC";
        let film = Film {
            coefficient: registry.resolve(NAME, &config.transfer_rate)?,
            macro_field: registry.resolve_field(NAME, &config.macro_variable)?,
        };
        Self::outer_with(
            NAME,
            registry,
            (&config.variable, &config.lower_neighbor),
            geometry(NAME, config.num_nodes, config.micro_length, config.coord_id)?,
            [
                registry.resolve(NAME, &config.current_diff)?,
                registry.resolve(NAME, &config.lower_diff)?,
            ],
            film,
        )
    }

    fn interior_with(
        name: &'static str,
        registry: &FieldRegistry,
        (variable, upper, lower): (&str, &str, &str),
        geometry: MicroscaleGeometry,
        node_id: usize,
        [d_self, d_upper, d_lower]: [Coupled; 3],
    ) -> Result<Self> {
        let node = geometry.node(name, node_id)?;
        geometry.upper(name, node)?;
        geometry.lower(name, node)?;
        Ok(Self {
            name,
            variable: registry.resolve_field(name, variable)?,
            geometry,
            node,
            diffusivity: d_self,
            upper: Some(Neighbor {
                field: registry.resolve_field(name, upper)?,
                diffusivity: d_upper,
            }),
            lower: Some(Neighbor {
                field: registry.resolve_field(name, lower)?,
                diffusivity: d_lower,
            }),
            film: None,
        })
    }

    fn inner_with(
        name: &'static str,
        registry: &FieldRegistry,
        (variable, upper): (&str, &str),
        geometry: MicroscaleGeometry,
        [d_self, d_upper]: [Coupled; 2],
    ) -> Result<Self> {
        let node = MicroNodeIndex::ZERO;
        geometry.upper(name, node)?;
        Ok(Self {
            name,
            variable: registry.resolve_field(name, variable)?,
            geometry,
            node,
            diffusivity: d_self,
            upper: Some(Neighbor {
                field: registry.resolve_field(name, upper)?,
                diffusivity: d_upper,
            }),
            lower: None,
            film: None,
        })
    }

    fn outer_with(
        name: &'static str,
        registry: &FieldRegistry,
        (variable, lower): (&str, &str),
        geometry: MicroscaleGeometry,
        [d_self, d_lower]: [Coupled; 2],
        film: Film,
    ) -> Result<Self> {
        let node = geometry.node(name, geometry.num_nodes() - 1)?;
        geometry.lower(name, node)?;
        Ok(Self {
            name,
            variable: registry.resolve_field(name, variable)?,
            geometry,
            node,
            diffusivity: d_self,
            upper: None,
            lower: Some(Neighbor {
                field: registry.resolve_field(name, lower)?,
                diffusivity: d_lower,
            }),
            film: Some(film),
        })
    }

    /// Micro node this kernel balances.
    pub fn node(&self) -> MicroNodeIndex {
        self.node
    }

    pub fn geometry(&self) -> &MicroscaleGeometry {
        &self.geometry
    }

    /// Geometry factor of one neighbor flux: the flux coefficient divided
    /// by the mean diffusivity.
    fn flux_factor(&self, upper: bool) -> f64 {
        let weight = if upper {
            self.geometry.upper_weight(self.node)
        } else {
            self.geometry.lower_weight(self.node)
        };
        let dr = self.geometry.dr();
        weight / (dr * dr)
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let u = ctx.fields[self.variable].value;
        let d = self.diffusivity.value(ctx);
        let own = if wrt == self.variable { 1.0 } else { 0.0 };
        let mut total = 0.0;

        for (neighbor, upper) in [(self.upper, true), (self.lower, false)] {
            let Some(n) = neighbor else { continue };
            let v = ctx.fields[n.field].value;
            let factor = self.flux_factor(upper);
            let mean = 0.5 * (d + n.diffusivity.value(ctx));
            let d_mean = 0.5 * (self.diffusivity.indicator(wrt) + n.diffusivity.indicator(wrt));
            let d_diff = own - if wrt == n.field { 1.0 } else { 0.0 };
            total += factor * (d_mean * (u - v) + mean * d_diff);
        }

        if let Some(film) = self.film {
            let c = ctx.fields[film.macro_field].value;
            let k = film.coefficient.value(ctx);
            let g = self.geometry.weight(self.node) / self.geometry.dr();
            let d_diff = own - if wrt == film.macro_field { 1.0 } else { 0.0 };
            total += g * (film.coefficient.indicator(wrt) * (u - c) + k * d_diff);
        }

        ctx.test * ctx.phi * total
    }
}

impl Kernel for MicroscaleDiffusion {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        let u = ctx.fields[self.variable].value;
        let d = self.diffusivity.value(ctx);
        let mut total = 0.0;
        if let Some(n) = self.upper {
            let flux = self.geometry.upper_flux(self.node, d, n.diffusivity.value(ctx));
            total += flux * (u - ctx.fields[n.field].value);
        }
        if let Some(n) = self.lower {
            let flux = self.geometry.lower_flux(self.node, d, n.diffusivity.value(ctx));
            total += flux * (u - ctx.fields[n.field].value);
        }
        if let Some(film) = self.film {
            let g = self.geometry.weight(self.node) / self.geometry.dr();
            total += g * film.coefficient.value(ctx) * (u - ctx.fields[film.macro_field].value);
        }
        ctx.test * total
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        let mut inputs = vec![self.diffusivity];
        for n in self.upper.iter().chain(self.lower.iter()) {
            inputs.push(Coupled::Field(n.field));
            inputs.push(n.diffusivity);
        }
        if let Some(film) = self.film {
            inputs.push(film.coefficient);
            inputs.push(Coupled::Field(film.macro_field));
        }
        collect_coupled(self.variable, &inputs)
    }
}

impl ProductTimeDerivative {
    /// `MicroscaleCoefTimeDerivative`: capacity-weighted accumulation at one node.
    pub fn microscale(
        config: MicroscaleCoefTimeDerivativeConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        const NAME: &str = "MicroscaleCoefTimeDerivative";
        let geometry = geometry(NAME, config.num_nodes, config.micro_length, config.coord_id)?;
        let node = geometry.node(NAME, config.node_id)?;
        let u = registry.resolve_field(NAME, &config.variable)?;
        let coefficient = config.coefficient * geometry.capacity_weight(node);
        Ok(Self::from_parts(NAME, u, u, coefficient, Vec::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::kernels::testing::{assert_jacobian, qp};
    use crate::term::FieldValue;

    const TOL: f64 = 1e-12;

    fn registry() -> FieldRegistry {
        FieldRegistry::with_fields(["c0", "c1", "c2", "c3", "c4", "d0", "d1", "d2", "km", "cb"])
    }

    fn fields() -> [FieldValue; 10] {
        [
            FieldValue::new(1.0),
            FieldValue::new(0.8),
            FieldValue::new(0.5),
            FieldValue::new(0.35),
            FieldValue::new(0.2),
            FieldValue::new(2.0e-3),
            FieldValue::new(3.0e-3),
            FieldValue::new(1.5e-3),
            FieldValue::new(0.04),
            FieldValue::new(0.9),
        ]
    }

    fn interior(node_id: usize, upper: &str, lower: &str) -> Result<MicroscaleDiffusion> {
        MicroscaleDiffusion::interior(
            MicroscaleDiffusionConfig {
                variable: format!("c{node_id}"),
                node_id,
                num_nodes: 5,
                micro_length: 1.0,
                coord_id: 2,
                diffusivity: 0.5,
                upper_neighbor: upper.into(),
                lower_neighbor: lower.into(),
            },
            &registry(),
        )
    }

    #[test]
    fn test_interior_residual() {
        let k = interior(2, "c3", "c1").unwrap();
        let f = fields();
        let ctx = qp(&f);

        // dr = 0.25, g = r², g_{2.5} = ½(0.25 + 0.5625), g_{1.5} = ½(0.25 + 0.0625)
        let dr2 = 0.0625;
        let upper = 0.5 * (0.25 + 0.5625) * 0.5 / dr2 * (0.5 - 0.35);
        let lower = 0.5 * (0.25 + 0.0625) * 0.5 / dr2 * (0.5 - 0.8);
        assert!((k.compute_qp_residual(&ctx) - ctx.test * (upper + lower)).abs() < TOL);
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_interior_rejects_boundary_nodes() {
        assert!(interior(0, "c1", "c0").is_err());
        assert!(interior(4, "c4", "c3").is_err());
        assert!(matches!(
            interior(7, "c1", "c0"),
            Err(ConfigurationError::OutOfRange { parameter: "node_id", .. })
        ));
    }

    #[test]
    fn test_too_few_nodes() {
        let result = MicroscaleDiffusion::inner(
            MicroscaleDiffusionInnerBCConfig {
                variable: "c0".into(),
                num_nodes: 1,
                micro_length: 1.0,
                coord_id: 0,
                diffusivity: 1.0,
                upper_neighbor: "c1".into(),
            },
            &registry(),
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::OutOfRange { parameter: "num_nodes", .. })
        ));
    }

    #[test]
    fn test_bad_coordinate_id() {
        let result = MicroscaleDiffusion::inner(
            MicroscaleDiffusionInnerBCConfig {
                variable: "c0".into(),
                num_nodes: 5,
                micro_length: 1.0,
                coord_id: 3,
                diffusivity: 1.0,
                upper_neighbor: "c1".into(),
            },
            &registry(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_inner_planar_has_only_upper_flux() {
        let k = MicroscaleDiffusion::inner(
            MicroscaleDiffusionInnerBCConfig {
                variable: "c0".into(),
                num_nodes: 5,
                micro_length: 1.0,
                coord_id: 0,
                diffusivity: 0.5,
                upper_neighbor: "c1".into(),
            },
            &registry(),
        )
        .unwrap();
        let f = fields();
        let ctx = qp(&f);
        let expected = ctx.test * 0.5 / 0.0625 * (1.0 - 0.8);
        assert!((k.compute_qp_residual(&ctx) - expected).abs() < TOL);
        assert_eq!(k.coupled_fields(), vec![FieldId::new(1)]);
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_outer_film_exchange() {
        let k = MicroscaleDiffusion::outer(
            MicroscaleDiffusionOuterBCConfig {
                variable: "c4".into(),
                num_nodes: 5,
                micro_length: 1.0,
                coord_id: 1,
                diffusivity: 0.5,
                lower_neighbor: "c3".into(),
                macro_variable: "cb".into(),
                transfer_rate: "km".into(),
            },
            &registry(),
        )
        .unwrap();
        assert_eq!(k.node().get(), 4);
        let f = fields();
        assert_jacobian(&k, &qp(&f));
    }

    #[test]
    fn test_variable_diffusion_jacobians() {
        let reg = registry();
        let interior = MicroscaleDiffusion::variable_interior(
            MicroscaleVariableDiffusionConfig {
                variable: "c1".into(),
                node_id: 1,
                num_nodes: 5,
                micro_length: 0.5,
                coord_id: 2,
                upper_neighbor: "c2".into(),
                lower_neighbor: "c0".into(),
                current_diff: "d1".into(),
                upper_diff: "d2".into(),
                lower_diff: "d0".into(),
            },
            &reg,
        )
        .unwrap();
        let inner = MicroscaleDiffusion::variable_inner(
            MicroscaleVariableDiffusionInnerBCConfig {
                variable: "c0".into(),
                num_nodes: 5,
                micro_length: 0.5,
                coord_id: 2,
                upper_neighbor: "c1".into(),
                current_diff: "d0".into(),
                upper_diff: "d1".into(),
            },
            &reg,
        )
        .unwrap();
        let outer = MicroscaleDiffusion::variable_outer(
            MicroscaleVariableDiffusionOuterBCConfig {
                variable: "c4".into(),
                num_nodes: 5,
                micro_length: 0.5,
                coord_id: 2,
                lower_neighbor: "c3".into(),
                current_diff: "d2".into(),
                lower_diff: "d1".into(),
                macro_variable: "cb".into(),
                transfer_rate: "km".into(),
            },
            &reg,
        )
        .unwrap();

        let f = fields();
        let ctx = qp(&f);
        assert_eq!(interior.coupled_fields().len(), 5);
        for k in [&interior, &inner, &outer] {
            assert_jacobian(k, &ctx);
        }
    }

    #[test]
    fn test_coef_time_derivative_uses_capacity_weight() {
        let k = ProductTimeDerivative::microscale(
            MicroscaleCoefTimeDerivativeConfig {
                variable: "c0".into(),
                node_id: 0,
                num_nodes: 5,
                micro_length: 1.0,
                coord_id: 2,
                coefficient: 2.0,
            },
            &registry(),
        )
        .unwrap();
        let f = [FieldValue::new(1.0).with_dot(3.0)];
        let ctx = qp(&f);
        // capacity weight at node 0: (dr/2)² = 0.015625
        let expected = 2.0 * 0.015625 * 3.0 * ctx.test;
        assert!((k.compute_qp_residual(&ctx) - expected).abs() < TOL);
    }
}
