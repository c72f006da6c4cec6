//! Linear interface transfer.
//!
//! flux = k_f·u − k_r·v, with u on the element side and v on the neighbor
//! side. The element residual is ψ·flux and the neighbor residual is its
//! negation −ψₙ·flux, so mass (or energy) leaving one side enters the
//! other. Jacobian blocks:
//!
//! | block | value       |
//! |-------|-------------|
//! | EE    | ψ·k_f·φ     |
//! | EN    | −ψ·k_r·φₙ   |
//! | NE    | −ψₙ·k_f·φ   |
//! | NN    | ψₙ·k_r·φₙ   |

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::params::{self, FieldRegistry};
use crate::term::{InterfaceContext, InterfaceKernel, JacobianBlock, Side};
use crate::types::FieldId;

/// `InterfaceLinearTransfer`: flux = km·(u − v)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceLinearTransferConfig {
    pub variable: String,
    pub neighbor_var: String,
    #[serde(default = "params::one_f64")]
    pub transfer_rate: f64,
}

/// `InterfaceEnergyTransfer`: flux = h·(T − T_n)
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceEnergyTransferConfig {
    pub variable: String,
    pub neighbor_var: String,
    /// Heat transfer coefficient h
    #[serde(default = "params::one_f64")]
    pub transfer_coef: f64,
}

/// `InterfaceHenryLaw`: flux = k_f·u − k_r·v
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceHenryLawConfig {
    pub variable: String,
    pub neighbor_var: String,
    #[serde(default = "params::one_f64")]
    pub forward_rate: f64,
    #[serde(default = "params::one_f64")]
    pub reverse_rate: f64,
}

/// Two-sided linear transfer term.
#[derive(Clone, Debug)]
pub struct InterfaceTransfer {
    name: &'static str,
    variable: FieldId,
    neighbor_variable: FieldId,
    forward: f64,
    reverse: f64,
}

impl InterfaceTransfer {
    pub fn from_parts(
        name: &'static str,
        variable: FieldId,
        neighbor_variable: FieldId,
        forward: f64,
        reverse: f64,
    ) -> Self {
        debug!("{name}: {variable} <-> {neighbor_variable}, kf = {forward}, kr = {reverse}");
        Self {
            name,
            variable,
            neighbor_variable,
            forward,
            reverse,
        }
    }

    pub fn linear(config: InterfaceLinearTransferConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "InterfaceLinearTransfer";
        Ok(Self::from_parts(
            NAME,
            registry.resolve_field(NAME, &config.variable)?,
            registry.resolve_field(NAME, &config.neighbor_var)?,
            config.transfer_rate,
            config.transfer_rate,
        ))
    }

    pub fn energy(config: InterfaceEnergyTransferConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "InterfaceEnergyTransfer";
        Ok(Self::from_parts(
            NAME,
            registry.resolve_field(NAME, &config.variable)?,
            registry.resolve_field(NAME, &config.neighbor_var)?,
            config.transfer_coef,
            config.transfer_coef,
        ))
    }

    pub fn henry_law(config: InterfaceHenryLawConfig, registry: &FieldRegistry) -> Result<Self> {
        const NAME: &str = "InterfaceHenryLaw";
        Ok(Self::from_parts(
            NAME,
            registry.resolve_field(NAME, &config.variable)?,
            registry.resolve_field(NAME, &config.neighbor_var)?,
            config.forward_rate,
            config.reverse_rate,
        ))
    }

    /// Net flux from element to neighbor.
    #[inline]
    pub fn flux(&self, ctx: &InterfaceContext) -> f64 {
        let u = ctx.element_fields[self.variable].value;
        let v = ctx.neighbor_fields[self.neighbor_variable].value;
        self.forward * u - self.reverse * v
    }
}

impl InterfaceKernel for InterfaceTransfer {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn neighbor_variable(&self) -> FieldId {
        self.neighbor_variable
    }

    fn compute_qp_residual(&self, ctx: &InterfaceContext, side: Side) -> f64 {
        let flux = self.flux(ctx);
        match side {
            Side::Element => ctx.test * flux,
            Side::Neighbor => -ctx.test_neighbor * flux,
        }
    }

    fn compute_qp_jacobian(&self, ctx: &InterfaceContext, block: JacobianBlock) -> f64 {
        match block {
            JacobianBlock::ElementElement => ctx.test * self.forward * ctx.phi,
            JacobianBlock::ElementNeighbor => -ctx.test * self.reverse * ctx.phi_neighbor,
            JacobianBlock::NeighborElement => -ctx.test_neighbor * self.forward * ctx.phi,
            JacobianBlock::NeighborNeighbor => ctx.test_neighbor * self.reverse * ctx.phi_neighbor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::FieldValue;
    use crate::verify::{check_interface_kernel, JacobianCheck};

    const TOL: f64 = 1e-12;

    #[test]
    fn test_linear_transfer_sign_symmetry() {
        let reg = FieldRegistry::with_fields(["u", "v"]);
        let k = InterfaceTransfer::linear(
            InterfaceLinearTransferConfig {
                variable: "u".into(),
                neighbor_var: "v".into(),
                transfer_rate: 2.0,
            },
            &reg,
        )
        .unwrap();
        let elem = [FieldValue::new(5.0), FieldValue::new(0.0)];
        let neigh = [FieldValue::new(0.0), FieldValue::new(3.0)];
        let ctx = InterfaceContext::new(&elem, &neigh).with_test(0.6, 0.6);

        let r_elem = k.compute_qp_residual(&ctx, Side::Element);
        let r_neigh = k.compute_qp_residual(&ctx, Side::Neighbor);
        assert!((r_elem - 4.0 * 0.6).abs() < TOL);
        assert!((r_neigh + r_elem).abs() < TOL);
    }

    #[test]
    fn test_henry_law_four_blocks() {
        let reg = FieldRegistry::with_fields(["u", "v"]);
        let k = InterfaceTransfer::henry_law(
            InterfaceHenryLawConfig {
                variable: "u".into(),
                neighbor_var: "v".into(),
                forward_rate: 1.7,
                reverse_rate: 0.3,
            },
            &reg,
        )
        .unwrap();
        let elem = [FieldValue::new(2.0), FieldValue::new(0.0)];
        let neigh = [FieldValue::new(0.0), FieldValue::new(4.5)];
        let ctx = InterfaceContext::new(&elem, &neigh)
            .with_test(0.8, 0.35)
            .with_trial(0.25, 0.9);

        assert!((k.compute_qp_jacobian(&ctx, JacobianBlock::ElementNeighbor) + 0.8 * 0.3 * 0.9).abs() < TOL);
        assert!((k.compute_qp_jacobian(&ctx, JacobianBlock::NeighborElement) + 0.35 * 1.7 * 0.25).abs() < TOL);

        let report = check_interface_kernel(&k, &ctx, &JacobianCheck::default());
        assert!(report.passed(), "{report}");
    }

    #[test]
    fn test_energy_transfer_same_variable_both_sides() {
        let reg = FieldRegistry::with_fields(["T"]);
        let k = InterfaceTransfer::energy(
            InterfaceEnergyTransferConfig {
                variable: "T".into(),
                neighbor_var: "T".into(),
                transfer_coef: 15.0,
            },
            &reg,
        )
        .unwrap();
        let elem = [FieldValue::new(350.0)];
        let neigh = [FieldValue::new(300.0)];
        let ctx = InterfaceContext::new(&elem, &neigh).with_test(0.5, 0.5);
        assert!((k.compute_qp_residual(&ctx, Side::Element) - 0.5 * 15.0 * 50.0).abs() < 1e-9);

        let report = check_interface_kernel(&k, &ctx, &JacobianCheck::default());
        assert!(report.passed(), "{report}");
    }
}
