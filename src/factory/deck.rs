//! Whole-problem input decks and the terms built from them.

use log::{debug, info};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ConfigurationError, Result};
use crate::params::FieldRegistry;
use crate::term::{AuxKernel, InitialCondition, InterfaceKernel, Kernel};

use super::catalogue::{
    AuxKernelConfig, BoundaryConditionConfig, InitialConditionConfig, InterfaceKernelConfig,
    KernelConfig,
};

/// Every term block of one problem, grouped by category.
///
/// ```toml
/// [[kernels]]
/// type = "CoefTimeDerivative"
/// variable = "c"
///
/// [[bcs]]
/// type = "ConstantFluxBC"
/// variable = "c"
/// flux = 0.5
/// ```
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputDeck {
    #[serde(default)]
    pub kernels: Vec<KernelConfig>,
    #[serde(default)]
    pub aux_kernels: Vec<AuxKernelConfig>,
    #[serde(default)]
    pub bcs: Vec<BoundaryConditionConfig>,
    #[serde(default)]
    pub ics: Vec<InitialConditionConfig>,
    #[serde(default)]
    pub interface_kernels: Vec<InterfaceKernelConfig>,
}

/// Constructed terms, in input order within each category.
#[derive(Default)]
pub struct Terms {
    pub kernels: Vec<Box<dyn Kernel>>,
    pub aux_kernels: Vec<Box<dyn AuxKernel>>,
    pub bcs: Vec<Box<dyn Kernel>>,
    pub ics: Vec<Box<dyn InitialCondition>>,
    pub interface_kernels: Vec<Box<dyn InterfaceKernel>>,
}

impl Terms {
    /// Total number of terms.
    pub fn len(&self) -> usize {
        self.kernels.len()
            + self.aux_kernels.len()
            + self.bcs.len()
            + self.ics.len()
            + self.interface_kernels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl InputDeck {
    /// Deserialize a whole deck, mapping format errors to
    /// [`ConfigurationError::Deserialize`].
    pub fn parse<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self> {
        Self::deserialize(deserializer).map_err(|e| ConfigurationError::Deserialize(e.to_string()))
    }

    /// Build every block. The first failing block aborts the build.
    pub fn build(self, registry: &FieldRegistry) -> Result<Terms> {
        let mut terms = Terms::default();
        for config in self.kernels {
            debug!("building kernel {}", config.type_name());
            terms.kernels.push(config.build(registry)?);
        }
        for config in self.aux_kernels {
            debug!("building aux kernel {}", config.type_name());
            terms.aux_kernels.push(config.build(registry)?);
        }
        for config in self.bcs {
            debug!("building boundary condition {}", config.type_name());
            terms.bcs.push(config.build(registry)?);
        }
        for config in self.ics {
            debug!("building initial condition {}", config.type_name());
            terms.ics.push(config.build(registry)?);
        }
        for config in self.interface_kernels {
            debug!("building interface kernel {}", config.type_name());
            terms.interface_kernels.push(config.build(registry)?);
        }
        info!(
            "built {} kernels, {} aux kernels, {} BCs, {} ICs, {} interface kernels",
            terms.kernels.len(),
            terms.aux_kernels.len(),
            terms.bcs.len(),
            terms.ics.len(),
            terms.interface_kernels.len()
        );
        Ok(terms)
    }
}
