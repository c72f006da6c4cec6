use crate::electrochem::{ButlerVolmer, ButlerVolmerRateConfig, CurrentDensity, CurrentDensityConfig};
use crate::error::Result;
use crate::kernels::{Activity, ActivityConfig, WeightedSum, WeightedSumConfig};
use crate::params::FieldRegistry;
use crate::term::{AuxContext, InitialCondition};
use crate::types::FieldId;

/// u₀ = r(η, C, T), the Butler–Volmer rate.
#[derive(Clone, Debug)]
pub struct ButlerVolmerRateIC {
    variable: FieldId,
    kinetics: ButlerVolmer,
}

impl ButlerVolmerRateIC {
    const NAME: &'static str = "ButlerVolmerRateIC";

    pub fn new(config: ButlerVolmerRateConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            kinetics: ButlerVolmer::from_config(Self::NAME, &config, registry)?,
        })
    }
}

impl InitialCondition for ButlerVolmerRateIC {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn value(&self, ctx: &AuxContext) -> f64 {
        self.kinetics.rate(ctx)
    }
}

/// u₀ = n·F·a·(−r)
#[derive(Clone, Debug)]
pub struct ButlerVolmerCurrentDensityIC {
    variable: FieldId,
    current: CurrentDensity,
}

impl ButlerVolmerCurrentDensityIC {
    const NAME: &'static str = "ButlerVolmerCurrentDensityIC";

    pub fn new(config: CurrentDensityConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            current: CurrentDensity::from_config(Self::NAME, &config, registry)?,
        })
    }
}

impl InitialCondition for ButlerVolmerCurrentDensityIC {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn value(&self, ctx: &AuxContext) -> f64 {
        self.current.value(ctx)
    }
}

/// u₀ = γ·C/C_ref
#[derive(Clone, Debug)]
pub struct ActivityIC {
    variable: FieldId,
    activity: Activity,
}

impl ActivityIC {
    const NAME: &'static str = "ActivityIC";

    pub fn new(config: ActivityConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            activity: Activity::from_config(Self::NAME, &config, registry)?,
        })
    }
}

impl InitialCondition for ActivityIC {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn value(&self, ctx: &AuxContext) -> f64 {
        self.activity.value(ctx)
    }
}

/// u₀ = Σ wᵢ·vᵢ
#[derive(Clone, Debug)]
pub struct CoupledSumIC {
    variable: FieldId,
    sum: WeightedSum,
}

impl CoupledSumIC {
    const NAME: &'static str = "CoupledSumIC";

    pub fn new(config: WeightedSumConfig, registry: &FieldRegistry) -> Result<Self> {
        Ok(Self {
            variable: registry.resolve_field(Self::NAME, &config.variable)?,
            sum: WeightedSum::from_inputs(
                Self::NAME,
                &config.coupled_list,
                &config.weights,
                registry,
            )?,
        })
    }
}

impl InitialCondition for CoupledSumIC {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn value(&self, ctx: &AuxContext) -> f64 {
        self.sum.value(ctx)
    }
}
