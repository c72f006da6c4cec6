//! Reaction, energy-transfer, and rate-constraint kernels.
//!
//! Reaction kernels add the scaled net rate of a [`ReactionKinetics`] to a
//! balance equation:
//!
//! R = −ψ · scale · (k_f·Π C_r^{v} − k_r·Π C_p^{v})
//!
//! Mass balances use a constant stoichiometric scale; energy balances use
//! −ΔH·A_o·ε. Rate constraints instead define an algebraic rate variable:
//!
//! R = ψ · (u − rate)

use log::debug;
use serde::{Deserialize, Serialize};

use crate::constants::default_gas_constant;
use crate::error::{ConfigurationError, Result};
use crate::kinetics::{Arrhenius, RateLaw, ReactionKinetics, ScaleFactor};
use crate::params::{
    self, check_lengths, collect_coupled, power_product, power_product_derivative, Coupled,
    CoupledInput, FieldRegistry,
};
use crate::term::{Kernel, QpContext};
use crate::types::FieldId;

/// Configuration shared by every reaction kernel.
///
/// Which keys are required depends on the kernel type: constant-rate
/// kernels need `forward_rate`, Arrhenius kernels need
/// `forward_pre_exponential`, equilibrium kernels need `enthalpy` and
/// `entropy`, and energy kernels need `enthalpy`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReactionConfig {
    pub variable: String,
    #[serde(default)]
    pub reactants: Vec<CoupledInput>,
    #[serde(default)]
    pub reactant_stoich: Vec<f64>,
    #[serde(default)]
    pub products: Vec<CoupledInput>,
    #[serde(default)]
    pub product_stoich: Vec<f64>,
    /// Stoichiometric weight of the variable in a mass balance
    #[serde(default = "params::one_f64")]
    pub scale: f64,

    pub forward_rate: Option<f64>,
    pub reverse_rate: Option<f64>,

    pub forward_pre_exponential: Option<f64>,
    #[serde(default)]
    pub forward_activation_energy: f64,
    #[serde(default = "params::one_f64")]
    pub forward_beta: f64,
    #[serde(default)]
    pub reverse_pre_exponential: f64,
    #[serde(default)]
    pub reverse_activation_energy: f64,
    #[serde(default = "params::one_f64")]
    pub reverse_beta: f64,
    #[serde(default = "params::standard_temperature")]
    pub temperature: CoupledInput,
    #[serde(default = "default_gas_constant")]
    pub gas_constant: f64,

    pub enthalpy: Option<f64>,
    pub entropy: Option<f64>,

    #[serde(default = "params::one")]
    pub forward_inhibition: CoupledInput,
    #[serde(default = "params::one")]
    pub reverse_inhibition: CoupledInput,

    /// Reactive area per volume A_o (energy kernels)
    #[serde(default = "params::one")]
    pub specific_area: CoupledInput,
    /// Volume fraction ε (energy kernels)
    #[serde(default = "params::one")]
    pub volume_frac: CoupledInput,
}

impl Default for ReactionConfig {
    fn default() -> Self {
        Self {
            variable: String::new(),
            reactants: Vec::new(),
            reactant_stoich: Vec::new(),
            products: Vec::new(),
            product_stoich: Vec::new(),
            scale: 1.0,
            forward_rate: None,
            reverse_rate: None,
            forward_pre_exponential: None,
            forward_activation_energy: 0.0,
            forward_beta: 1.0,
            reverse_pre_exponential: 0.0,
            reverse_activation_energy: 0.0,
            reverse_beta: 1.0,
            temperature: params::standard_temperature(),
            gas_constant: crate::constants::GAS_CONSTANT,
            enthalpy: None,
            entropy: None,
            forward_inhibition: params::one(),
            reverse_inhibition: params::one(),
            specific_area: params::one(),
            volume_frac: params::one(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LawKind {
    Constant,
    Arrhenius,
    Equilibrium,
    Inhibited,
}

impl ReactionConfig {
    fn forward_arrhenius(&self, object: &'static str) -> Result<Arrhenius> {
        let a = self
            .forward_pre_exponential
            .ok_or(ConfigurationError::MissingParameter {
                object,
                parameter: "forward_pre_exponential",
            })?;
        Ok(Arrhenius::new(a, self.forward_activation_energy)
            .with_beta(self.forward_beta)
            .with_gas_constant(self.gas_constant))
    }

    fn reverse_arrhenius(&self) -> Arrhenius {
        Arrhenius::new(self.reverse_pre_exponential, self.reverse_activation_energy)
            .with_beta(self.reverse_beta)
            .with_gas_constant(self.gas_constant)
    }

    fn required(value: Option<f64>, object: &'static str, parameter: &'static str) -> Result<f64> {
        value.ok_or(ConfigurationError::MissingParameter { object, parameter })
    }

    fn law(&self, object: &'static str, kind: LawKind, registry: &FieldRegistry) -> Result<RateLaw> {
        let law = match kind {
            LawKind::Constant => RateLaw::Constant {
                forward: Self::required(self.forward_rate, object, "forward_rate")?,
                reverse: self.reverse_rate.unwrap_or(0.0),
            },
            LawKind::Arrhenius => RateLaw::Arrhenius {
                forward: self.forward_arrhenius(object)?,
                reverse: self.reverse_arrhenius(),
                temperature: registry.resolve(object, &self.temperature)?,
            },
            LawKind::Equilibrium => {
                if self.reactants.is_empty() || self.products.is_empty() {
                    return Err(ConfigurationError::invalid(
                        object,
                        "equilibrium reactions need at least one reactant and one product",
                    ));
                }
                RateLaw::equilibrium(
                    self.forward_arrhenius(object)?,
                    registry.resolve(object, &self.temperature)?,
                    Self::required(self.enthalpy, object, "enthalpy")?,
                    Self::required(self.entropy, object, "entropy")?,
                )
            }
            LawKind::Inhibited => RateLaw::Inhibited {
                forward: self.forward_arrhenius(object)?,
                reverse: self.reverse_arrhenius(),
                temperature: registry.resolve(object, &self.temperature)?,
                forward_inhibition: registry.resolve(object, &self.forward_inhibition)?,
                reverse_inhibition: registry.resolve(object, &self.reverse_inhibition)?,
            },
        };
        Ok(law)
    }

    /// Pick a law from the keys present: a constant rate, then equilibrium
    /// thermodynamics, then inhibition fields, then plain Arrhenius.
    fn inferred_kind(&self) -> LawKind {
        let unit = CoupledInput::Constant(1.0);
        if self.forward_rate.is_some() {
            LawKind::Constant
        } else if self.enthalpy.is_some() && self.entropy.is_some() {
            LawKind::Equilibrium
        } else if self.forward_inhibition != unit || self.reverse_inhibition != unit {
            LawKind::Inhibited
        } else {
            LawKind::Arrhenius
        }
    }

    fn kinetics(
        &self,
        object: &'static str,
        law: RateLaw,
        scale: ScaleFactor,
        registry: &FieldRegistry,
    ) -> Result<ReactionKinetics> {
        ReactionKinetics::new(
            object,
            law,
            scale,
            registry.resolve_all(object, &self.reactants)?,
            self.reactant_stoich.clone(),
            registry.resolve_all(object, &self.products)?,
            self.product_stoich.clone(),
        )
    }

    fn energy_scale(&self, object: &'static str, registry: &FieldRegistry) -> Result<ScaleFactor> {
        Ok(ScaleFactor::Energy {
            enthalpy: Self::required(self.enthalpy, object, "enthalpy")?,
            area_ratio: registry.resolve(object, &self.specific_area)?,
            volume_fraction: registry.resolve(object, &self.volume_frac)?,
        })
    }
}

/// Reaction source term in a mass or energy balance.
#[derive(Clone, Debug)]
pub struct ReactionKernel {
    name: &'static str,
    variable: FieldId,
    kinetics: ReactionKinetics,
}

impl ReactionKernel {
    fn build(
        name: &'static str,
        config: &ReactionConfig,
        kind: LawKind,
        energy: bool,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        let variable = registry.resolve_field(name, &config.variable)?;
        let law = config.law(name, kind, registry)?;
        let scale = if energy {
            config.energy_scale(name, registry)?
        } else {
            ScaleFactor::Mass {
                coefficient: config.scale,
            }
        };
        let kinetics = config.kinetics(name, law, scale, registry)?;
        debug!("{name}: variable {variable}, law {:?}", kinetics.law());
        Ok(Self {
            name,
            variable,
            kinetics,
        })
    }

    pub fn constant(config: ReactionConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build("ConstReaction", &config, LawKind::Constant, false, registry)
    }

    pub fn arrhenius(config: ReactionConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build("ArrheniusReaction", &config, LawKind::Arrhenius, false, registry)
    }

    pub fn arrhenius_equilibrium(config: ReactionConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build(
            "ArrheniusEquilibriumReaction",
            &config,
            LawKind::Equilibrium,
            false,
            registry,
        )
    }

    pub fn inhibited_arrhenius(config: ReactionConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build(
            "InhibitedArrheniusReaction",
            &config,
            LawKind::Inhibited,
            false,
            registry,
        )
    }

    pub fn arrhenius_energy(config: ReactionConfig, registry: &FieldRegistry) -> Result<Self> {
        Self::build(
            "ArrheniusReactionEnergyTransfer",
            &config,
            LawKind::Arrhenius,
            true,
            registry,
        )
    }

    pub fn arrhenius_equilibrium_energy(
        config: ReactionConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        Self::build(
            "ArrheniusEquilibriumReactionEnergyTransfer",
            &config,
            LawKind::Equilibrium,
            true,
            registry,
        )
    }

    pub fn inhibited_arrhenius_energy(
        config: ReactionConfig,
        registry: &FieldRegistry,
    ) -> Result<Self> {
        Self::build(
            "InhibitedArrheniusReactionEnergyTransfer",
            &config,
            LawKind::Inhibited,
            true,
            registry,
        )
    }

    /// The composed kinetics.
    pub fn kinetics(&self) -> &ReactionKinetics {
        &self.kinetics
    }
}

impl Kernel for ReactionKernel {
    fn name(&self) -> &'static str {
        self.name
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        -ctx.test * self.kinetics.scaled_rate(ctx)
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        -ctx.test * ctx.phi * self.kinetics.scaled_rate_derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        -ctx.test * ctx.phi * self.kinetics.scaled_rate_derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, self.kinetics.inputs().iter())
    }
}

/// Algebraic rate variable: R = ψ·(u − rate).
#[derive(Clone, Debug)]
pub struct ReactionRateConstraint {
    variable: FieldId,
    kinetics: ReactionKinetics,
}

impl ReactionRateConstraint {
    const NAME: &'static str = "ReactionRateConstraint";

    /// The rate law is inferred from the keys present in `config`.
    pub fn new(config: ReactionConfig, registry: &FieldRegistry) -> Result<Self> {
        let object = Self::NAME;
        let variable = registry.resolve_field(object, &config.variable)?;
        let law = config.law(object, config.inferred_kind(), registry)?;
        let kinetics = config.kinetics(object, law, ScaleFactor::Mass { coefficient: 1.0 }, registry)?;
        debug!("{object}: variable {variable}, law {:?}", kinetics.law());
        Ok(Self { variable, kinetics })
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let own = if wrt == self.variable { 1.0 } else { 0.0 };
        ctx.test * ctx.phi * (own - self.kinetics.rate_derivative(ctx, wrt))
    }
}

impl Kernel for ReactionRateConstraint {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        ctx.test * (ctx.fields[self.variable].value - self.kinetics.rate(ctx))
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, self.kinetics.inputs().iter())
    }
}

/// `LangmuirInhibition`
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LangmuirInhibitionConfig {
    pub variable: String,
    pub coupled_list: Vec<CoupledInput>,
    pub pre_exponentials: Vec<f64>,
    #[serde(default)]
    pub activation_energies: Vec<f64>,
    #[serde(default = "params::standard_temperature")]
    pub temperature: CoupledInput,
    #[serde(default = "default_gas_constant")]
    pub gas_constant: f64,
}

/// Langmuir inhibition factor: R = ψ·(u − (1 + Σ Kᵢ(T)·Cᵢ)),
/// Kᵢ = Aᵢ·exp(−Eᵢ/(R·T)).
#[derive(Clone, Debug)]
pub struct LangmuirInhibition {
    variable: FieldId,
    species: Vec<Coupled>,
    constants: Vec<Arrhenius>,
    temperature: Coupled,
}

impl LangmuirInhibition {
    const NAME: &'static str = "LangmuirInhibition";

    pub fn new(config: LangmuirInhibitionConfig, registry: &FieldRegistry) -> Result<Self> {
        let object = Self::NAME;
        check_lengths(
            object,
            "coupled_list",
            config.coupled_list.len(),
            "pre_exponentials",
            config.pre_exponentials.len(),
        )?;
        let energies = if config.activation_energies.is_empty() {
            vec![0.0; config.pre_exponentials.len()]
        } else {
            check_lengths(
                object,
                "coupled_list",
                config.coupled_list.len(),
                "activation_energies",
                config.activation_energies.len(),
            )?;
            config.activation_energies.clone()
        };
        let constants = config
            .pre_exponentials
            .iter()
            .zip(&energies)
            .map(|(a, e)| {
                Arrhenius::new(*a, *e)
                    .with_beta(0.0)
                    .with_gas_constant(config.gas_constant)
            })
            .collect();
        Ok(Self {
            variable: registry.resolve_field(object, &config.variable)?,
            species: registry.resolve_all(object, &config.coupled_list)?,
            constants,
            temperature: registry.resolve(object, &config.temperature)?,
        })
    }

    fn inhibition(&self, ctx: &QpContext) -> f64 {
        let t = self.temperature.value(ctx);
        1.0 + self
            .species
            .iter()
            .zip(&self.constants)
            .map(|(c, k)| k.rate(t) * c.value(ctx))
            .sum::<f64>()
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let t = self.temperature.value(ctx);
        let mut d = 0.0;
        for (c, k) in self.species.iter().zip(&self.constants) {
            d += k.rate(t) * c.indicator(wrt);
            d += self.temperature.indicator(wrt) * k.rate_derivative(t) * c.value(ctx);
        }
        let own = if wrt == self.variable { 1.0 } else { 0.0 };
        ctx.test * ctx.phi * (own - d)
    }
}

impl Kernel for LangmuirInhibition {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        ctx.test * (ctx.fields[self.variable].value - self.inhibition(ctx))
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(
            self.variable,
            self.species.iter().chain(std::iter::once(&self.temperature)),
        )
    }
}

/// `InhibitionProducts` kernel and aux evaluator.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InhibitionProductsConfig {
    pub variable: String,
    pub coupled_list: Vec<CoupledInput>,
    pub power_list: Vec<f64>,
}

/// Product inhibition: R = ψ·(u − Π Cᵢ^{pᵢ}).
#[derive(Clone, Debug)]
pub struct InhibitionProducts {
    variable: FieldId,
    factors: Vec<Coupled>,
    powers: Vec<f64>,
}

impl InhibitionProducts {
    const NAME: &'static str = "InhibitionProducts";

    pub fn new(config: InhibitionProductsConfig, registry: &FieldRegistry) -> Result<Self> {
        let object = Self::NAME;
        check_lengths(
            object,
            "coupled_list",
            config.coupled_list.len(),
            "power_list",
            config.power_list.len(),
        )?;
        Ok(Self {
            variable: registry.resolve_field(object, &config.variable)?,
            factors: registry.resolve_all(object, &config.coupled_list)?,
            powers: config.power_list,
        })
    }

    fn derivative(&self, ctx: &QpContext, wrt: FieldId) -> f64 {
        let own = if wrt == self.variable { 1.0 } else { 0.0 };
        ctx.test
            * ctx.phi
            * (own - power_product_derivative(&self.factors, &self.powers, ctx, wrt))
    }
}

impl Kernel for InhibitionProducts {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn variable(&self) -> FieldId {
        self.variable
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        ctx.test * (ctx.fields[self.variable].value - power_product(&self.factors, &self.powers, ctx))
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.derivative(ctx, self.variable)
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.derivative(ctx, jvar)
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        collect_coupled(self.variable, self.factors.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GAS_CONSTANT;
    use crate::kernels::testing::{assert_jacobian, qp};
    use crate::term::FieldValue;

    fn registry() -> FieldRegistry {
        FieldRegistry::with_fields(["A", "B", "C", "T", "If", "Ir", "Ao", "eps", "r"])
    }

    fn fields() -> [FieldValue; 9] {
        [
            FieldValue::new(0.8),
            FieldValue::new(1.3),
            FieldValue::new(0.4),
            FieldValue::new(450.0),
            FieldValue::new(1.7),
            FieldValue::new(1.2),
            FieldValue::new(3.0),
            FieldValue::new(0.4),
            FieldValue::new(0.05),
        ]
    }

    fn base_config(variable: &str) -> ReactionConfig {
        ReactionConfig {
            variable: variable.into(),
            reactants: vec!["A".into(), "B".into()],
            reactant_stoich: vec![1.0, 2.0],
            products: vec!["C".into()],
            product_stoich: vec![1.0],
            scale: -1.0,
            forward_pre_exponential: Some(2.0),
            forward_activation_energy: 15000.0,
            forward_beta: 1.0,
            reverse_pre_exponential: 0.5,
            reverse_activation_energy: 20000.0,
            reverse_beta: 1.0,
            temperature: "T".into(),
            gas_constant: GAS_CONSTANT,
            forward_inhibition: "If".into(),
            reverse_inhibition: "Ir".into(),
            specific_area: "Ao".into(),
            volume_frac: "eps".into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_constant_reaction() {
        let mut cfg = base_config("A");
        cfg.forward_rate = Some(3.0);
        cfg.reverse_rate = Some(0.5);
        let k = ReactionKernel::constant(cfg, &registry()).unwrap();
        let f = fields();
        let ctx = qp(&f);
        // R = −ψ·(−1)·(3·A·B² − 0.5·C)
        let rate = 3.0 * 0.8 * 1.3 * 1.3 - 0.5 * 0.4;
        assert!((k.compute_qp_residual(&ctx) - ctx.test * rate).abs() < 1e-12);
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_constant_reaction_missing_rate() {
        let err = ReactionKernel::constant(base_config("A"), &registry()).unwrap_err();
        assert!(matches!(
            err,
            ConfigurationError::MissingParameter {
                parameter: "forward_rate",
                ..
            }
        ));
    }

    #[test]
    fn test_all_arrhenius_variants_jacobian() {
        let reg = registry();
        let f = fields();
        let ctx = qp(&f);
        let mut cfg = base_config("B");
        cfg.enthalpy = Some(-20000.0);
        cfg.entropy = Some(10.0);

        let builders: [fn(ReactionConfig, &FieldRegistry) -> Result<ReactionKernel>; 6] = [
            ReactionKernel::arrhenius,
            ReactionKernel::arrhenius_equilibrium,
            ReactionKernel::inhibited_arrhenius,
            ReactionKernel::arrhenius_energy,
            ReactionKernel::arrhenius_equilibrium_energy,
            ReactionKernel::inhibited_arrhenius_energy,
        ];
        for build in builders {
            let k = build(cfg.clone(), &reg).unwrap();
            assert_jacobian(&k, &ctx);
        }

        let mut energy = cfg.clone();
        energy.variable = "T".into();
        let k = ReactionKernel::arrhenius_energy(energy, &reg).unwrap();
        assert_jacobian(&k, &ctx);
    }

    #[test]
    fn test_equilibrium_reverse_constant() {
        let mut cfg = base_config("A");
        cfg.forward_pre_exponential = Some(1.0);
        cfg.forward_activation_energy = 50000.0;
        cfg.enthalpy = Some(-20000.0);
        cfg.entropy = Some(10.0);
        let k = ReactionKernel::arrhenius_equilibrium(cfg, &registry()).unwrap();
        match k.kinetics().law() {
            RateLaw::Equilibrium { reverse, .. } => {
                assert!((reverse.activation_energy - 70000.0).abs() < 1e-9);
                assert!((reverse.pre_exponential - (-10.0 / GAS_CONSTANT).exp()).abs() < 1e-14);
            }
            other => panic!("unexpected law {other:?}"),
        }
    }

    #[test]
    fn test_equilibrium_requires_both_sides() {
        let mut cfg = base_config("A");
        cfg.enthalpy = Some(-20000.0);
        cfg.entropy = Some(10.0);
        cfg.products.clear();
        cfg.product_stoich.clear();
        assert!(ReactionKernel::arrhenius_equilibrium(cfg, &registry()).is_err());
    }

    #[test]
    fn test_energy_requires_enthalpy() {
        let err = ReactionKernel::arrhenius_energy(base_config("T"), &registry()).unwrap_err();
        assert!(matches!(err, ConfigurationError::MissingParameter { .. }));
    }

    #[test]
    fn test_rate_constraint_jacobian() {
        let reg = registry();
        let f = fields();
        let ctx = qp(&f);
        let k = ReactionRateConstraint::new(base_config("r"), &reg).unwrap();
        assert_jacobian(&k, &ctx);
        assert!(matches!(k.kinetics.law(), RateLaw::Inhibited { .. }));
    }

    #[test]
    fn test_langmuir_inhibition() {
        let reg = registry();
        let k = LangmuirInhibition::new(
            LangmuirInhibitionConfig {
                variable: "If".into(),
                coupled_list: vec!["A".into(), "B".into()],
                pre_exponentials: vec![2.0, 0.5],
                activation_energies: vec![-3000.0, 0.0],
                temperature: "T".into(),
                gas_constant: GAS_CONSTANT,
            },
            &reg,
        )
        .unwrap();
        let f = fields();
        let ctx = qp(&f);
        assert_jacobian(&k, &ctx);

        // E = 0 → K = A exactly
        let plain = LangmuirInhibition::new(
            LangmuirInhibitionConfig {
                variable: "If".into(),
                coupled_list: vec!["A".into()],
                pre_exponentials: vec![2.0],
                activation_energies: vec![],
                temperature: "T".into(),
                gas_constant: GAS_CONSTANT,
            },
            &reg,
        )
        .unwrap();
        let expected = ctx.test * (1.7 - (1.0 + 2.0 * 0.8));
        assert!((plain.compute_qp_residual(&ctx) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_inhibition_products() {
        let reg = registry();
        let k = InhibitionProducts::new(
            InhibitionProductsConfig {
                variable: "If".into(),
                coupled_list: vec!["A".into(), "B".into()],
                power_list: vec![0.5, 2.0],
            },
            &reg,
        )
        .unwrap();
        let f = fields();
        let ctx = qp(&f);
        assert_jacobian(&k, &ctx);

        let err = InhibitionProducts::new(
            InhibitionProductsConfig {
                variable: "If".into(),
                coupled_list: vec!["A".into(), "B".into()],
                power_list: vec![1.0],
            },
            &reg,
        );
        assert!(err.is_err());
    }
}
