use serde::{Deserialize, Deserializer, Serialize};

use crate::aux_kernels::*;
use crate::bcs::*;
use crate::electrochem::{ButlerVolmerRateConfig, CurrentDensityConfig};
use crate::error::{ConfigurationError, Result};
use crate::ics::*;
use crate::interface::*;
use crate::kernels::*;
use crate::params::FieldRegistry;
use crate::term::{AuxKernel, InitialCondition, InterfaceKernel, Kernel};

/// Generate a `type`-tagged configuration enum and its builder.
macro_rules! define_catalogue {
    (
        $(#[$meta:meta])*
        $name:ident => $term:ident {
            $( $(#[$vmeta:meta])* $variant:ident($config:ty) => $build:path ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Serialize, Deserialize)]
        #[serde(tag = "type")]
        pub enum $name {
            $( $(#[$vmeta])* $variant($config), )*
        }

        impl $name {
            /// Input-file type name of this block.
            pub fn type_name(&self) -> &'static str {
                match self {
                    $( Self::$variant(_) => stringify!($variant), )*
                }
            }

            /// Resolve field names and construct the term.
            pub fn build(self, registry: &FieldRegistry) -> Result<Box<dyn $term>> {
                match self {
                    $( Self::$variant(config) => Ok(Box::new($build(config, registry)?)), )*
                }
            }

            /// Deserialize one block, mapping format errors to
            /// [`ConfigurationError::Deserialize`].
            pub fn parse<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Self> {
                Self::deserialize(deserializer)
                    .map_err(|e| ConfigurationError::Deserialize(e.to_string()))
            }
        }
    };
}

define_catalogue! {
    /// Volumetric kernels.
    KernelConfig => Kernel {
        CoefTimeDerivative(CoefTimeDerivativeConfig) => ProductTimeDerivative::coef,
        VariableCoefTimeDerivative(VariableCoefTimeDerivativeConfig) => ProductTimeDerivative::variable_coef,
        CoupledCoefTimeDerivative(CoupledCoefTimeDerivativeConfig) => ProductTimeDerivative::coupled_coef,
        PorousTimeDerivative(PorousTimeDerivativeConfig) => ProductTimeDerivative::porous,
        PhaseEnergyTimeDerivative(PhaseEnergyTimeDerivativeConfig) => ProductTimeDerivative::phase_energy,
        MicroscaleCoefTimeDerivative(MicroscaleCoefTimeDerivativeConfig) => ProductTimeDerivative::microscale,

        AnisotropicDiffusion(AnisotropicDiffusionConfig) => TensorDiffusion::anisotropic,
        CoupledAnisotropicDiffusion(CoupledAnisotropicDiffusionConfig) => TensorDiffusion::coupled_anisotropic,
        PorousAnisotropicDiffusion(CoupledAnisotropicDiffusionConfig) => TensorDiffusion::porous_anisotropic,
        VariableLaplacian(VariableLaplacianConfig) => TensorDiffusion::variable_laplacian,
        PoreDiffusion(PoreDiffusionConfig) => TensorDiffusion::pore,
        #[serde(alias = "GVarPoreDiffusion")]
        VarPoreDiffusion(PoreDiffusionConfig) => TensorDiffusion::var_pore,
        PhaseThermalConductivity(PhaseThermalConductivityConfig) => TensorDiffusion::phase_thermal_conductivity,
        ElectrodePotentialConductivity(PotentialConductivityConfig) => TensorDiffusion::electrode_potential,
        ElectrolytePotentialConductivity(PotentialConductivityConfig) => TensorDiffusion::electrolyte_potential,

        CoupledAdvection(AdvectionConfig) => FluxAdvection::coupled,
        PoreConcAdvection(AdvectionConfig) => FluxAdvection::pore_conc,
        PhaseEnergyAdvection(AdvectionConfig) => FluxAdvection::phase_energy,
        NernstPlanckMigration(NernstPlanckMigrationConfig) => NernstPlanckMigration::new,

        ConstReaction(ReactionConfig) => ReactionKernel::constant,
        ArrheniusReaction(ReactionConfig) => ReactionKernel::arrhenius,
        ArrheniusEquilibriumReaction(ReactionConfig) => ReactionKernel::arrhenius_equilibrium,
        InhibitedArrheniusReaction(ReactionConfig) => ReactionKernel::inhibited_arrhenius,
        ArrheniusReactionEnergyTransfer(ReactionConfig) => ReactionKernel::arrhenius_energy,
        ArrheniusEquilibriumReactionEnergyTransfer(ReactionConfig) => ReactionKernel::arrhenius_equilibrium_energy,
        InhibitedArrheniusReactionEnergyTransfer(ReactionConfig) => ReactionKernel::inhibited_arrhenius_energy,
        ReactionRateConstraint(ReactionConfig) => ReactionRateConstraint::new,
        LangmuirInhibition(LangmuirInhibitionConfig) => LangmuirInhibition::new,
        InhibitionProducts(InhibitionProductsConfig) => InhibitionProducts::new,
        ScaledRateSource(ScaledRateSourceConfig) => WeightedSumKernel::scaled_rate_source,

        WeightedCoupledSum(WeightedSumConfig) => WeightedSumKernel::weighted_coupled_sum,
        ScaledWeightedCoupledSum(ScaledWeightedSumConfig) => WeightedSumKernel::scaled_weighted_coupled_sum,
        CoupledRatioConstraint(CoupledRatioConfig) => CoupledRatioConstraint::new,

        ButlerVolmerRate(ButlerVolmerRateConfig) => ButlerVolmerRate::new,
        ButlerVolmerCurrentDensity(CurrentDensityConfig) => ButlerVolmerCurrentDensity::new,
        ElectrodeCurrentFromPotentialGrad(ElectrodeCurrentConfig) => DirectionalFluxConstraint::electrode_current,
        ElectrolyteCurrentFromPotentialGrad(ElectrolyteCurrentConfig) => DirectionalFluxConstraint::electrolyte_current,
        ElectrodeOhmicHeating(ElectrodeOhmicHeatingConfig) => ElectrodeOhmicHeating::new,
        ActivityConstraint(ActivityConfig) => ActivityConstraint::new,

        DarcyVelocity(DarcyVelocityConfig) => DirectionalFluxConstraint::darcy_velocity,
        SchloeglVelocity(SchloeglVelocityConfig) => DirectionalFluxConstraint::schloegl_velocity,

        ConstMassTransfer(ConstMassTransferConfig) => VolumetricTransfer::const_mass,
        FilmMassTransfer(FilmMassTransferConfig) => VolumetricTransfer::film_mass,
        PhaseEnergyTransfer(PhaseEnergyTransferConfig) => VolumetricTransfer::phase_energy,

        MicroscaleDiffusion(MicroscaleDiffusionConfig) => MicroscaleDiffusion::interior,
        MicroscaleDiffusionInnerBC(MicroscaleDiffusionInnerBCConfig) => MicroscaleDiffusion::inner,
        MicroscaleDiffusionOuterBC(MicroscaleDiffusionOuterBCConfig) => MicroscaleDiffusion::outer,
        MicroscaleVariableDiffusion(MicroscaleVariableDiffusionConfig) => MicroscaleDiffusion::variable_interior,
        MicroscaleVariableDiffusionInnerBC(MicroscaleVariableDiffusionInnerBCConfig) => MicroscaleDiffusion::variable_inner,
        MicroscaleVariableDiffusionOuterBC(MicroscaleVariableDiffusionOuterBCConfig) => MicroscaleDiffusion::variable_outer,
    }
}

define_catalogue! {
    /// Auxiliary evaluators.
    AuxKernelConfig => AuxKernel {
        CoupledSumFunction(CoupledSumFunctionConfig) => LinearCombination::coupled_sum,
        LinearCombination(LinearCombinationConfig) => LinearCombination::linear_combination,
        CoupledRatio(CoupledRatioConfig) => CoupledRatio::new,
        InhibitionProductsAux(InhibitionProductsConfig) => InhibitionProductsAux::new,
        VectorMagnitude(VectorMagnitudeConfig) => VectorMagnitude::new,
        FirstOrderRecycle(FirstOrderRecycleConfig) => FirstOrderRecycle::new,

        LinearChangeInTime(LinearChangeInTimeConfig) => LinearChangeInTime::new,
        TemporalStepFunction(TemporalStepFunctionConfig) => TemporalStepFunction::new,

        GasDensity(GasPropertyConfig) => GasPropertyAux::density,
        GasViscosity(GasPropertyConfig) => GasPropertyAux::viscosity,
        GasHeatCapacity(GasPropertyConfig) => GasPropertyAux::heat_capacity,
        GasThermalConductivity(GasPropertyConfig) => GasPropertyAux::thermal_conductivity,
        GasMolecularDiffusivity(GasSpeciesPropertyConfig) => GasPropertyAux::molecular_diffusivity,
        GasKnudsenDiffusivity(GasPoreDiffusivityConfig) => GasPropertyAux::knudsen_diffusivity,
        GasEffectiveDiffusivity(GasPoreDiffusivityConfig) => GasPropertyAux::effective_diffusivity,
        GasReynoldsNumber(GasFlowConfig) => GasPropertyAux::reynolds_number,
        GasFilmMassTransfer(GasFlowConfig) => GasPropertyAux::film_mass_transfer,

        KozenyCarmanDarcyCoefficient(KozenyCarmanConfig) => DarcyCoefficient::kozeny_carman,
        DarcyWeisbachCoefficient(DarcyWeisbachConfig) => DarcyCoefficient::darcy_weisbach,
        SchloeglDarcyCoefficient(SchloeglDarcyConfig) => DarcyCoefficient::schloegl_darcy,
        SchloeglElectrokineticCoefficient(SchloeglElectrokineticConfig) => DarcyCoefficient::schloegl_electrokinetic,
        HinderedDiffusivity(HinderedDiffusivityConfig) => HinderedDiffusivity::new,
        EffectiveDiffusivity(EffectiveDiffusivityConfig) => EffectiveDiffusivity::new,
        AverageLinearVelocity(AverageLinearVelocityConfig) => AverageLinearVelocity::new,

        ElectrolyteConductivity(ElectrolyteConductivityConfig) => ElectrolyteConductivity::new,
        IonicStrength(IonicStrengthConfig) => IonicStrength::new,
        DaviesActivityCoefficient(DaviesActivityCoefficientConfig) => DaviesActivityCoefficient::new,
        ElectrodeCurrentDensity(ElectrodeCurrentConfig) => ElectrodeCurrentDensity::new,

        MicroscaleIntegralAverage(MicroscaleIntegralConfig) => MicroscaleIntegral::average,
        MicroscaleIntegralTotal(MicroscaleIntegralConfig) => MicroscaleIntegral::total,
    }
}

define_catalogue! {
    /// Integrated boundary conditions.
    BoundaryConditionConfig => Kernel {
        AdvectiveFluxBC(AdvectiveFluxBCConfig) => AdvectiveBoundary::advective_flux,
        PoreAdvectiveFluxBC(AdvectiveFluxBCConfig) => AdvectiveBoundary::pore_advective_flux,
        StepwiseInletBC(StepwiseInletBCConfig) => AdvectiveBoundary::stepwise_inlet,
        FirstOrderRecycleBC(FirstOrderRecycleBCConfig) => AdvectiveBoundary::first_order_recycle,
        HeatTransferBC(HeatTransferBCConfig) => HeatTransferBC::new,
        ConstantFluxBC(ConstantFluxBCConfig) => BoundaryFlux::constant,
        CoupledFluxBC(CoupledFluxBCConfig) => BoundaryFlux::coupled,
    }
}

define_catalogue! {
    /// Initial conditions.
    InitialConditionConfig => InitialCondition {
        ButlerVolmerCurrentDensityIC(CurrentDensityConfig) => ButlerVolmerCurrentDensityIC::new,
        ButlerVolmerRateIC(ButlerVolmerRateConfig) => ButlerVolmerRateIC::new,
        ActivityIC(ActivityConfig) => ActivityIC::new,
        CoupledSumIC(WeightedSumConfig) => CoupledSumIC::new,
    }
}

define_catalogue! {
    /// Interface kernels.
    InterfaceKernelConfig => InterfaceKernel {
        InterfaceLinearTransfer(InterfaceLinearTransferConfig) => InterfaceTransfer::linear,
        InterfaceEnergyTransfer(InterfaceEnergyTransferConfig) => InterfaceTransfer::energy,
        InterfaceHenryLaw(InterfaceHenryLawConfig) => InterfaceTransfer::henry_law,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_kernel(input: &str) -> Result<KernelConfig> {
        KernelConfig::parse(toml::Deserializer::new(input))
    }

    #[test]
    fn test_type_name_matches_tag() {
        let config = parse_kernel(
            r#"
            type = "PoreDiffusion"
            variable = "c"
            porosity = "eps"
            diffusivity = 2.0
            "#,
        )
        .unwrap();
        assert_eq!(config.type_name(), "PoreDiffusion");

        let registry = FieldRegistry::with_fields(["c", "eps"]);
        let kernel = config.build(&registry).unwrap();
        assert_eq!(kernel.name(), "PoreDiffusion");
    }

    #[test]
    fn test_alias_parses_to_canonical_variant() {
        let config = parse_kernel(
            r#"
            type = "GVarPoreDiffusion"
            variable = "c"
            porosity = "eps"
            diffusivity = "d"
            "#,
        )
        .unwrap();
        assert_eq!(config.type_name(), "VarPoreDiffusion");
    }

    #[test]
    fn test_unknown_type_is_deserialize_error() {
        let err = parse_kernel("type = \"NoSuchKernel\"\nvariable = \"c\"").unwrap_err();
        assert!(matches!(err, ConfigurationError::Deserialize(_)));
    }

    #[test]
    fn test_missing_required_key_is_deserialize_error() {
        let err = parse_kernel("type = \"CoupledRatioConstraint\"\nvariable = \"r\"").unwrap_err();
        assert!(matches!(err, ConfigurationError::Deserialize(_)));
    }

    #[test]
    fn test_misspelled_key_is_deserialize_error() {
        let err = parse_kernel(
            r#"
            type = "ArrheniusReaction"
            variable = "u"
            reactants = ["u"]
            reactant_stoich = [1.0]
            products = ["v"]
            product_stoich = [1.0]
            forward_pre_exponential = 1.0
            reverse_pre_exponentail = 5.0
            "#,
        )
        .unwrap_err();
        match err {
            ConfigurationError::Deserialize(message) => {
                assert!(message.contains("reverse_pre_exponentail"), "{message}");
            }
            other => panic!("expected a deserialize error, got {other:?}"),
        }
    }

    #[test]
    fn test_misspelled_nested_key_is_deserialize_error() {
        let err = AuxKernelConfig::parse(toml::Deserializer::new(
            r#"
            type = "GasDensity"
            variable = "rho"
            [gas]
            mole_fractions = [1.0]
            [[gas.species]]
            molar_mass = 28.0
            sutherland_viscosity = 1.663e-5
            sutherland_constant = 107.0
            diffusion_volume = 18.5
            heat_capacity = 1040.0
            heat_capcity = 1.0
            "#,
        ))
        .unwrap_err();
        assert!(matches!(err, ConfigurationError::Deserialize(_)));
    }

    #[test]
    fn test_unknown_field_fails_at_build() {
        let config = parse_kernel(
            r#"
            type = "CoupledRatioConstraint"
            variable = "r"
            numerator = "missing"
            "#,
        )
        .unwrap();
        let registry = FieldRegistry::with_fields(["r"]);
        assert!(matches!(
            config.build(&registry),
            Err(ConfigurationError::UnknownField { .. })
        ));
    }
}
