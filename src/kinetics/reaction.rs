//! Composed reaction kinetics.
//!
//! rate = k_f · Π C_r^{v_r} − k_r · Π C_p^{v_p}
//!
//! The contribution to a balance equation is `scale · rate`, where the
//! scale is either a plain stoichiometric coefficient (mass balance) or
//! −ΔH · A_o · ε for an energy balance (A_o reactive area per volume,
//! ε volume fraction).

use crate::error::Result;
use crate::params::{check_lengths, power_product, power_product_derivative, Coupled};
use crate::term::FieldSource;
use crate::types::FieldId;

use super::rate_law::RateLaw;

/// Multiplier applied to the reaction rate.
#[derive(Clone, Debug, PartialEq)]
pub enum ScaleFactor {
    /// Mass balance: constant stoichiometric weight.
    Mass { coefficient: f64 },
    /// Energy balance: −ΔH · area ratio · volume fraction.
    Energy {
        enthalpy: f64,
        area_ratio: Coupled,
        volume_fraction: Coupled,
    },
}

impl ScaleFactor {
    /// Scale value at one point.
    #[inline]
    pub fn value<S: FieldSource>(&self, source: &S) -> f64 {
        match self {
            Self::Mass { coefficient } => *coefficient,
            Self::Energy {
                enthalpy,
                area_ratio,
                volume_fraction,
            } => -enthalpy * area_ratio.value(source) * volume_fraction.value(source),
        }
    }

    /// Derivative of the scale with respect to `wrt`.
    pub fn derivative<S: FieldSource>(&self, source: &S, wrt: FieldId) -> f64 {
        match self {
            Self::Mass { .. } => 0.0,
            Self::Energy {
                enthalpy,
                area_ratio,
                volume_fraction,
            } => {
                -enthalpy
                    * (area_ratio.indicator(wrt) * volume_fraction.value(source)
                        + area_ratio.value(source) * volume_fraction.indicator(wrt))
            }
        }
    }

    fn inputs(&self) -> Vec<Coupled> {
        match self {
            Self::Mass { .. } => Vec::new(),
            Self::Energy {
                area_ratio,
                volume_fraction,
                ..
            } => vec![*area_ratio, *volume_fraction],
        }
    }
}

/// Reactants, products, a rate law, and a scale factor.
#[derive(Clone, Debug)]
pub struct ReactionKinetics {
    law: RateLaw,
    scale: ScaleFactor,
    reactants: Vec<Coupled>,
    reactant_stoich: Vec<f64>,
    products: Vec<Coupled>,
    product_stoich: Vec<f64>,
}

impl ReactionKinetics {
    /// Assemble a reaction; stoichiometry lists must match species lists.
    pub fn new(
        object: &'static str,
        law: RateLaw,
        scale: ScaleFactor,
        reactants: Vec<Coupled>,
        reactant_stoich: Vec<f64>,
        products: Vec<Coupled>,
        product_stoich: Vec<f64>,
    ) -> Result<Self> {
        check_lengths(
            object,
            "reactants",
            reactants.len(),
            "reactant_stoich",
            reactant_stoich.len(),
        )?;
        check_lengths(
            object,
            "products",
            products.len(),
            "product_stoich",
            product_stoich.len(),
        )?;
        Ok(Self {
            law,
            scale,
            reactants,
            reactant_stoich,
            products,
            product_stoich,
        })
    }

    /// The rate law.
    pub fn law(&self) -> &RateLaw {
        &self.law
    }

    /// The scale factor.
    pub fn scale(&self) -> &ScaleFactor {
        &self.scale
    }

    /// Net reaction rate (unscaled).
    pub fn rate<S: FieldSource>(&self, source: &S) -> f64 {
        self.law.forward(source) * power_product(&self.reactants, &self.reactant_stoich, source)
            - self.law.reverse(source) * power_product(&self.products, &self.product_stoich, source)
    }

    /// Derivative of [`Self::rate`] with respect to `wrt`.
    pub fn rate_derivative<S: FieldSource>(&self, source: &S, wrt: FieldId) -> f64 {
        let pf = power_product(&self.reactants, &self.reactant_stoich, source);
        let pr = power_product(&self.products, &self.product_stoich, source);
        let dpf = power_product_derivative(&self.reactants, &self.reactant_stoich, source, wrt);
        let dpr = power_product_derivative(&self.products, &self.product_stoich, source, wrt);

        self.law.forward_derivative(source, wrt) * pf + self.law.forward(source) * dpf
            - self.law.reverse_derivative(source, wrt) * pr
            - self.law.reverse(source) * dpr
    }

    /// Scaled rate: scale · rate.
    pub fn scaled_rate<S: FieldSource>(&self, source: &S) -> f64 {
        self.scale.value(source) * self.rate(source)
    }

    /// Derivative of [`Self::scaled_rate`] with respect to `wrt`.
    pub fn scaled_rate_derivative<S: FieldSource>(&self, source: &S, wrt: FieldId) -> f64 {
        self.scale.derivative(source, wrt) * self.rate(source)
            + self.scale.value(source) * self.rate_derivative(source, wrt)
    }

    /// Every coupled input the scaled rate depends on.
    pub fn inputs(&self) -> Vec<Coupled> {
        let mut all = self.law.inputs();
        all.extend(self.scale.inputs());
        all.extend(self.reactants.iter().copied());
        all.extend(self.products.iter().copied());
        all
    }
}
