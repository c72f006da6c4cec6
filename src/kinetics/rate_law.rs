//! Rate-law strategies.
//!
//! A [`RateLaw`] provides the forward and reverse rate constants of a
//! reaction and their derivatives with respect to any coupled field.
//! Inhibited laws divide each constant by its own inhibition factor:
//!
//! k_f,eff = k_f(T) / I_f,   k_r,eff = k_r(T) / I_r

use crate::params::Coupled;
use crate::term::FieldSource;
use crate::types::FieldId;

use super::arrhenius::Arrhenius;

/// Forward/reverse rate-constant strategy.
#[derive(Clone, Debug, PartialEq)]
pub enum RateLaw {
    /// Temperature-independent constants.
    Constant { forward: f64, reverse: f64 },
    /// Independent forward and reverse Arrhenius constants.
    Arrhenius {
        forward: Arrhenius,
        reverse: Arrhenius,
        temperature: Coupled,
    },
    /// Reverse constant derived from the forward one and ΔH, ΔS.
    Equilibrium {
        forward: Arrhenius,
        reverse: Arrhenius,
        temperature: Coupled,
        enthalpy: f64,
        entropy: f64,
    },
    /// Arrhenius constants divided by inhibition factors.
    Inhibited {
        forward: Arrhenius,
        reverse: Arrhenius,
        temperature: Coupled,
        forward_inhibition: Coupled,
        reverse_inhibition: Coupled,
    },
}

impl RateLaw {
    /// Build an equilibrium law from the forward constant and thermodynamics.
    pub fn equilibrium(forward: Arrhenius, temperature: Coupled, enthalpy: f64, entropy: f64) -> Self {
        Self::Equilibrium {
            forward,
            reverse: forward.equilibrium_reverse(enthalpy, entropy),
            temperature,
            enthalpy,
            entropy,
        }
    }

    /// Effective forward rate constant.
    pub fn forward<S: FieldSource>(&self, source: &S) -> f64 {
        match self {
            Self::Constant { forward, .. } => *forward,
            Self::Arrhenius {
                forward,
                temperature,
                ..
            }
            | Self::Equilibrium {
                forward,
                temperature,
                ..
            } => forward.rate(temperature.value(source)),
            Self::Inhibited {
                forward,
                temperature,
                forward_inhibition,
                ..
            } => forward.rate(temperature.value(source)) / forward_inhibition.value(source),
        }
    }

    /// Effective reverse rate constant.
    pub fn reverse<S: FieldSource>(&self, source: &S) -> f64 {
        match self {
            Self::Constant { reverse, .. } => *reverse,
            Self::Arrhenius {
                reverse,
                temperature,
                ..
            }
            | Self::Equilibrium {
                reverse,
                temperature,
                ..
            } => reverse.rate(temperature.value(source)),
            Self::Inhibited {
                reverse,
                temperature,
                reverse_inhibition,
                ..
            } => reverse.rate(temperature.value(source)) / reverse_inhibition.value(source),
        }
    }

    /// Derivative of the effective forward constant with respect to `wrt`.
    pub fn forward_derivative<S: FieldSource>(&self, source: &S, wrt: FieldId) -> f64 {
        match self {
            Self::Constant { .. } => 0.0,
            Self::Arrhenius {
                forward,
                temperature,
                ..
            }
            | Self::Equilibrium {
                forward,
                temperature,
                ..
            } => temperature.indicator(wrt) * forward.rate_derivative(temperature.value(source)),
            Self::Inhibited {
                forward,
                temperature,
                forward_inhibition,
                ..
            } => inhibited_derivative(forward, temperature, forward_inhibition, source, wrt),
        }
    }

    /// Derivative of the effective reverse constant with respect to `wrt`.
    pub fn reverse_derivative<S: FieldSource>(&self, source: &S, wrt: FieldId) -> f64 {
        match self {
            Self::Constant { .. } => 0.0,
            Self::Arrhenius {
                reverse,
                temperature,
                ..
            }
            | Self::Equilibrium {
                reverse,
                temperature,
                ..
            } => temperature.indicator(wrt) * reverse.rate_derivative(temperature.value(source)),
            Self::Inhibited {
                reverse,
                temperature,
                reverse_inhibition,
                ..
            } => inhibited_derivative(reverse, temperature, reverse_inhibition, source, wrt),
        }
    }

    /// Coupled inputs the constants depend on.
    pub fn inputs(&self) -> Vec<Coupled> {
        match self {
            Self::Constant { .. } => Vec::new(),
            Self::Arrhenius { temperature, .. } | Self::Equilibrium { temperature, .. } => {
                vec![*temperature]
            }
            Self::Inhibited {
                temperature,
                forward_inhibition,
                reverse_inhibition,
                ..
            } => vec![*temperature, *forward_inhibition, *reverse_inhibition],
        }
    }
}

fn inhibited_derivative<S: FieldSource>(
    constant: &Arrhenius,
    temperature: &Coupled,
    inhibition: &Coupled,
    source: &S,
    wrt: FieldId,
) -> f64 {
    let t = temperature.value(source);
    let i = inhibition.value(source);
    let k = constant.rate(t);
    temperature.indicator(wrt) * constant.rate_derivative(t) / i
        - inhibition.indicator(wrt) * k / (i * i)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{AuxContext, FieldValue};

    #[test]
    fn test_inhibited_derivatives() {
        let fields = [FieldValue::new(450.0), FieldValue::new(2.5), FieldValue::new(1.5)];
        let t = FieldId::new(0);
        let law = RateLaw::Inhibited {
            forward: Arrhenius::new(5.0, 20000.0),
            reverse: Arrhenius::new(1.0, 30000.0),
            temperature: Coupled::Field(t),
            forward_inhibition: Coupled::Field(FieldId::new(1)),
            reverse_inhibition: Coupled::Field(FieldId::new(2)),
        };

        let h = 1e-5;
        for id in 0..3 {
            let mut plus = fields;
            let mut minus = fields;
            plus[id].value += h;
            minus[id].value -= h;
            let numeric = (law.forward(&AuxContext::new(&plus)) - law.forward(&AuxContext::new(&minus)))
                / (2.0 * h);
            let analytic = law.forward_derivative(&AuxContext::new(&fields), FieldId::new(id));
            assert!(
                (numeric - analytic).abs() <= 1e-6 * analytic.abs().max(1e-12),
                "field {id}: {numeric} vs {analytic}"
            );
        }
    }

    #[test]
    fn test_constant_law_has_no_inputs() {
        let law = RateLaw::Constant {
            forward: 2.0,
            reverse: 1.0,
        };
        let fields = [FieldValue::new(0.0)];
        let ctx = AuxContext::new(&fields);
        assert_eq!(law.forward(&ctx), 2.0);
        assert_eq!(law.reverse(&ctx), 1.0);
        assert!(law.inputs().is_empty());
    }
}
