//! Coupled inputs: fields or constants.
//!
//! Most coefficients of a term may be bound to another field or held at a
//! constant. The configuration form ([`CoupledInput`]) is a name or a
//! number; the resolved form ([`Coupled`]) is a field index or a number.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::term::FieldSource;
use crate::types::FieldId;

/// Configuration form of a coupled input.
///
/// Deserializes from either a number (constant) or a string (field name).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoupledInput {
    /// Constant value
    Constant(f64),
    /// Name of a field known to the host
    Field(String),
}

impl From<f64> for CoupledInput {
    fn from(value: f64) -> Self {
        Self::Constant(value)
    }
}

impl From<&str> for CoupledInput {
    fn from(name: &str) -> Self {
        Self::Field(name.to_string())
    }
}

impl From<String> for CoupledInput {
    fn from(name: String) -> Self {
        Self::Field(name)
    }
}

/// Resolved coupled input.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Coupled {
    /// Bound to a field
    Field(FieldId),
    /// Held constant
    Constant(f64),
}

impl Coupled {
    /// Current value.
    #[inline]
    pub fn value<S: FieldSource>(&self, source: &S) -> f64 {
        match *self {
            Self::Field(id) => source.field(id).value,
            Self::Constant(c) => c,
        }
    }

    /// Value at the previous step.
    #[inline]
    pub fn old<S: FieldSource>(&self, source: &S) -> f64 {
        match *self {
            Self::Field(id) => source.field(id).old,
            Self::Constant(c) => c,
        }
    }

    /// Time derivative (zero for constants).
    #[inline]
    pub fn dot<S: FieldSource>(&self, source: &S) -> f64 {
        match *self {
            Self::Field(id) => source.field(id).dot,
            Self::Constant(_) => 0.0,
        }
    }

    /// Spatial gradient (zero for constants).
    #[inline]
    pub fn gradient<S: FieldSource>(&self, source: &S) -> Vector3<f64> {
        match *self {
            Self::Field(id) => source.field(id).gradient,
            Self::Constant(_) => Vector3::zeros(),
        }
    }

    /// Field index, if bound to a field.
    #[inline]
    pub fn id(&self) -> Option<FieldId> {
        match *self {
            Self::Field(id) => Some(id),
            Self::Constant(_) => None,
        }
    }

    /// Whether this input is bound to `jvar`.
    #[inline]
    pub fn is(&self, jvar: FieldId) -> bool {
        matches!(*self, Self::Field(id) if id == jvar)
    }

    /// Indicator 1.0 if bound to `jvar`, else 0.0.
    #[inline]
    pub fn indicator(&self, jvar: FieldId) -> f64 {
        if self.is(jvar) {
            1.0
        } else {
            0.0
        }
    }
}

/// Product of coupled values.
#[inline]
pub fn product<S: FieldSource>(factors: &[Coupled], source: &S) -> f64 {
    factors.iter().map(|f| f.value(source)).product()
}

/// Derivative of [`product`] with respect to the value of `wrt`.
///
/// A field appearing several times contributes once per occurrence.
pub fn product_derivative<S: FieldSource>(factors: &[Coupled], source: &S, wrt: FieldId) -> f64 {
    let mut total = 0.0;
    for (i, factor) in factors.iter().enumerate() {
        if !factor.is(wrt) {
            continue;
        }
        let others: f64 = factors
            .iter()
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, f)| f.value(source))
            .product();
        total += others;
    }
    total
}

/// Product of coupled values raised to per-factor powers: Π cᵢ^pᵢ.
#[inline]
pub fn power_product<S: FieldSource>(factors: &[Coupled], powers: &[f64], source: &S) -> f64 {
    factors
        .iter()
        .zip(powers)
        .map(|(f, p)| f.value(source).powf(*p))
        .product()
}

/// Derivative of [`power_product`] with respect to the value of `wrt`.
pub fn power_product_derivative<S: FieldSource>(
    factors: &[Coupled],
    powers: &[f64],
    source: &S,
    wrt: FieldId,
) -> f64 {
    let mut total = 0.0;
    for (i, (factor, power)) in factors.iter().zip(powers).enumerate() {
        if !factor.is(wrt) || *power == 0.0 {
            continue;
        }
        let c = factor.value(source);
        let others: f64 = factors
            .iter()
            .zip(powers)
            .enumerate()
            .filter(|(j, _)| *j != i)
            .map(|(_, (f, p))| f.value(source).powf(*p))
            .product();
        total += power * c.powf(power - 1.0) * others;
    }
    total
}

/// Collect the distinct field ids among `inputs`, excluding `variable`.
pub fn collect_coupled<'a, I>(variable: FieldId, inputs: I) -> Vec<FieldId>
where
    I: IntoIterator<Item = &'a Coupled>,
{
    let mut ids: Vec<FieldId> = inputs
        .into_iter()
        .filter_map(|c| c.id())
        .filter(|id| *id != variable)
        .collect();
    ids.sort();
    ids.dedup();
    ids
}
