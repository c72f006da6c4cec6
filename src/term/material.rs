//! Material property provider contract.

use super::context::FieldSource;

/// Trait for per-point material property providers.
///
/// A material turns coupled field values into a bundle of derived
/// properties. Auxiliary evaluators read individual properties out of the
/// bundle.
pub trait Material: Send + Sync {
    /// Property bundle produced at one point.
    type Properties;

    /// Name of this material for debugging and logging.
    fn name(&self) -> &'static str;

    /// Compute all properties at one point.
    fn compute_properties<S: FieldSource>(&self, source: &S) -> Self::Properties;
}
