//! Auxiliary evaluator and initial-condition contracts.

use crate::types::FieldId;

use super::context::AuxContext;

/// Trait for auxiliary (derived-quantity) evaluators.
///
/// Auxiliary evaluators compute a value directly instead of contributing
/// to a residual. Most are pure functions of the context; the temporal
/// evaluators document their own state handling.
pub trait AuxKernel: Send + Sync {
    /// Name of this evaluator for debugging and logging.
    fn name(&self) -> &'static str;

    /// The auxiliary field this evaluator writes.
    fn variable(&self) -> FieldId;

    /// Compute the auxiliary value at one point.
    fn compute_value(&self, ctx: &AuxContext) -> f64;
}

/// Trait for initial conditions.
///
/// Evaluated once per node before time stepping starts. Nonlinear
/// algebraic couplings ship a parameter-mirrored initial condition that
/// evaluates the same relation, so the first Newton solve starts from a
/// consistent state.
pub trait InitialCondition: Send + Sync {
    /// Name of this initial condition for debugging and logging.
    fn name(&self) -> &'static str;

    /// The field this initial condition sets.
    fn variable(&self) -> FieldId;

    /// Initial value at one point.
    fn value(&self, ctx: &AuxContext) -> f64;
}
