//! Interface term contract.
//!
//! Interface terms couple a field on one subdomain ("element") to a field
//! on the subdomain across a shared boundary ("neighbor"). The element and
//! neighbor residuals are equal and opposite, so the Jacobian has four
//! blocks with sign flips between the two test sides.

use crate::types::FieldId;

use super::context::{InterfaceContext, JacobianBlock, Side};

/// Trait for interface residual/Jacobian terms.
pub trait InterfaceKernel: Send + Sync {
    /// Name of this term for debugging and logging.
    fn name(&self) -> &'static str;

    /// Primary field on the element side.
    fn variable(&self) -> FieldId;

    /// Primary field on the neighbor side.
    fn neighbor_variable(&self) -> FieldId;

    /// Residual contribution on one side.
    fn compute_qp_residual(&self, ctx: &InterfaceContext, side: Side) -> f64;

    /// One of the four Jacobian blocks.
    fn compute_qp_jacobian(&self, ctx: &InterfaceContext, block: JacobianBlock) -> f64;
}
