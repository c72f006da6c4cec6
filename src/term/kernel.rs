//! Local term evaluator contract for volumetric kernels and integrated
//! boundary conditions.

use crate::types::FieldId;

use super::context::QpContext;

/// Trait for local residual/Jacobian terms.
///
/// Integrated boundary conditions implement this trait too; their context
/// carries the outward normal.
///
/// The host calls these once per (quadrature point, test function, trial
/// function) and accumulates the results into the global residual and
/// Jacobian. Evaluation never mutates the term, so one instance may be
/// shared across assembly threads (`Send + Sync`).
pub trait Kernel: Send + Sync {
    /// Name of this term for debugging and logging.
    fn name(&self) -> &'static str;

    /// The primary field this term contributes to.
    fn variable(&self) -> FieldId;

    /// Residual contribution at one point for the current test function.
    fn compute_qp_residual(&self, ctx: &QpContext) -> f64;

    /// Derivative of the residual with respect to the primary field's
    /// trial function.
    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64;

    /// Derivative of the residual with respect to another field's trial
    /// function.
    ///
    /// Returns 0 for fields that do not appear in the residual. Never
    /// called with `jvar == self.variable()`.
    fn compute_qp_off_diag_jacobian(&self, _ctx: &QpContext, _jvar: FieldId) -> f64 {
        0.0
    }

    /// Fields (other than the primary) that may have a nonzero
    /// off-diagonal contribution.
    fn coupled_fields(&self) -> Vec<FieldId> {
        Vec::new()
    }
}

/// Sum of several kernels acting on the same primary field.
///
/// # Example
/// ```ignore
/// let accumulation = CoefTimeDerivative::new(cfg_a, &registry)?;
/// let diffusion = TensorDiffusion::variable_laplacian(cfg_b, &registry)?;
/// let combined = CombinedKernel::new(vec![&accumulation, &diffusion]);
/// ```
pub struct CombinedKernel<'a> {
    kernels: Vec<&'a dyn Kernel>,
}

impl<'a> CombinedKernel<'a> {
    /// Create a new combined kernel from a list of kernels.
    pub fn new(kernels: Vec<&'a dyn Kernel>) -> Self {
        Self { kernels }
    }

    /// Add a kernel to the combination.
    pub fn add(&mut self, kernel: &'a dyn Kernel) {
        self.kernels.push(kernel);
    }

    /// Number of kernels in the combination.
    pub fn len(&self) -> usize {
        self.kernels.len()
    }

    /// Whether the combination is empty.
    pub fn is_empty(&self) -> bool {
        self.kernels.is_empty()
    }
}

impl Kernel for CombinedKernel<'_> {
    fn name(&self) -> &'static str {
        "combined"
    }

    fn variable(&self) -> FieldId {
        self.kernels
            .first()
            .map(|k| k.variable())
            .unwrap_or(FieldId::ZERO)
    }

    fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
        self.kernels.iter().map(|k| k.compute_qp_residual(ctx)).sum()
    }

    fn compute_qp_jacobian(&self, ctx: &QpContext) -> f64 {
        self.kernels.iter().map(|k| k.compute_qp_jacobian(ctx)).sum()
    }

    fn compute_qp_off_diag_jacobian(&self, ctx: &QpContext, jvar: FieldId) -> f64 {
        self.kernels
            .iter()
            .map(|k| k.compute_qp_off_diag_jacobian(ctx, jvar))
            .sum()
    }

    fn coupled_fields(&self) -> Vec<FieldId> {
        let mut ids: Vec<FieldId> = self
            .kernels
            .iter()
            .flat_map(|k| k.coupled_fields())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::FieldValue;

    struct ConstantKernel {
        value: f64,
        coupled: FieldId,
    }

    impl Kernel for ConstantKernel {
        fn name(&self) -> &'static str {
            "constant"
        }

        fn variable(&self) -> FieldId {
            FieldId::new(0)
        }

        fn compute_qp_residual(&self, ctx: &QpContext) -> f64 {
            self.value * ctx.test
        }

        fn compute_qp_jacobian(&self, _ctx: &QpContext) -> f64 {
            0.0
        }

        fn coupled_fields(&self) -> Vec<FieldId> {
            vec![self.coupled]
        }
    }

    #[test]
    fn test_combined_residual() {
        let k1 = ConstantKernel {
            value: 1.0,
            coupled: FieldId::new(2),
        };
        let k2 = ConstantKernel {
            value: 0.5,
            coupled: FieldId::new(1),
        };
        let combined = CombinedKernel::new(vec![&k1, &k2]);

        let fields = [FieldValue::new(0.0)];
        let ctx = QpContext::new(&fields).with_test(2.0, Default::default());

        assert!((combined.compute_qp_residual(&ctx) - 3.0).abs() < 1e-14);
        assert_eq!(combined.len(), 2);
        assert_eq!(
            combined.coupled_fields(),
            vec![FieldId::new(1), FieldId::new(2)]
        );
    }

    #[test]
    fn test_empty_combined() {
        let combined = CombinedKernel::new(vec![]);
        let fields = [FieldValue::new(0.0)];
        let ctx = QpContext::new(&fields);
        assert!(combined.is_empty());
        assert_eq!(combined.compute_qp_residual(&ctx), 0.0);
    }
}
