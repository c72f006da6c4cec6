//! Batched evaluation of local terms.
//!
//! The host assembles global vectors and matrices; this module only
//! evaluates one term over many prepared contexts and collects the
//! per-point contributions. With the `parallel` feature the batch is split
//! across threads by rayon. Results are identical to the serial path.

use crate::term::{AuxContext, AuxKernel, Kernel, QpContext};
use crate::types::FieldId;

/// Residual and Jacobian contributions of one term at one point.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LocalContribution {
    pub residual: f64,
    /// Derivative with respect to the term's own variable
    pub jacobian: f64,
    /// Derivatives with respect to each coupled field
    pub off_diagonal: Vec<(FieldId, f64)>,
}

impl LocalContribution {
    /// Off-diagonal entry for `jvar`, zero when the term does not couple to it.
    pub fn off_diagonal(&self, jvar: FieldId) -> f64 {
        self.off_diagonal
            .iter()
            .find(|(id, _)| *id == jvar)
            .map_or(0.0, |(_, value)| *value)
    }
}

/// Evaluate one term at one point.
pub fn evaluate(kernel: &dyn Kernel, ctx: &QpContext) -> LocalContribution {
    evaluate_with(kernel, ctx, &kernel.coupled_fields())
}

fn evaluate_with(kernel: &dyn Kernel, ctx: &QpContext, coupled: &[FieldId]) -> LocalContribution {
    LocalContribution {
        residual: kernel.compute_qp_residual(ctx),
        jacobian: kernel.compute_qp_jacobian(ctx),
        off_diagonal: coupled
            .iter()
            .map(|&jvar| (jvar, kernel.compute_qp_off_diag_jacobian(ctx, jvar)))
            .collect(),
    }
}

/// Evaluate one term over a batch of points.
pub fn evaluate_batch(kernel: &dyn Kernel, contexts: &[QpContext]) -> Vec<LocalContribution> {
    let coupled = kernel.coupled_fields();
    contexts
        .iter()
        .map(|ctx| evaluate_with(kernel, ctx, &coupled))
        .collect()
}

/// Parallel version of [`evaluate_batch`].
#[cfg(feature = "parallel")]
pub fn evaluate_batch_parallel(
    kernel: &dyn Kernel,
    contexts: &[QpContext],
) -> Vec<LocalContribution> {
    use rayon::prelude::*;

    let coupled = kernel.coupled_fields();
    contexts
        .par_iter()
        .map(|ctx| evaluate_with(kernel, ctx, &coupled))
        .collect()
}

/// Sum of residuals over a batch, e.g. for a quick consistency check.
pub fn total_residual(kernel: &dyn Kernel, contexts: &[QpContext]) -> f64 {
    contexts.iter().map(|ctx| kernel.compute_qp_residual(ctx)).sum()
}

/// Evaluate an auxiliary term over a batch of points.
pub fn evaluate_aux_batch(aux: &dyn AuxKernel, contexts: &[AuxContext]) -> Vec<f64> {
    contexts.iter().map(|ctx| aux.compute_value(ctx)).collect()
}

/// Parallel version of [`evaluate_aux_batch`].
#[cfg(feature = "parallel")]
pub fn evaluate_aux_batch_parallel(aux: &dyn AuxKernel, contexts: &[AuxContext]) -> Vec<f64> {
    use rayon::prelude::*;

    contexts.par_iter().map(|ctx| aux.compute_value(ctx)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernels::{ConstMassTransferConfig, VolumetricTransfer};
    use crate::params::FieldRegistry;
    use crate::term::FieldValue;

    const TOL: f64 = 1e-14;

    fn transfer() -> VolumetricTransfer {
        let reg = FieldRegistry::with_fields(["u", "v"]);
        VolumetricTransfer::const_mass(
            ConstMassTransferConfig {
                variable: "u".into(),
                coupled: "v".into(),
                transfer_rate: 2.0,
            },
            &reg,
        )
        .unwrap()
    }

    fn states() -> Vec<[FieldValue; 2]> {
        (0..16)
            .map(|i| [FieldValue::new(i as f64), FieldValue::new(1.0 + 0.5 * i as f64)])
            .collect()
    }

    #[test]
    fn test_single_point() {
        let kernel = transfer();
        let fields = [FieldValue::new(1.0), FieldValue::new(3.0)];
        let c = evaluate(&kernel, &QpContext::new(&fields));
        // R = −km·(v − u) = −4, J = km, OD = −km
        assert!((c.residual + 4.0).abs() < TOL);
        assert!((c.jacobian - 2.0).abs() < TOL);
        assert!((c.off_diagonal(FieldId::new(1)) + 2.0).abs() < TOL);
        assert_eq!(c.off_diagonal(FieldId::new(0)), 0.0);
    }

    #[test]
    fn test_batch_matches_pointwise() {
        let kernel = transfer();
        let states = states();
        let contexts: Vec<_> = states.iter().map(|f| QpContext::new(f)).collect();
        let batch = evaluate_batch(&kernel, &contexts);
        assert_eq!(batch.len(), contexts.len());
        for (ctx, c) in contexts.iter().zip(&batch) {
            assert_eq!(*c, evaluate(&kernel, ctx));
        }
        let sum: f64 = batch.iter().map(|c| c.residual).sum();
        assert!((sum - total_residual(&kernel, &contexts)).abs() < 1e-12);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_serial() {
        let kernel = transfer();
        let states = states();
        let contexts: Vec<_> = states.iter().map(|f| QpContext::new(f)).collect();
        assert_eq!(
            evaluate_batch(&kernel, &contexts),
            evaluate_batch_parallel(&kernel, &contexts)
        );
    }
}
