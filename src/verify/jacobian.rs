//! Central-difference Jacobian consistency checks.
//!
//! Perturbing a field's trial-function coefficient by h moves the field's
//! value by h·φ, its gradient by h·∇φ, and its time derivative by
//! h·φ·(du̇/du). The numerical derivative
//!
//! (R(u + h) − R(u − h)) / 2h
//!
//! is compared to the analytic diagonal or off-diagonal entry.

use crate::term::{
    FieldValue, InterfaceContext, InterfaceKernel, JacobianBlock, Kernel, QpContext, Side,
};
use crate::types::FieldId;

/// Tolerances for a Jacobian check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JacobianCheck {
    /// Relative perturbation size
    pub step: f64,
    /// Allowed relative error
    pub rel_tol: f64,
    /// Allowed absolute error, scaled by max(1, |R|)
    pub abs_tol: f64,
}

impl Default for JacobianCheck {
    fn default() -> Self {
        Self {
            step: 1e-6,
            rel_tol: 1e-5,
            abs_tol: 1e-8,
        }
    }
}

impl JacobianCheck {
    fn accepts(&self, analytic: f64, numeric: f64, residual: f64) -> bool {
        let scale = analytic.abs().max(numeric.abs());
        (analytic - numeric).abs() <= self.rel_tol * scale + self.abs_tol * residual.abs().max(1.0)
    }
}

/// One compared entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JacobianEntry {
    /// Field whose trial function was perturbed
    pub jvar: FieldId,
    /// Which block, for interface terms
    pub block: Option<JacobianBlock>,
    pub analytic: f64,
    pub numeric: f64,
    pub passed: bool,
}

/// Result of a Jacobian check.
#[derive(Clone, Debug, Default)]
pub struct JacobianReport {
    pub term: &'static str,
    pub entries: Vec<JacobianEntry>,
}

impl JacobianReport {
    /// Whether every entry matched.
    pub fn passed(&self) -> bool {
        self.entries.iter().all(|e| e.passed)
    }

    /// Entries that did not match.
    pub fn failures(&self) -> impl Iterator<Item = &JacobianEntry> {
        self.entries.iter().filter(|e| !e.passed)
    }

    /// Entry for one field, if checked.
    pub fn entry(&self, jvar: FieldId) -> Option<&JacobianEntry> {
        self.entries.iter().find(|e| e.jvar == jvar)
    }
}

impl std::fmt::Display for JacobianReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}: {} entries", self.term, self.entries.len())?;
        for e in &self.entries {
            writeln!(
                f,
                "  {}{}: analytic {:.10e}, numeric {:.10e}{}",
                e.jvar,
                e.block.map(|b| format!(" {b:?}")).unwrap_or_default(),
                e.analytic,
                e.numeric,
                if e.passed { "" } else { "  MISMATCH" }
            )?;
        }
        Ok(())
    }
}

fn perturb(field: &mut FieldValue, h: f64, ctx: &QpContext) {
    field.value += h * ctx.phi;
    field.gradient += ctx.grad_phi * h;
    field.dot += h * ctx.phi * ctx.du_dot_du;
}

/// Check every field's diagonal or off-diagonal entry of a kernel.
///
/// All fields in the context are checked, so a missing off-diagonal
/// contribution shows up as a mismatch.
pub fn check_kernel(kernel: &dyn Kernel, ctx: &QpContext, check: &JacobianCheck) -> JacobianReport {
    let residual = kernel.compute_qp_residual(ctx);
    let mut plus: Vec<FieldValue> = ctx.fields.to_vec();
    let mut minus: Vec<FieldValue> = ctx.fields.to_vec();

    let mut entries = Vec::with_capacity(ctx.fields.len());
    for jvar in FieldId::iter(ctx.fields.len()) {
        let h = check.step * ctx.fields[jvar].value.abs().max(1.0);
        plus[jvar] = ctx.fields[jvar];
        minus[jvar] = ctx.fields[jvar];
        perturb(&mut plus[jvar], h, ctx);
        perturb(&mut minus[jvar], -h, ctx);

        let r_plus = kernel.compute_qp_residual(&ctx.with_fields(&plus));
        let r_minus = kernel.compute_qp_residual(&ctx.with_fields(&minus));
        let numeric = (r_plus - r_minus) / (2.0 * h);

        let analytic = if jvar == kernel.variable() {
            kernel.compute_qp_jacobian(ctx)
        } else {
            kernel.compute_qp_off_diag_jacobian(ctx, jvar)
        };

        plus[jvar] = ctx.fields[jvar];
        minus[jvar] = ctx.fields[jvar];

        entries.push(JacobianEntry {
            jvar,
            block: None,
            analytic,
            numeric,
            passed: check.accepts(analytic, numeric, residual),
        });
    }

    JacobianReport {
        term: kernel.name(),
        entries,
    }
}

/// Check all four Jacobian blocks of an interface term.
pub fn check_interface_kernel(
    kernel: &dyn InterfaceKernel,
    ctx: &InterfaceContext,
    check: &JacobianCheck,
) -> JacobianReport {
    let mut entries = Vec::with_capacity(4);
    for block in JacobianBlock::ALL {
        let test_side = block.test_side();
        let trial_side = block.trial_side();
        let jvar = match trial_side {
            Side::Element => kernel.variable(),
            Side::Neighbor => kernel.neighbor_variable(),
        };
        let phi = ctx.side_phi(trial_side);
        let base = ctx.side_fields(trial_side);
        let h = check.step * base[jvar].value.abs().max(1.0);

        let mut plus = base.to_vec();
        let mut minus = base.to_vec();
        plus[jvar].value += h * phi;
        minus[jvar].value -= h * phi;

        let (ctx_plus, ctx_minus) = match trial_side {
            Side::Element => (
                InterfaceContext {
                    element_fields: &plus,
                    ..*ctx
                },
                InterfaceContext {
                    element_fields: &minus,
                    ..*ctx
                },
            ),
            Side::Neighbor => (
                InterfaceContext {
                    neighbor_fields: &plus,
                    ..*ctx
                },
                InterfaceContext {
                    neighbor_fields: &minus,
                    ..*ctx
                },
            ),
        };

        let residual = kernel.compute_qp_residual(ctx, test_side);
        let numeric = (kernel.compute_qp_residual(&ctx_plus, test_side)
            - kernel.compute_qp_residual(&ctx_minus, test_side))
            / (2.0 * h);
        let analytic = kernel.compute_qp_jacobian(ctx, block);

        entries.push(JacobianEntry {
            jvar,
            block: Some(block),
            analytic,
            numeric,
            passed: check.accepts(analytic, numeric, residual),
        });
    }

    JacobianReport {
        term: kernel.name(),
        entries,
    }
}
