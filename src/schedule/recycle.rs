//! First-order recycle of an outlet value back to an inlet.
//!
//! dC_in/dt = R·(C_out − C_in), discretized with implicit Euler:
//!
//! C_in = (C_in_old + Δt·R·C_out) / (1 + Δt·R)

/// One implicit-Euler step of the recycle relation.
#[inline]
pub fn first_order_recycle(inlet_old: f64, outlet: f64, rate: f64, dt: f64) -> f64 {
    (inlet_old + dt * rate * outlet) / (1.0 + dt * rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-14;

    #[test]
    fn test_zero_rate_holds_old_value() {
        assert!((first_order_recycle(2.0, 10.0, 0.0, 0.5) - 2.0).abs() < TOL);
    }

    #[test]
    fn test_relaxes_toward_outlet() {
        // (1 + 0.1·2·6) / (1 + 0.2) = 2.2/1.2
        let c = first_order_recycle(1.0, 6.0, 2.0, 0.1);
        assert!((c - 2.2 / 1.2).abs() < TOL);

        let mut c = 0.0;
        for _ in 0..200 {
            c = first_order_recycle(c, 6.0, 2.0, 0.1);
        }
        assert!((c - 6.0).abs() < 1e-6);
    }
}
