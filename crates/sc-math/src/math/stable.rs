//! Numerically stable primitives for log-domain probability math.

/// Stable ln(exp(a) + exp(b)).
pub fn log_add_exp(a: f64, b: f64) -> f64 {
    if a.is_nan() || b.is_nan() {
        return f64::NAN;
    }
    if a == f64::NEG_INFINITY {
        return b;
    }
    if b == f64::NEG_INFINITY {
        return a;
    }
    if a == f64::INFINITY || b == f64::INFINITY {
        return f64::INFINITY;
    }
    let m = a.max(b);
    let diff = (a - b).abs();
    m + (-diff).exp().ln_1p()
}

/// Softplus: ln(1 + exp(x)), without overflow for large x.
///
/// Equivalent to `log_add_exp(0, x)`. Always non-negative and >= x.
pub fn softplus(x: f64) -> f64 {
    log_add_exp(0.0, x)
}

/// `x * log_y` where `log_y` is already in the log domain, with the
/// convention `0 * ln(0) = 0`.
///
/// Callers pass a stable log-probability instead of a probability that may
/// have underflowed to zero, so the product stays finite.
pub fn x_times_log(x: f64, log_y: f64) -> f64 {
    if x.is_nan() || log_y.is_nan() {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    x * log_y
}
