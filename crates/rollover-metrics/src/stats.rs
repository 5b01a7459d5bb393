//! Metric rounding.

/// Decimal places kept in every published metric.
pub const METRIC_DECIMALS: i32 = 4;

/// Round half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}

/// Round a published metric to [`METRIC_DECIMALS`] places.
pub fn round_metric(value: Option<f64>) -> Option<f64> {
    value.map(|v| round_to(v, METRIC_DECIMALS))
}
