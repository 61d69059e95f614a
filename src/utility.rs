/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
///
/// Accumulates a running mean, so large finite values do not overflow a sum.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut m = 0.0;
    for (i, v) in values.iter().enumerate() {
        m += (v - m) / (i + 1) as f64;
    }
    Some(m)
}

/// Computes the population standard deviation given a pre-computed mean.
/// Returns 0.0 for empty input.
pub fn stddev(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;

    variance.sqrt()
}
