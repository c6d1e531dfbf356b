//! Slice helpers: min(), max(), mean()

/// Largest element, `-inf` for an empty slice.
pub fn max(vec: &[f64]) -> f64 {
    vec.iter().cloned().fold(f64::NEG_INFINITY, f64::max)
}

/// Smallest element, `+inf` for an empty slice.
pub fn min(vec: &[f64]) -> f64 {
    vec.iter().cloned().fold(f64::INFINITY, f64::min)
}

/// Arithmetic mean, `NaN` for an empty slice.
pub fn mean(vec: &[f64]) -> f64 {
    if vec.is_empty() {
        return f64::NAN;
    }
    vec.iter().sum::<f64>() / vec.len() as f64
}
