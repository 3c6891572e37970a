//! Small statistics helpers shared by the runners and the analytics engine.
//!
//! All helpers return `None` on empty input rather than producing `NaN`.

/// Standard median: the middle element for odd lengths, the mean of the two middle elements
/// for even lengths.
pub fn calculate_median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(statistical::median(values))
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(statistical::mean(values))
    }
}

/// `part / whole * 100`.
pub fn percentage(part: usize, whole: usize) -> Option<f64> {
    if whole == 0 {
        None
    } else {
        Some(part as f64 / whole as f64 * 100.)
    }
}
