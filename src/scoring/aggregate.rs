//! Score aggregation helpers

/// Sequences shorter than this are averaged without trimming
pub const TRIM_MIN_LEN: usize = 4;

/// Arithmetic mean; `None` for an empty slice
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Trimmed mean: with four or more values, the single lowest and single
/// highest value are dropped before averaging. Ties at either extreme only
/// lose one occurrence. Shorter sequences fall back to the plain mean and
/// an empty sequence has no score.
pub fn trimmed_mean(values: &[f64]) -> Option<f64> {
    if values.len() < TRIM_MIN_LEN {
        return mean(values);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    mean(&sorted[1..sorted.len() - 1])
}
