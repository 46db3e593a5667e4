/// Descriptive statistics over a whole series.

/// Summary of a non-empty series of values.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryStats {
    pub count: usize,
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator); `None` for a single value.
    pub std_dev: Option<f64>,
}

impl SummaryStats {
    /// Returns `None` for an empty slice, so callers never divide by zero
    /// or report a min/max of nothing.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let count = values.len();
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mean = values.iter().sum::<f64>() / count as f64;

        let std_dev = (count > 1).then(|| {
            let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
            (sum_sq / (count - 1) as f64).sqrt()
        });

        // Floating-point summation can push the mean a hair outside the
        // observed range for near-constant series.
        Some(Self {
            count,
            max,
            min,
            mean: mean.clamp(min, max),
            std_dev,
        })
    }
}

/// Rounds to two decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
