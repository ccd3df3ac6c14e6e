//! Chart rendering abstractions

use crate::config::Fund;
use crate::core::series::Series;

/// Scales every value by the sequence maximum so price and share amount
/// share one 0..=1 axis. Display-only transform, never persisted.
pub fn normalized(values: &[f64]) -> Vec<f64> {
    let max = values.iter().copied().fold(0.0_f64, f64::max);
    if max <= 0.0 {
        return vec![0.0; values.len()];
    }
    values.iter().map(|v| v / max).collect()
}

pub trait ChartRenderer {
    /// Renders a fund's merged series. Read-only consumer; the series is
    /// already persisted by the time it arrives here.
    fn render(&self, fund: &Fund, series: &Series);
}
