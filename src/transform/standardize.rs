//! Population statistics and z-score standardization.

use crate::error::{ChartError, TransformError};

/// Relative tolerance under which a standard deviation counts as zero.
const ZERO_SPREAD: f64 = 1e-12;

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation (ddof = 0).
pub fn population_std(values: &[f64]) -> Option<f64> {
    let mu = mean(values)?;
    let var = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / values.len() as f64;
    Some(var.sqrt())
}

/// `(v − μ) / σ` for every value, σ the population standard deviation.
///
/// An empty column or one with zero spread is a degenerate distribution.
pub fn z_scores(values: &[f64], column: &str) -> Result<Vec<f64>, TransformError> {
    let degenerate = || TransformError::DegenerateDistribution {
        column: column.to_string(),
    };
    let mu = mean(values).ok_or_else(degenerate)?;
    let sigma = population_std(values).ok_or_else(degenerate)?;
    if !sigma.is_finite() || sigma <= ZERO_SPREAD * mu.abs().max(1.0) {
        return Err(degenerate());
    }
    Ok(values.iter().map(|v| (v - mu) / sigma).collect())
}

/// Weighted mean `Σ wᵢvᵢ / Σ wᵢ`, used for colour-scale midpoints.
pub fn weighted_mean(values: &[f64], weights: &[f64], weight_column: &str) -> Result<f64, ChartError> {
    let total: f64 = weights.iter().sum();
    if total == 0.0 || !total.is_finite() {
        return Err(ChartError::ZeroWeight {
            column: weight_column.to_string(),
        });
    }
    let sum: f64 = values.iter().zip(weights).map(|(v, w)| v * w).sum();
    Ok(sum / total)
}
