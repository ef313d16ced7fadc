use serde::Serialize;

use crate::error::TrendError;

/// First-degree least-squares fit over observation index `0..n`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendLine {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub fitted: Vec<f64>,
}

impl TrendLine {
    pub fn predict(&self, x: f64) -> f64 {
        self.intercept + self.slope * x
    }
}

/// Fits `y = intercept + slope * i` with `i` the position in `values`, not
/// elapsed time, so irregular dates are spaced one step apart.
///
/// A single value yields a flat line through it.
pub fn fit_trend(values: &[f64]) -> Result<TrendLine, TrendError> {
    if values.is_empty() {
        return Err(TrendError::EmptySeries);
    }
    if let Some((index, &value)) = values.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(TrendError::NonFiniteValue { index, value });
    }

    let n = values.len();
    if n == 1 {
        return Ok(TrendLine {
            slope: 0.0,
            intercept: values[0],
            r_squared: 1.0,
            fitted: vec![values[0]],
        });
    }

    // Centred sums keep the fit stable when the mean is large.
    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        sxx += dx * dx;
        sxy += dx * (y - y_mean);
    }

    let slope = sxy / sxx;
    let intercept = y_mean - slope * x_mean;
    let fitted: Vec<f64> = (0..n).map(|i| intercept + slope * i as f64).collect();

    let ss_tot: f64 = values.iter().map(|y| (y - y_mean).powi(2)).sum();
    let ss_res: f64 = values
        .iter()
        .zip(&fitted)
        .map(|(y, f)| (y - f).powi(2))
        .sum();
    let r_squared = if ss_tot == 0.0 {
        1.0
    } else {
        1.0 - ss_res / ss_tot
    };

    Ok(TrendLine {
        slope,
        intercept,
        r_squared,
        fitted,
    })
}
