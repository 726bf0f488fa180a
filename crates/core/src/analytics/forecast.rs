//! In-sample polynomial trend over monthly revenue.
//!
//! Each month gets an index `0..n`, the index is expanded into the basis
//! `1, x, x², x³` and ordinary least squares is solved through the normal
//! equations. The fitted curve covers the observed months only; nothing is
//! extrapolated.

use crate::domain::report::{ForecastPoint, MonthRevenue};
use anyhow::{ensure, Context, Result};
use ndarray::{Array1, Array2};

pub const FORECAST_DEGREE: usize = 3;

const PIVOT_EPSILON: f64 = 1e-12;

/// Polynomial in a scaled index `t = x / scale`, coefficients in ascending power.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    pub coefficients: Vec<f64>,
    pub scale: f64,
}

impl PolynomialFit {
    pub fn degree(&self) -> usize {
        self.coefficients.len().saturating_sub(1)
    }

    pub fn predict(&self, x: f64) -> f64 {
        let t = x / self.scale;
        self.coefficients.iter().rev().fold(0.0, |acc, c| acc * t + c)
    }
}

/// Fits `values[i]` against `i`. With `n` points the effective degree is
/// `min(degree, n - 1)`, so short series are interpolated exactly instead of
/// being under-determined.
pub fn fit_polynomial(values: &[f64], degree: usize) -> Result<PolynomialFit> {
    ensure!(!values.is_empty(), "cannot fit a polynomial to an empty series");
    ensure!(
        values.iter().all(|v| v.is_finite()),
        "series contains non-finite values"
    );

    let n = values.len();
    let degree = degree.min(n - 1);
    // Map indices onto [0, 1] to keep the normal equations well conditioned.
    let scale = if n > 1 { (n - 1) as f64 } else { 1.0 };

    let design = Array2::from_shape_fn((n, degree + 1), |(i, j)| (i as f64 / scale).powi(j as i32));
    let y = Array1::from_vec(values.to_vec());

    let xtx = design.t().dot(&design);
    let xty = design.t().dot(&y);
    let coefficients = solve(xtx, xty).context("normal equations are singular")?;

    Ok(PolynomialFit {
        coefficients: coefficients.to_vec(),
        scale,
    })
}

/// Gaussian elimination with partial pivoting. Returns `None` for singular systems.
fn solve(mut a: Array2<f64>, mut b: Array1<f64>) -> Option<Array1<f64>> {
    let n = b.len();
    for col in 0..n {
        let pivot = (col..n).max_by(|&i, &j| a[[i, col]].abs().total_cmp(&a[[j, col]].abs()))?;
        if a[[pivot, col]].abs() < PIVOT_EPSILON {
            return None;
        }
        if pivot != col {
            for k in 0..n {
                a.swap([pivot, k], [col, k]);
            }
            b.swap(pivot, col);
        }

        for row in (col + 1)..n {
            let factor = a[[row, col]] / a[[col, col]];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[[row, k]] -= factor * a[[col, k]];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = Array1::<f64>::zeros(n);
    for row in (0..n).rev() {
        let tail: f64 = ((row + 1)..n).map(|k| a[[row, k]] * x[k]).sum();
        x[row] = (b[row] - tail) / a[[row, row]];
    }
    Some(x)
}

/// Pairs each month's actual revenue with the degree-3 in-sample fit.
pub fn forecast_monthly_revenue(months: &[MonthRevenue]) -> Result<Vec<ForecastPoint>> {
    if months.is_empty() {
        return Ok(Vec::new());
    }

    let actuals: Vec<f64> = months.iter().map(|m| m.revenue).collect();
    let fit = fit_polynomial(&actuals, FORECAST_DEGREE)?;

    let points: Vec<ForecastPoint> = months
        .iter()
        .enumerate()
        .map(|(i, m)| ForecastPoint {
            month: m.month.clone(),
            actual: m.revenue,
            fitted: fit.predict(i as f64),
        })
        .collect();

    ensure!(
        points.iter().all(|p| p.fitted.is_finite()),
        "forecast produced non-finite values"
    );

    tracing::debug!(
        months = points.len(),
        degree = fit.degree(),
        "monthly revenue trend fitted"
    );

    Ok(points)
}
