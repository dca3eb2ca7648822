//! Ordinary least squares.

use crate::regressor::{Regressor, check_fit_input, check_predict_input};
use almeria_traits::{AlmeriaError, Result};
use ndarray::{Array1, Array2, Axis};

/// Ridge term added to the normal equations' diagonal, relative to its
/// average entry.
const DIAGONAL_JITTER: f64 = 1e-10;

/// Largest relative ridge term tried on rank-deficient designs.
const MAX_DIAGONAL_JITTER: f64 = 1e-4;

/// Linear regression with an intercept, fitted by solving the normal
/// equations `X'X b = X'y` with a Cholesky factorization.
///
/// The data are centered first, so the intercept is recovered as
/// `mean(y) - mean(X) . b`.
#[derive(Debug, Clone, Default)]
pub struct LinearRegression {
    coefficients: Option<Array1<f64>>,
    intercept: f64,
}

impl LinearRegression {
    /// Create an unfitted model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fitted coefficients, one per feature.
    pub fn coefficients(&self) -> Option<&Array1<f64>> {
        self.coefficients.as_ref()
    }

    /// Fitted intercept.
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }
}

impl Regressor for LinearRegression {
    fn name(&self) -> &str {
        "LinearRegression"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_fit_input(x, y)?;
        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| AlmeriaError::InsufficientData("empty design matrix".into()))?;
        let y_mean = y.mean().unwrap_or(0.0);
        let xc = x - &x_mean;
        let yc = y - y_mean;

        let xtx = xc.t().dot(&xc);
        let xty = xc.t().dot(&yc);
        let beta = solve_normal_equations(&xtx, &xty)?;

        self.intercept = y_mean - x_mean.dot(&beta);
        self.coefficients = Some(beta);
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let beta = self
            .coefficients
            .as_ref()
            .ok_or_else(|| AlmeriaError::Model("linear regression is not fitted".into()))?;
        check_predict_input(x, beta.len())?;
        Ok(x.dot(beta) + self.intercept)
    }
}

/// Solve the normal equations, raising the ridge term until the system is
/// positive definite.
fn solve_normal_equations(xtx: &Array2<f64>, xty: &Array1<f64>) -> Result<Array1<f64>> {
    let n = xtx.nrows();
    let average_diagonal = (xtx.diag().sum() / n.max(1) as f64).max(1.0);
    let mut jitter = DIAGONAL_JITTER;
    loop {
        let mut regularized = xtx.clone();
        for i in 0..n {
            regularized[[i, i]] += jitter * average_diagonal;
        }
        match cholesky_solve(&regularized, xty) {
            Ok(beta) => return Ok(beta),
            Err(e) if jitter >= MAX_DIAGONAL_JITTER => return Err(e),
            Err(_) => {
                tracing::debug!(jitter, "normal equations singular, increasing ridge term");
                jitter *= 100.0;
            }
        }
    }
}

/// Solve `A x = b` for symmetric positive definite `A`.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Result<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    // A = L * L^T
    for i in 0..n {
        for j in 0..=i {
            let sum: f64 = (0..j).map(|k| l[[i, k]] * l[[j, k]]).sum();
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= 0.0 {
                    return Err(AlmeriaError::Model(
                        "normal equations are not positive definite".to_string(),
                    ));
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // L z = b
    let mut z = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * z[j]).sum();
        z[i] = (b[i] - sum) / l[[i, i]];
    }

    // L^T x = z
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = (i + 1..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (z[i] - sum) / l[[i, i]];
    }

    Ok(x)
}
