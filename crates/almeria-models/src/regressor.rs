//! Core trait definition for regression models.

use almeria_traits::{AlmeriaError, Result};
use ndarray::{Array1, Array2};
use std::fmt::Debug;

/// A model mapping feature rows to a scalar prediction.
///
/// Implementations must be deterministic given their configuration, which
/// carries any random seed.
pub trait Regressor: Send + Sync + Debug {
    /// Name of the model, used in training reports.
    fn name(&self) -> &str;

    /// Fit the model.
    ///
    /// # Errors
    ///
    /// Returns an error if `x` and `y` disagree in length or the model
    /// cannot be fitted.
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    /// Predict one value per row of `x`.
    ///
    /// # Errors
    ///
    /// Returns an error if the model is not fitted or `x` has the wrong
    /// number of columns.
    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

/// Check that a design matrix and its targets can be fitted.
pub(crate) fn check_fit_input(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() != y.len() {
        return Err(AlmeriaError::ShapeMismatch(format!(
            "{} feature rows for {} targets",
            x.nrows(),
            y.len()
        )));
    }
    if x.nrows() == 0 {
        return Err(AlmeriaError::InsufficientData(
            "cannot fit on an empty dataset".to_string(),
        ));
    }
    Ok(())
}

/// Check that a matrix has the column count a model was fitted on.
pub(crate) fn check_predict_input(x: &Array2<f64>, n_features: usize) -> Result<()> {
    if x.ncols() != n_features {
        return Err(AlmeriaError::ShapeMismatch(format!(
            "model fitted on {n_features} features, got {}",
            x.ncols()
        )));
    }
    Ok(())
}
