//! Per-column standardization.

use almeria_traits::{AlmeriaError, Result, stats::MIN_STD_THRESHOLD};
use ndarray::{Array1, Array2, Axis};

/// Standardizes columns to zero mean and unit variance.
///
/// Uses the population standard deviation. Columns whose deviation is below
/// [`MIN_STD_THRESHOLD`] are only centered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StandardScaler {
    mean: Option<Array1<f64>>,
    scale: Option<Array1<f64>>,
}

impl StandardScaler {
    /// Create an unfitted scaler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Learn column means and deviations.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::InsufficientData`] if `x` has no rows.
    pub fn fit(&mut self, x: &Array2<f64>) -> Result<()> {
        let mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| AlmeriaError::InsufficientData("cannot scale an empty matrix".into()))?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|s| if s < MIN_STD_THRESHOLD { 1.0 } else { s });
        self.mean = Some(mean);
        self.scale = Some(scale);
        Ok(())
    }

    /// Apply the learned transformation.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::Model`] if the scaler is not fitted and
    /// [`AlmeriaError::ShapeMismatch`] if the column count differs.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        let (Some(mean), Some(scale)) = (&self.mean, &self.scale) else {
            return Err(AlmeriaError::Model("scaler is not fitted".to_string()));
        };
        if x.ncols() != mean.len() {
            return Err(AlmeriaError::ShapeMismatch(format!(
                "scaler fitted on {} columns, got {}",
                mean.len(),
                x.ncols()
            )));
        }
        Ok((x - mean) / scale)
    }

    /// Fit on `x` and transform it.
    ///
    /// # Errors
    ///
    /// See [`StandardScaler::fit`].
    pub fn fit_transform(&mut self, x: &Array2<f64>) -> Result<Array2<f64>> {
        self.fit(x)?;
        self.transform(x)
    }

    /// Learned column means.
    pub fn mean(&self) -> Option<&Array1<f64>> {
        self.mean.as_ref()
    }

    /// Learned column scales.
    pub fn scale(&self) -> Option<&Array1<f64>> {
        self.scale.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_fit_transform() {
        let x = array![[1.0, 5.0], [3.0, 5.0], [5.0, 5.0]];
        let mut scaler = StandardScaler::new();
        let z = scaler.fit_transform(&x).unwrap();

        let std = (8.0_f64 / 3.0).sqrt();
        assert_abs_diff_eq!(z[[0, 0]], -2.0 / std, epsilon = 1e-12);
        assert_abs_diff_eq!(z[[2, 0]], 2.0 / std, epsilon = 1e-12);
        // constant column is centered only
        assert!(z.column(1).iter().all(|v| *v == 0.0));
        assert_eq!(scaler.scale().unwrap()[1], 1.0);
    }

    #[test]
    fn test_transform_requires_fit() {
        let x = array![[1.0]];
        assert!(StandardScaler::new().transform(&x).is_err());
    }

    #[test]
    fn test_column_mismatch() {
        let mut scaler = StandardScaler::new();
        scaler.fit(&array![[1.0, 2.0]]).unwrap();
        assert!(scaler.transform(&array![[1.0]]).is_err());
    }
}
