//! Regression scores.

use almeria_traits::{AlmeriaError, Result};
use ndarray::Array1;

fn check_lengths(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<()> {
    if y_true.len() != y_pred.len() {
        return Err(AlmeriaError::ShapeMismatch(format!(
            "{} targets for {} predictions",
            y_true.len(),
            y_pred.len()
        )));
    }
    if y_true.is_empty() {
        return Err(AlmeriaError::InsufficientData(
            "cannot score an empty prediction".to_string(),
        ));
    }
    Ok(())
}

/// Mean of squared residuals.
///
/// # Errors
///
/// Returns an error if the arrays differ in length or are empty.
pub fn mean_squared_error(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let sse: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    Ok(sse / y_true.len() as f64)
}

/// Coefficient of determination, `1 - SS_res / SS_tot`.
///
/// A constant target scores 1 when predicted exactly and 0 otherwise.
///
/// # Errors
///
/// Returns an error if the arrays differ in length or are empty.
pub fn r2_score(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true, y_pred)?;
    let mean = y_true.mean().unwrap_or(0.0);
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();
    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(t, p)| (t - p).powi(2))
        .sum();

    if ss_tot == 0.0 {
        return Ok(if ss_res == 0.0 { 1.0 } else { 0.0 });
    }
    Ok(1.0 - ss_res / ss_tot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    fn test_mse() {
        let mse = mean_squared_error(&array![1.0, 2.0, 3.0], &array![1.0, 3.0, 5.0]).unwrap();
        assert_relative_eq!(mse, 5.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_r2() {
        let y = array![1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(r2_score(&y, &y).unwrap(), 1.0);

        let mean = Array1::from_elem(4, 2.5);
        assert_relative_eq!(r2_score(&y, &mean).unwrap(), 0.0);

        let off = array![2.0, 3.0, 4.0, 5.0];
        // SS_res = 4, SS_tot = 5
        assert_relative_eq!(r2_score(&y, &off).unwrap(), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_constant_target() {
        let y = array![2.0, 2.0];
        assert_eq!(r2_score(&y, &y).unwrap(), 1.0);
        assert_eq!(r2_score(&y, &array![1.0, 2.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_length_mismatch() {
        assert!(mean_squared_error(&array![1.0], &array![1.0, 2.0]).is_err());
        assert!(r2_score(&array![], &array![]).is_err());
    }
}
