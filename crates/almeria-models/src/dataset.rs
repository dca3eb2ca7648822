//! Design matrices built from the tidy feature table.

use almeria_features::{Feature, TidyFeatureTable, esg::SCORE_COLUMN, returns::forward_return_series};
use almeria_traits::{AlmeriaError, Date, Result, Ticker};
use ndarray::{Array1, Array2, Axis};
use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use std::collections::BTreeMap;

/// Feature matrix, forward-return targets and the observation behind each row.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Column names of `features`
    pub feature_names: Vec<String>,
    /// One row per observation
    pub features: Array2<f64>,
    /// Forward return of each observation
    pub targets: Array1<f64>,
    /// `(date, ticker)` of each row
    pub keys: Vec<(Date, Ticker)>,
}

impl Dataset {
    /// Number of observations.
    pub fn n_samples(&self) -> usize {
        self.features.nrows()
    }

    /// Number of feature columns.
    pub fn n_features(&self) -> usize {
        self.features.ncols()
    }

    /// Whether the dataset has no observations.
    pub fn is_empty(&self) -> bool {
        self.n_samples() == 0
    }

    /// Subset of the rows, in the given order.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            features: self.features.select(Axis(0), indices),
            targets: self.targets.select(Axis(0), indices),
            keys: indices.iter().map(|&i| self.keys[i].clone()).collect(),
        }
    }
}

/// Build a dataset predicting the `horizon`-row forward return of price.
///
/// The target of a row is `price[t + horizon] / price[t] - 1`, where `t`
/// steps through the same ticker's rows in date order. Features are every
/// feature column of the table, followed by `esg_score` when present. Rows
/// without a target or without an ESG score are dropped.
///
/// # Errors
///
/// Returns [`AlmeriaError::MissingColumn`] if the table has no `price`
/// column and [`AlmeriaError::InvalidData`] if `horizon` is zero.
pub fn prepare_ml_data(table: &TidyFeatureTable, horizon: usize) -> Result<Dataset> {
    if horizon == 0 {
        return Err(AlmeriaError::InvalidData(
            "target horizon must be positive".to_string(),
        ));
    }
    let price = table
        .features()
        .iter()
        .position(|f| *f == Feature::Price)
        .ok_or_else(|| AlmeriaError::MissingColumn("price".to_string()))?;

    // Rows are sorted by date, so each ticker's rows are already in date order
    let mut by_ticker: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, row) in table.rows().iter().enumerate() {
        by_ticker.entry(row.ticker.as_str()).or_default().push(i);
    }
    let mut targets = vec![f64::NAN; table.len()];
    for rows in by_ticker.values() {
        let prices: Vec<f64> = rows.iter().map(|&i| table.rows()[i].values[price]).collect();
        for (&i, target) in rows.iter().zip(forward_return_series(&prices, horizon)) {
            targets[i] = target;
        }
    }

    let mut feature_names: Vec<String> = table.features().iter().map(|f| f.name()).collect();
    if table.has_esg() {
        feature_names.push(SCORE_COLUMN.to_string());
    }
    let width = feature_names.len();

    let mut values = Vec::new();
    let mut kept_targets = Vec::new();
    let mut keys = Vec::new();
    for (row, target) in table.rows().iter().zip(targets) {
        if !target.is_finite() {
            continue;
        }
        let esg = if table.has_esg() {
            let Some(score) = row.esg_score else {
                continue;
            };
            Some(score)
        } else {
            None
        };
        values.extend_from_slice(&row.values);
        values.extend(esg);
        kept_targets.push(target);
        keys.push((row.date, row.ticker.clone()));
    }

    let features = Array2::from_shape_vec((kept_targets.len(), width), values)
        .map_err(|e| AlmeriaError::ShapeMismatch(e.to_string()))?;
    tracing::debug!(
        rows = features.nrows(),
        features = width,
        horizon,
        "prepared dataset"
    );

    Ok(Dataset {
        feature_names,
        features,
        targets: Array1::from(kept_targets),
        keys,
    })
}

/// Shuffle the rows with a seeded generator and split off a test set.
///
/// The test set holds `ceil(test_size * n)` rows.
///
/// # Errors
///
/// Returns [`AlmeriaError::InvalidData`] if `test_size` is not in `(0, 1)`
/// and [`AlmeriaError::InsufficientData`] if either side would be empty.
pub fn train_test_split(dataset: &Dataset, test_size: f64, seed: u64) -> Result<(Dataset, Dataset)> {
    if test_size.is_nan() || test_size <= 0.0 || test_size >= 1.0 {
        return Err(AlmeriaError::InvalidData(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }
    let n = dataset.n_samples();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(AlmeriaError::InsufficientData(format!(
            "cannot split {n} rows with test_size {test_size}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    indices.shuffle(&mut rng);
    let (test, train) = indices.split_at(n_test);

    Ok((dataset.select(train), dataset.select(test)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use almeria_features::{EsgTable, assemble};
    use almeria_traits::Panel;
    use approx::assert_relative_eq;

    fn table(with_esg: bool) -> TidyFeatureTable {
        let start = Date::from_ymd_opt(2023, 3, 1).unwrap();
        let dates: Vec<Date> = start.iter_days().take(60).collect();
        let a: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let b: Vec<f64> = (0..60).map(|i| 50.0 + (i as f64 * 0.2).sin()).collect();
        let prices = Panel::new(dates, vec!["A".into(), "B".into()], vec![a, b]).unwrap();
        let esg = EsgTable::from_pairs([("A", 0.6)]).unwrap();
        assemble(&prices, None, with_esg.then_some(&esg)).unwrap()
    }

    #[test]
    fn test_targets_follow_ticker_rows() {
        let table = table(false);
        let dataset = prepare_ml_data(&table, 1).unwrap();

        // 11 rows per ticker, the last row of each has no target
        assert_eq!(dataset.n_samples(), 20);
        assert_eq!(dataset.n_features(), table.features().len());
        let (date, ticker) = &dataset.keys[0];
        assert_eq!(ticker, "A");
        let first = table.row(*date, ticker).unwrap();
        let price = first.values[0];
        assert_relative_eq!(dataset.targets[0], (price + 1.0) / price - 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_missing_esg_rows_dropped() {
        let dataset = prepare_ml_data(&table(true), 1).unwrap();
        assert_eq!(dataset.feature_names.last().unwrap(), "esg_score");
        assert!(dataset.keys.iter().all(|(_, t)| t == "A"));
        assert_eq!(dataset.n_samples(), 10);
        assert!(dataset.features.column(dataset.n_features() - 1).iter().all(|v| *v == 0.6));
    }

    #[test]
    fn test_zero_horizon_rejected() {
        assert!(prepare_ml_data(&table(false), 0).is_err());
    }

    #[test]
    fn test_split_is_seeded_and_disjoint() {
        let dataset = prepare_ml_data(&table(false), 1).unwrap();
        let (train, test) = train_test_split(&dataset, 0.2, 42).unwrap();
        assert_eq!(test.n_samples(), 4);
        assert_eq!(train.n_samples(), 16);
        assert!(test.keys.iter().all(|k| !train.keys.contains(k)));

        let (train2, test2) = train_test_split(&dataset, 0.2, 42).unwrap();
        assert_eq!(train, train2);
        assert_eq!(test, test2);
    }

    #[test]
    fn test_split_rejects_bad_size() {
        let dataset = prepare_ml_data(&table(false), 1).unwrap();
        assert!(train_test_split(&dataset, 0.0, 1).is_err());
        assert!(train_test_split(&dataset, 1.0, 1).is_err());
    }
}
