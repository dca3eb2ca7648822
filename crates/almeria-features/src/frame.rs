//! Wide and long intermediate shapes of the feature pipeline.
//!
//! A [`FeatureFrame`] is the wide shape: one shared date index and one
//! column per [`FeatureKey`]. [`FeatureFrame::melt`] turns it into long
//! [`LongRecord`]s and [`pivot`] regroups those by `(date, ticker)`.

use crate::feature::{Feature, FeatureKey};
use almeria_traits::{AlmeriaError, Date, Result, Ticker};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

/// One derived column of the wide frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    /// Ticker and feature of the column
    pub key: FeatureKey,
    /// One value per date of the owning frame
    pub values: Vec<f64>,
}

/// One observation of the long shape.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    /// Observation date
    pub date: Date,
    /// Ticker and feature of the value
    pub key: FeatureKey,
    /// Feature value
    pub value: f64,
}

/// Features of one `(date, ticker)` observation.
pub type FeatureMap = BTreeMap<Feature, f64>;

/// Long records grouped by `(date, ticker)`, sorted by date then ticker.
pub type PivotedFeatures = BTreeMap<(Date, Ticker), FeatureMap>;

/// Wide table of feature columns sharing one date index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureFrame {
    dates: Vec<Date>,
    columns: Vec<FeatureColumn>,
}

impl FeatureFrame {
    /// Create an empty frame over the given date index.
    #[must_use]
    pub const fn new(dates: Vec<Date>) -> Self {
        Self {
            dates,
            columns: Vec::new(),
        }
    }

    /// Append a column.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::ShapeMismatch`] if the column length differs
    /// from the date index and [`AlmeriaError::InvalidData`] if the key is
    /// already present.
    pub fn push(&mut self, key: FeatureKey, values: Vec<f64>) -> Result<()> {
        if values.len() != self.dates.len() {
            return Err(AlmeriaError::ShapeMismatch(format!(
                "column {key} has {} values for {} dates",
                values.len(),
                self.dates.len()
            )));
        }
        if self.columns.iter().any(|c| c.key == key) {
            return Err(AlmeriaError::InvalidData(format!("duplicate column {key}")));
        }
        self.columns.push(FeatureColumn { key, values });
        Ok(())
    }

    /// Date index of the frame.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Columns of the frame in insertion order.
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Set of features present in the frame, in canonical order.
    pub fn features(&self) -> BTreeSet<Feature> {
        self.columns.iter().map(|c| c.key.feature).collect()
    }

    /// Concatenate frames column-wise, aligned on the union of their dates.
    ///
    /// A date missing from one frame leaves that frame's columns missing on
    /// that row.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::InvalidData`] if two frames share a key.
    pub fn concat(frames: Vec<Self>) -> Result<Self> {
        let dates: Vec<Date> = frames
            .iter()
            .flat_map(|f| f.dates.iter().copied())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let position: HashMap<Date, usize> =
            dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();

        let mut seen = HashSet::new();
        let mut columns = Vec::with_capacity(frames.iter().map(Self::width).sum());
        for frame in frames {
            let rows: Vec<usize> = frame.dates.iter().map(|d| position[d]).collect();
            for column in frame.columns {
                if !seen.insert(column.key.clone()) {
                    return Err(AlmeriaError::InvalidData(format!(
                        "duplicate column {}",
                        column.key
                    )));
                }
                let mut values = vec![f64::NAN; dates.len()];
                for (row, value) in rows.iter().zip(column.values) {
                    values[*row] = value;
                }
                columns.push(FeatureColumn {
                    key: column.key,
                    values,
                });
            }
        }

        Ok(Self { dates, columns })
    }

    /// Keep only the rows where every column holds a value.
    ///
    /// A single missing value anywhere removes the whole date.
    #[must_use]
    pub fn drop_incomplete_rows(&self) -> Self {
        let keep: Vec<usize> = (0..self.dates.len())
            .filter(|&row| self.columns.iter().all(|c| !c.values[row].is_nan()))
            .collect();

        Self {
            dates: keep.iter().map(|&row| self.dates[row]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| FeatureColumn {
                    key: c.key.clone(),
                    values: keep.iter().map(|&row| c.values[row]).collect(),
                })
                .collect(),
        }
    }

    /// Reshape to long form: one record per `(date, column)`.
    #[must_use]
    pub fn melt(&self) -> Vec<LongRecord> {
        let mut records = Vec::with_capacity(self.dates.len() * self.columns.len());
        for column in &self.columns {
            for (date, value) in self.dates.iter().zip(&column.values) {
                records.push(LongRecord {
                    date: *date,
                    key: column.key.clone(),
                    value: *value,
                });
            }
        }
        records
    }
}

/// Group long records by `(date, ticker)` into one feature map each.
///
/// When the same `(date, ticker, feature)` appears twice, the later record
/// wins.
pub fn pivot(records: impl IntoIterator<Item = LongRecord>) -> PivotedFeatures {
    let mut pivoted = PivotedFeatures::new();
    for record in records {
        pivoted
            .entry((record.date, record.key.ticker))
            .or_default()
            .insert(record.key.feature, record.value);
    }
    pivoted
}
