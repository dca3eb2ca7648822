//! The tidy feature table handed to modeling code.

use crate::{
    esg::{EsgTable, SCORE_COLUMN},
    feature::Feature,
    frame::PivotedFeatures,
};
use almeria_traits::{
    AlmeriaError, Date, Result, Ticker,
    types::{column_to_dates, dates_to_column},
};
use polars::prelude::*;

/// Name of the date column of the output table.
pub const DATE_COLUMN: &str = "Date";

/// Name of the ticker column of the output table.
pub const TICKER_COLUMN: &str = "Ticker";

/// One `(date, ticker)` observation of the tidy table.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyRow {
    /// Observation date
    pub date: Date,
    /// Ticker
    pub ticker: Ticker,
    /// Feature values, aligned with [`TidyFeatureTable::features`]
    pub values: Vec<f64>,
    /// Joined ESG score; `None` when the ticker has no score
    pub esg_score: Option<f64>,
}

/// Tidy feature table: one row per `(date, ticker)`, one column per feature.
///
/// Columns are `Date`, `Ticker`, the features in canonical order and, when an
/// ESG table was supplied, `esg_score`. Rows are sorted by date, then ticker.
/// Feature values are never missing; only `esg_score` may be undefined.
#[derive(Debug, Clone, PartialEq)]
pub struct TidyFeatureTable {
    features: Vec<Feature>,
    has_esg: bool,
    rows: Vec<TidyRow>,
}

impl TidyFeatureTable {
    /// Build the table from pivoted features.
    ///
    /// `features` is sorted into canonical order. Observations that lack a
    /// feature, or hold a missing value for one, are dropped. When `esg` is
    /// given its scores are left-joined by ticker.
    pub fn from_pivot(
        mut features: Vec<Feature>,
        pivoted: PivotedFeatures,
        esg: Option<&EsgTable>,
    ) -> Self {
        features.sort();
        features.dedup();

        let rows = pivoted
            .into_iter()
            .filter_map(|((date, ticker), map)| {
                let values = features
                    .iter()
                    .map(|f| map.get(f).copied().filter(|v| !v.is_nan()))
                    .collect::<Option<Vec<f64>>>()?;
                let esg_score = esg.and_then(|table| table.get(&ticker));
                Some(TidyRow {
                    date,
                    ticker,
                    values,
                    esg_score,
                })
            })
            .collect();

        Self {
            features,
            has_esg: esg.is_some(),
            rows,
        }
    }

    /// Feature columns in canonical order.
    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    /// Whether the table carries an `esg_score` column.
    pub const fn has_esg(&self) -> bool {
        self.has_esg
    }

    /// All column names in output order.
    pub fn column_names(&self) -> Vec<String> {
        let mut names = Vec::with_capacity(self.features.len() + 3);
        names.push(DATE_COLUMN.to_string());
        names.push(TICKER_COLUMN.to_string());
        names.extend(self.features.iter().map(Feature::name));
        if self.has_esg {
            names.push(SCORE_COLUMN.to_string());
        }
        names
    }

    /// Rows sorted by date, then ticker.
    pub fn rows(&self) -> &[TidyRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `feature` in `row`, or `None` if the feature is not a column.
    pub fn value(&self, row: &TidyRow, feature: Feature) -> Option<f64> {
        self.features
            .iter()
            .position(|f| *f == feature)
            .map(|i| row.values[i])
    }

    /// Row for a `(date, ticker)` observation.
    pub fn row(&self, date: Date, ticker: &str) -> Option<&TidyRow> {
        self.rows
            .binary_search_by(|r| (r.date, r.ticker.as_str()).cmp(&(date, ticker)))
            .ok()
            .map(|i| &self.rows[i])
    }

    /// Distinct tickers in sorted order.
    pub fn tickers(&self) -> Vec<Ticker> {
        let mut tickers: Vec<Ticker> = self.rows.iter().map(|r| r.ticker.clone()).collect();
        tickers.sort();
        tickers.dedup();
        tickers
    }

    /// Distinct dates in ascending order.
    pub fn dates(&self) -> Vec<Date> {
        let mut dates: Vec<Date> = self.rows.iter().map(|r| r.date).collect();
        dates.dedup();
        dates
    }

    /// Convert to a polars DataFrame with the output column order.
    ///
    /// `Date` is a polars `Date`, `Ticker` a string, features are `f64` and
    /// `esg_score` a nullable `f64`.
    ///
    /// # Errors
    ///
    /// Returns an error if polars fails to build the frame.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let dates: Vec<Date> = self.rows.iter().map(|r| r.date).collect();
        let tickers: Vec<&str> = self.rows.iter().map(|r| r.ticker.as_str()).collect();

        let mut columns = Vec::with_capacity(self.features.len() + 3);
        columns.push(dates_to_column(DATE_COLUMN, &dates)?);
        columns.push(Column::new(TICKER_COLUMN.into(), tickers));
        for (i, feature) in self.features.iter().enumerate() {
            let values: Vec<f64> = self.rows.iter().map(|r| r.values[i]).collect();
            columns.push(Column::new(feature.name().as_str().into(), values));
        }
        if self.has_esg {
            let scores: Vec<Option<f64>> = self.rows.iter().map(|r| r.esg_score).collect();
            columns.push(Column::new(SCORE_COLUMN.into(), scores));
        }

        Ok(DataFrame::new(columns)?)
    }

    /// Read a table back from a DataFrame written by
    /// [`TidyFeatureTable::to_dataframe`].
    ///
    /// Columns may come in any order; they are put back into canonical order.
    /// Rows with a missing feature value are dropped.
    ///
    /// # Errors
    ///
    /// Returns an error if `Date` or `Ticker` is missing, a column name is
    /// not a known feature, or a feature appears twice.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let column = |name: &str| {
            df.column(name)
                .map_err(|_| AlmeriaError::MissingColumn(name.to_string()))
        };
        let dates = column_to_dates(column(DATE_COLUMN)?)?;
        let tickers: Vec<Option<String>> = column(TICKER_COLUMN)?
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|t| t.map(str::to_string))
            .collect();

        let mut features: Vec<(Feature, Vec<f64>)> = Vec::new();
        let mut scores: Option<Vec<Option<f64>>> = None;
        for col in df.get_columns() {
            let name = col.name().as_str();
            if name == DATE_COLUMN || name == TICKER_COLUMN {
                continue;
            }
            let values = col.cast(&DataType::Float64)?;
            let values = values.as_materialized_series().f64()?;
            if name == SCORE_COLUMN {
                scores = Some(values.into_iter().collect());
                continue;
            }
            let feature: Feature = name.parse()?;
            if features.iter().any(|(f, _)| *f == feature) {
                return Err(AlmeriaError::InvalidData(format!(
                    "duplicate feature column '{name}'"
                )));
            }
            features.push((
                feature,
                values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
            ));
        }
        features.sort_by_key(|(feature, _)| *feature);

        let mut rows = Vec::with_capacity(dates.len());
        for (i, (date, ticker)) in dates.into_iter().zip(tickers).enumerate() {
            let Some(ticker) = ticker else {
                continue;
            };
            let values: Vec<f64> = features.iter().map(|(_, values)| values[i]).collect();
            if values.iter().any(|v| v.is_nan()) {
                continue;
            }
            rows.push(TidyRow {
                date,
                ticker,
                values,
                esg_score: scores.as_ref().and_then(|s| s[i]),
            });
        }
        rows.sort_by(|a, b| (a.date, &a.ticker).cmp(&(b.date, &b.ticker)));

        Ok(Self {
            features: features.into_iter().map(|(feature, _)| feature).collect(),
            has_esg: scores.is_some(),
            rows,
        })
    }
}
