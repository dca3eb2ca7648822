//! Static ESG scores joined onto the feature table by ticker.

use almeria_traits::{AlmeriaError, Result, Ticker};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Name of the ticker column of an ESG DataFrame.
pub const TICKER_COLUMN: &str = "ticker";

/// Name of the score column of an ESG DataFrame.
pub const SCORE_COLUMN: &str = "esg_score";

/// Mapping from ticker to a scalar ESG score.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EsgTable {
    scores: BTreeMap<Ticker, f64>,
}

impl EsgTable {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from `(ticker, score)` pairs.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::InvalidData`] if a ticker appears twice.
    pub fn from_pairs<I, T>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (T, f64)>,
        T: Into<Ticker>,
    {
        let mut table = Self::new();
        for (ticker, score) in pairs {
            let ticker = ticker.into();
            if table.scores.contains_key(&ticker) {
                return Err(AlmeriaError::InvalidData(format!(
                    "duplicate ESG ticker '{ticker}'"
                )));
            }
            table.scores.insert(ticker, score);
        }
        Ok(table)
    }

    /// Score of a ticker, if present.
    pub fn get(&self, ticker: &str) -> Option<f64> {
        self.scores.get(ticker).copied()
    }

    /// Number of tickers with a score.
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Iterate over `(ticker, score)` pairs sorted by ticker.
    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, f64)> {
        self.scores.iter().map(|(t, s)| (t, *s))
    }

    /// Read a table from a DataFrame with `ticker` and `esg_score` columns.
    ///
    /// Rows with a null ticker or score are skipped.
    ///
    /// # Errors
    ///
    /// Returns an error if a column is missing, has the wrong type, or a
    /// ticker is duplicated.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let tickers = df
            .column(TICKER_COLUMN)
            .map_err(|_| AlmeriaError::MissingColumn(TICKER_COLUMN.to_string()))?;
        let scores = df
            .column(SCORE_COLUMN)
            .map_err(|_| AlmeriaError::MissingColumn(SCORE_COLUMN.to_string()))?
            .cast(&DataType::Float64)?;

        let pairs: Vec<(String, f64)> = tickers
            .as_materialized_series()
            .str()?
            .into_iter()
            .zip(scores.as_materialized_series().f64()?)
            .filter_map(|(t, s)| Some((t?.to_string(), s?)))
            .collect();

        Self::from_pairs(pairs)
    }

    /// Convert the table to a DataFrame with `ticker` and `esg_score` columns.
    ///
    /// # Errors
    ///
    /// Returns an error if polars fails to build the frame.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let tickers: Vec<&str> = self.scores.keys().map(String::as_str).collect();
        let scores: Vec<f64> = self.scores.values().copied().collect();
        Ok(df! {
            TICKER_COLUMN => tickers,
            SCORE_COLUMN => scores,
        }?)
    }
}
