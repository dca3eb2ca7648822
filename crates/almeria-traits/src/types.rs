//! Common types used throughout the almeria workspace.
//!
//! This module defines the date and ticker aliases and the [`Panel`], the
//! date-indexed table with one column per ticker that every feature is
//! computed from.

use crate::{AlmeriaError, Result};
use polars::prelude::*;

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A ticker identifier such as `"AAPL"`.
///
/// Tickers are carried as structured values everywhere in the pipeline, so a
/// ticker containing `_` is as valid as any other.
pub type Ticker = String;

/// Days between 0001-01-01 (chrono's day 1) and the Unix epoch used by polars.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Name of the date column when a panel is converted to a DataFrame.
pub const DATE_COLUMN: &str = "Date";

/// A date-indexed table with one column per ticker.
///
/// Prices and volumes are both represented as panels. Missing observations
/// are stored as `f64::NAN`.
///
/// # Invariants
///
/// - dates are strictly increasing (sorted, no duplicates)
/// - tickers are unique
/// - every column has exactly one value per date
///
/// # Example
///
/// ```
/// use almeria_traits::{Date, Panel};
///
/// let dates = vec![
///     Date::from_ymd_opt(2024, 1, 2).unwrap(),
///     Date::from_ymd_opt(2024, 1, 3).unwrap(),
/// ];
/// let panel = Panel::new(
///     dates,
///     vec!["AAPL".to_string()],
///     vec![vec![185.6, 184.3]],
/// )
/// .unwrap();
///
/// assert_eq!(panel.len(), 2);
/// assert_eq!(panel.column("AAPL"), Some(&[185.6, 184.3][..]));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    dates: Vec<Date>,
    tickers: Vec<Ticker>,
    columns: Vec<Vec<f64>>,
}

impl Panel {
    /// Creates a panel, validating the shape and ordering invariants.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::ShapeMismatch`] if the number of columns does
    /// not match the number of tickers or a column length differs from the
    /// number of dates, and [`AlmeriaError::InvalidData`] if dates are not
    /// strictly increasing or a ticker is duplicated.
    pub fn new(dates: Vec<Date>, tickers: Vec<Ticker>, columns: Vec<Vec<f64>>) -> Result<Self> {
        if tickers.len() != columns.len() {
            return Err(AlmeriaError::ShapeMismatch(format!(
                "{} tickers but {} columns",
                tickers.len(),
                columns.len()
            )));
        }

        for (ticker, column) in tickers.iter().zip(&columns) {
            if column.len() != dates.len() {
                return Err(AlmeriaError::ShapeMismatch(format!(
                    "column '{ticker}' has {} values for {} dates",
                    column.len(),
                    dates.len()
                )));
            }
        }

        if let Some(pair) = dates.windows(2).find(|w| w[0] >= w[1]) {
            return Err(AlmeriaError::InvalidData(format!(
                "dates must be strictly increasing, found {} followed by {}",
                pair[0], pair[1]
            )));
        }

        for (i, ticker) in tickers.iter().enumerate() {
            if tickers[..i].contains(ticker) {
                return Err(AlmeriaError::InvalidData(format!(
                    "duplicate ticker '{ticker}'"
                )));
            }
        }

        Ok(Self {
            dates,
            tickers,
            columns,
        })
    }

    /// Returns the date index.
    pub fn dates(&self) -> &[Date] {
        &self.dates
    }

    /// Returns the tickers in column order.
    pub fn tickers(&self) -> &[Ticker] {
        &self.tickers
    }

    /// Returns the number of dates (rows).
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Returns whether the panel has no rows.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Returns the number of tickers (columns).
    pub fn n_tickers(&self) -> usize {
        self.tickers.len()
    }

    /// Gets the values of one ticker, or `None` if the ticker is absent.
    pub fn column(&self, ticker: &str) -> Option<&[f64]> {
        self.tickers
            .iter()
            .position(|t| t == ticker)
            .map(|i| self.columns[i].as_slice())
    }

    /// Iterates over `(ticker, values)` pairs in column order.
    pub fn iter(&self) -> impl Iterator<Item = (&Ticker, &[f64])> {
        self.tickers
            .iter()
            .zip(self.columns.iter().map(Vec::as_slice))
    }

    /// Applies `f` to every column, keeping the date index and tickers.
    ///
    /// `f` must return exactly one value per input value.
    pub fn map_columns<F>(&self, mut f: F) -> Self
    where
        F: FnMut(&[f64]) -> Vec<f64>,
    {
        let columns: Vec<Vec<f64>> = self.columns.iter().map(|c| f(c)).collect();
        debug_assert!(columns.iter().all(|c| c.len() == self.dates.len()));
        Self {
            dates: self.dates.clone(),
            tickers: self.tickers.clone(),
            columns,
        }
    }

    /// Builds a panel from a DataFrame with a date column and one numeric
    /// column per ticker.
    ///
    /// The date column may be a polars `Date`, `Datetime` or a `YYYY-MM-DD`
    /// string column. Null values become `NaN`.
    ///
    /// # Errors
    ///
    /// Returns an error if the date column is missing or unparseable, a value
    /// column is not numeric, or the panel invariants are violated.
    pub fn from_dataframe(df: &DataFrame, date_column: &str) -> Result<Self> {
        let dates_col = df
            .column(date_column)
            .map_err(|_| AlmeriaError::MissingColumn(date_column.to_string()))?;
        let dates = column_to_dates(dates_col)?;

        let mut tickers = Vec::new();
        let mut columns = Vec::new();
        for column in df.get_columns() {
            if column.name().as_str() == date_column {
                continue;
            }
            let values = column.cast(&DataType::Float64)?;
            let values: Vec<f64> = values
                .as_materialized_series()
                .f64()?
                .into_iter()
                .map(|v| v.unwrap_or(f64::NAN))
                .collect();
            tickers.push(column.name().to_string());
            columns.push(values);
        }

        Self::new(dates, tickers, columns)
    }

    /// Converts the panel to a DataFrame with a `Date` column followed by one
    /// column per ticker. `NaN` values become nulls.
    ///
    /// # Errors
    ///
    /// Returns an error if polars fails to build the frame.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns = Vec::with_capacity(self.tickers.len() + 1);
        columns.push(dates_to_column(DATE_COLUMN, &self.dates)?);
        for (ticker, values) in self.iter() {
            let values: Vec<Option<f64>> =
                values.iter().map(|v| (!v.is_nan()).then_some(*v)).collect();
            columns.push(Column::new(ticker.as_str().into(), values));
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Converts a polars day count (days since 1970-01-01) to a [`Date`].
pub fn date_from_epoch_days(days: i32) -> Option<Date> {
    Date::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Converts a [`Date`] to a polars day count (days since 1970-01-01).
pub fn date_to_epoch_days(date: Date) -> i32 {
    use chrono::Datelike;
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Builds a polars `Date` column from a slice of dates.
///
/// # Errors
///
/// Returns an error if polars rejects the cast.
pub fn dates_to_column(name: &str, dates: &[Date]) -> Result<Column> {
    let days: Vec<i32> = dates.iter().map(|d| date_to_epoch_days(*d)).collect();
    let series = Series::new(name.into(), days).cast(&DataType::Date)?;
    Ok(series.into_column())
}

/// Reads a polars column holding dates into a vector of [`Date`]s.
///
/// # Errors
///
/// Returns [`AlmeriaError::InvalidDate`] on nulls or unparseable strings.
pub fn column_to_dates(column: &Column) -> Result<Vec<Date>> {
    match column.dtype() {
        DataType::String => column
            .as_materialized_series()
            .str()?
            .into_iter()
            .map(|s| {
                let s = s.ok_or_else(|| AlmeriaError::InvalidDate("null date".to_string()))?;
                Date::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d")
                    .map_err(|e| AlmeriaError::InvalidDate(format!("'{s}': {e}")))
            })
            .collect(),
        DataType::Date | DataType::Datetime(_, _) => {
            let days = column.cast(&DataType::Date)?.cast(&DataType::Int32)?;
            days.as_materialized_series()
                .i32()?
                .into_iter()
                .map(|d| {
                    d.and_then(date_from_epoch_days)
                        .ok_or_else(|| AlmeriaError::InvalidDate("null date".to_string()))
                })
                .collect()
        }
        other => Err(AlmeriaError::InvalidDate(format!(
            "unsupported date column type {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn sample() -> Panel {
        Panel::new(
            vec![d(2), d(3), d(4)],
            vec!["A".to_string(), "B_X".to_string()],
            vec![vec![1.0, 2.0, 3.0], vec![10.0, f64::NAN, 30.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_panel_new() {
        let panel = sample();
        assert_eq!(panel.len(), 3);
        assert_eq!(panel.n_tickers(), 2);
        assert!(!panel.is_empty());
        assert_eq!(panel.column("A"), Some(&[1.0, 2.0, 3.0][..]));
        assert!(panel.column("C").is_none());
    }

    #[test]
    fn test_panel_rejects_ragged_columns() {
        let err = Panel::new(vec![d(2), d(3)], vec!["A".to_string()], vec![vec![1.0]]);
        assert!(matches!(err, Err(AlmeriaError::ShapeMismatch(_))));

        let err = Panel::new(vec![d(2)], vec!["A".to_string()], vec![]);
        assert!(matches!(err, Err(AlmeriaError::ShapeMismatch(_))));
    }

    #[test]
    fn test_panel_rejects_unsorted_or_duplicate_dates() {
        let err = Panel::new(vec![d(3), d(2)], vec!["A".to_string()], vec![vec![1.0, 2.0]]);
        assert!(matches!(err, Err(AlmeriaError::InvalidData(_))));

        let err = Panel::new(vec![d(2), d(2)], vec!["A".to_string()], vec![vec![1.0, 2.0]]);
        assert!(matches!(err, Err(AlmeriaError::InvalidData(_))));
    }

    #[test]
    fn test_panel_rejects_duplicate_tickers() {
        let err = Panel::new(
            vec![d(2)],
            vec!["A".to_string(), "A".to_string()],
            vec![vec![1.0], vec![2.0]],
        );
        assert!(matches!(err, Err(AlmeriaError::InvalidData(_))));
    }

    #[test]
    fn test_map_columns_keeps_index() {
        let doubled = sample().map_columns(|c| c.iter().map(|v| v * 2.0).collect());
        assert_eq!(doubled.dates(), sample().dates());
        assert_eq!(doubled.column("A"), Some(&[2.0, 4.0, 6.0][..]));
    }

    #[test]
    fn test_epoch_day_conversion() {
        let epoch = Date::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(date_to_epoch_days(epoch), 0);
        assert_eq!(date_from_epoch_days(0), Some(epoch));
        assert_eq!(date_from_epoch_days(date_to_epoch_days(d(15))), Some(d(15)));
    }

    #[test]
    fn test_dataframe_conversion() {
        let panel = sample();
        let df = panel.to_dataframe().unwrap();
        assert_eq!(df.width(), 3);
        assert_eq!(df.height(), 3);
        assert_eq!(df.column("B_X").unwrap().null_count(), 1);

        let back = Panel::from_dataframe(&df, DATE_COLUMN).unwrap();
        assert_eq!(back.dates(), panel.dates());
        assert_eq!(back.tickers(), panel.tickers());
        assert_eq!(back.column("A"), panel.column("A"));
        assert!(back.column("B_X").unwrap()[1].is_nan());
    }

    #[test]
    fn test_from_dataframe_with_string_dates() {
        let df = df! {
            "Date" => &["2024-01-02", "2024-01-03"],
            "MSFT" => &[370.0, 371.5],
        }
        .unwrap();

        let panel = Panel::from_dataframe(&df, "Date").unwrap();
        assert_eq!(panel.dates(), &[d(2), d(3)]);
        assert_eq!(panel.column("MSFT"), Some(&[370.0, 371.5][..]));
    }

    #[test]
    fn test_from_dataframe_missing_date_column() {
        let df = df! { "MSFT" => &[370.0] }.unwrap();
        assert!(matches!(
            Panel::from_dataframe(&df, "Date"),
            Err(AlmeriaError::MissingColumn(_))
        ));
    }
}
