//! CSV persistence of panels, ESG tables and feature tables.

use crate::Result;
use almeria_features::{EsgTable, TidyFeatureTable};
use almeria_traits::{Panel, types::DATE_COLUMN};
use polars::prelude::*;
use std::{fs::File, path::Path};

fn read_csv(path: &Path) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

/// Read a panel from a CSV with a `Date` column and one column per ticker.
///
/// # Errors
///
/// Returns an error if the file cannot be read or violates the panel
/// invariants.
pub fn read_panel_csv(path: impl AsRef<Path>) -> Result<Panel> {
    let df = read_csv(path.as_ref())?;
    Ok(Panel::from_dataframe(&df, DATE_COLUMN)?)
}

/// Write a panel as CSV: `Date` followed by one column per ticker.
///
/// Missing values are written as empty fields.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_panel_csv(panel: &Panel, path: impl AsRef<Path>) -> Result<()> {
    write_csv(&mut panel.to_dataframe()?, path.as_ref())
}

/// Read an ESG table from a CSV with `ticker` and `esg_score` columns.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a column is missing, or a
/// ticker is duplicated.
pub fn read_esg_csv(path: impl AsRef<Path>) -> Result<EsgTable> {
    let df = read_csv(path.as_ref())?;
    Ok(EsgTable::from_dataframe(&df)?)
}

/// Write an ESG table as CSV.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_esg_csv(table: &EsgTable, path: impl AsRef<Path>) -> Result<()> {
    write_csv(&mut table.to_dataframe()?, path.as_ref())
}

/// Read a feature table previously written by [`write_feature_table_csv`].
///
/// # Errors
///
/// Returns an error if the file cannot be read or a column is not a known
/// feature.
pub fn read_feature_table_csv(path: impl AsRef<Path>) -> Result<TidyFeatureTable> {
    let df = read_csv(path.as_ref())?;
    Ok(TidyFeatureTable::from_dataframe(&df)?)
}

/// Write a tidy feature table as CSV in its canonical column order.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_feature_table_csv(table: &TidyFeatureTable, path: impl AsRef<Path>) -> Result<()> {
    write_csv(&mut table.to_dataframe()?, path.as_ref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use almeria_traits::Date;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("almeria-data-{}", std::process::id()))
            .join(name)
    }

    fn sample_panel(n: usize) -> Panel {
        let start = Date::from_ymd_opt(2021, 6, 1).unwrap();
        let dates = start.iter_days().take(n).collect();
        let a = (0..n).map(|i| 10.0 + i as f64 * 0.5).collect();
        let mut b: Vec<f64> = (0..n).map(|i| 20.0 + (i as f64).sin()).collect();
        b[0] = f64::NAN;
        Panel::new(dates, vec!["A".into(), "B_X".into()], vec![a, b]).unwrap()
    }

    #[test]
    fn test_panel_round_trip() {
        let path = temp_path("panel.csv");
        let panel = sample_panel(5);
        write_panel_csv(&panel, &path).unwrap();
        let back = read_panel_csv(&path).unwrap();

        assert_eq!(back.dates(), panel.dates());
        assert_eq!(back.tickers(), panel.tickers());
        assert_eq!(back.column("A").unwrap(), panel.column("A").unwrap());
        assert!(back.column("B_X").unwrap()[0].is_nan());
    }

    #[test]
    fn test_esg_round_trip() {
        let path = temp_path("esg.csv");
        let table = EsgTable::from_pairs([("A", 0.5), ("B_X", 0.75)]).unwrap();
        write_esg_csv(&table, &path).unwrap();
        assert_eq!(read_esg_csv(&path).unwrap(), table);
    }

    #[test]
    fn test_feature_table_round_trip() {
        let path = temp_path("features.csv");
        let mut panel = sample_panel(70);
        panel = panel.map_columns(|c| c.iter().map(|v| if v.is_nan() { 20.0 } else { *v }).collect());
        let esg = EsgTable::from_pairs([("A", 0.5)]).unwrap();
        let table = almeria_features::assemble(&panel, None, Some(&esg)).unwrap();
        write_feature_table_csv(&table, &path).unwrap();

        let back = read_feature_table_csv(&path).unwrap();
        assert_eq!(back.column_names(), table.column_names());
        assert_eq!(back.len(), table.len());
        assert_eq!(back.tickers(), ["A", "B_X"]);
        assert_eq!(back.rows()[0].esg_score, Some(0.5));
        assert_eq!(back.rows()[1].esg_score, None);
    }

    #[test]
    fn test_missing_file() {
        assert!(read_panel_csv(temp_path("does-not-exist.csv")).is_err());
    }
}
