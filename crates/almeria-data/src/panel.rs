//! Panel construction from per-ticker series.

use almeria_traits::{Date, Panel, Result, Ticker};
use std::collections::{BTreeMap, BTreeSet};

/// Align per-ticker series on the union of their dates.
///
/// Dates where every ticker is missing are dropped, then each ticker is
/// forward filled. Leading gaps stay missing. Duplicate dates within a
/// series keep the last value.
///
/// # Errors
///
/// Returns an error if a ticker appears twice.
pub fn build_panel<I, S>(series: I) -> Result<Panel>
where
    I: IntoIterator<Item = (Ticker, S)>,
    S: IntoIterator<Item = (Date, f64)>,
{
    let series: Vec<(Ticker, BTreeMap<Date, f64>)> = series
        .into_iter()
        .map(|(ticker, values)| (ticker, values.into_iter().collect()))
        .collect();

    let dates: Vec<Date> = series
        .iter()
        .flat_map(|(_, values)| {
            values
                .iter()
                .filter(|(_, v)| !v.is_nan())
                .map(|(date, _)| *date)
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let mut tickers = Vec::with_capacity(series.len());
    let mut columns = Vec::with_capacity(series.len());
    for (ticker, values) in series {
        let mut column: Vec<f64> = dates
            .iter()
            .map(|date| values.get(date).copied().unwrap_or(f64::NAN))
            .collect();
        forward_fill(&mut column);
        tickers.push(ticker);
        columns.push(column);
    }

    Panel::new(dates, tickers, columns)
}

/// Forward fill a single column in place.
pub fn forward_fill(values: &mut [f64]) {
    let mut last = f64::NAN;
    for v in values.iter_mut() {
        if v.is_nan() {
            *v = last;
        } else {
            last = *v;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2024, 2, day).unwrap()
    }

    #[test]
    fn test_union_and_forward_fill() {
        let panel = build_panel(vec![
            ("A".to_string(), vec![(d(1), 1.0), (d(2), f64::NAN), (d(4), 4.0)]),
            ("B".to_string(), vec![(d(2), 20.0), (d(3), 30.0)]),
        ])
        .unwrap();

        assert_eq!(panel.dates(), &[d(1), d(2), d(3), d(4)]);
        assert_eq!(panel.column("A").unwrap(), &[1.0, 1.0, 1.0, 4.0]);

        let b = panel.column("B").unwrap();
        assert!(b[0].is_nan());
        assert_eq!(b[1..], [20.0, 30.0, 30.0]);
    }

    #[test]
    fn test_all_missing_rows_dropped() {
        let panel = build_panel(vec![
            ("A".to_string(), vec![(d(1), 1.0), (d(2), f64::NAN)]),
            ("B".to_string(), vec![(d(1), 2.0), (d(2), f64::NAN)]),
        ])
        .unwrap();
        assert_eq!(panel.dates(), &[d(1)]);
    }

    #[test]
    fn test_duplicate_ticker_rejected() {
        let result = build_panel(vec![
            ("A".to_string(), vec![(d(1), 1.0)]),
            ("A".to_string(), vec![(d(1), 2.0)]),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_forward_fill() {
        let mut values = [f64::NAN, 1.0, f64::NAN, 3.0, f64::NAN];
        forward_fill(&mut values);
        assert!(values[0].is_nan());
        assert_eq!(values[1..], [1.0, 1.0, 3.0, 3.0]);
    }
}
