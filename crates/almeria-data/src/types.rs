//! Data types shared by the acquisition layer.

use almeria_traits::{Date, Ticker};
use chrono::DateTime;
use serde::{Deserialize, Serialize};

/// Sampling interval of a price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Interval {
    /// One bar per trading day.
    #[default]
    #[serde(rename = "1d")]
    Daily,
    /// One bar per week.
    #[serde(rename = "1wk")]
    Weekly,
    /// One bar per month.
    #[serde(rename = "1mo")]
    Monthly,
}

impl Interval {
    /// Get the API parameter value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "1d",
            Self::Weekly => "1wk",
            Self::Monthly => "1mo",
        }
    }

    /// Parse an API parameter value such as `1d`.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "1d" => Some(Self::Daily),
            "1wk" => Some(Self::Weekly),
            "1mo" => Some(Self::Monthly),
            _ => None,
        }
    }
}

/// Adjusted close and volume history of one ticker.
///
/// Missing observations are `NaN`.
#[derive(Debug, Clone, PartialEq)]
pub struct TickerHistory {
    /// Ticker symbol.
    pub ticker: Ticker,
    /// Bar dates, ascending.
    pub dates: Vec<Date>,
    /// Adjusted close per bar.
    pub prices: Vec<f64>,
    /// Traded volume per bar.
    pub volumes: Vec<f64>,
}

impl TickerHistory {
    /// Number of bars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Whether the history holds no bars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// `(date, price)` pairs.
    pub fn price_series(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.prices.iter().copied())
    }

    /// `(date, volume)` pairs.
    pub fn volume_series(&self) -> impl Iterator<Item = (Date, f64)> + '_ {
        self.dates.iter().copied().zip(self.volumes.iter().copied())
    }
}

/// Chart API response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ChartResponse {
    pub(crate) chart: Chart,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Chart {
    pub(crate) result: Option<Vec<ChartData>>,
    pub(crate) error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartError {
    pub(crate) code: String,
    pub(crate) description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChartData {
    #[serde(default)]
    pub(crate) timestamp: Vec<i64>,
    pub(crate) indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Indicators {
    #[serde(default)]
    pub(crate) quote: Vec<Quote>,
    #[serde(default)]
    pub(crate) adjclose: Vec<AdjClose>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Quote {
    #[serde(default)]
    pub(crate) close: Vec<Option<f64>>,
    #[serde(default)]
    pub(crate) volume: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdjClose {
    #[serde(default)]
    pub(crate) adjclose: Vec<Option<f64>>,
}

impl ChartData {
    /// Convert to a ticker history, preferring adjusted over raw close.
    ///
    /// Bars sharing a date keep the last value.
    pub(crate) fn into_history(self, ticker: &str) -> TickerHistory {
        let quote = self.indicators.quote.into_iter().next();
        let adjusted = self
            .indicators
            .adjclose
            .into_iter()
            .next()
            .map(|a| a.adjclose)
            .filter(|a| !a.is_empty());
        let (close, volume) = quote.map_or((Vec::new(), Vec::new()), |q| (q.close, q.volume));
        let prices = adjusted.unwrap_or(close);

        let mut history = TickerHistory {
            ticker: ticker.to_string(),
            dates: Vec::with_capacity(self.timestamp.len()),
            prices: Vec::with_capacity(self.timestamp.len()),
            volumes: Vec::with_capacity(self.timestamp.len()),
        };
        for (i, ts) in self.timestamp.iter().enumerate() {
            let Some(date) = DateTime::from_timestamp(*ts, 0).map(|dt| dt.date_naive()) else {
                continue;
            };
            let price = prices.get(i).copied().flatten().unwrap_or(f64::NAN);
            let volume = volume.get(i).copied().flatten().unwrap_or(f64::NAN);
            if history.dates.last() == Some(&date) {
                history.prices.pop();
                history.volumes.pop();
            } else {
                history.dates.push(date);
            }
            history.prices.push(price);
            history.volumes.push(volume);
        }
        history
    }
}
