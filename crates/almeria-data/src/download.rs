//! Multi-ticker download with retries and skip-on-error.

use crate::{
    Result,
    client::HistorySource,
    error::DataError,
    panel::build_panel,
    types::{Interval, TickerHistory},
};
use almeria_traits::{Date, Panel, Ticker};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration of a download run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Tickers to fetch
    pub tickers: Vec<Ticker>,

    /// First date (inclusive, default: 2020-01-01)
    pub start: Date,

    /// Last date (exclusive, default: 2025-01-01)
    pub end: Date,

    /// Bar interval (default: daily)
    pub interval: Interval,

    /// Retries after a failed request (default: 2)
    pub max_retries: u32,

    /// Delay between attempts in milliseconds (default: 1000)
    pub retry_delay_ms: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            start: Date::from_ymd_opt(2020, 1, 1).unwrap_or_default(),
            end: Date::from_ymd_opt(2025, 1, 1).unwrap_or_default(),
            interval: Interval::Daily,
            max_retries: 2,
            retry_delay_ms: 1000,
        }
    }
}

/// Price and volume panels produced by a download run.
#[derive(Debug, Clone)]
pub struct DownloadedPanels {
    /// Adjusted close prices, forward filled
    pub prices: Panel,
    /// Traded volume, forward filled
    pub volumes: Panel,
    /// Tickers that failed every attempt
    pub skipped: Vec<Ticker>,
}

/// Fetch one ticker, retrying up to `config.max_retries` times.
///
/// # Errors
///
/// Returns the last error once every attempt has failed.
pub async fn fetch_with_retry<S: HistorySource>(
    source: &S,
    ticker: &str,
    config: &DownloadConfig,
) -> Result<TickerHistory> {
    let mut attempt = 0;
    loop {
        match source
            .history(ticker, config.start, config.end, config.interval)
            .await
        {
            Ok(history) => return Ok(history),
            Err(e) if attempt < config.max_retries => {
                attempt += 1;
                tracing::warn!(ticker, attempt, error = %e, "fetch failed, retrying");
                tokio::time::sleep(Duration::from_millis(config.retry_delay_ms)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Download every configured ticker and build price and volume panels.
///
/// Tickers are fetched one after another. A ticker that still fails after
/// its retries is skipped with a warning.
///
/// # Errors
///
/// Returns [`DataError::NoData`] if every ticker failed, or an error if the
/// panels cannot be built.
pub async fn download_panels<S: HistorySource>(
    source: &S,
    config: &DownloadConfig,
) -> Result<DownloadedPanels> {
    if config.start >= config.end {
        return Err(DataError::Api(format!(
            "start {} is not before end {}",
            config.start, config.end
        )));
    }

    let mut histories = Vec::with_capacity(config.tickers.len());
    let mut skipped = Vec::new();
    for ticker in &config.tickers {
        match fetch_with_retry(source, ticker, config).await {
            Ok(history) => histories.push(history),
            Err(e) => {
                tracing::warn!(%ticker, error = %e, "skipping ticker");
                skipped.push(ticker.clone());
            }
        }
    }

    if histories.is_empty() {
        return Err(DataError::NoData(config.tickers.join(",")));
    }

    let prices = build_panel(
        histories
            .iter()
            .map(|h| (h.ticker.clone(), h.price_series().collect::<Vec<_>>())),
    )?;
    let volumes = build_panel(
        histories
            .iter()
            .map(|h| (h.ticker.clone(), h.volume_series().collect::<Vec<_>>())),
    )?;
    tracing::info!(
        tickers = prices.n_tickers(),
        dates = prices.len(),
        skipped = skipped.len(),
        "downloaded panels"
    );

    Ok(DownloadedPanels {
        prices,
        volumes,
        skipped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        collections::HashMap,
        sync::atomic::{AtomicUsize, Ordering},
    };

    /// Serves fixed histories, failing the first `failures[ticker]` calls.
    #[derive(Debug, Default)]
    struct FakeSource {
        failures: HashMap<String, usize>,
        calls: AtomicUsize,
    }

    impl HistorySource for FakeSource {
        async fn history(
            &self,
            ticker: &str,
            start: Date,
            _end: Date,
            _interval: Interval,
        ) -> Result<TickerHistory> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            let failures = self.failures.get(ticker).copied().unwrap_or(0);
            if call < failures {
                return Err(DataError::Api("HTTP 503".to_string()));
            }
            let dates: Vec<Date> = start.iter_days().take(3).collect();
            Ok(TickerHistory {
                ticker: ticker.to_string(),
                dates,
                prices: vec![10.0, f64::NAN, 12.0],
                volumes: vec![100.0, 200.0, 300.0],
            })
        }
    }

    fn config(tickers: &[&str], max_retries: u32) -> DownloadConfig {
        DownloadConfig {
            tickers: tickers.iter().map(|t| t.to_string()).collect(),
            max_retries,
            retry_delay_ms: 0,
            ..DownloadConfig::default()
        }
    }

    #[tokio::test]
    async fn test_retry_then_succeed() {
        let source = FakeSource {
            failures: HashMap::from([("A".to_string(), 2)]),
            ..FakeSource::default()
        };
        let history = fetch_with_retry(&source, "A", &config(&["A"], 2))
            .await
            .unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_exhausted() {
        let source = FakeSource {
            failures: HashMap::from([("A".to_string(), 5)]),
            ..FakeSource::default()
        };
        assert!(fetch_with_retry(&source, "A", &config(&["A"], 1)).await.is_err());
        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_download_builds_forward_filled_panels() {
        let source = FakeSource::default();
        let panels = download_panels(&source, &config(&["A", "B"], 0))
            .await
            .unwrap();
        assert!(panels.skipped.is_empty());
        assert_eq!(panels.prices.tickers(), &["A".to_string(), "B".to_string()]);
        assert_eq!(panels.prices.column("A").unwrap(), &[10.0, 10.0, 12.0]);
        assert_eq!(panels.volumes.column("B").unwrap(), &[100.0, 200.0, 300.0]);
    }

    #[tokio::test]
    async fn test_download_skips_failing_ticker() {
        // calls are counted globally: the first call (ticker A) fails
        let source = FakeSource {
            failures: HashMap::from([("A".to_string(), 1)]),
            ..FakeSource::default()
        };
        let panels = download_panels(&source, &config(&["A", "B"], 0))
            .await
            .unwrap();
        assert_eq!(panels.skipped, vec!["A".to_string()]);
        assert_eq!(panels.prices.tickers(), &["B".to_string()]);
    }

    #[tokio::test]
    async fn test_download_fails_when_nothing_fetched() {
        let source = FakeSource {
            failures: HashMap::from([("A".to_string(), 10)]),
            ..FakeSource::default()
        };
        let result = download_panels(&source, &config(&["A"], 0)).await;
        assert!(matches!(result, Err(DataError::NoData(_))));
    }
}
