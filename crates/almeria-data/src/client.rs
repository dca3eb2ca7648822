//! Yahoo chart API client.

use crate::{
    Result,
    error::DataError,
    types::{ChartResponse, Interval, TickerHistory},
};
use almeria_traits::Date;
use reqwest::Client;
use std::{env, future::Future};

/// Default base URL of the chart API.
const YAHOO_CHART_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart";

/// Source of per-ticker price and volume histories.
pub trait HistorySource: Send + Sync {
    /// Fetch the history of `ticker` between `start` (inclusive) and `end`
    /// (exclusive).
    fn history(
        &self,
        ticker: &str,
        start: Date,
        end: Date,
        interval: Interval,
    ) -> impl Future<Output = Result<TickerHistory>> + Send;
}

/// Yahoo Finance chart API client.
#[derive(Debug, Clone)]
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl Default for YahooClient {
    fn default() -> Self {
        Self::new(YAHOO_CHART_URL)
    }
}

impl YahooClient {
    /// Create a client against the given chart endpoint.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client, reading the endpoint from `YAHOO_CHART_URL` if set.
    ///
    /// This will also load from a `.env` file if present.
    #[must_use]
    pub fn from_env() -> Self {
        // Try to load .env file (ignore errors if not found)
        let _ = dotenvy::dotenv();

        env::var("YAHOO_CHART_URL").map_or_else(|_| Self::default(), Self::new)
    }

    /// Base URL requests are sent to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the request URL for one ticker.
    fn url(&self, ticker: &str, start: Date, end: Date, interval: Interval) -> String {
        let period = |date: Date| date.and_hms_opt(0, 0, 0).map_or(0, |dt| dt.and_utc().timestamp());
        format!(
            "{}/{}?period1={}&period2={}&interval={}&events=div%2Csplits",
            self.base_url,
            ticker.to_uppercase(),
            period(start),
            period(end),
            interval.as_str()
        )
    }
}

impl HistorySource for YahooClient {
    async fn history(
        &self,
        ticker: &str,
        start: Date,
        end: Date,
        interval: Interval,
    ) -> Result<TickerHistory> {
        let url = self.url(ticker, start, end, interval);
        tracing::debug!(%url, "requesting chart");
        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, "Mozilla/5.0")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(DataError::Api(format!("HTTP {status}: {text}")));
        }

        let body: ChartResponse = serde_json::from_str(&response.text().await?)?;
        if let Some(error) = body.chart.error {
            return Err(DataError::Api(format!("{}: {}", error.code, error.description)));
        }

        let history = body
            .chart
            .result
            .and_then(|results| results.into_iter().next())
            .map(|data| data.into_history(ticker))
            .filter(|history| !history.is_empty())
            .ok_or_else(|| DataError::NoData(ticker.to_string()))?;

        tracing::debug!(ticker, bars = history.len(), "fetched history");
        Ok(history)
    }
}
