//! Market data acquisition and persistence for almeria.
//!
//! This crate fetches adjusted prices and volume from the Yahoo chart API,
//! aligns them into [`Panel`](almeria_traits::Panel)s and persists panels,
//! ESG tables and feature tables as CSV.
//!
//! # Usage
//!
//! ```rust,ignore
//! use almeria_data::{DownloadConfig, YahooClient, download_panels, write_panel_csv};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = YahooClient::from_env();
//!     let config = DownloadConfig {
//!         tickers: vec!["AAPL".into(), "MSFT".into()],
//!         ..DownloadConfig::default()
//!     };
//!
//!     let panels = download_panels(&client, &config).await?;
//!     write_panel_csv(&panels.prices, "data/prices.csv")?;
//!     Ok(())
//! }
//! ```
//!
//! # Environment Variables
//!
//! `YAHOO_CHART_URL` overrides the chart endpoint, from the environment or a
//! `.env` file:
//!
//! ```bash
//! YAHOO_CHART_URL=https://query2.finance.yahoo.com/v8/finance/chart
//! ```

mod client;
mod csv;
mod download;
mod error;
mod esg;
mod panel;
mod types;

pub use client::{HistorySource, YahooClient};
pub use csv::{
    read_esg_csv, read_feature_table_csv, read_panel_csv, write_esg_csv,
    write_feature_table_csv, write_panel_csv,
};
pub use download::{DownloadConfig, DownloadedPanels, download_panels, fetch_with_retry};
pub use error::DataError;
pub use esg::{MAX_SAMPLE_SCORE, MIN_SAMPLE_SCORE, sample_esg_scores};
pub use panel::{build_panel, forward_fill};
pub use types::{Interval, TickerHistory};

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
