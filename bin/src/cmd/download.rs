//! Price and volume download command implementation.

use almeria_data::{DownloadConfig, YahooClient, download_panels, write_panel_csv};
use anyhow::{Result, bail};
use std::path::Path;

/// File name of the price panel inside the output directory.
pub(crate) const PRICES_FILE: &str = "prices.csv";

/// File name of the volume panel inside the output directory.
pub(crate) const VOLUME_FILE: &str = "volume.csv";

/// Download every configured ticker and write both panels to `out`.
pub(crate) async fn run(config: DownloadConfig, out: &Path) -> Result<()> {
    if config.tickers.is_empty() {
        bail!("no tickers given; pass --tickers or set [download].tickers");
    }

    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                      Market Data Download                    ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");
    println!("Tickers:  {}", config.tickers.join(", "));
    println!("Range:    {} to {}", config.start, config.end);
    println!("Interval: {}", config.interval.as_str());
    println!();

    let client = YahooClient::from_env();
    let panels = download_panels(&client, &config).await?;

    let prices_path = out.join(PRICES_FILE);
    let volume_path = out.join(VOLUME_FILE);
    write_panel_csv(&panels.prices, &prices_path)?;
    write_panel_csv(&panels.volumes, &volume_path)?;

    println!(
        "Saved {} dates for {} tickers",
        panels.prices.len(),
        panels.prices.n_tickers()
    );
    println!("  prices: {}", prices_path.display());
    println!("  volume: {}", volume_path.display());
    if !panels.skipped.is_empty() {
        println!("Skipped:  {}", panels.skipped.join(", "));
    }
    println!();

    Ok(())
}
