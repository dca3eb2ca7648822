//! Feature table command implementation.

use almeria_data::{read_esg_csv, read_panel_csv, write_feature_table_csv};
use almeria_features::{FeatureAssembler, FeatureConfig};
use anyhow::{Context, Result};
use std::path::Path;

/// Assemble the feature table from CSV panels and write it to `out`.
///
/// A volume panel adds the raw `volume` column. The volume block stays under
/// the control of `[features.volume]` in the config file.
pub(crate) fn run(
    config: FeatureConfig,
    prices: &Path,
    volume: Option<&Path>,
    esg: Option<&Path>,
    out: &Path,
) -> Result<()> {
    let prices = read_panel_csv(prices)
        .with_context(|| format!("reading prices from {}", prices.display()))?;
    let volume = volume
        .map(|path| {
            read_panel_csv(path).with_context(|| format!("reading volume from {}", path.display()))
        })
        .transpose()?;
    let esg = esg
        .map(|path| {
            read_esg_csv(path).with_context(|| format!("reading ESG scores from {}", path.display()))
        })
        .transpose()?;

    let assembler = FeatureAssembler::new(config)?;
    let table = assembler.assemble(&prices, volume.as_ref(), esg.as_ref())?;
    write_feature_table_csv(&table, out)?;

    println!(
        "Built {} rows x {} columns for {} tickers",
        table.len(),
        table.column_names().len(),
        table.tickers().len()
    );
    println!("Columns: {}", table.column_names().join(", "));
    println!("Saved to {}", out.display());
    Ok(())
}
