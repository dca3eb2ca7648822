//! Sample ESG score command implementation.

use almeria_data::{sample_esg_scores, write_esg_csv};
use anyhow::Result;
use std::path::Path;

/// Draw seeded sample scores for `tickers` and write them to `out`.
pub(crate) fn run(tickers: &[String], seed: u64, out: &Path) -> Result<()> {
    let table = sample_esg_scores(tickers, seed)?;
    write_esg_csv(&table, out)?;

    for (ticker, score) in table.iter() {
        println!("  {ticker:10} {score:.4}");
    }
    println!("Saved {} ESG scores to {}", table.len(), out.display());
    Ok(())
}
