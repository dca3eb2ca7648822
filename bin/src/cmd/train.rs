//! Model training command implementation.

use almeria_data::read_feature_table_csv;
use almeria_models::{TrainConfig, prepare_ml_data, train_models};
use anyhow::{Context, Result, bail};
use std::path::Path;

/// Train the baseline models on a feature table CSV and print their scores.
pub(crate) fn run(config: &TrainConfig, features: &Path, format: &str) -> Result<()> {
    if format != "text" && format != "json" {
        bail!("unknown format '{format}', expected text or json");
    }

    let table = read_feature_table_csv(features)
        .with_context(|| format!("reading features from {}", features.display()))?;
    let dataset = prepare_ml_data(&table, config.horizon)?;
    if dataset.is_empty() {
        bail!(
            "no rows with a {}-step forward return in {}",
            config.horizon,
            features.display()
        );
    }

    let report = train_models(&dataset, config)?;

    if format == "json" {
        let json = serde_json::json!({
            "horizon": config.horizon,
            "seed": config.seed,
            "n_train": report.n_train,
            "n_test": report.n_test,
            "features": report.feature_names,
            "scores": report.scores,
        });
        println!("{}", serde_json::to_string_pretty(&json)?);
        return Ok(());
    }

    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("MODEL RESULTS");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━\n");
    println!("Horizon:  {} rows", config.horizon);
    println!("Rows:     {} train, {} test", report.n_train, report.n_test);
    println!("Features: {}", report.feature_names.len());
    println!();
    println!("  {:18} {:>14} {:>10}", "Model", "MSE", "R²");
    for score in &report.scores {
        println!("  {:18} {:>14.8} {:>10.4}", score.name, score.mse, score.r2);
    }
    if let Some(best) = report.best() {
        println!("\nBest model: {}", best.name);
    }
    println!();

    Ok(())
}
