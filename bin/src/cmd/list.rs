//! Feature listing command implementation.

use almeria_features::{FeatureCategory, FeatureConfig, features_by_category};
use anyhow::Result;

/// List the features the configuration produces, grouped by category.
pub(crate) fn run(config: &FeatureConfig, category: Option<&str>, detailed: bool) -> Result<()> {
    println!("\n╔══════════════════════════════════════════════════════════════╗");
    println!("║                    Available Features                        ║");
    println!("╚══════════════════════════════════════════════════════════════╝\n");

    let categories = [
        (FeatureCategory::Raw, "Raw"),
        (FeatureCategory::Trend, "Trend"),
        (FeatureCategory::Momentum, "Momentum"),
        (FeatureCategory::Volatility, "Volatility"),
        (FeatureCategory::Volume, "Volume"),
    ];

    for (cat, cat_name) in categories {
        if let Some(filter) = category
            && !cat_name.to_lowercase().contains(&filter.to_lowercase())
        {
            continue;
        }

        let features = features_by_category(config, cat);
        if features.is_empty() {
            continue;
        }

        println!("{cat_name}: {}", cat.description());
        println!("{}", "-".repeat(60));
        for info in features {
            if detailed {
                let volume = if info.requires_volume { ", needs volume" } else { "" };
                println!(
                    "  {:22} - {} (warm-up: {} rows{volume})",
                    info.name, info.description, info.warmup
                );
            } else {
                println!("  {}", info.name);
            }
        }
        println!();
    }

    if !detailed {
        println!("Use --detailed for descriptions and warm-up lengths.\n");
    }
    if !config.volume.enabled {
        println!("Volume features are disabled; enable [features.volume] or pass --volume.\n");
    }

    Ok(())
}
