//! Training the baseline models on an assembled feature table.

use almeria_features::{EsgTable, TidyFeatureTable, assemble};
use almeria_models::{ForestConfig, MlpConfig, TrainConfig, prepare_ml_data, train_models};
use almeria_traits::{Date, Panel};

fn table() -> TidyFeatureTable {
    let start = Date::from_ymd_opt(2021, 6, 1).unwrap();
    let dates: Vec<Date> = start.iter_days().take(160).collect();
    let series = |level: f64, speed: f64| -> Vec<f64> {
        (0..160)
            .map(|i| level * (1.0 + 0.08 * (i as f64 * speed).sin() + 0.001 * i as f64))
            .collect()
    };
    let prices = Panel::new(
        dates,
        vec!["AAA".into(), "BBB".into(), "CCC".into()],
        vec![series(50.0, 0.11), series(120.0, 0.07), series(30.0, 0.19)],
    )
    .unwrap();
    let esg = EsgTable::from_pairs([("AAA", 0.5), ("BBB", 0.8), ("CCC", 0.65)]).unwrap();
    assemble(&prices, None, Some(&esg)).unwrap()
}

fn quick_config() -> TrainConfig {
    TrainConfig {
        forest: ForestConfig {
            n_trees: 12,
            ..ForestConfig::default()
        },
        mlp: MlpConfig {
            hidden_layers: vec![16, 8],
            max_epochs: 40,
            ..MlpConfig::default()
        },
        ..TrainConfig::default()
    }
}

#[test]
fn trains_and_scores_every_model() {
    let table = table();
    let config = quick_config();
    let dataset = prepare_ml_data(&table, config.horizon).unwrap();
    // 111 rows per ticker after warm-up, minus the last row without a target
    assert_eq!(dataset.n_samples(), 3 * 110);
    assert_eq!(dataset.feature_names.last().unwrap(), "esg_score");

    let report = train_models(&dataset, &config).unwrap();
    assert_eq!(report.n_train + report.n_test, dataset.n_samples());
    assert_eq!(report.n_test, 66);
    assert_eq!(report.scaler.mean().unwrap().len(), dataset.n_features());

    let names: Vec<&str> = report.scores.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["LinearRegression", "RandomForest", "MLP"]);
    for score in &report.scores {
        assert!(score.mse.is_finite() && score.mse >= 0.0);
        assert!(score.r2.is_finite());
    }
    assert!(report.best().is_some());
}

#[test]
fn training_is_reproducible() {
    let dataset = prepare_ml_data(&table(), 5).unwrap();
    let config = TrainConfig {
        horizon: 5,
        ..quick_config()
    };
    let first = train_models(&dataset, &config).unwrap();
    let second = train_models(&dataset, &config).unwrap();

    for (a, b) in first.scores.iter().zip(&second.scores) {
        assert_eq!(a.mse.to_bits(), b.mse.to_bits(), "{}", a.name);
        assert_eq!(a.r2.to_bits(), b.r2.to_bits(), "{}", a.name);
    }
}

#[test]
fn too_few_rows_to_split() {
    let start = Date::from_ymd_opt(2021, 6, 1).unwrap();
    let dates: Vec<Date> = start.iter_days().take(51).collect();
    let prices = Panel::new(dates, vec!["AAA".into()], vec![(0..51).map(|i| 10.0 + i as f64).collect()])
        .unwrap();
    let table = assemble(&prices, None, None).unwrap();
    // two rows survive warm-up, one has a target
    let dataset = prepare_ml_data(&table, 1).unwrap();
    assert_eq!(dataset.n_samples(), 1);
    assert!(train_models(&dataset, &quick_config()).is_err());
}
