//! Fit and score the baseline models on a seeded split.

use crate::dataset::{Dataset, train_test_split};
use crate::forest::{ForestConfig, RandomForestRegressor};
use crate::linear::LinearRegression;
use crate::metrics::{mean_squared_error, r2_score};
use crate::mlp::{MlpConfig, MlpRegressor};
use crate::regressor::Regressor;
use crate::scaler::StandardScaler;
use almeria_traits::{AlmeriaError, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Training settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    /// Rows ahead of the forward-return target
    pub horizon: usize,
    /// Fraction of rows held out for scoring
    pub test_size: f64,
    /// Seed for the split and every model
    pub seed: u64,
    /// Random forest settings
    pub forest: ForestConfig,
    /// MLP settings
    pub mlp: MlpConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            horizon: 1,
            test_size: 0.2,
            seed: 42,
            forest: ForestConfig::default(),
            mlp: MlpConfig::default(),
        }
    }
}

impl TrainConfig {
    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::InvalidData`] describing the first invalid
    /// setting.
    pub fn validate(&self) -> Result<()> {
        if self.horizon == 0 {
            return Err(AlmeriaError::InvalidData("horizon must be positive".into()));
        }
        if self.test_size.is_nan() || self.test_size <= 0.0 || self.test_size >= 1.0 {
            return Err(AlmeriaError::InvalidData(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        self.forest.validate()?;
        self.mlp.validate()
    }

    /// The three baseline models, seeded from this configuration.
    pub fn models(&self) -> Vec<Box<dyn Regressor>> {
        vec![
            Box::new(LinearRegression::new()),
            Box::new(RandomForestRegressor::new(self.forest.clone(), self.seed)),
            Box::new(MlpRegressor::new(self.mlp.clone(), self.seed)),
        ]
    }
}

/// Held-out score of one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelScore {
    /// Model name
    pub name: String,
    /// Mean squared error on the test set
    pub mse: f64,
    /// Coefficient of determination on the test set
    pub r2: f64,
}

/// Scores of every model together with the scaler fitted on the training rows.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    /// One score per model, in fitting order
    pub scores: Vec<ModelScore>,
    /// Scaler fitted on the training features
    pub scaler: StandardScaler,
    /// Feature columns the models were trained on
    pub feature_names: Vec<String>,
    /// Training rows
    pub n_train: usize,
    /// Test rows
    pub n_test: usize,
}

impl TrainingReport {
    /// Score of the model with the highest R².
    pub fn best(&self) -> Option<&ModelScore> {
        self.scores.iter().max_by(|a, b| a.r2.total_cmp(&b.r2))
    }
}

/// Split, scale and fit the baseline models, scoring each on the test rows.
///
/// The scaler is fitted on the training rows only and applied to both sides.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the dataset is too
/// small to split, or a model fails to fit.
pub fn train_models(dataset: &Dataset, config: &TrainConfig) -> Result<TrainingReport> {
    config.validate()?;
    let (train, test) = train_test_split(dataset, config.test_size, config.seed)?;

    let mut scaler = StandardScaler::new();
    let x_train = scaler.fit_transform(&train.features)?;
    let x_test = scaler.transform(&test.features)?;
    debug!(
        train = train.n_samples(),
        test = test.n_samples(),
        features = dataset.n_features(),
        "split and scaled dataset"
    );

    let mut scores = Vec::new();
    for mut model in config.models() {
        model.fit(&x_train, &train.targets)?;
        let predictions = model.predict(&x_test)?;
        let score = ModelScore {
            name: model.name().to_string(),
            mse: mean_squared_error(&test.targets, &predictions)?,
            r2: r2_score(&test.targets, &predictions)?,
        };
        info!(model = %score.name, mse = score.mse, r2 = score.r2, "scored model");
        scores.push(score);
    }

    Ok(TrainingReport {
        scores,
        scaler,
        feature_names: dataset.feature_names.clone(),
        n_train: train.n_samples(),
        n_test: test.n_samples(),
    })
}
