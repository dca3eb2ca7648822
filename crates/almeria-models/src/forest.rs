//! Random forest of regression trees.

use crate::regressor::{Regressor, check_fit_input, check_predict_input};
use crate::tree::{DecisionTreeRegressor, TreeConfig};
use almeria_traits::{AlmeriaError, Result};
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Random forest configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForestConfig {
    /// Number of trees in the forest
    pub n_trees: usize,
    /// Maximum depth of each tree (None = unlimited)
    pub max_depth: Option<usize>,
    /// Minimum samples to split
    pub min_samples_split: usize,
    /// Minimum samples in leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
    /// Fit each tree on a bootstrap resample
    pub bootstrap: bool,
}

impl Default for ForestConfig {
    fn default() -> Self {
        Self {
            n_trees: 200,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
            bootstrap: true,
        }
    }
}

impl ForestConfig {
    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::InvalidData`] if the forest has no trees or a
    /// tree limit is zero.
    pub fn validate(&self) -> Result<()> {
        if self.n_trees == 0 {
            return Err(AlmeriaError::InvalidData("n_trees must be positive".into()));
        }
        if self.max_depth == Some(0) || self.max_features == Some(0) || self.min_samples_leaf == 0 {
            return Err(AlmeriaError::InvalidData(
                "forest depth, feature and leaf limits must be positive".into(),
            ));
        }
        Ok(())
    }

    fn tree_config(&self) -> TreeConfig {
        TreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: self.min_samples_leaf,
            max_features: self.max_features,
        }
    }
}

/// Averages the predictions of independently grown trees.
///
/// Tree `i` uses seed `seed + i` for both its bootstrap draw and its feature
/// order, so the fitted forest does not depend on how rayon schedules the
/// trees.
#[derive(Debug, Clone)]
pub struct RandomForestRegressor {
    config: ForestConfig,
    seed: u64,
    trees: Vec<DecisionTreeRegressor>,
    n_features: usize,
}

impl RandomForestRegressor {
    /// Create an unfitted forest.
    #[must_use]
    pub const fn new(config: ForestConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            trees: Vec::new(),
            n_features: 0,
        }
    }

    /// Fitted trees.
    pub fn trees(&self) -> &[DecisionTreeRegressor] {
        &self.trees
    }
}

/// Draw `n` row indices with replacement.
fn bootstrap_sample(n: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen_range(0..n)).collect()
}

impl Regressor for RandomForestRegressor {
    fn name(&self) -> &str {
        "RandomForest"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.config.validate()?;
        check_fit_input(x, y)?;
        let n = x.nrows();
        let tree_config = self.config.tree_config();
        let (base_seed, bootstrap) = (self.seed, self.config.bootstrap);

        let trees = (0..self.config.n_trees)
            .into_par_iter()
            .map(|i| {
                let seed = base_seed.wrapping_add(i as u64);
                let samples = if bootstrap {
                    bootstrap_sample(n, seed)
                } else {
                    (0..n).collect()
                };
                let mut tree = DecisionTreeRegressor::new(tree_config.clone(), seed);
                tree.fit_samples(x, y, samples)?;
                Ok(tree)
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            trees = trees.len(),
            nodes = trees.iter().map(DecisionTreeRegressor::node_count).sum::<usize>(),
            "fitted random forest"
        );
        self.trees = trees;
        self.n_features = x.ncols();
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(AlmeriaError::Model("random forest is not fitted".into()));
        }
        check_predict_input(x, self.n_features)?;

        let mut sum = Array1::<f64>::zeros(x.nrows());
        for tree in &self.trees {
            sum += &tree.predict(x)?;
        }
        Ok(sum / self.trees.len() as f64)
    }
}
