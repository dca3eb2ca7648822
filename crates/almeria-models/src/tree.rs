//! CART regression tree.

use crate::regressor::{Regressor, check_fit_input, check_predict_input};
use almeria_traits::{AlmeriaError, Result};
use ndarray::{Array1, Array2, ArrayView1};
use rand::{SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Growth limits of a single tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum depth (None = grow until leaves are pure)
    pub max_depth: Option<usize>,
    /// Minimum samples required to split a node
    pub min_samples_split: usize,
    /// Minimum samples in each leaf
    pub min_samples_leaf: usize,
    /// Features considered per split (None = all)
    pub max_features: Option<usize>,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: None,
        }
    }
}

/// Relative gain below which a split is treated as no improvement.
const SCORE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Debug, Clone, Copy)]
struct SplitCandidate {
    feature: usize,
    threshold: f64,
    score: f64,
}

/// Regression tree minimizing squared error.
///
/// Nodes live in a flat arena, the root at index 0. Candidate features are
/// visited in an order drawn from the seeded generator, so ties between
/// equally good splits resolve the same way on every run.
#[derive(Debug, Clone)]
pub struct DecisionTreeRegressor {
    config: TreeConfig,
    seed: u64,
    nodes: Vec<Node>,
    n_features: usize,
}

impl DecisionTreeRegressor {
    /// Create an unfitted tree.
    #[must_use]
    pub const fn new(config: TreeConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            nodes: Vec::new(),
            n_features: 0,
        }
    }

    /// Number of nodes, zero before fitting.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Depth of the deepest leaf.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(0usize, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            match self.nodes.get(node) {
                Some(Node::Split { left, right, .. }) => {
                    stack.push((*left, depth + 1));
                    stack.push((*right, depth + 1));
                }
                Some(Node::Leaf { .. }) => deepest = deepest.max(depth),
                None => {}
            }
        }
        deepest
    }

    /// Fit on the rows of `x` listed in `samples`; rows may repeat.
    pub(crate) fn fit_samples(
        &mut self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        samples: Vec<usize>,
    ) -> Result<()> {
        if samples.is_empty() {
            return Err(AlmeriaError::InsufficientData(
                "cannot grow a tree from no samples".to_string(),
            ));
        }
        let n_features = x.ncols();
        let max_features = self
            .config
            .max_features
            .unwrap_or(n_features)
            .clamp(1, n_features.max(1));
        let min_leaf = self.config.min_samples_leaf.max(1);
        let min_split = self.config.min_samples_split.max(2).max(2 * min_leaf);

        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);
        let mut features: Vec<usize> = (0..n_features).collect();
        let mut nodes = vec![Node::Leaf { value: 0.0 }];
        let mut stack = vec![(0usize, samples, 0usize)];

        while let Some((node, samples, depth)) = stack.pop() {
            let value = samples.iter().map(|&i| y[i]).sum::<f64>() / samples.len() as f64;
            let splittable = samples.len() >= min_split
                && self.config.max_depth.is_none_or(|max| depth < max);

            let split = if splittable {
                features.shuffle(&mut rng);
                best_split(x, y, &samples, &features[..max_features], min_leaf)
            } else {
                None
            };

            match split {
                Some(split) => {
                    let (left, right): (Vec<usize>, Vec<usize>) = samples
                        .into_iter()
                        .partition(|&i| x[[i, split.feature]] <= split.threshold);
                    let left_node = nodes.len();
                    nodes.push(Node::Leaf { value: 0.0 });
                    nodes.push(Node::Leaf { value: 0.0 });
                    nodes[node] = Node::Split {
                        feature: split.feature,
                        threshold: split.threshold,
                        left: left_node,
                        right: left_node + 1,
                    };
                    stack.push((left_node, left, depth + 1));
                    stack.push((left_node + 1, right, depth + 1));
                }
                None => nodes[node] = Node::Leaf { value },
            }
        }

        self.nodes = nodes;
        self.n_features = n_features;
        Ok(())
    }

    fn predict_row(&self, row: ArrayView1<'_, f64>) -> f64 {
        let mut node = 0;
        loop {
            match self.nodes[node] {
                Node::Leaf { value } => return value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => node = if row[feature] <= threshold { left } else { right },
            }
        }
    }
}

/// Best squared-error split over `features`, or `None` if no split reduces
/// the error.
///
/// Each feature is scanned once after sorting, using running sums. Maximizing
/// `S_l^2 / n_l + S_r^2 / n_r` is equivalent to minimizing the children's
/// summed squared error.
fn best_split(
    x: &Array2<f64>,
    y: &Array1<f64>,
    samples: &[usize],
    features: &[usize],
    min_leaf: usize,
) -> Option<SplitCandidate> {
    let n = samples.len();
    let total: f64 = samples.iter().map(|&i| y[i]).sum();
    let parent_score = total * total / n as f64;
    let mut best: Option<SplitCandidate> = None;
    let mut order = samples.to_vec();

    for &feature in features {
        order.sort_by(|&a, &b| x[[a, feature]].total_cmp(&x[[b, feature]]));
        let mut left_sum = 0.0;
        for k in 1..n {
            left_sum += y[order[k - 1]];
            if k < min_leaf || n - k < min_leaf {
                continue;
            }
            let lo = x[[order[k - 1], feature]];
            let hi = x[[order[k], feature]];
            if lo >= hi {
                continue;
            }
            let right_sum = total - left_sum;
            let score = left_sum * left_sum / k as f64 + right_sum * right_sum / (n - k) as f64;
            if score <= parent_score * (1.0 + SCORE_TOLERANCE)
                || best.is_some_and(|b| score <= b.score)
            {
                continue;
            }
            let mut threshold = lo + (hi - lo) / 2.0;
            if threshold >= hi {
                threshold = lo;
            }
            best = Some(SplitCandidate {
                feature,
                threshold,
                score,
            });
        }
    }
    best
}

impl Regressor for DecisionTreeRegressor {
    fn name(&self) -> &str {
        "DecisionTree"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        check_fit_input(x, y)?;
        self.fit_samples(x, y, (0..x.nrows()).collect())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.nodes.is_empty() {
            return Err(AlmeriaError::Model("decision tree is not fitted".into()));
        }
        check_predict_input(x, self.n_features)?;
        Ok(x.rows().into_iter().map(|row| self.predict_row(row)).collect())
    }
}
