//! Multi-layer perceptron regressor.

use crate::regressor::{Regressor, check_fit_input, check_predict_input};
use almeria_traits::{AlmeriaError, Result};
use ndarray::{Array, Array1, Array2, Axis, Dimension, Zip};
use rand::{Rng, SeedableRng, seq::SliceRandom};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const ADAM_EPSILON: f64 = 1e-8;

/// Network shape and optimizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MlpConfig {
    /// Width of each hidden layer
    pub hidden_layers: Vec<usize>,
    /// Adam step size
    pub learning_rate: f64,
    /// L2 penalty on the weights
    pub alpha: f64,
    /// Rows per minibatch, capped at the sample count
    pub batch_size: usize,
    /// Maximum passes over the training data
    pub max_epochs: usize,
    /// Minimum loss improvement that resets the patience counter
    pub tol: f64,
    /// Epochs without improvement before stopping
    pub n_iter_no_change: usize,
}

impl Default for MlpConfig {
    fn default() -> Self {
        Self {
            hidden_layers: vec![64, 32],
            learning_rate: 1e-3,
            alpha: 1e-4,
            batch_size: 200,
            max_epochs: 300,
            tol: 1e-4,
            n_iter_no_change: 10,
        }
    }
}

impl MlpConfig {
    /// Check the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AlmeriaError::InvalidData`] for an empty hidden layer, a
    /// non-positive learning rate or batch size, or zero epochs.
    pub fn validate(&self) -> Result<()> {
        if self.hidden_layers.contains(&0) {
            return Err(AlmeriaError::InvalidData("hidden layers must be non-empty".into()));
        }
        if self.learning_rate.is_nan()
            || self.learning_rate <= 0.0
            || self.batch_size == 0
            || self.max_epochs == 0
        {
            return Err(AlmeriaError::InvalidData(
                "learning_rate, batch_size and max_epochs must be positive".into(),
            ));
        }
        if self.alpha < 0.0 {
            return Err(AlmeriaError::InvalidData("alpha must be non-negative".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct Layer {
    weights: Array2<f64>,
    bias: Array1<f64>,
}

impl Layer {
    /// Glorot-uniform initialization.
    fn init(fan_in: usize, fan_out: usize, rng: &mut ChaCha8Rng) -> Self {
        let bound = (6.0 / (fan_in + fan_out) as f64).sqrt();
        let weights = Array2::from_shape_fn((fan_in, fan_out), |_| rng.gen_range(-bound..bound));
        let bias = Array1::from_shape_fn(fan_out, |_| rng.gen_range(-bound..bound));
        Self { weights, bias }
    }

    fn zeros_like(&self) -> Self {
        Self {
            weights: Array2::zeros(self.weights.raw_dim()),
            bias: Array1::zeros(self.bias.len()),
        }
    }
}

/// Adam moment estimates, shaped like the network.
#[derive(Debug)]
struct Adam {
    first: Vec<Layer>,
    second: Vec<Layer>,
    step: i32,
}

impl Adam {
    fn new(layers: &[Layer]) -> Self {
        Self {
            first: layers.iter().map(Layer::zeros_like).collect(),
            second: layers.iter().map(Layer::zeros_like).collect(),
            step: 0,
        }
    }

    fn update(&mut self, layers: &mut [Layer], grads: &[Layer], learning_rate: f64) {
        self.step += 1;
        let rate = learning_rate * (1.0 - BETA2.powi(self.step)).sqrt()
            / (1.0 - BETA1.powi(self.step));
        for (((layer, grad), m), v) in layers
            .iter_mut()
            .zip(grads)
            .zip(&mut self.first)
            .zip(&mut self.second)
        {
            adam_step(&mut layer.weights, &grad.weights, &mut m.weights, &mut v.weights, rate);
            adam_step(&mut layer.bias, &grad.bias, &mut m.bias, &mut v.bias, rate);
        }
    }
}

fn adam_step<D: Dimension>(
    param: &mut Array<f64, D>,
    grad: &Array<f64, D>,
    m: &mut Array<f64, D>,
    v: &mut Array<f64, D>,
    rate: f64,
) {
    Zip::from(param)
        .and(grad)
        .and(m)
        .and(v)
        .for_each(|p, &g, m, v| {
            *m = BETA1 * *m + (1.0 - BETA1) * g;
            *v = BETA2 * *v + (1.0 - BETA2) * g * g;
            *p -= rate * *m / (v.sqrt() + ADAM_EPSILON);
        });
}

/// Activations of every layer, input first. Hidden layers use ReLU and the
/// output layer is linear.
fn forward(layers: &[Layer], x: Array2<f64>) -> Vec<Array2<f64>> {
    let mut activations = Vec::with_capacity(layers.len() + 1);
    activations.push(x);
    for (i, layer) in layers.iter().enumerate() {
        let mut z = activations[i].dot(&layer.weights) + &layer.bias;
        if i + 1 < layers.len() {
            z.mapv_inplace(|v| v.max(0.0));
        }
        activations.push(z);
    }
    activations
}

/// Half mean squared error plus L2 penalty, and its gradient.
fn backward(
    layers: &[Layer],
    activations: &[Array2<f64>],
    y: &Array1<f64>,
    alpha: f64,
) -> (f64, Vec<Layer>) {
    let n = y.len() as f64;
    let output = activations[activations.len() - 1].column(0).to_owned();
    let residual = output - y;
    let penalty: f64 = layers.iter().map(|l| l.weights.mapv(|w| w * w).sum()).sum();
    let loss = residual.mapv(|r| r * r).sum() / (2.0 * n) + alpha * penalty / (2.0 * n);

    let mut delta = (residual / n).insert_axis(Axis(1));
    let mut grads = Vec::with_capacity(layers.len());
    for i in (0..layers.len()).rev() {
        let mut weights = activations[i].t().dot(&delta);
        weights.scaled_add(alpha / n, &layers[i].weights);
        let bias = delta.sum_axis(Axis(0));
        if i > 0 {
            let active = activations[i].mapv(|a| if a > 0.0 { 1.0 } else { 0.0 });
            delta = delta.dot(&layers[i].weights.t()) * &active;
        }
        grads.push(Layer { weights, bias });
    }
    grads.reverse();
    (loss, grads)
}

/// Feed-forward network trained with Adam on minibatches.
///
/// Training stops after `max_epochs` or once the epoch loss has failed to
/// improve by `tol` for more than `n_iter_no_change` consecutive epochs.
/// Weight initialization and minibatch order come from the seed.
#[derive(Debug, Clone)]
pub struct MlpRegressor {
    config: MlpConfig,
    seed: u64,
    layers: Vec<Layer>,
    epochs_run: usize,
    final_loss: f64,
}

impl MlpRegressor {
    /// Create an unfitted network.
    #[must_use]
    pub const fn new(config: MlpConfig, seed: u64) -> Self {
        Self {
            config,
            seed,
            layers: Vec::new(),
            epochs_run: 0,
            final_loss: f64::NAN,
        }
    }

    /// Epochs completed by the last fit.
    pub const fn epochs_run(&self) -> usize {
        self.epochs_run
    }

    /// Training loss of the last completed epoch.
    pub const fn final_loss(&self) -> f64 {
        self.final_loss
    }
}

impl Regressor for MlpRegressor {
    fn name(&self) -> &str {
        "MLP"
    }

    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        self.config.validate()?;
        check_fit_input(x, y)?;
        let n = x.nrows();
        let batch_size = self.config.batch_size.min(n);
        let mut rng = ChaCha8Rng::seed_from_u64(self.seed);

        let mut widths = vec![x.ncols()];
        widths.extend(&self.config.hidden_layers);
        widths.push(1);
        let mut layers: Vec<Layer> = widths
            .windows(2)
            .map(|w| Layer::init(w[0], w[1], &mut rng))
            .collect();
        let mut adam = Adam::new(&layers);

        let mut indices: Vec<usize> = (0..n).collect();
        let mut best_loss = f64::INFINITY;
        let mut stale_epochs = 0;
        let mut epochs_run = 0;
        let mut epoch_loss = f64::NAN;

        for epoch in 0..self.config.max_epochs {
            indices.shuffle(&mut rng);
            let mut total = 0.0;
            for batch in indices.chunks(batch_size) {
                let xb = x.select(Axis(0), batch);
                let yb = y.select(Axis(0), batch);
                let activations = forward(&layers, xb);
                let (loss, grads) = backward(&layers, &activations, &yb, self.config.alpha);
                total += loss * batch.len() as f64;
                adam.update(&mut layers, &grads, self.config.learning_rate);
            }
            epoch_loss = total / n as f64;
            epochs_run = epoch + 1;

            if !epoch_loss.is_finite() {
                return Err(AlmeriaError::Model(format!(
                    "MLP training diverged at epoch {epochs_run}"
                )));
            }
            if epoch_loss > best_loss - self.config.tol {
                stale_epochs += 1;
            } else {
                stale_epochs = 0;
            }
            best_loss = best_loss.min(epoch_loss);
            if stale_epochs > self.config.n_iter_no_change {
                tracing::debug!(epoch = epochs_run, loss = epoch_loss, "MLP loss stopped improving");
                break;
            }
        }

        tracing::debug!(epochs = epochs_run, loss = epoch_loss, "fitted MLP");
        self.layers = layers;
        self.epochs_run = epochs_run;
        self.final_loss = epoch_loss;
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let Some(first) = self.layers.first() else {
            return Err(AlmeriaError::Model("MLP is not fitted".into()));
        };
        check_predict_input(x, first.weights.nrows())?;
        let activations = forward(&self.layers, x.to_owned());
        Ok(activations[activations.len() - 1].column(0).to_owned())
    }
}
