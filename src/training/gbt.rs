//! Gradient boosted tree regression
//!
//! Squared-error boosting: each round fits a [`RegressionTree`] to the
//! current residuals on a seeded row subsample and adds its shrunken
//! predictions to the ensemble. Feature importances are the summed
//! SSE-reduction gains of every split, normalized to sum to one.

use crate::training::tree::RegressionTree;
use crate::{ModelConfig, Result, SlgError};
use ndarray::{Array1, Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// A fitted boosted ensemble
pub struct GradientBoostedTrees {
    config: ModelConfig,
    trees: Vec<RegressionTree>,
    base_prediction: f64,
    importances: Vec<f64>,
}

impl GradientBoostedTrees {
    pub fn new(config: &ModelConfig) -> Self {
        GradientBoostedTrees {
            config: config.clone(),
            trees: Vec::new(),
            base_prediction: 0.0,
            importances: Vec::new(),
        }
    }

    /// Fit the ensemble to a feature matrix and target vector
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let n_samples = x.nrows();
        let n_features = x.ncols();

        if n_samples == 0 {
            return Err(SlgError::InsufficientData {
                rows: 0,
                context: "cannot fit on an empty training set".to_string(),
            });
        }

        self.base_prediction = y.sum() / n_samples as f64;
        self.trees = Vec::with_capacity(self.config.n_trees);
        self.importances = vec![0.0; n_features];

        let mut rng = rand::rngs::StdRng::seed_from_u64(self.config.seed);
        let mut predictions = Array1::from_elem(n_samples, self.base_prediction);

        for round in 0..self.config.n_trees {
            let residuals: Array1<f64> = y - &predictions;

            let sample = subsample_indices(n_samples, self.config.subsample, &mut rng);
            let x_sub = x.select(ndarray::Axis(0), &sample);
            let y_sub = Array1::from_iter(sample.iter().map(|&i| residuals[i]));

            let mut tree =
                RegressionTree::new(self.config.max_depth, self.config.min_samples_leaf);
            tree.fit(&x_sub, &y_sub);

            // Update running predictions on the full set, not just the sample
            for (i, pred) in predictions.iter_mut().enumerate() {
                *pred += self.config.learning_rate * tree.predict_one(x.row(i));
            }

            for (imp, gain) in self.importances.iter_mut().zip(tree.feature_importances()) {
                *imp += gain;
            }

            self.trees.push(tree);

            if (round + 1) % 25 == 0 {
                let mse = residual_mse(y, &predictions);
                log::debug!("Round {}: train MSE {:.5}", round + 1, mse);
            }
        }

        let total: f64 = self.importances.iter().sum();
        if total > 0.0 {
            for imp in &mut self.importances {
                *imp /= total;
            }
        }

        Ok(())
    }

    /// Predict a single row
    pub fn predict_one(&self, row: ArrayView1<f64>) -> f64 {
        let mut prediction = self.base_prediction;
        for tree in &self.trees {
            prediction += self.config.learning_rate * tree.predict_one(row);
        }
        prediction
    }

    /// Predict every row of a matrix
    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::from_iter(x.rows().into_iter().map(|row| self.predict_one(row)))
    }

    /// Normalized per-feature importance (sums to 1 when any split was made)
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}

fn subsample_indices(n: usize, fraction: f64, rng: &mut rand::rngs::StdRng) -> Vec<usize> {
    let take = ((n as f64 * fraction.clamp(0.0, 1.0)).ceil() as usize).max(1).min(n);
    let mut indices: Vec<usize> = (0..n).collect();
    indices.shuffle(rng);
    indices.truncate(take);
    indices.sort_unstable();
    indices
}

fn residual_mse(y: &Array1<f64>, predictions: &Array1<f64>) -> f64 {
    if y.is_empty() {
        return 0.0;
    }
    y.iter()
        .zip(predictions.iter())
        .map(|(yi, pi)| (yi - pi) * (yi - pi))
        .sum::<f64>()
        / y.len() as f64
}
