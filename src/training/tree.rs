//! Regression tree
//!
//! Depth-limited binary tree with variance-reduction splits, used as the
//! weak learner inside the boosted ensemble. Split search sorts each
//! feature once and sweeps prefix sums, so every distinct threshold is
//! evaluated in one pass.

use ndarray::{Array1, Array2, ArrayView1};

#[derive(Debug, Clone)]
enum TreeNode {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<TreeNode>,
        right: Box<TreeNode>,
    },
}

/// A fitted regression tree
#[derive(Debug, Clone)]
pub struct RegressionTree {
    root: Option<TreeNode>,
    max_depth: usize,
    min_samples_leaf: usize,
    importances: Vec<f64>,
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    /// Sum-of-squared-error reduction achieved by the split
    gain: f64,
}

impl RegressionTree {
    pub fn new(max_depth: usize, min_samples_leaf: usize) -> Self {
        RegressionTree {
            root: None,
            max_depth,
            min_samples_leaf: min_samples_leaf.max(1),
            importances: Vec::new(),
        }
    }

    /// Fit the tree. An empty input produces a constant-zero tree.
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) {
        debug_assert_eq!(x.nrows(), y.len());

        let n_features = x.ncols();
        let mut importances = vec![0.0; n_features];

        if y.is_empty() {
            self.root = Some(TreeNode::Leaf { value: 0.0 });
        } else {
            let indices: Vec<usize> = (0..x.nrows()).collect();
            self.root = Some(self.build(x, y, &indices, 0, &mut importances));
        }

        self.importances = importances;
    }

    fn build(
        &self,
        x: &Array2<f64>,
        y: &Array1<f64>,
        indices: &[usize],
        depth: usize,
        importances: &mut [f64],
    ) -> TreeNode {
        let n = indices.len();
        let mean = indices.iter().map(|&i| y[i]).sum::<f64>() / n as f64;

        if depth >= self.max_depth || n < 2 * self.min_samples_leaf || n < 2 {
            return TreeNode::Leaf { value: mean };
        }

        let Some(split) = self.best_split(x, y, indices) else {
            return TreeNode::Leaf { value: mean };
        };

        let (left_indices, right_indices): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, split.feature]] <= split.threshold);

        if left_indices.len() < self.min_samples_leaf
            || right_indices.len() < self.min_samples_leaf
        {
            return TreeNode::Leaf { value: mean };
        }

        importances[split.feature] += split.gain;

        let left = Box::new(self.build(x, y, &left_indices, depth + 1, importances));
        let right = Box::new(self.build(x, y, &right_indices, depth + 1, importances));

        TreeNode::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        }
    }

    fn best_split(&self, x: &Array2<f64>, y: &Array1<f64>, indices: &[usize]) -> Option<BestSplit> {
        let n = indices.len();
        let total_sum: f64 = indices.iter().map(|&i| y[i]).sum();
        let total_sq: f64 = indices.iter().map(|&i| y[i] * y[i]).sum();
        let parent_sse = total_sq - total_sum * total_sum / n as f64;

        let mut best: Option<BestSplit> = None;

        for feature in 0..x.ncols() {
            let mut ordered: Vec<(f64, f64)> = indices
                .iter()
                .map(|&i| (x[[i, feature]], y[i]))
                .collect();
            ordered.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

            let mut left_sum = 0.0;
            let mut left_sq = 0.0;

            for (k, &(value, target)) in ordered.iter().enumerate().take(n - 1) {
                left_sum += target;
                left_sq += target * target;

                // Only cut between distinct feature values
                if value == ordered[k + 1].0 {
                    continue;
                }

                let left_n = k + 1;
                let right_n = n - left_n;
                if left_n < self.min_samples_leaf || right_n < self.min_samples_leaf {
                    continue;
                }

                let right_sum = total_sum - left_sum;
                let right_sq = total_sq - left_sq;
                let left_sse = left_sq - left_sum * left_sum / left_n as f64;
                let right_sse = right_sq - right_sum * right_sum / right_n as f64;
                let gain = parent_sse - left_sse - right_sse;

                if gain > best.as_ref().map_or(1e-12, |b| b.gain) {
                    best = Some(BestSplit {
                        feature,
                        threshold: (value + ordered[k + 1].0) / 2.0,
                        gain,
                    });
                }
            }
        }

        best
    }

    /// Predict a single row
    pub fn predict_one(&self, row: ArrayView1<f64>) -> f64 {
        let mut node = match &self.root {
            Some(root) => root,
            None => return 0.0,
        };

        loop {
            match node {
                TreeNode::Leaf { value } => return *value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    node = if row[*feature] <= *threshold {
                        left
                    } else {
                        right
                    };
                }
            }
        }
    }

    /// Predict every row of a matrix
    pub fn predict(&self, x: &Array2<f64>) -> Array1<f64> {
        Array1::from_iter(x.rows().into_iter().map(|row| self.predict_one(row)))
    }

    /// Raw per-feature SSE-reduction totals accumulated over all splits
    pub fn feature_importances(&self) -> &[f64] {
        &self.importances
    }
}
