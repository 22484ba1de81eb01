//! Train/evaluate pass over an assembled dataset
//!
//! One deterministic 85/15 split, one boosted-tree fit, one held-out MSE.
//! No cross-validation, no thresholding: the label is treated as a
//! continuous ordinal.

use crate::data::Dataset;
use crate::training::gbt::GradientBoostedTrees;
use crate::{FeatureRow, ModelConfig, Result, SlgError, TrainingConfig};
use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;

/// Row indices of one train/test partition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Deterministically partition `n` rows: seeded shuffle, last
/// `test_fraction` of the permutation held out.
pub fn split_indices(n: usize, test_fraction: f64, seed: u64) -> TrainTestSplit {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test_count = (n as f64 * test_fraction).round() as usize;
    let train_count = n - test_count.min(n);

    let test = indices.split_off(train_count);
    TrainTestSplit {
        train: indices,
        test,
    }
}

/// Result of one training run
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    /// Mean squared error on the held-out rows
    pub mse: f64,
    /// Per-feature importance, sorted descending
    pub importances: Vec<(String, f64)>,
    pub train_rows: usize,
    pub test_rows: usize,
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Held-out MSE: {:.5} ({} train rows, {} test rows)",
            self.mse, self.train_rows, self.test_rows
        )?;
        writeln!(f)?;
        writeln!(f, "Feature importance:")?;
        for (name, importance) in &self.importances {
            writeln!(f, "  {:<30} {:.4}", name, importance)?;
        }
        Ok(())
    }
}

/// Split the dataset, fit the boosted model on the training rows, and
/// measure squared error on the held-out rows.
pub fn train_and_evaluate(
    dataset: &Dataset,
    training: &TrainingConfig,
    model_config: &ModelConfig,
) -> Result<EvaluationReport> {
    let n = dataset.len();
    if n == 0 {
        return Err(SlgError::InsufficientData {
            rows: 0,
            context: "dataset is empty, nothing to train on".to_string(),
        });
    }

    let split = split_indices(n, training.test_fraction, training.split_seed);
    if split.train.is_empty() || split.test.is_empty() {
        return Err(SlgError::InsufficientData {
            rows: n,
            context: format!(
                "split produced {} train / {} test rows",
                split.train.len(),
                split.test.len()
            ),
        });
    }

    let (x_train, y_train) = to_matrices(dataset, &split.train);
    let (x_test, y_test) = to_matrices(dataset, &split.test);

    log::info!(
        "Training on {} rows, holding out {}",
        split.train.len(),
        split.test.len()
    );

    let mut model = GradientBoostedTrees::new(model_config);
    model.fit(&x_train, &y_train)?;

    let predictions = model.predict(&x_test);
    let mse = y_test
        .iter()
        .zip(predictions.iter())
        .map(|(yi, pi)| (yi - pi) * (yi - pi))
        .sum::<f64>()
        / y_test.len() as f64;

    let mut importances: Vec<(String, f64)> = FeatureRow::PREDICTORS
        .iter()
        .map(|name| name.to_string())
        .zip(model.feature_importances().iter().copied())
        .collect();
    importances.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

    Ok(EvaluationReport {
        mse,
        importances,
        train_rows: split.train.len(),
        test_rows: split.test.len(),
    })
}

/// Assemble the predictor matrix and label vector for a subset of rows
fn to_matrices(dataset: &Dataset, indices: &[usize]) -> (Array2<f64>, Array1<f64>) {
    let rows = dataset.rows();
    let n_features = FeatureRow::PREDICTORS.len();

    let mut flat = Vec::with_capacity(indices.len() * n_features);
    let mut labels = Vec::with_capacity(indices.len());

    for &i in indices {
        flat.extend_from_slice(&rows[i].predictor_values());
        labels.push(rows[i].slg);
    }

    let x = Array2::from_shape_vec((indices.len(), n_features), flat)
        .expect("row-major predictor layout");
    (x, Array1::from_vec(labels))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::schema::{HitData, PitchBreaks, PitchData, Play, PlayEvent, PlayResult};

    fn play(event: &str, velo: f64, angle: f64) -> Play {
        Play {
            result: Some(PlayResult {
                event: Some(event.to_string()),
            }),
            play_events: vec![PlayEvent {
                hit_data: Some(HitData {
                    launch_speed: Some(velo),
                    launch_angle: Some(angle),
                    total_distance: Some(velo * 3.0),
                }),
                pitch_data: Some(PitchData {
                    start_speed: Some(93.0),
                    end_speed: Some(85.0),
                    extension: Some(6.4),
                    breaks: Some(PitchBreaks {
                        break_angle: Some(21.0),
                        break_length: Some(4.9),
                        break_y: Some(24.0),
                        break_vertical: Some(-18.0),
                        break_vertical_induced: Some(14.0),
                        spin_rate: Some(2200.0),
                        spin_direction: Some(205.0),
                    }),
                }),
            }],
        }
    }

    fn synthetic_dataset(n: usize) -> Dataset {
        let mut dataset = Dataset::new();
        for i in 0..n {
            // Harder-hit, higher-angle balls get better outcomes
            let (event, velo, angle) = match i % 4 {
                0 => ("Groundout", 82.0 + (i % 7) as f64, 4.0),
                1 => ("Single", 92.0 + (i % 5) as f64, 12.0),
                2 => ("Double", 100.0 + (i % 3) as f64, 20.0),
                _ => ("Home Run", 106.0 + (i % 4) as f64, 28.0),
            };
            dataset.add_play(&play(event, velo, angle));
        }
        dataset
    }

    #[test]
    fn test_split_is_deterministic() {
        let a = split_indices(100, 0.15, 42);
        let b = split_indices(100, 0.15, 42);
        assert_eq!(a, b);
        assert_eq!(a.train.len(), 85);
        assert_eq!(a.test.len(), 15);

        let c = split_indices(100, 0.15, 43);
        assert_ne!(a, c);
    }

    #[test]
    fn test_split_covers_all_rows() {
        let split = split_indices(37, 0.15, 42);
        let mut all: Vec<usize> = split
            .train
            .iter()
            .chain(split.test.iter())
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..37).collect::<Vec<_>>());
    }

    #[test]
    fn test_empty_dataset_is_insufficient() {
        let dataset = Dataset::new();
        let config = crate::Config::default();
        let result = train_and_evaluate(&dataset, &config.training, &config.model);
        assert!(matches!(
            result,
            Err(SlgError::InsufficientData { rows: 0, .. })
        ));
    }

    #[test]
    fn test_tiny_dataset_is_insufficient() {
        // Two rows: the 15% holdout rounds to zero test rows
        let dataset = synthetic_dataset(2);
        let config = crate::Config::default();
        let result = train_and_evaluate(&dataset, &config.training, &config.model);
        assert!(matches!(result, Err(SlgError::InsufficientData { .. })));
    }

    #[test]
    fn test_evaluation_is_reproducible() {
        let dataset = synthetic_dataset(80);
        let config = crate::Config::default();

        let a = train_and_evaluate(&dataset, &config.training, &config.model).unwrap();
        let b = train_and_evaluate(&dataset, &config.training, &config.model).unwrap();

        assert_eq!(a.mse, b.mse);
        assert_eq!(a.importances, b.importances);
        assert_eq!(a.train_rows, 68);
        assert_eq!(a.test_rows, 12);
    }

    #[test]
    fn test_report_learns_signal() {
        let dataset = synthetic_dataset(120);
        let config = crate::Config::default();

        let report = train_and_evaluate(&dataset, &config.training, &config.model).unwrap();

        // Label variance of the 0/1/2/4 cycle is ~2.19; the model should do
        // far better than predicting the mean
        assert!(report.mse < 1.0, "mse was {}", report.mse);
        assert_eq!(report.importances.len(), FeatureRow::PREDICTORS.len());
        // velo/angle carry the signal in this construction
        let top: Vec<&str> = report
            .importances
            .iter()
            .take(3)
            .map(|(name, _)| name.as_str())
            .collect();
        assert!(
            top.contains(&"velo") || top.contains(&"angle") || top.contains(&"total_distance"),
            "top importances were {:?}",
            top
        );
    }

    #[test]
    fn test_report_display() {
        let report = EvaluationReport {
            mse: 0.12345,
            importances: vec![("velo".to_string(), 0.6), ("angle".to_string(), 0.4)],
            train_rows: 85,
            test_rows: 15,
        };
        let text = report.to_string();
        assert!(text.contains("Held-out MSE: 0.12345"));
        assert!(text.contains("velo"));
        assert!(text.contains("0.6000"));
    }
}
