//! Model training and evaluation
//!
//! Gradient boosted tree regression over the extracted pitch/hit features,
//! with a deterministic train/test split and held-out error reporting.

pub mod gbt;
pub mod trainer;
pub mod tree;

pub use gbt::GradientBoostedTrees;
pub use trainer::{train_and_evaluate, EvaluationReport};
pub use tree::RegressionTree;
