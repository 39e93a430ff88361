//! fraudprep - Feature cleaning and class balancing for binary fraud/churn models
//!
//! This crate turns a raw record table into a numeric feature matrix and a
//! binary label vector, then oversamples the positive class to a target
//! proportion before the data reaches a model trainer.
//!
//! # Modules
//!
//! - [`preprocessing`] - Ordered table transforms and the `clean` composition
//! - [`synthetic`] - Class balancing by random oversampling
//! - [`utils`] - Loading, saving and train/test splitting
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Table transforms and balancing
pub mod preprocessing;
pub mod synthetic;

// Utilities
pub mod utils;

// Services
pub mod cli;

pub use error::{PrepError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{PrepError, Result};

    // Preprocessing
    pub use crate::preprocessing::{
        clean, clean_and_balance, to_matrix, CleaningConfig, PipelineStep, TransformPipeline,
    };

    // Balancing
    pub use crate::synthetic::{class_counts, ClassCounts, RandomOverSampler, ResampleResult, Sampler};

    // Data IO
    pub use crate::utils::{train_test_split, DataLoader, DataSaver};
}
