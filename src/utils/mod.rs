//! Utility functions and types

pub mod data_loader;

pub use data_loader::{
    matrix_to_frame, train_test_split, DataLoader, DataSaver, DEFAULT_SPLIT_SEED,
    DEFAULT_TRAIN_FRACTION,
};
