//! End-to-end chef pipeline for scormchef.
//!
//! Wires the staging, packaging, and channel crates into the one-shot batch
//! run a content curator invokes: extract course archives, stage each lesson
//! that is not staged yet, package every lesson reproducibly, and write the
//! channel manifest.

pub mod pipeline;

pub use pipeline::{
    ChefRunConfig, ChefRunResult, ProgressReporter, SilentProgress, run_chef,
};
