//! Shared types, error model, and configuration for scormchef.
//!
//! This crate is the foundation depended on by all other scormchef crates.
//! It provides:
//! - [`ChefError`] — the unified error type
//! - Domain types ([`CourseData`], [`CourseSpec`], [`LessonSpec`])
//! - Configuration ([`AppConfig`], [`ChannelConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, ChannelConfig, DefaultsConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{ChefError, Result};
pub use types::{CourseData, CourseSpec, LessonSpec, course_slug, load_course_data};
