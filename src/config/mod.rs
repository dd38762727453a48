// src/config/mod.rs

//! Configuration loading and validation.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`): scheduler settings and
//!   the demo frame description.
//! - Load a frame file from disk (`loader.rs`).
//! - Validate invariants like dependency correctness (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path, parse_str};
pub use model::{FrameFile, JobConfig, RawFrameFile, SchedulerConfig};
pub use validate::validate_scheduler_config;
