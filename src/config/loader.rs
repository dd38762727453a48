// src/config/loader.rs

use std::fs;
use std::path::Path;

use crate::config::model::{FrameFile, RawFrameFile};
use crate::errors::Result;

/// Load a frame file from a given path and return the raw `RawFrameFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (unknown `after` names, cycles, etc.). Use [`load_and_validate`]
/// for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawFrameFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_str(&contents)
}

/// Parse frame TOML that is already in memory.
pub fn parse_str(contents: &str) -> Result<RawFrameFile> {
    let frame: RawFrameFile = toml::from_str(contents)?;
    Ok(frame)
}

/// Load a frame file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - at least one job,
///   - unknown or self-referencing `after` entries,
///   - dependency cycles,
///   - `[scheduler]` sanity.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<FrameFile> {
    let raw = load_from_path(&path)?;
    let frame = FrameFile::try_from(raw)?;
    Ok(frame)
}
