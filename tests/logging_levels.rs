// tests/logging_levels.rs

use jobgraph::cli::LogLevel;
use jobgraph::logging::parse_level;
use tracing::Level;

#[test]
fn test_env_level_names_are_case_insensitive() {
    assert_eq!(parse_level("DEBUG"), Some(Level::DEBUG));
    assert_eq!(parse_level(" warning "), Some(Level::WARN));
    assert_eq!(parse_level("verbose"), None);
}

#[test]
fn test_cli_level_maps_to_tracing_level() {
    assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
}
