//! Tests for logging functionality
//!
//! These tests verify that logging initialization works correctly
//! with different configurations.

use std::str::FromStr;
use typegram::core::logging::{init_logging, LogFormat};

#[test]
fn test_log_format_parsing() {
    assert_eq!(LogFormat::from_str("compact").unwrap(), LogFormat::Compact);
    assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
    assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
    assert_eq!(LogFormat::from_str("COMPACT").unwrap(), LogFormat::Compact);
    assert!(LogFormat::from_str("invalid").is_err());
}

#[test]
fn test_log_format_variants() {
    let variants = LogFormat::variants();
    assert!(variants.contains(&"compact"));
    assert!(variants.contains(&"pretty"));
    assert!(variants.contains(&"json"));
}

#[test]
fn test_init_logging_tolerates_reinitialization() {
    // Only the first call can install the global subscriber; later calls
    // must fail gracefully instead of panicking.
    let _ = init_logging(Some("debug"), Some("compact"));
    let _ = init_logging(Some("info"), Some("pretty"));
    let _ = init_logging(Some("off"), Some("json"));

    let output = typegram::render(r#"{ "modules": [] }"#).unwrap();
    assert!(output.starts_with("@startuml"));
}
