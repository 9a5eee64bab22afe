use std::path::Path;

use crate::config::schema::{Config, DelayRange, CONFIG_VERSION};
use crate::error::ConfigError;

const SCHEMA_JSON: &str = include_str!("../../schema/config-v1.json");

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<Config, ConfigError> {
    let json_value: serde_json::Value = serde_json::from_str(content)?;

    validate_schema(&json_value)?;

    let config: Config = serde_json::from_value(json_value)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_schema(json_value: &serde_json::Value) -> Result<(), ConfigError> {
    let schema: serde_json::Value =
        serde_json::from_str(SCHEMA_JSON).map_err(|e| ConfigError::Validation {
            message: format!("Invalid embedded schema JSON: {}", e),
        })?;

    let validator = jsonschema::validator_for(&schema).map_err(|e| ConfigError::Validation {
        message: format!("Failed to compile JSON schema: {}", e),
    })?;

    let error_messages: Vec<String> = validator
        .iter_errors(json_value)
        .map(|e| e.to_string())
        .collect();
    if !error_messages.is_empty() {
        return Err(ConfigError::SchemaValidation {
            errors: error_messages.join("; "),
        });
    }

    Ok(())
}

/// Semantic checks the schema cannot express. Also applies to configs built
/// in code.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.version != CONFIG_VERSION {
        return Err(ConfigError::Validation {
            message: format!("Unsupported config version: {}", config.version),
        });
    }

    if config.upload.max_files == 0 {
        return Err(ConfigError::Validation {
            message: "upload.max_files must be at least 1".to_string(),
        });
    }

    let ocr = &config.ocr;
    if !(0.0..=1.0).contains(&ocr.failure_rate) {
        return Err(ConfigError::Validation {
            message: format!(
                "ocr.failure_rate must be within [0, 1], got {}",
                ocr.failure_rate
            ),
        });
    }
    if !(0.0..=1.0).contains(&ocr.confidence_min)
        || !(0.0..=1.0).contains(&ocr.confidence_max)
        || ocr.confidence_min > ocr.confidence_max
    {
        return Err(ConfigError::Validation {
            message: format!(
                "ocr confidence range [{}, {}] must satisfy 0 <= min <= max <= 1",
                ocr.confidence_min, ocr.confidence_max
            ),
        });
    }

    for (name, range) in config.latency.ranges() {
        validate_delay(name, &range)?;
    }

    Ok(())
}

fn validate_delay(name: &str, range: &DelayRange) -> Result<(), ConfigError> {
    if range.min_ms > range.max_ms {
        return Err(ConfigError::Validation {
            message: format!(
                "{}: min_ms ({}) exceeds max_ms ({})",
                name, range.min_ms, range.max_ms
            ),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_empty_config_uses_defaults() {
        let config = load_config_from_str("{}").unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.upload.max_files, 10);
        assert_eq!(config.latency.ocr.poll, DelayRange::fixed(1500));
        assert_eq!(config.poller.interval_ms, 1500);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_load_full_config() {
        let config_json = r#"
        {
            "version": "1.0",
            "upload": {
                "max_files": 5,
                "max_file_size": 1048576,
                "accepted_formats": ["image/png"]
            },
            "latency": {
                "ocr": {
                    "upload": { "min_ms": 0, "max_ms": 10 },
                    "poll": { "min_ms": 5, "max_ms": 5 }
                }
            },
            "ocr": {
                "failure_rate": 0.25,
                "seconds_per_file": 2
            },
            "poller": { "interval_ms": 100, "max_polls": 20 },
            "seed": 42
        }
        "#;

        let config = load_config_from_str(config_json).unwrap();
        assert_eq!(config.upload.max_files, 5);
        assert_eq!(config.upload.accepted_formats, vec!["image/png"]);
        assert_eq!(config.latency.ocr.upload, DelayRange::between(0, 10));
        assert_eq!(config.latency.ocr.start, DelayRange::fixed(500));
        assert_eq!(config.ocr.failure_rate, 0.25);
        assert_eq!(config.ocr.confidence_max, 0.99);
        assert_eq!(config.poller.max_polls, Some(20));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_invalid_version() {
        let result = load_config_from_str(r#"{ "version": "2.0" }"#);
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_unknown_field_rejected_by_schema() {
        let result = load_config_from_str(r#"{ "workers": 4 }"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_zero_max_files_rejected_by_schema() {
        let result = load_config_from_str(r#"{ "upload": { "max_files": 0 } }"#);
        assert!(matches!(result, Err(ConfigError::SchemaValidation { .. })));
    }

    #[test]
    fn test_failure_rate_out_of_range() {
        let result = load_config_from_str(r#"{ "ocr": { "failure_rate": 1.5 } }"#);
        match result {
            Err(ConfigError::Validation { message }) => {
                assert!(message.contains("failure_rate"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_inverted_confidence_range() {
        let result = load_config_from_str(
            r#"{ "ocr": { "confidence_min": 0.9, "confidence_max": 0.8 } }"#,
        );
        assert!(matches!(result, Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_inverted_delay_range() {
        let result = load_config_from_str(
            r#"{ "latency": { "tiktok": { "sound": { "min_ms": 10, "max_ms": 1 } } } }"#,
        );
        match result {
            Err(ConfigError::Validation { message }) => {
                assert!(message.contains("latency.tiktok.sound"));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_json() {
        let result = load_config_from_str("{ not json");
        assert!(matches!(result, Err(ConfigError::ParseJson(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config("/nonexistent/snapscribe.json");
        match result {
            Err(ConfigError::ReadFile { path, .. }) => {
                assert_eq!(path.to_str().unwrap(), "/nonexistent/snapscribe.json");
            }
            other => panic!("Expected ReadFile error, got {:?}", other),
        }
    }
}
