use super::schema::Config;

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref path) = config.export_path {
        if path.trim().is_empty() {
            errors.push("export_path: must not be empty".to_string());
        }
    }

    if let Some(ref suggest) = config.suggest {
        let endpoint = suggest.endpoint.trim();
        if !(endpoint.starts_with("http://") || endpoint.starts_with("https://")) {
            errors.push(format!(
                "suggest.endpoint: invalid '{}' - must be an http:// or https:// URL",
                suggest.endpoint
            ));
        }

        let timeout = suggest.timeout_str();
        match humantime::parse_duration(timeout) {
            Ok(d) if d.is_zero() => {
                errors.push("suggest.timeout: must be greater than zero".to_string());
            }
            Ok(_) => {}
            Err(e) => {
                errors.push(format!("suggest.timeout: invalid format '{}' - {}", timeout, e));
            }
        }

        if suggest.max_length == Some(0) {
            errors.push("suggest.max_length: must be greater than zero".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SuggestConfig;

    fn suggest(endpoint: &str, timeout: Option<&str>, max_length: Option<u32>) -> SuggestConfig {
        SuggestConfig {
            endpoint: endpoint.to_string(),
            timeout: timeout.map(str::to_string),
            max_length,
            retries: None,
        }
    }

    #[test]
    fn test_default_config_valid() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_valid_suggest_config() {
        let config = Config {
            suggest: Some(suggest("https://example.com/gen", Some("2s"), Some(50))),
            ..Config::default()
        };
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_invalid_endpoint() {
        let config = Config {
            suggest: Some(suggest("example.com", None, None)),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("suggest.endpoint"));
    }

    #[test]
    fn test_invalid_timeout() {
        let config = Config {
            suggest: Some(suggest("http://localhost", Some("soon"), None)),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert!(errors[0].contains("suggest.timeout"));
    }

    #[test]
    fn test_empty_export_path() {
        let config = Config {
            export_path: Some("  ".to_string()),
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec!["export_path: must not be empty".to_string()]);
    }

    #[test]
    fn test_collects_all_errors() {
        let config = Config {
            export_path: Some(String::new()), // Error 1
            suggest: Some(suggest("ftp://x", Some("0s"), Some(0))), // Errors 2, 3, 4
            ..Config::default()
        };
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
    }
}
