//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::env::apply_env_overrides;
use crate::config::schema::ProxyConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {reason}")]
    Env { name: String, reason: String },

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML file. Sections it leaves out keep their defaults.
fn read_file(path: &Path) -> Result<ProxyConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build the process configuration: defaults, then the optional file, then
/// environment overrides, validated once at the end.
pub fn resolve_config<F>(path: Option<&Path>, lookup: F) -> Result<ProxyConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [listener]
            port = 4100

            [cors]
            allowed_origin = "https://maps.example"
            "#
        )
        .unwrap();

        let config = resolve_config(Some(file.path()), no_env).unwrap();
        assert_eq!(config.listener.port, 4100);
        assert_eq!(config.cors.allowed_origin, "https://maps.example");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = resolve_config(Some(Path::new("/definitely/not/here.toml")), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener\nport = ").unwrap();
        let err = resolve_config(Some(file.path()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_invalid_file_reports_validation() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[routing]\nfixed_route = \"nope\"").unwrap();
        let err = resolve_config(Some(file.path()), no_env).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref v) if v.len() == 1));
        assert!(err.to_string().contains("fixed_route"));
    }

    #[test]
    fn test_resolve_without_file_uses_defaults() {
        let config = resolve_config(None, no_env).unwrap();
        assert_eq!(config.listener.port, 3000);
        assert!(config.upstream.credential.is_none());
    }

    #[test]
    fn test_environment_wins_over_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[listener]\nport = 4100").unwrap();

        let config = resolve_config(Some(file.path()), |name| match name {
            "PORT" => Some("5200".to_string()),
            "PLACES_API_KEY" => Some("from-env".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.listener.port, 5200);
        assert_eq!(config.upstream.credential.unwrap().expose(), "from-env");
    }

    #[test]
    fn test_blank_credential_in_file_is_unset() {
        for value in ["", "  "] {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(file, "[upstream]\ncredential = \"{}\"", value).unwrap();

            let config = resolve_config(Some(file.path()), no_env).unwrap();
            assert!(config.upstream.credential.is_none());
        }
    }

    #[test]
    fn test_blank_file_credential_yields_to_environment() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[upstream]\ncredential = \" \"").unwrap();

        let config = resolve_config(Some(file.path()), |name| {
            (name == "PLACES_API_KEY").then(|| "from-env".to_string())
        })
        .unwrap();
        assert_eq!(config.upstream.credential.unwrap().expose(), "from-env");
    }

    #[test]
    fn test_file_credential_and_body_limit() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [upstream]
            credential = "file-key"

            [security]
            max_body_size = 1024
            "#
        )
        .unwrap();

        let config = resolve_config(Some(file.path()), no_env).unwrap();
        assert_eq!(config.upstream.credential.unwrap().expose(), "file-key");
        assert_eq!(config.security.max_body_size, 1024);
    }
}
