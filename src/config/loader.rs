//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{BuildOutput, ServerConfig};
use crate::config::validation::{validate_build_output, ValidationError};
use crate::routing::{RouteTable, RouteTableError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Route table rejected: {0}")]
    Table(#[from] RouteTableError),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load the service configuration from a TOML file.
pub fn load_server_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Parse and validate a build output document.
pub fn parse_build_output(content: &str) -> Result<BuildOutput, ConfigError> {
    let output: BuildOutput = serde_json::from_str(content)?;
    validate_build_output(&output).map_err(ConfigError::Validation)?;
    Ok(output)
}

/// Load and validate the build output JSON.
pub fn load_build_output(path: &Path) -> Result<BuildOutput, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_build_output(&content)
}

/// Load the build output and compile it into a route table.
pub fn load_route_table(path: &Path) -> Result<RouteTable, ConfigError> {
    let output = load_build_output(path)?;
    let table = RouteTable::from_build_output(&output)?;

    tracing::info!(
        path = ?path,
        entries = table.len(),
        lambdas = output.lambdas.len(),
        static_routes = output.static_routes.len(),
        "Route table compiled"
    );

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_output() {
        let output = parse_build_output(
            r#"{ "routes": [{ "src": "/" }], "lambdas": {}, "staticRoutes": ["/a.txt"] }"#,
        )
        .unwrap();
        assert_eq!(output.routes.len(), 1);
    }

    #[test]
    fn test_parse_error() {
        let err = parse_build_output("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_validation_error_lists_all() {
        let err = parse_build_output(
            r#"{ "routes": [{ "src": "" }], "staticRoutes": ["no-slash"] }"#,
        )
        .unwrap_err();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = load_build_output(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
