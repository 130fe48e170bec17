//! Build output validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Lambda routes are unique absolute paths
//! - Static routes are absolute paths
//! - Rules carry a non-empty source
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pattern syntax is checked by table compilation, not here

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::{BuildOutput, RouteEntryConfig};

/// A semantic problem in the build output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyLambdaRoute { lambda: String },
    RelativeLambdaRoute { lambda: String, route: String },
    DuplicateLambdaRoute { route: String },
    RelativeStaticRoute { route: String },
    EmptySource { index: usize },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyLambdaRoute { lambda } => {
                write!(f, "lambda `{}` has an empty route", lambda)
            }
            ValidationError::RelativeLambdaRoute { lambda, route } => {
                write!(f, "lambda `{}` route `{}` must start with '/'", lambda, route)
            }
            ValidationError::DuplicateLambdaRoute { route } => {
                write!(f, "route `{}` is claimed by more than one lambda", route)
            }
            ValidationError::RelativeStaticRoute { route } => {
                write!(f, "static route `{}` must start with '/'", route)
            }
            ValidationError::EmptySource { index } => {
                write!(f, "route {} has an empty src", index)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Check a build output for semantic errors.
pub fn validate_build_output(output: &BuildOutput) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let mut seen = HashSet::new();
    for (name, lambda) in &output.lambdas {
        if lambda.route.is_empty() {
            errors.push(ValidationError::EmptyLambdaRoute {
                lambda: name.clone(),
            });
            continue;
        }
        if !lambda.route.starts_with('/') {
            errors.push(ValidationError::RelativeLambdaRoute {
                lambda: name.clone(),
                route: lambda.route.clone(),
            });
        }
        if !seen.insert(lambda.route.as_str()) {
            errors.push(ValidationError::DuplicateLambdaRoute {
                route: lambda.route.clone(),
            });
        }
    }

    for route in &output.static_routes {
        if !route.starts_with('/') {
            errors.push(ValidationError::RelativeStaticRoute {
                route: route.clone(),
            });
        }
    }

    for (index, entry) in output.routes.iter().enumerate() {
        if let RouteEntryConfig::Rule(rule) = entry {
            if rule.src.is_empty() {
                errors.push(ValidationError::EmptySource { index });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
