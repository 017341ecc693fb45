//! RFC 9457 Problem Details responses.

use axum::response::{IntoResponse, Response};
use axum::Json;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, StatusCode};
use serde::Serialize;
use trellis::{BuildError, BuildErrors, Error};

/// RFC 9457 Problem Details response.
#[derive(Debug, Clone, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub error_type: String,
    pub title: String,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ValidationIssue>,
}

/// A single problem in the route tree.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl From<&BuildError> for ValidationIssue {
    fn from(error: &BuildError) -> Self {
        let (code, message, location) = match error {
            BuildError::Route {
                method,
                path,
                source,
            }
            | BuildError::Operation {
                method,
                path,
                source,
            } => (source.code(), source.to_string(), format!("{} {}", method, path)),
            BuildError::Host {
                method,
                path,
                source,
            } => ("host", source.to_string(), format!("{} {}", method, path)),
            BuildError::Mount { prefix, source } => ("mount", source.to_string(), prefix.clone()),
        };

        Self {
            code: code.to_string(),
            message,
            location: Some(location),
        }
    }
}

impl ProblemDetails {
    fn new(kind: &str, title: &str, status: StatusCode, detail: Option<String>) -> Self {
        Self {
            error_type: format!("urn:trellis:error:{}", kind),
            title: title.into(),
            status: status.as_u16(),
            detail,
            instance: None,
            errors: vec![],
        }
    }

    /// Create a 404 Not Found error.
    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new("not-found", "Not Found", StatusCode::NOT_FOUND, Some(detail.into()))
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(
            "bad-request",
            "Bad Request",
            StatusCode::BAD_REQUEST,
            Some(detail.into()),
        )
    }

    /// Create a 409 Conflict error.
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::new("conflict", "Conflict", StatusCode::CONFLICT, Some(detail.into()))
    }

    /// Create a 500 Internal Server Error.
    pub fn internal_error() -> Self {
        Self::new(
            "internal-error",
            "Internal Server Error",
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
        )
    }

    /// Create a 500 error listing every problem in the route tree.
    pub fn build_failed(errors: &BuildErrors) -> Self {
        let mut problem = Self::new(
            "spec-invalid",
            "API Description Invalid",
            StatusCode::INTERNAL_SERVER_ERROR,
            Some(format!("{} error(s) in route tree", errors.len())),
        );
        problem.errors = errors.iter().map(ValidationIssue::from).collect();
        problem
    }

    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

impl From<&Error> for ProblemDetails {
    fn from(err: &Error) -> Self {
        match err {
            Error::Build(errors) => Self::build_failed(errors),
            Error::Disabled => Self::not_found("API description is disabled"),
            _ => {
                tracing::error!(error = %err, "failed to produce API description");
                Self::internal_error()
            }
        }
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut response = Json(&self).into_response();
        *response.status_mut() = status;
        response.headers_mut().insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}
