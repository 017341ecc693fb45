//! Error aggregation for route construction and compilation.

use std::fmt;
use std::path::PathBuf;

use http::Method;
use parking_lot::Mutex;
use thiserror::Error;
use trellis_openapi::SpecError;

use crate::host::HostError;

/// One problem found while building or compiling a route tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    /// The operation for a route could not be created (malformed path).
    #[error("{method} {path}: {source}")]
    Route {
        method: Method,
        path: String,
        source: SpecError,
    },

    /// The host router refused a handler.
    #[error("{method} {path}: {source}")]
    Host {
        method: Method,
        path: String,
        source: HostError,
    },

    /// A child scope could not be mounted into its parent.
    #[error("mount {prefix}: {source}")]
    Mount { prefix: String, source: HostError },

    /// The schema collaborator rejected an operation during compilation.
    #[error("{method} {path}: {source}")]
    Operation {
        method: Method,
        path: String,
        source: SpecError,
    },
}

/// Concurrency-safe, append-only list of [`BuildError`]s.
///
/// Every step of route construction and compilation reports here instead of
/// returning early, so one pass surfaces every problem in the tree.
#[derive(Debug, Default)]
pub struct ErrorList {
    errors: Mutex<Vec<BuildError>>,
}

impl ErrorList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, error: BuildError) {
        self.errors.lock().push(error);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.lock().is_empty()
    }

    /// Snapshot of the collected errors in append order.
    pub fn errors(&self) -> Vec<BuildError> {
        self.errors.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.errors.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        !self.has_errors()
    }
}

impl fmt::Display for ErrorList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_lines(f, &self.errors.lock())
    }
}

/// The errors a failed compilation produced, in the order they were found.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildErrors(Vec<BuildError>);

impl BuildErrors {
    pub fn new(errors: Vec<BuildError>) -> Self {
        Self(errors)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BuildError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[BuildError] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<BuildError> {
        self.0
    }
}

impl fmt::Display for BuildErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_lines(f, &self.0)
    }
}

impl std::error::Error for BuildErrors {}

impl<'a> IntoIterator for &'a BuildErrors {
    type Item = &'a BuildError;
    type IntoIter = std::slice::Iter<'a, BuildError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

fn write_lines(f: &mut fmt::Formatter<'_>, errors: &[BuildError]) -> fmt::Result {
    for (i, error) in errors.iter().enumerate() {
        if i > 0 {
            f.write_str("\n")?;
        }
        write!(f, "{}", error)?;
    }
    Ok(())
}

/// Errors returned to the application.
#[derive(Debug, Error)]
pub enum Error {
    /// Route construction or compilation found problems.
    #[error(transparent)]
    Build(#[from] BuildErrors),

    /// The API description is disabled, so there is nothing to generate.
    #[error("API description is disabled")]
    Disabled,

    /// The compiled document could not be serialized.
    #[error(transparent)]
    Serialize(SpecError),

    /// Writing the document failed.
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The host router was already taken out of the tree.
    #[error("host router has already been taken")]
    HostConsumed,
}

impl Error {
    /// The individual build errors, if this is a build failure.
    pub fn build_errors(&self) -> Option<&BuildErrors> {
        match self {
            Self::Build(errors) => Some(errors),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn route_error(path: &str) -> BuildError {
        BuildError::Route {
            method: Method::GET,
            path: path.to_string(),
            source: SpecError::InvalidPathTemplate(format!("GET {} - unclosed brace", path)),
        }
    }

    #[test]
    fn empty_list() {
        let list = ErrorList::new();
        assert!(!list.has_errors());
        assert!(list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.to_string(), "");
    }

    #[test]
    fn renders_one_error_per_line_in_order() {
        let list = ErrorList::new();
        list.add(route_error("/a{"));
        list.add(route_error("/b{"));

        assert!(list.has_errors());
        assert_eq!(list.len(), 2);

        let rendered = list.to_string();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("GET /a{: E1054"));
        assert!(lines[1].starts_with("GET /b{: E1054"));
    }

    #[test]
    fn build_errors_display_matches_list() {
        let list = ErrorList::new();
        list.add(route_error("/a{"));
        list.add(BuildError::Mount {
            prefix: "/pets".to_string(),
            source: HostError::UnsupportedMethod("CONNECT".to_string()),
        });

        let errors = BuildErrors::new(list.errors());
        assert_eq!(errors.to_string(), list.to_string());
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.iter().count(), 2);
    }

    #[test]
    fn concurrent_adds_are_all_kept() {
        let list = Arc::new(ErrorList::new());

        std::thread::scope(|scope| {
            for t in 0..8 {
                let list = Arc::clone(&list);
                scope.spawn(move || {
                    for i in 0..50 {
                        list.add(route_error(&format!("/t{}/{}", t, i)));
                    }
                });
            }
        });

        assert_eq!(list.len(), 400);
    }

    #[test]
    fn error_wraps_build_errors() {
        let err = Error::from(BuildErrors::new(vec![route_error("/x{")]));
        assert!(err.build_errors().is_some());
        assert!(err.to_string().contains("GET /x{"));
        assert!(Error::Disabled.build_errors().is_none());
    }

    #[test]
    fn variants_with_same_message_differ() {
        let route = route_error("/a{");
        let operation = BuildError::Operation {
            method: Method::GET,
            path: "/a{".to_string(),
            source: SpecError::InvalidPathTemplate("GET /a{ - unclosed brace".to_string()),
        };

        assert_eq!(route.to_string(), operation.to_string());
        assert_ne!(route, operation);
        assert_eq!(route, route_error("/a{"));
    }
}
