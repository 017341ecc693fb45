//! The capability interface a host web framework implements.

use http::Method;
use thiserror::Error;

/// Errors a host router reports instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The same method and path were registered twice.
    #[error("route already registered: {method} {path}")]
    Duplicate { method: String, path: String },

    /// Two paths that the host cannot tell apart.
    #[error("path {path} conflicts with {existing}")]
    Conflict { path: String, existing: String },

    /// The host cannot dispatch this method.
    #[error("method {0} is not supported by this host")]
    UnsupportedMethod(String),

    /// The node's scope was already mounted into its parent.
    #[error("host scope has already been taken")]
    Detached,

    /// The host cannot parse the path.
    #[error("invalid path {path}: {reason}")]
    InvalidPath { path: String, reason: String },
}

/// A web framework router, seen through the three operations the route tree
/// needs.
///
/// Every node of the tree owns one scope. Routes are registered on the scope
/// of the node they were declared on, with paths relative to that node, and
/// each child scope is mounted into its parent under the child's prefix when
/// the tree is turned back into a host router.
pub trait HostRouter: Sized {
    type Handler;

    /// Register `handler` for `method` and a brace-syntax `path`.
    fn register(
        &mut self,
        method: &Method,
        path: &str,
        handler: Self::Handler,
    ) -> Result<(), HostError>;

    /// A fresh, empty scope compatible with this one.
    fn sub_scope(&self) -> Self;

    /// Mount a child scope under `prefix` (`/` means merge at the same level).
    ///
    /// Reports every route of `scope` the host rejected, not only the first.
    fn mount(&mut self, prefix: &str, scope: Self) -> Result<(), Vec<HostError>>;
}

/// Host binding for trees that are only used to produce documentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoHost;

impl HostRouter for NoHost {
    type Handler = ();

    fn register(&mut self, _method: &Method, _path: &str, _handler: ()) -> Result<(), HostError> {
        Ok(())
    }

    fn sub_scope(&self) -> Self {
        NoHost
    }

    fn mount(&mut self, _prefix: &str, _scope: Self) -> Result<(), Vec<HostError>> {
        Ok(())
    }
}
