//! [`HostRouter`] binding that collects routes and builds a [`Router`].

use http::Method;
use trellis::{join_paths, HostError, HostRouter};

use crate::trie::Router;

/// A scope of collected routes.
///
/// Registration only checks for exact duplicates; parameter-name conflicts
/// are found when the trie is built.
#[derive(Debug)]
pub struct TrieHost<H> {
    entries: Vec<(Method, String, H)>,
}

impl<H> Default for TrieHost<H> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<H> TrieHost<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered (method, path) pairs in registration order.
    pub fn routes(&self) -> impl Iterator<Item = (&Method, &str)> + '_ {
        self.entries.iter().map(|(m, p, _)| (m, p.as_str()))
    }

    /// Build the trie from every collected route.
    pub fn build(self) -> Result<Router<H>, HostError> {
        let mut router = Router::new();
        for (method, path, handler) in self.entries {
            router.insert(&path, &method, handler)?;
        }
        Ok(router)
    }
}

impl<H> HostRouter for TrieHost<H> {
    type Handler = H;

    fn register(&mut self, method: &Method, path: &str, handler: H) -> Result<(), HostError> {
        let path = crate::trie::normalize_path(path);
        if self.entries.iter().any(|(m, p, _)| m == method && *p == path) {
            return Err(HostError::Duplicate {
                method: method.to_string(),
                path,
            });
        }
        self.entries.push((method.clone(), path, handler));
        Ok(())
    }

    fn sub_scope(&self) -> Self {
        Self::default()
    }

    /// Routes the parent already has are skipped and reported; the rest of
    /// the scope is still mounted.
    fn mount(&mut self, prefix: &str, scope: Self) -> Result<(), Vec<HostError>> {
        let mut errors = Vec::new();
        for (method, path, handler) in scope.entries {
            if let Err(e) = self.register(&method, &join_paths(prefix, &path), handler) {
                errors.push(e);
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
