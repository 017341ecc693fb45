//! The one-shot compile pass and the handle that exposes its output.

use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use trellis_openapi::{Format, SpecConfig};
use trellis_telemetry::{log_compile_finished, log_compile_started, log_schema_written};

use crate::context::{Context, Outcome, Tree, ROOT};
use crate::error::{BuildError, BuildErrors, Error};

impl Context {
    /// Merge inherited metadata into every visible route and register it with
    /// the spec builder. Runs at most once per tree; later calls, including
    /// concurrent ones, get the latched outcome.
    pub(crate) fn compile(&self) -> Outcome {
        let mut compiled = self.compiled.lock();
        if let Some(outcome) = compiled.as_ref() {
            return outcome.clone();
        }

        let mut tree = self.tree.lock();
        self.frozen.store(true, Ordering::Release);

        log_compile_started!(
            nodes = tree.nodes.len(),
            routes = tree.routes.len(),
            "compiling route tree"
        );

        let (registered, hidden) = if self.enabled {
            self.walk(&mut tree)
        } else {
            (0, 0)
        };
        drop(tree);

        let outcome = if self.errors.has_errors() {
            Err(BuildErrors::new(self.errors.errors()))
        } else {
            Ok(())
        };

        log_compile_finished!(
            registered,
            hidden,
            errors = outcome.as_ref().err().map_or(0, BuildErrors::len),
            "route tree compiled"
        );

        *compiled = Some(outcome.clone());
        outcome
    }

    /// Depth-first from the root: a node's routes, then its children, both in
    /// insertion order. Returns (registered, hidden) counts.
    fn walk(&self, tree: &mut Tree) -> (usize, usize) {
        let mut spec = self.spec.lock();
        let Tree { nodes, routes } = tree;
        let mut registered = 0;
        let mut hidden = 0;

        let mut stack = vec![ROOT];
        while let Some(node_id) = stack.pop() {
            let node = &nodes[node_id.0];

            for route_id in &node.routes {
                let entry = &mut routes[route_id.0];
                let Some(mut operation) = entry.operation.take() else {
                    continue;
                };

                let effective = entry.inherited.merged(&entry.own);
                if effective.hidden {
                    hidden += 1;
                    continue;
                }

                for tag in effective.tags {
                    operation.add_tag(tag);
                }
                for requirement in effective.security {
                    operation.add_security(requirement);
                }

                match spec.register_operation(operation) {
                    Ok(()) => registered += 1,
                    Err(source) => {
                        tracing::debug!(
                            method = %entry.method,
                            path = %entry.path,
                            error = %source,
                            "operation rejected"
                        );
                        self.errors.add(BuildError::Operation {
                            method: entry.method.clone(),
                            path: entry.path.clone(),
                            source,
                        });
                    }
                }
            }

            stack.extend(node.children.iter().rev().copied());
        }

        (registered, hidden)
    }
}

/// Cloneable, thread-safe access to a tree's API description.
///
/// Every method triggers the compile pass on first use. Obtain one with
/// [`ApiRouter::schema`](crate::ApiRouter::schema) to serve the document
/// from request handlers.
#[derive(Clone)]
pub struct Schema {
    ctx: Arc<Context>,
}

impl Schema {
    pub(crate) fn new(ctx: Arc<Context>) -> Self {
        Self { ctx }
    }

    /// Compile the tree and report every problem found.
    pub fn validate(&self) -> Result<(), Error> {
        self.ctx.compile()?;
        Ok(())
    }

    /// Compile the tree and serialize the document.
    pub fn generate(&self, format: Format) -> Result<Vec<u8>, Error> {
        if !self.ctx.enabled {
            return Err(Error::Disabled);
        }
        self.ctx.compile()?;
        self.ctx.spec.lock().serialize(format).map_err(Error::Serialize)
    }

    /// Write the document to `path`: JSON for `.json`, YAML otherwise.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let path = path.as_ref();
        let bytes = self.generate(Format::from_path(path))?;

        std::fs::write(path, &bytes).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;

        log_schema_written!(
            path = %path.display(),
            bytes = bytes.len(),
            "API description written"
        );
        Ok(())
    }

    pub fn config(&self) -> SpecConfig {
        self.ctx.spec.lock().config().clone()
    }

    /// Whether the API description is generated at all.
    pub fn enabled(&self) -> bool {
        self.ctx.enabled
    }

    pub fn is_compiled(&self) -> bool {
        self.ctx.compiled.lock().is_some()
    }

    /// Errors collected so far, including those recorded after compilation.
    pub fn errors(&self) -> Vec<BuildError> {
        self.ctx.errors.errors()
    }
}

impl std::fmt::Debug for Schema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Schema")
            .field("enabled", &self.ctx.enabled)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}
