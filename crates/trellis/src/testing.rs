//! Test doubles for the spec builder and the host router.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use http::Method;
use parking_lot::Mutex;
use trellis_openapi::{
    validate_path_template, Format, OperationBuilder, SpecBuilder, SpecConfig, SpecError,
};

use crate::host::{HostError, HostRouter};
use crate::path::join_paths;

/// Spec builder that records what it is given.
pub(crate) struct StubSpec {
    config: SpecConfig,
    log: SpecLog,
    ids: HashMap<String, String>,
}

/// Shared view into a [`StubSpec`] after it has been moved into a tree.
#[derive(Clone, Default)]
pub(crate) struct SpecLog {
    registered: Arc<Mutex<Vec<OperationBuilder>>>,
    calls: Arc<AtomicUsize>,
}

impl StubSpec {
    pub(crate) fn new(config: SpecConfig) -> (Self, SpecLog) {
        let log = SpecLog::default();
        let spec = Self {
            config,
            log: log.clone(),
            ids: HashMap::new(),
        };
        (spec, log)
    }
}

impl SpecLog {
    /// Number of `register_operation` calls.
    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn operations(&self) -> Vec<OperationBuilder> {
        self.registered.lock().clone()
    }

    pub(crate) fn find(&self, method: Method, path: &str) -> Option<OperationBuilder> {
        self.registered
            .lock()
            .iter()
            .find(|op| *op.method() == method && op.path() == path)
            .cloned()
    }
}

impl SpecBuilder for StubSpec {
    fn new_operation(&self, method: &Method, path: &str) -> Result<OperationBuilder, SpecError> {
        let params = validate_path_template(path, &format!("{} {}", method, path))?;
        Ok(OperationBuilder::new(method.clone(), path.to_string(), params))
    }

    fn register_operation(&mut self, operation: OperationBuilder) -> Result<(), SpecError> {
        self.log.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(id) = operation.id() {
            if let Some(first) = self.ids.get(id) {
                return Err(SpecError::DuplicateOperationId {
                    id: id.to_string(),
                    first: first.clone(),
                    duplicate: operation.location(),
                });
            }
            self.ids.insert(id.to_string(), operation.location());
        }

        self.log.registered.lock().push(operation);
        Ok(())
    }

    fn serialize(&self, _format: Format) -> Result<Vec<u8>, SpecError> {
        let lines: Vec<String> = self
            .log
            .registered
            .lock()
            .iter()
            .map(OperationBuilder::location)
            .collect();
        Ok(lines.join("\n").into_bytes())
    }

    fn config(&self) -> &SpecConfig {
        &self.config
    }
}

/// Host router that records "METHOD /path" entries with their handler.
#[derive(Debug, Default)]
pub(crate) struct RecordingHost {
    pub(crate) entries: Vec<(Method, String, &'static str)>,
}

impl HostRouter for RecordingHost {
    type Handler = &'static str;

    fn register(
        &mut self,
        method: &Method,
        path: &str,
        handler: &'static str,
    ) -> Result<(), HostError> {
        if self.entries.iter().any(|(m, p, _)| m == method && p == path) {
            return Err(HostError::Duplicate {
                method: method.to_string(),
                path: path.to_string(),
            });
        }
        self.entries.push((method.clone(), path.to_string(), handler));
        Ok(())
    }

    fn sub_scope(&self) -> Self {
        Self::default()
    }

    fn mount(&mut self, prefix: &str, scope: Self) -> Result<(), Vec<HostError>> {
        let errors: Vec<HostError> = scope
            .entries
            .into_iter()
            .filter_map(|(method, path, handler)| {
                self.register(&method, &join_paths(prefix, &path), handler)
                    .err()
            })
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl RecordingHost {
    pub(crate) fn paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(m, p, _)| format!("{} {}", m, p))
            .collect()
    }
}
