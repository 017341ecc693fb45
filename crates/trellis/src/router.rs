//! Route and group registration.

use std::fmt;
use std::path::Path;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use http::Method;
use parking_lot::Mutex;
use trellis_openapi::{Format, OpenApiGenerator, SpecBuilder, SpecConfig};
use trellis_telemetry::log_route_rejected;

use crate::compile::Schema;
use crate::config::{GroupConfig, Metadata, RouteConfig};
use crate::context::{Context, Hosts, Node, NodeId, RouteEntry, RouteId, Tree, ROOT};
use crate::error::{BuildError, BuildErrors, Error};
use crate::host::{HostError, HostRouter};
use crate::path::{group_segment, join_paths, normalize_path};

/// A node of the route tree.
///
/// `ApiRouter` is a cheap handle: clones refer to the same node, and every
/// node of a tree shares one build context. Routes declared here are both
/// registered with the node's host scope and collected for the API
/// description, which is compiled on first use.
///
/// ```
/// use http::Method;
/// use trellis::{ApiRouter, GroupConfig, NoHost, RouteConfig};
/// use trellis_openapi::SpecConfig;
///
/// let api = ApiRouter::from_config(NoHost, SpecConfig::new());
/// let pets = api.group("/pet").with(GroupConfig::new().with_tag("pet"));
/// pets.add_route(Method::GET, "/:petId")
///     .with(RouteConfig::new().with_security("auth"));
///
/// assert!(api.validate().is_ok());
/// ```
pub struct ApiRouter<H: HostRouter> {
    ctx: Arc<Context>,
    hosts: Arc<Mutex<Hosts<H>>>,
    node: NodeId,
}

impl<H: HostRouter> Clone for ApiRouter<H> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
            hosts: Arc::clone(&self.hosts),
            node: self.node,
        }
    }
}

impl<H: HostRouter> fmt::Debug for ApiRouter<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiRouter")
            .field("prefix", &self.prefix())
            .finish_non_exhaustive()
    }
}

impl<H: HostRouter> ApiRouter<H> {
    /// Create the root of a tree over `host`, documented by `spec`.
    pub fn new(host: H, spec: impl SpecBuilder + 'static) -> Self {
        Self {
            ctx: Arc::new(Context::new(Box::new(spec))),
            hosts: Arc::new(Mutex::new(Hosts::new(host))),
            node: ROOT,
        }
    }

    /// Create the root of a tree documented by an [`OpenApiGenerator`].
    pub fn from_config(host: H, config: SpecConfig) -> Self {
        Self::new(host, OpenApiGenerator::new(config))
    }

    /// Full normalized prefix of this node (`/` for the root).
    pub fn prefix(&self) -> String {
        self.ctx.tree.lock().nodes[self.node.0].prefix.clone()
    }

    /// The node's current metadata.
    pub fn metadata(&self) -> Metadata {
        self.ctx.tree.lock().nodes[self.node.0].metadata.snapshot()
    }

    /// Declare a route for the API description only.
    ///
    /// The route inherits a snapshot of this node's metadata. If the
    /// operation cannot be created the problem is recorded and the returned
    /// route ignores further configuration.
    pub fn add_route(&self, method: Method, path: &str) -> Route {
        let mut tree = self.ctx.tree.lock();
        let node = &tree.nodes[self.node.0];
        let full_path = normalize_path(&join_paths(&node.prefix, path));
        let inherited = node.metadata.snapshot();

        let operation = if self.ctx.frozen.load(Ordering::Acquire) {
            tracing::warn!(
                method = %method,
                path = %full_path,
                "route added after the API description was compiled; it will not be documented"
            );
            None
        } else if !self.ctx.enabled {
            None
        } else {
            match self.ctx.spec.lock().new_operation(&method, &full_path) {
                Ok(operation) => Some(operation),
                Err(source) => {
                    log_route_rejected!(
                        method = %method,
                        path = %full_path,
                        error = %source,
                        "route rejected"
                    );
                    self.ctx.errors.add(BuildError::Route {
                        method: method.clone(),
                        path: full_path.clone(),
                        source,
                    });
                    None
                }
            }
        };

        let has_operation = operation.is_some();
        let id = RouteId(tree.routes.len());
        tree.routes.push(RouteEntry {
            method: method.clone(),
            path: full_path.clone(),
            operation,
            inherited,
            own: Metadata::default(),
        });
        tree.nodes[self.node.0].routes.push(id);

        Route {
            ctx: Arc::clone(&self.ctx),
            id,
            method,
            path: full_path,
            has_operation,
        }
    }

    /// Declare a route and register `handler` with this node's host scope.
    ///
    /// Host failures are recorded, never panicked; they surface from
    /// [`validate`](Self::validate) and [`into_host`](Self::into_host).
    pub fn route(&self, method: Method, path: &str, handler: H::Handler) -> Route {
        let route = self.add_route(method.clone(), path);
        let host_path = normalize_path(&join_paths("", path));

        let result = match self.hosts.lock().get_mut(self.node) {
            Some(scope) => scope.register(&method, &host_path, handler),
            None => Err(HostError::Detached),
        };

        if let Err(source) = result {
            log_route_rejected!(
                method = %method,
                path = %route.path(),
                error = %source,
                "host rejected route"
            );
            self.ctx.errors.add(BuildError::Host {
                method,
                path: route.path().to_string(),
                source,
            });
        }

        route
    }

    pub fn get(&self, path: &str, handler: H::Handler) -> Route {
        self.route(Method::GET, path, handler)
    }

    pub fn post(&self, path: &str, handler: H::Handler) -> Route {
        self.route(Method::POST, path, handler)
    }

    pub fn put(&self, path: &str, handler: H::Handler) -> Route {
        self.route(Method::PUT, path, handler)
    }

    pub fn patch(&self, path: &str, handler: H::Handler) -> Route {
        self.route(Method::PATCH, path, handler)
    }

    pub fn delete(&self, path: &str, handler: H::Handler) -> Route {
        self.route(Method::DELETE, path, handler)
    }

    pub fn head(&self, path: &str, handler: H::Handler) -> Route {
        self.route(Method::HEAD, path, handler)
    }

    pub fn options(&self, path: &str, handler: H::Handler) -> Route {
        self.route(Method::OPTIONS, path, handler)
    }

    pub fn trace(&self, path: &str, handler: H::Handler) -> Route {
        self.route(Method::TRACE, path, handler)
    }

    /// Create a child node under `prefix` with a snapshot of this node's
    /// metadata.
    pub fn group(&self, prefix: &str) -> ApiRouter<H> {
        let segment = group_segment(prefix);

        let mut tree = self.ctx.tree.lock();
        let parent = &tree.nodes[self.node.0];
        let full_prefix = join_paths(&parent.prefix, &segment);
        let metadata = parent.metadata.snapshot();

        let id = NodeId(tree.nodes.len());
        tree.nodes.push(Node::new(full_prefix, segment, metadata));
        tree.nodes[self.node.0].children.push(id);

        // Pushed under the tree lock so scope indices match node ids.
        let mut hosts = self.hosts.lock();
        let scope = hosts.get_mut(self.node).map(|parent| parent.sub_scope());
        hosts.scopes.push(scope);

        ApiRouter {
            ctx: Arc::clone(&self.ctx),
            hosts: Arc::clone(&self.hosts),
            node: id,
        }
    }

    /// Add metadata to this node.
    ///
    /// Only children and routes created afterwards see it; existing ones
    /// keep the snapshot they were created with.
    pub fn with(&self, config: GroupConfig) -> Self {
        let mut tree = self.ctx.tree.lock();
        tree.nodes[self.node.0]
            .metadata
            .extend(config.tags, config.security, config.hidden);
        self.clone()
    }

    /// Run `f` against this node's host scope, e.g. to add middleware.
    pub fn configure_host<R>(&self, f: impl FnOnce(&mut H) -> R) -> Result<R, Error> {
        let mut hosts = self.hosts.lock();
        let scope = hosts.get_mut(self.node).ok_or(Error::HostConsumed)?;
        Ok(f(scope))
    }

    /// A cloneable handle to the tree's API description.
    pub fn schema(&self) -> Schema {
        Schema::new(Arc::clone(&self.ctx))
    }

    /// Compile the whole tree and return every problem found.
    pub fn validate(&self) -> Result<(), Error> {
        self.schema().validate()
    }

    /// Compile the whole tree and serialize the document.
    pub fn generate_schema(&self, format: Format) -> Result<Vec<u8>, Error> {
        self.schema().generate(format)
    }

    /// Compile the whole tree and write the document to `path`.
    pub fn write_schema_to(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        self.schema().write_to(path)
    }

    pub fn has_errors(&self) -> bool {
        self.ctx.errors.has_errors()
    }

    /// Errors recorded so far, without compiling.
    pub fn errors(&self) -> Vec<BuildError> {
        self.ctx.errors.errors()
    }

    /// Mount every scope below this node into its parent and return this
    /// node's scope.
    ///
    /// Fails if the host rejected any route or mount. The API description
    /// stays available through other handles and [`Schema`].
    pub fn into_host(self) -> Result<H, Error> {
        let mut mount_errors = Vec::new();
        let tree = self.ctx.tree.lock();
        let mut hosts = self.hosts.lock();
        let scope = assemble(&tree, &mut hosts, self.node, &mut mount_errors);
        drop(hosts);
        drop(tree);
        let scope = scope.ok_or(Error::HostConsumed)?;

        for error in &mount_errors {
            log_route_rejected!(error = %error, "host rejected mount");
            self.ctx.errors.add(error.clone());
        }

        let errors: Vec<BuildError> = self
            .ctx
            .errors
            .errors()
            .into_iter()
            .filter(|e| matches!(e, BuildError::Host { .. } | BuildError::Mount { .. }))
            .collect();
        if !errors.is_empty() {
            return Err(Error::Build(BuildErrors::new(errors)));
        }

        Ok(scope)
    }
}

/// Take `node`'s scope, with every descendant mounted into it.
fn assemble<H: HostRouter>(
    tree: &Tree,
    hosts: &mut Hosts<H>,
    node: NodeId,
    errors: &mut Vec<BuildError>,
) -> Option<H> {
    let mut scope = hosts.take(node)?;

    for &child in &tree.nodes[node.0].children {
        let Some(child_scope) = assemble(tree, hosts, child, errors) else {
            continue;
        };
        let child_node = &tree.nodes[child.0];
        if let Err(sources) = scope.mount(&child_node.segment, child_scope) {
            errors.extend(sources.into_iter().map(|source| BuildError::Mount {
                prefix: child_node.prefix.clone(),
                source,
            }));
        }
    }

    Some(scope)
}

/// A declared route.
///
/// Configuration applies to the route's pending operation. Routes without
/// one (description disabled, rejected path, or declared after compilation)
/// accept configuration and ignore it.
#[derive(Clone)]
pub struct Route {
    ctx: Arc<Context>,
    id: RouteId,
    method: Method,
    path: String,
    has_operation: bool,
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("has_operation", &self.has_operation)
            .finish()
    }
}

impl Route {
    /// Apply operation metadata. Tags and security are appended after the
    /// inherited ones when the tree is compiled.
    pub fn with(&self, config: RouteConfig) -> Self {
        let mut tree = self.ctx.tree.lock();
        let entry = &mut tree.routes[self.id.0];
        let Some(operation) = entry.operation.as_mut() else {
            return self.clone();
        };

        if let Some(id) = config.operation_id {
            operation.set_id(id);
        }
        if let Some(summary) = config.summary {
            operation.set_summary(summary);
        }
        if let Some(description) = config.description {
            operation.set_description(description);
        }
        if config.deprecated {
            operation.set_deprecated(true);
        }
        for (structure, content_type) in config.requests {
            operation.add_request(structure, content_type.as_deref());
        }
        for response in config.responses {
            operation.add_response(
                response.status,
                response.structure,
                response.content_type.as_deref(),
            );
            if let Some(description) = response.description {
                operation.set_response_description(response.status, description);
            }
        }

        entry
            .own
            .extend(config.tags, config.security, config.hidden);
        self.clone()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full normalized path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the route was created with a pending operation.
    pub fn has_operation(&self) -> bool {
        self.has_operation
    }

    /// Inherited metadata followed by the route's own.
    pub fn metadata(&self) -> Metadata {
        let tree = self.ctx.tree.lock();
        let entry = &tree.routes[self.id.0];
        entry.inherited.merged(&entry.own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NoHost;
    use crate::testing::{SpecLog, RecordingHost, StubSpec};
    use trellis_openapi::{SecurityRequirement, SpecError, Structure};

    fn api() -> (ApiRouter<NoHost>, SpecLog) {
        let (spec, log) = StubSpec::new(SpecConfig::new());
        (ApiRouter::new(NoHost, spec), log)
    }

    fn recording_api() -> (ApiRouter<RecordingHost>, SpecLog) {
        let (spec, log) = StubSpec::new(SpecConfig::new());
        (ApiRouter::new(RecordingHost::default(), spec), log)
    }

    fn names(requirements: &[SecurityRequirement]) -> Vec<&str> {
        requirements.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_group_tags_and_route_security_merge() {
        let (api, log) = api();
        let pets = api.group("/pet").with(GroupConfig::new().with_tag("pet"));
        pets.add_route(Method::GET, "/:petId")
            .with(RouteConfig::new().with_security("auth"));

        api.validate().unwrap();

        let op = log.find(Method::GET, "/pet/{petId}").unwrap();
        assert_eq!(op.tags(), ["pet"]);
        assert_eq!(names(op.security()), ["auth"]);
        assert_eq!(op.path_params(), ["petId"]);
    }

    #[test]
    fn test_with_after_child_does_not_reach_child() {
        let (api, log) = api();
        let early = api.group("/early");
        let early_route = api.add_route(Method::GET, "/before");

        api.with(
            GroupConfig::new()
                .with_tag("late")
                .with_security("late-auth"),
        );
        let late = api.group("/late");

        early.add_route(Method::GET, "/a");
        late.add_route(Method::GET, "/b");
        api.add_route(Method::GET, "/after");

        assert!(early_route.metadata().tags.is_empty());
        assert!(early.metadata().tags.is_empty());
        assert_eq!(late.metadata().tags, vec!["late"]);

        api.validate().unwrap();
        assert!(log.find(Method::GET, "/early/a").unwrap().tags().is_empty());
        assert!(log.find(Method::GET, "/before").unwrap().security().is_empty());
        assert_eq!(log.find(Method::GET, "/late/b").unwrap().tags(), ["late"]);
        assert_eq!(
            names(log.find(Method::GET, "/after").unwrap().security()),
            ["late-auth"]
        );
    }

    #[test]
    fn test_nested_inheritance_passes_duplicates_through() {
        let (api, log) = api();
        let outer = api
            .group("/v1")
            .with(GroupConfig::new().with_tag("pet").with_security("auth"));
        let inner = outer.group("/pets").with(GroupConfig::new().with_tag("pet"));
        inner
            .add_route(Method::POST, "")
            .with(RouteConfig::new().with_tag("write").with_security("auth"));

        api.validate().unwrap();

        let op = log.find(Method::POST, "/v1/pets").unwrap();
        assert_eq!(op.tags(), ["pet", "pet", "write"]);
        assert_eq!(names(op.security()), ["auth", "auth"]);
    }

    #[test]
    fn test_compile_runs_once() {
        let (api, log) = api();
        api.add_route(Method::GET, "/a");
        api.group("/b").add_route(Method::GET, "/c");

        let first = api.validate().is_ok();
        for _ in 0..4 {
            assert_eq!(api.validate().is_ok(), first);
        }
        api.generate_schema(Format::Json).unwrap();
        api.group("/b").schema().validate().unwrap();

        assert_eq!(log.calls(), 2);
        assert!(api.schema().is_compiled());
    }

    #[test]
    fn test_compile_from_child_covers_whole_tree() {
        let (api, log) = api();
        let a = api.group("/a");
        let b = api.group("/b");
        a.add_route(Method::GET, "/x");
        b.add_route(Method::GET, "/y");

        b.validate().unwrap();

        assert!(log.find(Method::GET, "/a/x").is_some());
        assert!(log.find(Method::GET, "/b/y").is_some());
    }

    #[test]
    fn test_concurrent_validate_compiles_once() {
        let (api, log) = api();
        for i in 0..20 {
            api.group(&format!("/g{}", i)).add_route(Method::GET, "/r");
        }

        std::thread::scope(|scope| {
            for _ in 0..8 {
                let api = api.clone();
                scope.spawn(move || api.validate().unwrap());
            }
        });

        assert_eq!(log.calls(), 20);
    }

    #[test]
    fn test_concurrent_registration() {
        let (api, log) = recording_api();

        std::thread::scope(|scope| {
            for t in 0..8 {
                let api = api.clone();
                scope.spawn(move || {
                    for i in 0..25 {
                        api.group(&format!("/t{}/g{}", t, i)).get("/:id", "show");
                    }
                });
            }
        });

        api.validate().unwrap();
        assert_eq!(log.calls(), 200);
        assert!(log.find(Method::GET, "/t7/g24/{id}").is_some());

        let host = api.into_host().unwrap();
        let mut paths = host.paths();
        assert_eq!(paths.len(), 200);
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 200);
    }

    #[test]
    fn test_duplicate_operation_ids_are_reported() {
        let (api, log) = api();
        api.add_route(Method::POST, "/x")
            .with(RouteConfig::new().with_operation_id("dup"));
        api.add_route(Method::POST, "/x")
            .with(RouteConfig::new().with_operation_id("dup"));

        let err = api.validate().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("dup"));
        assert!(message.contains("POST /x"));
        assert!(api.has_errors());
        assert_eq!(log.calls(), 2);

        assert!(api.generate_schema(Format::Yaml).is_err());
    }

    #[test]
    fn test_duplicate_ids_name_both_paths() {
        let (api, _) = api();
        api.add_route(Method::GET, "/first")
            .with(RouteConfig::new().with_operation_id("same"));
        api.group("/nested")
            .add_route(Method::GET, "/second")
            .with(RouteConfig::new().with_operation_id("same"));

        let message = api.validate().unwrap_err().to_string();
        assert!(message.contains("/first"));
        assert!(message.contains("/nested/second"));
    }

    #[test]
    fn test_hidden_group_routes_are_not_compiled() {
        let (api, log) = api();
        let internal = api
            .group("/internal")
            .with(GroupConfig::new().with_hidden(true));
        internal.add_route(Method::GET, "/health");
        internal.add_route(Method::GET, "/metrics");
        internal.group("/deep").add_route(Method::GET, "/x");
        api.add_route(Method::GET, "/visible");

        api.validate().unwrap();

        assert_eq!(log.calls(), 1);
        assert!(log.find(Method::GET, "/visible").is_some());
        assert!(!api.has_errors());
    }

    #[test]
    fn test_hidden_cannot_be_reset() {
        let (api, log) = api();
        let group = api.group("/g").with(GroupConfig::new().with_hidden(true));
        group.with(GroupConfig::new().with_hidden(false));
        group.add_route(Method::GET, "/x");

        api.validate().unwrap();
        assert_eq!(log.calls(), 0);
    }

    #[test]
    fn test_hidden_route() {
        let (api, log) = api();
        api.add_route(Method::GET, "/secret")
            .with(RouteConfig::new().with_hidden(true));
        api.add_route(Method::GET, "/open");

        api.validate().unwrap();
        assert_eq!(log.operations().len(), 1);
        assert_eq!(log.operations()[0].path(), "/open");
    }

    #[test]
    fn test_malformed_path_is_recorded_and_compile_continues() {
        let (api, log) = api();
        let bad = api.add_route(Method::GET, "/users/{id");
        bad.with(RouteConfig::new().with_operation_id("ignored"));
        api.add_route(Method::POST, "/x")
            .with(RouteConfig::new().with_operation_id("dup"));
        api.add_route(Method::PUT, "/x")
            .with(RouteConfig::new().with_operation_id("dup"));

        assert!(!bad.has_operation());
        assert!(api.has_errors());

        let err = api.validate().unwrap_err();
        let errors = err.build_errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors.as_slice()[0], BuildError::Route { .. }));
        assert!(matches!(
            &errors.as_slice()[1],
            BuildError::Operation {
                source: SpecError::DuplicateOperationId { .. },
                ..
            }
        ));
        assert_eq!(err.to_string().lines().count(), 2);
        assert_eq!(log.calls(), 2);
    }

    #[test]
    fn test_route_config_reaches_operation() {
        let (api, log) = api();
        api.add_route(Method::POST, "/pets").with(
            RouteConfig::new()
                .with_operation_id("addPet")
                .with_summary("Add a pet")
                .with_description("Adds a pet to the store")
                .with_deprecated(true)
                .with_request::<String>()
                .with_request_structure(Structure::empty(), Some("text/plain"))
                .with_response::<String>(201)
                .with_response_description("Created"),
        );

        api.validate().unwrap();

        let op = log.find(Method::POST, "/pets").unwrap();
        assert_eq!(op.id(), Some("addPet"));
        assert_eq!(op.summary(), Some("Add a pet"));
        assert_eq!(op.description(), Some("Adds a pet to the store"));
        assert!(op.deprecated());
        assert_eq!(op.requests().len(), 2);
        assert_eq!(op.requests()[1].content_type, "text/plain");
        assert_eq!(op.responses()[0].status, 201);
        assert_eq!(op.responses()[0].description.as_deref(), Some("Created"));
    }

    #[test]
    fn test_disabled_description() {
        let (spec, log) = StubSpec::new(SpecConfig::new().with_disabled(true));
        let api = ApiRouter::new(NoHost, spec);

        let route = api
            .add_route(Method::GET, "/x")
            .with(RouteConfig::new().with_operation_id("x"));
        assert!(!route.has_operation());

        api.validate().unwrap();
        assert!(matches!(
            api.generate_schema(Format::Json),
            Err(Error::Disabled)
        ));
        assert_eq!(log.calls(), 0);
        assert!(!api.schema().enabled());
    }

    #[test]
    fn test_routes_after_compile_are_not_documented() {
        let (api, log) = api();
        api.add_route(Method::GET, "/early");
        api.validate().unwrap();

        let late = api.add_route(Method::GET, "/late");
        assert!(!late.has_operation());

        api.validate().unwrap();
        assert_eq!(log.calls(), 1);
        assert!(log.find(Method::GET, "/late").is_none());
    }

    #[test]
    fn test_prefixes() {
        let (api, _) = api();
        assert_eq!(api.prefix(), "/");
        let v1 = api.group("v1/");
        assert_eq!(v1.prefix(), "/v1");
        let user = v1.group("/users/:id");
        assert_eq!(user.prefix(), "/v1/users/{id}");
        assert_eq!(api.group("/").prefix(), "/");

        assert_eq!(user.add_route(Method::GET, "").path(), "/v1/users/{id}");
        assert_eq!(
            user.add_route(Method::GET, "/posts/:postId").path(),
            "/v1/users/{id}/posts/{postId}"
        );
    }

    #[test]
    fn test_into_host_mounts_every_scope() {
        let (api, log) = recording_api();
        api.get("/health", "health");
        let pets = api.group("/pets");
        pets.get("", "list");
        pets.get("/:id", "show");
        let hidden = pets
            .group("/admin")
            .with(GroupConfig::new().with_hidden(true));
        hidden.delete("/:id", "purge");

        api.validate().unwrap();
        assert_eq!(log.calls(), 3);

        let host = api.into_host().unwrap();
        assert_eq!(
            host.paths(),
            [
                "GET /health",
                "GET /pets",
                "GET /pets/{id}",
                "DELETE /pets/admin/{id}",
            ]
        );
    }

    #[test]
    fn test_host_rejections_surface() {
        let (api, _) = recording_api();
        api.get("/x", "a");
        api.get("/x", "b");

        let err = api.validate().unwrap_err();
        assert!(err.to_string().contains("route already registered: GET /x"));

        let err = api.into_host().unwrap_err();
        assert_eq!(err.build_errors().map(BuildErrors::len), Some(1));
    }

    #[test]
    fn test_mount_conflicts_surface() {
        let (api, _) = recording_api();
        api.get("/pets", "root");
        api.group("/pets").get("/", "group");

        let err = api.into_host().unwrap_err();
        let errors = err.build_errors().unwrap();
        assert!(matches!(errors.as_slice()[0], BuildError::Mount { .. }));
    }

    #[test]
    fn test_every_mount_conflict_is_reported() {
        let (api, _) = recording_api();
        api.get("/pets", "list");
        api.post("/pets", "create");
        let pets = api.group("/pets");
        pets.get("", "again");
        pets.post("", "again");
        pets.get("/:id", "show");

        let err = api.into_host().unwrap_err();
        let errors = err.build_errors().unwrap();
        assert_eq!(errors.len(), 2);
        assert!(errors
            .iter()
            .all(|e| matches!(e, BuildError::Mount { prefix, .. } if prefix == "/pets")));
    }

    #[test]
    fn test_host_is_taken_once() {
        let (api, _) = recording_api();
        let child = api.group("/c");
        let other = api.clone();

        api.into_host().unwrap();

        assert!(matches!(other.into_host(), Err(Error::HostConsumed)));
        assert!(matches!(
            child.configure_host(|_| ()),
            Err(Error::HostConsumed)
        ));

        child.get("/late", "late");
        assert!(child
            .errors()
            .iter()
            .any(|e| matches!(e, BuildError::Host { source: HostError::Detached, .. })));
    }

    #[test]
    fn test_configure_host() {
        let (api, _) = recording_api();
        let count = api
            .configure_host(|host| {
                host.entries.push((Method::GET, "/raw".to_string(), "raw"));
                host.entries.len()
            })
            .unwrap();
        assert_eq!(count, 1);
        assert_eq!(api.into_host().unwrap().paths(), ["GET /raw"]);
    }
}
