//! [`HostRouter`] implementation over `axum::Router`.

use std::collections::HashMap;
use std::convert::Infallible;
use std::fmt;

use axum::extract::Request;
use axum::handler::Handler;
use axum::response::IntoResponse;
use axum::routing::{MethodFilter, MethodRouter, Route};
use axum::Router;
use http::Method;
use tower::{Layer, Service};
use trellis::{join_paths, HostError, HostRouter};
use trellis_openapi::validate_path_template;

type Deferred<S> = Box<dyn FnOnce(Router<S>) -> Router<S> + Send>;

/// An axum handler waiting for the method it will be registered under.
pub struct AxumHandler<S = ()> {
    make: Box<dyn FnOnce(MethodFilter) -> MethodRouter<S> + Send>,
}

impl<S> fmt::Debug for AxumHandler<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxumHandler").finish_non_exhaustive()
    }
}

/// Wrap any axum handler so it can be passed to
/// [`ApiRouter::route`](trellis::ApiRouter::route) and the method shorthands.
pub fn handler<H, T, S>(handler: H) -> AxumHandler<S>
where
    H: Handler<T, S>,
    T: 'static,
    S: Clone + Send + Sync + 'static,
{
    AxumHandler {
        make: Box::new(move |filter| axum::routing::on(filter, handler)),
    }
}

/// Routes already on a scope, keyed by path with parameter names erased.
#[derive(Debug, Clone)]
struct Registered {
    path: String,
    methods: Vec<Method>,
}

/// One scope of an axum application.
///
/// Checks every route and mount up front so that conflicts axum would
/// panic on are reported as [`HostError`]s instead. Layers added with
/// [`AxumHost::layer`] apply to the scope's routes, including mounted
/// children, once the scope is mounted or turned into a router.
pub struct AxumHost<S = ()> {
    router: Router<S>,
    registered: HashMap<String, Registered>,
    layers: Vec<Deferred<S>>,
}

impl<S> fmt::Debug for AxumHost<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AxumHost")
            .field("routes", &self.registered.len())
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl<S> Default for AxumHost<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self {
            router: Router::new(),
            registered: HashMap::new(),
            layers: Vec::new(),
        }
    }
}

impl<S> AxumHost<S>
where
    S: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a tower layer for this scope.
    pub fn layer<L>(&mut self, layer: L)
    where
        L: Layer<Route> + Clone + Send + Sync + 'static,
        L::Service: Service<Request> + Clone + Send + Sync + 'static,
        <L::Service as Service<Request>>::Response: IntoResponse + 'static,
        <L::Service as Service<Request>>::Error: Into<Infallible> + 'static,
        <L::Service as Service<Request>>::Future: Send + 'static,
    {
        self.layers.push(Box::new(move |router| router.layer(layer)));
    }

    /// Registered (method, path) pairs, sorted by path.
    pub fn routes(&self) -> Vec<(Method, String)> {
        let mut routes: Vec<(Method, String)> = self
            .registered
            .values()
            .flat_map(|r| r.methods.iter().map(|m| (m.clone(), r.path.clone())))
            .collect();
        routes.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        routes
    }

    /// Apply queued layers and return the router.
    pub fn into_router(self) -> Router<S> {
        self.layers
            .into_iter()
            .fold(self.router, |router, apply| apply(router))
    }

    fn check(&self, method: &Method, path: &str) -> Result<(), HostError> {
        match self.registered.get(&shape(path)) {
            Some(existing) if existing.path != path => Err(HostError::Conflict {
                path: path.to_string(),
                existing: existing.path.clone(),
            }),
            Some(existing) if existing.methods.contains(method) => Err(HostError::Duplicate {
                method: method.to_string(),
                path: path.to_string(),
            }),
            _ => Ok(()),
        }
    }

    fn record(&mut self, method: &Method, path: &str) {
        self.registered
            .entry(shape(path))
            .or_insert_with(|| Registered {
                path: path.to_string(),
                methods: Vec::new(),
            })
            .methods
            .push(method.clone());
    }
}

impl<S> HostRouter for AxumHost<S>
where
    S: Clone + Send + Sync + 'static,
{
    type Handler = AxumHandler<S>;

    fn register(
        &mut self,
        method: &Method,
        path: &str,
        handler: AxumHandler<S>,
    ) -> Result<(), HostError> {
        let filter = MethodFilter::try_from(method.clone())
            .map_err(|_| HostError::UnsupportedMethod(method.to_string()))?;

        // Wildcards are valid for axum but not in API path templates.
        validate_path_template(&path.replace("{*", "{"), path).map_err(|e| {
            HostError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            }
        })?;

        self.check(method, path)?;
        self.router = std::mem::take(&mut self.router).route(path, (handler.make)(filter));
        self.record(method, path);
        Ok(())
    }

    fn sub_scope(&self) -> Self {
        Self::new()
    }

    /// Nothing is mounted if any route of `scope` is rejected.
    fn mount(&mut self, prefix: &str, scope: Self) -> Result<(), Vec<HostError>> {
        if prefix.contains("{*") {
            return Err(vec![HostError::InvalidPath {
                path: prefix.to_string(),
                reason: "cannot nest under a wildcard".to_string(),
            }]);
        }

        let mut incoming: Vec<(Method, String)> = Vec::new();
        let mut errors = Vec::new();
        for registered in scope.registered.values() {
            let path = join_paths(prefix, &registered.path);
            for method in &registered.methods {
                if let Err(e) = self.check(method, &path) {
                    errors.push(e);
                } else if incoming.contains(&(method.clone(), path.clone())) {
                    errors.push(HostError::Duplicate {
                        method: method.to_string(),
                        path: path.clone(),
                    });
                } else {
                    incoming.push((method.clone(), path.clone()));
                }
            }
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        let child = scope.into_router();
        let router = std::mem::take(&mut self.router);
        self.router = if prefix == "/" {
            router.merge(child)
        } else {
            router.nest(prefix, child)
        };

        for (method, path) in &incoming {
            self.record(method, path);
        }
        Ok(())
    }
}

/// Path with every parameter name erased, e.g. `/pets/{}`.
fn shape(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut in_param = false;
    for ch in path.chars() {
        match ch {
            '{' => {
                in_param = true;
                out.push('{');
            }
            '}' => {
                in_param = false;
                out.push('}');
            }
            _ if in_param => {}
            _ => out.push(ch),
        }
    }
    out
}
