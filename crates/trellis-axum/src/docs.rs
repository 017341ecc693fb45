//! Serving the API description and its documentation page.

use std::path::Path;

use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use http::header::CONTENT_TYPE;
use http::Method;
use scalar_api_reference::scalar_html_default;
use trellis::{ApiRouter, BuildError, BuildErrors, Error, HostRouter, Schema};
use trellis_openapi::{Format, SpecConfig};

use crate::host::{handler, AxumHost};
use crate::problem::ProblemDetails;

/// Turn a route tree over [`AxumHost`] into an `axum::Router`.
pub trait ApiRouterExt<S> {
    /// Add the API description and documentation endpoints (unless the
    /// description is disabled), mount every group and return the router.
    ///
    /// Call on the root: the endpoints are registered on this node using
    /// the configured `spec_path` and `docs_path`.
    fn into_axum(self) -> Result<Router<S>, Error>;
}

impl<S> ApiRouterExt<S> for ApiRouter<AxumHost<S>>
where
    S: Clone + Send + Sync + 'static,
{
    fn into_axum(self) -> Result<Router<S>, Error> {
        let schema = self.schema();
        if schema.enabled() {
            install_endpoints(&self, schema)?;
        }
        Ok(self.into_host()?.into_router())
    }
}

fn install_endpoints<S>(api: &ApiRouter<AxumHost<S>>, schema: Schema) -> Result<(), Error>
where
    S: Clone + Send + Sync + 'static,
{
    let config = schema.config();
    let format = Format::from_path(Path::new(&config.spec_path));
    let page = docs_page(&config);

    let serve_spec = move || {
        let schema = schema.clone();
        async move { spec_response(&schema, format) }
    };
    let serve_docs = move || {
        let page = page.clone();
        async move { Html(page) }
    };

    let registered = api.configure_host(|host| {
        host.register(&Method::GET, &config.spec_path, handler(serve_spec))
            .map_err(|source| (config.spec_path.clone(), source))?;
        host.register(&Method::GET, &config.docs_path, handler(serve_docs))
            .map_err(|source| (config.docs_path.clone(), source))
    })?;

    registered.map_err(|(path, source)| {
        Error::Build(BuildErrors::new(vec![BuildError::Host {
            method: Method::GET,
            path,
            source,
        }]))
    })?;

    tracing::debug!(
        spec_path = %config.spec_path,
        docs_path = %config.docs_path,
        format = format.as_str(),
        "documentation endpoints installed"
    );
    Ok(())
}

/// Compile on first request and serve the document.
fn spec_response(schema: &Schema, format: Format) -> Response {
    match schema.generate(format) {
        Ok(bytes) => ([(CONTENT_TYPE, format.content_type())], bytes).into_response(),
        Err(err) => {
            tracing::warn!(error = %err, "API description unavailable");
            ProblemDetails::from(&err).into_response()
        }
    }
}

/// Scalar page pointing at the document endpoint.
fn docs_page(config: &SpecConfig) -> String {
    let scalar = serde_json::json!({
        "spec": {
            "url": config.spec_path
        },
        "theme": config.ui_theme,
        "layout": "modern",
        "hideModels": false,
        "hideDownloadButton": false
    });

    scalar_html_default(&scalar)
}
