//! Metadata carried by groups and routes, and the configuration records that
//! extend it.

use trellis_openapi::{SecurityRequirement, Structure, ToSchema};

/// Tags, security requirements and visibility inherited down the tree.
///
/// Children and routes receive a [`Metadata::snapshot`] of their node at
/// creation time. Later changes to the node do not reach them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    pub tags: Vec<String>,
    pub security: Vec<SecurityRequirement>,
    pub hidden: bool,
}

impl Metadata {
    /// An owned copy to hand to a new child or route.
    pub fn snapshot(&self) -> Metadata {
        self.clone()
    }

    /// Append tags and security; `hidden` can only go from false to true.
    pub(crate) fn extend(
        &mut self,
        tags: impl IntoIterator<Item = String>,
        security: impl IntoIterator<Item = SecurityRequirement>,
        hidden: bool,
    ) {
        self.tags.extend(tags);
        self.security.extend(security);
        self.hidden |= hidden;
    }

    /// Inherited entries first, then `own`. Duplicates are kept.
    pub fn merged(&self, own: &Metadata) -> Metadata {
        let mut merged = self.snapshot();
        merged.extend(own.tags.iter().cloned(), own.security.iter().cloned(), own.hidden);
        merged
    }
}

/// Metadata added to a group with [`ApiRouter::with`](crate::ApiRouter::with).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupConfig {
    pub tags: Vec<String>,
    pub security: Vec<SecurityRequirement>,
    pub hidden: bool,
}

impl GroupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_security(mut self, requirement: impl Into<SecurityRequirement>) -> Self {
        self.security.push(requirement.into());
        self
    }

    /// Hide every route created under the group afterwards.
    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }
}

/// A response declared through [`RouteConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseConfig {
    pub status: u16,
    pub structure: Structure,
    pub content_type: Option<String>,
    pub description: Option<String>,
}

/// Operation metadata for one route, applied with
/// [`Route::with`](crate::Route::with).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteConfig {
    pub operation_id: Option<String>,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    pub tags: Vec<String>,
    pub security: Vec<SecurityRequirement>,
    pub hidden: bool,
    /// Request structures with an optional content type.
    pub requests: Vec<(Structure, Option<String>)>,
    pub responses: Vec<ResponseConfig>,
}

impl RouteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_operation_id(mut self, id: impl Into<String>) -> Self {
        self.operation_id = Some(id.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    pub fn with_security(mut self, requirement: impl Into<SecurityRequirement>) -> Self {
        self.security.push(requirement.into());
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// JSON request body of type `T`.
    pub fn with_request<T: ToSchema + ?Sized>(self) -> Self {
        self.with_request_structure(Structure::of::<T>(), None)
    }

    pub fn with_request_structure(
        mut self,
        structure: Structure,
        content_type: Option<&str>,
    ) -> Self {
        self.requests
            .push((structure, content_type.map(str::to_string)));
        self
    }

    /// JSON response of type `T` for `status`.
    pub fn with_response<T: ToSchema + ?Sized>(self, status: u16) -> Self {
        self.with_response_structure(status, Structure::of::<T>(), None)
    }

    /// A response without a body, e.g. `204`.
    pub fn with_empty_response(self, status: u16) -> Self {
        self.with_response_structure(status, Structure::empty(), None)
    }

    pub fn with_response_structure(
        mut self,
        status: u16,
        structure: Structure,
        content_type: Option<&str>,
    ) -> Self {
        self.responses.push(ResponseConfig {
            status,
            structure,
            content_type: content_type.map(str::to_string),
            description: None,
        });
        self
    }

    /// Describe the most recently declared response.
    pub fn with_response_description(mut self, description: impl Into<String>) -> Self {
        if let Some(last) = self.responses.last_mut() {
            last.description = Some(description.into());
        }
        self
    }
}
