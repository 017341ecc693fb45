//! The shared build context: one arena per tree, referenced by every handle.

use std::sync::atomic::AtomicBool;

use http::Method;
use parking_lot::Mutex;
use trellis_openapi::{OperationBuilder, SpecBuilder};

use crate::config::Metadata;
use crate::error::{BuildErrors, ErrorList};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RouteId(pub(crate) usize);

pub(crate) const ROOT: NodeId = NodeId(0);

/// Result of the one compile pass, handed to every caller.
pub(crate) type Outcome = Result<(), BuildErrors>;

pub(crate) struct Node {
    /// Full normalized prefix.
    pub(crate) prefix: String,
    /// Prefix relative to the parent, used when mounting host scopes.
    pub(crate) segment: String,
    pub(crate) metadata: Metadata,
    pub(crate) routes: Vec<RouteId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(prefix: String, segment: String, metadata: Metadata) -> Self {
        Self {
            prefix,
            segment,
            metadata,
            routes: Vec::new(),
            children: Vec::new(),
        }
    }
}

pub(crate) struct RouteEntry {
    pub(crate) method: Method,
    pub(crate) path: String,
    /// Taken by the compile pass.
    pub(crate) operation: Option<OperationBuilder>,
    pub(crate) inherited: Metadata,
    pub(crate) own: Metadata,
}

#[derive(Default)]
pub(crate) struct Tree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) routes: Vec<RouteEntry>,
}

/// Lock order: `compiled`, then `tree`, then the host arena, then `spec`.
/// `errors` is only ever locked on its own.
pub(crate) struct Context {
    pub(crate) spec: Mutex<Box<dyn SpecBuilder>>,
    pub(crate) enabled: bool,
    pub(crate) tree: Mutex<Tree>,
    pub(crate) compiled: Mutex<Option<Outcome>>,
    /// Set under the tree lock when the compile pass starts.
    pub(crate) frozen: AtomicBool,
    pub(crate) errors: ErrorList,
}

impl Context {
    pub(crate) fn new(spec: Box<dyn SpecBuilder>) -> Self {
        let enabled = spec.enabled();
        let root = Node::new("/".to_string(), "/".to_string(), Metadata::default());

        Self {
            spec: Mutex::new(spec),
            enabled,
            tree: Mutex::new(Tree {
                nodes: vec![root],
                routes: Vec::new(),
            }),
            compiled: Mutex::new(None),
            frozen: AtomicBool::new(false),
            errors: ErrorList::new(),
        }
    }
}

/// Host scopes indexed by node id. `None` once a scope has been mounted.
pub(crate) struct Hosts<H> {
    pub(crate) scopes: Vec<Option<H>>,
}

impl<H> Hosts<H> {
    pub(crate) fn new(root: H) -> Self {
        Self {
            scopes: vec![Some(root)],
        }
    }

    pub(crate) fn get_mut(&mut self, node: NodeId) -> Option<&mut H> {
        self.scopes.get_mut(node.0).and_then(Option::as_mut)
    }

    pub(crate) fn take(&mut self, node: NodeId) -> Option<H> {
        self.scopes.get_mut(node.0).and_then(Option::take)
    }
}
