//! Prefix-trie request router, usable as a trellis host.
//!
//! [`Router`] maps brace-syntax path templates and methods to handler values
//! with static/param segments, static-over-param precedence and request path
//! normalization. [`TrieHost`] implements [`trellis::HostRouter`] so a route
//! tree can be turned into a `Router`.

pub mod host;
pub mod trie;

pub use host::TrieHost;
pub use trie::{normalize_path, RouteMatch, Router};
