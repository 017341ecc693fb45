use std::collections::HashMap;

use http::Method;
use trellis::HostError;

/// The routing trie. Maps HTTP paths + methods to handlers.
#[derive(Debug)]
pub struct Router<H> {
    root: Node<H>,
    len: usize,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }
}

/// A single node in the prefix trie.
#[derive(Debug)]
struct Node<H> {
    /// Static children keyed by segment name.
    static_children: HashMap<String, Node<H>>,
    /// Parameter child (at most one per node).
    param_child: Option<Box<ParamNode<H>>>,
    /// Method-to-handler mapping at this terminal node.
    methods: HashMap<Method, H>,
}

impl<H> Default for Node<H> {
    fn default() -> Self {
        Self {
            static_children: HashMap::new(),
            param_child: None,
            methods: HashMap::new(),
        }
    }
}

/// A parameter segment node.
#[derive(Debug)]
struct ParamNode<H> {
    /// Parameter name (e.g. "id").
    name: String,
    /// The subtree below this parameter.
    node: Node<H>,
}

/// The result of a route lookup.
#[derive(Debug)]
pub enum RouteMatch<'a, H> {
    /// Matched a path and method.
    Found {
        handler: &'a H,
        params: Vec<(String, String)>,
    },
    /// Path matched but method is not allowed.
    MethodNotAllowed { allowed: Vec<String> },
    /// No path matched.
    NotFound,
}

/// A parsed path segment.
#[derive(Debug, Clone)]
enum Segment {
    Static(String),
    Param(String),
}

impl<H> Router<H> {
    /// Create a new empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of (path, method) entries.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Insert a route into the trie.
    ///
    /// Path should be a template like "/users/{id}/orders". Two templates
    /// that differ only in a parameter name at the same position conflict.
    pub fn insert(&mut self, path: &str, method: &Method, handler: H) -> Result<(), HostError> {
        let segments = parse_path_template(path);
        let node = self.traverse_or_create(path, &segments)?;

        if node.methods.contains_key(method) {
            return Err(HostError::Duplicate {
                method: method.to_string(),
                path: path.to_string(),
            });
        }

        node.methods.insert(method.clone(), handler);
        self.len += 1;
        Ok(())
    }

    /// Look up a request path and method.
    ///
    /// Path should be an actual request path (not a template).
    pub fn lookup(&self, path: &str, method: &Method) -> RouteMatch<'_, H> {
        let normalized = normalize_path(path);
        let segments: Vec<&str> = normalized.split('/').filter(|s| !s.is_empty()).collect();

        let mut params = Vec::new();
        match traverse_and_match(&self.root, &segments, &mut params) {
            Some(node) => {
                if let Some(handler) = node.methods.get(method) {
                    RouteMatch::Found { handler, params }
                } else if node.methods.is_empty() {
                    RouteMatch::NotFound
                } else {
                    let mut allowed: Vec<String> =
                        node.methods.keys().map(|m| m.to_string()).collect();
                    allowed.sort();
                    RouteMatch::MethodNotAllowed { allowed }
                }
            }
            None => RouteMatch::NotFound,
        }
    }

    /// Traverse or create nodes for a path template.
    fn traverse_or_create(
        &mut self,
        path: &str,
        segments: &[Segment],
    ) -> Result<&mut Node<H>, HostError> {
        let mut current = &mut self.root;

        for segment in segments {
            current = match segment {
                Segment::Static(name) => current.static_children.entry(name.clone()).or_default(),
                Segment::Param(name) => {
                    let param = current.param_child.get_or_insert_with(|| {
                        Box::new(ParamNode {
                            name: name.clone(),
                            node: Node::default(),
                        })
                    });
                    if param.name != *name {
                        return Err(HostError::Conflict {
                            path: path.to_string(),
                            existing: format!("{{{}}}", param.name),
                        });
                    }
                    &mut param.node
                }
            };
        }

        Ok(current)
    }
}

/// Traverse the trie matching actual path segments, capturing parameters.
/// Returns the terminal node if the path matches, None otherwise.
fn traverse_and_match<'a, H>(
    node: &'a Node<H>,
    segments: &[&str],
    params: &mut Vec<(String, String)>,
) -> Option<&'a Node<H>> {
    let Some((segment, remaining)) = segments.split_first() else {
        return Some(node);
    };

    // Static children take precedence (most specific match).
    if let Some(child) = node.static_children.get(*segment) {
        if let Some(result) = traverse_and_match(child, remaining, params) {
            return Some(result);
        }
    }

    if let Some(param_child) = &node.param_child {
        let param_len = params.len();
        params.push((param_child.name.clone(), segment.to_string()));

        if let Some(result) = traverse_and_match(&param_child.node, remaining, params) {
            return Some(result);
        }

        // Backtrack if this path didn't work.
        params.truncate(param_len);
    }

    None
}

/// Parse a path template into segments.
fn parse_path_template(path: &str) -> Vec<Segment> {
    path.split('/')
        .filter(|s| !s.is_empty())
        .map(|s| match s.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Static(s.to_string()),
        })
        .collect()
}

/// Normalize a request path: strip trailing slashes, collapse double slashes.
pub fn normalize_path(path: &str) -> String {
    let mut normalized = String::with_capacity(path.len());
    let mut prev_slash = false;

    for ch in path.chars() {
        if ch == '/' {
            if !prev_slash {
                normalized.push('/');
            }
            prev_slash = true;
        } else {
            normalized.push(ch);
            prev_slash = false;
        }
    }

    // Strip trailing slash (but keep root "/")
    if normalized.len() > 1 && normalized.ends_with('/') {
        normalized.pop();
    }

    if normalized.is_empty() {
        "/".to_string()
    } else {
        normalized
    }
}
