//! Path normalization and joining.

/// Convert `:name` parameters into `{name}`.
///
/// A parameter starts at `:` and runs through the longest sequence of ASCII
/// alphanumerics and underscores. A `:` with no name after it, and anything
/// inside braces, is copied unchanged. Normalizing twice is a no-op.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len() + 2);
    let mut chars = path.chars().peekable();
    let mut depth = 0usize;

    while let Some(ch) = chars.next() {
        match ch {
            '{' => {
                depth += 1;
                out.push(ch);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                out.push(ch);
            }
            // A parameter never spans segments.
            '/' => {
                depth = 0;
                out.push(ch);
            }
            ':' if depth == 0 && chars.peek().is_some_and(|c| is_name_char(*c)) => {
                out.push('{');
                while let Some(c) = chars.next_if(|c| is_name_char(*c)) {
                    out.push(c);
                }
                out.push('}');
            }
            _ => out.push(ch),
        }
    }

    out
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Join a prefix and a path with exactly one `/` between them.
///
/// The result always starts with `/`; joining two empty parts yields `/`.
/// A trailing slash on `path` is kept.
pub fn join_paths(prefix: &str, path: &str) -> String {
    let prefix = prefix.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    let mut joined = String::with_capacity(prefix.len() + path.len() + 2);
    if !prefix.starts_with('/') {
        joined.push('/');
    }
    joined.push_str(prefix);

    if !path.is_empty() {
        if !joined.ends_with('/') {
            joined.push('/');
        }
        joined.push_str(path);
    }

    joined
}

/// Normalized, joined group segment without a trailing slash (`/` for the root).
pub(crate) fn group_segment(prefix: &str) -> String {
    let joined = join_paths("", &normalize_path(prefix));
    match joined.trim_end_matches('/') {
        "" => "/".to_string(),
        trimmed => trimmed.to_string(),
    }
}
