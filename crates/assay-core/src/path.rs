//! # Diagnostic Paths
//!
//! Every validation error carries two locations:
//!
//! - an **instance path** mirroring the value (`user.tags[2]`, root is the
//!   empty string), and
//! - a **schema path** mirroring the schema (`#/properties/user/items`).
//!
//! Both are plain strings built only through the helpers below.

/// Schema path of the document root.
pub const SCHEMA_ROOT: &str = "#";

/// Append an object key to an instance path.
pub fn child_key(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}

/// Append an array index to an instance path.
pub fn child_index(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

/// Append one or more segments to a schema path.
pub fn schema_child(schema_path: &str, segments: &[&str]) -> String {
    let mut out = String::with_capacity(schema_path.len() + 16);
    out.push_str(schema_path);
    for segment in segments {
        out.push('/');
        out.push_str(segment);
    }
    out
}

/// Render an instance path for humans (`(root)` for the empty path).
pub fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "(root)"
    } else {
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_key_from_root() {
        assert_eq!(child_key("", "email"), "email");
        assert_eq!(child_key("user", "email"), "user.email");
    }

    #[test]
    fn test_child_index() {
        assert_eq!(child_index("", 0), "[0]");
        assert_eq!(child_index("tags", 3), "tags[3]");
        assert_eq!(child_key(&child_index("rows", 1), "id"), "rows[1].id");
    }

    #[test]
    fn test_schema_child() {
        assert_eq!(schema_child(SCHEMA_ROOT, &["properties", "email"]), "#/properties/email");
        assert_eq!(schema_child("#/items", &["0"]), "#/items/0");
    }

    #[test]
    fn test_display_root() {
        assert_eq!(display_path(""), "(root)");
        assert_eq!(display_path("a.b"), "a.b");
    }
}
