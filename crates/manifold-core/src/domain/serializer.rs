//! Text rendering of the document tree.
//!
//! Emits the small YAML dialect docker-compose and GitLab CI consume from
//! these artifacts. It is not a general YAML writer: strings are never
//! escaped and only two quoting rules exist.
//!
//! Layout rules:
//! - the document opens with `---`
//! - every top-level key is preceded by a blank line
//! - a container entry directly under top-level `services` gets an extra
//!   blank line so each service block stands apart
//! - two spaces of indentation per level
//! - a positional entry holding a scalar renders as a bare `value:` key
//! - values of keys in [`QUOTED_KEYS`] are double-quoted whatever their type
//! - sequence strings shaped like `digits:digits` are double-quoted

use crate::domain::document::{Key, Mapping, Node, Scalar};

/// Header line every rendered document starts with.
pub const HEADER: &str = "---\n";

/// Mapping keys whose scalar value is always double-quoted.
pub const QUOTED_KEYS: &[&str] = &["version"];

const INDENT: &str = "  ";

/// Top-level key whose direct children are spaced apart.
const SPACED_SECTION: &str = "services";

/// Render a document to text.
pub fn render(document: &Node) -> String {
    let mut out = String::from(HEADER);
    emit(&mut out, document, 0, None);
    out
}

/// Append a raw fragment after a rendered document.
pub fn append_fragment(rendered: &mut String, fragment: &str) {
    rendered.push('\n');
    rendered.push_str(fragment);
}

/// Whether `value` contains a `digits:digits` run, like a port mapping.
pub fn is_port_mapping(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.iter().enumerate().any(|(i, b)| {
        *b == b':'
            && i > 0
            && bytes[i - 1].is_ascii_digit()
            && bytes.get(i + 1).is_some_and(u8::is_ascii_digit)
    })
}

fn emit(out: &mut String, node: &Node, depth: usize, root_key: Option<&str>) {
    match node {
        Node::Mapping(mapping) => emit_mapping(out, mapping, depth, root_key),
        Node::Sequence(items) => {
            for item in items {
                emit_item(out, item, depth, root_key);
            }
        }
        Node::Scalar(scalar) => {
            line(out, depth, &scalar.to_string());
        }
    }
}

fn emit_mapping(out: &mut String, mapping: &Mapping, depth: usize, root_key: Option<&str>) {
    for (key, value) in mapping.iter() {
        let root_key = if depth == 0 {
            out.push('\n');
            match key {
                Key::Named(name) => Some(name.as_str()),
                Key::Positional(_) => None,
            }
        } else {
            root_key
        };

        match (key, value) {
            (_, Node::Mapping(_) | Node::Sequence(_)) => {
                if depth == 1 && root_key == Some(SPACED_SECTION) {
                    out.push('\n');
                }
                line(out, depth, &format!("{key}:"));
                emit(out, value, depth + 1, root_key);
            }
            (Key::Positional(_), Node::Scalar(scalar)) => {
                line(out, depth, &format!("{scalar}:"));
            }
            (Key::Named(name), Node::Scalar(scalar)) if QUOTED_KEYS.contains(&name.as_str()) => {
                line(out, depth, &format!("{name}: \"{scalar}\""));
            }
            (Key::Named(name), Node::Scalar(scalar)) => {
                line(out, depth, &format!("{name}: {scalar}"));
            }
        }
    }
}

fn emit_item(out: &mut String, item: &Node, depth: usize, root_key: Option<&str>) {
    match item {
        Node::Scalar(Scalar::Str(s)) if is_port_mapping(s) => {
            line(out, depth, &format!("- \"{s}\""));
        }
        Node::Scalar(scalar) => line(out, depth, &format!("- {scalar}")),
        container => {
            line(out, depth, "-");
            emit(out, container, depth + 1, root_key);
        }
    }
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}
