//! Walks a document tree and hands field comments to a format-specific sink.
//!
//! The walk is the same for every output format; only the [`CommentSink`]
//! differs. Keys whose value is a nested mapping receive a *container*
//! comment, which TOML renders on the section header. Every other key
//! receives a *key* comment on its own line.

use crate::schema::{DescriptorTable, FieldKind};
use crate::Value;
use log::trace;

/// Receives comments as the annotator discovers them.
///
/// `path` is the field's full path from the document root. Sequence
/// elements do not add a path segment, so every element of an array of
/// objects shares the same paths.
pub trait CommentSink {
    /// Attaches `text` to the key at `path`, whose value is not a mapping.
    fn attach_key_comment(&mut self, path: &[String], text: &str);

    /// Attaches `text` to the key at `path`, whose value is a nested mapping.
    fn attach_container_comment(&mut self, path: &[String], text: &str);
}

/// Attaches the comments in `table` to the matching keys of `tree`.
///
/// Keys with no descriptor are left alone, as are descriptors whose path
/// does not occur in the tree.
pub fn annotate<S: CommentSink + ?Sized>(tree: &Value, table: &DescriptorTable, sink: &mut S) {
    let mut path = Vec::new();
    walk(tree, table, sink, &mut path);
}

fn walk<S: CommentSink + ?Sized>(
    value: &Value,
    table: &DescriptorTable,
    sink: &mut S,
    path: &mut Vec<String>,
) {
    match value {
        Value::Mapping(map) => {
            for (key, child) in map {
                path.push(key.clone());
                if let Some(text) = table.comment(path) {
                    trace!("comment on {}: {}", path.join("."), text);
                    if child.kind() == FieldKind::Object {
                        sink.attach_container_comment(path, text);
                    } else {
                        sink.attach_key_comment(path, text);
                    }
                }
                walk(child, table, sink, path);
                path.pop();
            }
        }
        Value::Sequence(items) => {
            for item in items {
                walk(item, table, sink, path);
            }
        }
        _ => {}
    }
}
