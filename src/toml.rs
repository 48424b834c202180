//! TOML output with trailing field comments.
//!
//! TOML requires every plain `key = value` line of a table to come before
//! that table's sub-tables, so the document tree is regrouped first: inline
//! values keep their relative order and are followed by the sections in
//! their relative order.
//!
//! Nested mappings become `[section]` headers and carry container comments.
//! Non-empty arrays whose elements are all mappings become `[[array]]`
//! tables; their comment goes on the first header only. Everything else is
//! written inline.
//!
//! ```text
//! name = "app"  # Application name
//!
//! [database]  # DB settings
//! host = "localhost"  # Host name
//! ```

use crate::annotate::{annotate, CommentSink};
use crate::emit::{push_comment, write_number, write_quoted, TOML_FLOATS};
use crate::schema::DescriptorTable;
use crate::{Error, Map, Number, Result, Value};
use log::trace;
use std::collections::HashMap;

/// Comments collected for a TOML document.
///
/// Key comments trail `key = value` lines and the first header of an array
/// of tables. Header comments trail `[section]` lines.
#[derive(Clone, Debug, Default)]
pub struct TomlComments {
    keys: HashMap<Vec<String>, String>,
    headers: HashMap<Vec<String>, String>,
}

impl TomlComments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn key(&self, path: &[String]) -> Option<&str> {
        self.keys.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn header(&self, path: &[String]) -> Option<&str> {
        self.headers.get(path).map(String::as_str)
    }
}

impl CommentSink for TomlComments {
    fn attach_key_comment(&mut self, path: &[String], text: &str) {
        self.keys.insert(path.to_vec(), text.to_string());
    }

    fn attach_container_comment(&mut self, path: &[String], text: &str) {
        self.headers.insert(path.to_vec(), text.to_string());
    }
}

#[derive(Clone, Debug, Default)]
struct TomlTable {
    values: Vec<(String, Value)>,
    sections: Vec<(String, Section)>,
}

#[derive(Clone, Debug)]
enum Section {
    Table(TomlTable),
    Array(Vec<TomlTable>),
}

impl TomlTable {
    fn from_map(map: &Map) -> Result<Self> {
        let mut table = TomlTable::default();
        for (key, value) in map {
            if map.is_bare_key(key) {
                return Err(Error::unsupported_type(&format!(
                    "TOML keys must be strings, found `{}`",
                    key
                )));
            }
            match value {
                // Absent optional fields
                Value::Null => {}
                Value::Mapping(nested) => {
                    let nested = TomlTable::from_map(nested)?;
                    table.sections.push((key.clone(), Section::Table(nested)));
                }
                Value::Sequence(items) if !items.is_empty() && items.iter().all(Value::is_mapping) => {
                    let tables = items
                        .iter()
                        .filter_map(Value::as_mapping)
                        .map(TomlTable::from_map)
                        .collect::<Result<Vec<_>>>()?;
                    table.sections.push((key.clone(), Section::Array(tables)));
                }
                other => {
                    check_inline(other)?;
                    table.values.push((key.clone(), other.clone()));
                }
            }
        }
        Ok(table)
    }
}

fn check_inline(value: &Value) -> Result<()> {
    match value {
        Value::Null => Err(Error::unsupported_type(
            "TOML cannot represent null inside an array or inline table",
        )),
        Value::Number(Number::Unsigned(u)) => Err(Error::unsupported_type(&format!(
            "integer {} is out of range for TOML",
            u
        ))),
        Value::Sequence(items) => items.iter().try_for_each(check_inline),
        Value::Mapping(map) => map.iter().try_for_each(|(key, value)| {
            if map.is_bare_key(key) {
                return Err(Error::unsupported_type(&format!(
                    "TOML keys must be strings, found `{}`",
                    key
                )));
            }
            check_inline(value)
        }),
        _ => Ok(()),
    }
}

/// A document tree regrouped for TOML output.
#[derive(Clone, Debug)]
pub struct TomlDocument {
    root: TomlTable,
    comments: TomlComments,
}

impl TomlDocument {
    /// Regroups `root` for TOML with no comments.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedType`] if `root` is not a mapping or holds
    /// a value TOML cannot represent.
    pub fn new(root: Value) -> Result<Self> {
        Self::build(&root, TomlComments::new())
    }

    /// Regroups `root` for TOML and attaches the comments from `table`.
    ///
    /// # Errors
    ///
    /// See [`TomlDocument::new`].
    pub fn annotated(root: Value, table: &DescriptorTable) -> Result<Self> {
        let mut comments = TomlComments::new();
        annotate(&root, table, &mut comments);
        Self::build(&root, comments)
    }

    fn build(root: &Value, comments: TomlComments) -> Result<Self> {
        let map = root
            .as_mapping()
            .ok_or_else(|| Error::unsupported_type("TOML documents must be tables at the root"))?;
        let root = TomlTable::from_map(map)?;
        trace!(
            "toml root has {} values and {} sections",
            root.values.len(),
            root.sections.len()
        );
        Ok(TomlDocument { root, comments })
    }

    #[must_use]
    pub fn comments(&self) -> &TomlComments {
        &self.comments
    }

    /// Renders the document. Sections are separated by a blank line.
    #[must_use]
    pub fn emit(&self) -> String {
        let mut emitter = Emitter {
            out: String::with_capacity(256),
            comments: &self.comments,
            path: Vec::new(),
        };
        emitter.write_table(&self.root);
        emitter.out
    }
}

struct Emitter<'a> {
    out: String,
    comments: &'a TomlComments,
    path: Vec<String>,
}

impl Emitter<'_> {
    fn write_table(&mut self, table: &TomlTable) {
        let comments = self.comments;
        for (key, value) in &table.values {
            self.path.push(key.clone());
            write_key(&mut self.out, key);
            self.out.push_str(" = ");
            write_inline(&mut self.out, value);
            push_comment(&mut self.out, comments.key(&self.path));
            self.out.push('\n');
            self.path.pop();
        }

        for (key, section) in &table.sections {
            self.path.push(key.clone());
            match section {
                Section::Table(nested) => {
                    self.write_header("[", "]", comments.header(&self.path));
                    self.write_table(nested);
                }
                Section::Array(elements) => {
                    for (i, element) in elements.iter().enumerate() {
                        let comment = if i == 0 { comments.key(&self.path) } else { None };
                        self.write_header("[[", "]]", comment);
                        self.write_table(element);
                    }
                }
            }
            self.path.pop();
        }
    }

    fn write_header(&mut self, open: &str, close: &str, comment: Option<&str>) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        self.out.push_str(open);
        for (i, segment) in self.path.iter().enumerate() {
            if i > 0 {
                self.out.push('.');
            }
            write_key(&mut self.out, segment);
        }
        self.out.push_str(close);
        push_comment(&mut self.out, comment);
        self.out.push('\n');
    }
}

fn write_key(out: &mut String, key: &str) {
    let bare = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if bare {
        out.push_str(key);
    } else {
        write_quoted(out, key);
    }
}

fn write_inline(out: &mut String, value: &Value) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => write_number(out, n, &TOML_FLOATS),
        Value::String(s) => write_quoted(out, s),
        Value::Sequence(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_inline(out, item);
            }
            out.push(']');
        }
        Value::Mapping(map) if map.is_empty() => out.push_str("{}"),
        Value::Mapping(map) => {
            out.push_str("{ ");
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_key(out, key);
                out.push_str(" = ");
                write_inline(out, item);
            }
            out.push_str(" }");
        }
    }
}
