//! Block-style YAML output with trailing field comments.
//!
//! Every key comment goes on the key's own line. Container comments also go
//! on the key line, just before the nested block:
//!
//! ```yaml
//! name: app  # Application name
//! database:  # DB settings
//!   host: localhost  # Host name
//! ```
//!
//! Strings are written plain where YAML would read them back as the same
//! string, and double-quoted otherwise.

use crate::annotate::{annotate, CommentSink};
use crate::emit::{needs_escape, push_comment, push_indent, write_number, write_quoted, YAML_FLOATS};
use crate::schema::DescriptorTable;
use crate::{Map, Value};
use std::collections::HashMap;

/// Comments collected for a YAML document, keyed by field path.
#[derive(Clone, Debug, Default)]
pub struct YamlComments {
    comments: HashMap<Vec<String>, String>,
}

impl YamlComments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Comment attached to the key at `path`.
    #[must_use]
    pub fn get(&self, path: &[String]) -> Option<&str> {
        self.comments.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }
}

impl CommentSink for YamlComments {
    fn attach_key_comment(&mut self, path: &[String], text: &str) {
        self.comments.insert(path.to_vec(), text.to_string());
    }

    // YAML has no section headers, so container comments sit on the key line too
    fn attach_container_comment(&mut self, path: &[String], text: &str) {
        self.attach_key_comment(path, text);
    }
}

/// A document tree ready to be written as YAML.
#[derive(Clone, Debug)]
pub struct YamlDocument {
    root: Value,
    comments: YamlComments,
}

impl YamlDocument {
    /// Wraps `root` with no comments.
    #[must_use]
    pub fn new(root: Value) -> Self {
        YamlDocument {
            root,
            comments: YamlComments::new(),
        }
    }

    /// Wraps `root` and attaches the comments from `table`.
    #[must_use]
    pub fn annotated(root: Value, table: &DescriptorTable) -> Self {
        let mut comments = YamlComments::new();
        annotate(&root, table, &mut comments);
        YamlDocument { root, comments }
    }

    #[must_use]
    pub fn comments(&self) -> &YamlComments {
        &self.comments
    }

    /// Renders the document. The output always ends with a newline.
    #[must_use]
    pub fn emit(&self) -> String {
        let mut emitter = Emitter {
            out: String::with_capacity(256),
            comments: &self.comments,
            path: Vec::new(),
        };
        match &self.root {
            Value::Mapping(map) if !map.is_empty() => emitter.write_mapping(map, 0, None),
            Value::Sequence(items) if !items.is_empty() => emitter.write_sequence(items, 0, None),
            scalar => {
                emitter.write_inline(scalar);
                emitter.out.push('\n');
            }
        }
        emitter.out
    }
}

struct Emitter<'a> {
    out: String,
    comments: &'a YamlComments,
    path: Vec<String>,
}

impl Emitter<'_> {
    /// Writes a non-empty mapping at `indent`. When `lead` is given it
    /// replaces the indentation of the first key, which is how mappings
    /// nested in sequences start on the `- ` line.
    fn write_mapping(&mut self, map: &Map, indent: usize, mut lead: Option<String>) {
        let comments = self.comments;
        for (key, value) in map {
            match lead.take() {
                Some(lead) => self.out.push_str(&lead),
                None => push_indent(&mut self.out, indent),
            }
            if map.is_bare_key(key) {
                self.out.push_str(key);
            } else {
                self.write_string(key);
            }
            self.out.push(':');

            self.path.push(key.clone());
            let comment = comments.get(&self.path);
            match value {
                Value::Mapping(nested) if !nested.is_empty() => {
                    push_comment(&mut self.out, comment);
                    self.out.push('\n');
                    self.write_mapping(nested, indent + 2, None);
                }
                Value::Sequence(items) if !items.is_empty() => {
                    push_comment(&mut self.out, comment);
                    self.out.push('\n');
                    self.write_sequence(items, indent + 2, None);
                }
                scalar => {
                    self.out.push(' ');
                    self.write_inline(scalar);
                    push_comment(&mut self.out, comment);
                    self.out.push('\n');
                }
            }
            self.path.pop();
        }
    }

    fn write_sequence(&mut self, items: &[Value], indent: usize, mut lead: Option<String>) {
        for item in items {
            let mut prefix = match lead.take() {
                Some(lead) => lead,
                None => " ".repeat(indent),
            };
            prefix.push_str("- ");
            match item {
                Value::Mapping(map) if !map.is_empty() => {
                    self.write_mapping(map, indent + 2, Some(prefix));
                }
                Value::Sequence(nested) if !nested.is_empty() => {
                    self.write_sequence(nested, indent + 2, Some(prefix));
                }
                scalar => {
                    self.out.push_str(&prefix);
                    self.write_inline(scalar);
                    self.out.push('\n');
                }
            }
        }
    }

    /// Scalars and empty collections.
    fn write_inline(&mut self, value: &Value) {
        match value {
            Value::Null => self.out.push_str("null"),
            Value::Bool(b) => self.out.push_str(if *b { "true" } else { "false" }),
            Value::Number(n) => write_number(&mut self.out, n, &YAML_FLOATS),
            Value::String(s) => self.write_string(s),
            Value::Sequence(_) => self.out.push_str("[]"),
            Value::Mapping(_) => self.out.push_str("{}"),
        }
    }

    fn write_string(&mut self, s: &str) {
        if is_plain_safe(s) {
            self.out.push_str(s);
        } else {
            write_quoted(&mut self.out, s);
        }
    }
}

const RESERVED_WORDS: &[&str] = &[
    "null", "~", "true", "false", "yes", "no", "on", "off", "y", "n", "nan", "inf",
];

/// `true` if `s` reads back as the same string when written unquoted.
fn is_plain_safe(s: &str) -> bool {
    let Some(first) = s.chars().next() else {
        return false;
    };
    if first.is_whitespace() || s.ends_with(char::is_whitespace) {
        return false;
    }
    if "-?:,[]{}#&*!|>'\"%@`+.".contains(first) || first.is_ascii_digit() {
        return false;
    }
    if s.contains(": ") || s.contains(" #") || s.ends_with(':') {
        return false;
    }
    if s.chars().any(needs_escape) {
        return false;
    }
    let lower = s.to_ascii_lowercase();
    !RESERVED_WORDS.contains(&lower.as_str())
}
