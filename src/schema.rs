//! Field metadata extraction from `schemars` JSON Schemas.
//!
//! Every model saved with comments must implement [`schemars::JsonSchema`].
//! Doc comments on struct fields become the field's description, and fields
//! typed as unit-only enums expose their variants as choices. This module
//! walks the generated schema once per call and returns one
//! [`FieldDescriptor`] per field that has something to say.
//!
//! ```rust
//! use confdoc::schema::extract;
//! use schemars::JsonSchema;
//!
//! #[derive(JsonSchema)]
//! #[serde(rename_all = "UPPERCASE")]
//! enum Level { Debug, Info, Warning, Error }
//!
//! #[derive(JsonSchema)]
//! struct Logging {
//!     /// Logging level
//!     level: Level,
//!     file: Option<String>,
//! }
//!
//! let fields = extract::<Logging>().unwrap();
//! assert_eq!(fields.len(), 1);
//! assert_eq!(
//!     fields[0].comment().as_deref(),
//!     Some("Logging level | choices: DEBUG, INFO, WARNING, ERROR")
//! );
//! ```

use crate::{Error, Result};
use log::debug;
use schemars::JsonSchema;
use serde_json::Value as Schema;
use std::collections::HashMap;

/// Shape of a field's value, as far as comment placement is concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Scalar,
    Sequence,
    Object,
}

/// Metadata for one field of a model, addressed by its path from the root.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldDescriptor {
    /// Field names from the root model down to this field.
    pub path: Vec<String>,
    /// Sanitized description, if the field has one.
    pub description: Option<String>,
    /// Allowed literal values in declaration order, if the field is restricted.
    pub choices: Option<Vec<String>>,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    /// `true` when the field's value is itself a nested object.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.kind == FieldKind::Object
    }

    /// Renders the comment text for this field.
    #[must_use]
    pub fn comment(&self) -> Option<String> {
        format_comment(self.description.as_deref(), self.choices.as_deref())
    }
}

/// Combines a description and a choice list into comment text.
///
/// # Examples
///
/// ```rust
/// use confdoc::schema::format_comment;
///
/// let choices = ["a".to_string(), "b".to_string()];
/// assert_eq!(format_comment(Some("Mode"), Some(&choices)).as_deref(), Some("Mode | choices: a, b"));
/// assert_eq!(format_comment(None, Some(&choices)).as_deref(), Some("choices: a, b"));
/// assert_eq!(format_comment(Some("Mode"), None).as_deref(), Some("Mode"));
/// assert_eq!(format_comment(None, Some(&[])), None);
/// ```
#[must_use]
pub fn format_comment(description: Option<&str>, choices: Option<&[String]>) -> Option<String> {
    let choices = choices
        .filter(|c| !c.is_empty())
        .map(|c| format!("choices: {}", c.join(", ")));
    match (description.filter(|d| !d.is_empty()), choices) {
        (Some(d), Some(c)) => Some(format!("{} | {}", d, c)),
        (Some(d), None) => Some(d.to_string()),
        (None, c) => c,
    }
}

/// Flattens a description onto one line. Blank descriptions yield `None`.
#[must_use]
pub fn sanitize_comment(text: &str) -> Option<String> {
    let line = text.replace(['\n', '\r'], " ");
    let line = line.trim();
    if line.is_empty() {
        None
    } else {
        Some(line.to_string())
    }
}

/// Extracts descriptors for every documented field of `T`, recursively.
///
/// # Errors
///
/// Returns [`Error::SchemaIntrospection`] when the schema cannot be read and
/// [`Error::UnsupportedShape`] for fields that may be either an object or a
/// sequence.
pub fn extract<T: JsonSchema>() -> Result<Vec<FieldDescriptor>> {
    let schema = schemars::schema_for!(T);
    extract_schema(schema.as_value())
}

/// Extracts descriptors from an already generated JSON Schema document.
///
/// Descriptors come out in declaration order, each container field before
/// its own sub-fields.
///
/// # Errors
///
/// See [`extract`].
pub fn extract_schema(root: &Schema) -> Result<Vec<FieldDescriptor>> {
    let mut extractor = Extractor {
        root,
        expanding: Vec::new(),
        out: Vec::new(),
    };
    let mut path = Vec::new();
    match extractor.classify(root, &path)? {
        Shape::Object(Some(object)) => extractor.expand(object, &mut path)?,
        _ => return Err(Error::schema(&path, "root schema is not an object with properties")),
    }
    debug!("extracted {} field descriptors", extractor.out.len());
    Ok(extractor.out)
}

/// Path-keyed comment lookup built from a descriptor list.
#[derive(Clone, Debug, Default)]
pub struct DescriptorTable {
    comments: HashMap<Vec<String>, String>,
}

impl DescriptorTable {
    /// Indexes descriptors by path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SchemaIntrospection`] if two descriptors share a path.
    pub fn new(descriptors: Vec<FieldDescriptor>) -> Result<Self> {
        let mut comments = HashMap::with_capacity(descriptors.len());
        for descriptor in descriptors {
            let Some(text) = descriptor.comment() else {
                continue;
            };
            if comments.insert(descriptor.path.clone(), text).is_some() {
                return Err(Error::schema(&descriptor.path, "field path is not unique"));
            }
        }
        Ok(DescriptorTable { comments })
    }

    /// Extracts and indexes the descriptors of `T`.
    ///
    /// # Errors
    ///
    /// See [`extract`].
    pub fn for_type<T: JsonSchema>() -> Result<Self> {
        Self::new(extract::<T>()?)
    }

    /// Comment text for the field at `path`, if any.
    #[must_use]
    pub fn comment(&self, path: &[String]) -> Option<&str> {
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

/// What a property schema resolves to. `Object(None)` is an object whose
/// fields cannot be known statically, such as a tagged enum.
enum Shape<'s> {
    Scalar(Option<Vec<String>>),
    Sequence(Option<&'s Schema>),
    Object(Option<&'s Schema>),
}

struct Extractor<'s> {
    root: &'s Schema,
    expanding: Vec<&'s Schema>,
    out: Vec<FieldDescriptor>,
}

impl<'s> Extractor<'s> {
    fn expand(&mut self, object: &'s Schema, path: &mut Vec<String>) -> Result<()> {
        if self.expanding.iter().any(|s| std::ptr::eq(*s, object)) {
            debug!("not expanding recursive schema at {}", path.join("."));
            return Ok(());
        }
        let properties = object
            .get("properties")
            .and_then(Schema::as_object)
            .ok_or_else(|| Error::schema(path, "object schema has no properties"))?;

        self.expanding.push(object);
        for (name, property) in properties {
            path.push(name.clone());
            self.field(property, path)?;
            path.pop();
        }
        self.expanding.pop();
        Ok(())
    }

    fn field(&mut self, property: &'s Schema, path: &mut Vec<String>) -> Result<()> {
        let description = property
            .get("description")
            .and_then(Schema::as_str)
            .and_then(sanitize_comment);

        let (kind, choices, nested) = match self.classify(property, path)? {
            Shape::Scalar(choices) => (FieldKind::Scalar, choices, None),
            Shape::Sequence(items) => (FieldKind::Sequence, None, items),
            Shape::Object(object) => (FieldKind::Object, None, object),
        };

        if description.is_some() || choices.as_ref().is_some_and(|c| !c.is_empty()) {
            self.out.push(FieldDescriptor {
                path: path.clone(),
                description,
                choices,
                kind,
            });
        }

        if let Some(nested) = nested {
            self.expand(nested, path)?;
        }
        Ok(())
    }

    fn classify(&self, schema: &'s Schema, path: &[String]) -> Result<Shape<'s>> {
        let object = match schema {
            Schema::Bool(_) => return Ok(Shape::Scalar(None)),
            Schema::Object(object) => object,
            _ => return Err(Error::schema(path, "field schema is not an object")),
        };

        if let Some(reference) = object.get("$ref") {
            let target = self.resolve(reference, path)?;
            return self.classify(target, path);
        }
        if let Some(values) = object.get("enum").and_then(Schema::as_array) {
            return Ok(Shape::Scalar(Some(literals(values))));
        }
        if let Some(value) = object.get("const") {
            return Ok(Shape::Scalar(Some(literals(std::slice::from_ref(value)))));
        }
        for keyword in ["anyOf", "oneOf"] {
            if let Some(branches) = object.get(keyword).and_then(Schema::as_array) {
                return self.classify_union(branches, path);
            }
        }
        if let Some(all_of) = object.get("allOf").and_then(Schema::as_array) {
            if let [single] = all_of.as_slice() {
                return self.classify(single, path);
            }
        }

        let types: Vec<&str> = match object.get("type") {
            Some(Schema::String(t)) => vec![t.as_str()],
            Some(Schema::Array(ts)) => ts.iter().filter_map(Schema::as_str).collect(),
            _ => Vec::new(),
        };
        let types: Vec<&str> = types.into_iter().filter(|t| *t != "null").collect();
        let has_properties = object.contains_key("properties");

        match types.as_slice() {
            ["array"] => self.classify_items(object.get("items"), path),
            ["object"] if has_properties => Ok(Shape::Object(Some(schema))),
            [] if has_properties => Ok(Shape::Object(Some(schema))),
            ts if ts.contains(&"array") && (ts.contains(&"object") || has_properties) => Err(
                Error::unsupported_shape(path, "field may be either an object or an array"),
            ),
            _ => Ok(Shape::Scalar(None)),
        }
    }

    fn classify_items(&self, items: Option<&'s Schema>, path: &[String]) -> Result<Shape<'s>> {
        let Some(items) = items.filter(|i| i.is_object()) else {
            return Ok(Shape::Sequence(None));
        };
        match self.classify(items, path)? {
            Shape::Object(object) => Ok(Shape::Sequence(object)),
            _ => Ok(Shape::Sequence(None)),
        }
    }

    fn classify_union(&self, branches: &'s [Schema], path: &[String]) -> Result<Shape<'s>> {
        let branches: Vec<&'s Schema> = branches.iter().filter(|b| !is_null_schema(b)).collect();
        match branches.as_slice() {
            [] => return Ok(Shape::Scalar(None)),
            [single] => return self.classify(*single, path),
            _ => {}
        }

        let shapes = branches
            .iter()
            .map(|b| self.classify(*b, path))
            .collect::<Result<Vec<_>>>()?;

        let any_object = shapes.iter().any(|s| matches!(s, Shape::Object(_)));
        let any_sequence = shapes.iter().any(|s| matches!(s, Shape::Sequence(_)));
        if any_object && any_sequence {
            return Err(Error::unsupported_shape(
                path,
                "field may be either an object or an array",
            ));
        }
        if shapes.iter().all(|s| matches!(s, Shape::Object(_))) {
            return Ok(Shape::Object(None));
        }

        let mut merged = Vec::new();
        for shape in shapes {
            match shape {
                Shape::Scalar(Some(choices)) => {
                    for choice in choices {
                        if !merged.contains(&choice) {
                            merged.push(choice);
                        }
                    }
                }
                _ => return Ok(Shape::Scalar(None)),
            }
        }
        Ok(Shape::Scalar(Some(merged)))
    }

    fn resolve(&self, reference: &Schema, path: &[String]) -> Result<&'s Schema> {
        let reference = reference
            .as_str()
            .ok_or_else(|| Error::schema(path, "$ref is not a string"))?;
        let pointer = reference
            .strip_prefix('#')
            .ok_or_else(|| Error::schema(path, &format!("non-local $ref `{}`", reference)))?;
        self.root
            .pointer(pointer)
            .ok_or_else(|| Error::schema(path, &format!("dangling $ref `{}`", reference)))
    }
}

fn is_null_schema(schema: &Schema) -> bool {
    schema.get("type").and_then(Schema::as_str) == Some("null")
        || schema.get("const").is_some_and(Schema::is_null)
}

fn literals(values: &[Schema]) -> Vec<String> {
    values
        .iter()
        .filter(|v| !v.is_null())
        .map(|v| match v {
            Schema::String(s) => s.clone(),
            other => other.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemars::JsonSchema;
    use serde_json::json;

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    #[serde(rename_all = "UPPERCASE")]
    enum Level {
        Debug,
        Info,
        Warning,
        Error,
    }

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Database {
        /// Host name
        host: String,
        port: u16,
    }

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct Server {
        /// Bind address
        bind: String,
    }

    #[derive(JsonSchema)]
    #[allow(dead_code)]
    struct AppConfig {
        /// Application name
        name: String,
        /// Logging level
        level: Level,
        fallback: Option<Level>,
        /// DB settings
        database: Database,
        replica: Option<Database>,
        servers: Vec<Server>,
        untouched: u32,
    }

    fn paths(descriptors: &[FieldDescriptor]) -> Vec<String> {
        descriptors.iter().map(|d| d.path.join(".")).collect()
    }

    #[test]
    fn test_extract_model() {
        let fields = extract::<AppConfig>().unwrap();
        assert_eq!(
            paths(&fields),
            vec![
                "name",
                "level",
                "fallback",
                "database",
                "database.host",
                "replica.host",
                "servers.bind",
            ]
        );

        let level = &fields[1];
        assert_eq!(level.kind, FieldKind::Scalar);
        assert_eq!(
            level.comment().as_deref(),
            Some("Logging level | choices: DEBUG, INFO, WARNING, ERROR")
        );
        assert_eq!(
            fields[2].comment().as_deref(),
            Some("choices: DEBUG, INFO, WARNING, ERROR")
        );
        assert!(fields[3].is_container());
        assert_eq!(fields[3].comment().as_deref(), Some("DB settings"));
    }

    #[test]
    fn test_undocumented_fields_absent() {
        let fields = extract::<AppConfig>().unwrap();
        assert!(!paths(&fields).iter().any(|p| p == "untouched" || p == "database.port"));
    }

    #[test]
    fn test_sanitize_multiline() {
        assert_eq!(
            sanitize_comment("first\nsecond\r\nthird").as_deref(),
            Some("first second  third")
        );
        assert_eq!(sanitize_comment("  \n "), None);
    }

    #[test]
    fn test_oneof_const_choices() {
        let schema = json!({
            "type": "object",
            "properties": {
                "mode": {
                    "description": "Run mode",
                    "oneOf": [
                        {"type": "string", "const": "fast", "description": "Quick"},
                        {"type": "string", "const": "safe"}
                    ]
                }
            }
        });
        let fields = extract_schema(&schema).unwrap();
        assert_eq!(
            fields[0].comment().as_deref(),
            Some("Run mode | choices: fast, safe")
        );
    }

    #[test]
    fn test_numeric_choices_and_nullable_enum() {
        let schema = json!({
            "type": "object",
            "properties": {
                "retries": {"enum": [1, 3, 5, null]}
            }
        });
        let fields = extract_schema(&schema).unwrap();
        assert_eq!(fields[0].choices, Some(vec!["1".into(), "3".into(), "5".into()]));
    }

    #[test]
    fn test_object_or_array_rejected() {
        let schema = json!({
            "type": "object",
            "$defs": {
                "Item": {"type": "object", "properties": {"id": {"type": "integer"}}}
            },
            "properties": {
                "items": {
                    "anyOf": [
                        {"$ref": "#/$defs/Item"},
                        {"type": "array", "items": {"$ref": "#/$defs/Item"}}
                    ]
                }
            }
        });
        let err = extract_schema(&schema).unwrap_err();
        assert!(matches!(err, Error::UnsupportedShape { ref path, .. } if path == "items"));
    }

    #[test]
    fn test_tagged_enum_is_opaque_object() {
        let schema = json!({
            "type": "object",
            "properties": {
                "system": {
                    "description": "Build system",
                    "oneOf": [
                        {"type": "object", "properties": {"Cargo": {"type": "object", "properties": {"target": {"type": "string", "description": "Target"}}}}},
                        {"type": "object", "properties": {"Custom": {"type": "string"}}}
                    ]
                }
            }
        });
        let fields = extract_schema(&schema).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].kind, FieldKind::Object);
    }

    #[test]
    fn test_dangling_ref() {
        let schema = json!({
            "type": "object",
            "properties": {"db": {"$ref": "#/$defs/Missing"}}
        });
        let err = extract_schema(&schema).unwrap_err();
        assert!(matches!(err, Error::SchemaIntrospection { ref path, .. } if path == "db"));
    }

    #[test]
    fn test_non_object_root() {
        let err = extract_schema(&json!({"type": "string"})).unwrap_err();
        assert!(matches!(err, Error::SchemaIntrospection { .. }));
    }

    #[test]
    fn test_malformed_property() {
        let schema = json!({"type": "object", "properties": {"x": 5}});
        assert!(matches!(
            extract_schema(&schema),
            Err(Error::SchemaIntrospection { .. })
        ));
    }

    #[test]
    fn test_recursive_schema_terminates() {
        #[derive(JsonSchema)]
        #[allow(dead_code)]
        struct Node {
            /// Node label
            label: String,
            children: Vec<Node>,
        }

        let fields = extract::<Node>().unwrap();
        assert_eq!(fields[0].path, vec!["label".to_string()]);
        assert!(fields.len() <= 2);
    }

    #[test]
    fn test_table_lookup_and_duplicates() {
        let table = DescriptorTable::for_type::<AppConfig>().unwrap();
        assert_eq!(
            table.comment(&["database".to_string(), "host".to_string()]),
            Some("Host name")
        );
        assert_eq!(table.comment(&["untouched".to_string()]), None);

        let dup = FieldDescriptor {
            path: vec!["a".to_string()],
            description: Some("A".to_string()),
            choices: None,
            kind: FieldKind::Scalar,
        };
        assert!(DescriptorTable::new(vec![dup.clone(), dup]).is_err());
    }
}
