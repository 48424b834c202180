//! # confdoc
//!
//! Save and load typed configuration as JSON, YAML or TOML, with every
//! field's documentation written next to it as a trailing comment.
//!
//! ## How it works
//!
//! A model derives `Serialize`, `Deserialize` and [`schemars::JsonSchema`].
//! Doc comments on its fields become descriptions in the JSON Schema, and
//! unit-only enums become lists of allowed values. When saving YAML or TOML:
//!
//! 1. the instance is converted into a format-neutral [`Value`] tree
//! 2. the schema is walked into a [`DescriptorTable`] of comments keyed by field path
//! 3. a [`CommentSink`] for the target format collects the comments for the keys in the tree
//! 4. the format's emitter writes the document with `  # comment` at the end of each documented line
//!
//! Loading never looks at comments: the text goes straight through
//! `serde_json`, `serde_yaml` or `toml` into the model, and their errors are
//! returned as they are.
//!
//! ## Quick Start
//!
//! ```rust
//! use confdoc::{from_str, to_string, Format};
//! use schemars::JsonSchema;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, JsonSchema, PartialEq, Debug)]
//! struct Database {
//!     /// Host name
//!     host: String,
//!     port: u16,
//! }
//!
//! #[derive(Serialize, Deserialize, JsonSchema, PartialEq, Debug)]
//! struct AppConfig {
//!     /// Application name
//!     name: String,
//!     /// DB settings
//!     database: Database,
//! }
//!
//! let config = AppConfig {
//!     name: "app".to_string(),
//!     database: Database { host: "localhost".to_string(), port: 5432 },
//! };
//!
//! let yaml = to_string(&config, Format::Yaml).unwrap();
//! assert_eq!(
//!     yaml,
//!     "name: app  # Application name\n\
//!      database:  # DB settings\n  \
//!        host: localhost  # Host name\n  \
//!        port: 5432\n"
//! );
//!
//! let toml = to_string(&config, Format::Toml).unwrap();
//! assert_eq!(
//!     toml,
//!     "name = \"app\"  # Application name\n\
//!      \n\
//!      [database]  # DB settings\n\
//!      host = \"localhost\"  # Host name\n\
//!      port = 5432\n"
//! );
//!
//! let back: AppConfig = from_str(&toml, Format::Toml).unwrap();
//! assert_eq!(back, config);
//! ```
//!
//! ### Choices
//!
//! Fields typed as unit-only enums list their variants after the description:
//!
//! ```rust
//! use confdoc::{to_string, Format};
//! use schemars::JsonSchema;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, JsonSchema)]
//! #[serde(rename_all = "UPPERCASE")]
//! enum Level { Debug, Info, Warning, Error }
//!
//! #[derive(Serialize, Deserialize, JsonSchema)]
//! struct Logging {
//!     /// Logging level
//!     level: Level,
//! }
//!
//! let yaml = to_string(&Logging { level: Level::Info }, Format::Yaml).unwrap();
//! assert_eq!(yaml, "level: INFO  # Logging level | choices: DEBUG, INFO, WARNING, ERROR\n");
//! ```
//!
//! ### Files
//!
//! The format follows the file extension unless [`SaveOptions`] says otherwise.
//! Every model implementing the three traits also gets [`ConfigFile`]:
//!
//! ```rust,no_run
//! use confdoc::{ConfigFile, SaveOptions};
//! use schemars::JsonSchema;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize, JsonSchema, Default)]
//! struct Settings {
//!     /// Worker threads
//!     workers: u32,
//! }
//!
//! Settings::default().save("settings.toml").unwrap();
//! Settings::default()
//!     .save_with_options("settings.yaml", &SaveOptions::new().without_comments())
//!     .unwrap();
//! let settings = Settings::load("settings.toml").unwrap();
//! ```
//!
//! ## Layout
//!
//! - **YAML**: block style with 2-space indentation, in field declaration order
//! - **TOML**: the `key = value` lines of each table come before its
//!   `[sub.tables]`, and nested objects get their comment on the header line
//! - **JSON**: pretty-printed, no comments
//!
//! Saving with comments turned off skips schema extraction. The layout is
//! the same as a commented save, minus the comments.

pub mod annotate;
mod emit;
pub mod error;
pub mod macros;
pub mod map;
pub mod options;
pub mod schema;
pub mod ser;
pub mod toml;
pub mod value;
pub mod yaml;

pub use annotate::{annotate, CommentSink};
pub use error::{Error, Result};
pub use map::Map;
pub use options::{Format, SaveOptions};
pub use schema::{DescriptorTable, FieldDescriptor, FieldKind};
pub use ser::{to_tree, TreeSerializer};
pub use self::toml::{TomlComments, TomlDocument};
pub use value::{Number, Value};
pub use yaml::{YamlComments, YamlDocument};

use log::debug;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::Path;

/// Serialize `value` as `format`, with field comments for YAML and TOML.
///
/// # Examples
///
/// ```rust
/// use confdoc::{to_string, Format};
/// use schemars::JsonSchema;
/// use serde::Serialize;
///
/// #[derive(Serialize, JsonSchema)]
/// struct Point {
///     /// Horizontal
///     x: i32,
///     y: i32,
/// }
///
/// let yaml = to_string(&Point { x: 1, y: 2 }, Format::Yaml).unwrap();
/// assert_eq!(yaml, "x: 1  # Horizontal\ny: 2\n");
/// ```
///
/// # Errors
///
/// Returns an error if the schema cannot be introspected or the value
/// cannot be represented in `format`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string<T>(value: &T, format: Format) -> Result<String>
where
    T: Serialize + JsonSchema,
{
    render(value, format, true)
}

/// Serialize `value` using `options`, which must name a format.
///
/// # Examples
///
/// ```rust
/// use confdoc::{to_string_with_options, Format, SaveOptions};
/// use schemars::JsonSchema;
/// use serde::Serialize;
///
/// #[derive(Serialize, JsonSchema)]
/// struct Point {
///     /// Horizontal
///     x: i32,
/// }
///
/// let options = SaveOptions::new().with_format(Format::Toml).without_comments();
/// let toml = to_string_with_options(&Point { x: 1 }, &options).unwrap();
/// assert!(!toml.contains('#'));
/// ```
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] if `options.format` is `None`, and
/// otherwise the same errors as [`to_string`].
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_string_with_options<T>(value: &T, options: &SaveOptions) -> Result<String>
where
    T: Serialize + JsonSchema,
{
    let format = options
        .format
        .ok_or_else(|| Error::unsupported_format("no format given for in-memory output"))?;
    render(value, format, options.comments)
}

fn render<T>(value: &T, format: Format, comments: bool) -> Result<String>
where
    T: Serialize + JsonSchema,
{
    match format {
        Format::Json => {
            let mut text = serde_json::to_string_pretty(value)?;
            text.push('\n');
            Ok(text)
        }
        Format::Yaml if !comments => Ok(YamlDocument::new(to_tree(value)?).emit()),
        Format::Toml if !comments => Ok(TomlDocument::new(to_tree(value)?)?.emit()),
        Format::Yaml => {
            let tree = to_tree(value)?;
            let table = DescriptorTable::for_type::<T>()?;
            debug!("annotating yaml with {} comments", table.len());
            Ok(YamlDocument::annotated(tree, &table).emit())
        }
        Format::Toml => {
            let tree = to_tree(value)?;
            let table = DescriptorTable::for_type::<T>()?;
            debug!("annotating toml with {} comments", table.len());
            Ok(TomlDocument::annotated(tree, &table)?.emit())
        }
    }
}

/// Serialize `value` as `format` into a writer.
///
/// # Examples
///
/// ```rust
/// use confdoc::{to_writer, Format};
/// use schemars::JsonSchema;
/// use serde::Serialize;
///
/// #[derive(Serialize, JsonSchema)]
/// struct Point { x: i32 }
///
/// let mut buffer = Vec::new();
/// to_writer(&mut buffer, &Point { x: 1 }, Format::Json).unwrap();
/// assert_eq!(buffer, b"{\n  \"x\": 1\n}\n");
/// ```
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer<W, T>(writer: W, value: &T, format: Format) -> Result<()>
where
    W: io::Write,
    T: Serialize + JsonSchema,
{
    to_writer_with_options(writer, value, &SaveOptions::new().with_format(format))
}

/// Serialize `value` into a writer using `options`, which must name a format.
///
/// # Errors
///
/// Returns an error if serialization fails or writing to the writer fails.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn to_writer_with_options<W, T>(mut writer: W, value: &T, options: &SaveOptions) -> Result<()>
where
    W: io::Write,
    T: Serialize + JsonSchema,
{
    let text = to_string_with_options(value, options)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

/// Deserialize a `T` from text in `format`.
///
/// Comments in the text are ignored. Parse and validation errors come back
/// unchanged from the format library.
///
/// # Examples
///
/// ```rust
/// use confdoc::{from_str, Format};
/// use serde::Deserialize;
///
/// #[derive(Deserialize, PartialEq, Debug)]
/// struct Point { x: i32, y: i32 }
///
/// let point: Point = from_str("x: 1  # Horizontal\ny: 2\n", Format::Yaml).unwrap();
/// assert_eq!(point, Point { x: 1, y: 2 });
/// ```
///
/// # Errors
///
/// Returns [`Error::Json`], [`Error::Yaml`] or [`Error::TomlDe`] if the text
/// is malformed or does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_str<T>(s: &str, format: Format) -> Result<T>
where
    T: DeserializeOwned,
{
    match format {
        Format::Json => Ok(serde_json::from_str(s)?),
        Format::Yaml => Ok(serde_yaml::from_str(s)?),
        Format::Toml => Ok(::toml::from_str(s)?),
    }
}

/// Deserialize a `T` from an I/O stream of text in `format`.
///
/// # Errors
///
/// Returns an error if reading fails or the text does not match `T`.
#[must_use = "this returns the result of the operation, errors must be handled"]
pub fn from_reader<R, T>(mut reader: R, format: Format) -> Result<T>
where
    R: io::Read,
    T: DeserializeOwned,
{
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    from_str(&text, format)
}

/// Save `value` to `path`, inferring the format from the extension.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] before touching the file system if
/// the extension is unknown, and I/O errors from writing unchanged.
pub fn save<T, P>(value: &T, path: P) -> Result<()>
where
    T: Serialize + JsonSchema,
    P: AsRef<Path>,
{
    save_with_options(value, path, &SaveOptions::default())
}

/// Save `value` to `path` using `options`.
///
/// The file is written in one call; no temporary file or rename is used.
///
/// # Errors
///
/// Same as [`save`], plus [`Error::FileExists`] when `options.overwrite` is
/// `false` and `path` exists.
pub fn save_with_options<T, P>(value: &T, path: P, options: &SaveOptions) -> Result<()>
where
    T: Serialize + JsonSchema,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let format = options.resolve_format(path)?;
    debug!(
        "saving {} as {} (comments: {})",
        path.display(),
        format,
        options.comments
    );
    if !options.overwrite && path.exists() {
        return Err(Error::FileExists(path.to_path_buf()));
    }
    let text = render(value, format, options.comments)?;
    fs::write(path, text)?;
    Ok(())
}

/// Load a `T` from `path`, inferring the format from the extension.
///
/// # Errors
///
/// Returns [`Error::UnsupportedFormat`] before reading if the extension is
/// unknown, I/O errors unchanged, and the format library's error if the
/// contents do not match `T`.
pub fn load<T, P>(path: P) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let format = Format::from_path(path.as_ref())?;
    load_with_format(path, format)
}

/// Load a `T` from `path` as `format`, whatever its extension.
///
/// # Errors
///
/// Same as [`load`], without the extension check.
pub fn load_with_format<T, P>(path: P, format: Format) -> Result<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    debug!("loading {} as {}", path.display(), format);
    let text = fs::read_to_string(path)?;
    from_str(&text, format)
}

/// Save and load methods for any documented, serializable model.
///
/// Implemented for every type that is `Serialize + DeserializeOwned + JsonSchema`.
pub trait ConfigFile: Serialize + DeserializeOwned + JsonSchema {
    /// See [`save`](crate::save).
    fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        crate::save(self, path)
    }

    /// See [`save_with_options`](crate::save_with_options).
    fn save_with_options(&self, path: impl AsRef<Path>, options: &SaveOptions) -> Result<()> {
        crate::save_with_options(self, path, options)
    }

    /// See [`load`](crate::load).
    fn load(path: impl AsRef<Path>) -> Result<Self> {
        crate::load(path)
    }

    /// See [`load_with_format`](crate::load_with_format).
    fn load_with_format(path: impl AsRef<Path>, format: Format) -> Result<Self> {
        crate::load_with_format(path, format)
    }

    fn to_config_string(&self, format: Format) -> Result<String> {
        crate::to_string(self, format)
    }

    fn from_config_str(s: &str, format: Format) -> Result<Self> {
        crate::from_str(s, format)
    }
}

impl<T> ConfigFile for T where T: Serialize + DeserializeOwned + JsonSchema {}
