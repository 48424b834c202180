//! Error types for saving and loading documented configuration files.
//!
//! ## Error Categories
//!
//! - **Schema errors**: the model's JSON Schema could not be read
//!   ([`Error::SchemaIntrospection`]) or describes a field shape the comment
//!   engine cannot place ([`Error::UnsupportedShape`])
//! - **Format errors**: unknown file extension ([`Error::UnsupportedFormat`])
//!   or a value the target format cannot express ([`Error::UnsupportedType`])
//! - **Validation errors**: parse and type errors raised by `serde_json`,
//!   `serde_yaml` or `toml`, carried unchanged
//! - **I/O errors**: missing files, permissions, existing files when
//!   overwriting is disabled
//!
//! ## Examples
//!
//! ```rust
//! use confdoc::{from_str, Error, Format};
//! use std::collections::BTreeMap;
//!
//! let result: Result<BTreeMap<String, u32>, Error> = from_str("port: nope", Format::Yaml);
//! let err = result.unwrap_err();
//! assert!(err.is_validation());
//! ```

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur while saving or loading a configuration.
///
/// Errors raised by the underlying format libraries are wrapped
/// transparently: their `Display` output and `source()` are the library's own.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error during reading or writing
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The schema could not be introspected at the given field path
    #[error("Schema introspection failed at `{path}`: {msg}")]
    SchemaIntrospection { path: String, msg: String },

    /// The schema describes a field whose shape cannot be annotated
    #[error("Unsupported field shape at `{path}`: {msg}")]
    UnsupportedShape { path: String, msg: String },

    /// Unknown format name or file extension
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value the target format cannot represent
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),

    /// Destination exists and overwriting was disabled
    #[error("File already exists: {}", .0.display())]
    FileExists(PathBuf),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    TomlDe(#[from] toml::de::Error),

    /// Custom error
    #[error("Error: {0}")]
    Custom(String),
}

impl Error {
    /// Creates a schema introspection error for the field at `path`.
    ///
    /// An empty path names the schema root.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confdoc::Error;
    ///
    /// let err = Error::schema(&["database".to_string()], "dangling $ref");
    /// assert!(err.to_string().contains("`database`"));
    /// ```
    pub fn schema(path: &[String], msg: &str) -> Self {
        Error::SchemaIntrospection {
            path: display_path(path),
            msg: msg.to_string(),
        }
    }

    /// Creates an unsupported shape error for the field at `path`.
    pub fn unsupported_shape(path: &[String], msg: &str) -> Self {
        Error::UnsupportedShape {
            path: display_path(path),
            msg: msg.to_string(),
        }
    }

    /// Creates an unsupported format error.
    pub fn unsupported_format(name: &str) -> Self {
        Error::UnsupportedFormat(name.to_string())
    }

    /// Creates an unsupported type error for values the target format cannot express.
    pub fn unsupported_type(msg: &str) -> Self {
        Error::UnsupportedType(msg.to_string())
    }

    /// Creates a custom error with a display message.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use confdoc::Error;
    ///
    /// let err = Error::custom("something went wrong");
    /// assert!(err.to_string().contains("something went wrong"));
    /// ```
    pub fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }

    /// Returns `true` if this error came from parsing or validating data
    /// against the model, as opposed to schema, format or I/O problems.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Json(_) | Error::Yaml(_) | Error::TomlDe(_))
    }
}

fn display_path(path: &[String]) -> String {
    if path.is_empty() {
        "<root>".to_string()
    } else {
        path.join(".")
    }
}

impl serde::ser::Error for Error {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Error::Custom(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
