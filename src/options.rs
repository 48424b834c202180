//! Output formats and per-call save options.
//!
//! - [`Format`]: JSON, YAML or TOML, usually inferred from a file extension
//! - [`SaveOptions`]: format override, the comment switch and overwrite policy
//!
//! ## Examples
//!
//! ```rust
//! use confdoc::{Format, SaveOptions};
//!
//! assert_eq!(Format::from_path("settings.yml").unwrap(), Format::Yaml);
//!
//! let options = SaveOptions::new()
//!     .with_format(Format::Toml)
//!     .without_comments();
//! assert!(!options.comments);
//! ```

use crate::{Error, Result};
use std::fmt;
use std::path::Path;

/// A supported document format.
///
/// Only YAML and TOML carry comments; JSON output is always plain.
///
/// # Examples
///
/// ```rust
/// use confdoc::Format;
///
/// assert_eq!(Format::from_extension("TOML").unwrap(), Format::Toml);
/// assert!(Format::from_extension("ini").is_err());
/// assert!(Format::Yaml.supports_comments());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Yaml,
    Toml,
}

impl Format {
    /// Maps a file extension, without the dot, to a format. Case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] for unknown extensions.
    pub fn from_extension(ext: &str) -> Result<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Ok(Format::Json),
            "yaml" | "yml" => Ok(Format::Yaml),
            "toml" | "tml" => Ok(Format::Toml),
            _ => Err(Error::unsupported_format(ext)),
        }
    }

    /// Infers the format from the extension of `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] when the path has no extension or
    /// an unknown one.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| Error::unsupported_format(&path.display().to_string()))?;
        Self::from_extension(ext)
    }

    /// Returns the canonical lowercase name of this format.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Yaml => "yaml",
            Format::Toml => "toml",
        }
    }

    #[must_use]
    pub const fn supports_comments(&self) -> bool {
        !matches!(self, Format::Json)
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Options for a single save call.
///
/// # Examples
///
/// ```rust
/// use confdoc::{Format, SaveOptions};
///
/// // Infer the format, write comments, replace existing files
/// let options = SaveOptions::new();
/// assert!(options.comments);
/// assert!(options.overwrite);
/// assert_eq!(options.format, None);
///
/// let options = SaveOptions::new()
///     .with_format(Format::Yaml)
///     .with_overwrite(false);
/// ```
#[derive(Clone, Debug)]
pub struct SaveOptions {
    /// Explicit format. `None` infers it from the destination path.
    pub format: Option<Format>,
    /// Write field descriptions as comments. Ignored for JSON.
    pub comments: bool,
    /// Replace the destination if it already exists.
    pub overwrite: bool,
}

impl Default for SaveOptions {
    fn default() -> Self {
        SaveOptions {
            format: None,
            comments: true,
            overwrite: true,
        }
    }
}

impl SaveOptions {
    /// Creates default options (inferred format, comments on, overwrite on).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Forces the output format regardless of the destination's extension.
    #[must_use]
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    #[must_use]
    pub fn with_comments(mut self, comments: bool) -> Self {
        self.comments = comments;
        self
    }

    /// Skips comment generation entirely, including schema extraction.
    #[must_use]
    pub fn without_comments(self) -> Self {
        self.with_comments(false)
    }

    /// When `false`, saving to an existing path fails with
    /// [`Error::FileExists`](crate::Error::FileExists).
    #[must_use]
    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Resolves the effective format for writing to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`] if no format was set and the
    /// extension is not recognized.
    pub fn resolve_format(&self, path: impl AsRef<Path>) -> Result<Format> {
        match self.format {
            Some(format) => Ok(format),
            None => Format::from_path(path),
        }
    }
}
