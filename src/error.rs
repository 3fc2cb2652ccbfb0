#![allow(non_shorthand_field_patterns)]
#![doc = "Error handling primitives shared across the makefy crate."]
// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! The derive emitted by [`masterror::Error`] expands pattern matches that
//! trigger the `non_shorthand_field_patterns` lint. The lint is disabled for
//! the module to keep the generated implementations warning-free.

use std::path::{Path, PathBuf};

/// Unified error type returned by the compose loader, the Makefile writer and
/// the CLI.
///
/// Loader failures are split into three classes: the file could not be read
/// ([`Error::Io`]), the contents are not YAML ([`Error::Parse`]), or the YAML
/// does not declare a usable `services` section ([`Error::Schema`]). None of
/// them is retried; the caller decides how to report them.
#[derive(Debug, masterror::Error)]
pub enum Error {
    /// Wraps I/O errors that occur while reading the compose file.
    #[error("failed to read compose file {path:?}: {source}")]
    Io {
        /// Location of the compose file.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Wraps YAML decoding errors.
    #[error("the file is not a valid YAML file: {source}")]
    Parse {
        /// Source decoding error from serde_yaml.
        source: serde_yaml::Error
    },
    /// Returned when the document is valid YAML but has no usable services.
    #[error("invalid compose file: {message}")]
    Schema {
        /// Human readable message describing the schema problem.
        message: String
    },
    /// Wraps I/O errors that occur while writing the generated Makefile.
    #[error("failed to write Makefile at {path:?}: {source}")]
    Write {
        /// Destination of the generated Makefile.
        path:   PathBuf,
        /// Underlying I/O error reported by the operating system.
        source: std::io::Error
    },
    /// Wraps terminal I/O errors raised by the overwrite confirmation.
    #[error("failed to read confirmation: {source}")]
    Prompt {
        /// Underlying I/O error.
        source: std::io::Error
    },
    /// Returned when command-line preconditions are not met.
    #[error("{message}")]
    Validation {
        /// Human readable message describing the validation problem.
        message: String
    }
}

impl Error {
    /// Constructs a schema error from the provided message.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the schema violation.
    pub fn schema<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Schema {
            message: message.into()
        }
    }

    /// Constructs a validation error from the provided message.
    ///
    /// # Parameters
    ///
    /// * `message` - Human-readable description of the validation failure.
    pub fn validation<M>(message: M) -> Self
    where
        M: Into<String>
    {
        Self::Validation {
            message: message.into()
        }
    }

    /// Formats the error for diagnostics without the variant name.
    ///
    /// The returned string matches the [`std::fmt::Display`] implementation
    /// and is what the CLI prints to stderr.
    pub fn to_display_string(&self) -> String {
        format!("{self}")
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(source: serde_yaml::Error) -> Self {
        Self::Parse {
            source
        }
    }
}

/// Creates an [`Error::Io`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Location of the compose file that triggered the error.
/// * `source` - I/O error reported by the operating system.
pub fn io_error(path: &Path, source: std::io::Error) -> Error {
    Error::Io {
        path: path.to_path_buf(),
        source
    }
}

/// Creates an [`Error::Write`] variant capturing the failing path and source.
///
/// # Parameters
///
/// * `path` - Destination of the Makefile that could not be written.
/// * `source` - I/O error reported by the operating system.
pub fn write_error(path: &Path, source: std::io::Error) -> Error {
    Error::Write {
        path: path.to_path_buf(),
        source
    }
}
