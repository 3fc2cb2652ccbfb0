// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Compose document loading.
//!
//! The loader only cares about one thing in a compose file: the names declared
//! under the top-level `services` mapping. The document is kept as a
//! [`serde_yaml::Value`] tree and inspected through type-checked accessors, so
//! every other field of the file is ignored without being modelled.

use std::{fmt, fs, path::Path};

use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::{self, Error};

/// Key of the top-level mapping that declares services.
const SERVICES_KEY: &str = "services";

/// Name of a single service declared in a compose file.
///
/// # Examples
///
/// ```
/// use makefy::ServiceName;
///
/// let name = ServiceName::new("web");
/// assert_eq!(name.as_str(), "web");
/// assert_eq!(name.to_string(), "web");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    /// Wraps the provided identifier.
    pub fn new<N>(name: N) -> Self
    where
        N: Into<String>
    {
        Self(name.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ServiceName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Parsed compose file.
///
/// The root value is any YAML node; accessors check the shape lazily and
/// report [`Error::Schema`] when it does not match what the generator needs.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeDocument {
    root: Value
}

impl ComposeDocument {
    /// Parses a compose document from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the text is not well-formed YAML.
    pub fn parse(contents: &str) -> Result<Self, Error> {
        let root: Value = serde_yaml::from_str(contents)?;
        Ok(Self {
            root
        })
    }

    /// Returns the root mapping of the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] when the root node is not a mapping.
    pub fn root(&self) -> Result<&Mapping, Error> {
        self.root.as_mapping().ok_or_else(|| {
            Error::schema(format!(
                "expected a mapping at the document root, found {}",
                kind_of(&self.root)
            ))
        })
    }

    /// Returns the `services` mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] when the root is not a mapping, the key is
    /// absent, or its value is not a mapping.
    pub fn services_mapping(&self) -> Result<&Mapping, Error> {
        let services = self
            .root()?
            .get(SERVICES_KEY)
            .ok_or_else(|| Error::schema("the file does not contain any services definition"))?;

        services.as_mapping().ok_or_else(|| {
            Error::schema(format!(
                "expected `{SERVICES_KEY}` to be a mapping, found {}",
                kind_of(services)
            ))
        })
    }

    /// Returns the declared service names in declaration order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Schema`] when the `services` section is missing,
    /// malformed, empty, or uses a key that is not a scalar.
    pub fn services(&self) -> Result<Vec<ServiceName>, Error> {
        let mapping = self.services_mapping()?;
        if mapping.is_empty() {
            return Err(Error::schema("compose file does not declare any services"));
        }

        mapping.keys().map(service_name).collect()
    }
}

/// Loads the service names declared in the compose file at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, [`Error::Parse`] when
/// it is not YAML, and [`Error::Schema`] when the `services` section is
/// missing, not a mapping, or empty.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use makefy::load_services;
///
/// # fn main() -> Result<(), makefy::Error> {
/// let services = load_services(Path::new("docker-compose.yml"))?;
/// for service in &services {
///     println!("{service}");
/// }
/// # Ok(())
/// # }
/// ```
pub fn load_services(path: &Path) -> Result<Vec<ServiceName>, Error> {
    debug!("Reading compose file from {}", path.display());
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    parse_services(&contents)
}

/// Parses service names from an in-memory compose document.
///
/// # Errors
///
/// Same as [`load_services`], minus the I/O failure.
pub fn parse_services(contents: &str) -> Result<Vec<ServiceName>, Error> {
    let document = ComposeDocument::parse(contents)?;
    let services = document.services()?;
    debug!("Found {} services", services.len());
    Ok(services)
}

fn service_name(key: &Value) -> Result<ServiceName, Error> {
    match key {
        Value::String(name) => Ok(ServiceName::new(name.as_str())),
        Value::Number(number) => Ok(ServiceName::new(number.to_string())),
        Value::Bool(flag) => Ok(ServiceName::new(flag.to_string())),
        other => Err(Error::schema(format!(
            "service names must be scalars, found {}",
            kind_of(other)
        )))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value"
    }
}
