// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Makefile generation.
//!
//! The generator turns an ordered list of services into a Makefile made of a
//! `help` target, six aggregate targets that act on the whole compose file,
//! and six targets per service. Rendering is pure string templating: the same
//! input always yields byte-identical output. Writing happens in a separate
//! step so callers can render, inspect, and only then touch the filesystem.

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf}
};

use tracing::{debug, info};

use crate::{
    compose::ServiceName,
    error::{self, Error}
};

/// Make variable holding the compose file path.
pub const COMPOSE_FILE_VAR: &str = "COMPOSE_FILE";
/// File name written when no explicit output path is supplied.
pub const DEFAULT_OUTPUT: &str = "Makefile";
/// Name of the help target, which is also the default goal.
pub const HELP_TARGET: &str = "help";

const VOLUME_PRUNE: &str = "docker volume prune -f";
const SYSTEM_PRUNE: &str = "docker system prune -f";
const IMAGE_PRUNE: &str = "docker image prune -f";

/// `docker compose` invocation shared by every recipe.
///
/// The variable is single-quoted so the shell passes the path through as one
/// word; [`assignment_value`] escapes the value to match.
fn compose_command() -> String {
    format!("docker compose -f '$({COMPOSE_FILE_VAR})'")
}

/// Escapes `path` for the right-hand side of the `COMPOSE_FILE` assignment.
///
/// Single quotes are closed, escaped and reopened (`'\''`) because the
/// recipes wrap the variable in single quotes. Then `$` becomes `$$` and `#`
/// becomes `\#` so make neither expands nor truncates the value.
fn assignment_value(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for character in path.chars() {
        match character {
            '\'' => escaped.push_str("'\\''"),
            '$' => escaped.push_str("$$"),
            '#' => escaped.push_str("\\#"),
            other => escaped.push(other)
        }
    }
    escaped
}

/// Lifecycle operation available both for all services and per service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Build images using the layer cache.
    Build,
    /// Build images without the layer cache.
    Rebuild,
    /// Start containers in the background.
    Up,
    /// Stop and remove containers.
    Down,
    /// Remove containers together with networks and images.
    Prune,
    /// Remove volumes, then prune dangling volumes and unused resources.
    Clean
}

impl Operation {
    /// Every operation in the order targets are emitted.
    pub const ALL: [Self; 6] = [
        Self::Build,
        Self::Rebuild,
        Self::Up,
        Self::Down,
        Self::Prune,
        Self::Clean
    ];

    /// Suffix shared by the aggregate and per-service target names.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Build => "build",
            Self::Rebuild => "rebuild",
            Self::Up => "up",
            Self::Down => "down",
            Self::Prune => "prune",
            Self::Clean => "clean"
        }
    }

    /// Name of the target acting on every service, e.g. `build-all`.
    pub fn aggregate_target(self) -> String {
        format!("{}-all", self.suffix())
    }

    /// Name of the target acting on `service`, e.g. `web-build`.
    pub fn service_target(self, service: &ServiceName) -> String {
        format!("{service}-{}", self.suffix())
    }

    fn summary(self) -> &'static str {
        match self {
            Self::Build => "Build all services using cache",
            Self::Rebuild => "Rebuild all services without cache",
            Self::Up => "Start all services in the background",
            Self::Down => "Stop and remove all containers",
            Self::Prune => "Remove all containers, networks, and images",
            Self::Clean => "Remove all volumes and data"
        }
    }

    fn aggregate_comment(self) -> &'static str {
        match self {
            Self::Build => "Build all services with cache",
            Self::Rebuild => "Rebuild all services without cache",
            Self::Up => "Start all services in detached mode",
            Self::Down => "Bring down all containers and remove them",
            Self::Prune => "Remove all containers, networks, and images",
            Self::Clean => "Clean up all volumes and containers"
        }
    }

    fn aggregate_recipe(self) -> Vec<String> {
        let compose = compose_command();
        match self {
            Self::Build => vec![format!("{compose} build")],
            Self::Rebuild => vec![format!("{compose} build --no-cache")],
            Self::Up => vec![format!("{compose} up -d")],
            Self::Down => vec![format!("{compose} down")],
            Self::Prune => vec![format!("{compose} down --volumes --rmi all")],
            Self::Clean => vec![
                format!("{compose} down --volumes"),
                VOLUME_PRUNE.to_owned(),
                SYSTEM_PRUNE.to_owned(),
            ]
        }
    }

    fn service_recipe(self, service: &ServiceName) -> Vec<String> {
        let compose = compose_command();
        match self {
            Self::Build => vec![format!("{compose} build {service}")],
            Self::Rebuild => vec![format!("{compose} build --no-cache {service}")],
            Self::Up => vec![format!("{compose} up -d {service}")],
            Self::Down => vec![format!("{compose} down {service}")],
            Self::Prune => vec![
                format!("{compose} rm -f -s -v {service}"),
                IMAGE_PRUNE.to_owned(),
            ],
            Self::Clean => vec![
                format!("{compose} down --volumes {service}"),
                VOLUME_PRUNE.to_owned(),
                SYSTEM_PRUNE.to_owned(),
            ]
        }
    }
}

/// A single Makefile rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Rule name as it appears before the colon.
    pub name:    String,
    /// Optional comment line emitted above the rule.
    pub comment: Option<String>,
    /// Shell commands; each is rendered on its own tab-indented line.
    pub recipe:  Vec<String>
}

/// In-memory Makefile built from a compose file path and its services.
///
/// Targets are ordered: `help` first, then the aggregate targets, then six
/// targets per service in declaration order. Colliding names are kept as-is;
/// make resolves duplicates with its own rules.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use makefy::{GeneratedFile, ServiceName};
///
/// let services = [ServiceName::new("web"), ServiceName::new("db")];
/// let file = GeneratedFile::new(Path::new("docker-compose.yml"), &services);
/// assert_eq!(file.targets().len(), 1 + 6 + 12);
/// assert!(file.render().contains("web-build:\n"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    compose_file: String,
    targets:      Vec<Target>
}

impl GeneratedFile {
    /// Builds the target list for `services` declared in `source_path`.
    pub fn new(source_path: &Path, services: &[ServiceName]) -> Self {
        let mut targets = Vec::with_capacity(1 + Operation::ALL.len() * (services.len() + 1));
        targets.push(help_target());

        for operation in Operation::ALL {
            targets.push(Target {
                name:    operation.aggregate_target(),
                comment: Some(operation.aggregate_comment().to_owned()),
                recipe:  operation.aggregate_recipe()
            });
        }

        for service in services {
            for operation in Operation::ALL {
                let comment = (operation == Operation::Build).then(|| format!("Targets for {service}"));
                targets.push(Target {
                    name: operation.service_target(service),
                    comment,
                    recipe: operation.service_recipe(service)
                });
            }
        }

        Self {
            compose_file: source_path.display().to_string(),
            targets
        }
    }

    /// Compose file path the recipes refer to, before Makefile escaping.
    pub fn compose_file(&self) -> &str {
        &self.compose_file
    }

    /// Rules in emission order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    /// Names listed on the `.PHONY` line, one per rule, in emission order.
    pub fn phony_targets(&self) -> Vec<&str> {
        self.targets.iter().map(|target| target.name.as_str()).collect()
    }

    /// Renders the Makefile text.
    pub fn render(&self) -> String {
        use std::fmt::Write as _;

        let mut buffer = String::with_capacity(256 + self.targets.len() * 96);
        buffer.push_str("# Makefile for Docker Compose management\n");
        let _ = writeln!(buffer, "{COMPOSE_FILE_VAR}={}", assignment_value(self.compose_file()));
        buffer.push('\n');
        let _ = writeln!(buffer, ".PHONY: {}", self.phony_targets().join(" "));

        for target in &self.targets {
            buffer.push('\n');
            if let Some(comment) = &target.comment {
                let _ = writeln!(buffer, "# {comment}");
            }
            let _ = writeln!(buffer, "{}:", target.name);
            for line in &target.recipe {
                let _ = writeln!(buffer, "\t{line}");
            }
        }

        buffer
    }
}

/// Renders the Makefile for `services` declared in `source_path`.
///
/// Callers are expected to pass at least one service; the loader refuses
/// compose files without any.
///
/// # Examples
///
/// ```
/// use std::path::Path;
///
/// use makefy::{ServiceName, generate};
///
/// let makefile = generate(Path::new("compose.yml"), &[ServiceName::new("api")]);
/// assert!(makefile.contains("COMPOSE_FILE=compose.yml\n"));
/// assert!(makefile.contains("api-up:\n\tdocker compose -f '$(COMPOSE_FILE)' up -d api\n"));
/// ```
pub fn generate(source_path: &Path, services: &[ServiceName]) -> String {
    debug!(
        "Rendering Makefile for {} services from {}",
        services.len(),
        source_path.display()
    );
    GeneratedFile::new(source_path, services).render()
}

/// Writes `contents` to `output`, replacing any existing file.
///
/// The text is first written to a hidden sibling file and then renamed over
/// the destination, so an interrupted write never leaves a truncated Makefile
/// behind. When `output` is a symlink the file it points to is replaced and
/// the link is kept; the permissions of an existing file carry over to the
/// new one.
///
/// # Errors
///
/// Returns [`Error::Write`](Error::Write) when the temporary file cannot be
/// written or moved into place.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
///
/// use makefy::{ServiceName, generate, write_makefile};
///
/// # fn main() -> Result<(), makefy::Error> {
/// let contents = generate(Path::new("docker-compose.yml"), &[ServiceName::new("web")]);
/// write_makefile(Path::new("Makefile"), &contents)?;
/// # Ok(())
/// # }
/// ```
pub fn write_makefile(output: &Path, contents: &str) -> Result<(), Error> {
    let destination = resolve_destination(output);
    let staging = staging_path(&destination)?;
    debug!("Staging Makefile at {}", staging.display());

    if let Err(source) = write_file(&staging, contents) {
        let _ = fs::remove_file(&staging);
        return Err(error::write_error(output, source));
    }

    if let Ok(existing) = fs::metadata(&destination)
        && let Err(source) = fs::set_permissions(&staging, existing.permissions())
    {
        let _ = fs::remove_file(&staging);
        return Err(error::write_error(output, source));
    }

    if let Err(source) = fs::rename(&staging, &destination) {
        let _ = fs::remove_file(&staging);
        return Err(error::write_error(output, source));
    }

    info!("Wrote {} bytes to {}", contents.len(), output.display());
    Ok(())
}

/// Follows a symlinked `output` to the file it names. Dangling links and
/// regular paths are returned unchanged.
fn resolve_destination(output: &Path) -> PathBuf {
    match fs::symlink_metadata(output) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
            fs::canonicalize(output).unwrap_or_else(|_| output.to_path_buf())
        }
        _ => output.to_path_buf()
    }
}

fn write_file(path: &Path, contents: &str) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(contents.as_bytes())?;
    writer.flush()
}

fn staging_path(output: &Path) -> Result<PathBuf, Error> {
    let name = output.file_name().ok_or_else(|| {
        error::write_error(
            output,
            io::Error::new(io::ErrorKind::InvalidInput, "output path has no file name")
        )
    })?;

    let mut staging = name.to_os_string();
    staging.push(".makefy-tmp");
    let mut hidden = std::ffi::OsString::from(".");
    hidden.push(staging);
    Ok(output.with_file_name(hidden))
}

fn help_target() -> Target {
    let mut recipe = vec![echo("Available commands:")];
    recipe.push(echo(&help_line(HELP_TARGET, "Show this help message")));
    for operation in Operation::ALL {
        recipe.push(echo(&help_line(&operation.aggregate_target(), operation.summary())));
    }
    recipe.push(echo("Individual service targets:"));
    recipe.push(echo(&help_line(
        "<service>-<command>",
        "Run build, rebuild, up, down, prune, or clean for one service"
    )));

    Target {
        name: HELP_TARGET.to_owned(),
        comment: Some("Display help commands".to_owned()),
        recipe
    }
}

fn help_line(name: &str, summary: &str) -> String {
    format!("  {name:<20} : {summary}")
}

fn echo(text: &str) -> String {
    format!("@echo \"{text}\"")
}
