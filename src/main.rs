// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Command-line interface for the makefy binary.
//!
//! The CLI validates the compose file, renders the Makefile, asks before
//! replacing an existing one, and only then writes it.

use std::{
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
    process
};

use clap::{ArgAction, Parser, error::ErrorKind};
use makefy::{
    DEFAULT_OUTPUT, Error, GeneratedFile, confirm_overwrite, init_logging, load_services,
    write_makefile
};
use tracing::{debug, info};

/// Command line interface for generating a Makefile from a compose file.
#[derive(Debug, Parser)]
#[command(
    name = "makefy",
    version,
    about = "Generate a Makefile with per-service targets from a Docker Compose file"
)]
struct Cli {
    /// Path to the Docker Compose file.
    #[arg(value_name = "COMPOSE_FILE")]
    compose_file: PathBuf,

    /// Overwrite an existing Makefile without asking.
    #[arg(short = 'f', long = "force", action = ArgAction::SetTrue)]
    force: bool,

    /// Destination of the generated Makefile.
    #[arg(
        short = 'o',
        long = "output",
        value_name = "PATH",
        env = "MAKEFY_OUTPUT",
        default_value = DEFAULT_OUTPUT
    )]
    output: PathBuf,

    /// Print the Makefile to stdout instead of writing it.
    #[arg(long = "stdout", action = ArgAction::SetTrue)]
    stdout: bool,

    /// Enable debug logging on stderr.
    #[arg(short = 'v', long = "verbose", action = ArgAction::SetTrue)]
    verbose: bool
}

/// How a successful run ended.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    /// The Makefile was written to the given path.
    Written(PathBuf),
    /// The Makefile was printed to stdout.
    Printed,
    /// The user declined to overwrite the existing file.
    Aborted(PathBuf)
}

/// Entry point that reports errors and sets the appropriate exit status.
fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(error) => {
            let code = usage_exit_code(&error);
            let _ = error.print();
            process::exit(code);
        }
    };

    init_logging(cli.verbose);

    let stdin = io::stdin();
    let stdout = io::stdout();
    match run(&cli, stdin.lock(), stdout.lock()) {
        Ok(Outcome::Written(path)) => println!("{} generated successfully.", path.display()),
        Ok(Outcome::Printed) => {}
        Ok(Outcome::Aborted(path)) => {
            println!("Operation aborted. {} was not overwritten.", path.display());
        }
        Err(error) => {
            eprintln!("Error: {}", error.to_display_string());
            if matches!(error, Error::Io { .. } | Error::Parse { .. } | Error::Schema { .. }) {
                eprintln!("Error: Failed to generate Makefile due to invalid compose file.");
            }
            process::exit(1);
        }
    }
}

/// Exit status for a command line clap refused to parse.
///
/// `--help` and `--version` succeed; every usage error, including a missing
/// compose file argument, exits with 1 rather than clap's default of 2.
fn usage_exit_code(error: &clap::Error) -> i32 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1
    }
}

/// Executes one generation run.
///
/// `input` and `output` back the overwrite prompt and `--stdout`.
///
/// # Errors
///
/// Returns [`Error::Validation`] when the compose file does not exist, and
/// propagates loader, prompt and write errors. Nothing is written unless the
/// compose file loaded successfully.
fn run<R, W>(cli: &Cli, input: R, mut output: W) -> Result<Outcome, Error>
where
    R: BufRead,
    W: Write
{
    if !cli.compose_file.is_file() {
        return Err(Error::validation(format!(
            "File {} does not exist.",
            cli.compose_file.display()
        )));
    }

    let services = load_services(&cli.compose_file)?;
    info!("Loaded {} services from {}", services.len(), cli.compose_file.display());
    let makefile = GeneratedFile::new(&cli.compose_file, &services);
    debug!(
        "Rendering {} targets for {}",
        makefile.targets().len(),
        makefile.compose_file()
    );
    let contents = makefile.render();

    if cli.stdout {
        output
            .write_all(contents.as_bytes())
            .and_then(|()| output.flush())
            .map_err(|source| makefy::write_error(Path::new("<stdout>"), source))?;
        return Ok(Outcome::Printed);
    }

    if cli.output.exists() && !cli.force {
        debug!("{} exists; asking before overwriting", cli.output.display());
        if !confirm_overwrite(input, &mut output, &cli.output)? {
            return Ok(Outcome::Aborted(cli.output.clone()));
        }
    }

    write_makefile(&cli.output, &contents)?;
    Ok(Outcome::Written(cli.output.clone()))
}

#[cfg(test)]
mod tests {
    use std::{fs, io::Cursor, path::Path};

    use clap::{Parser, error::ErrorKind};
    use tempfile::{TempDir, tempdir};

    use super::{Cli, Outcome, run, usage_exit_code};

    const COMPOSE: &str = "services:\n  web:\n    build: .\n  db:\n    image: postgres\n";

    fn workspace(compose: &str) -> (TempDir, Cli) {
        let temp = tempdir().expect("failed to create tempdir");
        let compose_path = temp.path().join("docker-compose.yml");
        fs::write(&compose_path, compose).expect("failed to write compose file");
        let output = temp.path().join("Makefile");

        let cli = Cli::try_parse_from([
            env!("CARGO_PKG_NAME"),
            compose_path.to_str().expect("utf8"),
            "--output",
            output.to_str().expect("utf8"),
        ])
        .expect("failed to parse CLI");

        (temp, cli)
    }

    fn run_with(cli: &Cli, answers: &str) -> (Result<Outcome, makefy::Error>, String) {
        let mut transcript = Vec::new();
        let result = run(cli, Cursor::new(answers.to_owned()), &mut transcript);
        (result, String::from_utf8(transcript).expect("invalid UTF-8"))
    }

    #[test]
    fn cli_requires_compose_file() {
        let error = Cli::try_parse_from([env!("CARGO_PKG_NAME")]).expect_err("expected usage error");
        assert_eq!(error.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn usage_errors_exit_with_one() {
        let missing = Cli::try_parse_from([env!("CARGO_PKG_NAME")]).expect_err("expected usage error");
        assert_eq!(usage_exit_code(&missing), 1);

        let unknown = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "compose.yml", "--bogus"])
            .expect_err("expected usage error");
        assert_eq!(usage_exit_code(&unknown), 1);
    }

    #[test]
    fn help_and_version_exit_with_zero() {
        for flag in ["--help", "--version"] {
            let error = Cli::try_parse_from([env!("CARGO_PKG_NAME"), flag]).expect_err("expected display request");
            assert_eq!(usage_exit_code(&error), 0, "{flag}");
        }
    }

    #[test]
    fn cli_defaults_to_makefile_in_current_directory() {
        let cli = Cli::try_parse_from([env!("CARGO_PKG_NAME"), "compose.yml", "--force"])
            .expect("failed to parse CLI");

        assert_eq!(cli.compose_file, Path::new("compose.yml"));
        assert!(cli.force);
        assert!(!cli.stdout);
        if std::env::var_os("MAKEFY_OUTPUT").is_none() {
            assert_eq!(cli.output, Path::new("Makefile"));
        }
    }

    #[test]
    fn writes_makefile_for_declared_services() {
        let (_temp, cli) = workspace(COMPOSE);

        let (result, transcript) = run_with(&cli, "");
        assert_eq!(result.expect("run failed"), Outcome::Written(cli.output.clone()));
        assert!(transcript.is_empty());

        let makefile = fs::read_to_string(&cli.output).expect("missing Makefile");
        let header = format!("COMPOSE_FILE={}\n", cli.compose_file.display());
        assert!(makefile.contains(&header));
        assert!(makefile.contains("web-build:\n"));
        assert!(makefile.contains("db-clean:\n"));
    }

    #[test]
    fn missing_compose_file_is_reported() {
        let (temp, mut cli) = workspace(COMPOSE);
        cli.compose_file = temp.path().join("absent.yml");

        let (result, _) = run_with(&cli, "");
        match result.expect_err("expected validation error") {
            makefy::Error::Validation {
                message
            } => assert!(message.ends_with("absent.yml does not exist.")),
            other => panic!("unexpected error variant: {other:?}")
        }
        assert!(!cli.output.exists());
    }

    #[test]
    fn schema_error_leaves_existing_makefile_untouched() {
        let (_temp, cli) = workspace("version: '3'\n");
        fs::write(&cli.output, "keep: \n\ttrue\n").expect("failed to seed Makefile");

        let (result, transcript) = run_with(&cli, "y\n");
        assert!(matches!(result, Err(makefy::Error::Schema { .. })));
        assert!(transcript.is_empty());
        assert_eq!(fs::read_to_string(&cli.output).expect("read failed"), "keep: \n\ttrue\n");
    }

    #[test]
    fn parse_error_writes_nothing() {
        let (_temp, cli) = workspace("services: [web\n");

        let (result, _) = run_with(&cli, "");
        assert!(matches!(result, Err(makefy::Error::Parse { .. })));
        assert!(!cli.output.exists());
    }

    #[test]
    fn declined_overwrite_keeps_previous_content() {
        let (_temp, cli) = workspace(COMPOSE);
        fs::write(&cli.output, "old:\n").expect("failed to seed Makefile");

        let (result, transcript) = run_with(&cli, "maybe\nn\n");
        assert_eq!(result.expect("run failed"), Outcome::Aborted(cli.output.clone()));
        assert!(transcript.contains("Invalid response"));
        assert_eq!(fs::read_to_string(&cli.output).expect("read failed"), "old:\n");
    }

    #[test]
    fn confirmed_overwrite_replaces_content() {
        let (_temp, cli) = workspace(COMPOSE);
        fs::write(&cli.output, "old:\n").expect("failed to seed Makefile");

        let (result, _) = run_with(&cli, "yes\n");
        assert_eq!(result.expect("run failed"), Outcome::Written(cli.output.clone()));
        assert!(fs::read_to_string(&cli.output).expect("read failed").contains("web-up:\n"));
    }

    #[test]
    fn force_skips_the_prompt() {
        let (_temp, mut cli) = workspace(COMPOSE);
        cli.force = true;
        fs::write(&cli.output, "old:\n").expect("failed to seed Makefile");

        let (result, transcript) = run_with(&cli, "");
        assert_eq!(result.expect("run failed"), Outcome::Written(cli.output.clone()));
        assert!(transcript.is_empty());
    }

    #[test]
    fn stdout_mode_prints_without_writing() {
        let (_temp, mut cli) = workspace(COMPOSE);
        cli.stdout = true;

        let (result, transcript) = run_with(&cli, "");
        assert_eq!(result.expect("run failed"), Outcome::Printed);
        assert!(transcript.starts_with("# Makefile for Docker Compose management\n"));
        assert!(!cli.output.exists());
    }
}
