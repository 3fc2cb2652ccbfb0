// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Interactive overwrite confirmation.
//!
//! The prompt is generic over its reader and writer so the CLI can drive it
//! with the terminal while tests feed scripted answers.

use std::{
    io::{BufRead, Write},
    path::Path
};

use tracing::debug;

use crate::error::Error;

/// Answer given to the overwrite question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Answer {
    Yes,
    No
}

fn parse_answer(input: &str) -> Option<Answer> {
    match input.trim().to_lowercase().as_str() {
        "y" | "yes" => Some(Answer::Yes),
        "n" | "no" => Some(Answer::No),
        _ => None
    }
}

/// Asks whether the existing file at `path` may be overwritten.
///
/// The question is repeated until the answer is an unambiguous yes (`y`,
/// `yes`) or no (`n`, `no`), compared case-insensitively. Reaching the end of
/// `input` counts as a refusal.
///
/// # Errors
///
/// Returns [`Error::Prompt`](Error::Prompt) when reading the answer or writing
/// the question fails.
///
/// # Example
///
/// ```
/// use std::{io::Cursor, path::Path};
///
/// use makefy::confirm_overwrite;
///
/// let mut output = Vec::new();
/// let confirmed = confirm_overwrite(Cursor::new("maybe\nY\n"), &mut output, Path::new("Makefile"))
///     .expect("prompt failed");
/// assert!(confirmed);
/// ```
pub fn confirm_overwrite<R, W>(mut input: R, mut output: W, path: &Path) -> Result<bool, Error>
where
    R: BufRead,
    W: Write
{
    let mut line = String::new();
    loop {
        write!(
            output,
            "{} already exists. Do you want to overwrite it? (y/n): ",
            path.display()
        )
        .and_then(|()| output.flush())
        .map_err(prompt_error)?;

        line.clear();
        if input.read_line(&mut line).map_err(prompt_error)? == 0 {
            debug!("Confirmation input closed; treating as refusal");
            writeln!(output).map_err(prompt_error)?;
            return Ok(false);
        }

        match parse_answer(&line) {
            Some(answer) => return Ok(answer == Answer::Yes),
            None => {
                writeln!(output, "Invalid response. Please enter 'y' or 'n'.").map_err(prompt_error)?;
            }
        }
    }
}

fn prompt_error(source: std::io::Error) -> Error {
    Error::Prompt {
        source
    }
}
