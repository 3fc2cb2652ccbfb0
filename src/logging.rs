// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Diagnostic logging setup for the CLI.
//!
//! Library code only emits `tracing` events. The binary installs a compact
//! formatter on stderr so that stdout stays reserved for generated output.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter applied when `RUST_LOG` is unset.
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose { "makefy=debug" } else { "makefy=warn" }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence; otherwise [`default_filter`] decides the
/// level. Calling this more than once keeps the first subscriber.
pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact()
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_switches_to_debug() {
        assert_eq!(default_filter(true), "makefy=debug");
        assert_eq!(default_filter(false), "makefy=warn");
    }

    #[test]
    fn repeated_initialization_is_harmless() {
        init_logging(false);
        init_logging(true);
        tracing::debug!("still running");
    }
}
