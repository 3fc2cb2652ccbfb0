// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
//
// SPDX-License-Identifier: MIT

//! Generate a Makefile from a Docker Compose file.
//!
//! The library reads the service names declared under a compose file's
//! `services` section and renders a Makefile with aggregate targets
//! (`build-all`, `up-all`, `clean-all`, ...) and six targets per service
//! (`<service>-build`, `<service>-up`, ...). Loading, rendering and writing
//! are separate steps so that nothing touches the output file until the
//! compose file has been validated and the Makefile fully rendered.
//!
//! ```
//! use std::path::Path;
//!
//! use makefy::{generate, parse_services};
//!
//! let services = parse_services("services:\n  web: {}\n  db: {}\n").expect("valid compose");
//! let makefile = generate(Path::new("docker-compose.yml"), &services);
//! assert!(makefile.contains("db-clean:\n"));
//! ```

mod compose;
mod error;
mod logging;
mod makefile;
mod prompt;

pub use compose::{ComposeDocument, ServiceName, load_services, parse_services};
pub use error::{Error, io_error, write_error};
pub use logging::{default_filter, init_logging};
pub use makefile::{
    COMPOSE_FILE_VAR, DEFAULT_OUTPUT, GeneratedFile, HELP_TARGET, Operation, Target, generate,
    write_makefile
};
pub use prompt::confirm_overwrite;
