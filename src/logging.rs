// In: src/logging.rs

//! Opt-in log output for embedding applications and debugging sessions.
//!
//! The codec itself only talks to the `log` facade. Nothing is printed until a
//! caller installs a logger, either their own or the one set up here.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Once;

use log::LevelFilter;

use crate::error::PaxError;

static INIT_LOGGER: Once = Once::new();

/// Installs an `env_logger` that prints `[LEVEL] message` lines at `Info` and above.
///
/// `RUST_LOG` still overrides the level. With `log_file` set, output is
/// appended to that file instead of stderr. Only the first call has any
/// effect; later calls return `Ok(())` without touching the installed logger.
pub fn enable_verbose_logging(log_file: Option<&Path>) -> Result<(), PaxError> {
    // Open the file up front so a bad path is reported instead of swallowed.
    let file = match log_file {
        Some(path) => Some(OpenOptions::new().append(true).create(true).open(path)?),
        None => None,
    };

    INIT_LOGGER.call_once(|| {
        let mut builder = env_logger::Builder::new();

        builder.is_test(false);
        builder.filter_level(LevelFilter::Info);
        builder.parse_default_env();

        builder.format(|buf, record| {
            use std::io::Write;
            writeln!(buf, "[{}] {}", record.level(), record.args())?;
            buf.flush()?;
            Ok(())
        });

        if let Some(file) = file {
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        // Another logger may already be installed by the host application.
        let _ = builder.try_init();
    });
    Ok(())
}
