//! Diagnostic logging setup.

use std::io;

use tracing_subscriber::{EnvFilter, fmt};

/// Maps the `-v` count to a default filter directive.
fn default_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` overrides the level chosen by `verbose`.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("warning: logging already initialized: {e}");
    }
}
