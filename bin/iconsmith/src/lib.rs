//! iconsmith CLI Library
//!
//! Command implementations for the iconsmith binary, exposed as a library so
//! they can be driven from tests and other tools.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (build, check)
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//!
//! use iconsmith::cmd;
//!
//! // Build the dark theme without running the font compiler
//! cmd::build::run(&[PathBuf::from("config_dark.json")], None, false, false).unwrap();
//! ```

pub mod cmd;

// Re-export core types for convenience
pub use iconsmith_core::{Codepoint, Config, Theme};
pub use iconsmith_generator::{BuildStats, Builder, Preprocessor, Templates};

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// Skipped icons are logged at WARN, so they show up at the default level.
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
