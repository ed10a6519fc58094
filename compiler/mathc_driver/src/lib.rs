//! mathc driver
//!
//! Loads a program tree handed over by a front end, runs name resolution,
//! lowers it to C and optionally compiles the result.

mod build;
mod config;
mod error;

use std::sync::Once;

pub use build::{compile, load_tree, BuildOutcome};
pub use config::{parse_args, parse_args_with_env, Command, Config, CC_VAR, OUTPUT_DIR_VAR, USAGE};
pub use error::DriverError;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for compiler logs.
///
/// Safe to call more than once. Enable with `RUST_LOG=debug` or
/// `RUST_LOG=mathc_codegen=trace`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{prelude::*, EnvFilter};
        use tracing_tree::HierarchicalLayer;

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(HierarchicalLayer::new(2).with_targets(true))
                .with(filter)
                .init();
        }
    });
}
