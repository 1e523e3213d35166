//! obpc: the obpath driver.
//!
//! Library half of the `obp` binary: the JSON adapter between
//! `serde_json` documents and [`obpath::Value`], and the `filter` and
//! `golden` commands.

pub mod commands;
pub mod json;

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber, once, if `RUST_LOG` is set.
///
/// Logs go to stderr so they never mix with matches on stdout.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_target(true)
                        .with_level(true),
                )
                .with(filter)
                .init();
        }
    });
}
