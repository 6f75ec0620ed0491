//! Diagnostic logging setup
//!
//! User-facing status lines are printed by the CLI with colors; retries,
//! skipped pages and HTTP details go through the `log` facade.

use chrono::Local;
use env_logger::{Builder, Env};
use log::LevelFilter;
use std::io::Write;

/// Initialize the global logger. `RUST_LOG` takes precedence over `verbose`.
pub fn init(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Info
    } else {
        LevelFilter::Warn
    };

    let mut builder = Builder::new();
    builder
        .format(|buf, record| {
            writeln!(
                buf,
                "{} [{}] - {}",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.args()
            )
        })
        .filter(None, default_level)
        .parse_env(Env::default());

    // A second init (e.g. from tests) is harmless
    let _ = builder.try_init();
}
