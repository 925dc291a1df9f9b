//! Process-wide log output
//!
//! Plain-text lines on stderr at INFO. When the host process already installed
//! a global `tracing` subscriber that one is kept.

use tracing::Level;

pub fn init_logging() {
    let installed = tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();

    if installed.is_err() {
        tracing::debug!("Global tracing subscriber already set, keeping it");
    }
}
