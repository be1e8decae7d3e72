//! Local TOTP credential manager.
//!
//! Credentials live in a JSON file; codes are derived on demand from the
//! wall clock (RFC 6238, HMAC-SHA1).

pub mod clipboard;
pub mod config;
pub mod error;
pub mod qrcode;
pub mod store;
pub mod totp;

/// Initialize logging to stderr.
///
/// Only warnings are shown unless `verbose` is set.
pub fn init_logging(verbose: bool) -> std::result::Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(level)
        .try_init()?;

    Ok(())
}
