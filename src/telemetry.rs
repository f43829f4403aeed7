use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output for
/// this crate and `level` (from config) applies.
pub fn init(verbose: bool, level: Option<&str>) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directive = if verbose {
                "kite_resale=debug"
            } else {
                level.unwrap_or("warn")
            };
            EnvFilter::try_new(directive)
                .map_err(|e| anyhow!("invalid log level/filter '{}': {}", directive, e))?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}
