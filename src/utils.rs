use std::error::Error;

use dotenv::dotenv;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::constant::DEFAULT_LOG_FILTER;

/// Initialize tracing and environment.
///
/// Logs go to stderr so they never interleave with the menu on stdout.
/// `RUST_LOG` overrides the default `warn` filter.
pub fn init_tracing_and_env() -> Result<(), Box<dyn Error>> {
    dotenv().ok();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_span_events(fmt::format::FmtSpan::CLOSE),
        )
        .try_init()?;
    Ok(())
}
