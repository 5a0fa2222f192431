use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_DIRECTIVE: &str = "torneos_etl=info";

/// Console logging; `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
