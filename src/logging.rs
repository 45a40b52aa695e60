use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "CYANO_LOG";
const DEFAULT_LOG_FILTER: &str = "cyano_build=info";

/// Installs the stderr subscriber. `CYANO_LOG` overrides the filter;
/// `verbose` raises the default to debug.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "cyano_build=debug"
    } else {
        DEFAULT_LOG_FILTER
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
