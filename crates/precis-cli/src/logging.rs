use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber. `RUST_LOG` wins over the given level.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let result = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
    if let Err(err) = result {
        eprintln!("logging init failed: {err}");
    }
}

/// Pick the effective level from the verbose flag and the configured level.
pub fn effective_level(verbose: bool, configured: &str) -> &str {
    if verbose { "debug" } else { configured }
}
