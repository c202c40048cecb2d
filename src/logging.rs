use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Filter comes from `RUST_LOG`, falling back
/// to `default_filter`. Output goes to stderr so stdout stays parseable.
pub fn init(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
