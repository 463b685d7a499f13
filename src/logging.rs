use tracing_subscriber::EnvFilter;

/// Installs the global `fmt` subscriber for the binaries. `RUST_LOG` wins
/// over `default_level`; an invalid directive falls back to `info`.
/// Calling it twice is harmless.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
