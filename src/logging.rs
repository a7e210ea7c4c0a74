use tracing_subscriber::EnvFilter;

/// Filter directive to log with.
///
/// `-v`/`-vv` win; otherwise `RUST_LOG` if set, otherwise the configured
/// level.
pub fn directive(env: Option<&str>, configured: &str, verbose: u8) -> String {
    match verbose {
        0 => env.filter(|value| !value.trim().is_empty()).unwrap_or(configured).to_string(),
        1 => "info".to_string(),
        _ => "debug".to_string(),
    }
}

/// Install the global subscriber, writing to stderr so command output on
/// stdout stays clean.
pub fn init(configured: &str, verbose: u8) {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let directive = directive(env.as_deref(), configured, verbose);
    let filter = EnvFilter::try_new(&directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    tracing::debug!(%directive, "Logging initialised");
}
