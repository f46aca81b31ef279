use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber so stdout stays machine-readable.
///
/// Records emitted through the `log` facade by the core crate are
/// forwarded to the same subscriber.
pub fn init_tracing(directive: &str) {
    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
