use tracing_subscriber::{fmt, EnvFilter};

/// Installs the fmt subscriber, honouring `RUST_LOG` and falling back to `info`.
pub fn init_logging() {
    init_logging_with("info");
}

/// Same as [`init_logging`] with a caller-chosen fallback directive.
/// `RUST_LOG` still wins when set.
pub fn init_logging_with(default_directive: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .try_init();
}
