//! Tracing subscriber setup for applications embedding the SDK.

use tracing_subscriber::EnvFilter;

/// Install a formatted `tracing` subscriber writing to stderr
///
/// `RUST_LOG` takes precedence over `default_filter`. Returns `false` when a
/// global subscriber was already installed, in which case nothing changes.
pub fn init_tracing(default_filter: &str) -> bool {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(from_env.as_deref(), default_filter))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}

/// Pick the environment directive when it parses, the default otherwise
fn build_filter(from_env: Option<&str>, default_filter: &str) -> EnvFilter {
    from_env
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter))
}
