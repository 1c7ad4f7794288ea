use tracing_subscriber::EnvFilter;

use crate::config::LogFlags;

/// Filter used when `RUST_LOG` is not set.
pub fn default_directive(flags: LogFlags) -> &'static str {
    match flags {
        LogFlags { debug: true, .. } => "debug",
        LogFlags { error: true, .. } => "error",
        _ => "info",
    }
}

pub fn env_filter(flags: LogFlags) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(flags)))
}

pub fn init(flags: LogFlags) -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(flags))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
