//! Shared setup for the weft demos.

use tracing_subscriber::EnvFilter;
use weft::EngineConfig;

/// Applies `.env` and the XDG config, installs a `RUST_LOG` subscriber and reads
/// the engine settings.
pub fn init() -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let applied = env_config::load_and_apply("weft", None)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("weft=info")),
        )
        .with_target(false)
        .init();
    for (key, source) in &applied.keys {
        tracing::debug!(key = %key, source = ?source, "Config key applied");
    }
    Ok(EngineConfig::from_env()?)
}

/// First CLI argument, or `default`.
pub fn input_or(default: &str) -> String {
    std::env::args()
        .nth(1)
        .unwrap_or_else(|| default.to_string())
}
