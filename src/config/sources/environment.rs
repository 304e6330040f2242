//! Environment variable source: FOLIO_* prefix with __ separator

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Add environment variable overlay to builder.
/// `FOLIO__WATCH__DEBOUNCE_MS=250` sets `watch.debounce_ms`.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder.add_source(
        Environment::with_prefix("FOLIO")
            .separator("__")
            .try_parsing(true),
    );
    Ok(builder)
}
