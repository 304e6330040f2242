//! Built-in defaults, the lowest layer of every merge.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError};

/// Builder seeded with the built-in defaults.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("logging.enabled", true)?
        .set_default("logging.level", "info")?
        .set_default("logging.format", "text")?
        .set_default("logging.output", "stderr")?
        .set_default("logging.color", true)?
        .set_default("storage.state_path", ".folio/state")?
        .set_default("watch.debounce_ms", 100)?
        .set_default("watch.batch_window_ms", 50)?
        .set_default("watch.max_batch_size", 100)
}
