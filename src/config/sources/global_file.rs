//! Global config file: $XDG_CONFIG_HOME/folio/config.toml

use crate::config::xdg;
use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File};
use tracing::debug;

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let path = match xdg::config_home() {
        Ok(home) => home.join("folio").join("config.toml"),
        Err(e) => {
            debug!("Skipping global config: {}", e);
            return Ok(builder);
        }
    };
    Ok(builder.add_source(File::from(path).required(false)))
}
