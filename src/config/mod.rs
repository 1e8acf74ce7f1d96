mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{LoggingSettings, RelaySettings, ServerSettings, Settings};

/// Prefix for environment overrides, e.g. `WSRELAY__SERVER__PORT=9000`.
pub const ENV_PREFIX: &str = "WSRELAY";

/// Loads the configuration from `config/default` (any format the `config`
/// crate understands, optional) and `WSRELAY__*` environment variables,
/// merged over `Settings::default()`.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from("config/default")
}

/// Same as `load_config`, reading the file source from `path` (extension
/// optional).
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.merge(Settings::default()))
}

#[cfg(test)]
mod tests;
