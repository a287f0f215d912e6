use std::collections::HashMap;
use std::error::Error;

use config::{Config, Environment, File};
use eyre::{Result, WrapErr};
use serde::de::DeserializeOwned;
use tracing::debug;

/// Load a settings object from the config files listed in `CONFIG_FILES`
/// and from `env`, in that order of precedence.
/// Further documentation can be found in the `settings` module.
pub(crate) fn load_settings_object<T>(prefix: &str, env: HashMap<String, String>) -> Result<T>
where
    T: DeserializeOwned,
{
    let prefix = prefix.to_ascii_uppercase();

    // Load a set of additional user specified config files
    let config_file_paths: Vec<String> = env
        .get("CONFIG_FILES")
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let builder = config_file_paths
        .iter()
        .fold(Config::builder(), |builder, path| {
            builder.add_source(File::with_name(path))
        });

    let config_deserializer = builder
        .add_source(
            Environment::with_prefix(&prefix)
                .separator("_")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("exclude")
                .source(Some(env)),
        )
        .build()
        .wrap_err("Failed to assemble configuration sources")?;

    debug!(files = ?config_file_paths, "Loaded configuration sources");

    match config_deserializer.try_deserialize::<T>() {
        Ok(cfg) => Ok(cfg),
        Err(err) => {
            let mut err = if let Some(source_err) = err.source() {
                let source = format!("Config error source: {source_err}");
                Err(err).wrap_err(source)
            } else {
                Err(err.into())
            };

            for cfg_path in config_file_paths.iter() {
                err = err.wrap_err_with(|| format!("Config loaded: {cfg_path}"));
            }

            err.wrap_err("Config deserialization error, please check the purger settings")
        }
    }
}
