use crate::domain::configuration::Configuration;
use crate::infrastructure::schema::SchemaRegistry;
use crate::infrastructure::validation::{ValidationErrors, validate};
use serde_yaml::{Mapping, Value};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{Dispatch, info, warn};

/// Why a configuration document was not used
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read configuration file {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse configuration: {0}")]
    Parse(serde_yaml::Error),
    #[error("configuration validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("configuration does not match the expected shape: {0}")]
    Shape(serde_yaml::Error),
}

impl Configuration {
    /// Parses, validates and merges a YAML document over the registry defaults
    pub fn from_yaml(text: &str, registry: &SchemaRegistry) -> Result<Self, ConfigError> {
        let document = match serde_yaml::from_str::<Value>(text).map_err(ConfigError::Parse)? {
            Value::Null => Value::Mapping(Mapping::new()),
            document => document,
        };
        validate(registry.schema(), &document)?;

        let merged = match &document {
            Value::Mapping(update) => merge(registry.defaults(), update),
            _ => registry.defaults().clone(),
        };
        serde_yaml::from_value(Value::Mapping(merged)).map_err(ConfigError::Shape)
    }
}

/// Overlays `update` on `base`, keeping only the keys `base` defines
///
/// Null or missing values in `update` keep the base value; nested mappings
/// are merged key by key.
pub fn merge(base: &Mapping, update: &Mapping) -> Mapping {
    base.iter()
        .map(|(key, default)| {
            let value = match (default, update.get(key)) {
                (_, None | Some(Value::Null)) => default.clone(),
                (Value::Mapping(nested_base), Some(Value::Mapping(nested_update))) => {
                    Value::Mapping(merge(nested_base, nested_update))
                }
                (_, Some(overriding)) => overriding.clone(),
            };
            (key.clone(), value)
        })
        .collect()
}

/// Produces the configuration the process runs with, never failing
pub struct ConfigLoader {
    registry: SchemaRegistry,
    log: Dispatch,
}

impl ConfigLoader {
    pub fn new(registry: SchemaRegistry, log: Dispatch) -> Self {
        Self { registry, log }
    }

    /// Builds the configuration from raw document text, or defaults when absent
    pub fn load(&self, source: Option<&str>) -> Configuration {
        tracing::dispatcher::with_default(&self.log, || self.resolve(source))
    }

    /// Reads the document at `path`; an unreadable file yields defaults
    pub fn load_file(&self, path: Option<&Path>) -> Configuration {
        let Some(path) = path.filter(|path| !path.as_os_str().is_empty()) else {
            return self.load(None);
        };
        match std::fs::read_to_string(path) {
            Ok(text) => self.load(Some(&text)),
            Err(source) => tracing::dispatcher::with_default(&self.log, || {
                self.fall_back(&ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }),
        }
    }

    fn resolve(&self, source: Option<&str>) -> Configuration {
        let Some(text) = source else {
            warn!("Configuration file not specified, using default configuration");
            return self.defaults();
        };

        match Configuration::from_yaml(text, &self.registry) {
            Ok(config) => {
                info!(
                    host = config.host(),
                    port = config.port(),
                    requests = config.requests.len(),
                    "Configuration validation passed, working with configuration"
                );
                config
            }
            Err(err) => self.fall_back(&err),
        }
    }

    fn fall_back(&self, err: &ConfigError) -> Configuration {
        match err {
            ConfigError::Validation(violations) => {
                warn!(violations = %violations, "Configuration validation failed")
            }
            other => warn!(error = %other, "Configuration could not be loaded"),
        }
        self.defaults()
    }

    fn defaults(&self) -> Configuration {
        let config = Configuration::default();
        info!(
            host = config.host(),
            port = config.port(),
            "Using default configuration"
        );
        config
    }
}
