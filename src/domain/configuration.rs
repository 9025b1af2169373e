use crate::domain::entities::RequestSpec;
use crate::domain::value_objects::Endpoint;
use serde::Deserialize;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// Validated application configuration
///
/// Only ever produced from the defaults or from a document that passed
/// schema validation, see `Configuration::from_yaml`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Configuration {
    pub general: GeneralSettings,
    #[serde(default)]
    pub requests: Vec<RequestSpec>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneralSettings {
    pub host: String,
    pub port: u16,
}

impl Configuration {
    pub fn host(&self) -> &str {
        &self.general.host
    }

    pub fn port(&self) -> u16 {
        self.general.port
    }

    pub fn endpoint(&self) -> Endpoint {
        Endpoint::new(self.general.host.clone(), self.general.port)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            general: GeneralSettings {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
            },
            requests: Vec::new(),
        }
    }
}
