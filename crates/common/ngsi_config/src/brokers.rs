use crate::ConfigError;
use crate::NgsiConfigLocation;
use ngsi_api::at_context::AtContext;
use ngsi_api::NgsiType;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::collections::HashMap;
use std::fs;
use url::Url;

/// The content of `brokers.toml`
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct NgsiConfig {
    /// Registered brokers, by alias
    #[serde(default)]
    pub brokers: BTreeMap<String, BrokerConfig>,

    /// Named JSON-LD contexts: either a URL or an inline JSON document
    #[serde(default)]
    pub contexts: BTreeMap<String, String>,

    /// Log level per command
    #[serde(default)]
    pub log: HashMap<String, String>,

    #[serde(default)]
    pub settings: Settings,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BrokerConfig {
    pub url: Url,

    #[serde(default)]
    pub ngsi_type: NgsiType,

    pub tenant: Option<String>,

    pub scope: Option<String>,

    pub token: Option<String>,
}

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Remember the last broker selection of single-broker commands
    #[serde(default = "Settings::default_use_previous_args")]
    pub use_previous_args: bool,
}

impl Settings {
    fn default_use_previous_args() -> bool {
        true
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            use_previous_args: Settings::default_use_previous_args(),
        }
    }
}

/// A broker endpoint, either registered in `brokers.toml` or given as a plain URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Broker {
    /// The alias or the URL the broker has been selected with
    pub name: String,
    pub url: Url,
    pub ngsi_type: NgsiType,
    pub tenant: Option<String>,
    pub scope: Option<String>,
    pub token: Option<String>,
}

impl NgsiConfig {
    /// Read `brokers.toml`, an absent file being an empty configuration
    pub fn try_new(location: &NgsiConfigLocation) -> Result<Self, ConfigError> {
        let path = &location.brokers_file_path;
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|e| ConfigError::InvalidSyntax {
                path: path.clone(),
                reason: e.to_string(),
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::ReadFile {
                path: path.clone(),
                source,
            }),
        }
    }

    /// Resolve a broker alias.
    ///
    /// A name that is not registered but is an `http` or `https` URL is used as is,
    /// with no tenant, scope or token.
    pub fn broker(&self, name: &str, location: &NgsiConfigLocation) -> Result<Broker, ConfigError> {
        if let Some(config) = self.brokers.get(name) {
            return Ok(Broker {
                name: name.to_string(),
                url: config.url.clone(),
                ngsi_type: config.ngsi_type,
                tenant: config.tenant.clone(),
                scope: config.scope.clone(),
                token: config.token.clone(),
            });
        }

        match Url::parse(name) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Broker {
                name: name.to_string(),
                url,
                ngsi_type: NgsiType::default(),
                tenant: None,
                scope: None,
                token: None,
            }),
            _ => Err(ConfigError::UnknownBroker {
                name: name.to_string(),
                path: location.brokers_file_path.clone(),
            }),
        }
    }

    /// Resolve a JSON-LD context given either as a registered name, a URL or inline JSON
    pub fn at_context(&self, name: &str) -> Result<AtContext, ConfigError> {
        let context = self.contexts.get(name).map_or(name, String::as_str);
        context
            .parse()
            .map_err(|source| ConfigError::InvalidContext {
                name: name.to_string(),
                source,
            })
    }
}
