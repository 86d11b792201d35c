use camino::Utf8PathBuf;
use ngsi_api::at_context::AtContextError;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Toml syntax error in the config file '{path}': {reason}")]
    InvalidSyntax { path: Utf8PathBuf, reason: String },

    #[error("Invalid log level: {name:?}, supported levels are info, warn, error and debug")]
    InvalidLogLevel { name: String },

    #[error("Failed to read '{path}'")]
    ReadFile {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to write '{path}'")]
    WriteFile {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to serialize '{path}'")]
    Serialize {
        path: Utf8PathBuf,
        source: toml::ser::Error,
    },

    #[error("Unknown broker: {name:?}. Register it in '{path}' or use an http(s) URL")]
    UnknownBroker { name: String, path: Utf8PathBuf },

    #[error("No broker given. Use --host")]
    MissingBroker,

    #[error("Invalid @context {name:?}")]
    InvalidContext {
        name: String,
        source: AtContextError,
    },
}
