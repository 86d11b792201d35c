use crate::ConfigError;
use crate::NgsiConfigLocation;
use serde::Deserialize;
use serde::Serialize;
use std::fs;

/// The broker selection of the last single-broker command
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct PreviousArgs {
    pub host: Option<String>,
    pub tenant: Option<String>,
    pub scope: Option<String>,
}

impl PreviousArgs {
    /// Read `previous_args.toml`, an absent file meaning nothing has been recorded
    pub fn load(location: &NgsiConfigLocation) -> Result<Self, ConfigError> {
        let path = &location.previous_args_file_path;
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

    pub fn save(&self, location: &NgsiConfigLocation) -> Result<(), ConfigError> {
        let path = &location.previous_args_file_path;
        let contents = toml::to_string(self).map_err(|source| ConfigError::Serialize {
            path: path.clone(),
            source,
        })?;
        fs::create_dir_all(&location.config_root_path)
            .and_then(|()| fs::write(path, contents))
            .map_err(|source| ConfigError::WriteFile {
                path: path.clone(),
                source,
            })
    }

    /// Forget the recorded selection
    pub fn clear(location: &NgsiConfigLocation) -> Result<(), ConfigError> {
        PreviousArgs::default().save(location)
    }
}
