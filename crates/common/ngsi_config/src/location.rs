use camino::Utf8Path;
use camino::Utf8PathBuf;

pub const DEFAULT_NGSI_CONFIG_PATH: &str = "/etc/ngsi";
pub const NGSI_CONFIG_DIR_ENV: &str = "NGSI_CONFIG_DIR";
const BROKERS_FILE: &str = "brokers.toml";
const PREVIOUS_ARGS_FILE: &str = "previous_args.toml";

/// The config directory, as set by `NGSI_CONFIG_DIR` or the default `/etc/ngsi`
pub fn get_config_dir() -> Utf8PathBuf {
    std::env::var(NGSI_CONFIG_DIR_ENV)
        .map(Utf8PathBuf::from)
        .unwrap_or_else(|_| Utf8PathBuf::from(DEFAULT_NGSI_CONFIG_PATH))
}

/// Information about where `brokers.toml` and `previous_args.toml` are located.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NgsiConfigLocation {
    /// Root directory of the ngsi configuration files
    pub config_root_path: Utf8PathBuf,

    /// Full path to the `brokers.toml` file.
    pub brokers_file_path: Utf8PathBuf,

    /// Full path to the `previous_args.toml` file.
    pub previous_args_file_path: Utf8PathBuf,
}

impl Default for NgsiConfigLocation {
    fn default() -> Self {
        Self::from_custom_root(DEFAULT_NGSI_CONFIG_PATH)
    }
}

impl NgsiConfigLocation {
    pub fn from_custom_root(config_root_path: impl AsRef<Utf8Path>) -> Self {
        let root = config_root_path.as_ref();
        Self {
            config_root_path: root.to_path_buf(),
            brokers_file_path: root.join(BROKERS_FILE),
            previous_args_file_path: root.join(PREVIOUS_ARGS_FILE),
        }
    }

    pub fn config_root_path(&self) -> &Utf8Path {
        &self.config_root_path
    }
}

#[test]
fn test_from_custom_root() {
    let config_location = NgsiConfigLocation::from_custom_root("/opt/etc/ngsi");
    assert_eq!(config_location.config_root_path, "/opt/etc/ngsi");
    assert_eq!(
        config_location.brokers_file_path,
        "/opt/etc/ngsi/brokers.toml"
    );
    assert_eq!(
        config_location.previous_args_file_path,
        "/opt/etc/ngsi/previous_args.toml"
    );
}

#[test]
fn test_from_default_system_location() {
    let config_location = NgsiConfigLocation::default();
    assert_eq!(config_location.config_root_path(), "/etc/ngsi");
    assert_eq!(config_location.brokers_file_path, "/etc/ngsi/brokers.toml");
}
