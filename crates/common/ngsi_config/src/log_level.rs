use crate::ConfigError;
use crate::LogConfigArgs;
use crate::NgsiConfig;
use crate::NgsiConfigLocation;
use std::io::IsTerminal;
use std::str::FromStr;
use tracing_subscriber::util::SubscriberInitExt;

#[macro_export]
/// The basic subscriber
macro_rules! subscriber_builder {
    () => {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(std::io::stderr().is_terminal() && yansi::Condition::no_color())
            .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
    };
}

const DEFAULT_MAX_LEVEL: tracing::Level = tracing::Level::WARN;

/// Configures and enables logging taking into account flags, env variables and file config.
///
/// 1. If `--debug` or `--log-level` flags are set, they take precedence
/// 2. Else, if the `RUST_LOG` variable is set, it is used as an env filter
/// 3. Else, the `[log]` table of `brokers.toml` is looked up for the given service name
/// 4. Else, only warnings and errors are reported
pub fn log_init(
    sname: &str,
    flags: &LogConfigArgs,
    location: &NgsiConfigLocation,
) -> Result<(), ConfigError> {
    let subscriber = subscriber_builder!();

    let log_level = flags
        .log_level
        .or(flags.debug.then_some(tracing::Level::DEBUG));

    if let Some(log_level) = log_level {
        subscriber.with_max_level(log_level).finish().init();
        return Ok(());
    }

    if std::env::var("RUST_LOG").is_ok() {
        subscriber
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_file(true)
            .with_line_number(true)
            .finish()
            .init();
        return Ok(());
    }

    let log_level = get_log_level_from_config_file(sname, location)?.unwrap_or(DEFAULT_MAX_LEVEL);
    subscriber.with_max_level(log_level).finish().init();
    Ok(())
}

/// Return the log level for a given service, if it's defined in the config file. Otherwise return `None`.
pub fn get_log_level_from_config_file(
    sname: &str,
    location: &NgsiConfigLocation,
) -> Result<Option<tracing::Level>, ConfigError> {
    let log = NgsiConfig::try_new(location)?.log;
    match log.get(sname) {
        Some(level) => {
            let level = tracing::Level::from_str(&level.to_uppercase()).map_err(|_| {
                ConfigError::InvalidLogLevel {
                    name: level.to_string(),
                }
            })?;
            Ok(Some(level))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing::Level;

    #[test]
    fn valid_log_level() -> anyhow::Result<()> {
        let toml_conf = r#"
        [log]
        ngsi = "debug"
    "#;

        let (_dir, location) = create_temp_config(toml_conf)?;
        let res = get_log_level_from_config_file("ngsi", &location)?;
        assert_eq!(Some(Level::DEBUG), res);
        Ok(())
    }

    #[test]
    fn invalid_log_level() -> anyhow::Result<()> {
        let toml_conf = r#"
        [log]
        ngsi = "verbose"
    "#;
        let (_dir, location) = create_temp_config(toml_conf)?;
        let res = get_log_level_from_config_file("ngsi", &location).unwrap_err();
        assert_eq!(
            "Invalid log level: \"verbose\", supported levels are info, warn, error and debug",
            res.to_string()
        );
        Ok(())
    }

    #[test]
    fn log_level_not_configured() -> anyhow::Result<()> {
        let toml_conf = r#"
        [brokers.orion]
        url = "http://localhost:1026"
    "#;

        let (_dir, location) = create_temp_config(toml_conf)?;
        let res = get_log_level_from_config_file("ngsi", &location)?;
        assert_eq!(None, res);
        Ok(())
    }

    #[test]
    fn missing_config_file() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let location = NgsiConfigLocation::from_custom_root(
            crate::Path::from_path(dir.path()).unwrap(),
        );
        assert_eq!(get_log_level_from_config_file("ngsi", &location)?, None);
        Ok(())
    }

    // Need to return TempDir, otherwise the dir will be deleted when this function ends.
    fn create_temp_config(content: &str) -> std::io::Result<(TempDir, NgsiConfigLocation)> {
        let temp_dir = TempDir::new()?;
        let location =
            NgsiConfigLocation::from_custom_root(crate::Path::from_path(temp_dir.path()).unwrap());
        std::fs::write(&location.brokers_file_path, content.as_bytes())?;
        Ok((temp_dir, location))
    }
}
