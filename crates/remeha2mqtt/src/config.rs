use std::fs;
use std::path::Path;

use tracing::warn;

use remeha2mqtt_publish::BrokerConfig;

/// Where the bridge looks for its configuration unless `--config` or
/// `REMEHA2MQTT_CONFIG` says otherwise.
pub const DEFAULT_PATH: &str = "/etc/remeha2mqtt.conf";

/// Settings read from the configuration file.
///
/// The file is a flat `key = value` list: `#` starts a comment, blank lines
/// and lines without `=` are skipped, keys and values are trimmed. Values
/// keep any `=` after the first, so passwords containing one survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    pub broker: BrokerConfig,
    /// SocketCAN interface the boiler is wired to.
    pub can_interface: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            broker: BrokerConfig::default(),
            can_interface: "can0".to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read at all.
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    /// A key is present but its value does not parse.
    #[error("invalid {key} value {value:?}: {source}")]
    Invalid {
        key: &'static str,
        value: String,
        source: std::num::ParseIntError,
    },
}

/// Load the configuration file, failing fast on unreadable files or
/// unparsable values. Unknown keys are ignored with a warning so a config
/// written for a newer version still loads.
pub fn load(path: &Path) -> Result<BridgeConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    parse(&text)
}

fn parse(text: &str) -> Result<BridgeConfig, ConfigError> {
    let mut config = BridgeConfig::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let value = value.trim();
        match key {
            "broker" => config.broker.host = value.to_string(),
            "port" => {
                config.broker.port = value.parse().map_err(|source| ConfigError::Invalid {
                    key: "port",
                    value: value.to_string(),
                    source,
                })?;
            }
            "username" => config.broker.username = Some(value.to_string()),
            "password" => config.broker.password = Some(value.to_string()),
            "client_id" => config.broker.client_id = value.to_string(),
            "can_interface" => config.can_interface = value.to_string(),
            other => warn!(key = other, "ignoring unknown configuration key"),
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = parse("").expect("empty config should parse");
        assert_eq!(config, BridgeConfig::default());
        assert_eq!(config.broker.host, "localhost");
        assert_eq!(config.broker.port, 1883);
        assert_eq!(config.can_interface, "can0");
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let config = parse("# mqtt settings\n\nbroker = mqtt.local\n  # indented comment\n")
            .expect("config should parse");
        assert_eq!(config.broker.host, "mqtt.local");
    }

    #[test]
    fn values_are_trimmed_and_split_on_first_equals() {
        let config = parse("broker=mqtt.local\nport = 8883\npassword = a=b=c\n")
            .expect("config should parse");
        assert_eq!(config.broker.host, "mqtt.local");
        assert_eq!(config.broker.port, 8883);
        assert_eq!(config.broker.password.as_deref(), Some("a=b=c"));
    }

    #[test]
    fn credentials_need_both_keys() {
        let config = parse("username = boiler\n").expect("config should parse");
        assert!(!config.broker.has_credentials());

        let config =
            parse("username = boiler\npassword = hunter2\n").expect("config should parse");
        assert!(config.broker.has_credentials());
    }

    #[test]
    fn lines_without_equals_are_ignored() {
        let config = parse("this is not a setting\nbroker = mqtt.local\n")
            .expect("config should parse");
        assert_eq!(config.broker.host, "mqtt.local");
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let config = parse("frobnicate = yes\ncan_interface = can1\n")
            .expect("config should parse");
        assert_eq!(config.can_interface, "can1");
    }

    #[test]
    fn invalid_port_fails() {
        let err = parse("port = not-a-number\n").expect_err("bad port should fail");
        match err {
            ConfigError::Invalid { key, value, .. } => {
                assert_eq!(key, "port");
                assert_eq!(value, "not-a-number");
            }
            other => panic!("expected Invalid error, got {other}"),
        }
    }

    #[test]
    fn missing_file_fails() {
        let err = load(Path::new("/nonexistent/remeha2mqtt.conf"))
            .expect_err("missing file should fail");
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn client_id_override() {
        let config = parse("client_id = boiler_test\n").expect("config should parse");
        assert_eq!(config.broker.client_id, "boiler_test");
    }
}
