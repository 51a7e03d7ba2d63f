use std::path::Path;

use tracing::info;

use remeha2mqtt_publish::{discovery, MqttPublisher};

use crate::cmd::AnnounceArgs;
use crate::config;
use crate::exit::{config_error, publish_error, CliResult, SUCCESS};

/// Publish the discovery payloads without starting the bridge loop, for
/// re-announcing after a broker wipe or a Home Assistant reinstall.
pub fn run(_args: AnnounceArgs, config_path: &Path) -> CliResult<i32> {
    let config =
        config::load(config_path).map_err(|err| config_error("config load failed", err))?;

    let mut publisher = MqttPublisher::connect(&config.broker)
        .map_err(|err| publish_error("mqtt connect failed", err))?;
    publisher
        .publish_discovery()
        .map_err(|err| publish_error("discovery publish failed", err))?;
    publisher
        .disconnect()
        .map_err(|err| publish_error("mqtt disconnect failed", err))?;

    info!(sensors = discovery::SENSORS.len(), "discovery published");
    Ok(SUCCESS)
}
