use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use remeha2mqtt_bus::CanBus;
use remeha2mqtt_protocol::{FrameDecoder, StateStore};
use remeha2mqtt_publish::MqttPublisher;

use crate::cmd::RunArgs;
use crate::config;
use crate::exit::{bus_error, config_error, publish_error, CliError, CliResult, SUCCESS};

/// How long one receive may block before the loop rechecks for Ctrl-C.
const RECV_TIMEOUT: Duration = Duration::from_secs(1);

pub fn run(args: RunArgs, config_path: &Path) -> CliResult<i32> {
    let config =
        config::load(config_path).map_err(|err| config_error("config load failed", err))?;
    let interface = args.interface.as_deref().unwrap_or(&config.can_interface);

    let bus = CanBus::open(interface).map_err(|err| bus_error("bus open failed", err))?;
    let mut publisher = MqttPublisher::connect(&config.broker)
        .map_err(|err| publish_error("mqtt connect failed", err))?;
    publisher
        .publish_discovery()
        .map_err(|err| publish_error("discovery publish failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut decoder = FrameDecoder::new();
    let mut store = StateStore::new();

    info!(interface, "bridge started");

    while running.load(Ordering::SeqCst) {
        let frame = match bus.recv_timeout(RECV_TIMEOUT) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(err) => return Err(bus_error("bus receive failed", err)),
        };

        for reading in store.apply(decoder.decode(&frame)) {
            publisher
                .publish_reading(&reading)
                .map_err(|err| publish_error("publish failed", err))?;
        }
    }

    info!("shutting down");
    publisher
        .disconnect()
        .map_err(|err| publish_error("mqtt disconnect failed", err))?;

    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| {
        CliError::new(
            crate::exit::INTERNAL,
            format!("signal handler setup failed: {err}"),
        )
    })
}
