use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use remeha2mqtt_bus::CanBus;
use remeha2mqtt_protocol::{FrameDecoder, StateStore};

use crate::cmd::DumpArgs;
use crate::config;
use crate::exit::{bus_error, config_error, CliError, CliResult, SUCCESS};
use crate::output::{print_frame, print_reading, OutputFormat};

const RECV_TIMEOUT: Duration = Duration::from_secs(1);

pub fn run(args: DumpArgs, config_path: &Path, format: OutputFormat) -> CliResult<i32> {
    // The config file is only needed for the interface name, so an explicit
    // --interface works on machines without one.
    let interface = match &args.interface {
        Some(interface) => interface.clone(),
        None => {
            config::load(config_path)
                .map_err(|err| config_error("config load failed", err))?
                .can_interface
        }
    };

    let bus = CanBus::open(&interface).map_err(|err| bus_error("bus open failed", err))?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let mut decoder = FrameDecoder::new();
    let mut store = StateStore::new();
    let mut printed = 0usize;

    while running.load(Ordering::SeqCst) {
        let frame = match bus.recv_timeout(RECV_TIMEOUT) {
            Ok(Some(frame)) => frame,
            Ok(None) => continue,
            Err(err) => return Err(bus_error("bus receive failed", err)),
        };

        let candidates = decoder.decode(&frame);
        if candidates.is_empty() {
            if args.raw {
                print_frame(&frame, format);
            }
            continue;
        }

        for reading in store.apply(candidates) {
            print_reading(&reading, format);
            printed = printed.saturating_add(1);

            if let Some(count) = args.count {
                if printed >= count {
                    return Ok(SUCCESS);
                }
            }
        }
    }

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
