use std::io::IsTerminal;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde::Serialize;

use remeha2mqtt_bus::BusFrame;
use remeha2mqtt_protocol::{ids, Reading};
use remeha2mqtt_publish::discovery;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
    Raw,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct ReadingOutput<'a> {
    measurement: &'a str,
    value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<&'a str>,
    timestamp: String,
}

pub fn print_reading(reading: &Reading, format: OutputFormat) {
    let meta = discovery::sensor_meta(reading.kind());
    match format {
        OutputFormat::Json => {
            let out = ReadingOutput {
                measurement: reading.kind().name(),
                value: reading.payload(),
                unit: meta.unit,
                timestamp: now_unix_seconds(),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["MEASUREMENT", "VALUE", "UNIT"])
                .add_row(vec![
                    reading.kind().name().to_string(),
                    reading.payload(),
                    meta.unit.unwrap_or("").to_string(),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty => match meta.unit {
            Some(unit) => println!(
                "measurement={} value={} unit={}",
                reading.kind().name(),
                reading.payload(),
                unit
            ),
            None => println!(
                "measurement={} value={}",
                reading.kind().name(),
                reading.payload()
            ),
        },
        OutputFormat::Raw => {
            println!("{}", reading.payload());
        }
    }
}

#[derive(Serialize)]
struct FrameOutput<'a> {
    id: String,
    name: &'a str,
    len: usize,
    data: String,
}

/// Print a frame that decoded to nothing (`dump --raw`).
pub fn print_frame(frame: &BusFrame, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = FrameOutput {
                id: format!("{:#05X}", frame.id),
                name: ids::frame_name(frame.id),
                len: frame.len(),
                data: hex_bytes(frame.data.as_ref()),
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["ID", "NAME", "LEN", "DATA"])
                .add_row(vec![
                    format!("{:#05X}", frame.id),
                    ids::frame_name(frame.id).to_string(),
                    frame.len().to_string(),
                    hex_bytes(frame.data.as_ref()),
                ]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => {
            println!(
                "id={:#05X} name={} len={} data={}",
                frame.id,
                ids::frame_name(frame.id),
                frame.len(),
                hex_bytes(frame.data.as_ref())
            );
        }
    }
}

fn hex_bytes(data: &[u8]) -> String {
    data.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn now_unix_seconds() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_else(|_| "0".to_string())
}
