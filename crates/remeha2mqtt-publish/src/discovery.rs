//! Home Assistant MQTT discovery.
//!
//! One retained JSON payload per sensor under
//! `homeassistant/sensor/remeha_<name>/config`; Home Assistant picks them
//! up and attaches every sensor to the same boiler device. Display names
//! follow the boiler's own (Dutch) vocabulary.

use serde::Serialize;

use remeha2mqtt_protocol::MeasurementKind;

/// Root of all state topics.
pub const STATE_PREFIX: &str = "remeha";

/// Prefix Home Assistant watches for discovery payloads.
pub const DISCOVERY_PREFIX: &str = "homeassistant";

/// Static description of one published sensor.
#[derive(Debug, Clone, Copy)]
pub struct SensorMeta {
    pub kind: MeasurementKind,
    /// Display name shown in Home Assistant.
    pub display_name: &'static str,
    pub unit: Option<&'static str>,
    pub device_class: Option<&'static str>,
    pub icon: &'static str,
}

/// All published sensors, in discovery order.
pub const SENSORS: [SensorMeta; 7] = [
    SensorMeta {
        kind: MeasurementKind::Power,
        display_name: "Vermogen",
        unit: Some("%"),
        device_class: None,
        icon: "mdi:fire",
    },
    SensorMeta {
        kind: MeasurementKind::FlowTemperature,
        display_name: "Flowtemperatuur",
        unit: Some("°C"),
        device_class: Some("temperature"),
        icon: "mdi:thermometer",
    },
    SensorMeta {
        kind: MeasurementKind::Setpoint,
        display_name: "Setpoint",
        unit: Some("°C"),
        device_class: Some("temperature"),
        icon: "mdi:target",
    },
    SensorMeta {
        kind: MeasurementKind::Pressure,
        display_name: "Druk",
        unit: Some("bar"),
        device_class: Some("pressure"),
        icon: "mdi:gauge",
    },
    SensorMeta {
        kind: MeasurementKind::StatusId,
        display_name: "Status ID",
        unit: None,
        device_class: None,
        icon: "mdi:numeric",
    },
    SensorMeta {
        kind: MeasurementKind::StatusDescription,
        display_name: "Statusomschrijving",
        unit: None,
        device_class: None,
        icon: "mdi:text",
    },
    SensorMeta {
        kind: MeasurementKind::DateTime,
        display_name: "Datum/tijd",
        unit: None,
        device_class: Some("timestamp"),
        icon: "mdi:calendar-clock",
    },
];

/// The static sensor description for a measurement.
pub fn sensor_meta(kind: MeasurementKind) -> &'static SensorMeta {
    SENSORS
        .iter()
        .find(|meta| meta.kind == kind)
        .expect("every measurement kind has a sensor entry")
}

/// `remeha/<name>` state topic for a measurement.
pub fn state_topic(kind: MeasurementKind) -> String {
    format!("{STATE_PREFIX}/{}", kind.name())
}

/// `homeassistant/sensor/remeha_<name>/config` discovery topic.
pub fn discovery_topic(kind: MeasurementKind) -> String {
    format!(
        "{DISCOVERY_PREFIX}/sensor/{STATE_PREFIX}_{}/config",
        kind.name()
    )
}

#[derive(Serialize)]
struct DiscoveryPayload<'a> {
    name: &'a str,
    unique_id: String,
    state_topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit_of_measurement: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    device_class: Option<&'a str>,
    icon: &'a str,
    device: DeviceInfo,
}

#[derive(Serialize)]
struct DeviceInfo {
    identifiers: [&'static str; 1],
    name: &'static str,
    manufacturer: &'static str,
    model: &'static str,
}

/// The device block shared by all sensors, so Home Assistant groups them.
const DEVICE: DeviceInfo = DeviceInfo {
    identifiers: ["remeha_cv_ketel"],
    name: "Remeha CV Ketel",
    manufacturer: "Remeha",
    model: "CAN-bus ketel",
};

/// Serialize the discovery payload for one sensor.
pub fn discovery_payload(meta: &SensorMeta) -> serde_json::Result<String> {
    serde_json::to_string(&DiscoveryPayload {
        name: meta.display_name,
        unique_id: format!("{STATE_PREFIX}_{}", meta.kind.name()),
        state_topic: state_topic(meta.kind),
        unit_of_measurement: meta.unit,
        device_class: meta.device_class,
        icon: meta.icon,
        device: DEVICE,
    })
}
