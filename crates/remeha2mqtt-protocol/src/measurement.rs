use chrono::{DateTime, Local};

/// Dead-band width for numeric measurements: changes of at most this
/// magnitude are suppressed.
pub const DEADBAND_EPSILON: f64 = 0.01;

/// The closed set of measurements the bridge publishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeasurementKind {
    /// Relative burner power in percent.
    Power,
    /// Flow (supply) water temperature in °C.
    FlowTemperature,
    /// Flow temperature setpoint in °C.
    Setpoint,
    /// Water pressure in bar.
    Pressure,
    /// Raw operating status code.
    StatusId,
    /// Human-readable status text paired with [`MeasurementKind::StatusId`].
    StatusDescription,
    /// The appliance's own clock.
    DateTime,
}

impl MeasurementKind {
    /// All kinds, in discovery/publication order.
    pub const ALL: [MeasurementKind; 7] = [
        MeasurementKind::Power,
        MeasurementKind::FlowTemperature,
        MeasurementKind::Setpoint,
        MeasurementKind::Pressure,
        MeasurementKind::StatusId,
        MeasurementKind::StatusDescription,
        MeasurementKind::DateTime,
    ];

    /// Stable external name, used as the topic leaf and discovery id.
    pub fn name(self) -> &'static str {
        match self {
            MeasurementKind::Power => "power",
            MeasurementKind::FlowTemperature => "flowtemperature",
            MeasurementKind::Setpoint => "setpoint",
            MeasurementKind::Pressure => "pressure",
            MeasurementKind::StatusId => "statusid",
            MeasurementKind::StatusDescription => "statusdescription",
            MeasurementKind::DateTime => "datetime",
        }
    }

    /// The change-detection policy the state store applies to this kind.
    ///
    /// `StatusDescription` is `Always` because it is never judged on its own
    /// text: the store forwards it exactly when the paired `StatusId` was
    /// accepted in the same decode step.
    pub fn policy(self) -> PublishPolicy {
        match self {
            MeasurementKind::Power
            | MeasurementKind::FlowTemperature
            | MeasurementKind::Setpoint
            | MeasurementKind::Pressure => PublishPolicy::EpsilonNumeric(DEADBAND_EPSILON),
            MeasurementKind::StatusId => PublishPolicy::ExactMatch,
            MeasurementKind::StatusDescription | MeasurementKind::DateTime => {
                PublishPolicy::Always
            }
        }
    }
}

/// How the state store decides whether a candidate value gets published.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PublishPolicy {
    /// Publish every decoded value, changed or not.
    Always,
    /// Publish when the absolute change exceeds the given width.
    EpsilonNumeric(f64),
    /// Publish when the value differs at all from the stored one.
    ExactMatch,
}

/// One decoded measurement value.
#[derive(Debug, Clone, PartialEq)]
pub enum Reading {
    Power(u8),
    FlowTemperature(f64),
    Setpoint(f64),
    Pressure(f64),
    StatusId(u8),
    StatusDescription(&'static str),
    DateTime(DateTime<Local>),
}

impl Reading {
    /// The measurement this reading belongs to.
    pub fn kind(&self) -> MeasurementKind {
        match self {
            Reading::Power(_) => MeasurementKind::Power,
            Reading::FlowTemperature(_) => MeasurementKind::FlowTemperature,
            Reading::Setpoint(_) => MeasurementKind::Setpoint,
            Reading::Pressure(_) => MeasurementKind::Pressure,
            Reading::StatusId(_) => MeasurementKind::StatusId,
            Reading::StatusDescription(_) => MeasurementKind::StatusDescription,
            Reading::DateTime(_) => MeasurementKind::DateTime,
        }
    }

    /// The payload text published for this reading.
    ///
    /// Numbers render as bare decimal text, the status description as raw
    /// text, and the clock as RFC 3339 with the local UTC offset.
    pub fn payload(&self) -> String {
        match self {
            Reading::Power(v) => v.to_string(),
            Reading::FlowTemperature(v) | Reading::Setpoint(v) | Reading::Pressure(v) => {
                v.to_string()
            }
            Reading::StatusId(v) => v.to_string(),
            Reading::StatusDescription(text) => (*text).to_string(),
            Reading::DateTime(dt) => dt.to_rfc3339(),
        }
    }
}
