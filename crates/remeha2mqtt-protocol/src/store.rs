use chrono::{DateTime, Local, NaiveDate, TimeZone};

use crate::measurement::{MeasurementKind, PublishPolicy, Reading};
use crate::status::UNKNOWN_STATUS;

/// Last-published values with per-kind change detection.
///
/// A fresh store holds sentinel values chosen so the first real reading of
/// each kind differs and therefore publishes. Accepted readings overwrite
/// the stored value before they are handed back to the caller, so a state
/// snapshot taken after `apply` never lags behind what was forwarded.
#[derive(Debug)]
pub struct StateStore {
    power: i64,
    flow_temperature: f64,
    setpoint: f64,
    pressure: f64,
    status_id: u8,
    status_description: &'static str,
    datetime: DateTime<Local>,
}

impl StateStore {
    pub fn new() -> Self {
        Self {
            power: -1,
            flow_temperature: -1.0,
            setpoint: -1.0,
            pressure: -1.0,
            status_id: 254,
            status_description: UNKNOWN_STATUS,
            datetime: sentinel_datetime(),
        }
    }

    /// Apply one decode step's candidate readings, in order, and return the
    /// ones to publish.
    ///
    /// The status description is paired with the status id: its `Always`
    /// policy is gated on the id having been accepted in this same step, so
    /// a transition between two codes that share a description text still
    /// republishes the text.
    pub fn apply(&mut self, readings: Vec<Reading>) -> Vec<Reading> {
        let mut published = Vec::with_capacity(readings.len());
        let mut status_changed = false;
        for reading in readings {
            let accepted = match reading {
                Reading::Power(v) => {
                    let accepted = accepts(
                        MeasurementKind::Power.policy(),
                        self.power as f64,
                        f64::from(v),
                    );
                    if accepted {
                        self.power = i64::from(v);
                    }
                    accepted
                }
                Reading::FlowTemperature(v) => {
                    let accepted = accepts(
                        MeasurementKind::FlowTemperature.policy(),
                        self.flow_temperature,
                        v,
                    );
                    if accepted {
                        self.flow_temperature = v;
                    }
                    accepted
                }
                Reading::Setpoint(v) => {
                    let accepted = accepts(MeasurementKind::Setpoint.policy(), self.setpoint, v);
                    if accepted {
                        self.setpoint = v;
                    }
                    accepted
                }
                Reading::Pressure(v) => {
                    let accepted = accepts(MeasurementKind::Pressure.policy(), self.pressure, v);
                    if accepted {
                        self.pressure = v;
                    }
                    accepted
                }
                Reading::StatusId(v) => {
                    let accepted = accepts(
                        MeasurementKind::StatusId.policy(),
                        f64::from(self.status_id),
                        f64::from(v),
                    );
                    if accepted {
                        self.status_id = v;
                        status_changed = true;
                    }
                    accepted
                }
                Reading::StatusDescription(text) => {
                    if status_changed {
                        self.status_description = text;
                    }
                    status_changed
                }
                Reading::DateTime(dt) => {
                    self.datetime = dt;
                    true
                }
            };
            if accepted {
                published.push(reading);
            }
        }
        published
    }

    pub fn power(&self) -> i64 {
        self.power
    }

    pub fn flow_temperature(&self) -> f64 {
        self.flow_temperature
    }

    pub fn setpoint(&self) -> f64 {
        self.setpoint
    }

    pub fn pressure(&self) -> f64 {
        self.pressure
    }

    pub fn status_id(&self) -> u8 {
        self.status_id
    }

    pub fn status_description(&self) -> &'static str {
        self.status_description
    }

    pub fn datetime(&self) -> DateTime<Local> {
        self.datetime
    }
}

impl Default for StateStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether `candidate` replaces `stored` under `policy`. Integer kinds pass
/// through `f64` losslessly, so `ExactMatch` stays exact.
fn accepts(policy: PublishPolicy, stored: f64, candidate: f64) -> bool {
    match policy {
        PublishPolicy::Always => true,
        PublishPolicy::EpsilonNumeric(epsilon) => (candidate - stored).abs() > epsilon,
        PublishPolicy::ExactMatch => candidate != stored,
    }
}

/// Initial appliance clock value: day zero of the boiler's own epoch.
fn sentinel_datetime() -> DateTime<Local> {
    let naive = NaiveDate::from_ymd_opt(1984, 1, 1)
        .expect("valid epoch date")
        .and_hms_opt(0, 0, 0)
        .expect("valid midnight");
    // That midnight may not exist in every time zone; the UTC reading of
    // the same wall clock stands in when it does not.
    naive
        .and_local_timezone(Local)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}
