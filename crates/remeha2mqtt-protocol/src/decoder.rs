use chrono::{Days, Local, LocalResult, NaiveDate, NaiveDateTime, NaiveTime};
use tracing::debug;

use remeha2mqtt_bus::BusFrame;

use crate::ids;
use crate::measurement::Reading;
use crate::status::status_description;

/// Stateful frame decoder.
///
/// One instance per bus session. The only state carried between frames is
/// the pressure handshake phase; every other identifier decodes from the
/// frame alone. Decoding cannot fail: frames the decoder does not
/// understand are ordinary traffic on a shared bus and yield no readings.
#[derive(Debug)]
pub struct FrameDecoder {
    pressure: PressurePhase,
}

/// Pressure handshake phase.
///
/// A marker frame on the pressure identifier announces that the next
/// non-marker frame on that identifier carries a water pressure sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PressurePhase {
    Idle,
    AwaitingPressure,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            pressure: PressurePhase::Idle,
        }
    }

    /// Decode one frame into zero or more candidate readings.
    ///
    /// The readings are candidates only; whether they are published is
    /// decided by [`StateStore::apply`](crate::store::StateStore::apply).
    pub fn decode(&mut self, frame: &BusFrame) -> Vec<Reading> {
        let Some(min_len) = ids::min_payload_len(frame.id) else {
            return Vec::new();
        };
        if frame.len() < min_len {
            debug!(
                id = frame.id,
                len = frame.len(),
                name = ids::frame_name(frame.id),
                "payload shorter than expected"
            );
            return Vec::new();
        }
        let data = frame.data.as_ref();
        match frame.id {
            ids::ID_CLOCK => Self::decode_clock(data),
            ids::ID_OPERATING => Self::decode_operating(data),
            ids::ID_SETPOINT => Self::decode_setpoint(data),
            ids::ID_PRESSURE => self.decode_pressure(data),
            ids::ID_STATUS => Self::decode_status(data),
            _ => Vec::new(),
        }
    }

    /// Clock frames carry a little-endian millisecond-of-day counter in
    /// bytes 0..4 and a little-endian day count since 1984-01-01 in bytes
    /// 4..6. The appliance encodes midnight at the end of a day as
    /// 24:00:00, which wraps to 00:00:00 on the following day.
    fn decode_clock(data: &[u8]) -> Vec<Reading> {
        if data.len() != 6 {
            debug!(len = data.len(), "clock frame length mismatch");
            return Vec::new();
        }
        let ms = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        let total_seconds = ms / 1000;
        let mut hour = total_seconds / 3600;
        let minute = (total_seconds % 3600) / 60;
        let second = total_seconds % 60;
        let days = u16::from_le_bytes([data[4], data[5]]);

        let Some(mut date) = clock_epoch().checked_add_days(Days::new(u64::from(days))) else {
            return Vec::new();
        };
        if hour == 24 {
            hour = 0;
            let Some(next) = date.succ_opt() else {
                return Vec::new();
            };
            date = next;
        }
        let Some(time) = NaiveTime::from_hms_opt(hour, minute, second) else {
            debug!(hour, "clock frame with out-of-range time");
            return Vec::new();
        };
        match NaiveDateTime::new(date, time).and_local_timezone(Local) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                vec![Reading::DateTime(dt)]
            }
            // A wall-clock reading inside a DST gap has no local
            // representation; drop it like other unusable traffic.
            LocalResult::None => Vec::new(),
        }
    }

    /// Byte 0 is the burner power percent; bytes 1..3 a little-endian
    /// centidegree flow temperature.
    fn decode_operating(data: &[u8]) -> Vec<Reading> {
        let power = data[0];
        let raw = u16::from_le_bytes([data[1], data[2]]);
        let flow = round_dp(f64::from(raw) / 100.0, 2);
        vec![Reading::Power(power), Reading::FlowTemperature(flow)]
    }

    /// Bytes 1..3 are a little-endian centidegree setpoint.
    fn decode_setpoint(data: &[u8]) -> Vec<Reading> {
        let raw = u16::from_le_bytes([data[1], data[2]]);
        vec![Reading::Setpoint(round_dp(f64::from(raw) / 100.0, 2))]
    }

    /// The marker signature takes precedence: a marker frame arms the
    /// handshake and never yields a reading, even when one is already
    /// armed. A non-marker frame while armed carries the sample in byte 5
    /// (decibar) and disarms the handshake whether or not the sample is
    /// published downstream.
    fn decode_pressure(&mut self, data: &[u8]) -> Vec<Reading> {
        if data[..3] == ids::PRESSURE_MARKER {
            self.pressure = PressurePhase::AwaitingPressure;
            return Vec::new();
        }
        match self.pressure {
            PressurePhase::AwaitingPressure => {
                self.pressure = PressurePhase::Idle;
                vec![Reading::Pressure(round_dp(f64::from(data[5]) / 10.0, 1))]
            }
            PressurePhase::Idle => Vec::new(),
        }
    }

    /// Byte 0 is the status code; the description is always paired with it.
    fn decode_status(data: &[u8]) -> Vec<Reading> {
        let code = data[0];
        vec![
            Reading::StatusId(code),
            Reading::StatusDescription(status_description(code)),
        ]
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Day zero of the appliance clock.
fn clock_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1984, 1, 1).expect("valid epoch date")
}

/// Round to `places` decimal places: scale, [`f64::round`] (ties away from
/// zero), unscale.
fn round_dp(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn frame(id: u32, data: &[u8]) -> BusFrame {
        BusFrame::new(id, data.to_vec())
    }

    fn clock_frame(ms: u32, days: u16) -> BusFrame {
        let mut data = ms.to_le_bytes().to_vec();
        data.extend_from_slice(&days.to_le_bytes());
        frame(ids::ID_CLOCK, &data)
    }

    #[test]
    fn test_operating_frame_yields_power_and_flow() {
        let mut decoder = FrameDecoder::new();
        // 2050 centidegrees -> 20.5 °C
        let readings = decoder.decode(&frame(ids::ID_OPERATING, &[80, 0x02, 0x08, 0, 0]));
        assert_eq!(
            readings,
            vec![Reading::Power(80), Reading::FlowTemperature(20.5)]
        );
    }

    #[test]
    fn test_setpoint_scaling() {
        let mut decoder = FrameDecoder::new();
        let readings = decoder.decode(&frame(ids::ID_SETPOINT, &[0xFF, 0x02, 0x08]));
        assert_eq!(readings, vec![Reading::Setpoint(20.5)]);
    }

    #[test]
    fn test_centidegree_rounding() {
        let mut decoder = FrameDecoder::new();
        // 2051 -> 20.51, exercises the two-decimal rounding path
        let readings = decoder.decode(&frame(ids::ID_OPERATING, &[0, 0x03, 0x08, 0, 0]));
        assert_eq!(
            readings,
            vec![Reading::Power(0), Reading::FlowTemperature(20.51)]
        );
    }

    #[test]
    fn test_short_payloads_yield_nothing() {
        let mut decoder = FrameDecoder::new();
        let short: [(u32, &[u8]); 5] = [
            (ids::ID_CLOCK, &[0, 0, 0, 0, 0]),
            (ids::ID_OPERATING, &[80, 0x02, 0x08, 0]),
            (ids::ID_SETPOINT, &[0, 0x02]),
            (ids::ID_PRESSURE, &[0x41, 0x3F, 0x50, 0, 0, 0, 0]),
            (ids::ID_STATUS, &[]),
        ];
        for (id, data) in short {
            assert!(
                decoder.decode(&frame(id, data)).is_empty(),
                "id {id:#x} with {} bytes should be ignored",
                data.len()
            );
        }
    }

    #[test]
    fn test_unknown_identifier_ignored() {
        let mut decoder = FrameDecoder::new();
        assert!(decoder.decode(&frame(0x700, &[1, 2, 3, 4, 5, 6, 7, 8])).is_empty());
    }

    #[test]
    fn test_clock_frame_decodes_local_datetime() {
        let mut decoder = FrameDecoder::new();
        // 10:30:02 on day 200 -> 1984-07-19
        let ms = (10 * 3600 + 30 * 60 + 2) * 1000;
        let readings = decoder.decode(&clock_frame(ms, 200));
        let expected = NaiveDate::from_ymd_opt(1984, 7, 19)
            .unwrap()
            .and_hms_opt(10, 30, 2)
            .unwrap();
        match readings.as_slice() {
            [Reading::DateTime(dt)] => assert_eq!(dt.naive_local(), expected),
            other => panic!("unexpected readings: {other:?}"),
        }
    }

    #[test]
    fn test_clock_midnight_rollover() {
        let mut decoder = FrameDecoder::new();
        // 24:00:00 on day 0 wraps to 00:00:00 on the next day
        let readings = decoder.decode(&clock_frame(24 * 3600 * 1000, 0));
        let expected = NaiveDate::from_ymd_opt(1984, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        match readings.as_slice() {
            [Reading::DateTime(dt)] => assert_eq!(dt.naive_local(), expected),
            other => panic!("unexpected readings: {other:?}"),
        }
    }

    #[test]
    fn test_clock_emits_every_frame() {
        let mut decoder = FrameDecoder::new();
        let ms = 12 * 3600 * 1000;
        assert_eq!(decoder.decode(&clock_frame(ms, 10)).len(), 1);
        assert_eq!(decoder.decode(&clock_frame(ms, 10)).len(), 1);
    }

    #[test]
    fn test_clock_requires_exact_length() {
        let mut decoder = FrameDecoder::new();
        let readings = decoder.decode(&frame(ids::ID_CLOCK, &[0, 0, 0, 0, 0, 0, 0]));
        assert!(readings.is_empty());
    }

    #[test]
    fn test_clock_hour_beyond_rollover_is_dropped() {
        let mut decoder = FrameDecoder::new();
        // 25:00:00 is invalid even after the 24:00 wrap rule
        assert!(decoder.decode(&clock_frame(25 * 3600 * 1000, 0)).is_empty());
    }

    #[test]
    fn test_pressure_without_marker_is_ignored() {
        let mut decoder = FrameDecoder::new();
        let readings = decoder.decode(&frame(ids::ID_PRESSURE, &[0, 0, 0, 0, 0, 215, 0, 0]));
        assert!(readings.is_empty());
    }

    #[test]
    fn test_pressure_after_marker() {
        let mut decoder = FrameDecoder::new();
        let marker = frame(ids::ID_PRESSURE, &[0x41, 0x3F, 0x50, 0, 0, 0, 0, 0]);
        let sample = frame(ids::ID_PRESSURE, &[0, 0, 0, 0, 0, 215, 0, 0]);

        assert!(decoder.decode(&marker).is_empty());
        assert_eq!(decoder.decode(&sample), vec![Reading::Pressure(21.5)]);
        // The handshake disarms after one sample
        assert!(decoder.decode(&sample).is_empty());
    }

    #[test]
    fn test_repeated_marker_stays_armed() {
        let mut decoder = FrameDecoder::new();
        let marker = frame(ids::ID_PRESSURE, &[0x41, 0x3F, 0x50, 9, 9, 17, 9, 9]);
        let sample = frame(ids::ID_PRESSURE, &[0, 0, 0, 0, 0, 17, 0, 0]);

        assert!(decoder.decode(&marker).is_empty());
        assert!(decoder.decode(&marker).is_empty());
        assert_eq!(decoder.decode(&sample), vec![Reading::Pressure(1.7)]);
    }

    #[test]
    fn test_interleaved_traffic_keeps_pressure_armed() {
        let mut decoder = FrameDecoder::new();
        let marker = frame(ids::ID_PRESSURE, &[0x41, 0x3F, 0x50, 0, 0, 0, 0, 0]);
        let sample = frame(ids::ID_PRESSURE, &[0, 0, 0, 0, 0, 30, 0, 0]);

        assert!(decoder.decode(&marker).is_empty());
        assert_eq!(
            decoder.decode(&frame(ids::ID_OPERATING, &[50, 0, 0x10, 0, 0])).len(),
            2
        );
        assert!(decoder.decode(&frame(0x700, &[0; 8])).is_empty());
        assert_eq!(decoder.decode(&sample), vec![Reading::Pressure(3.0)]);
    }

    #[test]
    fn test_status_frame_pairs_description() {
        let mut decoder = FrameDecoder::new();
        assert_eq!(
            decoder.decode(&frame(ids::ID_STATUS, &[3])),
            vec![
                Reading::StatusId(3),
                Reading::StatusDescription("heat active")
            ]
        );
        assert_eq!(
            decoder.decode(&frame(ids::ID_STATUS, &[99])),
            vec![Reading::StatusId(99), Reading::StatusDescription("unknown")]
        );
    }
}
