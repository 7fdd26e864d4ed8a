//! Wire payload construction.

use crate::error::{Result, SeederError};
use crate::fleet::DeviceProfile;
use crate::signal::SignalGenerator;
use chrono::{DateTime, Duration, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A single published reading.
///
/// Field order matches the serialized JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Nanoseconds since the Unix epoch
    pub timestamp: i64,

    /// Message time shifted to local time, ISO-8601 without offset
    pub local_time: String,

    #[serde(rename = "deviceID")]
    pub device_id: u32,

    pub location: String,
    pub temperature: f64,
    pub pressure: f64,
    pub humidity: f64,
}

impl Payload {
    /// Serializes the payload as UTF-8 JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// Nanoseconds since the Unix epoch, computed without floating point.
pub fn timestamp_nanos(time: DateTime<Utc>) -> Result<i64> {
    time.timestamp_nanos_opt()
        .ok_or_else(|| SeederError::TimestampOutOfRange(time.to_rfc3339()))
}

/// Formats `time` shifted by `hours_from_utc` as `YYYY-MM-DDTHH:MM:SS[.ffffff]`.
/// The fraction is only present when the microsecond part is non-zero.
pub fn local_time_string(time: DateTime<Utc>, hours_from_utc: i32) -> String {
    let local = (time + Duration::hours(i64::from(hours_from_utc))).naive_utc();
    format_iso(&local)
}

fn format_iso(time: &NaiveDateTime) -> String {
    let micros = time.nanosecond() / 1_000;
    if micros == 0 {
        time.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        format!("{}.{:06}", time.format("%Y-%m-%dT%H:%M:%S"), micros)
    }
}

/// Builds payloads for devices at a given message time.
#[derive(Debug, Clone, Copy)]
pub struct PayloadBuilder {
    hours_from_utc: i32,
}

impl PayloadBuilder {
    pub fn new(hours_from_utc: i32) -> Self {
        Self { hours_from_utc }
    }

    pub fn build(
        &self,
        generator: &mut SignalGenerator,
        message_time: DateTime<Utc>,
        device: &DeviceProfile,
        sample_point: u32,
    ) -> Result<Payload> {
        let stamped = message_time + Duration::seconds(device.timestamp_skew);
        let measurement = generator.measure(sample_point, device);

        Ok(Payload {
            timestamp: timestamp_nanos(stamped)?,
            local_time: local_time_string(stamped, self.hours_from_utc),
            device_id: device.id,
            location: device.location.clone(),
            temperature: measurement.temperature,
            pressure: measurement.pressure,
            humidity: measurement.humidity,
        })
    }
}
