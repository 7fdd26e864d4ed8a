//! Configuration structs for the telemetry seeder.

use crate::error::{Result, SeederError};
use crate::fleet::{default_fleet, DeviceProfile};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Longest history whose start still has a nanosecond timestamp for any
/// current time after 1970 (nanosecond timestamps begin in 1677).
pub const MAX_HISTORY_DAYS: u32 = 106_751;

/// Main configuration for the seeder.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Days of history to generate, ending at the current time
    pub days: u32,

    /// Samples per simulated day; one full sine period per day
    pub samples_per_day: u32,

    /// Offset applied to UTC when rendering `local_time`
    pub hours_from_utc: i32,

    /// Simulated devices, published in table order at each sample point
    pub devices: Vec<DeviceProfile>,

    /// Waveform configuration
    pub signal: SignalConfig,

    /// Endpoint resolution
    pub endpoint: EndpointConfig,

    /// Publish configuration
    pub publish: PublishConfig,

    /// RNG seed for reproducible runs
    pub seed: Option<u64>,

    /// Output file for the JSON run report (optional)
    pub output_file: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            days: 30,
            samples_per_day: 24,
            hours_from_utc: -8,
            devices: default_fleet(),
            signal: SignalConfig::default(),
            endpoint: EndpointConfig::default(),
            publish: PublishConfig::default(),
            seed: None,
            output_file: None,
        }
    }
}

impl Config {
    /// Loads a YAML config file. Keys missing from the file keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Minutes between consecutive sample points, truncated to whole minutes.
    pub fn sample_period_minutes(&self) -> u32 {
        MINUTES_PER_DAY / self.samples_per_day.max(1)
    }

    pub fn sample_period(&self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.sample_period_minutes()))
    }

    pub fn history(&self) -> chrono::Duration {
        chrono::Duration::days(i64::from(self.days))
    }

    /// Number of loop iterations needed to walk the history window.
    pub fn expected_iterations(&self) -> u64 {
        let total_minutes = u64::from(self.days) * u64::from(MINUTES_PER_DAY);
        let period = u64::from(self.sample_period_minutes()).max(1);
        total_minutes.div_ceil(period)
    }

    /// Number of messages a full run publishes.
    pub fn expected_messages(&self) -> u64 {
        self.expected_iterations() * self.devices.len() as u64
    }

    pub fn validate(&self) -> Result<()> {
        if self.samples_per_day == 0 {
            return Err(SeederError::Config(
                "samples_per_day must be at least 1".to_string(),
            ));
        }
        if self.samples_per_day > MINUTES_PER_DAY {
            return Err(SeederError::Config(format!(
                "samples_per_day cannot exceed {} (sample period would be under a minute)",
                MINUTES_PER_DAY
            )));
        }
        if self.days > MAX_HISTORY_DAYS {
            return Err(SeederError::Config(format!(
                "days cannot exceed {} (start would predate nanosecond timestamps)",
                MAX_HISTORY_DAYS
            )));
        }
        if self.devices.is_empty() {
            return Err(SeederError::Config("at least one device is required".to_string()));
        }
        if self.publish.topic.is_empty() {
            return Err(SeederError::Config("topic cannot be empty".to_string()));
        }
        if self.signal.jitter_min >= self.signal.jitter_max {
            return Err(SeederError::Config(format!(
                "jitter range [{}, {}) is empty",
                self.signal.jitter_min, self.signal.jitter_max
            )));
        }
        Ok(())
    }
}

/// Waveform parameters shared by all devices.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    pub temperature_median: f64,
    pub humidity_median: f64,
    pub pressure_median: f64,

    /// Sine amplitude added on top of each median
    pub amplitude: f64,

    /// Integer jitter drawn from `jitter_min..jitter_max`
    pub jitter_min: i64,
    pub jitter_max: i64,

    /// Added to every offset so the first writes never look integral.
    /// Only matters for stores that infer column types from the first value.
    pub epsilon: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            temperature_median: 72.0,
            humidity_median: 50.0,
            pressure_median: 29.0,
            amplitude: 1.0,
            jitter_min: 1,
            jitter_max: 5,
            epsilon: 0.001,
        }
    }
}

/// Where to find the ingestion endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    /// Fixed endpoint address; skips the directory lookup when set
    pub address: Option<String>,

    /// Base URL of the directory service answering endpoint lookups
    pub directory_url: Option<String>,

    /// Endpoint type requested from the directory
    pub endpoint_type: EndpointType,
}

/// Endpoint types known to the directory service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndpointType {
    /// Accelerated data plane
    #[default]
    #[serde(rename = "iot:Data-ATS")]
    DataAts,
    /// Legacy data plane
    #[serde(rename = "iot:Data")]
    Data,
}

impl EndpointType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndpointType::DataAts => "iot:Data-ATS",
            EndpointType::Data => "iot:Data",
        }
    }
}

/// Configuration for publishing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Topic every message is published to
    pub topic: String,

    /// Quality-of-service level
    pub qos: u8,

    /// URL scheme for the data-plane endpoint
    pub scheme: String,

    /// Delay after each sample point
    #[serde(with = "duration_millis")]
    pub pace: Duration,

    /// Request timeout
    #[serde(with = "duration_millis")]
    pub timeout: Duration,

    /// Stop after this many messages
    pub max_messages: Option<u64>,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            topic: "timestream_test".to_string(),
            qos: 1,
            scheme: "https".to_string(),
            pace: Duration::from_secs(1),
            timeout: Duration::from_secs(30),
            max_messages: None,
        }
    }
}

/// Durations are written as integer milliseconds in config files.
mod duration_millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_millis() as u64)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
