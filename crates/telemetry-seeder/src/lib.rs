//! Synthetic sensor history generator.
//!
//! Fabricates temperature, humidity and pressure readings for a small fleet
//! of simulated devices over a historical window and publishes each reading
//! as a JSON message to a telemetry ingestion endpoint. Intended for seeding
//! a time series store with plausible demo data.
//!
//! # Signal
//! Every reading is `median + amplitude * sin(phase) + jitter + epsilon`,
//! with one sine period per simulated day and a per-device phase offset.
//!
//! # Usage
//! ```bash
//! # Publish 30 days of hourly data through a directory lookup
//! telemetry-seeder publish --directory-url https://iot.example.com
//!
//! # Publish to a known endpoint
//! telemetry-seeder publish --endpoint abc-ats.iot.example.com --days 7
//!
//! # Print payloads without publishing
//! telemetry-seeder preview --days 1 --limit 10
//! ```

pub mod config;
pub mod endpoint;
pub mod error;
pub mod fleet;
pub mod payload;
pub mod publisher;
pub mod report;
pub mod signal;
pub mod workload;

pub use config::{Config, EndpointConfig, PublishConfig, SignalConfig};
pub use endpoint::{resolver_from_config, DirectoryResolver, EndpointResolver, StaticResolver};
pub use error::{Result, SeederError};
pub use fleet::{default_fleet, generate_fleet, DeviceProfile};
pub use payload::{Payload, PayloadBuilder};
pub use publisher::{DryRunPublisher, HttpPublisher, Publisher, QoS};
pub use report::RunReport;
pub use signal::{Measurement, SignalGenerator};
pub use workload::{run_seeder, SampleClock, Tick};
