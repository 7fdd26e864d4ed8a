//! Publisher loop orchestration.

use crate::config::Config;
use crate::error::{Result, SeederError};
use crate::payload::{timestamp_nanos, PayloadBuilder};
use crate::publisher::{Publisher, QoS};
use crate::report::RunReport;
use crate::signal::SignalGenerator;
use chrono::{DateTime, Duration, Utc};
use std::time::Instant;
use tracing::{debug, info};

/// One step of the sample clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub message_time: DateTime<Utc>,
    pub sample_point: u32,
}

/// Walks message time from `now - history` to `now` in fixed steps while
/// cycling the sample point through `[0, samples_per_day)`.
///
/// The end time is captured once at construction. Construction fails when
/// the start cannot be represented as a nanosecond timestamp.
#[derive(Debug, Clone)]
pub struct SampleClock {
    message_time: DateTime<Utc>,
    end: DateTime<Utc>,
    period: Duration,
    sample_point: u32,
    samples_per_day: u32,
}

impl SampleClock {
    pub fn new(
        now: DateTime<Utc>,
        history: Duration,
        period: Duration,
        samples_per_day: u32,
    ) -> Result<Self> {
        let start = now.checked_sub_signed(history).ok_or_else(|| {
            SeederError::TimestampOutOfRange(format!(
                "{} minus {} days",
                now.to_rfc3339(),
                history.num_days()
            ))
        })?;
        timestamp_nanos(start)?;

        let samples_per_day = samples_per_day.max(1);
        Ok(Self {
            message_time: start,
            end: now,
            period,
            // Starts at 1, not 0
            sample_point: 1 % samples_per_day,
            samples_per_day,
        })
    }

    pub fn from_config(config: &Config, now: DateTime<Utc>) -> Result<Self> {
        Self::new(
            now,
            config.history(),
            config.sample_period(),
            config.samples_per_day,
        )
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.message_time
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

impl Iterator for SampleClock {
    type Item = Tick;

    fn next(&mut self) -> Option<Tick> {
        if self.message_time >= self.end || self.period <= Duration::zero() {
            return None;
        }

        let tick = Tick {
            message_time: self.message_time,
            sample_point: self.sample_point,
        };

        self.message_time += self.period;
        self.sample_point = (self.sample_point + 1) % self.samples_per_day;

        Some(tick)
    }
}

/// Console line printed for each published message. `count` starts at 1.
pub fn diagnostic_line(count: u64, payload: &[u8]) -> String {
    format!("added[{}]: {}", count, String::from_utf8_lossy(payload))
}

/// Generates the configured history and publishes every reading.
///
/// Messages go out strictly in order: every device in table order for one
/// sample point, then the next sample point. The first failure aborts the
/// run.
pub async fn run_seeder<P>(
    config: &Config,
    generator: &mut SignalGenerator,
    publisher: &mut P,
    now: DateTime<Utc>,
) -> Result<RunReport>
where
    P: Publisher + ?Sized,
{
    config.validate()?;
    let qos = QoS::try_from(config.publish.qos)?;
    let topic = config.publish.topic.as_str();
    let builder = PayloadBuilder::new(config.hours_from_utc);
    let clock = SampleClock::from_config(config, now)?;

    info!(
        "Seeding {} days of history for {} devices from {} ({} minute period)",
        config.days,
        config.devices.len(),
        clock.start(),
        config.sample_period_minutes()
    );
    info!(
        "Expecting {} messages on topic '{}'",
        config.expected_messages(),
        topic
    );

    let mut report = RunReport::new(config, clock.start(), clock.end());
    let started = Instant::now();
    let mut count: u64 = 1;

    'ticks: for tick in clock {
        for device in &config.devices {
            if config
                .publish
                .max_messages
                .is_some_and(|max| report.messages_published >= max)
            {
                info!("Message limit reached, stopping early");
                break 'ticks;
            }

            let payload = builder.build(generator, tick.message_time, device, tick.sample_point)?;
            let bytes = payload.to_bytes()?;

            publisher.publish(topic, qos, &bytes).await?;

            println!("{}", diagnostic_line(count, &bytes));
            debug!(
                count,
                device = device.id,
                sample_point = tick.sample_point,
                timestamp = payload.timestamp,
                "published"
            );

            report.record_message(payload.timestamp, bytes.len());
            count += 1;
        }

        report.iterations += 1;

        if !config.publish.pace.is_zero() {
            tokio::time::sleep(config.publish.pace).await;
        }
    }

    report.elapsed = started.elapsed();
    info!(
        "Published {} messages in {:.1}s",
        report.messages_published,
        report.elapsed.as_secs_f64()
    );

    Ok(report)
}
