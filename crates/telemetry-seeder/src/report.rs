//! Run summary reporting.

use crate::config::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Summary of one seeding run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    // Configuration
    pub topic: String,
    pub devices: usize,
    pub sample_period_minutes: u32,
    pub history_start: DateTime<Utc>,
    pub history_end: DateTime<Utc>,

    // Results
    pub iterations: u64,
    pub messages_published: u64,
    pub bytes_published: u64,
    pub first_timestamp_ns: Option<i64>,
    pub last_timestamp_ns: Option<i64>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new(config: &Config, history_start: DateTime<Utc>, history_end: DateTime<Utc>) -> Self {
        Self {
            topic: config.publish.topic.clone(),
            devices: config.devices.len(),
            sample_period_minutes: config.sample_period_minutes(),
            history_start,
            history_end,
            iterations: 0,
            messages_published: 0,
            bytes_published: 0,
            first_timestamp_ns: None,
            last_timestamp_ns: None,
            elapsed: Duration::ZERO,
        }
    }

    pub fn record_message(&mut self, timestamp_ns: i64, bytes: usize) {
        self.messages_published += 1;
        self.bytes_published += bytes as u64;
        self.first_timestamp_ns.get_or_insert(timestamp_ns);
        self.last_timestamp_ns = Some(timestamp_ns);
    }

    pub fn messages_per_second(&self) -> f64 {
        if self.elapsed.as_secs_f64() > 0.0 {
            self.messages_published as f64 / self.elapsed.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Generates a JSON report.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Prints a summary to stdout.
    pub fn print_summary(&self) {
        println!("\n{}", "=".repeat(60));
        println!("SEED RESULTS");
        println!("{}", "=".repeat(60));

        println!(
            "\nTopic: {} | Devices: {} | Period: {} min",
            self.topic, self.devices, self.sample_period_minutes
        );
        println!(
            "History: {} .. {}",
            self.history_start.to_rfc3339(),
            self.history_end.to_rfc3339()
        );
        println!(
            "\n   Sample points: {}",
            format_number(self.iterations)
        );
        println!(
            "   Messages: {} ({:.1}/s)",
            format_number(self.messages_published),
            self.messages_per_second()
        );
        println!("   Bytes: {}", format_bytes(self.bytes_published));
        if let (Some(first), Some(last)) = (self.first_timestamp_ns, self.last_timestamp_ns) {
            println!("   Timestamps: {} .. {}", first, last);
        }
        println!("   Elapsed: {:.1}s", self.elapsed.as_secs_f64());

        println!("\n{}", "=".repeat(60));
    }
}

/// Formats a number with thousand separators.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Formats bytes in human-readable form.
fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn report() -> RunReport {
        let end = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        RunReport::new(&Config::default(), end - chrono::Duration::days(30), end)
    }

    #[test]
    fn test_record_message() {
        let mut report = report();
        assert_eq!(report.devices, 2);
        assert_eq!(report.sample_period_minutes, 60);

        report.record_message(10, 100);
        report.record_message(20, 120);
        report.record_message(30, 80);

        assert_eq!(report.messages_published, 3);
        assert_eq!(report.bytes_published, 300);
        assert_eq!(report.first_timestamp_ns, Some(10));
        assert_eq!(report.last_timestamp_ns, Some(30));
        assert_eq!(report.messages_per_second(), 0.0);
    }

    #[test]
    fn test_to_json() {
        let mut report = report();
        report.record_message(1_700_000_000_000_000_000, 150);
        let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
        assert_eq!(json["topic"], "timestream_test");
        assert_eq!(json["messages_published"], 1);
        assert_eq!(json["first_timestamp_ns"], 1_700_000_000_000_000_000i64);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(1440), "1,440");
        assert_eq!(format_number(1234567), "1,234,567");
    }

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(1048576), "1.00 MB");
    }
}
