//! Sensor waveform generator.
//!
//! Each reading is a median plus one shared offset: a daily sine wave
//! with a small integer jitter on top. Temperature, humidity and pressure
//! therefore move in lockstep.

use crate::config::SignalConfig;
use crate::fleet::DeviceProfile;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// One set of sensor readings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

/// Phase angle in radians for a sample point within a day of
/// `samples_per_day` points, shifted by the device's phase offset.
pub fn phase_angle(sample_point: u32, samples_per_day: u32, device: &DeviceProfile) -> f64 {
    TAU * f64::from(sample_point) / f64::from(samples_per_day.max(1)) + device.phase_offset
}

/// Generates measurements for a device at a given sample point.
pub struct SignalGenerator {
    config: SignalConfig,
    samples_per_day: u32,
    rng: StdRng,
}

impl SignalGenerator {
    /// Creates a generator. A seed makes the jitter sequence reproducible.
    pub fn new(config: SignalConfig, samples_per_day: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            samples_per_day,
            rng,
        }
    }

    /// Draws the shared offset for one reading.
    pub fn offset(&mut self, sample_point: u32, device: &DeviceProfile) -> f64 {
        let rads = phase_angle(sample_point, self.samples_per_day, device);
        let jitter = self
            .rng
            .gen_range(self.config.jitter_min..self.config.jitter_max);
        self.config.amplitude * rads.sin() + jitter as f64 + self.config.epsilon
    }

    pub fn measure(&mut self, sample_point: u32, device: &DeviceProfile) -> Measurement {
        let offset = self.offset(sample_point, device);
        Measurement {
            temperature: self.config.temperature_median + offset,
            humidity: self.config.humidity_median + offset,
            pressure: self.config.pressure_median + offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::default_fleet;
    use std::f64::consts::FRAC_PI_2;

    fn generator(seed: u64) -> SignalGenerator {
        SignalGenerator::new(SignalConfig::default(), 24, Some(seed))
    }

    #[test]
    fn test_shared_offset() {
        let fleet = default_fleet();
        let mut gen = generator(42);
        let cfg = SignalConfig::default();

        for sample_point in 0..48 {
            for device in &fleet {
                let m = gen.measure(sample_point % 24, device);
                let t = m.temperature - cfg.temperature_median;
                let h = m.humidity - cfg.humidity_median;
                let p = m.pressure - cfg.pressure_median;
                // Same offset, up to the rounding of adding it to different medians
                assert!((t - h).abs() < 1e-9);
                assert!((p - h).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_offset_bounds() {
        let fleet = default_fleet();
        let mut gen = generator(7);

        for sample_point in 0..24 {
            for device in &fleet {
                let offset = gen.offset(sample_point, device);
                // sin in [-1, 1], jitter in 1..=4, plus epsilon
                assert!(offset >= 0.001 - 1e-12, "offset {}", offset);
                assert!(offset <= 5.0 + 0.001 + 1e-12, "offset {}", offset);
                assert_ne!(offset.fract(), 0.0);
            }
        }
    }

    #[test]
    fn test_phase_offset_between_devices() {
        let fleet = default_fleet();
        for sample_point in 0..24 {
            let a = phase_angle(sample_point, 24, &fleet[0]);
            let b = phase_angle(sample_point, 24, &fleet[1]);
            assert!((b - a - FRAC_PI_2).abs() < 1e-12);
        }
        assert!((phase_angle(6, 24, &fleet[0]) - FRAC_PI_2).abs() < 1e-12);
        assert_eq!(phase_angle(0, 24, &fleet[0]), 0.0);
    }

    #[test]
    fn test_seeded_generators_agree() {
        let device = &default_fleet()[0];
        let mut a = generator(99);
        let mut b = generator(99);
        for sample_point in 0..24 {
            assert_eq!(a.measure(sample_point, device), b.measure(sample_point, device));
        }
    }

    #[test]
    fn test_zero_epsilon_and_amplitude_is_integral() {
        let config = SignalConfig {
            amplitude: 0.0,
            epsilon: 0.0,
            ..Default::default()
        };
        let mut gen = SignalGenerator::new(config, 24, Some(1));
        let offset = gen.offset(3, &default_fleet()[0]);
        assert_eq!(offset.fract(), 0.0);
        assert!((1.0..5.0).contains(&offset));
    }
}
