//! Simulated device table.

use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

/// One simulated device and the per-device adjustments applied to its data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Identifier written to the `deviceID` field
    pub id: u32,

    /// Location label written to the `location` field
    pub location: String,

    /// Phase shift of the waveform in radians
    #[serde(default)]
    pub phase_offset: f64,

    /// Seconds added to the message time before stamping.
    /// Keeps devices sharing a sample point from colliding on timestamp.
    #[serde(default)]
    pub timestamp_skew: i64,
}

impl DeviceProfile {
    pub fn new(id: u32, location: impl Into<String>) -> Self {
        Self {
            id,
            location: location.into(),
            phase_offset: 0.0,
            timestamp_skew: 0,
        }
    }

    pub fn with_phase_offset(mut self, radians: f64) -> Self {
        self.phase_offset = radians;
        self
    }

    pub fn with_timestamp_skew(mut self, seconds: i64) -> Self {
        self.timestamp_skew = seconds;
        self
    }
}

/// The default pair of devices: the second one runs 90° ahead and one
/// second late so the two plots stay distinguishable.
pub fn default_fleet() -> Vec<DeviceProfile> {
    vec![
        DeviceProfile::new(0, "location1"),
        DeviceProfile::new(1, "location2")
            .with_phase_offset(FRAC_PI_2)
            .with_timestamp_skew(1),
    ]
}

/// Builds `count` devices, spreading phase offsets evenly over a quarter
/// turn per device and skewing each timestamp by its index.
pub fn generate_fleet(count: usize) -> Vec<DeviceProfile> {
    (0..count)
        .map(|i| {
            DeviceProfile::new(i as u32, format!("location{}", i + 1))
                .with_phase_offset(i as f64 * FRAC_PI_2)
                .with_timestamp_skew(i as i64)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fleet() {
        let fleet = default_fleet();
        assert_eq!(fleet.len(), 2);

        assert_eq!(fleet[0].id, 0);
        assert_eq!(fleet[0].location, "location1");
        assert_eq!(fleet[0].phase_offset, 0.0);
        assert_eq!(fleet[0].timestamp_skew, 0);

        assert_eq!(fleet[1].id, 1);
        assert_eq!(fleet[1].location, "location2");
        assert_eq!(fleet[1].phase_offset, FRAC_PI_2);
        assert_eq!(fleet[1].timestamp_skew, 1);
    }

    #[test]
    fn test_generated_fleet_matches_default_prefix() {
        let fleet = generate_fleet(4);
        assert_eq!(fleet.len(), 4);
        assert_eq!(&fleet[..2], default_fleet().as_slice());
        assert_eq!(fleet[3].location, "location4");
        assert_eq!(fleet[3].timestamp_skew, 3);
    }

    #[test]
    fn test_profile_yaml_defaults() {
        let profile: DeviceProfile = serde_yaml::from_str("id: 7\nlocation: roof\n").unwrap();
        assert_eq!(profile, DeviceProfile::new(7, "roof"));
    }
}
