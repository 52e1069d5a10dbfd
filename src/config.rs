use anyhow::Context;
use buttons::Level;
use serde::{Deserialize, Serialize};
use spin::{SessionTiming, StepperSettings};
use std::fs;
use std::path::Path;
use zones::{Zone, ZoneTable, DEFAULT_TRACK_SIZE};

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub device: DeviceConfig,
    pub track: TrackConfig,
    pub motor: MotorConfig,
    pub input: InputConfig,
    pub power: PowerConfig,
    pub timing: TimingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackConfig {
    pub steps: u32,
    pub zones: Vec<Zone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotorConfig {
    pub microsteps: u32,
    pub pulse_high_us: u32,
    pub pulse_interval_us: u32,
    pub wake_us: u32,
    pub forward_high: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub trigger_active_low: bool,
    pub home_active_low: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PowerConfig {
    pub light_sleep: bool,
    pub poll_ms: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub settle_ms: u32,
    pub release_poll_ms: u32,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        DeviceConfig {
            name: "roulette".into(),
        }
    }
}

impl Default for TrackConfig {
    fn default() -> Self {
        let stock = ZoneTable::stock();
        TrackConfig {
            steps: DEFAULT_TRACK_SIZE,
            zones: stock.zones().to_vec(),
        }
    }
}

impl Default for MotorConfig {
    fn default() -> Self {
        let s = StepperSettings::default();
        MotorConfig {
            microsteps: s.microsteps,
            pulse_high_us: s.pulse_high_us,
            pulse_interval_us: s.pulse_interval_us,
            wake_us: s.wake_us,
            forward_high: s.forward_high,
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            trigger_active_low: true,
            home_active_low: true,
        }
    }
}

impl Default for PowerConfig {
    fn default() -> Self {
        PowerConfig {
            light_sleep: true,
            poll_ms: 20,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        let t = SessionTiming::default();
        TimingConfig {
            settle_ms: t.settle_ms,
            release_poll_ms: t.release_poll_ms,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        // Try external file first
        if Path::new(CONFIG_PATH).exists() {
            let config_content = fs::read_to_string(CONFIG_PATH)?;
            let config = Self::parse(&config_content)
                .with_context(|| format!("failed to parse {}", CONFIG_PATH))?;
            log::info!("Loaded configuration from file");
            Ok(config)
        } else {
            // Fallback to embedded defaults
            let config = Self::parse(include_str!("../config.toml.example"))
                .context("failed to parse embedded configuration")?;
            log::warn!("Using embedded default configuration");
            Ok(config)
        }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validated zone table. Any defect here must stop the firmware before
    /// the motor is energized.
    pub fn zone_table(&self) -> anyhow::Result<ZoneTable> {
        ZoneTable::new(self.track.steps, self.track.zones.clone())
            .with_context(|| format!("zone table of device {:?} rejected", self.device.name))
    }
}

// Helper functions for easy access
impl Config {
    pub fn get_device_name(&self) -> &str {
        &self.device.name
    }

    pub fn get_track_size(&self) -> u32 {
        self.track.steps
    }

    pub fn stepper_settings(&self) -> StepperSettings {
        StepperSettings {
            microsteps: self.motor.microsteps,
            pulse_high_us: self.motor.pulse_high_us,
            pulse_interval_us: self.motor.pulse_interval_us,
            wake_us: self.motor.wake_us,
            forward_high: self.motor.forward_high,
        }
    }

    pub fn session_timing(&self) -> SessionTiming {
        SessionTiming {
            settle_ms: self.timing.settle_ms,
            release_poll_ms: self.timing.release_poll_ms,
        }
    }

    pub fn trigger_level(&self) -> Level {
        level(self.input.trigger_active_low)
    }

    pub fn home_level(&self) -> Level {
        level(self.input.home_active_low)
    }
}

fn level(active_low: bool) -> Level {
    if active_low {
        Level::Low
    } else {
        Level::High
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zones::{Defect, Error};

    #[test]
    fn embedded_example_matches_defaults() {
        let parsed = Config::parse(include_str!("../config.toml.example")).unwrap();
        assert_eq!(parsed, Config::default());
        assert_eq!(parsed.zone_table().unwrap(), ZoneTable::stock());
    }

    #[test]
    fn missing_sections_fall_back() {
        let config = Config::parse(
            r#"
            [track]
            steps = 400
            zones = [{ start = 10, end = 20 }, { start = 300, end = 399 }]
            "#,
        )
        .unwrap();
        assert_eq!(config.get_track_size(), 400);
        assert_eq!(config.motor, MotorConfig::default());
        assert_eq!(config.session_timing(), SessionTiming::default());
        let table = config.zone_table().unwrap();
        assert_eq!(table.first_zone(), Zone::new(10, 20));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn end_at_track_size_refuses_to_start() {
        let config = Config::parse(
            r#"
            [track]
            steps = 200
            zones = [
                { start = 0, end = 3 },
                { start = 48, end = 53 },
                { start = 98, end = 103 },
                { start = 148, end = 153 },
                { start = 198, end = 200 },
            ]
            "#,
        )
        .unwrap();
        let err = config.zone_table().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<Error>(),
            Some(Error::ConfigInvalid(Defect::OutOfBounds { index: 4, .. }))
        ));
    }

    #[test]
    fn overlapping_zones_refuse_to_start() {
        let config = Config::parse(
            r#"
            [track]
            steps = 200
            zones = [{ start = 40, end = 60 }, { start = 50, end = 70 }]
            "#,
        )
        .unwrap();
        assert!(config.zone_table().is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(Config::parse("[track]\nsteps = \"many\"").is_err());
    }

    #[test]
    fn input_levels() {
        let config = Config::parse(
            r#"
            [input]
            trigger_active_low = false
            home_active_low = true
            "#,
        )
        .unwrap();
        assert_eq!(config.trigger_level(), Level::High);
        assert_eq!(config.home_level(), Level::Low);
    }

    #[test]
    fn stepper_settings_follow_motor_section() {
        let config = Config::parse("[motor]\nmicrosteps = 32\nforward_high = false").unwrap();
        let settings = config.stepper_settings();
        assert_eq!(settings.microsteps, 32);
        assert!(!settings.forward_high);
        assert_eq!(settings.wake_us, StepperSettings::default().wake_us);
    }
}
