pub mod camera;
pub mod command;
pub mod doctor;
pub mod emulator;
pub mod error;
pub mod gimbal;
pub mod handlers;
pub mod registry;
pub mod service;
pub mod types;
pub mod zoom;

use serde::Deserialize;

pub use emulator::CameraEmulator;
pub use error::{CameraError, HandlerResult};
use gimbal::AdapterType;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct EmulatorConfig {
    pub camera: CameraConfig,
    pub zoom: ZoomConfig,
    pub tap_zoom: TapZoomConfig,
    pub tick: TickConfig,
    pub aircraft: AircraftConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Emulated card capacity
    pub sd_total_mb: u32,
    pub photo_mb: u32,
    pub record_mb_per_second: u32,

    /// Time a single capture stays in flight before it is stored
    pub photo_capture_ms: u32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            sd_total_mb: 32 * 1024,
            photo_mb: 4,
            record_mb_per_second: 2,
            photo_capture_ms: 500,
        }
    }
}

/// Focal lengths and sensor dimensions are in units of 0.1mm.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ZoomConfig {
    pub optical_min: u16,
    pub optical_max: u16,
    pub optical_step: u16,

    /// Optical change per 10Hz step at the slowest continuous speed
    pub optical_ctrl_step: u16,

    pub digital_step: f32,
    pub digital_max: f32,

    pub sensor_width: f32,
    pub sensor_height: f32,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            optical_min: 10,
            optical_max: 300,
            optical_step: 10,
            optical_ctrl_step: 5,
            digital_step: 0.1,
            digital_max: 6.0,
            sensor_width: 88.0,
            sensor_height: 66.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TapZoomConfig {
    /// How long one tap zoom cycle blocks the next
    pub duration_ms: u64,
    pub enabled: bool,
    pub multiplier: u8,
}

impl Default for TapZoomConfig {
    fn default() -> Self {
        Self { duration_ms: 2000, enabled: false, multiplier: 1 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    pub base_hz: u32,
    pub zoom_hz: u32,
    pub slow_hz: u32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { base_hz: 100, zoom_hz: 10, slow_hz: 1 }
    }
}

impl TickConfig {
    pub fn base_period_ms(&self) -> u64 {
        1000 / self.base_hz.max(1) as u64
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AircraftConfig {
    pub adapter: AdapterType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_emulator_defaults() {
        let cfg: EmulatorConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.camera.sd_total_mb, 32768);
        assert_eq!(cfg.zoom.optical_max, 300);
        assert_eq!(cfg.tap_zoom.duration_ms, 2000);
        assert_eq!(cfg.tick.base_period_ms(), 10);
        assert_eq!(cfg.aircraft.adapter, AdapterType::SkyportV2);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let cfg: EmulatorConfig = toml::from_str(
            r#"
            [zoom]
            optical_max = 200

            [tap_zoom]
            enabled = true
            multiplier = 2

            [aircraft]
            adapter = "xport"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.zoom.optical_max, 200);
        assert_eq!(cfg.zoom.optical_min, 10);
        assert!(cfg.tap_zoom.enabled);
        assert_eq!(cfg.tap_zoom.multiplier, 2);
        assert_eq!(cfg.aircraft.adapter, AdapterType::XPort);
    }
}
