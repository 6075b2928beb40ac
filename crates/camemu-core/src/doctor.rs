use anyhow::Result;
use tracing::warn;

use crate::gimbal::AdapterType;
use crate::{CameraConfig, EmulatorConfig, TapZoomConfig, TickConfig, ZoomConfig};

pub fn check_config(cfg: &EmulatorConfig) -> Result<()> {
    check_tick(&cfg.tick)?;
    check_camera(&cfg.camera)?;
    check_zoom(&cfg.zoom)?;
    check_tap_zoom(&cfg.tap_zoom)?;
    if cfg.aircraft.adapter == AdapterType::Unknown {
        warn!("aircraft.adapter is unknown: tap zoom will not rotate the gimbal");
    }
    Ok(())
}

pub fn check_tick(tick: &TickConfig) -> Result<()> {
    anyhow::ensure!(tick.slow_hz > 0, "tick.slow_hz must be > 0");
    anyhow::ensure!(tick.zoom_hz >= tick.slow_hz, "tick.zoom_hz below tick.slow_hz");
    anyhow::ensure!(tick.base_hz >= tick.zoom_hz, "tick.base_hz below tick.zoom_hz");
    anyhow::ensure!(tick.base_hz <= 1000, "tick.base_hz above 1000");
    anyhow::ensure!(
        tick.base_hz % tick.zoom_hz == 0 && tick.base_hz % tick.slow_hz == 0,
        "tick.base_hz should be a multiple of zoom_hz and slow_hz"
    );
    Ok(())
}

pub fn check_camera(cam: &CameraConfig) -> Result<()> {
    anyhow::ensure!(cam.photo_mb > 0, "camera.photo_mb must be > 0");
    anyhow::ensure!(cam.record_mb_per_second > 0, "camera.record_mb_per_second must be > 0");
    anyhow::ensure!(cam.sd_total_mb >= cam.photo_mb, "camera.sd_total_mb smaller than one photo");
    Ok(())
}

pub fn check_zoom(zoom: &ZoomConfig) -> Result<()> {
    anyhow::ensure!(zoom.optical_min > 0, "zoom.optical_min must be > 0");
    anyhow::ensure!(zoom.optical_min < zoom.optical_max, "zoom.optical_min must be below optical_max");
    anyhow::ensure!(zoom.optical_ctrl_step > 0, "zoom.optical_ctrl_step must be > 0");
    anyhow::ensure!(zoom.digital_max >= 1.0, "zoom.digital_max must be >= 1.0");
    anyhow::ensure!(zoom.digital_step > 0.0, "zoom.digital_step must be > 0");
    anyhow::ensure!(
        zoom.sensor_width > 0.0 && zoom.sensor_height > 0.0,
        "zoom sensor size must be positive"
    );
    Ok(())
}

pub fn check_tap_zoom(tap: &TapZoomConfig) -> Result<()> {
    anyhow::ensure!(tap.multiplier >= 1, "tap_zoom.multiplier must be >= 1");
    anyhow::ensure!(tap.duration_ms >= 100, "tap_zoom.duration_ms too short for the 10Hz step");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_pass() {
        assert!(check_config(&EmulatorConfig::default()).is_ok());
    }

    #[test]
    fn rejects_inverted_rates() {
        let tick = TickConfig { base_hz: 10, zoom_hz: 20, slow_hz: 1 };
        assert!(check_tick(&tick).is_err());
        let tick = TickConfig { base_hz: 100, zoom_hz: 30, slow_hz: 1 };
        assert!(check_tick(&tick).is_err());
    }

    #[test]
    fn rejects_bad_zoom_range() {
        let zoom = ZoomConfig { optical_min: 300, optical_max: 10, ..ZoomConfig::default() };
        assert!(check_zoom(&zoom).is_err());
        let zoom = ZoomConfig { digital_max: 0.5, ..ZoomConfig::default() };
        assert!(check_zoom(&zoom).is_err());
    }

    #[test]
    fn rejects_zero_multiplier() {
        let tap = TapZoomConfig { multiplier: 0, ..TapZoomConfig::default() };
        assert!(check_tap_zoom(&tap).is_err());
    }
}
