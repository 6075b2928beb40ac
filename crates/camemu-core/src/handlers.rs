//! Capability interfaces the payload framework calls into, one trait per vendor
//! handler group, and their implementation on [`CameraEmulator`].

use crate::camera::FOCUS_RING_UPPER_BOUND;
use crate::emulator::CameraEmulator;
use crate::error::HandlerResult;
use crate::types::*;

pub trait CommonHandler: Send + Sync {
    fn system_state(&self) -> HandlerResult<CameraSystemState>;
    fn set_mode(&self, mode: CameraMode) -> HandlerResult<()>;
    fn mode(&self) -> HandlerResult<CameraMode>;
    fn start_record_video(&self) -> HandlerResult<()>;
    fn stop_record_video(&self) -> HandlerResult<()>;
    fn start_shoot_photo(&self) -> HandlerResult<()>;
    fn stop_shoot_photo(&self) -> HandlerResult<()>;
    fn set_shoot_photo_mode(&self, mode: ShootPhotoMode) -> HandlerResult<()>;
    fn shoot_photo_mode(&self) -> HandlerResult<ShootPhotoMode>;
    fn set_photo_burst_count(&self, count: BurstCount) -> HandlerResult<()>;
    fn photo_burst_count(&self) -> HandlerResult<BurstCount>;
    fn set_photo_time_interval_settings(&self, settings: IntervalSettings) -> HandlerResult<()>;
    fn photo_time_interval_settings(&self) -> HandlerResult<IntervalSettings>;
    fn sd_card_state(&self) -> HandlerResult<SdCardState>;
    fn format_sd_card(&self) -> HandlerResult<()>;
}

pub trait ExposureMeteringHandler: Send + Sync {
    fn set_metering_mode(&self, mode: MeteringMode) -> HandlerResult<()>;
    fn metering_mode(&self) -> HandlerResult<MeteringMode>;
    fn set_spot_metering_target(&self, target: SpotMeteringTarget) -> HandlerResult<()>;
    fn spot_metering_target(&self) -> HandlerResult<SpotMeteringTarget>;
}

pub trait FocusHandler: Send + Sync {
    fn set_focus_mode(&self, mode: FocusMode) -> HandlerResult<()>;
    fn focus_mode(&self) -> HandlerResult<FocusMode>;
    fn set_focus_target(&self, target: PointInScreen) -> HandlerResult<()>;
    fn focus_target(&self) -> HandlerResult<PointInScreen>;
    fn set_focus_assistant_settings(&self, settings: FocusAssistantSettings) -> HandlerResult<()>;
    fn focus_assistant_settings(&self) -> HandlerResult<FocusAssistantSettings>;
    fn focus_ring_value_upper_bound(&self) -> HandlerResult<u16>;
    fn set_focus_ring_value(&self, value: u16) -> HandlerResult<()>;
    fn focus_ring_value(&self) -> HandlerResult<u16>;
}

pub trait DigitalZoomHandler: Send + Sync {
    fn set_digital_zoom_factor(&self, factor: f32) -> HandlerResult<()>;
}

pub trait OpticalZoomHandler: Send + Sync {
    fn set_optical_zoom_focal_length(&self, focal_length: u16) -> HandlerResult<()>;
    fn optical_zoom_focal_length(&self) -> HandlerResult<u16>;
    fn optical_zoom_spec(&self) -> HandlerResult<OpticalZoomSpec>;
    fn start_continuous_optical_zoom(&self, direction: ZoomDirection, speed: ZoomSpeed) -> HandlerResult<()>;
    fn stop_continuous_optical_zoom(&self) -> HandlerResult<()>;
}

pub trait TapZoomHandler: Send + Sync {
    fn tap_zoom_state(&self) -> HandlerResult<TapZoomState>;
    fn set_tap_zoom_enabled(&self, enabled: bool) -> HandlerResult<()>;
    fn tap_zoom_enabled(&self) -> HandlerResult<bool>;
    fn set_tap_zoom_multiplier(&self, multiplier: u8) -> HandlerResult<()>;
    fn tap_zoom_multiplier(&self) -> HandlerResult<u8>;
    fn tap_zoom_at_target(&self, target: PointInScreen) -> HandlerResult<()>;
}

impl CommonHandler for CameraEmulator {
    fn system_state(&self) -> HandlerResult<CameraSystemState> {
        Ok(self.camera()?.system_state())
    }

    fn set_mode(&self, mode: CameraMode) -> HandlerResult<()> {
        self.camera()?.set_mode(mode);
        Ok(())
    }

    fn mode(&self) -> HandlerResult<CameraMode> {
        Ok(self.camera()?.mode())
    }

    fn start_record_video(&self) -> HandlerResult<()> {
        self.camera()?.start_record()
    }

    fn stop_record_video(&self) -> HandlerResult<()> {
        self.camera()?.stop_record()
    }

    fn start_shoot_photo(&self) -> HandlerResult<()> {
        self.camera()?.start_shoot();
        Ok(())
    }

    fn stop_shoot_photo(&self) -> HandlerResult<()> {
        self.camera()?.stop_shoot();
        Ok(())
    }

    fn set_shoot_photo_mode(&self, mode: ShootPhotoMode) -> HandlerResult<()> {
        self.camera()?.set_shoot_mode(mode);
        Ok(())
    }

    fn shoot_photo_mode(&self) -> HandlerResult<ShootPhotoMode> {
        Ok(self.camera()?.shoot_mode())
    }

    fn set_photo_burst_count(&self, count: BurstCount) -> HandlerResult<()> {
        self.camera()?.set_burst_count(count);
        Ok(())
    }

    fn photo_burst_count(&self) -> HandlerResult<BurstCount> {
        Ok(self.camera()?.burst_count())
    }

    fn set_photo_time_interval_settings(&self, settings: IntervalSettings) -> HandlerResult<()> {
        self.camera()?.set_interval_settings(settings);
        Ok(())
    }

    fn photo_time_interval_settings(&self) -> HandlerResult<IntervalSettings> {
        Ok(self.camera()?.interval_settings())
    }

    fn sd_card_state(&self) -> HandlerResult<SdCardState> {
        Ok(self.camera()?.sd_state())
    }

    fn format_sd_card(&self) -> HandlerResult<()> {
        self.camera()?.format_sd();
        Ok(())
    }
}

impl ExposureMeteringHandler for CameraEmulator {
    fn set_metering_mode(&self, mode: MeteringMode) -> HandlerResult<()> {
        self.camera()?.set_metering_mode(mode);
        Ok(())
    }

    fn metering_mode(&self) -> HandlerResult<MeteringMode> {
        Ok(self.camera()?.metering_mode())
    }

    fn set_spot_metering_target(&self, target: SpotMeteringTarget) -> HandlerResult<()> {
        self.camera()?.set_spot_target(target);
        Ok(())
    }

    fn spot_metering_target(&self) -> HandlerResult<SpotMeteringTarget> {
        Ok(self.camera()?.spot_target())
    }
}

impl FocusHandler for CameraEmulator {
    fn set_focus_mode(&self, mode: FocusMode) -> HandlerResult<()> {
        self.camera()?.set_focus_mode(mode);
        Ok(())
    }

    fn focus_mode(&self) -> HandlerResult<FocusMode> {
        Ok(self.camera()?.focus_mode())
    }

    fn set_focus_target(&self, target: PointInScreen) -> HandlerResult<()> {
        self.camera()?.set_focus_target(target);
        Ok(())
    }

    fn focus_target(&self) -> HandlerResult<PointInScreen> {
        Ok(self.camera()?.focus_target())
    }

    fn set_focus_assistant_settings(&self, settings: FocusAssistantSettings) -> HandlerResult<()> {
        self.camera()?.set_focus_assistant(settings);
        Ok(())
    }

    fn focus_assistant_settings(&self) -> HandlerResult<FocusAssistantSettings> {
        Ok(self.camera()?.focus_assistant())
    }

    fn focus_ring_value_upper_bound(&self) -> HandlerResult<u16> {
        Ok(FOCUS_RING_UPPER_BOUND)
    }

    fn set_focus_ring_value(&self, value: u16) -> HandlerResult<()> {
        self.camera()?.set_focus_ring(value);
        Ok(())
    }

    fn focus_ring_value(&self) -> HandlerResult<u16> {
        Ok(self.camera()?.focus_ring())
    }
}

impl DigitalZoomHandler for CameraEmulator {
    fn set_digital_zoom_factor(&self, factor: f32) -> HandlerResult<()> {
        self.zoom()?.set_digital_factor(factor)
    }
}

impl OpticalZoomHandler for CameraEmulator {
    fn set_optical_zoom_focal_length(&self, focal_length: u16) -> HandlerResult<()> {
        self.zoom()?.set_optical_focal_length(focal_length);
        Ok(())
    }

    fn optical_zoom_focal_length(&self) -> HandlerResult<u16> {
        Ok(self.zoom()?.optical_focal_length())
    }

    fn optical_zoom_spec(&self) -> HandlerResult<OpticalZoomSpec> {
        Ok(self.zoom()?.spec())
    }

    fn start_continuous_optical_zoom(&self, direction: ZoomDirection, speed: ZoomSpeed) -> HandlerResult<()> {
        self.zoom()?.start_continuous(direction, speed);
        Ok(())
    }

    fn stop_continuous_optical_zoom(&self) -> HandlerResult<()> {
        self.zoom()?.stop_continuous();
        Ok(())
    }
}

impl TapZoomHandler for CameraEmulator {
    fn tap_zoom_state(&self) -> HandlerResult<TapZoomState> {
        Ok(self.tap_zoom()?.state())
    }

    fn set_tap_zoom_enabled(&self, enabled: bool) -> HandlerResult<()> {
        self.tap_zoom()?.set_enabled(enabled);
        Ok(())
    }

    fn tap_zoom_enabled(&self) -> HandlerResult<bool> {
        Ok(self.tap_zoom()?.enabled())
    }

    fn set_tap_zoom_multiplier(&self, multiplier: u8) -> HandlerResult<()> {
        self.tap_zoom()?.set_multiplier(multiplier);
        Ok(())
    }

    fn tap_zoom_multiplier(&self) -> HandlerResult<u8> {
        Ok(self.tap_zoom()?.multiplier())
    }

    fn tap_zoom_at_target(&self, target: PointInScreen) -> HandlerResult<()> {
        self.stage_tap_zoom(target)
    }
}
