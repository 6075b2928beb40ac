use std::sync::Arc;

use tracing::{debug, warn};

use crate::command::CameraCommand;
use crate::error::{CameraError, HandlerResult};
use crate::handlers::*;
use crate::types::*;

#[derive(Debug, Clone, PartialEq)]
pub enum CommandReply {
    Done,
    SystemState(CameraSystemState),
    SdCard(SdCardState),
    ZoomSpec(OpticalZoomSpec),
    TapZoom(TapZoomState),
}

/// Framework side of the camera: holds whatever capability handlers the payload
/// registered and routes commands to them.
#[derive(Default)]
pub struct PayloadCamera {
    common: Option<Arc<dyn CommonHandler>>,
    exposure: Option<Arc<dyn ExposureMeteringHandler>>,
    focus: Option<Arc<dyn FocusHandler>>,
    digital_zoom: Option<Arc<dyn DigitalZoomHandler>>,
    optical_zoom: Option<Arc<dyn OpticalZoomHandler>>,
    tap_zoom: Option<Arc<dyn TapZoomHandler>>,
}

impl PayloadCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_common_handler(&mut self, handler: Arc<dyn CommonHandler>) {
        self.common = Some(handler);
    }

    pub fn register_exposure_metering_handler(&mut self, handler: Arc<dyn ExposureMeteringHandler>) {
        self.exposure = Some(handler);
    }

    pub fn register_focus_handler(&mut self, handler: Arc<dyn FocusHandler>) {
        self.focus = Some(handler);
    }

    pub fn register_digital_zoom_handler(&mut self, handler: Arc<dyn DigitalZoomHandler>) {
        self.digital_zoom = Some(handler);
    }

    pub fn register_optical_zoom_handler(&mut self, handler: Arc<dyn OpticalZoomHandler>) {
        self.optical_zoom = Some(handler);
    }

    pub fn register_tap_zoom_handler(&mut self, handler: Arc<dyn TapZoomHandler>) {
        self.tap_zoom = Some(handler);
    }

    pub fn dispatch(&self, cmd: CameraCommand) -> HandlerResult<CommandReply> {
        debug!(?cmd, "dispatch camera command");
        use CameraCommand as C;
        match cmd {
            C::State => Ok(CommandReply::SystemState(need(&self.common)?.system_state()?)),
            C::SetMode(m) => done(need(&self.common)?.set_mode(m)),
            C::ShootStart => done(need(&self.common)?.start_shoot_photo()),
            C::ShootStop => done(need(&self.common)?.stop_shoot_photo()),
            C::RecordStart => done(need(&self.common)?.start_record_video()),
            C::RecordStop => done(need(&self.common)?.stop_record_video()),
            C::SetShootMode(m) => done(need(&self.common)?.set_shoot_photo_mode(m)),
            C::SetBurst(n) => done(need(&self.common)?.set_photo_burst_count(n)),
            C::SetInterval(s) => done(need(&self.common)?.set_photo_time_interval_settings(s)),
            C::SdCard => Ok(CommandReply::SdCard(need(&self.common)?.sd_card_state()?)),
            C::FormatSd => done(need(&self.common)?.format_sd_card()),
            C::SetMetering(m) => done(need(&self.exposure)?.set_metering_mode(m)),
            C::SetSpot(t) => done(need(&self.exposure)?.set_spot_metering_target(t)),
            C::SetFocusMode(m) => done(need(&self.focus)?.set_focus_mode(m)),
            C::SetFocusTarget(p) => done(need(&self.focus)?.set_focus_target(p)),
            C::SetFocusRing(v) => done(need(&self.focus)?.set_focus_ring_value(v)),
            C::SetDigitalZoom(f) => done(need(&self.digital_zoom)?.set_digital_zoom_factor(f)),
            C::SetOpticalZoom(l) => done(need(&self.optical_zoom)?.set_optical_zoom_focal_length(l)),
            C::ZoomSpec => Ok(CommandReply::ZoomSpec(need(&self.optical_zoom)?.optical_zoom_spec()?)),
            C::ContinuousZoom(d, s) => {
                done(need(&self.optical_zoom)?.start_continuous_optical_zoom(d, s))
            }
            C::ContinuousZoomStop => done(need(&self.optical_zoom)?.stop_continuous_optical_zoom()),
            C::TapEnable(on) => done(need(&self.tap_zoom)?.set_tap_zoom_enabled(on)),
            C::TapMultiplier(n) => done(need(&self.tap_zoom)?.set_tap_zoom_multiplier(n)),
            C::Tap(p) => done(need(&self.tap_zoom)?.tap_zoom_at_target(p)),
            C::TapState => Ok(CommandReply::TapZoom(need(&self.tap_zoom)?.tap_zoom_state()?)),
        }
    }
}

fn need<T: ?Sized>(handler: &Option<Arc<T>>) -> HandlerResult<&T> {
    handler.as_deref().ok_or_else(|| {
        warn!("camera capability not registered");
        CameraError::NotSupported
    })
}

fn done(res: HandlerResult<()>) -> HandlerResult<CommandReply> {
    res.map(|()| CommandReply::Done)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::parse;
    use crate::emulator::tests::rig;
    use crate::CameraEmulator;

    fn full_registry(emu: Arc<CameraEmulator>) -> PayloadCamera {
        let mut cam = PayloadCamera::new();
        cam.register_common_handler(emu.clone());
        cam.register_exposure_metering_handler(emu.clone());
        cam.register_focus_handler(emu.clone());
        cam.register_digital_zoom_handler(emu.clone());
        cam.register_optical_zoom_handler(emu.clone());
        cam.register_tap_zoom_handler(emu);
        cam
    }

    #[test]
    fn unregistered_capability_is_not_supported() {
        let cam = PayloadCamera::new();
        assert_eq!(cam.dispatch(CameraCommand::ShootStart), Err(CameraError::NotSupported));
    }

    #[test]
    fn dispatch_reaches_emulator() {
        let emu = Arc::new(rig().emu);
        let cam = full_registry(emu.clone());

        cam.dispatch(parse("record start").unwrap()).unwrap();
        assert_eq!(
            cam.dispatch(parse("record start").unwrap()),
            Err(CameraError::WrongStateForOperation)
        );

        match cam.dispatch(CameraCommand::State).unwrap() {
            CommandReply::SystemState(s) => assert!(s.is_recording),
            other => panic!("unexpected reply {:?}", other),
        }

        cam.dispatch(parse("metering spot").unwrap()).unwrap();
        assert_eq!(emu.metering_mode().unwrap(), MeteringMode::Spot);
    }

    #[test]
    fn partial_registration_only_serves_registered_groups() {
        let emu = Arc::new(rig().emu);
        let mut cam = PayloadCamera::new();
        cam.register_common_handler(emu);
        assert!(cam.dispatch(CameraCommand::FormatSd).is_ok());
        assert_eq!(cam.dispatch(CameraCommand::TapState), Err(CameraError::NotSupported));
    }
}
