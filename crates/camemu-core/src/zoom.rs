use std::f32::consts::PI;
use std::time::{Duration, Instant};

use tracing::{error, info, warn};

use crate::error::{CameraError, HandlerResult};
use crate::gimbal::{Attitude3d, RotationArgument, RotationMode};
use crate::types::*;
use crate::ZoomConfig;

const DIGITAL_BASE_FACTOR: f32 = 1.0;

/// Optical and digital zoom fields, guarded by the emulator's zoom lock.
///
/// The hybrid focal length reported outward is always `optical * digital`.
#[derive(Debug, Clone)]
pub struct ZoomCore {
    cfg: ZoomConfig,
    optical_focal_length: u16,
    digital_factor: f32,

    continuous: bool,
    direction: ZoomDirection,
    speed: ZoomSpeed,
    optical_limit_reached: bool,
}

impl ZoomCore {
    pub fn new(cfg: ZoomConfig) -> Self {
        let optical_focal_length = cfg.optical_min;
        Self {
            cfg,
            optical_focal_length,
            digital_factor: DIGITAL_BASE_FACTOR,
            continuous: false,
            direction: ZoomDirection::Out,
            speed: ZoomSpeed::Normal,
            optical_limit_reached: false,
        }
    }

    pub fn optical_focal_length(&self) -> u16 {
        self.optical_focal_length
    }

    pub fn digital_factor(&self) -> f32 {
        self.digital_factor
    }

    pub fn hybrid_focal_length(&self) -> f32 {
        self.optical_focal_length as f32 * self.digital_factor
    }

    pub fn optical_limit_reached(&self) -> bool {
        self.optical_limit_reached
    }

    pub fn direction(&self) -> ZoomDirection {
        self.direction
    }

    pub fn spec(&self) -> OpticalZoomSpec {
        OpticalZoomSpec {
            max_focal_length: self.cfg.optical_max,
            min_focal_length: self.cfg.optical_min,
            focal_length_step: self.cfg.optical_step,
        }
    }

    /// Resets the zoom chain to its widest setting. The requested length is only
    /// logged; the emulated lens always snaps back to the minimum.
    pub fn set_optical_focal_length(&mut self, requested: u16) {
        info!(requested, "set focal length");
        self.optical_limit_reached = false;
        self.digital_factor = DIGITAL_BASE_FACTOR;
        self.optical_focal_length = self.cfg.optical_min;
    }

    /// Digital zoom only goes past 1.0 once optical sits at its maximum.
    pub fn set_digital_factor(&mut self, factor: f32) -> HandlerResult<()> {
        info!(factor, "set digital zoom factor");
        if !factor.is_finite() {
            error!(factor, "digital zoom factor is not a number");
            return Err(CameraError::OutOfRange);
        }
        let factor = factor.clamp(DIGITAL_BASE_FACTOR, self.cfg.digital_max);
        if factor > DIGITAL_BASE_FACTOR && self.optical_focal_length < self.cfg.optical_max {
            warn!(optical = self.optical_focal_length, "optical zoom is not at max");
            return Err(CameraError::WrongStateForOperation);
        }
        self.digital_factor = factor;
        self.optical_limit_reached = factor > DIGITAL_BASE_FACTOR;
        Ok(())
    }

    pub fn start_continuous(&mut self, direction: ZoomDirection, speed: ZoomSpeed) {
        info!(?direction, ?speed, "start continuous optical zoom");
        self.continuous = true;
        self.direction = direction;
        self.speed = speed;
    }

    pub fn stop_continuous(&mut self) {
        info!("stop continuous optical zoom");
        self.continuous = false;
        self.direction = ZoomDirection::Out;
        self.speed = ZoomSpeed::Normal;
    }

    /// One 10Hz step of continuous zoom. Optical moves first; once it saturates at
    /// max, the digital factor takes over until it drops back below 1.0.
    pub fn continuous_step(&mut self) {
        if !self.continuous {
            return;
        }

        if !self.optical_limit_reached {
            let delta = self.speed.step_multiplier() * self.cfg.optical_ctrl_step as i32;
            let mut focal = self.optical_focal_length as i32;
            match self.direction {
                ZoomDirection::In => focal += delta,
                ZoomDirection::Out => focal -= delta,
            }

            if focal > self.cfg.optical_max as i32 {
                focal = self.cfg.optical_max as i32;
                self.optical_limit_reached = true;
                self.direction = ZoomDirection::In;
            }
            if focal < self.cfg.optical_min as i32 {
                focal = self.cfg.optical_min as i32;
            }
            self.optical_focal_length = focal as u16;
        } else {
            let mut factor = self.digital_factor;
            match self.direction {
                ZoomDirection::In => factor += self.cfg.digital_step,
                ZoomDirection::Out => factor -= self.cfg.digital_step,
            }

            if factor > self.cfg.digital_max {
                factor = self.cfg.digital_max;
            }
            if factor < DIGITAL_BASE_FACTOR {
                self.optical_limit_reached = false;
                factor = DIGITAL_BASE_FACTOR;
            }
            self.digital_factor = factor;
        }
    }

    /// Splits a hybrid focal length into optical and digital parts.
    pub fn hybrid_zoom(&mut self, focal_length: u32) -> HandlerResult<()> {
        let min = self.cfg.optical_min as u32;
        let max = self.cfg.optical_max as u32;

        if focal_length < min {
            self.optical_focal_length = self.cfg.optical_min;
            self.digital_factor = DIGITAL_BASE_FACTOR;
            self.optical_limit_reached = false;
            error!(focal_length, min, "focal length is smaller than min optical focal length");
            return Err(CameraError::OutOfRange);
        }

        if focal_length <= max {
            self.optical_focal_length = focal_length as u16;
            self.digital_factor = DIGITAL_BASE_FACTOR;
            self.optical_limit_reached = false;
        } else {
            self.optical_focal_length = self.cfg.optical_max;
            self.digital_factor = focal_length as f32 / max as f32;
            self.optical_limit_reached = true;
        }
        Ok(())
    }
}

/// Gimbal angles (0.1 degree) that bring `target` onto the optical axis.
///
/// Assumes the whole sensor is shown on screen, the sensor center sits on the
/// gimbal's rotation center and the optical axis is the gimbal x axis.
pub fn project_tap(target: PointInScreen, hybrid_focal_length: f32, cfg: &ZoomConfig) -> Attitude3d {
    let center = PointInScreen::CENTER;
    let pitch = ((target.y - center.y) * cfg.sensor_height).atan2(hybrid_focal_length);
    let yaw = ((target.x - center.x) * cfg.sensor_width).atan2(hybrid_focal_length);
    Attitude3d {
        pitch: (pitch * 1800.0 / PI) as i32,
        roll: 0,
        yaw: (yaw * 1800.0 / PI) as i32,
    }
}

/// Rotation plus zoom staged by a tap, applied once by the 10Hz step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TapZoomRequest {
    pub rotation: RotationArgument,
    pub target_focal_length: u32,
}

impl TapZoomRequest {
    pub fn new(
        target: PointInScreen,
        hybrid_focal_length: f32,
        multiplier: u8,
        duration: Duration,
        cfg: &ZoomConfig,
    ) -> Self {
        Self {
            rotation: RotationArgument {
                mode: RotationMode::RelativeAngle,
                action_time: (duration.as_millis() / 10) as u16,
                value: project_tap(target, hybrid_focal_length, cfg),
            },
            target_focal_length: (hybrid_focal_length * multiplier as f32) as u32,
        }
    }
}

/// Tap zoom staging fields, guarded by the emulator's tap zoom lock.
#[derive(Debug, Clone)]
pub struct TapZoomCore {
    enabled: bool,
    multiplier: u8,
    state: TapZoomState,
    pending: Option<TapZoomRequest>,
    active_since: Option<Instant>,
}

impl TapZoomCore {
    pub fn new(enabled: bool, multiplier: u8) -> Self {
        Self {
            enabled,
            multiplier,
            state: TapZoomState { phase: TapZoomPhase::Idle, is_gimbal_moving: false },
            pending: None,
            active_since: None,
        }
    }

    pub fn state(&self) -> TapZoomState {
        self.state
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        info!(enabled, "set tap zoom enabled");
        self.enabled = enabled;
    }

    pub fn multiplier(&self) -> u8 {
        self.multiplier
    }

    pub fn set_multiplier(&mut self, multiplier: u8) {
        info!(multiplier, "set tap zoom multiplier");
        self.multiplier = multiplier;
    }

    pub fn pending(&self) -> Option<&TapZoomRequest> {
        self.pending.as_ref()
    }

    pub fn in_progress(&self) -> bool {
        self.pending.is_some() || self.active_since.is_some()
    }

    /// Checks that a new tap may start; call again under the same lock as `stage`.
    pub fn check_ready(&self) -> HandlerResult<()> {
        if !self.enabled {
            warn!("tap zoom is not enabled");
            return Err(CameraError::WrongStateForOperation);
        }
        if self.in_progress() {
            warn!("the last tap zoom process is not over");
            return Err(CameraError::WrongStateForOperation);
        }
        Ok(())
    }

    pub fn stage(&mut self, request: TapZoomRequest) -> HandlerResult<()> {
        self.check_ready()?;
        self.pending = Some(request);
        Ok(())
    }

    /// Takes the staged request and opens the duration window at `now`.
    pub fn begin(&mut self, now: Instant) -> Option<TapZoomRequest> {
        let request = self.pending.take()?;
        self.active_since = Some(now);
        Some(request)
    }

    pub fn record_outcome(
        &mut self,
        gimbal_moved: bool,
        zoom: HandlerResult<()>,
        previous_focal_length: f32,
        target_focal_length: u32,
    ) {
        if gimbal_moved {
            self.state.is_gimbal_moving = true;
        }
        match zoom {
            Ok(()) => {
                self.state.phase = if target_focal_length as f32 > previous_focal_length {
                    TapZoomPhase::ZoomIn
                } else {
                    TapZoomPhase::ZoomOut
                };
            }
            Err(CameraError::OutOfRange) => {
                error!("hybrid zoom focal length beyond limit");
                self.state.phase = TapZoomPhase::ZoomLimited;
            }
            Err(e) => error!("camera hybrid zoom error: {}", e),
        }
    }

    /// Closes the window once `duration` has passed since `begin`.
    pub fn expire(&mut self, now: Instant, duration: Duration) -> bool {
        let Some(since) = self.active_since else { return false; };
        if now.saturating_duration_since(since) < duration {
            return false;
        }
        self.state = TapZoomState { phase: TapZoomPhase::Idle, is_gimbal_moving: false };
        self.active_since = None;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zoom() -> ZoomCore {
        ZoomCore::new(ZoomConfig::default())
    }

    #[test]
    fn hybrid_zoom_within_optical_range() {
        let mut z = zoom();
        for len in [10u32, 55, 150, 300] {
            assert!(z.hybrid_zoom(len).is_ok());
            assert_eq!(z.optical_focal_length() as u32, len);
            assert_eq!(z.digital_factor(), 1.0);
        }
    }

    #[test]
    fn hybrid_zoom_above_range_goes_digital() {
        let mut z = zoom();
        assert!(z.hybrid_zoom(900).is_ok());
        assert_eq!(z.optical_focal_length(), 300);
        assert!((z.digital_factor() - 3.0).abs() < 1e-6);
        assert!((z.hybrid_focal_length() - 900.0).abs() < 1e-3);

        assert!(z.hybrid_zoom(450).is_ok());
        assert!((z.digital_factor() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn hybrid_zoom_below_range_is_out_of_range() {
        let mut z = zoom();
        z.hybrid_zoom(200).unwrap();
        assert_eq!(z.hybrid_zoom(5), Err(CameraError::OutOfRange));
        assert_eq!(z.optical_focal_length(), 10);
        assert_eq!(z.digital_factor(), 1.0);
    }

    #[test]
    fn set_optical_focal_length_snaps_to_minimum() {
        let mut z = zoom();
        z.hybrid_zoom(1200).unwrap();
        z.set_optical_focal_length(150);
        assert_eq!(z.optical_focal_length(), 10);
        assert_eq!(z.digital_factor(), 1.0);
        assert!(!z.optical_limit_reached());
    }

    #[test]
    fn digital_factor_setter_stays_in_bounds() {
        let mut z = zoom();
        z.hybrid_zoom(300).unwrap();
        z.set_digital_factor(0.2).unwrap();
        assert_eq!(z.digital_factor(), 1.0);
        assert!(!z.optical_limit_reached());
        z.set_digital_factor(42.0).unwrap();
        assert_eq!(z.digital_factor(), 6.0);
        assert!(z.optical_limit_reached());
    }

    #[test]
    fn digital_factor_needs_optical_at_max() {
        let mut z = zoom();
        assert_eq!(z.set_digital_factor(3.0), Err(CameraError::WrongStateForOperation));
        assert_eq!(z.optical_focal_length(), 10);
        assert_eq!(z.digital_factor(), 1.0);

        // resetting to 1.0 is always allowed
        assert!(z.set_digital_factor(1.0).is_ok());
    }

    #[test]
    fn digital_factor_rejects_nan() {
        let mut z = zoom();
        z.hybrid_zoom(300).unwrap();
        assert_eq!(z.set_digital_factor(f32::NAN), Err(CameraError::OutOfRange));
        assert_eq!(z.set_digital_factor(f32::INFINITY), Err(CameraError::OutOfRange));
        assert_eq!(z.digital_factor(), 1.0);
        assert!(z.hybrid_focal_length().is_finite());
    }

    #[test]
    fn zoom_out_after_digital_hybrid_zoom_drops_digital_first() {
        let mut z = zoom();
        z.hybrid_zoom(600).unwrap();
        assert!(z.optical_limit_reached());

        z.start_continuous(ZoomDirection::Out, ZoomSpeed::Normal);
        z.continuous_step();
        assert_eq!(z.optical_focal_length(), 300);
        assert!(z.digital_factor() < 2.0);

        for _ in 0..200 {
            z.continuous_step();
            assert!(z.digital_factor() == 1.0 || z.optical_focal_length() == 300);
        }
        assert_eq!(z.optical_focal_length(), 10);
        assert_eq!(z.digital_factor(), 1.0);
    }

    #[test]
    fn hybrid_zoom_back_in_range_clears_optical_limit() {
        let mut z = zoom();
        z.hybrid_zoom(900).unwrap();
        z.hybrid_zoom(120).unwrap();
        assert!(!z.optical_limit_reached());
        assert_eq!(z.digital_factor(), 1.0);
        assert!(z.hybrid_zoom(5).is_err());
        assert!(!z.optical_limit_reached());
    }

    #[test]
    fn continuous_zoom_in_saturates_optical_then_digital() {
        let mut z = zoom();
        z.start_continuous(ZoomDirection::In, ZoomSpeed::Fastest);
        // 35 per step at fastest
        z.continuous_step();
        assert_eq!(z.optical_focal_length(), 45);

        for _ in 0..20 {
            z.continuous_step();
        }
        assert_eq!(z.optical_focal_length(), 300);
        assert!(z.optical_limit_reached());
        assert!(z.digital_factor() > 1.0);

        for _ in 0..200 {
            z.continuous_step();
        }
        assert_eq!(z.digital_factor(), 6.0);
    }

    #[test]
    fn continuous_zoom_out_releases_optical_limit() {
        let mut z = zoom();
        z.hybrid_zoom(300).unwrap();
        z.start_continuous(ZoomDirection::In, ZoomSpeed::Slowest);
        z.continuous_step();
        assert!(z.optical_limit_reached());
        z.continuous_step();
        z.continuous_step();
        assert!(z.digital_factor() > 1.1);

        z.start_continuous(ZoomDirection::Out, ZoomSpeed::Slowest);
        for _ in 0..5 {
            z.continuous_step();
        }
        assert!(!z.optical_limit_reached());
        assert_eq!(z.digital_factor(), 1.0);

        for _ in 0..100 {
            z.continuous_step();
        }
        assert_eq!(z.optical_focal_length(), 10);
    }

    #[test]
    fn stopped_continuous_zoom_does_not_move() {
        let mut z = zoom();
        z.start_continuous(ZoomDirection::In, ZoomSpeed::Normal);
        z.stop_continuous();
        z.continuous_step();
        assert_eq!(z.optical_focal_length(), 10);
        assert_eq!(z.direction(), ZoomDirection::Out);
    }

    #[test]
    fn tap_at_center_needs_no_rotation() {
        let att = project_tap(PointInScreen::CENTER, 10.0, &ZoomConfig::default());
        assert_eq!(att.pitch, 0);
        assert_eq!(att.yaw, 0);
    }

    #[test]
    fn tap_projection_follows_sensor_geometry() {
        let cfg = ZoomConfig::default();
        // 0.5 * 88 = 44 over focal 44 is 45 degrees
        let att = project_tap(PointInScreen { x: 1.0, y: 0.5 }, 44.0, &cfg);
        assert!((att.yaw - 450).abs() <= 1);
        assert_eq!(att.pitch, 0);

        let att = project_tap(PointInScreen { x: 0.5, y: 0.0 }, 33.0, &cfg);
        assert!((att.pitch + 450).abs() <= 1);
        assert_eq!(att.yaw, 0);
    }

    #[test]
    fn tap_request_scales_focal_length_by_multiplier() {
        let req = TapZoomRequest::new(
            PointInScreen::CENTER,
            120.0,
            3,
            Duration::from_millis(2000),
            &ZoomConfig::default(),
        );
        assert_eq!(req.target_focal_length, 360);
        assert_eq!(req.rotation.mode, RotationMode::RelativeAngle);
        assert_eq!(req.rotation.action_time, 200);
    }

    #[test]
    fn tap_zoom_window_blocks_until_expired() {
        let mut tap = TapZoomCore::new(true, 2);
        let req = TapZoomRequest::new(
            PointInScreen::CENTER,
            10.0,
            2,
            Duration::from_millis(2000),
            &ZoomConfig::default(),
        );
        tap.stage(req).unwrap();
        assert_eq!(tap.stage(req), Err(CameraError::WrongStateForOperation));

        let t0 = Instant::now();
        assert!(tap.begin(t0).is_some());
        assert!(tap.begin(t0).is_none());
        assert_eq!(tap.stage(req), Err(CameraError::WrongStateForOperation));

        tap.record_outcome(true, Ok(()), 10.0, 20);
        assert_eq!(tap.state().phase, TapZoomPhase::ZoomIn);
        assert!(tap.state().is_gimbal_moving);

        assert!(!tap.expire(t0 + Duration::from_millis(1999), Duration::from_millis(2000)));
        assert!(tap.expire(t0 + Duration::from_millis(2000), Duration::from_millis(2000)));
        assert_eq!(tap.state().phase, TapZoomPhase::Idle);
        assert!(!tap.state().is_gimbal_moving);
        assert!(tap.stage(req).is_ok());
    }

    #[test]
    fn disabled_tap_zoom_is_rejected() {
        let mut tap = TapZoomCore::new(false, 1);
        let req = TapZoomRequest::new(
            PointInScreen::CENTER,
            10.0,
            1,
            Duration::from_millis(2000),
            &ZoomConfig::default(),
        );
        assert_eq!(tap.stage(req), Err(CameraError::WrongStateForOperation));
        assert!(tap.pending().is_none());
    }

    #[test]
    fn out_of_range_zoom_marks_tap_limited() {
        let mut tap = TapZoomCore::new(true, 1);
        tap.record_outcome(false, Err(CameraError::OutOfRange), 10.0, 5);
        assert_eq!(tap.state().phase, TapZoomPhase::ZoomLimited);
        assert!(!tap.state().is_gimbal_moving);
    }
}
