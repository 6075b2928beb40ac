use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use camemu_proto::status::{CameraStatusEvent, EventKind};
use tracing::{error, info};

use crate::camera::CameraCore;
use crate::error::{CameraError, HandlerResult};
use crate::gimbal::{AdapterType, AircraftInfo, GimbalRotator, RotationArgument};
use crate::types::PointInScreen;
use crate::zoom::{TapZoomCore, TapZoomRequest, ZoomCore};
use crate::{EmulatorConfig, TickConfig, ZoomConfig};

/// Emulated payload camera.
///
/// State is split over three locks: camera/SD card, zoom, and tap zoom staging.
/// No method holds more than one of them at a time, so there is no lock order to
/// get wrong; keep it that way when adding operations.
pub struct CameraEmulator {
    camera: Mutex<CameraCore>,
    zoom: Mutex<ZoomCore>,
    tap_zoom: Mutex<TapZoomCore>,

    zoom_cfg: ZoomConfig,
    tick: TickConfig,
    tap_zoom_duration: Duration,
    completion_ticks: u32,

    aircraft: Arc<dyn AircraftInfo>,
    payload_gimbal: Arc<dyn GimbalRotator>,
    xport: Arc<dyn GimbalRotator>,
}

impl CameraEmulator {
    pub fn new(
        cfg: &EmulatorConfig,
        aircraft: Arc<dyn AircraftInfo>,
        payload_gimbal: Arc<dyn GimbalRotator>,
        xport: Arc<dyn GimbalRotator>,
    ) -> Self {
        let completion_ticks = cfg.camera.photo_capture_ms / cfg.tick.base_period_ms().max(1) as u32;
        info!(completion_ticks, adapter = ?cfg.aircraft.adapter, "camera emulator created");
        Self {
            camera: Mutex::new(CameraCore::new(cfg.camera.clone())),
            zoom: Mutex::new(ZoomCore::new(cfg.zoom.clone())),
            tap_zoom: Mutex::new(TapZoomCore::new(cfg.tap_zoom.enabled, cfg.tap_zoom.multiplier)),
            zoom_cfg: cfg.zoom.clone(),
            tick: cfg.tick.clone(),
            tap_zoom_duration: Duration::from_millis(cfg.tap_zoom.duration_ms),
            completion_ticks,
            aircraft,
            payload_gimbal,
            xport,
        }
    }

    pub fn tick_config(&self) -> &TickConfig {
        &self.tick
    }

    /// Base ticks a capture stays in flight before it is stored.
    pub fn completion_ticks(&self) -> u32 {
        self.completion_ticks
    }

    pub(crate) fn camera(&self) -> HandlerResult<MutexGuard<'_, CameraCore>> {
        lock_group(&self.camera, "camera")
    }

    pub(crate) fn zoom(&self) -> HandlerResult<MutexGuard<'_, ZoomCore>> {
        lock_group(&self.zoom, "zoom")
    }

    pub(crate) fn tap_zoom(&self) -> HandlerResult<MutexGuard<'_, TapZoomCore>> {
        lock_group(&self.tap_zoom, "tap zoom")
    }

    /// Stages a tap zoom for the next 10Hz step. Does not block on the gimbal.
    pub(crate) fn stage_tap_zoom(&self, target: PointInScreen) -> HandlerResult<()> {
        info!(x = target.x, y = target.y, "tap zoom at target");

        let multiplier = {
            let tap = self.tap_zoom()?;
            tap.check_ready()?;
            tap.multiplier()
        };
        let hybrid = self.zoom()?.hybrid_focal_length();

        let request = TapZoomRequest::new(target, hybrid, multiplier, self.tap_zoom_duration, &self.zoom_cfg);
        // re-checked here: another caller may have staged in between
        self.tap_zoom()?.stage(request)
    }

    /// Base-rate step: SD accounting and capture completion.
    pub fn fast_tick(&self) {
        if let Ok(mut cam) = self.camera() {
            cam.advance_tick(self.completion_ticks);
        }
    }

    pub fn zoom_tick(&self) {
        self.zoom_tick_at(Instant::now());
    }

    /// 10Hz step: continuous zoom, then the tap zoom cycle.
    pub fn zoom_tick_at(&self, now: Instant) {
        if let Ok(mut zoom) = self.zoom() {
            zoom.continuous_step();
        }

        let request = match self.tap_zoom() {
            Ok(mut tap) => match tap.begin(now) {
                Some(request) => Some(request),
                None => {
                    tap.expire(now, self.tap_zoom_duration);
                    None
                }
            },
            Err(_) => return,
        };

        if let Some(request) = request {
            self.apply_tap_zoom(request);
        }
    }

    /// 1Hz step: recording time and interval photos.
    pub fn second_tick(&self) {
        if let Ok(mut cam) = self.camera() {
            cam.advance_second();
        }
    }

    fn apply_tap_zoom(&self, request: TapZoomRequest) {
        let gimbal_moved = match self.rotate_gimbal(&request.rotation) {
            Ok(()) => true,
            Err(e) => {
                error!("rotate gimbal error: {}", e);
                false
            }
        };

        let (previous, zoom_result) = match self.zoom() {
            Ok(mut zoom) => {
                let previous = zoom.hybrid_focal_length();
                (previous, zoom.hybrid_zoom(request.target_focal_length))
            }
            Err(e) => (0.0, Err(e)),
        };

        if let Ok(mut tap) = self.tap_zoom() {
            tap.record_outcome(gimbal_moved, zoom_result, previous, request.target_focal_length);
        }
    }

    fn rotate_gimbal(&self, arg: &RotationArgument) -> HandlerResult<()> {
        match self.aircraft.adapter_type()? {
            AdapterType::None | AdapterType::SkyportV2 => self.payload_gimbal.rotate(arg),
            AdapterType::XPort => self.xport.rotate(arg),
            other => {
                error!(adapter = ?other, "payload adapter type is invalid");
                Err(CameraError::NotSupported)
            }
        }
    }

    /// Locks each state group in turn; the groups may be one tick apart.
    pub fn snapshot(&self) -> HandlerResult<CameraStatusEvent> {
        let (system, sd) = {
            let cam = self.camera()?;
            (cam.system_state(), cam.sd_state())
        };
        let (optical, digital, hybrid) = {
            let zoom = self.zoom()?;
            (zoom.optical_focal_length(), zoom.digital_factor(), zoom.hybrid_focal_length())
        };
        let tap = self.tap_zoom()?.state();

        Ok(CameraStatusEvent {
            ts_unix_ms: time::OffsetDateTime::now_utc().unix_timestamp_nanos() as i64 / 1_000_000,
            kind: if sd.is_full { EventKind::SdFull } else { EventKind::Status },
            mode: format!("{:?}", system.mode),
            shooting: format!("{:?}", system.shooting_state),
            storing: system.is_storing,
            recording: system.is_recording,
            record_seconds: system.recording_seconds,
            interval_running: system.is_interval_running,
            interval_remaining: system.interval_remaining_count,
            sd_total_mb: sd.total_space_mb,
            sd_remain_mb: sd.remain_space_mb,
            sd_full: sd.is_full,
            sd_capture_count: sd.available_capture_count,
            optical_focal_length: optical,
            digital_factor: digital,
            hybrid_focal_length: hybrid,
            tap_zoom_state: format!("{:?}", tap.phase),
            gimbal_moving: tap.is_gimbal_moving,
        })
    }
}

/// A poisoned lock fails only the current call or tick; the poison is cleared so
/// the next one runs on the state as the panicking holder left it.
fn lock_group<'a, T>(mutex: &'a Mutex<T>, group: &'static str) -> HandlerResult<MutexGuard<'a, T>> {
    mutex.lock().map_err(|poisoned| {
        drop(poisoned);
        mutex.clear_poison();
        error!(group, "lock mutex error");
        CameraError::LockPoisoned
    })
}
