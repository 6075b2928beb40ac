use tracing::{error, info};

use crate::error::{CameraError, HandlerResult};
use crate::types::*;
use crate::CameraConfig;

pub const FOCUS_RING_UPPER_BOUND: u16 = 1000;
const FOCUS_RING_INITIAL: u16 = 500;

/// Camera and SD card fields, guarded together by the emulator's camera lock.
#[derive(Debug, Clone)]
pub struct CameraCore {
    cfg: CameraConfig,
    system: CameraSystemState,
    sd: SdCardState,

    shoot_mode: ShootPhotoMode,
    burst_count: BurstCount,
    interval: IntervalSettings,

    metering_mode: MeteringMode,
    spot_target: SpotMeteringTarget,

    focus_mode: FocusMode,
    focus_target: PointInScreen,
    focus_assistant: FocusAssistantSettings,
    focus_ring: u16,

    // base ticks spent on the capture in flight
    capture_ticks: u32,
    // set by the 1Hz step once an interval capture was triggered
    interval_action_started: bool,
}

impl CameraCore {
    pub fn new(cfg: CameraConfig) -> Self {
        let sd = full_card(&cfg);
        Self {
            cfg,
            system: CameraSystemState {
                mode: CameraMode::ShootPhoto,
                shooting_state: ShootingState::Idle,
                is_storing: false,
                is_interval_running: false,
                interval_countdown_seconds: 0,
                interval_remaining_count: INTERVAL_CONTINUOUS_COUNT as u16,
                is_recording: false,
                recording_seconds: 0,
                is_overheating: false,
                has_error: false,
            },
            sd,
            shoot_mode: ShootPhotoMode::Single,
            burst_count: BurstCount::Three,
            interval: IntervalSettings {
                capture_count: INTERVAL_CONTINUOUS_COUNT,
                interval_seconds: 1,
            },
            metering_mode: MeteringMode::Center,
            spot_target: SpotMeteringTarget::default(),
            focus_mode: FocusMode::Auto,
            focus_target: PointInScreen::CENTER,
            focus_assistant: FocusAssistantSettings { af_enabled: true, mf_enabled: false },
            focus_ring: FOCUS_RING_INITIAL,
            capture_ticks: 0,
            interval_action_started: false,
        }
    }

    pub fn system_state(&self) -> CameraSystemState {
        self.system
    }

    pub fn sd_state(&self) -> SdCardState {
        self.sd
    }

    pub fn mode(&self) -> CameraMode {
        self.system.mode
    }

    /// Stored as given, even mid-capture.
    pub fn set_mode(&mut self, mode: CameraMode) {
        info!(?mode, "set camera work mode");
        self.system.mode = mode;
    }

    pub fn start_record(&mut self) -> HandlerResult<()> {
        if self.system.is_recording {
            error!("camera is already in recording state");
            return Err(CameraError::WrongStateForOperation);
        }
        self.system.is_recording = true;
        info!("start record video");
        Ok(())
    }

    pub fn stop_record(&mut self) -> HandlerResult<()> {
        if !self.system.is_recording {
            error!("camera is not in recording state");
            return Err(CameraError::WrongStateForOperation);
        }
        self.system.is_recording = false;
        self.system.recording_seconds = 0;
        info!("stop record video");
        Ok(())
    }

    pub fn start_shoot(&mut self) {
        info!(mode = ?self.shoot_mode, "start shoot photo");
        self.system.is_storing = true;
        match self.shoot_mode {
            ShootPhotoMode::Single => self.system.shooting_state = ShootingState::SinglePhoto,
            ShootPhotoMode::Burst => self.system.shooting_state = ShootingState::BurstPhoto,
            ShootPhotoMode::Interval => {
                self.system.shooting_state = ShootingState::IntervalPhoto;
                self.system.is_interval_running = true;
                self.system.interval_countdown_seconds = self.interval.interval_seconds;
                if self.system.interval_remaining_count == 0 {
                    // previous run used up the count
                    self.system.interval_remaining_count = self.interval.capture_count as u16;
                }
            }
        }
    }

    pub fn stop_shoot(&mut self) {
        info!("stop shoot photo");
        self.capture_ticks = 0;
        self.system.shooting_state = ShootingState::Idle;
        self.system.is_storing = false;
        self.system.is_interval_running = false;
    }

    pub fn shoot_mode(&self) -> ShootPhotoMode {
        self.shoot_mode
    }

    pub fn set_shoot_mode(&mut self, mode: ShootPhotoMode) {
        info!(?mode, "set shoot photo mode");
        self.shoot_mode = mode;
    }

    pub fn burst_count(&self) -> BurstCount {
        self.burst_count
    }

    pub fn set_burst_count(&mut self, count: BurstCount) {
        info!(count = count.count(), "set photo burst count");
        self.burst_count = count;
    }

    pub fn interval_settings(&self) -> IntervalSettings {
        self.interval
    }

    pub fn set_interval_settings(&mut self, settings: IntervalSettings) {
        info!(
            count = settings.capture_count,
            seconds = settings.interval_seconds,
            "set photo interval settings"
        );
        self.interval = settings;
        self.system.interval_remaining_count = settings.capture_count as u16;
    }

    pub fn format_sd(&mut self) {
        info!("format sdcard");
        self.sd = full_card(&self.cfg);
    }

    pub fn metering_mode(&self) -> MeteringMode {
        self.metering_mode
    }

    pub fn set_metering_mode(&mut self, mode: MeteringMode) {
        info!(?mode, "set metering mode");
        self.metering_mode = mode;
    }

    pub fn spot_target(&self) -> SpotMeteringTarget {
        self.spot_target
    }

    pub fn set_spot_target(&mut self, target: SpotMeteringTarget) {
        info!(col = target.col, row = target.row, "set spot metering area");
        self.spot_target = target;
    }

    pub fn focus_mode(&self) -> FocusMode {
        self.focus_mode
    }

    pub fn set_focus_mode(&mut self, mode: FocusMode) {
        info!(?mode, "set focus mode");
        self.focus_mode = mode;
    }

    pub fn focus_target(&self) -> PointInScreen {
        self.focus_target
    }

    pub fn set_focus_target(&mut self, target: PointInScreen) {
        info!(x = target.x, y = target.y, "set focus target");
        self.focus_target = target;
    }

    pub fn focus_assistant(&self) -> FocusAssistantSettings {
        self.focus_assistant
    }

    pub fn set_focus_assistant(&mut self, settings: FocusAssistantSettings) {
        info!(af = settings.af_enabled, mf = settings.mf_enabled, "set focus assistant settings");
        self.focus_assistant = settings;
    }

    pub fn focus_ring(&self) -> u16 {
        self.focus_ring
    }

    pub fn set_focus_ring(&mut self, value: u16) {
        info!(value, "set focus ring value");
        self.focus_ring = value;
    }

    /// Base-rate step: refreshes derived card figures and completes the capture in
    /// flight once it has been running for more than `completion_ticks` ticks.
    pub fn advance_tick(&mut self, completion_ticks: u32) {
        self.refresh_derived();

        if self.system.shooting_state == ShootingState::Idle {
            return;
        }
        self.capture_ticks += 1;
        if self.capture_ticks <= completion_ticks {
            return;
        }
        self.capture_ticks = 0;

        match self.shoot_mode {
            ShootPhotoMode::Single => {
                self.consume(self.cfg.photo_mb);
                self.finish_capture();
            }
            ShootPhotoMode::Burst => {
                self.consume(self.cfg.photo_mb * self.burst_count.count());
                self.finish_capture();
            }
            ShootPhotoMode::Interval => {
                // Only a capture the 1Hz step actually triggered gets stored.
                if self.interval_action_started {
                    self.finish_capture();
                    self.consume(self.cfg.photo_mb);
                }
            }
        }
    }

    /// 1Hz step: recording time and interval photo countdown.
    pub fn advance_second(&mut self) {
        if self.system.is_recording {
            self.system.recording_seconds += 1;
            self.consume(self.cfg.record_mb_per_second);
        }

        if !self.system.is_interval_running {
            self.interval_action_started = false;
        }

        if self.shoot_mode != ShootPhotoMode::Interval
            || !self.system.is_interval_running
            || self.interval.capture_count == 0
            || self.interval.interval_seconds == 0
        {
            return;
        }

        self.system.interval_countdown_seconds =
            self.system.interval_countdown_seconds.saturating_sub(1);

        let due = self.system.interval_countdown_seconds == 0
            && self.system.interval_remaining_count > 0;
        if !due && self.interval_action_started {
            return;
        }

        self.interval_action_started = true;
        self.system.shooting_state = ShootingState::IntervalPhoto;
        self.system.is_storing = true;
        self.system.interval_countdown_seconds = self.interval.interval_seconds;

        if self.interval.is_continuous() {
            info!("interval taking photograph always");
            return;
        }

        info!(
            count = self.interval.capture_count,
            index = (self.interval.capture_count as u16)
                .saturating_sub(self.system.interval_remaining_count)
                + 1,
            "interval taking photograph"
        );
        self.system.interval_remaining_count =
            self.system.interval_remaining_count.saturating_sub(1);
        if self.system.interval_remaining_count == 0 {
            self.system.is_interval_running = false;
        }
    }

    fn finish_capture(&mut self) {
        self.system.is_storing = false;
        self.system.shooting_state = ShootingState::Idle;
    }

    fn consume(&mut self, mb: u32) {
        match self.sd.remain_space_mb.checked_sub(mb) {
            Some(remain) if remain > 0 => self.sd.remain_space_mb = remain,
            _ => {
                self.sd.remain_space_mb = 0;
                self.sd.is_full = true;
            }
        }
        self.refresh_derived();
    }

    fn refresh_derived(&mut self) {
        self.sd.available_capture_count = self.sd.remain_space_mb / self.cfg.photo_mb.max(1);
        self.sd.available_recording_seconds =
            self.sd.remain_space_mb / self.cfg.record_mb_per_second.max(1);
    }
}

fn full_card(cfg: &CameraConfig) -> SdCardState {
    SdCardState {
        is_inserted: true,
        is_verified: true,
        is_full: false,
        has_error: false,
        total_space_mb: cfg.sd_total_mb,
        remain_space_mb: cfg.sd_total_mb,
        available_capture_count: cfg.sd_total_mb / cfg.photo_mb.max(1),
        available_recording_seconds: cfg.sd_total_mb / cfg.record_mb_per_second.max(1),
    }
}
