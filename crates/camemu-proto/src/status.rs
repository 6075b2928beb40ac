use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    Status,
    SdFull,
}

/// Point-in-time view of the emulated camera, one line per report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraStatusEvent {
    pub ts_unix_ms: i64,
    pub kind: EventKind,
    pub mode: String,
    pub shooting: String,
    pub storing: bool,
    // Video
    pub recording: bool,
    pub record_seconds: u32,
    // Interval photo
    pub interval_running: bool,
    pub interval_remaining: u16,
    // SD card
    pub sd_total_mb: u32,
    pub sd_remain_mb: u32,
    pub sd_full: bool,
    pub sd_capture_count: u32,
    // Zoom, focal lengths in 0.1mm
    pub optical_focal_length: u16,
    pub digital_factor: f32,
    pub hybrid_focal_length: f32,
    // Tap zoom
    pub tap_zoom_state: String,
    pub gimbal_moving: bool,
}
