#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraMode {
    ShootPhoto,
    RecordVideo,
    Playback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShootPhotoMode {
    Single,
    Burst,
    Interval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShootingState {
    Idle,
    SinglePhoto,
    BurstPhoto,
    IntervalPhoto,
}

/// Burst sizes the vendor camera protocol can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BurstCount {
    Two,
    Three,
    Five,
    Seven,
    Ten,
    Fourteen,
}

impl BurstCount {
    pub fn count(self) -> u32 {
        match self {
            BurstCount::Two => 2,
            BurstCount::Three => 3,
            BurstCount::Five => 5,
            BurstCount::Seven => 7,
            BurstCount::Ten => 10,
            BurstCount::Fourteen => 14,
        }
    }

    pub fn from_count(n: u32) -> Option<Self> {
        match n {
            2 => Some(BurstCount::Two),
            3 => Some(BurstCount::Three),
            5 => Some(BurstCount::Five),
            7 => Some(BurstCount::Seven),
            10 => Some(BurstCount::Ten),
            14 => Some(BurstCount::Fourteen),
            _ => None,
        }
    }
}

/// Capture count of 255 means "keep shooting until stopped".
pub const INTERVAL_CONTINUOUS_COUNT: u8 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalSettings {
    pub capture_count: u8,
    pub interval_seconds: u16,
}

impl IntervalSettings {
    pub fn is_continuous(&self) -> bool {
        self.capture_count == INTERVAL_CONTINUOUS_COUNT
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CameraSystemState {
    pub mode: CameraMode,
    pub shooting_state: ShootingState,
    pub is_storing: bool,
    pub is_interval_running: bool,
    pub interval_countdown_seconds: u16,
    pub interval_remaining_count: u16,
    pub is_recording: bool,
    pub recording_seconds: u32,
    pub is_overheating: bool,
    pub has_error: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SdCardState {
    pub is_inserted: bool,
    pub is_verified: bool,
    pub is_full: bool,
    pub has_error: bool,
    pub total_space_mb: u32,
    pub remain_space_mb: u32,
    pub available_capture_count: u32,
    pub available_recording_seconds: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeteringMode {
    Center,
    Average,
    Spot,
}

/// Cell on the 12x8 spot metering grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpotMeteringTarget {
    pub col: u8,
    pub row: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusMode {
    Manual,
    Auto,
}

/// Normalized screen coordinates, (0,0) top-left and (1,1) bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointInScreen {
    pub x: f32,
    pub y: f32,
}

impl PointInScreen {
    pub const CENTER: PointInScreen = PointInScreen { x: 0.5, y: 0.5 };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusAssistantSettings {
    pub af_enabled: bool,
    pub mf_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    Out,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ZoomSpeed {
    Slowest,
    Slow,
    ModeratelySlow,
    Normal,
    ModeratelyFast,
    Fast,
    Fastest,
}

impl ZoomSpeed {
    /// 1 for slowest up to 7 for fastest.
    pub fn step_multiplier(self) -> i32 {
        self as i32 + 1
    }

    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(ZoomSpeed::Slowest),
            2 => Some(ZoomSpeed::Slow),
            3 => Some(ZoomSpeed::ModeratelySlow),
            4 => Some(ZoomSpeed::Normal),
            5 => Some(ZoomSpeed::ModeratelyFast),
            6 => Some(ZoomSpeed::Fast),
            7 => Some(ZoomSpeed::Fastest),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpticalZoomSpec {
    pub max_focal_length: u16,
    pub min_focal_length: u16,
    pub focal_length_step: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapZoomPhase {
    Idle,
    ZoomIn,
    ZoomOut,
    ZoomLimited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapZoomState {
    pub phase: TapZoomPhase,
    pub is_gimbal_moving: bool,
}
