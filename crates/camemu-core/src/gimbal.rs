use std::sync::Mutex;

use serde::Deserialize;
use tracing::{debug, error};

use crate::error::{CameraError, HandlerResult};

const PITCH_MIN: i32 = -900;
const PITCH_MAX: i32 = 300;
const HALF_TURN: i32 = 1800;

/// How the payload is attached to the aircraft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum AdapterType {
    #[serde(rename = "none")]
    None,
    #[default]
    #[serde(rename = "skyport-v2")]
    SkyportV2,
    #[serde(rename = "xport")]
    XPort,
    #[serde(rename = "unknown")]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationMode {
    RelativeAngle,
    AbsoluteAngle,
    Speed,
}

/// Angles in 0.1 degree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Attitude3d {
    pub pitch: i32,
    pub roll: i32,
    pub yaw: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationArgument {
    pub mode: RotationMode,
    /// units of 10ms
    pub action_time: u16,
    pub value: Attitude3d,
}

pub trait AircraftInfo: Send + Sync {
    fn adapter_type(&self) -> HandlerResult<AdapterType>;
}

pub trait GimbalRotator: Send + Sync {
    fn rotate(&self, arg: &RotationArgument) -> HandlerResult<()>;
}

/// Aircraft info fixed at startup from config.
#[derive(Debug, Clone, Copy)]
pub struct StaticAircraft(pub AdapterType);

impl AircraftInfo for StaticAircraft {
    fn adapter_type(&self) -> HandlerResult<AdapterType> {
        Ok(self.0)
    }
}

#[derive(Debug, Default)]
struct GimbalPose {
    attitude: Attitude3d,
    rotations: u32,
}

/// Simulated gimbal that just tracks where it would be pointing.
#[derive(Debug)]
pub struct SimGimbal {
    name: &'static str,
    pose: Mutex<GimbalPose>,
}

impl SimGimbal {
    pub fn new(name: &'static str) -> Self {
        Self { name, pose: Mutex::new(GimbalPose::default()) }
    }

    pub fn attitude(&self) -> Attitude3d {
        self.pose.lock().map(|p| p.attitude).unwrap_or_default()
    }

    pub fn rotations(&self) -> u32 {
        self.pose.lock().map(|p| p.rotations).unwrap_or(0)
    }
}

impl GimbalRotator for SimGimbal {
    fn rotate(&self, arg: &RotationArgument) -> HandlerResult<()> {
        let mut pose = self.pose.lock().map_err(|_| {
            error!(gimbal = self.name, "gimbal pose lock poisoned");
            CameraError::LockPoisoned
        })?;

        let target = match arg.mode {
            RotationMode::RelativeAngle => Attitude3d {
                pitch: pose.attitude.pitch + arg.value.pitch,
                roll: pose.attitude.roll + arg.value.roll,
                yaw: pose.attitude.yaw + arg.value.yaw,
            },
            RotationMode::AbsoluteAngle => arg.value,
            RotationMode::Speed => pose.attitude,
        };

        pose.attitude = Attitude3d {
            pitch: target.pitch.clamp(PITCH_MIN, PITCH_MAX),
            roll: target.roll,
            yaw: wrap_yaw(target.yaw),
        };
        pose.rotations += 1;
        debug!(
            gimbal = self.name,
            mode = ?arg.mode,
            pitch = pose.attitude.pitch,
            yaw = pose.attitude.yaw,
            "gimbal rotated"
        );
        Ok(())
    }
}

fn wrap_yaw(yaw: i32) -> i32 {
    (yaw + HALF_TURN).rem_euclid(2 * HALF_TURN) - HALF_TURN
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relative(pitch: i32, yaw: i32) -> RotationArgument {
        RotationArgument {
            mode: RotationMode::RelativeAngle,
            action_time: 200,
            value: Attitude3d { pitch, roll: 0, yaw },
        }
    }

    #[test]
    fn relative_rotations_accumulate() {
        let g = SimGimbal::new("test");
        g.rotate(&relative(-100, 200)).unwrap();
        g.rotate(&relative(-50, 100)).unwrap();
        assert_eq!(g.attitude(), Attitude3d { pitch: -150, roll: 0, yaw: 300 });
        assert_eq!(g.rotations(), 2);
    }

    #[test]
    fn pitch_clamps_and_yaw_wraps() {
        let g = SimGimbal::new("test");
        g.rotate(&relative(-2000, 1700)).unwrap();
        g.rotate(&relative(0, 200)).unwrap();
        let att = g.attitude();
        assert_eq!(att.pitch, -900);
        assert_eq!(att.yaw, -1700);
    }

    #[test]
    fn speed_mode_does_not_move() {
        let g = SimGimbal::new("test");
        let arg = RotationArgument { mode: RotationMode::Speed, ..relative(100, 100) };
        g.rotate(&arg).unwrap();
        assert_eq!(g.attitude(), Attitude3d::default());
    }
}
