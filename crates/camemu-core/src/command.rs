use anyhow::{Context, Result};

use crate::types::*;

/// One operator command, as typed on the console or passed to `camemu exec`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    State,
    SetMode(CameraMode),
    ShootStart,
    ShootStop,
    RecordStart,
    RecordStop,
    SetShootMode(ShootPhotoMode),
    SetBurst(BurstCount),
    SetInterval(IntervalSettings),
    SdCard,
    FormatSd,
    SetMetering(MeteringMode),
    SetSpot(SpotMeteringTarget),
    SetFocusMode(FocusMode),
    SetFocusTarget(PointInScreen),
    SetFocusRing(u16),
    SetDigitalZoom(f32),
    SetOpticalZoom(u16),
    ZoomSpec,
    ContinuousZoom(ZoomDirection, ZoomSpeed),
    ContinuousZoomStop,
    TapEnable(bool),
    TapMultiplier(u8),
    Tap(PointInScreen),
    TapState,
}

pub const HELP: &str = "\
state | sd | format
mode <photo|video|playback>
shoot <start|stop> | shoot-mode <single|burst|interval>
burst <2|3|5|7|10|14> | interval <count|always> <seconds>
record <start|stop>
metering <center|average|spot> | spot <col> <row>
focus-mode <manual|auto> | focus <x> <y> | ring <value>
digital <factor> | optical <focal_length> | zoom-spec
zoom <in|out> <speed 1..7> | zoom-stop
tap <enable|disable> | tap-mult <n> | tap <x> <y> | tap-state";

pub fn parse(line: &str) -> Result<CameraCommand> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let (&verb, args) = words.split_first().context("empty command")?;

    let cmd = match (verb, args) {
        ("state", []) => CameraCommand::State,
        ("sd", []) => CameraCommand::SdCard,
        ("format", []) => CameraCommand::FormatSd,
        ("mode", [m]) => CameraCommand::SetMode(match *m {
            "photo" => CameraMode::ShootPhoto,
            "video" => CameraMode::RecordVideo,
            "playback" => CameraMode::Playback,
            other => anyhow::bail!("unknown camera mode: {}", other),
        }),
        ("shoot", ["start"]) => CameraCommand::ShootStart,
        ("shoot", ["stop"]) => CameraCommand::ShootStop,
        ("shoot-mode", [m]) => CameraCommand::SetShootMode(match *m {
            "single" => ShootPhotoMode::Single,
            "burst" => ShootPhotoMode::Burst,
            "interval" => ShootPhotoMode::Interval,
            other => anyhow::bail!("unknown shoot mode: {}", other),
        }),
        ("burst", [n]) => {
            let n: u32 = n.parse().context("burst count")?;
            CameraCommand::SetBurst(
                BurstCount::from_count(n).with_context(|| format!("unsupported burst count {}", n))?,
            )
        }
        ("interval", [count, secs]) => {
            let capture_count = match *count {
                "always" => INTERVAL_CONTINUOUS_COUNT,
                n => n.parse().context("interval capture count")?,
            };
            CameraCommand::SetInterval(IntervalSettings {
                capture_count,
                interval_seconds: secs.parse().context("interval seconds")?,
            })
        }
        ("record", ["start"]) => CameraCommand::RecordStart,
        ("record", ["stop"]) => CameraCommand::RecordStop,
        ("metering", [m]) => CameraCommand::SetMetering(match *m {
            "center" => MeteringMode::Center,
            "average" => MeteringMode::Average,
            "spot" => MeteringMode::Spot,
            other => anyhow::bail!("unknown metering mode: {}", other),
        }),
        ("spot", [col, row]) => CameraCommand::SetSpot(SpotMeteringTarget {
            col: col.parse().context("spot column")?,
            row: row.parse().context("spot row")?,
        }),
        ("focus-mode", [m]) => CameraCommand::SetFocusMode(match *m {
            "manual" => FocusMode::Manual,
            "auto" => FocusMode::Auto,
            other => anyhow::bail!("unknown focus mode: {}", other),
        }),
        ("focus", [x, y]) => CameraCommand::SetFocusTarget(parse_point(x, y)?),
        ("ring", [v]) => CameraCommand::SetFocusRing(v.parse().context("focus ring value")?),
        ("digital", [f]) => {
            let factor: f32 = f.parse().context("digital zoom factor")?;
            anyhow::ensure!(factor.is_finite(), "digital zoom factor must be finite");
            CameraCommand::SetDigitalZoom(factor)
        }
        ("optical", [l]) => CameraCommand::SetOpticalZoom(l.parse().context("optical focal length")?),
        ("zoom-spec", []) => CameraCommand::ZoomSpec,
        ("zoom", [dir, speed]) => {
            let direction = match *dir {
                "in" => ZoomDirection::In,
                "out" => ZoomDirection::Out,
                other => anyhow::bail!("unknown zoom direction: {}", other),
            };
            let level: u8 = speed.parse().context("zoom speed")?;
            let speed = ZoomSpeed::from_level(level).context("zoom speed must be 1..7")?;
            CameraCommand::ContinuousZoom(direction, speed)
        }
        ("zoom-stop", []) => CameraCommand::ContinuousZoomStop,
        ("tap", ["enable"]) => CameraCommand::TapEnable(true),
        ("tap", ["disable"]) => CameraCommand::TapEnable(false),
        ("tap", [x, y]) => CameraCommand::Tap(parse_point(x, y)?),
        ("tap-mult", [n]) => CameraCommand::TapMultiplier(n.parse().context("tap zoom multiplier")?),
        ("tap-state", []) => CameraCommand::TapState,
        _ => anyhow::bail!("unrecognized command: {}", line.trim()),
    };
    Ok(cmd)
}

fn parse_point(x: &str, y: &str) -> Result<PointInScreen> {
    let p = PointInScreen {
        x: x.parse().context("screen x")?,
        y: y.parse().context("screen y")?,
    };
    anyhow::ensure!(
        (0.0..=1.0).contains(&p.x) && (0.0..=1.0).contains(&p.y),
        "screen point must be within 0..1"
    );
    Ok(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_capture_commands() {
        assert_eq!(parse("shoot start").unwrap(), CameraCommand::ShootStart);
        assert_eq!(parse("  record   stop ").unwrap(), CameraCommand::RecordStop);
        assert_eq!(parse("burst 5").unwrap(), CameraCommand::SetBurst(BurstCount::Five));
        assert_eq!(
            parse("interval always 3").unwrap(),
            CameraCommand::SetInterval(IntervalSettings { capture_count: 255, interval_seconds: 3 })
        );
    }

    #[test]
    fn parses_zoom_and_tap() {
        assert_eq!(
            parse("zoom in 7").unwrap(),
            CameraCommand::ContinuousZoom(ZoomDirection::In, ZoomSpeed::Fastest)
        );
        assert_eq!(parse("tap enable").unwrap(), CameraCommand::TapEnable(true));
        assert_eq!(
            parse("tap 0.25 0.75").unwrap(),
            CameraCommand::Tap(PointInScreen { x: 0.25, y: 0.75 })
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse("").is_err());
        assert!(parse("burst 4").is_err());
        assert!(parse("zoom in 9").is_err());
        assert!(parse("tap 1.5 0.2").is_err());
        assert!(parse("shoot now").is_err());
        assert!(parse("mode timelapse").is_err());
        assert!(parse("digital NaN").is_err());
        assert!(parse("digital inf").is_err());
        assert_eq!(parse("digital 2.5").unwrap(), CameraCommand::SetDigitalZoom(2.5));
    }
}
