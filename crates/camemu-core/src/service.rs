use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::info;

use crate::CameraEmulator;

fn period(hz: u32) -> Duration {
    Duration::from_micros(1_000_000 / hz.max(1) as u64)
}

/// Spawns the emulator's polling loop: base, zoom and slow steps each on their
/// own interval. Runs until `shutdown` turns true or its sender is dropped.
pub fn spawn_polling_loop(
    emu: Arc<CameraEmulator>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    let tick = emu.tick_config().clone();
    tokio::spawn(async move {
        let start = Instant::now();
        let mut intervals = [tick.base_hz, tick.zoom_hz, tick.slow_hz].map(|hz| {
            let p = period(hz);
            let mut iv = interval_at(start + p, p);
            iv.set_missed_tick_behavior(MissedTickBehavior::Skip);
            iv
        });
        let [base, zoom, slow] = &mut intervals;

        info!(base_hz = tick.base_hz, zoom_hz = tick.zoom_hz, slow_hz = tick.slow_hz, "camera polling loop started");
        loop {
            tokio::select! {
                // same-instant ticks run base, zoom, slow in that order
                biased;
                _ = base.tick() => emu.fast_tick(),
                now = zoom.tick() => emu.zoom_tick_at(now.into_std()),
                _ = slow.tick() => emu.second_tick(),
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("camera polling loop stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emulator::tests::rig;
    use crate::handlers::{CommonHandler, TapZoomHandler};
    use crate::types::*;

    #[tokio::test(start_paused = true)]
    async fn recording_seconds_follow_slow_interval() {
        let emu = Arc::new(rig().emu);
        let (tx, rx) = watch::channel(false);
        let handle = spawn_polling_loop(emu.clone(), rx);

        emu.start_record_video().unwrap();
        tokio::time::sleep(Duration::from_millis(3500)).await;

        let state = emu.system_state().unwrap();
        assert_eq!(state.recording_seconds, 3);
        assert_eq!(emu.sd_card_state().unwrap().remain_space_mb, 32768 - 6);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn single_photo_stored_within_capture_time() {
        let emu = Arc::new(rig().emu);
        let (tx, rx) = watch::channel(false);
        let handle = spawn_polling_loop(emu.clone(), rx);

        emu.start_shoot_photo().unwrap();
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(emu.system_state().unwrap().shooting_state, ShootingState::SinglePhoto);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(emu.system_state().unwrap().shooting_state, ShootingState::Idle);
        assert_eq!(emu.sd_card_state().unwrap().remain_space_mb, 32768 - 4);

        drop(tx);
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn tap_zoom_cycle_clears_after_duration() {
        let emu = Arc::new(rig().emu);
        let (tx, rx) = watch::channel(false);
        let handle = spawn_polling_loop(emu.clone(), rx);

        emu.tap_zoom_at_target(PointInScreen { x: 0.7, y: 0.3 }).unwrap();
        tokio::time::sleep(Duration::from_millis(150)).await;

        let state = emu.tap_zoom_state().unwrap();
        assert!(state.is_gimbal_moving);
        assert_eq!(state.phase, TapZoomPhase::ZoomIn);
        assert!(emu.tap_zoom_at_target(PointInScreen::CENTER).is_err());

        tokio::time::sleep(Duration::from_millis(2200)).await;
        let state = emu.tap_zoom_state().unwrap();
        assert_eq!(state.phase, TapZoomPhase::Idle);
        assert!(!state.is_gimbal_moving);

        tx.send(true).unwrap();
        handle.await.unwrap();
    }
}
