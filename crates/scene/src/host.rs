use std::time::{Duration, Instant};

use crate::context::{FrameReport, SceneContext};
use crate::error::SceneError;
use crate::timer::FrameTimer;

const TIMER_CAPACITY: usize = 120;

/// Frame-time summary taken at unmount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub frames: u64,
    pub average: Duration,
    pub min: Duration,
    pub max: Duration,
}

/// Drives a mounted scene once per host frame.
///
/// Frames issued while nothing is mounted do nothing. Unmounting stops the
/// frame callbacks and releases the scene.
pub struct SceneHost {
    scene: Option<SceneContext>,
    timer: FrameTimer,
    frames: u64,
}

impl Default for SceneHost {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneHost {
    pub fn new() -> Self {
        Self {
            scene: None,
            timer: FrameTimer::new(TIMER_CAPACITY),
            frames: 0,
        }
    }

    /// Subscribe `scene` to frame callbacks, releasing any scene already
    /// mounted.
    pub fn mount(&mut self, scene: SceneContext) {
        if self.scene.is_some() {
            self.unmount();
        }
        tracing::info!(bodies = scene.world().body_count(), "scene mounted");
        self.scene = Some(scene);
    }

    /// Release the mounted scene and return the frame-time summary.
    pub fn unmount(&mut self) -> Option<FrameStats> {
        let scene = self.scene.take()?;
        scene.teardown();
        let stats = self.stats();
        self.timer = FrameTimer::new(TIMER_CAPACITY);
        self.frames = 0;
        Some(stats)
    }

    pub fn is_mounted(&self) -> bool {
        self.scene.is_some()
    }

    pub fn scene(&self) -> Option<&SceneContext> {
        self.scene.as_ref()
    }

    pub fn scene_mut(&mut self) -> Option<&mut SceneContext> {
        self.scene.as_mut()
    }

    /// One host frame. Returns `None` when no scene is mounted.
    pub fn frame(&mut self, dt: f64) -> Result<Option<FrameReport>, SceneError> {
        let Some(scene) = self.scene.as_mut() else {
            return Ok(None);
        };
        let start = Instant::now();
        let report = scene.tick(dt)?;
        self.timer.record(start.elapsed());
        self.frames += 1;
        if report.divergences > 0 {
            tracing::warn!(frame = report.frame, divergences = report.divergences, "bodies recovered this frame");
        }
        Ok(Some(report))
    }

    /// Summary over the most recent frames.
    pub fn stats(&self) -> FrameStats {
        FrameStats {
            frames: self.frames,
            average: self.timer.average(),
            min: self.timer.min(),
            max: self.timer.max(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    #[test]
    fn frames_without_scene_do_nothing() {
        let mut host = SceneHost::new();
        assert!(!host.is_mounted());
        assert!(host.frame(1.0 / 60.0).unwrap().is_none());
        assert!(host.unmount().is_none());
    }

    #[test]
    fn mount_frame_unmount() {
        let mut host = SceneHost::new();
        host.mount(SceneContext::mount(&SceneConfig::default()).unwrap());
        for i in 1..=5 {
            let report = host.frame(1.0 / 60.0).unwrap().unwrap();
            assert_eq!(report.frame, i);
        }
        let stats = host.unmount().unwrap();
        assert_eq!(stats.frames, 5);
        assert!(stats.min <= stats.max);
        assert!(!host.is_mounted());
        assert!(host.frame(1.0 / 60.0).unwrap().is_none());
    }

    #[test]
    fn remount_replaces_scene() {
        let mut host = SceneHost::new();
        host.mount(SceneContext::mount(&SceneConfig::default()).unwrap());
        host.frame(1.0 / 60.0).unwrap();
        host.mount(SceneContext::mount(&SceneConfig::default()).unwrap());
        assert_eq!(host.stats().frames, 0);
        assert_eq!(host.scene().unwrap().clock().frame(), 0);
    }
}
