use glam::Vec3;
use rollway_common::Pose;
use serde::{Deserialize, Serialize};

/// Anything that can produce a target pose for a given elapsed time.
pub trait PoseDriver {
    fn pose_at(&self, t: f64) -> Pose;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaveKind {
    Sin,
    Cos,
}

/// `offset + amplitude * wave(frequency * t + phase)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Wave {
    pub offset: f32,
    pub amplitude: f32,
    /// Angular frequency in radians per second.
    pub frequency: f32,
    pub phase: f32,
    pub kind: WaveKind,
}

impl Default for Wave {
    fn default() -> Self {
        Self::constant(0.0)
    }
}

impl Wave {
    pub fn constant(offset: f32) -> Self {
        Self {
            offset,
            amplitude: 0.0,
            frequency: 0.0,
            phase: 0.0,
            kind: WaveKind::Sin,
        }
    }

    pub fn sin(offset: f32, amplitude: f32, frequency: f32) -> Self {
        Self {
            offset,
            amplitude,
            frequency,
            phase: 0.0,
            kind: WaveKind::Sin,
        }
    }

    pub fn cos(offset: f32, amplitude: f32, frequency: f32) -> Self {
        Self {
            kind: WaveKind::Cos,
            ..Self::sin(offset, amplitude, frequency)
        }
    }

    /// Evaluate at `t`. The argument is formed in f64 so long-running clocks
    /// do not lose phase precision before the final narrowing.
    pub fn sample(&self, t: f64) -> f32 {
        let arg = f64::from(self.frequency) * t + f64::from(self.phase);
        let w = match self.kind {
            WaveKind::Sin => arg.sin(),
            WaveKind::Cos => arg.cos(),
        };
        (f64::from(self.offset) + f64::from(self.amplitude) * w) as f32
    }

    pub fn is_finite(&self) -> bool {
        self.offset.is_finite()
            && self.amplitude.is_finite()
            && self.frequency.is_finite()
            && self.phase.is_finite()
    }
}

/// One wave per axis.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AxisWaves {
    pub x: Wave,
    pub y: Wave,
    pub z: Wave,
}

impl AxisWaves {
    pub fn new(x: Wave, y: Wave, z: Wave) -> Self {
        Self { x, y, z }
    }

    pub fn sample(&self, t: f64) -> Vec3 {
        Vec3::new(self.x.sample(t), self.y.sample(t), self.z.sample(t))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Periodic driver for the kinematic actor.
///
/// The default sweeps the actor back and forth under the course while it
/// rocks about Y and Z. At `t = 0` it sits at `(-5, -8, 0)` yawed by `-0.1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KinematicDriver {
    pub translation: AxisWaves,
    pub rotation: AxisWaves,
}

impl Default for KinematicDriver {
    fn default() -> Self {
        Self {
            translation: AxisWaves::new(
                Wave::sin(-5.0, 3.0, 0.5),
                Wave::sin(-8.0, 1.5, 1.0),
                Wave::constant(0.0),
            ),
            rotation: AxisWaves::new(
                Wave::constant(0.0),
                Wave::cos(0.0, -0.1, 1.0),
                Wave::sin(0.0, 0.2, 1.0),
            ),
        }
    }
}

impl KinematicDriver {
    pub fn new(translation: AxisWaves, rotation: AxisWaves) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.translation.is_finite() && self.rotation.is_finite()
    }
}

impl PoseDriver for KinematicDriver {
    fn pose_at(&self, t: f64) -> Pose {
        Pose::new(self.translation.sample(t), self.rotation.sample(t))
    }
}
