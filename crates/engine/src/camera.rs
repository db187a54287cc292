//! Orbiting camera rig shared between the input side and the session.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use tetris3d_core::HeadingProvider;
use tetris3d_types::Heading;

/// Default orbit step in degrees.
pub const ORBIT_STEP_DEG: f32 = 90.0;

/// Horizontal camera yaw, cheap to clone and read from any thread.
///
/// The yaw is stored as `f32` bits in an atomic so the UI thread can orbit
/// while the session polls the heading once per command.
#[derive(Debug, Clone)]
pub struct CameraRig {
    yaw_bits: Arc<AtomicU32>,
    step_deg: f32,
}

impl CameraRig {
    pub fn new() -> Self {
        Self::with_step(ORBIT_STEP_DEG)
    }

    pub fn with_step(step_deg: f32) -> Self {
        Self {
            yaw_bits: Arc::new(AtomicU32::new(0f32.to_bits())),
            step_deg,
        }
    }

    /// Yaw in degrees, normalised to `[0, 360)`.
    pub fn yaw(&self) -> f32 {
        f32::from_bits(self.yaw_bits.load(Ordering::Relaxed))
    }

    pub fn set_yaw(&self, yaw_deg: f32) {
        let yaw = yaw_deg.rem_euclid(360.0);
        self.yaw_bits.store(yaw.to_bits(), Ordering::Relaxed);
    }

    /// Orbit one step towards increasing yaw.
    pub fn orbit_right(&self) -> Heading {
        self.set_yaw(self.yaw() + self.step_deg);
        self.heading()
    }

    /// Orbit one step towards decreasing yaw.
    pub fn orbit_left(&self) -> Heading {
        self.set_yaw(self.yaw() - self.step_deg);
        self.heading()
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingProvider for CameraRig {
    fn heading(&self) -> Heading {
        Heading::from_yaw(self.yaw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_walks_through_quadrants() {
        let rig = CameraRig::new();
        assert_eq!(rig.heading(), Heading::Deg0);
        assert_eq!(rig.orbit_right(), Heading::Deg90);
        assert_eq!(rig.orbit_right(), Heading::Deg180);
        assert_eq!(rig.orbit_left(), Heading::Deg90);
        assert_eq!(rig.orbit_left(), Heading::Deg0);
        assert_eq!(rig.orbit_left(), Heading::Deg270);
        assert_eq!(rig.yaw(), 270.0);
    }

    #[test]
    fn clones_share_yaw() {
        let rig = CameraRig::with_step(30.0);
        let view = rig.clone();
        rig.orbit_right();
        rig.orbit_right();
        assert_eq!(view.yaw(), 60.0);
        assert_eq!(view.heading(), Heading::Deg90);
    }
}
