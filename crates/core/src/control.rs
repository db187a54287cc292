//! View-relative control mapping
//!
//! The player issues commands in their own frame ("move left", "rotate about
//! X"). What those mean in the world depends on which of the four camera
//! quadrants is active:
//!
//! - movement deltas come straight from the per-heading direction tables;
//! - rotation about the horizontal axes swaps between world X and world Z on
//!   odd headings and flips sense on the far side;
//! - rotation about the vertical axis never changes.
//!
//! | Player | H0 | H1 | H2 | H3 |
//! |--------|----|----|----|----|
//! | X cw | X cw | Z ccw | X ccw | Z cw |
//! | Z cw | Z cw | X cw | Z ccw | X ccw |
//!
//! The ccw commands map to the inverse of the cw row.

use std::sync::Arc;

use crate::types::{Axis, Coord, Direction, Heading, Rotation, Spin};

/// Source of the current camera quadrant, polled once per command.
pub trait HeadingProvider {
    fn heading(&self) -> Heading;
}

impl HeadingProvider for Heading {
    fn heading(&self) -> Heading {
        *self
    }
}

impl<T: HeadingProvider + ?Sized> HeadingProvider for &T {
    fn heading(&self) -> Heading {
        (**self).heading()
    }
}

impl<T: HeadingProvider + ?Sized> HeadingProvider for Arc<T> {
    fn heading(&self) -> Heading {
        (**self).heading()
    }
}

/// World delta for a view-relative move.
pub fn movement_delta(direction: Direction, heading: Heading) -> Coord {
    direction.delta(heading)
}

/// World rotation operator for a view-relative rotation.
pub fn world_rotation(axis: Axis, spin: Spin, heading: Heading) -> Rotation {
    let cw = match (axis, heading) {
        (Axis::Y, _) => Rotation::new(Axis::Y, Spin::Cw),
        (Axis::X, Heading::Deg0) => Rotation::new(Axis::X, Spin::Cw),
        (Axis::X, Heading::Deg90) => Rotation::new(Axis::Z, Spin::Ccw),
        (Axis::X, Heading::Deg180) => Rotation::new(Axis::X, Spin::Ccw),
        (Axis::X, Heading::Deg270) => Rotation::new(Axis::Z, Spin::Cw),
        (Axis::Z, Heading::Deg0) => Rotation::new(Axis::Z, Spin::Cw),
        (Axis::Z, Heading::Deg90) => Rotation::new(Axis::X, Spin::Cw),
        (Axis::Z, Heading::Deg180) => Rotation::new(Axis::Z, Spin::Ccw),
        (Axis::Z, Heading::Deg270) => Rotation::new(Axis::X, Spin::Ccw),
    };
    match spin {
        Spin::Cw => cw,
        Spin::Ccw => cw.inverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_zero_is_identity() {
        for rotation in Rotation::ALL {
            assert_eq!(
                world_rotation(rotation.axis, rotation.spin, Heading::Deg0),
                rotation
            );
        }
    }

    #[test]
    fn test_vertical_axis_ignores_heading() {
        for heading in Heading::ALL {
            assert_eq!(
                world_rotation(Axis::Y, Spin::Ccw, heading),
                Rotation::new(Axis::Y, Spin::Ccw)
            );
        }
    }

    #[test]
    fn test_horizontal_axes_cross_map() {
        assert_eq!(
            world_rotation(Axis::X, Spin::Cw, Heading::Deg90),
            Rotation::new(Axis::Z, Spin::Ccw)
        );
        assert_eq!(
            world_rotation(Axis::X, Spin::Ccw, Heading::Deg270),
            Rotation::new(Axis::Z, Spin::Ccw)
        );
        assert_eq!(
            world_rotation(Axis::Z, Spin::Cw, Heading::Deg180),
            Rotation::new(Axis::Z, Spin::Ccw)
        );
        assert_eq!(
            world_rotation(Axis::Z, Spin::Ccw, Heading::Deg90),
            Rotation::new(Axis::X, Spin::Ccw)
        );
    }

    #[test]
    fn test_opposite_spins_are_inverse_at_every_heading() {
        for heading in Heading::ALL {
            for axis in [Axis::X, Axis::Y, Axis::Z] {
                let cw = world_rotation(axis, Spin::Cw, heading);
                let ccw = world_rotation(axis, Spin::Ccw, heading);
                assert_eq!(cw.inverse(), ccw);
            }
        }
    }

    #[test]
    fn test_providers() {
        let shared: Arc<Heading> = Arc::new(Heading::Deg180);
        assert_eq!(shared.heading(), Heading::Deg180);
        assert_eq!((&Heading::Deg90).heading(), Heading::Deg90);
        assert_eq!(
            movement_delta(Direction::Left, Heading::Deg90),
            Coord::new(0, 0, 1)
        );
    }
}
