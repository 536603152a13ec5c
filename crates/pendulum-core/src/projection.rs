//! Mapping from pendulum angles to positions on screen.
//!
//! Positions are in a 2D space where y grows downward,
//! so that the pivot's coordinates can be given directly in window pixels.
//! An angle of zero points straight down
//! and increasing angles swing the rod toward +x.

use crate::{PendulumState, Vec2};

/// Scale from simulation length units to drawing units.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    /// Drawing units (usually pixels) per unit of rod length. Default: 50.
    pub scale: f64,
}

impl Default for Projection {
    fn default() -> Self {
        Self { scale: 50. }
    }
}

/// Drawing-space positions of every joint of a pendulum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendulumFrame {
    /// The fixed pivot.
    pub pivot: Vec2,
    /// The upper bob, at the end of the first rod.
    pub bob1: Vec2,
    /// The lower bob, at the end of the second rod.
    pub bob2: Vec2,
}

impl PendulumFrame {
    /// The two rods as a line list: pivot to bob 1, then bob 1 to bob 2.
    pub fn rod_segments(&self) -> [Vec2; 4] {
        [self.pivot, self.bob1, self.bob1, self.bob2]
    }

    /// The two bob positions.
    pub fn bobs(&self) -> [Vec2; 2] {
        [self.bob1, self.bob2]
    }
}

impl Projection {
    /// Positions of the two bobs.
    pub fn bob_positions(&self, state: &PendulumState) -> (Vec2, Vec2) {
        let p = state.params();
        let bob1 = p.pivot() + self.offset(p.l1(), state.angle1);
        let bob2 = bob1 + self.offset(p.l2(), state.angle2);
        (bob1, bob2)
    }

    /// Positions of the pivot and both bobs.
    pub fn frame(&self, state: &PendulumState) -> PendulumFrame {
        let (bob1, bob2) = self.bob_positions(state);
        PendulumFrame {
            pivot: state.params().pivot(),
            bob1,
            bob2,
        }
    }

    #[inline]
    fn offset(&self, length: f64, angle: f64) -> Vec2 {
        self.scale * length * Vec2::new(f64::sin(angle), f64::cos(angle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::reference_params;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn hanging_straight_down() {
        let state = PendulumState::at_rest(reference_params(), 0., 0.);
        let frame = Projection::default().frame(&state);
        assert_eq!(frame.pivot, Vec2::new(200., 100.));
        assert_eq!(frame.bob1, Vec2::new(200., 100. + 50. * 1.5));
        assert_eq!(frame.bob2, Vec2::new(200., 100. + 50. * 2.5));
    }

    #[test]
    fn positive_angles_swing_right() {
        let state = PendulumState::at_rest(reference_params(), FRAC_PI_2, -FRAC_PI_2);
        let proj = Projection { scale: 10. };
        let (bob1, bob2) = proj.bob_positions(&state);
        assert_relative_eq!(bob1, Vec2::new(215., 100.), epsilon = 1e-9);
        assert_relative_eq!(bob2, Vec2::new(205., 100.), epsilon = 1e-9);
    }

    #[test]
    fn segments_connect_joints() {
        let state = PendulumState::at_rest(reference_params(), 1.3, 1.0);
        let frame = Projection::default().frame(&state);
        let segs = frame.rod_segments();
        assert_eq!(segs[0], frame.pivot);
        assert_eq!(segs[1], segs[2]);
        assert_eq!(segs[3], frame.bob2);
        assert_eq!(frame.bobs(), [frame.bob1, frame.bob2]);
        // rods keep their length regardless of angle
        assert_relative_eq!((frame.bob1 - frame.pivot).norm(), 75., epsilon = 1e-9);
        assert_relative_eq!((frame.bob2 - frame.bob1).norm(), 50., epsilon = 1e-9);
    }
}
