//! Physical parameters and dynamic state of a double pendulum.

use crate::{Phase, Vec2};

/// Error in constructing [`PendulumParams`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ParamError {
    /// A rod length was zero or negative.
    #[error("Rod length must be positive, got l{link} = {value}")]
    NonPositiveLength {
        /// Which link the length belongs to (1 or 2).
        link: u8,
        /// The rejected value.
        value: f64,
    },
    /// A bob mass was zero or negative.
    #[error("Bob mass must be positive, got m{link} = {value}")]
    NonPositiveMass {
        /// Which link the mass belongs to (1 or 2).
        link: u8,
        /// The rejected value.
        value: f64,
    },
    /// A parameter was NaN or infinite.
    #[error("Pendulum parameters must be finite")]
    NonFinite,
}

/// The fixed physical description of a double pendulum:
/// where it hangs from, how long its rods are and how heavy its bobs are.
///
/// Fields are private so that they can't change after construction;
/// [`new`][Self::new] guarantees all lengths and masses are positive.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendulumParams {
    pivot: Vec2,
    l1: f64,
    l2: f64,
    m1: f64,
    m2: f64,
}

impl PendulumParams {
    /// Create a new set of parameters, checking that lengths and masses are positive.
    ///
    /// ```
    /// # use pendulum_core::{PendulumParams, Vec2};
    /// let params = PendulumParams::new(Vec2::new(200., 100.), 1.5, 1.0, 2.0, 2.0).unwrap();
    /// assert_eq!(params.l1(), 1.5);
    /// assert!(PendulumParams::new(Vec2::zeros(), 1.0, 0.0, 1.0, 1.0).is_err());
    /// ```
    pub fn new(pivot: Vec2, l1: f64, l2: f64, m1: f64, m2: f64) -> Result<Self, ParamError> {
        if !(pivot.iter().all(|c| c.is_finite()) && [l1, l2, m1, m2].iter().all(|v| v.is_finite()))
        {
            return Err(ParamError::NonFinite);
        }
        for (link, value) in [(1, l1), (2, l2)] {
            if value <= 0. {
                return Err(ParamError::NonPositiveLength { link, value });
            }
        }
        for (link, value) in [(1, m1), (2, m2)] {
            if value <= 0. {
                return Err(ParamError::NonPositiveMass { link, value });
            }
        }
        Ok(Self {
            pivot,
            l1,
            l2,
            m1,
            m2,
        })
    }

    /// The anchor point of the upper rod.
    #[inline]
    pub fn pivot(&self) -> Vec2 {
        self.pivot
    }

    /// Length of the upper rod.
    #[inline]
    pub fn l1(&self) -> f64 {
        self.l1
    }

    /// Length of the lower rod.
    #[inline]
    pub fn l2(&self) -> f64 {
        self.l2
    }

    /// Mass of the upper bob.
    #[inline]
    pub fn m1(&self) -> f64 {
        self.m1
    }

    /// Mass of the lower bob.
    #[inline]
    pub fn m2(&self) -> f64 {
        self.m2
    }
}

/// Complete state of a double pendulum at one instant.
///
/// Angles are measured in radians from the downward vertical
/// and are never wrapped, so they can grow without bound over a long run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendulumState {
    params: PendulumParams,
    /// Angle of the upper rod.
    pub angle1: f64,
    /// Angle of the lower rod.
    pub angle2: f64,
    /// Angular velocity of the upper rod.
    pub a_vel1: f64,
    /// Angular velocity of the lower rod.
    pub a_vel2: f64,
}

impl PendulumState {
    /// Create a state released from the given angles with zero velocity.
    pub fn at_rest(params: PendulumParams, angle1: f64, angle2: f64) -> Self {
        Self {
            params,
            angle1,
            angle2,
            a_vel1: 0.,
            a_vel2: 0.,
        }
    }

    /// The physical parameters this state belongs to.
    #[inline]
    pub fn params(&self) -> &PendulumParams {
        &self.params
    }

    /// The dynamic part of the state as a phase-space vector `(θ1, θ2, ω1, ω2)`.
    #[inline]
    pub fn phase(&self) -> Phase {
        Phase::new(self.angle1, self.angle2, self.a_vel1, self.a_vel2)
    }

    /// Return a copy of this state with the dynamic part replaced.
    #[inline]
    pub fn with_phase(&self, phase: Phase) -> Self {
        Self {
            params: self.params,
            angle1: phase[0],
            angle2: phase[1],
            a_vel1: phase[2],
            a_vel2: phase[3],
        }
    }

    /// Check that none of the angles or velocities are NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.phase().iter().all(|v| v.is_finite())
    }

    /// Linearly interpolate the dynamic part between two states
    /// with the parameters of `self`.
    ///
    /// Used to draw smooth frames between simulation steps.
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        self.with_phase(self.phase().lerp(&other.phase(), t))
    }
}

#[cfg(test)]
pub(crate) fn reference_params() -> PendulumParams {
    PendulumParams::new(Vec2::new(200., 100.), 1.5, 1.0, 2.0, 2.0).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_params() {
        let pivot = Vec2::zeros();
        assert_eq!(
            PendulumParams::new(pivot, -1.0, 1.0, 1.0, 1.0),
            Err(ParamError::NonPositiveLength {
                link: 1,
                value: -1.0
            })
        );
        assert_eq!(
            PendulumParams::new(pivot, 1.0, 1.0, 1.0, 0.0),
            Err(ParamError::NonPositiveMass {
                link: 2,
                value: 0.0
            })
        );
        assert_eq!(
            PendulumParams::new(pivot, 1.0, f64::NAN, 1.0, 1.0),
            Err(ParamError::NonFinite)
        );
        assert_eq!(
            PendulumParams::new(Vec2::new(f64::INFINITY, 0.), 1.0, 1.0, 1.0, 1.0),
            Err(ParamError::NonFinite)
        );
    }

    #[test]
    fn phase_conversion() {
        let mut state = PendulumState::at_rest(reference_params(), 1.3, 1.0);
        assert_eq!(state.phase(), Phase::new(1.3, 1.0, 0., 0.));

        state.a_vel2 = -0.5;
        let moved = state.with_phase(Phase::new(2.0, -1.0, 0.25, 4.0));
        assert_eq!(moved.params(), state.params());
        assert_eq!(
            (moved.angle1, moved.angle2, moved.a_vel1, moved.a_vel2),
            (2.0, -1.0, 0.25, 4.0)
        );

        let halfway = state.lerp(&moved, 0.5);
        approx::assert_relative_eq!(halfway.angle1, 1.65, epsilon = 1e-12);
        approx::assert_relative_eq!(halfway.a_vel2, 1.75, epsilon = 1e-12);
    }

    #[test]
    fn finiteness() {
        let mut state = PendulumState::at_rest(reference_params(), 0.1, 0.2);
        assert!(state.is_finite());
        state.a_vel1 = f64::NAN;
        assert!(!state.is_finite());
        state.a_vel1 = 0.;
        state.angle2 = f64::NEG_INFINITY;
        assert!(!state.is_finite());
    }
}
