//! A simulated pendulum as the host loop sees it:
//! the dynamic state plus everything derived from it between frames.

use crate::{integrator, PendulumFrame, PendulumState, Projection, StepParams, Trail};

/// Error in advancing a [`Pendulum`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationError {
    /// A step produced a NaN or infinite angle or velocity.
    ///
    /// The offending step is discarded,
    /// so the pendulum still holds the last finite state.
    #[error("Simulation diverged after {steps} steps")]
    Diverged {
        /// Number of steps successfully taken before the failing one.
        steps: u64,
    },
}

/// A double pendulum being simulated and drawn,
/// with the trail of recent positions of its lower bob.
#[derive(Clone, Debug)]
pub struct Pendulum {
    state: PendulumState,
    trail: Trail,
    steps: u64,
}

impl Pendulum {
    /// Start simulating from the given state with an empty default trail.
    pub fn new(state: PendulumState) -> Self {
        Self::with_trail(state, Trail::default())
    }

    /// Start simulating from the given state, recording into `trail`.
    pub fn with_trail(state: PendulumState, trail: Trail) -> Self {
        let p = state.params();
        log::debug!(
            "New pendulum at {:?}: l = ({}, {}), m = ({}, {}), angles = ({}, {})",
            p.pivot(),
            p.l1(),
            p.l2(),
            p.m1(),
            p.m2(),
            state.angle1,
            state.angle2,
        );
        Self {
            state,
            trail,
            steps: 0,
        }
    }

    /// The current state.
    #[inline]
    pub fn state(&self) -> &PendulumState {
        &self.state
    }

    /// Recent positions of the lower bob, newest first.
    #[inline]
    pub fn trail(&self) -> &Trail {
        &self.trail
    }

    /// Number of steps taken so far.
    #[inline]
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// Advance the simulation by one step
    /// and record the new position of the lower bob in the trail.
    ///
    /// If the step produces non-finite values, nothing is changed
    /// and [`SimulationError::Diverged`] is returned.
    pub fn update(
        &mut self,
        params: &StepParams,
        projection: &Projection,
    ) -> Result<(), SimulationError> {
        let next = integrator::step(self.state, params);
        if !next.is_finite() {
            log::warn!(
                "Pendulum diverged after {} steps, last finite state {:?}",
                self.steps,
                self.state.phase(),
            );
            return Err(SimulationError::Diverged { steps: self.steps });
        }

        self.state = next;
        self.steps += 1;
        let (_, bob2) = projection.bob_positions(&self.state);
        self.trail.push(bob2);
        Ok(())
    }

    /// Drawing-space positions of the current state.
    pub fn frame(&self, projection: &Projection) -> PendulumFrame {
        projection.frame(&self.state)
    }

    /// A pendulum whose state is interpolated between `self` and `next`,
    /// carrying the trail and step count of `self`.
    ///
    /// Used to draw smooth frames between simulation steps.
    /// The recorded trail then never runs ahead of the interpolated bob;
    /// see [`Trail::polyline_from`] for joining the two when drawing.
    pub fn lerp(&self, next: &Self, t: f64) -> Self {
        Self {
            state: self.state.lerp(&next.state, t),
            trail: self.trail.clone(),
            steps: self.steps,
        }
    }

    /// Restart from the given state, clearing the trail and step count.
    pub fn reset(&mut self, state: PendulumState) {
        self.state = state;
        self.trail.clear();
        self.steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::reference_params, PendulumParams, Vec2};

    #[test]
    fn update_follows_the_pure_step() {
        let start = PendulumState::at_rest(reference_params(), 1.3, 1.0);
        let params = StepParams::default();
        let proj = Projection::default();

        let mut pend = Pendulum::new(start);
        let mut expected = start;
        for _ in 0..25 {
            pend.update(&params, &proj).unwrap();
            expected = integrator::step(expected, &params);
        }
        assert_eq!(pend.state(), &expected);
        assert_eq!(pend.steps(), 25);
        assert_eq!(pend.trail().newest(), Some(&pend.frame(&proj).bob2));
    }

    #[test]
    fn trail_fills_to_capacity() {
        let start = PendulumState::at_rest(reference_params(), 1.3, 1.0);
        let params = StepParams::default();
        let proj = Projection::default();
        let mut pend = Pendulum::new(start);

        let mut history = Vec::new();
        for _ in 0..150 {
            pend.update(&params, &proj).unwrap();
            history.push(pend.frame(&proj).bob2);
        }
        assert_eq!(pend.trail().len(), 60);
        itertools::assert_equal(pend.trail().iter(), history.iter().rev().take(60));

        pend.reset(start);
        assert!(pend.trail().is_empty());
        assert_eq!(pend.steps(), 0);
        assert_eq!(pend.state(), &start);
    }

    #[test]
    fn interpolated_trail_does_not_lead_the_bob() {
        let start = PendulumState::at_rest(reference_params(), 1.3, 1.0);
        let params = StepParams::default();
        let proj = Projection::default();
        let mut old = Pendulum::new(start);
        for _ in 0..3 {
            old.update(&params, &proj).unwrap();
        }
        let mut new = old.clone();
        new.update(&params, &proj).unwrap();

        let mid = old.lerp(&new, 0.5);
        assert_eq!(mid.steps(), 3);
        assert_eq!(mid.trail().len(), 3);
        assert_eq!(mid.trail().newest(), old.trail().newest());
        let expected_angle = 0.5 * (old.state().angle1 + new.state().angle1);
        approx::assert_relative_eq!(mid.state().angle1, expected_angle, epsilon = 1e-12);
        assert_eq!(old.lerp(&new, 1.0).state(), new.state());

        // the drawn trail runs from the interpolated bob to the last recorded point
        let bob2 = mid.frame(&proj).bob2;
        itertools::assert_equal(
            mid.trail().polyline_from(bob2).take(2),
            [bob2, *old.trail().newest().unwrap()],
        );
    }

    #[test]
    fn divergence_is_reported_and_not_committed() {
        // a velocity so large that its square overflows on the first stage
        let params = PendulumParams::new(Vec2::zeros(), 1.0, 1.0, 1.0, 1.0).unwrap();
        let mut start = PendulumState::at_rest(params, 0.5, -0.5);
        start.a_vel1 = 1e200;

        let mut pend = Pendulum::new(start);
        let res = pend.update(&StepParams::default(), &Projection::default());
        assert_eq!(res, Err(SimulationError::Diverged { steps: 0 }));
        assert_eq!(pend.state(), &start);
        assert!(pend.trail().is_empty());
    }
}
