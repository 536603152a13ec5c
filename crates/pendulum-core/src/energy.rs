//! Energy diagnostics.
//!
//! The simulation itself never needs these,
//! but total energy is the easiest way to tell whether the integrator behaves:
//! without damping it should stay (nearly) constant,
//! and with damping it should only ever go down.

use crate::PendulumState;

/// Gravitational potential energy, zero when both rods hang straight down.
pub fn potential_energy(state: &PendulumState, g: f64) -> f64 {
    let p = state.params();
    (p.m1() + p.m2()) * p.l1() * g * (1. - f64::cos(state.angle1))
        + p.m2() * p.l2() * g * (1. - f64::cos(state.angle2))
}

/// Kinetic energy of the two bobs.
pub fn kinetic_energy(state: &PendulumState) -> f64 {
    let p = state.params();
    let v1 = p.l1() * state.a_vel1;
    let v2 = p.l2() * state.a_vel2;
    0.5 * p.m1() * v1 * v1
        + 0.5
            * p.m2()
            * (v1 * v1
                + v2 * v2
                + 2. * p.l1()
                    * p.l2()
                    * state.a_vel1
                    * state.a_vel2
                    * f64::cos(state.angle1 - state.angle2))
}

/// Total mechanical energy of the system.
#[inline]
pub fn total_energy(state: &PendulumState, g: f64) -> f64 {
    potential_energy(state, g) + kinetic_energy(state)
}

/// Tracks how far the energy of a pendulum has wandered
/// from what it was at some starting point.
#[derive(Clone, Copy, Debug)]
pub struct EnergyMonitor {
    baseline: f64,
    gravity: f64,
}

impl EnergyMonitor {
    /// Record the energy of `state` as the baseline.
    pub fn new(state: &PendulumState, gravity: f64) -> Self {
        Self {
            baseline: total_energy(state, gravity),
            gravity,
        }
    }

    /// The energy recorded at construction.
    #[inline]
    pub fn baseline(&self) -> f64 {
        self.baseline
    }

    /// Signed difference between the energy of `state` and the baseline.
    pub fn drift(&self, state: &PendulumState) -> f64 {
        total_energy(state, self.gravity) - self.baseline
    }

    /// Drift relative to the baseline energy.
    ///
    /// A pendulum released from rest straight down has zero energy,
    /// in which case the absolute drift is returned instead.
    pub fn relative_drift(&self, state: &PendulumState) -> f64 {
        let drift = self.drift(state);
        if self.baseline == 0. {
            drift
        } else {
            drift / self.baseline.abs()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::reference_params, STANDARD_GRAVITY as G};
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn potential_of_raised_rods() {
        let params = reference_params();
        // both rods horizontal: bob 1 raised by l1, bob 2 by l1 + l2
        let state = PendulumState::at_rest(params, FRAC_PI_2, FRAC_PI_2);
        let expected =
            params.m1() * G * params.l1() + params.m2() * G * (params.l1() + params.l2());
        assert_relative_eq!(
            potential_energy(&state, G),
            expected,
            max_relative = 1e-12
        );
        assert_eq!(kinetic_energy(&state), 0.);
    }

    #[test]
    fn kinetic_of_rigid_rotation() {
        // both rods aligned and spinning together behave like
        // two point masses on one rigid rod
        let params = reference_params();
        let mut state = PendulumState::at_rest(params, 0.4, 0.4);
        state.a_vel1 = 1.5;
        state.a_vel2 = 1.5;
        let r1 = params.l1();
        let r2 = params.l1() + params.l2();
        let expected = 0.5 * (params.m1() * r1 * r1 + params.m2() * r2 * r2) * 1.5 * 1.5;
        assert_relative_eq!(kinetic_energy(&state), expected, max_relative = 1e-12);
    }

    #[test]
    fn golden_configuration_energy() {
        let state = PendulumState::at_rest(reference_params(), 1.3, 1.0);
        assert_relative_eq!(
            total_energy(&state, G),
            52.134_287_706_023_88,
            max_relative = 1e-12
        );
    }

    #[test]
    fn monitor_reports_drift() {
        let state = PendulumState::at_rest(reference_params(), 1.3, 1.0);
        let monitor = EnergyMonitor::new(&state, G);
        assert_eq!(monitor.drift(&state), 0.);

        let mut moved = state;
        moved.a_vel1 = 0.1;
        let expected = kinetic_energy(&moved);
        assert_relative_eq!(monitor.drift(&moved), expected, max_relative = 1e-9);
        assert_relative_eq!(
            monitor.relative_drift(&moved),
            expected / monitor.baseline(),
            max_relative = 1e-9
        );

        let resting = PendulumState::at_rest(reference_params(), 0., 0.);
        let zero_monitor = EnergyMonitor::new(&resting, G);
        assert_eq!(zero_monitor.relative_drift(&moved), total_energy(&moved, G));
    }
}
