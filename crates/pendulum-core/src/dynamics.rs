//! Equations of motion of the double pendulum.
//!
//! These are the closed-form solutions of the Lagrangian equations
//! for two point masses on massless rigid rods,
//! giving the angular accelerations of both rods
//! as a function of the instantaneous angles and angular velocities.
//!
//! Nothing here guards against a vanishing denominator.
//! With positive masses [`mass_denominator`] is bounded below by `2·m1`,
//! so this only matters for parameters built around the validation in
//! [`PendulumParams::new`].

use crate::{Phase, PendulumParams};

/// The factor `2m1 + m2 - m2 cos(2θ1 - 2θ2)` shared by the denominators
/// of both accelerations.
#[inline]
pub fn mass_denominator(theta1: f64, theta2: f64, m1: f64, m2: f64) -> f64 {
    2. * m1 + m2 - m2 * f64::cos(2. * theta1 - 2. * theta2)
}

/// Angular acceleration of the upper rod.
#[allow(clippy::too_many_arguments)]
pub fn accel1(
    theta1: f64,
    theta2: f64,
    omega1: f64,
    omega2: f64,
    l1: f64,
    l2: f64,
    m1: f64,
    m2: f64,
    g: f64,
) -> f64 {
    let top = -g * (2. * m1 + m2) * f64::sin(theta1)
        - m2 * g * f64::sin(theta1 - 2. * theta2)
        - 2. * f64::sin(theta1 - theta2)
            * m2
            * (omega2 * omega2 * l2 + omega1 * omega1 * l1 * f64::cos(theta1 - theta2));
    let bottom = l1 * mass_denominator(theta1, theta2, m1, m2);
    top / bottom
}

/// Angular acceleration of the lower rod.
#[allow(clippy::too_many_arguments)]
pub fn accel2(
    theta1: f64,
    theta2: f64,
    omega1: f64,
    omega2: f64,
    l1: f64,
    l2: f64,
    m1: f64,
    m2: f64,
    g: f64,
) -> f64 {
    let top = 2.
        * f64::sin(theta1 - theta2)
        * (omega1 * omega1 * l1 * (m1 + m2)
            + g * (m1 + m2) * f64::cos(theta1)
            + omega2 * omega2 * l2 * m2 * f64::cos(theta1 - theta2));
    let bottom = l2 * mass_denominator(theta1, theta2, m1, m2);
    top / bottom
}

/// [`accel1`] evaluated at a phase-space point.
#[inline]
pub fn phase_accel1(phase: &Phase, params: &PendulumParams, g: f64) -> f64 {
    accel1(
        phase[0],
        phase[1],
        phase[2],
        phase[3],
        params.l1(),
        params.l2(),
        params.m1(),
        params.m2(),
        g,
    )
}

/// [`accel2`] evaluated at a phase-space point.
#[inline]
pub fn phase_accel2(phase: &Phase, params: &PendulumParams, g: f64) -> f64 {
    accel2(
        phase[0],
        phase[1],
        phase[2],
        phase[3],
        params.l1(),
        params.l2(),
        params.m1(),
        params.m2(),
        g,
    )
}

/// Time derivative of a phase-space point: `(ω1, ω2, accel1, accel2)`.
pub fn derivative(phase: &Phase, params: &PendulumParams, g: f64) -> Phase {
    Phase::new(
        phase[2],
        phase[3],
        phase_accel1(phase, params, g),
        phase_accel2(phase, params, g),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::reference_params, STANDARD_GRAVITY as G};
    use approx::assert_relative_eq;

    #[test]
    fn hanging_straight_down_is_at_rest() {
        let params = reference_params();
        let d = derivative(&Phase::zeros(), &params, G);
        assert_eq!(d, Phase::zeros());
    }

    #[test]
    fn known_values() {
        // hand-evaluated at θ1 = 1.3, θ2 = 1.0 released from rest
        // with l1 = 1.5, l2 = 1, m1 = m2 = 2
        let (t1, t2) = (1.3f64, 1.0f64);
        let denom = 6. - 2. * f64::cos(0.6);
        let expected_1 = (-G * 6. * t1.sin() - 2. * G * f64::sin(t1 - 2.)) / (1.5 * denom);
        let expected_2 = 2. * f64::sin(0.3) * (G * 4. * t1.cos()) / denom;

        let params = reference_params();
        let phase = Phase::new(t1, t2, 0., 0.);
        assert_relative_eq!(
            phase_accel1(&phase, &params, G),
            expected_1,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            phase_accel2(&phase, &params, G),
            expected_2,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            mass_denominator(t1, t2, 2., 2.),
            denom,
            max_relative = 1e-12
        );
    }

    #[test]
    fn mirror_symmetry() {
        // reflecting the pendulum across the vertical flips the sign of the accelerations
        let params = reference_params();
        let phase = Phase::new(0.7, -2.1, 1.2, -0.4);
        let d = derivative(&phase, &params, G);
        let d_mirror = derivative(&-phase, &params, G);
        assert_relative_eq!(d, -d_mirror, max_relative = 1e-12);
    }

    #[test]
    fn denominator_bounded_by_upper_mass() {
        for i in 0..64 {
            let theta = i as f64 * 0.1;
            let denom = mass_denominator(theta, -theta, 0.5, 3.0);
            assert!(denom >= 2. * 0.5 - 1e-12, "denominator {denom} at {theta}");
        }
    }
}
