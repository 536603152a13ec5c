//! Fixed-step 4th-order Runge-Kutta time integration.

use nalgebra as na;

use crate::{dynamics, Phase, PendulumState, STANDARD_GRAVITY};

/// Which intermediate points the link-2 acceleration is evaluated at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rk4Scheme {
    /// Textbook RK4, every stage evaluates both accelerations
    /// at the same offset phase-space point.
    #[default]
    Classic,
    /// Reproduces historically recorded trajectories,
    /// where stages 2-4 evaluate the link-2 acceleration
    /// with the link-2 angle offset applied to both angle arguments.
    /// Use this only when matching recorded historical runs.
    Reference,
}

/// Parameters of a single simulation step.
#[derive(Clone, Copy, Debug)]
pub struct StepParams {
    /// Length of the time step. Default: 0.02.
    pub dt: f64,
    /// Gravitational acceleration. Default: 9.81.
    pub gravity: f64,
    /// Factor both angular velocities are multiplied with after every step.
    /// Default: 0.999.
    ///
    /// This bleeds energy out of the system to keep long runs tame.
    /// Set to 1.0 to integrate the undamped equations.
    pub damping: f64,
    /// Stage evaluation scheme. Default: [`Rk4Scheme::Classic`].
    pub scheme: Rk4Scheme,
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            dt: 0.02,
            gravity: STANDARD_GRAVITY,
            damping: 0.999,
            scheme: Rk4Scheme::Classic,
        }
    }
}

impl StepParams {
    /// Default parameters without damping.
    pub fn undamped() -> Self {
        Self {
            damping: 1.0,
            ..Default::default()
        }
    }
}

/// Take one classical Runge-Kutta step of size `dt`.
///
/// `derivative_at` receives the offset from `y`
/// at which the derivative should be evaluated
/// (zero for the first stage, then `k1/2`, `k2/2` and `k3`)
/// and returns the derivative there.
/// Passing the offset instead of the shifted point
/// lets a caller evaluate different components at different points.
///
/// ```
/// # use pendulum_core::{rk4_step, na};
/// // dy/dt = y, one step from y = 1
/// let y = na::Vector1::new(1.0);
/// let next = rk4_step(&y, 0.1, |offset| y + offset);
/// assert!((next[0] - f64::exp(0.1)).abs() < 1e-6);
/// ```
pub fn rk4_step<const N: usize>(
    y: &na::SVector<f64, N>,
    dt: f64,
    mut derivative_at: impl FnMut(&na::SVector<f64, N>) -> na::SVector<f64, N>,
) -> na::SVector<f64, N> {
    let k1 = dt * derivative_at(&na::SVector::zeros());
    let k2 = dt * derivative_at(&(k1 / 2.));
    let k3 = dt * derivative_at(&(k2 / 2.));
    let k4 = dt * derivative_at(&k3);
    y + (k1 + 2. * k2 + 2. * k3 + k4) / 6.
}

/// Advance a pendulum by one time step, returning the new state.
///
/// Damping is applied to the velocities after the Runge-Kutta update.
/// Non-finite values are not checked for here;
/// see [`Pendulum::update`][crate::Pendulum::update] for a checked step.
pub fn step(state: PendulumState, params: &StepParams) -> PendulumState {
    let phase = state.phase();
    let pend = state.params();
    let g = params.gravity;

    let mut next = match params.scheme {
        Rk4Scheme::Classic => rk4_step(&phase, params.dt, |offset| {
            dynamics::derivative(&(phase + offset), pend, g)
        }),
        Rk4Scheme::Reference => rk4_step(&phase, params.dt, |offset| {
            let shifted = phase + offset;
            let mut shifted_2 = shifted;
            shifted_2[0] = phase[0] + offset[1];
            Phase::new(
                shifted[2],
                shifted[3],
                dynamics::phase_accel1(&shifted, pend, g),
                dynamics::phase_accel2(&shifted_2, pend, g),
            )
        }),
    };

    next[2] *= params.damping;
    next[3] *= params.damping;
    state.with_phase(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{state::reference_params, total_energy};
    use approx::assert_abs_diff_eq;

    fn reference_start() -> PendulumState {
        PendulumState::at_rest(reference_params(), 1.3, 1.0)
    }

    fn run(mut state: PendulumState, params: &StepParams, steps: usize) -> PendulumState {
        for _ in 0..steps {
            state = step(state, params);
        }
        state
    }

    /// One step from the reference configuration,
    /// compared against values from an independent RK4 implementation.
    #[test]
    fn golden_single_step() {
        let next = step(reference_start(), &StepParams::default());
        let expected = Phase::new(
            1.298_648_721_013_776_5,
            1.000_285_805_320_232_4,
            -0.135_002_456_494_768_22,
            0.028_603_885_913_051_599,
        );
        assert_abs_diff_eq!(next.phase(), expected, epsilon = 1e-9);

        let undamped = step(reference_start(), &StepParams::undamped());
        let expected_undamped = Phase::new(
            1.298_648_721_013_776_5,
            1.000_285_805_320_232_4,
            -0.135_137_594_088_857_09,
            0.028_632_518_431_483_081,
        );
        assert_abs_diff_eq!(undamped.phase(), expected_undamped, epsilon = 1e-9);
    }

    #[test]
    fn reference_scheme_reproduces_historical_values() {
        let params = StepParams {
            scheme: Rk4Scheme::Reference,
            ..Default::default()
        };
        let next = step(reference_start(), &params);
        let expected = Phase::new(
            1.298_648_721_013_776_5,
            1.000_285_737_437_015_1,
            -0.135_002_455_795_070_45,
            0.028_590_555_836_372_329,
        );
        assert_abs_diff_eq!(next.phase(), expected, epsilon = 1e-9);

        let classic = step(reference_start(), &StepParams::default());
        assert!(
            (classic.angle2 - next.angle2).abs() > 1e-8,
            "schemes should give different results"
        );
        assert!((classic.a_vel2 - next.a_vel2).abs() > 1e-6);
    }

    #[test]
    fn rest_is_a_fixed_point() {
        let start = PendulumState::at_rest(reference_params(), 0., 0.);
        for scheme in [Rk4Scheme::Classic, Rk4Scheme::Reference] {
            let params = StepParams {
                scheme,
                ..Default::default()
            };
            let end = run(start, &params, 100);
            assert_abs_diff_eq!(end.phase(), Phase::zeros(), epsilon = 1e-15);
        }
    }

    #[test]
    fn parameters_are_untouched() {
        let start = reference_start();
        let end = run(start, &StepParams::default(), 10);
        assert_eq!(start.params(), end.params());
    }

    #[test]
    fn deterministic() {
        let params = StepParams::default();
        let a = run(reference_start(), &params, 500);
        let b = run(reference_start(), &params, 500);
        assert_eq!(a.phase(), b.phase());
    }

    /// Halving the time step should cut the error over a fixed time span
    /// by a factor of about 2^4.
    #[test]
    fn fourth_order_convergence() {
        let mut start = reference_start();
        start.a_vel1 = 0.4;
        start.a_vel2 = -0.3;
        let horizon = 0.4;

        let integrate = |steps: usize| {
            let params = StepParams {
                dt: horizon / steps as f64,
                ..StepParams::undamped()
            };
            run(start, &params, steps).phase()
        };
        let reference = integrate(4000);
        let errors: Vec<f64> = [20, 40, 80]
            .into_iter()
            .map(|steps| (integrate(steps) - reference).amax())
            .collect();

        for pair in errors.windows(2) {
            let ratio = pair[0] / pair[1];
            assert!(
                (12.0..20.0).contains(&ratio),
                "error ratio {ratio} not close to 16 (errors: {errors:?})"
            );
        }
    }

    #[test]
    fn undamped_energy_is_conserved() {
        let params = StepParams {
            dt: 0.005,
            ..StepParams::undamped()
        };
        let mut state = reference_start();
        let e0 = total_energy(&state, params.gravity);
        for _ in 0..1000 {
            state = step(state, &params);
            let drift = (total_energy(&state, params.gravity) - e0).abs() / e0;
            assert!(drift < 0.01, "energy drifted by {drift}");
        }
    }

    #[test]
    fn damped_energy_never_increases() {
        let params = StepParams::default();
        let mut state = reference_start();
        let mut prev = total_energy(&state, params.gravity);
        for i in 0..2000 {
            state = step(state, &params);
            let e = total_energy(&state, params.gravity);
            assert!(
                e <= prev + 1e-9 * prev.abs(),
                "energy increased at step {i}: {prev} -> {e}"
            );
            prev = e;
        }
    }

    #[test]
    fn generic_kernel_matches_exponential() {
        // y' = -2y has the exact solution exp(-2t)
        let mut y = na::Vector2::new(1.0, 3.0);
        let dt = 0.01;
        for _ in 0..100 {
            let current = y;
            y = rk4_step(&current, dt, |offset| -2. * (current + offset));
        }
        let exact = f64::exp(-2.);
        assert_abs_diff_eq!(y, na::Vector2::new(exact, 3. * exact), epsilon = 1e-8);
    }
}
