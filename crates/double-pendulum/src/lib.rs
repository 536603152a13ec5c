//! A double pendulum simulated with a fourth-order Runge-Kutta integrator,
//! with optional real-time visuals.
//!
//! # Overview
//!
//! The state of a double pendulum is its two angles
//! (measured from the downward vertical) and their angular velocities,
//! together with the fixed [`PendulumParams`]: pivot position,
//! rod lengths and bob masses.
//! A [`PendulumState`] is advanced with the pure function [`step`],
//! which takes one RK4 step of size [`StepParams::dt`]
//! and then multiplies both angular velocities by a damping factor
//! ([`StepParams::damping`], 0.999 by default).
//!
//! ```
//! use double_pendulum as dp;
//!
//! let params = dp::PendulumParams::new(dp::Vec2::new(200., 100.), 1.5, 1.0, 2.0, 2.0)?;
//! let mut state = dp::PendulumState::at_rest(params, 1.3, 1.0);
//! let step_params = dp::StepParams::default();
//! for _ in 0..100 {
//!     state = dp::step(state, &step_params);
//! }
//! assert!(state.is_finite());
//! # Ok::<(), dp::ParamError>(())
//! ```
//!
//! For drawing, the [`Pendulum`] entity bundles a state with a bounded
//! [`Trail`] of recent positions of the lower bob.
//! [`Pendulum::update`] takes one step, maps the new angles
//! to drawing coordinates with a [`Projection`] and records the trail,
//! reporting [`SimulationError::Diverged`] instead of committing
//! a step that produced non-finite values.
//!
//! The [`energy`] module computes the total mechanical energy of a state.
//! With damping disabled ([`StepParams::undamped`]) it should stay nearly constant,
//! which makes it a useful check on the integrator;
//! see [`EnergyMonitor`].
//!
//! # Visuals
//!
//! With the `visuals` feature enabled, the [`visuals`] module
//! re-exports the `pendulum-visuals` crate,
//! which opens a window and draws animations with `wgpu`.
//! See the demos in this crate's `examples` directory
//! for how to use it.

#[doc(inline)]
pub use pendulum_core::*;

#[cfg(feature = "visuals")]
#[doc(inline)]
pub use pendulum_visuals as visuals;
