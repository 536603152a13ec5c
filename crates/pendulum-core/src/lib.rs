//! This is the core crate containing the simulation side of `double-pendulum`
//! (specifically, everything except the visuals).
//! See the `double-pendulum` crate's documentation for an introduction.

#![warn(missing_docs)]

pub mod state;
#[doc(inline)]
pub use state::{ParamError, PendulumParams, PendulumState};

pub mod dynamics;

pub mod integrator;
#[doc(inline)]
pub use integrator::{rk4_step, step, Rk4Scheme, StepParams};

pub mod energy;
#[doc(inline)]
pub use energy::{total_energy, EnergyMonitor};

pub mod projection;
#[doc(inline)]
pub use projection::{PendulumFrame, Projection};

pub mod trail;
#[doc(inline)]
pub use trail::Trail;

pub mod pendulum;
#[doc(inline)]
pub use pendulum::{Pendulum, SimulationError};

// nalgebra re-exports of common types for convenience

pub use nalgebra as na;
/// Type alias for a 2D `nalgebra` vector.
pub type Vec2 = na::Vector2<f64>;
/// Phase-space vector `(θ1, θ2, ω1, ω2)` of a double pendulum.
pub type Phase = na::Vector4<f64>;

/// Standard gravitational acceleration used by default.
pub const STANDARD_GRAVITY: f64 = 9.81;
