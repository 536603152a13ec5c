//! Real-time visualization for simulations implemented with `pendulum-core`.
//!
//! To visualize a simulation,
//! first create a [`RenderWindow`],
//! then call [`run_animation`][`RenderWindow::run_animation`] on it.
//! See the demos in the `double-pendulum` crate for concrete usage.

#![warn(missing_docs)]

mod animation;
#[doc(inline)]
pub use animation::{Animation, AnimationParams, AnimationState, StepTiming};

mod camera;

pub(crate) mod pipelines;
#[doc(inline)]
pub use pipelines::{
    line::{JoinStyle, LineParams, LineWidth},
    Painter,
};

mod render_window;
#[doc(inline)]
pub use render_window::{RenderError, RenderWindow, WindowParams};

mod style;
#[doc(inline)]
pub use style::PendulumStyle;

pub use palette;
pub use winit::keyboard::KeyCode;
