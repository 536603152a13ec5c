//! Parameters for animated visuals.

use pendulum_core as pc;

use super::pipelines::Painter;

/// An animated visualization of simulation data.
///
/// To display the animation in a window,
/// use [`RenderWindow::run_animation`][crate::RenderWindow::run_animation].
///
/// The `State` type must implement [`AnimationState`]
/// to facilitate interpolated rendering.
/// If you don't care about this, you can simply
/// leave the impl block empty:
/// ```
/// # use pendulum_visuals::AnimationState;
/// # #[derive(Clone)]
/// # struct MyState;
/// impl AnimationState for MyState {}
/// ```
/// Note that `MyState` must still implement `Clone`.
/// Interpolation only happens with [`StepTiming::RealTime`];
/// with the default [`StepTiming::PerFrame`]
/// every frame draws the latest state as is.
pub struct Animation<State, StepFn, DrawFn, OnKeyFn>
where
    State: AnimationState,
    StepFn: FnMut(&mut State),
    DrawFn: FnMut(&State, &mut Painter),
    OnKeyFn: FnMut(crate::KeyCode, &mut State),
{
    /// Control parameters.
    pub params: AnimationParams,
    /// Initial state of the simulation.
    pub state: State,
    /// A function that runs the simulation forward for a timestep.
    pub step: StepFn,
    /// A function that draws the simulation state.
    pub draw: DrawFn,
    /// A function called whenever a key is pressed.
    ///
    /// `Q` is reserved for closing the window,
    /// but is still passed to this function before that happens.
    pub on_key: OnKeyFn,
}

/// When the simulation is stepped relative to drawn frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StepTiming {
    /// Take exactly one step per drawn frame.
    ///
    /// Simulated time then runs as fast as the display refreshes,
    /// which ties the visual speed to the monitor's refresh rate.
    PerFrame,
    /// Step to keep simulated time in sync with real time.
    RealTime {
        /// Time in seconds per simulation timestep.
        /// Should match the `dt` the step function uses.
        dt: f64,
        /// Maximum number of timesteps to simulate between draws.
        ///
        /// If the simulation can't keep up with real time,
        /// it will slow down to this value.
        /// This serves as a controlled bound to avoid a spiral
        /// where the simulation falls farther and farther behind,
        /// trying to do more and more steps to catch up
        /// and ultimately throttling itself to a stop.
        max_steps_per_frame: usize,
    },
}

/// Parameters to control aspects of an [`Animation`].
#[derive(Clone, Debug)]
pub struct AnimationParams {
    /// Size of the drawing area in scene units (width, height).
    /// Default: 400 x 400.
    ///
    /// The scene spans from (0, 0) in the top left corner
    /// to this size in the bottom right, with y growing downward.
    /// If the window's aspect ratio differs,
    /// the scene is kept centered and undistorted.
    pub scene_size: (f32, f32),
    /// Color the window is cleared to before drawing.
    /// Default: black.
    pub background: palette::LinSrgb,
    /// How simulation steps are scheduled. Default: [`StepTiming::PerFrame`].
    pub timing: StepTiming,
}

impl Default for AnimationParams {
    fn default() -> Self {
        Self {
            scene_size: (400., 400.),
            background: palette::named::BLACK.into(),
            timing: StepTiming::PerFrame,
        }
    }
}

/// Trait required from states given to [`Animation`]s.
pub trait AnimationState: Clone {
    /// Interpolate between two states.
    ///
    /// Used to create smooth animations even if the simulation timestep is long.
    /// The default implementation does not do any interpolation.
    #[allow(unused_variables)]
    fn interpolate(old: &Self, new: &Self, t: f64) -> Self {
        new.clone()
    }
}

impl AnimationState for pc::Pendulum {
    fn interpolate(old: &Self, new: &Self, t: f64) -> Self {
        old.lerp(new, t)
    }
}

impl<T: AnimationState> AnimationState for Vec<T> {
    fn interpolate(old: &Self, new: &Self, t: f64) -> Self {
        old.iter()
            .zip(new)
            .map(|(o, n)| T::interpolate(o, n, t))
            .collect()
    }
}

/// Frame pacing logic separated from the window for testability.
///
/// Accumulates elapsed real time and decides
/// how many steps to take before the next draw.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrameClock {
    timing: StepTiming,
    time_in_frame: f64,
}

impl FrameClock {
    /// Create a clock for the given timing,
    /// rejecting a real-time step that isn't finite and positive.
    pub fn new(timing: StepTiming) -> Result<Self, crate::RenderError> {
        if let StepTiming::RealTime { dt, .. } = timing {
            if !(dt.is_finite() && dt > 0.) {
                return Err(crate::RenderError::InvalidTimestep { dt });
            }
        }
        Ok(Self {
            timing,
            time_in_frame: 0.,
        })
    }

    /// Whether drawn frames fall between two simulation states.
    pub fn interpolates(&self) -> bool {
        matches!(self.timing, StepTiming::RealTime { .. })
    }

    /// Register `elapsed` seconds of real time
    /// and return the number of steps to simulate.
    pub fn advance(&mut self, elapsed: f64) -> usize {
        match self.timing {
            StepTiming::PerFrame => 1,
            StepTiming::RealTime {
                dt,
                max_steps_per_frame,
            } => {
                self.time_in_frame += elapsed;
                let due = (self.time_in_frame / dt).floor();
                self.time_in_frame = f64::max(self.time_in_frame - due * dt, 0.);
                // ...but don't go beyond a maximum to avoid the "spiral of death"
                // where we constantly fall farther and farther behind real time
                usize::min(due as usize, max_steps_per_frame)
            }
        }
    }

    /// How far between the previous and next state the drawn frame should be.
    pub fn interpolation_factor(&self) -> f64 {
        match self.timing {
            StepTiming::PerFrame => 1.,
            StepTiming::RealTime { dt, .. } => self.time_in_frame / dt,
        }
    }
}
