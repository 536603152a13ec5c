//! The reference scenario: a single double pendulum
//! hanging from (200, 100) in a 400 x 400 window,
//! released from rest at angles 1.3 and 1.0.
//!
//! One damped RK4 step of 0.02 seconds is taken per drawn frame.
//! Press R to release the pendulum again from its starting position.

use double_pendulum as dp;
use dp::visuals as dv;
use tracing_subscriber::{filter::LevelFilter, FmtSubscriber};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .init();

    let params = dp::PendulumParams::new(dp::Vec2::new(200., 100.), 1.5, 1.0, 2.0, 2.0)?;
    let start = dp::PendulumState::at_rest(params, 1.3, 1.0);

    let step_params = dp::StepParams::default();
    let projection = dp::Projection::default();
    let style = dv::PendulumStyle::default();

    let mut window = dv::RenderWindow::new(dv::WindowParams::default())?;
    window.run_animation(dv::Animation {
        params: dv::AnimationParams::default(),
        state: dp::Pendulum::new(start),
        step: |pendulum| {
            // a diverged pendulum stays frozen at its last finite state
            if let Err(err) = pendulum.update(&step_params, &projection) {
                log::error!("{err}");
            }
        },
        draw: |pendulum, draw| {
            draw.pendulum(pendulum, &projection, &style);
        },
        on_key: |key, pendulum| {
            if key == dv::KeyCode::KeyR {
                pendulum.reset(start);
            }
        },
    })?;

    Ok(())
}
