//! Several undamped double pendulums released from almost the same position.
//!
//! The starting angles differ by a thousandth of a radian,
//! which is invisible at first, but the motion is chaotic
//! and the pendulums soon go their separate ways.
//! Simulation runs in real time with interpolated drawing,
//! independent of the monitor's refresh rate.
//!
//! Press R to restart.

use double_pendulum as dp;
use dp::visuals as dv;
use dv::palette::{FromColor, Hsv, Srgb};
use tracing_subscriber::{filter::LevelFilter, FmtSubscriber};

const COUNT: usize = 7;
const ANGLE_SPREAD: f64 = 1e-3;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .init();

    let params = dp::PendulumParams::new(dp::Vec2::new(200., 120.), 1.5, 1.0, 2.0, 2.0)?;
    let starts: Vec<dp::PendulumState> = (0..COUNT)
        .map(|i| dp::PendulumState::at_rest(params, 2.0 + i as f64 * ANGLE_SPREAD, 2.5))
        .collect();

    let step_params = dp::StepParams::undamped();
    let projection = dp::Projection::default();
    // one hue per pendulum, spread around the color wheel
    let styles: Vec<dv::PendulumStyle> = (0..COUNT)
        .map(|i| {
            let hue = 360. * i as f32 / COUNT as f32;
            let hsv: Hsv = Hsv::new(hue, 0.8, 1.0);
            let srgb: Srgb = Srgb::from_color(hsv);
            let color = srgb.into_linear();
            dv::PendulumStyle {
                bob_color: color,
                trail_color: color,
                bob_radius: 4.,
                trail_fade: true,
                ..Default::default()
            }
        })
        .collect();

    let mut window = dv::RenderWindow::new(dv::WindowParams {
        title: "Pendulum fan",
        ..Default::default()
    })?;
    window.run_animation(dv::Animation {
        params: dv::AnimationParams {
            timing: dv::StepTiming::RealTime {
                dt: step_params.dt,
                max_steps_per_frame: 5,
            },
            ..Default::default()
        },
        state: starts.iter().copied().map(dp::Pendulum::new).collect(),
        step: |pendulums: &mut Vec<dp::Pendulum>| {
            for pendulum in pendulums {
                if let Err(err) = pendulum.update(&step_params, &projection) {
                    log::error!("{err}");
                }
            }
        },
        draw: |pendulums, draw| {
            for (pendulum, style) in pendulums.iter().zip(&styles) {
                draw.pendulum(pendulum, &projection, style);
            }
        },
        on_key: |key, pendulums| {
            if key == dv::KeyCode::KeyR {
                for (pendulum, start) in pendulums.iter_mut().zip(&starts) {
                    pendulum.reset(*start);
                }
            }
        },
    })?;

    Ok(())
}
