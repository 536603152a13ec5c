//! Headless run of the reference scenario reporting energy over time.
//!
//! Without damping, a good integrator keeps the total energy nearly constant,
//! so the drift printed here measures integration error.
//! With the default damping the energy decays steadily instead.
//!
//! Usage: `cargo run --example energy_report [steps]` (default 3000 steps).

use double_pendulum as dp;
use tracing_subscriber::{filter::LevelFilter, FmtSubscriber};

const REPORT_INTERVAL: u64 = 500;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    FmtSubscriber::builder()
        .with_max_level(LevelFilter::INFO)
        .init();

    let steps: u64 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 3000,
    };

    let params = dp::PendulumParams::new(dp::Vec2::new(200., 100.), 1.5, 1.0, 2.0, 2.0)?;
    let start = dp::PendulumState::at_rest(params, 1.3, 1.0);

    let runs = [
        ("undamped, classic", dp::StepParams::undamped()),
        (
            "undamped, reference",
            dp::StepParams {
                scheme: dp::Rk4Scheme::Reference,
                ..dp::StepParams::undamped()
            },
        ),
        ("damped, classic", dp::StepParams::default()),
    ];

    for (name, step_params) in runs {
        let monitor = dp::EnergyMonitor::new(&start, step_params.gravity);
        log::info!("{name}: initial energy {:.6}", monitor.baseline());

        let mut pendulum = dp::Pendulum::new(start);
        let projection = dp::Projection::default();
        while pendulum.steps() < steps {
            pendulum.update(&step_params, &projection)?;
            if pendulum.steps() % REPORT_INTERVAL == 0 {
                let state = pendulum.state();
                log::info!(
                    "{name}: t = {:7.2}, energy {:12.6}, relative drift {:+.3e}",
                    pendulum.steps() as f64 * step_params.dt,
                    dp::total_energy(state, step_params.gravity),
                    monitor.relative_drift(state),
                );
            }
        }
    }

    Ok(())
}
