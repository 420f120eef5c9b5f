//! Ping-pong executor, one copy per rank.
//!
//! Must be started by `pingpong-launch -n 2 ping-pong`.

use pingpong::{Alternator, AlternatorConfig, AlternatorError, World, WorldConfig};

/// Exit code of transport and configuration failures.
const FAILURE: i32 = 2;

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let code = run();
    std::process::exit(code);
}

fn run() -> i32 {
    let config = match WorldConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return FAILURE;
        }
    };

    let mut world = match World::init(config) {
        Ok(world) => world,
        Err(e) => {
            log::error!("{}", e);
            return FAILURE;
        }
    };

    let result = Alternator::new(&mut world, AlternatorConfig::default().verbose())
        .and_then(|mut alternator| alternator.run());

    let code = match result {
        Ok(_) => 0,
        Err(e @ AlternatorError::Topology { .. }) => {
            if world.config().rank == 0 {
                eprintln!("Error: This application requires exactly 2 processes.");
                eprintln!("Usage: pingpong-launch -n 2 <program>");
            }
            log::debug!("{}", e);
            e.exit_code()
        }
        Err(e) => {
            log::error!("process {}: {}", world.config().rank, e);
            e.exit_code()
        }
    };

    world.finalize();
    code
}
