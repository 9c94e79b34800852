//! GenX application binary
//!
//! Loads the embedded configuration, applies command line overrides and
//! runs the bindings on the simulated runtime until terminated.

use core::time::Duration;
use std::process;

use flexi_logger::Logger;
use genx_app::{run, AppConfig, BINDINGS, EMBEDDED_CONFIG};
use genx_core::{ExitCode, Termination};
use genx_hal_sim::SimPlatform;
use log::{error, info};

static TERMINATION: Termination = Termination::new();

fn main() {
    let code = start();
    process::exit(i32::from(code.as_u8()));
}

fn start() -> ExitCode {
    let config = match AppConfig::parse(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return e.exit_code();
        }
    };

    // Held until exit so buffered records are flushed
    let _logger = match Logger::try_with_env_or_str(&config.logging.level).and_then(|l| l.start())
    {
        Ok(handle) => Some(handle),
        Err(e) => {
            eprintln!("logger init failed: {}", e);
            None
        }
    };

    info!("GenX application starting...");

    let args: Vec<String> = std::env::args().collect();
    let connection = match config.connection_config(args.iter().map(String::as_str)) {
        Ok(connection) => connection,
        Err(e) => {
            error!("{}", e);
            return e.exit_code();
        }
    };

    let mut platform = SimPlatform::new();
    let code = run(
        &mut platform,
        &BINDINGS,
        &connection,
        Duration::from_secs(config.simulation.run_seconds),
        &TERMINATION,
    );

    if code.is_clean() {
        info!("Exiting with {:?} ({})", code, code.as_u8());
    } else {
        error!("Exiting with {:?} ({})", code, code.as_u8());
    }
    code
}
