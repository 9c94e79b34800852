//! Main event loop on the simulated runtime

use core::time::Duration;

use genx_core::{
    close_peripheral_and_handlers, dispatch, init_peripheral_and_handlers, BindingSet, ExitCode,
    Termination,
};
use genx_hal::{ConnectionConfig, Event, EventSource};
use genx_hal_sim::SimPlatform;
use log::{error, info, warn};

/// Register `set`, run until terminated, then tear everything down
///
/// Events are drained before the virtual clock moves to the next timer
/// deadline. Once `run_for` of simulated time has passed a terminate
/// event is queued, as the OS would on SIGTERM.
pub fn run(
    platform: &mut SimPlatform,
    set: &BindingSet,
    connection: &ConnectionConfig,
    run_for: Duration,
    termination: &Termination,
) -> ExitCode {
    info!("Registering peripherals and handlers");
    if let Err(e) = init_peripheral_and_handlers(platform, set, connection) {
        error!("Init failed: {:?}", e);
        termination.terminate(e.exit_code());
    }

    let end = platform.now() + run_for;
    while !termination.is_terminated() {
        if let Some(event) = platform.next_event() {
            dispatch(platform, set, termination, event);
            continue;
        }

        match platform.next_deadline() {
            Some(until) if platform.now() + until <= end => platform.advance(until),
            _ => {
                info!("Run time elapsed, stopping");
                platform.push_event(Event::Terminate);
            }
        }
    }

    info!("Closing peripherals and handlers");
    if let Err(e) = close_peripheral_and_handlers(platform, set) {
        warn!("Close failed: {:?}", e);
    }

    termination.exit_code()
}
