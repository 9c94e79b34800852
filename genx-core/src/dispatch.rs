//! Event dispatch
//!
//! Routes each runtime [`Event`] to the binding it names. Malformed input
//! from the cloud is answered (twin ack, method status) or logged, never
//! fatal.

use genx_hal::{Event, Platform, UpdateEvent};
use log::{debug, warn};
use serde_json::Value;

use crate::binding::{MethodResponse, TwinStatus, TwinUpdate, TwinValue};
use crate::exit::ExitCode;
use crate::set::BindingSet;
use crate::terminate::Termination;

/// What a dispatched event resulted in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// Desired properties applied; count of bound properties in the document
    Twin { applied: usize, rejected: usize },
    /// Direct method answered
    Method(MethodResponse),
    /// Timer handler ran
    Timer,
    /// Deferred update handled
    Update,
    /// Termination flag set
    Terminated,
    /// Nothing is bound to this event
    Ignored,
}

/// Route `event` to its binding in `set`
pub fn dispatch(
    platform: &mut dyn Platform,
    set: &BindingSet,
    termination: &Termination,
    event: Event,
) -> Dispatch {
    match event {
        Event::TwinDesired(json) => dispatch_twin(platform, set, &json),
        Event::MethodCall { name, payload } => {
            let response = dispatch_method(platform, set, &name, &payload);
            platform.respond_method(&name, response.status.code(), response.body_json());
            Dispatch::Method(response)
        }
        Event::TimerExpired(name) => match set.find_timer(&name) {
            Some(timer) => {
                (timer.handler)(platform, timer);
                Dispatch::Timer
            }
            None => {
                warn!("Timer {} expired but is not bound", name.as_str());
                Dispatch::Ignored
            }
        },
        Event::UpdateDeferral(update) => dispatch_update(platform, set, termination, &update),
        Event::Terminate => {
            termination.terminate(ExitCode::TermHandlerSigTerm);
            Dispatch::Terminated
        }
    }
}

fn dispatch_twin(platform: &mut dyn Platform, set: &BindingSet, json: &str) -> Dispatch {
    let document: Value = match serde_json::from_str(json) {
        Ok(document) => document,
        Err(_) => {
            warn!("Ignoring malformed desired properties document");
            return Dispatch::Ignored;
        }
    };

    // Full twin documents nest the desired section; patches do not
    let desired = document.get("desired").unwrap_or(&document);
    let version = desired.get("$version").and_then(Value::as_u64);

    let mut applied = 0;
    let mut rejected = 0;
    for binding in set.device_twins {
        let Some(raw) = desired.get(binding.property) else {
            continue;
        };

        match TwinValue::from_json(binding.twin_type, raw) {
            Some(value) => {
                debug!("Twin {} = {:?}", binding.property, value);
                let update = TwinUpdate { value, version };
                let status = (binding.handler)(platform, binding, &update);
                if let Err(e) = binding.ack_desired(platform, raw, version, status) {
                    warn!("Twin {} ack failed: {:?}", binding.property, e);
                }
                applied += 1;
            }
            None => {
                warn!(
                    "Twin {} expects {:?}, got {}",
                    binding.property, binding.twin_type, raw
                );
                if let Err(e) = binding.ack_desired(platform, raw, version, TwinStatus::Invalid) {
                    warn!("Twin {} ack failed: {:?}", binding.property, e);
                }
                rejected += 1;
            }
        }
    }

    if applied == 0 && rejected == 0 {
        return Dispatch::Ignored;
    }
    Dispatch::Twin { applied, rejected }
}

fn dispatch_method(
    platform: &mut dyn Platform,
    set: &BindingSet,
    name: &str,
    payload: &str,
) -> MethodResponse {
    let Some(binding) = set.find_method(name) else {
        warn!("Direct method {} not found", name);
        return MethodResponse::not_found();
    };

    let payload = if payload.trim().is_empty() {
        Value::Null
    } else {
        match serde_json::from_str(payload) {
            Ok(value) => value,
            Err(_) => {
                warn!("Direct method {} payload is not JSON", name);
                return MethodResponse::failed("payload is not valid JSON");
            }
        }
    };

    debug!("Direct method {}", name);
    (binding.handler)(platform, binding, &payload)
}

fn dispatch_update(
    platform: &mut dyn Platform,
    set: &BindingSet,
    termination: &Termination,
    update: &UpdateEvent,
) -> Dispatch {
    match set.deferred_update {
        Some(binding) => {
            binding.handle(platform, update);
            Dispatch::Update
        }
        None => {
            // Only delivered after registration
            warn!("Update event without deferred update binding");
            termination.terminate(ExitCode::UpdateCallbackUnexpectedEvent);
            Dispatch::Terminated
        }
    }
}
