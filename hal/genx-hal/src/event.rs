//! Runtime events
//!
//! The runtime owns the event loop. Whatever the SDK receives (twin
//! patches, method calls, timer expiries, update notices, SIGTERM) is handed
//! to the application as an [`Event`] for dispatch to its bindings.

use alloc::string::String;

use crate::deferred::UpdateEvent;

/// Event produced by the runtime
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Desired properties JSON (full twin document or patch)
    TwinDesired(String),
    /// Direct method invocation with its JSON payload
    MethodCall { name: String, payload: String },
    /// A named timer fired
    TimerExpired(String),
    /// Deferred update notification
    UpdateDeferral(UpdateEvent),
    /// Termination requested (SIGTERM)
    Terminate,
}

/// Source of runtime events
pub trait EventSource {
    /// Next pending event, or `None` when the queue is drained
    fn next_event(&mut self) -> Option<Event>;
}
