//! Simulated runtime for host builds and tests
//!
//! This crate provides an in-memory implementation of every `genx-hal`
//! trait:
//!
//! - GPIO pins with tracked direction and level
//! - Named timers driven by a virtual clock ([`SimPlatform::advance`])
//! - A hub connection that accepts subscriptions and records sent documents
//! - Deferred update bookkeeping
//! - An injectable event queue
//!
//! Every SDK call is appended to a [`Call`] log so tests can assert the
//! exact registration and teardown order.

mod call;
mod platform;

pub use call::{Call, Operation};
pub use platform::{SimPin, SimPlatform};

// Re-export shared traits from genx-hal for convenience
pub use genx_hal::Platform;
