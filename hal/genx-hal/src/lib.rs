//! GenX runtime abstraction layer
//!
//! This crate defines the traits of the external IoT runtime that binding
//! tables are registered against: the cloud connection, GPIO driver, timer
//! subsystem and deferred update service. A board support package (or the
//! host simulator) implements them; the binding logic in `genx-core` only
//! ever talks to these traits.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (genx-app, bindings)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  genx-core (init / close / dispatch)    │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  genx-hal (this crate - traits)         │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │  device SDK   │       │ genx-hal-sim  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::Gpio`] - Pin open/close/read/write
//! - [`timer::Timers`] - Named periodic and one-shot timers
//! - [`iot::IotHub`] - Cloud connection, twin and method subscriptions
//! - [`deferred::DeferredUpdates`] - OS/application update deferral
//! - [`event::EventSource`] - Runtime events delivered to the application
//! - [`Platform`] - Everything above, as one object handlers can borrow

#![no_std]
#![deny(unsafe_code)]

extern crate alloc;

pub mod deferred;
pub mod event;
pub mod gpio;
pub mod iot;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use deferred::{DeferralError, DeferredUpdates, UpdateEvent, UpdateType};
pub use event::{Event, EventSource};
pub use gpio::{Direction, Gpio, GpioError, Level, PinId};
pub use iot::{ConnectionConfig, ConnectionType, IotError, IotHub};
pub use timer::{TimerError, Timers};

/// The complete runtime surface seen by binding handlers
///
/// Handlers receive `&mut dyn Platform` so they can drive GPIOs, report
/// properties or restart timers without knowing the concrete runtime.
pub trait Platform: IotHub + Gpio + Timers + DeferredUpdates + EventSource {}

// Blanket implementation for any runtime that provides every service
impl<T: IotHub + Gpio + Timers + DeferredUpdates + EventSource> Platform for T {}
