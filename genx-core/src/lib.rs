//! Board-agnostic binding logic for GenX IoT peripherals
//!
//! An application declares its device twins, direct methods, GPIOs and
//! timers as `static` binding records, groups them in a [`BindingSet`] and
//! hands the set to this crate:
//!
//! - [`lifecycle`] registers every binding with the runtime at startup and
//!   tears it down at shutdown, in a fixed order
//! - [`dispatch`] routes runtime events to the bound handlers
//! - [`binding`] holds the record types and per-binding operations
//! - [`config`] parses and validates the cloud connection settings
//! - [`exit`] and [`terminate`] carry the process exit code
//!
//! The runtime itself (hub client, GPIO driver, timers) lives behind the
//! `genx-hal` traits.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

extern crate alloc;

pub mod binding;
pub mod config;
pub mod dispatch;
pub mod exit;
pub mod lifecycle;
pub mod set;
pub mod telemetry;
pub mod terminate;

pub use binding::{
    DeferredUpdateBinding, DeviceTwinBinding, DirectMethodBinding, GpioBinding, MethodContext,
    MethodResponse, MethodStatus, TimerBinding, TwinStatus, TwinType, TwinUpdate, TwinValue,
};
pub use dispatch::{dispatch, Dispatch};
pub use exit::ExitCode;
pub use lifecycle::{close_peripheral_and_handlers, init_peripheral_and_handlers, LifecycleError};
pub use set::{BindingError, BindingKind, BindingSet, ConnectPolicy, MAX_BINDINGS};
pub use telemetry::Telemetry;
pub use terminate::Termination;

// Re-export the runtime traits bindings are written against
pub use genx_hal::Platform;
