//! Binding records
//!
//! A binding associates a name (property, method, pin or timer) with the
//! handler the runtime calls for it. Bindings are declared once as `static`
//! items and never mutated; runtime state such as the last desired value or
//! whether a timer is armed lives in the runtime, keyed by the binding name.

pub mod deferred;
pub mod gpio;
pub mod method;
pub mod timer;
pub mod twin;

pub use deferred::{DeferralCalculator, DeferredUpdateBinding, UpdateNotifier};
pub use gpio::GpioBinding;
pub use method::{DirectMethodBinding, MethodContext, MethodHandler, MethodResponse, MethodStatus};
pub use timer::{TimerBinding, TimerHandler, ONESHOT_DEFAULT_DELAY};
pub use twin::{DeviceTwinBinding, TwinHandler, TwinStatus, TwinType, TwinUpdate, TwinValue};
