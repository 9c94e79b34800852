//! Deferred update abstractions
//!
//! The OS notifies the application before applying an update so that it
//! can postpone the reboot until it is idle.

/// Kind of pending update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateType {
    Application,
    System,
}

/// Update notification delivered through the event loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateEvent {
    /// Update downloaded and waiting; `max_deferral_minutes` is the OS limit
    Pending {
        update_type: UpdateType,
        max_deferral_minutes: u32,
    },
    /// Update is being applied now
    Installing(UpdateType),
}

/// Errors from the deferred update service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeferralError {
    /// Runtime refused the update event registration
    RegistrationFailed,
}

/// Deferred update service
pub trait DeferredUpdates {
    /// Ask the runtime to deliver [`UpdateEvent`]s to the application
    fn register_deferral(&mut self) -> Result<(), DeferralError>;

    /// Postpone a pending update by `minutes`
    fn defer_update(&mut self, update_type: UpdateType, minutes: u32);

    /// Let a pending update proceed
    fn accept_update(&mut self, update_type: UpdateType);
}
