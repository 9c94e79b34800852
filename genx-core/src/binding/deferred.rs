//! Deferred update bindings
//!
//! The calculator decides how long to postpone a pending update; the
//! notifier is told about every update event after the decision is made.

use genx_hal::{DeferralError, Platform, UpdateEvent, UpdateType};

/// Minutes to defer an update by; 0 lets it proceed now
///
/// Receives the update type and the maximum deferral the OS allows.
pub type DeferralCalculator = fn(UpdateType, u32) -> u32;

/// Called for every update event once the deferral decision is made
pub type UpdateNotifier = fn(&mut dyn Platform, &UpdateEvent);

/// Deferred update handler pair
#[derive(Debug, Clone, Copy)]
pub struct DeferredUpdateBinding {
    pub calculate: DeferralCalculator,
    pub notify: UpdateNotifier,
}

impl DeferredUpdateBinding {
    /// Register for update events
    pub fn register(&self, platform: &mut dyn Platform) -> Result<(), DeferralError> {
        platform.register_deferral()
    }

    /// Decide on an update event and notify the application
    pub fn handle(&self, platform: &mut dyn Platform, event: &UpdateEvent) {
        if let UpdateEvent::Pending {
            update_type,
            max_deferral_minutes,
        } = *event
        {
            let minutes = (self.calculate)(update_type, max_deferral_minutes);
            if minutes == 0 {
                log::info!("accepting {:?} update", update_type);
                platform.accept_update(update_type);
            } else {
                let minutes = minutes.min(max_deferral_minutes);
                log::info!("deferring {:?} update by {} minutes", update_type, minutes);
                platform.defer_update(update_type, minutes);
            }
        }
        (self.notify)(platform, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genx_hal_sim::{Call, SimPlatform};

    fn defer_system(update_type: UpdateType, _max: u32) -> u32 {
        match update_type {
            UpdateType::System => 90,
            UpdateType::Application => 0,
        }
    }

    fn publish_notice(platform: &mut dyn Platform, _event: &UpdateEvent) {
        // Records a Publish call even when offline
        let _ = platform.publish("{}");
    }

    static UPDATES: DeferredUpdateBinding = DeferredUpdateBinding {
        calculate: defer_system,
        notify: publish_notice,
    };

    #[test]
    fn test_pending_update_deferred_up_to_limit() {
        let mut sim = SimPlatform::new();
        let event = UpdateEvent::Pending {
            update_type: UpdateType::System,
            max_deferral_minutes: 60,
        };
        UPDATES.handle(&mut sim, &event);

        assert_eq!(sim.calls()[0], Call::DeferUpdate(UpdateType::System, 60));
        assert_eq!(sim.calls()[1], Call::Publish("{}".into()));
    }

    #[test]
    fn test_pending_update_accepted() {
        let mut sim = SimPlatform::new();
        let event = UpdateEvent::Pending {
            update_type: UpdateType::Application,
            max_deferral_minutes: 60,
        };
        UPDATES.handle(&mut sim, &event);

        assert_eq!(sim.calls()[0], Call::AcceptUpdate(UpdateType::Application));
    }

    #[test]
    fn test_installing_only_notifies() {
        let mut sim = SimPlatform::new();
        UPDATES.handle(&mut sim, &UpdateEvent::Installing(UpdateType::System));

        assert_eq!(sim.calls(), &[Call::Publish("{}".into())]);
    }
}
