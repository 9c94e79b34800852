//! Startup and shutdown of a binding set
//!
//! Init order:
//!
//! 1. validate the binding tables
//! 2. connect to the hub (per [`ConnectPolicy`](crate::set::ConnectPolicy))
//! 3. open GPIOs
//! 4. subscribe device twins
//! 5. subscribe direct methods
//! 6. start periodic timers
//! 7. arm one-shot timers after [`ONESHOT_DEFAULT_DELAY`]
//! 8. register deferred update handlers
//!
//! Close order: stop timers, close GPIOs, unsubscribe twins and methods,
//! stop cloud-to-device. Init makes no runtime calls for empty lists;
//! close always unsubscribes and stops cloud-to-device.

use genx_hal::{
    ConnectionConfig, DeferralError, GpioError, IotError, Platform, TimerError,
};
use log::{info, warn};

use crate::binding::ONESHOT_DEFAULT_DELAY;
use crate::config::{self, ConfigError};
use crate::exit::ExitCode;
use crate::set::{BindingError, BindingSet};

/// Errors raised while registering or tearing down bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LifecycleError {
    /// Binding tables are inconsistent
    Binding(BindingError),
    /// Connection settings are incomplete
    Config(ConfigError),
    /// Hub connection could not be started
    Connect(IotError),
    /// GPIO declared without a direction
    GpioDirectionUnknown(&'static str),
    GpioOpen {
        name: &'static str,
        error: GpioError,
    },
    GpioClose {
        name: &'static str,
        error: GpioError,
    },
    TwinSubscribe(IotError),
    MethodSubscribe(IotError),
    TimerStart {
        name: &'static str,
        error: TimerError,
    },
    TimerStop {
        name: &'static str,
        error: TimerError,
    },
    DeferredUpdate(DeferralError),
}

impl From<BindingError> for LifecycleError {
    fn from(e: BindingError) -> Self {
        LifecycleError::Binding(e)
    }
}

impl From<ConfigError> for LifecycleError {
    fn from(e: ConfigError) -> Self {
        LifecycleError::Config(e)
    }
}

impl LifecycleError {
    /// Exit code the application terminates with
    pub fn exit_code(&self) -> ExitCode {
        match self {
            LifecycleError::Binding(_) => ExitCode::BindingValidation,
            LifecycleError::Config(e) => e.exit_code(),
            LifecycleError::Connect(_) => ExitCode::AzureConnect,
            LifecycleError::GpioDirectionUnknown(_) => ExitCode::GpioOpenDirectionUnknown,
            LifecycleError::GpioOpen { .. } => ExitCode::GpioOpen,
            LifecycleError::GpioClose { .. } => ExitCode::GpioClose,
            LifecycleError::TwinSubscribe(_) => ExitCode::TwinSubscribe,
            LifecycleError::MethodSubscribe(_) => ExitCode::MethodSubscribe,
            LifecycleError::TimerStart { .. } => ExitCode::TimerStart,
            LifecycleError::TimerStop { .. } => ExitCode::TimerStop,
            LifecycleError::DeferredUpdate(_) => ExitCode::DeferredUpdateRegistration,
        }
    }
}

/// Register every binding of `set` with the runtime
///
/// Stops at the first failure. Bindings registered before it stay
/// registered; run [`close_peripheral_and_handlers`] to release them.
pub fn init_peripheral_and_handlers(
    platform: &mut dyn Platform,
    set: &BindingSet,
    connection: &ConnectionConfig,
) -> Result<(), LifecycleError> {
    set.validate()?;

    if set.needs_connection() {
        config::validate(connection)?;
        info!(
            "Connecting ({:?}) on {}",
            connection.connection_type, set.network_interface
        );
        platform
            .connect(connection, set.network_interface, set.model_id)
            .map_err(LifecycleError::Connect)?;
    }

    for gpio in set.gpios {
        if gpio.direction == genx_hal::Direction::Unknown {
            return Err(LifecycleError::GpioDirectionUnknown(gpio.name));
        }
        gpio.open(platform)
            .map_err(|error| LifecycleError::GpioOpen {
                name: gpio.name,
                error,
            })?;
    }

    if !set.device_twins.is_empty() {
        let properties = set.twin_properties()?;
        platform
            .subscribe_twins(&properties)
            .map_err(LifecycleError::TwinSubscribe)?;
    }

    if !set.direct_methods.is_empty() {
        let methods = set.method_names()?;
        platform
            .subscribe_methods(&methods)
            .map_err(LifecycleError::MethodSubscribe)?;
    }

    for timer in set.timers {
        timer
            .start(platform)
            .map_err(|error| LifecycleError::TimerStart {
                name: timer.name,
                error,
            })?;
    }

    for timer in set.oneshot_timers {
        timer
            .start_oneshot(platform, ONESHOT_DEFAULT_DELAY)
            .map_err(|error| LifecycleError::TimerStart {
                name: timer.name,
                error,
            })?;
    }

    if let Some(deferred) = set.deferred_update {
        deferred
            .register(platform)
            .map_err(LifecycleError::DeferredUpdate)?;
    }

    info!(
        "Bindings initialized: {} twins, {} methods, {} gpios, {} timers, {} one-shot",
        set.device_twins.len(),
        set.direct_methods.len(),
        set.gpios.len(),
        set.timers.len(),
        set.oneshot_timers.len()
    );
    Ok(())
}

/// Release every binding of `set`
///
/// Best effort: every step runs even after a failure, and the first
/// failure is returned.
pub fn close_peripheral_and_handlers(
    platform: &mut dyn Platform,
    set: &BindingSet,
) -> Result<(), LifecycleError> {
    let mut first = None;
    let mut note = |error: LifecycleError| {
        warn!("Close step failed: {:?}", error);
        first.get_or_insert(error);
    };

    for timer in set.timers.iter().chain(set.oneshot_timers) {
        if let Err(error) = timer.stop(platform) {
            note(LifecycleError::TimerStop {
                name: timer.name,
                error,
            });
        }
    }

    for gpio in set.gpios {
        if let Err(error) = gpio.close(platform) {
            note(LifecycleError::GpioClose {
                name: gpio.name,
                error,
            });
        }
    }

    platform.unsubscribe_twins();
    platform.unsubscribe_methods();
    platform.stop_to_device();

    info!("Bindings closed");
    first.map_or(Ok(()), Err)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binding::{
        DeferredUpdateBinding, DeviceTwinBinding, DirectMethodBinding, GpioBinding,
        MethodContext, MethodResponse, TimerBinding, TwinStatus, TwinType, TwinUpdate,
    };
    use crate::set::ConnectPolicy;
    use core::time::Duration;
    use genx_hal::{ConnectionType, Direction, Level, PinId, UpdateEvent, UpdateType};
    use genx_hal_sim::{Call, Operation, SimPlatform};
    use serde_json::Value;

    fn twin_handler(_: &mut dyn Platform, _: &DeviceTwinBinding, _: &TwinUpdate) -> TwinStatus {
        TwinStatus::Completed
    }

    fn method_handler(_: &mut dyn Platform, _: &DirectMethodBinding, _: &Value) -> MethodResponse {
        MethodResponse::succeeded()
    }

    fn timer_handler(_: &mut dyn Platform, _: &TimerBinding) {}

    fn no_deferral(_: UpdateType, _: u32) -> u32 {
        0
    }

    fn ignore_update(_: &mut dyn Platform, _: &UpdateEvent) {}

    static LEVEL: DeviceTwinBinding = DeviceTwinBinding {
        property: "Level",
        twin_type: TwinType::Float,
        handler: twin_handler,
    };
    static LIGHT: GpioBinding = GpioBinding {
        pin: PinId(8),
        name: "Light",
        direction: Direction::Output,
        initial_state: Level::Low,
        invert: false,
    };
    static FLOATING: GpioBinding = GpioBinding {
        pin: PinId(3),
        name: "Floating",
        direction: Direction::Unknown,
        initial_state: Level::Low,
        invert: false,
    };
    static LIGHT_ON: DirectMethodBinding = DirectMethodBinding {
        method: "LightOn",
        handler: method_handler,
        context: MethodContext::Gpio(&LIGHT),
    };
    static MEASURE: TimerBinding = TimerBinding {
        name: "Measure",
        period: Some(Duration::from_secs(5)),
        handler: timer_handler,
    };
    static STARTUP: TimerBinding = TimerBinding {
        name: "Startup",
        period: None,
        handler: timer_handler,
    };
    static UPDATES: DeferredUpdateBinding = DeferredUpdateBinding {
        calculate: no_deferral,
        notify: ignore_update,
    };

    static FULL: BindingSet = BindingSet {
        device_twins: &[&LEVEL],
        direct_methods: &[&LIGHT_ON],
        gpios: &[&LIGHT],
        timers: &[&MEASURE],
        oneshot_timers: &[&STARTUP],
        deferred_update: Some(&UPDATES),
        connect: ConnectPolicy::WhenBound,
        network_interface: "wlan0",
        model_id: "dtmi:com:example:Thermostat;1",
    };

    fn dps() -> ConnectionConfig {
        ConnectionConfig {
            connection_type: ConnectionType::Dps,
            scope_id: Some("0ne0001".into()),
            ..ConnectionConfig::default()
        }
    }

    #[test]
    fn test_init_order() {
        let mut sim = SimPlatform::new();
        init_peripheral_and_handlers(&mut sim, &FULL, &dps()).unwrap();

        assert_eq!(
            sim.calls(),
            &[
                Call::Connect {
                    network_interface: "wlan0".into(),
                    model_id: "dtmi:com:example:Thermostat;1".into(),
                },
                Call::OpenOutput(PinId(8), Level::Low),
                Call::SubscribeTwins(vec!["Level"]),
                Call::SubscribeMethods(vec!["LightOn"]),
                Call::StartPeriodic("Measure", Duration::from_secs(5)),
                Call::StartOneshot("Startup", ONESHOT_DEFAULT_DELAY),
                Call::RegisterDeferral,
            ]
        );
    }

    #[test]
    fn test_close_order() {
        let mut sim = SimPlatform::new();
        init_peripheral_and_handlers(&mut sim, &FULL, &dps()).unwrap();
        sim.clear_calls();

        close_peripheral_and_handlers(&mut sim, &FULL).unwrap();
        assert_eq!(
            sim.calls(),
            &[
                Call::StopTimer("Measure"),
                Call::StopTimer("Startup"),
                Call::ClosePin(PinId(8)),
                Call::UnsubscribeTwins,
                Call::UnsubscribeMethods,
                Call::StopToDevice,
            ]
        );
        assert!(sim.pin(PinId(8)).is_none());
        assert!(sim.connection().is_none());
    }

    #[test]
    fn test_empty_set_makes_no_registration_calls() {
        let mut sim = SimPlatform::new();
        init_peripheral_and_handlers(&mut sim, &BindingSet::EMPTY, &ConnectionConfig::default())
            .unwrap();
        assert!(sim.calls().is_empty());

        close_peripheral_and_handlers(&mut sim, &BindingSet::EMPTY).unwrap();
        assert_eq!(
            sim.calls(),
            &[
                Call::UnsubscribeTwins,
                Call::UnsubscribeMethods,
                Call::StopToDevice
            ]
        );
    }

    #[test]
    fn test_gpio_only_set_stays_offline() {
        static SET: BindingSet = BindingSet {
            gpios: &[&LIGHT],
            timers: &[&MEASURE],
            ..BindingSet::EMPTY
        };
        let mut sim = SimPlatform::new();
        // No connection settings needed when nothing is bound to the cloud
        init_peripheral_and_handlers(&mut sim, &SET, &ConnectionConfig::default()).unwrap();

        assert!(sim.connection().is_none());
        assert_eq!(sim.calls()[0], Call::OpenOutput(PinId(8), Level::Low));
    }

    #[test]
    fn test_always_connect() {
        static SET: BindingSet = BindingSet {
            connect: ConnectPolicy::Always,
            ..BindingSet::EMPTY
        };
        let mut sim = SimPlatform::new();
        init_peripheral_and_handlers(&mut sim, &SET, &dps()).unwrap();
        assert!(sim.connection().is_some());
    }

    #[test]
    fn test_invalid_bindings_make_no_calls() {
        static SET: BindingSet = BindingSet {
            direct_methods: &[&LIGHT_ON],
            ..BindingSet::EMPTY
        };
        let mut sim = SimPlatform::new();
        let error = init_peripheral_and_handlers(&mut sim, &SET, &dps()).unwrap_err();

        assert_eq!(error.exit_code(), ExitCode::BindingValidation);
        assert!(sim.calls().is_empty());
    }

    #[test]
    fn test_missing_scope_id() {
        let config = ConnectionConfig {
            connection_type: ConnectionType::Dps,
            ..ConnectionConfig::default()
        };
        let mut sim = SimPlatform::new();
        let error = init_peripheral_and_handlers(&mut sim, &FULL, &config).unwrap_err();

        assert_eq!(error.exit_code(), ExitCode::ValidateScopeId);
        assert!(sim.calls().is_empty());
    }

    #[test]
    fn test_unknown_direction() {
        static SET: BindingSet = BindingSet {
            gpios: &[&FLOATING],
            ..BindingSet::EMPTY
        };
        let mut sim = SimPlatform::new();
        let error =
            init_peripheral_and_handlers(&mut sim, &SET, &ConnectionConfig::default()).unwrap_err();

        assert_eq!(error, LifecycleError::GpioDirectionUnknown("Floating"));
        assert_eq!(error.exit_code(), ExitCode::GpioOpenDirectionUnknown);
    }

    #[test]
    fn test_init_stops_at_first_failure() {
        let mut sim = SimPlatform::new();
        sim.fail_next(Operation::SubscribeTwins);
        let error = init_peripheral_and_handlers(&mut sim, &FULL, &dps()).unwrap_err();

        assert_eq!(error, LifecycleError::TwinSubscribe(IotError::SubscribeFailed));
        assert_eq!(error.exit_code(), ExitCode::TwinSubscribe);
        assert!(!sim.calls().iter().any(|c| matches!(c, Call::SubscribeMethods(_))));
        assert!(!sim.timer_running("Measure"));
    }

    #[test]
    fn test_deferred_registration_failure() {
        let mut sim = SimPlatform::new();
        sim.fail_next(Operation::RegisterDeferral);
        let error = init_peripheral_and_handlers(&mut sim, &FULL, &dps()).unwrap_err();

        assert_eq!(
            error,
            LifecycleError::DeferredUpdate(DeferralError::RegistrationFailed)
        );
        assert_eq!(error.exit_code(), ExitCode::DeferredUpdateRegistration);
        assert!(!sim.deferral_registered());
        // Everything before the last step is registered
        assert!(sim.timer_running("Measure"));
        assert_eq!(sim.calls().last(), Some(&Call::RegisterDeferral));
    }

    #[test]
    fn test_close_is_best_effort() {
        let mut sim = SimPlatform::new();
        init_peripheral_and_handlers(&mut sim, &FULL, &dps()).unwrap();
        sim.clear_calls();
        sim.fail_next(Operation::StopTimer);

        let error = close_peripheral_and_handlers(&mut sim, &FULL).unwrap_err();
        assert_eq!(
            error,
            LifecycleError::TimerStop {
                name: "Measure",
                error: TimerError::NotRunning
            }
        );
        // Remaining steps still ran
        assert_eq!(sim.calls().last(), Some(&Call::StopToDevice));
        assert!(sim.pin(PinId(8)).is_none());
    }
}
