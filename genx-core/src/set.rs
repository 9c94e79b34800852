//! Binding sets
//!
//! A [`BindingSet`] is the application's complete binding table: the lists
//! that are registered at startup plus the two build-time switches of the
//! generated code (always connect, deferred updates).

use genx_hal::PinId;
use heapless::Vec;

use crate::binding::{
    DeferredUpdateBinding, DeviceTwinBinding, DirectMethodBinding, GpioBinding, MethodContext,
    TimerBinding,
};

/// Maximum bindings per list
pub const MAX_BINDINGS: usize = 16;

/// Names handed to the runtime in one subscription call
pub type NameList = Vec<&'static str, MAX_BINDINGS>;

/// Kind of binding list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindingKind {
    DeviceTwin,
    DirectMethod,
    Gpio,
    /// Periodic and one-shot timers share one namespace
    Timer,
}

/// Binding table validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BindingError {
    /// Two bindings of one kind share a name
    DuplicateName {
        kind: BindingKind,
        name: &'static str,
    },
    /// Two GPIO bindings drive the same pin
    DuplicatePin(PinId),
    /// A direct method's GPIO context is missing from the GPIO list
    UndeclaredContext {
        method: &'static str,
        gpio: &'static str,
    },
    /// A periodic timer has no period
    MissingPeriod(&'static str),
    /// A binding has an empty name
    EmptyName(BindingKind),
    /// A list holds more than [`MAX_BINDINGS`] entries
    TooManyBindings(BindingKind),
}

/// When to connect to the hub
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectPolicy {
    /// Connect even without twin or method bindings (e.g. telemetry only)
    Always,
    /// Connect only when there are twins or methods to subscribe
    #[default]
    WhenBound,
}

/// Complete binding table of an application
#[derive(Debug, Clone, Copy)]
pub struct BindingSet {
    pub device_twins: &'static [&'static DeviceTwinBinding],
    pub direct_methods: &'static [&'static DirectMethodBinding],
    pub gpios: &'static [&'static GpioBinding],
    /// Started as periodic timers
    pub timers: &'static [&'static TimerBinding],
    /// Started once, [`crate::binding::ONESHOT_DEFAULT_DELAY`] after init
    pub oneshot_timers: &'static [&'static TimerBinding],
    pub deferred_update: Option<&'static DeferredUpdateBinding>,
    pub connect: ConnectPolicy,
    /// Network interface the connection waits for
    pub network_interface: &'static str,
    /// Plug and Play model id announced on connect ("" for none)
    pub model_id: &'static str,
}

impl BindingSet {
    /// Set with every list empty
    pub const EMPTY: BindingSet = BindingSet {
        device_twins: &[],
        direct_methods: &[],
        gpios: &[],
        timers: &[],
        oneshot_timers: &[],
        deferred_update: None,
        connect: ConnectPolicy::WhenBound,
        network_interface: "wlan0",
        model_id: "",
    };

    /// Whether init must connect to the hub
    pub fn needs_connection(&self) -> bool {
        match self.connect {
            ConnectPolicy::Always => true,
            ConnectPolicy::WhenBound => {
                !self.device_twins.is_empty() || !self.direct_methods.is_empty()
            }
        }
    }

    /// Check names, pins, contexts and periods
    pub fn validate(&self) -> Result<(), BindingError> {
        check_len(BindingKind::DeviceTwin, self.device_twins.len())?;
        check_len(BindingKind::DirectMethod, self.direct_methods.len())?;
        check_len(BindingKind::Gpio, self.gpios.len())?;
        check_len(
            BindingKind::Timer,
            self.timers.len() + self.oneshot_timers.len(),
        )?;

        check_names(
            BindingKind::DeviceTwin,
            self.device_twins.iter().map(|b| b.property),
        )?;
        check_names(
            BindingKind::DirectMethod,
            self.direct_methods.iter().map(|b| b.method),
        )?;
        check_names(BindingKind::Gpio, self.gpios.iter().map(|b| b.name))?;
        check_names(BindingKind::Timer, self.all_timers().map(|b| b.name))?;

        for (i, gpio) in self.gpios.iter().enumerate() {
            if self.gpios[..i].iter().any(|other| other.pin == gpio.pin) {
                return Err(BindingError::DuplicatePin(gpio.pin));
            }
        }

        for method in self.direct_methods {
            if let MethodContext::Gpio(gpio) = method.context {
                // Same name is not enough: the pin must be the one init opens
                if !self.gpios.iter().any(|declared| *declared == gpio) {
                    return Err(BindingError::UndeclaredContext {
                        method: method.method,
                        gpio: gpio.name,
                    });
                }
            }
        }

        if let Some(timer) = self.timers.iter().find(|t| t.period.is_none()) {
            return Err(BindingError::MissingPeriod(timer.name));
        }

        Ok(())
    }

    /// Property names to subscribe
    pub fn twin_properties(&self) -> Result<NameList, BindingError> {
        collect_names(
            BindingKind::DeviceTwin,
            self.device_twins.iter().map(|b| b.property),
        )
    }

    /// Method names to subscribe
    pub fn method_names(&self) -> Result<NameList, BindingError> {
        collect_names(
            BindingKind::DirectMethod,
            self.direct_methods.iter().map(|b| b.method),
        )
    }

    pub fn find_twin(&self, property: &str) -> Option<&'static DeviceTwinBinding> {
        self.device_twins
            .iter()
            .copied()
            .find(|b| b.property == property)
    }

    pub fn find_method(&self, method: &str) -> Option<&'static DirectMethodBinding> {
        self.direct_methods
            .iter()
            .copied()
            .find(|b| b.method == method)
    }

    pub fn find_gpio(&self, name: &str) -> Option<&'static GpioBinding> {
        self.gpios.iter().copied().find(|b| b.name == name)
    }

    /// Find a periodic or one-shot timer
    pub fn find_timer(&self, name: &str) -> Option<&'static TimerBinding> {
        self.all_timers().find(|b| b.name == name)
    }

    fn all_timers(&self) -> impl Iterator<Item = &'static TimerBinding> + Clone + '_ {
        self.timers
            .iter()
            .chain(self.oneshot_timers.iter())
            .copied()
    }
}

/// First name that occurs twice, if any
pub fn find_duplicate<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
    I::IntoIter: Clone,
{
    let names = names.into_iter();
    names
        .clone()
        .enumerate()
        .find(|(i, name)| names.clone().skip(i + 1).any(|other| other == *name))
        .map(|(_, name)| name)
}

fn check_len(kind: BindingKind, len: usize) -> Result<(), BindingError> {
    if len > MAX_BINDINGS {
        return Err(BindingError::TooManyBindings(kind));
    }
    Ok(())
}

fn check_names<I>(kind: BindingKind, names: I) -> Result<(), BindingError>
where
    I: Iterator<Item = &'static str> + Clone,
{
    if names.clone().any(str::is_empty) {
        return Err(BindingError::EmptyName(kind));
    }
    match find_duplicate(names) {
        Some(name) => Err(BindingError::DuplicateName { kind, name }),
        None => Ok(()),
    }
}

fn collect_names<I>(kind: BindingKind, names: I) -> Result<NameList, BindingError>
where
    I: Iterator<Item = &'static str>,
{
    let mut list = NameList::new();
    for name in names {
        list.push(name)
            .map_err(|_| BindingError::TooManyBindings(kind))?;
    }
    Ok(list)
}
