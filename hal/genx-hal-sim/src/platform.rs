//! Simulated platform state

use std::collections::{BTreeMap, VecDeque};
use std::time::Duration;

use log::debug;

use genx_hal::{
    ConnectionConfig, DeferralError, DeferredUpdates, Direction, Event, EventSource, Gpio,
    GpioError, IotError, IotHub, Level, PinId, TimerError, Timers, UpdateType,
};

use crate::call::{Call, Operation};

/// State of an opened pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimPin {
    pub direction: Direction,
    pub level: Level,
}

/// Armed timer
#[derive(Debug, Clone, Copy)]
struct SimTimer {
    /// `None` for one-shot timers
    period: Option<Duration>,
    deadline: Duration,
}

/// In-memory runtime
///
/// Time only moves when [`SimPlatform::advance`] is called; expired timers
/// are queued as [`Event::TimerExpired`] in deadline order.
#[derive(Debug, Default)]
pub struct SimPlatform {
    calls: Vec<Call>,
    failures: Vec<Operation>,
    pins: BTreeMap<PinId, SimPin>,
    timers: BTreeMap<&'static str, SimTimer>,
    now: Duration,
    connection: Option<ConnectionConfig>,
    twin_subscriptions: Vec<&'static str>,
    method_subscriptions: Vec<&'static str>,
    reported: Vec<String>,
    published: Vec<String>,
    deferral_registered: bool,
    events: VecDeque<Event>,
}

impl SimPlatform {
    /// Create an idle, disconnected runtime at time zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> &[Call] {
        &self.calls
    }

    /// Forget recorded calls (state is kept)
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Make the next call of this kind fail
    pub fn fail_next(&mut self, operation: Operation) {
        self.failures.push(operation);
    }

    /// Queue an event for the application
    pub fn push_event(&mut self, event: Event) {
        self.events.push_back(event);
    }

    /// Opened pin state
    pub fn pin(&self, pin: PinId) -> Option<SimPin> {
        self.pins.get(&pin).copied()
    }

    /// Drive an input pin from the outside world
    pub fn set_input(&mut self, pin: PinId, level: Level) {
        if let Some(state) = self.pins.get_mut(&pin) {
            state.level = level;
        }
    }

    /// Whether a timer with this name is armed
    pub fn timer_running(&self, name: &str) -> bool {
        self.timers.contains_key(name)
    }

    /// Virtual time since creation
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Settings of the last successful connect
    pub fn connection(&self) -> Option<&ConnectionConfig> {
        self.connection.as_ref()
    }

    pub fn twin_subscriptions(&self) -> &[&'static str] {
        &self.twin_subscriptions
    }

    pub fn method_subscriptions(&self) -> &[&'static str] {
        &self.method_subscriptions
    }

    /// Reported-property documents, oldest first
    pub fn reported(&self) -> &[String] {
        &self.reported
    }

    /// Telemetry messages, oldest first
    pub fn published(&self) -> &[String] {
        &self.published
    }

    pub fn deferral_registered(&self) -> bool {
        self.deferral_registered
    }

    /// Time until the earliest armed timer fires
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers
            .values()
            .map(|t| t.deadline.saturating_sub(self.now))
            .min()
    }

    /// Move the virtual clock forward, queueing every timer expiry
    pub fn advance(&mut self, by: Duration) {
        let target = self.now + by;
        loop {
            let due = self
                .timers
                .iter()
                .filter(|(_, t)| t.deadline <= target)
                .min_by_key(|(_, t)| t.deadline)
                .map(|(name, t)| (*name, *t));

            let Some((name, timer)) = due else {
                break;
            };

            self.now = timer.deadline;
            match timer.period {
                Some(period) => {
                    if let Some(t) = self.timers.get_mut(name) {
                        t.deadline += period;
                    }
                }
                None => {
                    self.timers.remove(name);
                }
            }
            debug!("sim: timer {} expired at {:?}", name, self.now);
            self.events.push_back(Event::TimerExpired(name.into()));
        }
        self.now = target;
    }

    /// Record a call; returns true when an injected failure consumes it
    fn record(&mut self, call: Call) -> bool {
        debug!("sim: {:?}", call);
        let operation = call.operation();
        self.calls.push(call);
        match self.failures.iter().position(|f| *f == operation) {
            Some(index) => {
                self.failures.remove(index);
                true
            }
            None => false,
        }
    }
}

impl Gpio for SimPlatform {
    fn open_output(&mut self, pin: PinId, initial: Level) -> Result<(), GpioError> {
        if self.record(Call::OpenOutput(pin, initial)) {
            return Err(GpioError::OpenFailed);
        }
        self.pins.insert(
            pin,
            SimPin {
                direction: Direction::Output,
                level: initial,
            },
        );
        Ok(())
    }

    fn open_input(&mut self, pin: PinId) -> Result<(), GpioError> {
        if self.record(Call::OpenInput(pin)) {
            return Err(GpioError::OpenFailed);
        }
        self.pins.insert(
            pin,
            SimPin {
                direction: Direction::Input,
                level: Level::Low,
            },
        );
        Ok(())
    }

    fn close(&mut self, pin: PinId) -> Result<(), GpioError> {
        if self.record(Call::ClosePin(pin)) {
            return Err(GpioError::Io);
        }
        self.pins.remove(&pin).map(|_| ()).ok_or(GpioError::NotOpen)
    }

    fn write(&mut self, pin: PinId, level: Level) -> Result<(), GpioError> {
        if self.record(Call::Write(pin, level)) {
            return Err(GpioError::Io);
        }
        let state = self.pins.get_mut(&pin).ok_or(GpioError::NotOpen)?;
        if state.direction != Direction::Output {
            return Err(GpioError::WrongDirection);
        }
        state.level = level;
        Ok(())
    }

    fn read(&mut self, pin: PinId) -> Result<Level, GpioError> {
        if self.record(Call::Read(pin)) {
            return Err(GpioError::Io);
        }
        self.pins
            .get(&pin)
            .map(|state| state.level)
            .ok_or(GpioError::NotOpen)
    }
}

impl Timers for SimPlatform {
    fn start_periodic(&mut self, name: &'static str, period: Duration) -> Result<(), TimerError> {
        if self.record(Call::StartPeriodic(name, period)) {
            return Err(TimerError::CreateFailed);
        }
        if period.is_zero() {
            return Err(TimerError::InvalidPeriod);
        }
        self.timers.insert(
            name,
            SimTimer {
                period: Some(period),
                deadline: self.now + period,
            },
        );
        Ok(())
    }

    fn start_oneshot(&mut self, name: &'static str, delay: Duration) -> Result<(), TimerError> {
        if self.record(Call::StartOneshot(name, delay)) {
            return Err(TimerError::CreateFailed);
        }
        if delay.is_zero() {
            return Err(TimerError::InvalidPeriod);
        }
        self.timers.insert(
            name,
            SimTimer {
                period: None,
                deadline: self.now + delay,
            },
        );
        Ok(())
    }

    fn stop_timer(&mut self, name: &'static str) -> Result<(), TimerError> {
        if self.record(Call::StopTimer(name)) {
            return Err(TimerError::NotRunning);
        }
        // Stopping an expired one-shot is fine
        self.timers.remove(name);
        Ok(())
    }
}

impl IotHub for SimPlatform {
    fn connect(
        &mut self,
        config: &ConnectionConfig,
        network_interface: &str,
        model_id: &str,
    ) -> Result<(), IotError> {
        let call = Call::Connect {
            network_interface: network_interface.into(),
            model_id: model_id.into(),
        };
        if self.record(call) {
            return Err(IotError::ConnectFailed);
        }
        self.connection = Some(config.clone());
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    fn subscribe_twins(&mut self, properties: &[&'static str]) -> Result<(), IotError> {
        if self.record(Call::SubscribeTwins(properties.to_vec())) {
            return Err(IotError::SubscribeFailed);
        }
        self.twin_subscriptions.extend_from_slice(properties);
        Ok(())
    }

    fn unsubscribe_twins(&mut self) {
        self.record(Call::UnsubscribeTwins);
        self.twin_subscriptions.clear();
    }

    fn subscribe_methods(&mut self, methods: &[&'static str]) -> Result<(), IotError> {
        if self.record(Call::SubscribeMethods(methods.to_vec())) {
            return Err(IotError::SubscribeFailed);
        }
        self.method_subscriptions.extend_from_slice(methods);
        Ok(())
    }

    fn unsubscribe_methods(&mut self) {
        self.record(Call::UnsubscribeMethods);
        self.method_subscriptions.clear();
    }

    fn respond_method(&mut self, method: &str, status: u16, body: &str) {
        self.record(Call::MethodResponse {
            method: method.into(),
            status,
            body: body.into(),
        });
    }

    fn report_properties(&mut self, json: &str) -> Result<(), IotError> {
        if self.record(Call::ReportProperties(json.into())) {
            return Err(IotError::SendFailed);
        }
        if self.connection.is_none() {
            return Err(IotError::NotConnected);
        }
        self.reported.push(json.into());
        Ok(())
    }

    fn publish(&mut self, json: &str) -> Result<(), IotError> {
        if self.record(Call::Publish(json.into())) {
            return Err(IotError::SendFailed);
        }
        if self.connection.is_none() {
            return Err(IotError::NotConnected);
        }
        self.published.push(json.into());
        Ok(())
    }

    fn stop_to_device(&mut self) {
        self.record(Call::StopToDevice);
        self.connection = None;
    }
}

impl DeferredUpdates for SimPlatform {
    fn register_deferral(&mut self) -> Result<(), DeferralError> {
        if self.record(Call::RegisterDeferral) {
            return Err(DeferralError::RegistrationFailed);
        }
        self.deferral_registered = true;
        Ok(())
    }

    fn defer_update(&mut self, update_type: UpdateType, minutes: u32) {
        self.record(Call::DeferUpdate(update_type, minutes));
    }

    fn accept_update(&mut self, update_type: UpdateType) {
        self.record(Call::AcceptUpdate(update_type));
    }
}

impl EventSource for SimPlatform {
    fn next_event(&mut self) -> Option<Event> {
        self.events.pop_front()
    }
}
