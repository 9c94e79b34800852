//! Recorded SDK calls

use std::time::Duration;

use genx_hal::{Level, PinId, UpdateType};

/// One call made against the simulated runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect {
        network_interface: String,
        model_id: String,
    },
    OpenOutput(PinId, Level),
    OpenInput(PinId),
    ClosePin(PinId),
    Write(PinId, Level),
    Read(PinId),
    StartPeriodic(&'static str, Duration),
    StartOneshot(&'static str, Duration),
    StopTimer(&'static str),
    SubscribeTwins(Vec<&'static str>),
    UnsubscribeTwins,
    SubscribeMethods(Vec<&'static str>),
    UnsubscribeMethods,
    MethodResponse {
        method: String,
        status: u16,
        body: String,
    },
    ReportProperties(String),
    Publish(String),
    StopToDevice,
    RegisterDeferral,
    DeferUpdate(UpdateType, u32),
    AcceptUpdate(UpdateType),
}

impl Call {
    /// Coarse kind of this call, as used for failure injection
    pub fn operation(&self) -> Operation {
        match self {
            Call::Connect { .. } => Operation::Connect,
            Call::OpenOutput(..) | Call::OpenInput(_) => Operation::OpenPin,
            Call::ClosePin(_) => Operation::ClosePin,
            Call::Write(..) => Operation::Write,
            Call::Read(_) => Operation::Read,
            Call::StartPeriodic(..) | Call::StartOneshot(..) => Operation::StartTimer,
            Call::StopTimer(_) => Operation::StopTimer,
            Call::SubscribeTwins(_) => Operation::SubscribeTwins,
            Call::SubscribeMethods(_) => Operation::SubscribeMethods,
            Call::ReportProperties(_) | Call::Publish(_) => Operation::Send,
            Call::RegisterDeferral => Operation::RegisterDeferral,
            Call::UnsubscribeTwins
            | Call::UnsubscribeMethods
            | Call::MethodResponse { .. }
            | Call::StopToDevice
            | Call::DeferUpdate(..)
            | Call::AcceptUpdate(_) => Operation::Infallible,
        }
    }
}

/// Kinds of fallible calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Connect,
    OpenPin,
    ClosePin,
    Write,
    Read,
    StartTimer,
    StopTimer,
    SubscribeTwins,
    SubscribeMethods,
    Send,
    RegisterDeferral,
    /// Calls that cannot fail
    Infallible,
}
