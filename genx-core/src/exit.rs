//! Process exit codes
//!
//! Every fatal condition maps to one code so that the device log (or the
//! shell running the host build) tells which step failed.

/// Exit code reported when the application terminates
///
/// Values are stable; 2, 14 and 15 are reserved and never reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    /// SIGTERM received
    TermHandlerSigTerm = 1,
    /// Configuration file missing or malformed
    ConfigLoad = 3,
    ValidateConnectionType = 4,
    ValidateScopeId = 5,
    ValidateHostname = 6,
    ValidateDeviceId = 7,
    ValidateIotEdgeCaPath = 8,
    /// Binding tables failed validation
    BindingValidation = 9,
    AzureConnect = 10,
    GpioOpen = 11,
    GpioOpenDirectionUnknown = 12,
    GpioClose = 13,
    TimerStart = 16,
    TimerStop = 17,
    TwinSubscribe = 18,
    MethodSubscribe = 19,
    DeferredUpdateRegistration = 20,
    UpdateCallbackUnexpectedEvent = 21,
}

impl ExitCode {
    /// Numeric value handed to the OS
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create an exit code from its numeric value
    pub fn from_u8(value: u8) -> Option<Self> {
        use ExitCode::*;

        Some(match value {
            0 => Success,
            1 => TermHandlerSigTerm,
            3 => ConfigLoad,
            4 => ValidateConnectionType,
            5 => ValidateScopeId,
            6 => ValidateHostname,
            7 => ValidateDeviceId,
            8 => ValidateIotEdgeCaPath,
            9 => BindingValidation,
            10 => AzureConnect,
            11 => GpioOpen,
            12 => GpioOpenDirectionUnknown,
            13 => GpioClose,
            16 => TimerStart,
            17 => TimerStop,
            18 => TwinSubscribe,
            19 => MethodSubscribe,
            20 => DeferredUpdateRegistration,
            21 => UpdateCallbackUnexpectedEvent,
            _ => return None,
        })
    }

    /// Whether this code means a clean shutdown
    ///
    /// SIGTERM is the normal way the OS stops an application.
    pub fn is_clean(self) -> bool {
        matches!(self, ExitCode::Success | ExitCode::TermHandlerSigTerm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values_round_trip() {
        for value in (0..=21u8).filter(|v| ![2, 14, 15].contains(v)) {
            let code = ExitCode::from_u8(value).unwrap();
            assert_eq!(code.as_u8(), value);
        }
        assert_eq!(ExitCode::from_u8(2), None);
        assert_eq!(ExitCode::from_u8(14), None);
        assert_eq!(ExitCode::from_u8(22), None);
        assert_eq!(ExitCode::TimerStart.as_u8(), 16);
    }

    #[test]
    fn test_clean_codes() {
        assert!(ExitCode::Success.is_clean());
        assert!(ExitCode::TermHandlerSigTerm.is_clean());
        assert!(!ExitCode::GpioOpen.is_clean());
    }
}
