/// Error type for LTR390 operations
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Communication error with the sensor
    Communication(E),
    /// Nothing acknowledged the device address during `begin`
    TransportUnavailable(E),
    /// Part ID register does not identify an LTR390 (raw register value)
    UnexpectedDeviceId(u8),
    /// Soft reset bit did not clear after a reset
    ResetVerificationFailed,
    /// Sensor did not report itself enabled after being enabled
    EnableFailed,
    /// Driver used before a successful `begin`
    NotInitialized,
    /// A register field holds a reserved encoding
    InvalidFieldValue(u8),
}
