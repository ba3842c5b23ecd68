use thiserror::Error;

/// Errors returned by counter payload parsing and reading.
///
/// # Examples
/// ```
/// use uplink_decoder_core::CounterError;
///
/// let err = CounterError::TooShort { needed: 2, actual: 0 };
/// assert_eq!(err.to_string(), "payload too short: need 2 bytes, got 0");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CounterError {
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },
}
