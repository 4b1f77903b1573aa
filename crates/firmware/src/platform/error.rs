//! Platform error types
//!
//! This module defines error types for platform operations and their mapping
//! onto the parameter store's medium errors.

use core::fmt;
use wifi_bridge_core::traits::MediumError;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// Flash operation failed
    Flash(FlashError),
    /// Invalid configuration provided
    InvalidConfig,
}

/// Flash-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlashError {
    /// Address outside the device, inside the firmware image, or misaligned
    InvalidAddress,
    /// Read operation failed
    ReadFailed,
    /// Program operation failed
    WriteFailed,
    /// Erase operation failed
    EraseFailed,
}

impl From<FlashError> for PlatformError {
    fn from(err: FlashError) -> Self {
        PlatformError::Flash(err)
    }
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Flash(e) => write!(f, "Flash error: {:?}", e),
            PlatformError::InvalidConfig => write!(f, "Invalid configuration"),
        }
    }
}

/// Flash writes only reach the device during `commit`, so program and erase
/// failures both surface as commit failures.
impl From<PlatformError> for MediumError {
    fn from(err: PlatformError) -> Self {
        match err {
            PlatformError::Flash(FlashError::InvalidAddress) => MediumError::OutOfBounds,
            PlatformError::Flash(FlashError::ReadFailed) => MediumError::ReadFailed,
            PlatformError::Flash(FlashError::WriteFailed | FlashError::EraseFailed) => {
                MediumError::CommitFailed
            }
            PlatformError::InvalidConfig => MediumError::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flash_errors_map_to_medium_errors() {
        let cases = [
            (FlashError::InvalidAddress, MediumError::OutOfBounds),
            (FlashError::ReadFailed, MediumError::ReadFailed),
            (FlashError::WriteFailed, MediumError::CommitFailed),
            (FlashError::EraseFailed, MediumError::CommitFailed),
        ];
        for (flash, medium) in cases {
            assert_eq!(MediumError::from(PlatformError::from(flash)), medium);
        }
        assert_eq!(
            MediumError::from(PlatformError::InvalidConfig),
            MediumError::Unavailable
        );
    }
}
