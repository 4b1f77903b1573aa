//! Parameter error types
//!
//! Provides error types for registry construction, parameter access and
//! store operations.

use crate::traits::medium::MediumError;
use core::fmt;

/// Errors from parameter access by id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Id does not name a live parameter (the sentinel was returned)
    NotFound,
    /// Read-only parameter cannot be modified
    ReadOnly,
}

impl fmt::Display for ParameterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterError::NotFound => write!(f, "parameter not found"),
            ParameterError::ReadOnly => write!(f, "parameter is read-only"),
        }
    }
}

/// Errors from registry construction (schema invariants)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryError {
    /// More descriptors than `MAX_PARAMS`
    TooManyParams,
    /// Name is empty or longer than `PARAM_NAME_LEN`
    InvalidName,
    /// Two descriptors share a name
    DuplicateName,
    /// Payload larger than the live value buffer
    PayloadTooLarge,
    /// Payload runs into the CRC trailer
    PayloadOverlapsTrailer,
    /// CRC trailer does not fit in the reserved capacity
    TrailerOutOfRange,
}

impl RegistryError {
    /// Return variant name as a static string (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistryError::TooManyParams => "TooManyParams",
            RegistryError::InvalidName => "InvalidName",
            RegistryError::DuplicateName => "DuplicateName",
            RegistryError::PayloadTooLarge => "PayloadTooLarge",
            RegistryError::PayloadOverlapsTrailer => "PayloadOverlapsTrailer",
            RegistryError::TrailerOutOfRange => "TrailerOutOfRange",
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::TooManyParams => write!(f, "too many parameters"),
            RegistryError::InvalidName => write!(f, "invalid parameter name"),
            RegistryError::DuplicateName => write!(f, "duplicate parameter name"),
            RegistryError::PayloadTooLarge => write!(f, "parameter payload too large"),
            RegistryError::PayloadOverlapsTrailer => {
                write!(f, "parameter payload overlaps CRC trailer")
            }
            RegistryError::TrailerOutOfRange => write!(f, "CRC trailer outside reserved space"),
        }
    }
}

/// Errors from store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Persistent medium failed (fatal at initialization)
    Medium(MediumError),
    /// Schema violates a registry invariant
    Registry(RegistryError),
}

impl StoreError {
    /// Name of the underlying failure (usable with defmt on embedded)
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreError::Medium(e) => e.as_str(),
            StoreError::Registry(e) => e.as_str(),
        }
    }
}

impl From<MediumError> for StoreError {
    fn from(err: MediumError) -> Self {
        StoreError::Medium(err)
    }
}

impl From<RegistryError> for StoreError {
    fn from(err: RegistryError) -> Self {
        StoreError::Registry(err)
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Medium(e) => write!(f, "medium error: {}", e),
            StoreError::Registry(e) => write!(f, "registry error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_name_comes_from_cause() {
        assert_eq!(
            StoreError::Medium(MediumError::CommitFailed).as_str(),
            "CommitFailed"
        );
        assert_eq!(
            StoreError::from(RegistryError::DuplicateName).as_str(),
            "DuplicateName"
        );
        assert_eq!(MediumError::Unavailable.as_str(), "Unavailable");
    }
}
