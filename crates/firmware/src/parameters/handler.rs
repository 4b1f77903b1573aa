//! Parameter Protocol Handler
//!
//! Answers ground station parameter requests against the bridge store. The
//! handler carries no transport: callers decode PARAM_* messages, call the
//! matching `handle_*` method and encode the returned [`ParamReport`]s.
//!
//! # Supported Requests
//!
//! - **List**: report every parameter in declaration order
//! - **Read**: report one parameter by index or by name
//! - **Set**: update a live value by name (not persisted)
//! - **Hash**: parameter set fingerprint for cache validation
//! - **Save**: persist live values
//! - **Factory reset**: restore defaults and persist them
//!
//! Values travel byte-wise: the 32-bit slot value is carried unchanged in the
//! float field of PARAM_VALUE / PARAM_SET, tagged with the slot's
//! `MAV_PARAM_TYPE`.

use core::fmt;
use heapless::Vec;
use wifi_bridge_core::parameters::{
    BridgeParameters, Descriptor, Lookup, ParamType, ParameterError, StoreError, MAX_PARAMS,
};
use wifi_bridge_core::traits::{PersistentMedium, StoreObserver};

use super::observer::LogObserver;

/// Parameter handler error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamHandlerError {
    /// No parameter with that name
    NotFound,
    /// Parameter cannot be set remotely
    ReadOnly,
    /// Persisting failed
    Store(StoreError),
}

impl From<ParameterError> for ParamHandlerError {
    fn from(err: ParameterError) -> Self {
        match err {
            ParameterError::NotFound => ParamHandlerError::NotFound,
            ParameterError::ReadOnly => ParamHandlerError::ReadOnly,
        }
    }
}

impl From<StoreError> for ParamHandlerError {
    fn from(err: StoreError) -> Self {
        ParamHandlerError::Store(err)
    }
}

impl fmt::Display for ParamHandlerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamHandlerError::NotFound => write!(f, "parameter not found"),
            ParamHandlerError::ReadOnly => write!(f, "parameter is read-only"),
            ParamHandlerError::Store(e) => write!(f, "{}", e),
        }
    }
}

/// One parameter as reported to the ground station (PARAM_VALUE content)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamReport {
    /// Parameter name
    pub name: &'static str,
    /// Current value widened to 32 bits
    pub value: u32,
    /// Encoded type
    pub param_type: ParamType,
    /// Index in declaration order
    pub index: u16,
    /// Total number of parameters
    pub count: u16,
}

impl ParamReport {
    /// Value for the float field of PARAM_VALUE (bits carried unchanged)
    pub fn wire_value(&self) -> f32 {
        f32::from_bits(self.value)
    }

    /// `MAV_PARAM_TYPE` code
    pub fn mav_param_type(&self) -> u8 {
        self.param_type.mav_param_type()
    }
}

/// Target of a read request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamRead<'a> {
    /// By index in declaration order
    Index(u16),
    /// By name (trailing NUL padding is ignored)
    Name(&'a str),
}

/// Parameter protocol handler over the bridge store
pub struct ParamHandler<M: PersistentMedium, O: StoreObserver = LogObserver> {
    params: BridgeParameters<M, O>,
}

impl<M: PersistentMedium, O: StoreObserver> ParamHandler<M, O> {
    pub fn new(params: BridgeParameters<M, O>) -> Self {
        Self { params }
    }

    /// Bridge parameters
    pub fn params(&self) -> &BridgeParameters<M, O> {
        &self.params
    }

    /// Bridge parameters (mutable)
    pub fn params_mut(&mut self) -> &mut BridgeParameters<M, O> {
        &mut self.params
    }

    /// Give back the bridge parameters
    pub fn into_inner(self) -> BridgeParameters<M, O> {
        self.params
    }

    /// Parameter count
    pub fn count(&self) -> usize {
        self.params.store().registry().count()
    }

    fn report(&self, descriptor: &Descriptor) -> ParamReport {
        ParamReport {
            name: descriptor.name,
            value: self.params.store().values().get(descriptor),
            param_type: descriptor.param_type,
            index: descriptor.id as u16,
            count: self.count() as u16,
        }
    }

    /// Report every parameter in declaration order
    pub fn handle_request_list(&self) -> Vec<ParamReport, MAX_PARAMS> {
        let mut reports = Vec::new();
        for descriptor in self.params.store().registry().iter() {
            // Registry never holds more than MAX_PARAMS entries
            let _ = reports.push(self.report(descriptor));
        }
        reports
    }

    /// Report one parameter, or `None` if it does not exist
    pub fn handle_request_read(&self, request: ParamRead<'_>) -> Option<ParamReport> {
        let registry = self.params.store().registry();
        let descriptor = match request {
            ParamRead::Index(index) => match registry.descriptor_at(index as usize) {
                Lookup::Found(d) => d,
                Lookup::NotFound(_) => return None,
            },
            ParamRead::Name(name) => registry.find(name.trim_end_matches('\0'))?,
        };
        Some(self.report(descriptor))
    }

    /// Set a live value by name and report the stored result
    ///
    /// The value is truncated to the slot width; the report carries what was
    /// actually stored. Nothing is persisted until [`handle_save`](Self::handle_save).
    pub fn handle_set(&mut self, name: &str, value: u32) -> Result<ParamReport, ParamHandlerError> {
        let id = self
            .params
            .store()
            .registry()
            .find(name.trim_end_matches('\0'))
            .map(|d| d.id)
            .ok_or(ParamHandlerError::NotFound)?;

        self.params.store_mut().set_value(id, value)?;
        crate::log_info!("Parameter {} set to {}", name, value);

        match self.params.descriptor_at(id) {
            Lookup::Found(d) => Ok(self.report(d)),
            Lookup::NotFound(_) => Err(ParamHandlerError::NotFound),
        }
    }

    /// Set a live value from the float field of PARAM_SET (bits carried unchanged)
    pub fn handle_set_wire(
        &mut self,
        name: &str,
        wire_value: f32,
    ) -> Result<ParamReport, ParamHandlerError> {
        self.handle_set(name, wire_value.to_bits())
    }

    /// Parameter set fingerprint
    pub fn handle_hash(&self) -> u32 {
        self.params.identity_hash()
    }

    /// Persist live values
    pub fn handle_save(&mut self) -> Result<(), ParamHandlerError> {
        self.params.save_all()?;
        Ok(())
    }

    /// Restore factory defaults and persist them
    pub fn handle_factory_reset(&mut self) -> Result<(), ParamHandlerError> {
        crate::log_warn!("Factory reset requested");
        self.params.reset_to_defaults();
        self.params.save_all()?;
        Ok(())
    }
}
