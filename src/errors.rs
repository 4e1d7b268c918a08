use thiserror::Error;

/// Failure raised by the transport collaborator. Forwarded to callers unchanged.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request to {address} failed: {details}")]
    Request { address: String, details: String },

    #[error("Device returned HTTP {status} for {method_name}: {details}")]
    Status {
        method_name: String,
        status: u16,
        details: String,
    },

    #[error("SOAP fault for {method_name}: {reason}")]
    Fault { method_name: String, reason: String },

    #[error("Malformed response for {method_name}: {details}")]
    Malformed { method_name: String, details: String },
}

/// Every way an imaging command can fail.
#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("The \"{argument}\" argument for {operation} is required.")]
    ArgumentMissing {
        operation: &'static str,
        argument: &'static str,
    },

    #[error("The \"{argument}\" argument for {operation} is invalid: expected {expected}, {details}")]
    ArgumentInvalid {
        operation: &'static str,
        argument: &'static str,
        expected: &'static str,
        details: String,
    },

    #[error("{operation} is not implemented")]
    NotImplemented { operation: &'static str },

    #[error("{operation} was called before the imaging session was initialized")]
    NotConfigured { operation: &'static str },

    #[error("{operation} was given a callback but no Tokio runtime is running")]
    NoRuntime { operation: &'static str },

    #[error("Transport Error: {0}")]
    Transport(#[from] TransportError),
}

impl ImagingError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, ImagingError::NotImplemented { .. })
    }
}
