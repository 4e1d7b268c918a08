use crate::errors::TransportError;
use async_trait::async_trait;
use reqwest::Url;

/// Parsed reply to one SOAP request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoapResponse {
    pub command_group: String,
    pub method_name: String,
    pub status: u16,
    /// Inner XML of the envelope's `Body` element.
    pub body: String,
}

/// Delivers an envelope to a device endpoint and parses the reply.
///
/// Implementations must fail with a descriptive [`TransportError`] on network
/// failure, non-success protocol status, or a malformed response.
#[async_trait]
pub trait SoapTransport: Send + Sync {
    async fn make_request(
        &self,
        command_group: &str,
        service_address: &Url,
        method_name: &str,
        envelope: String,
    ) -> Result<SoapResponse, TransportError>;
}
