use crate::errors::TransportError;
use crate::soap::transport::{SoapResponse, SoapTransport};
use crate::soap::xml_scan;
use async_trait::async_trait;
use diqwest::WithDigestAuth;
use log::{debug, error, info, warn};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use std::time::{Duration, Instant};

/// Base namespace for the `action` parameter of each command group.
fn action_namespace(command_group: &str) -> &'static str {
    match command_group {
        "imaging" => "http://www.onvif.org/ver20/imaging/wsdl",
        _ => "http://www.onvif.org/ver10/device/wsdl",
    }
}

/// [`SoapTransport`] over HTTP POST.
///
/// When credentials are set, requests go out with HTTP digest auth as well;
/// devices that only check WS-Security ignore the extra round trip.
#[derive(Clone)]
pub struct HttpSoapTransport {
    client: Client,
    credentials: Option<(String, String)>,
}

impl HttpSoapTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request {
                address: "<client>".to_string(),
                details: format!("Failed to build HTTP client: {}", e),
            })?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: Client) -> Self {
        HttpSoapTransport {
            client,
            credentials: None,
        }
    }

    pub fn with_digest_auth(mut self, username: &str, password: &str) -> Self {
        self.credentials = Some((username.to_string(), password.to_string()));
        self
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

#[async_trait]
impl SoapTransport for HttpSoapTransport {
    async fn make_request(
        &self,
        command_group: &str,
        service_address: &Url,
        method_name: &str,
        envelope: String,
    ) -> Result<SoapResponse, TransportError> {
        let start_time = Instant::now();
        let content_type = format!(
            "application/soap+xml; charset=utf-8; action=\"{}/{}\"",
            action_namespace(command_group),
            method_name
        );
        debug!("📨 POST {} [{}:{}] ({} bytes)", service_address, command_group, method_name, envelope.len());

        let request = self
            .client
            .post(service_address.clone())
            .header(CONTENT_TYPE, content_type)
            .body(envelope);

        let send_result = match &self.credentials {
            Some((username, password)) => request
                .send_with_digest_auth(username, password)
                .await
                .map_err(|e| e.to_string()),
            None => request.send().await.map_err(|e| e.to_string()),
        };

        let response = send_result.map_err(|details| {
            error!("❌ {} request to {} failed: {}", method_name, service_address, details);
            TransportError::Request {
                address: service_address.to_string(),
                details,
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| TransportError::Malformed {
            method_name: method_name.to_string(),
            details: format!("Failed to read response body: {}", e),
        })?;
        debug!("{} replied HTTP {} with {} bytes in {:?}", method_name, status, text.len(), start_time.elapsed());

        let body = xml_scan::element_inner(&text, "Body");

        if !status.is_success() {
            let details = body
                .and_then(xml_scan::fault_reason)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown status").to_string());
            warn!("⚠️ {} returned HTTP {}: {}", method_name, status, details);
            return Err(TransportError::Status {
                method_name: method_name.to_string(),
                status: status.as_u16(),
                details,
            });
        }

        let body = body.ok_or_else(|| TransportError::Malformed {
            method_name: method_name.to_string(),
            details: "response has no SOAP Body element".to_string(),
        })?;

        if let Some(reason) = xml_scan::fault_reason(body) {
            warn!("⚠️ {} returned a SOAP fault: {}", method_name, reason);
            return Err(TransportError::Fault {
                method_name: method_name.to_string(),
                reason,
            });
        }

        info!("✅ {}:{} succeeded in {:?}", command_group, method_name, start_time.elapsed());
        Ok(SoapResponse {
            command_group: command_group.to_string(),
            method_name: method_name.to_string(),
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}
