use crate::errors::TransportError;
use crate::imaging::dispatcher::ImagingService;
use crate::soap::session::SessionContext;
use crate::soap::transport::{SoapResponse, SoapTransport};
use async_trait::async_trait;
use reqwest::Url;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command_group: String,
    pub service_address: Url,
    pub method_name: String,
    pub envelope: String,
}

/// Transport spy: records every call and replies with a canned outcome.
pub struct SpyTransport {
    calls: Mutex<Vec<RecordedCall>>,
    fail_with: Option<String>,
}

impl SpyTransport {
    pub fn replying() -> Arc<Self> {
        Arc::new(SpyTransport {
            calls: Mutex::new(Vec::new()),
            fail_with: None,
        })
    }

    pub fn failing(reason: &str) -> Arc<Self> {
        Arc::new(SpyTransport {
            calls: Mutex::new(Vec::new()),
            fail_with: Some(reason.to_string()),
        })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl SoapTransport for SpyTransport {
    async fn make_request(
        &self,
        command_group: &str,
        service_address: &Url,
        method_name: &str,
        envelope: String,
    ) -> Result<SoapResponse, TransportError> {
        self.calls.lock().unwrap().push(RecordedCall {
            command_group: command_group.to_string(),
            service_address: service_address.clone(),
            method_name: method_name.to_string(),
            envelope,
        });
        match &self.fail_with {
            Some(reason) => Err(TransportError::Fault {
                method_name: method_name.to_string(),
                reason: reason.clone(),
            }),
            None => Ok(SoapResponse {
                command_group: command_group.to_string(),
                method_name: method_name.to_string(),
                status: 200,
                body: format!("<timg:{}Response/>", method_name),
            }),
        }
    }
}

pub fn test_session() -> SessionContext {
    SessionContext::new(
        1_500,
        Url::parse("http://192.168.1.64/onvif/imaging_service").unwrap(),
        Some("admin".to_string()),
        Some("admin123".to_string()),
    )
}

pub fn configured_service(spy: &Arc<SpyTransport>) -> ImagingService {
    let mut service = ImagingService::new(spy.clone());
    service.init(test_session());
    service
}
