use crate::errors::ImagingError;
use crate::imaging::completion::{deliver, Completion, Dispatched, Pending};
use crate::soap::envelope::build_envelope;
use crate::soap::session::SessionContext;
use crate::soap::transport::{SoapResponse, SoapTransport};
use futures::future::FutureExt;
use log::{debug, info};
use std::sync::Arc;

/// Identifier handed to the transport for routing.
pub const COMMAND_GROUP: &str = "imaging";
/// Prefix bound to the imaging namespace in every envelope.
pub const IMAGING_PREFIX: &str = "timg";

pub(crate) const BUILD_REQUEST: &str = "buildRequest";

pub fn imaging_namespaces() -> Vec<String> {
    vec![
        "xmlns:tns1=\"http://www.onvif.org/ver10/topics\"".to_string(),
        "xmlns:timg=\"http://www.onvif.org/ver20/imaging/wsdl\"".to_string(),
    ]
}

/// The imaging command group.
///
/// Holds the session and the default profile token; reconfiguration takes
/// `&mut self`, so it can never race an invocation borrowed from the same
/// service. Each invocation snapshots what it needs into an owned future.
pub struct ImagingService {
    transport: Arc<dyn SoapTransport>,
    session: Option<SessionContext>,
    default_profile_token: Option<String>,
    namespaces: Vec<String>,
}

impl ImagingService {
    /// An unconfigured service. Every command fails with
    /// [`ImagingError::NotConfigured`] until [`ImagingService::init`] runs.
    pub fn new(transport: Arc<dyn SoapTransport>) -> Self {
        ImagingService {
            transport,
            session: None,
            default_profile_token: None,
            namespaces: imaging_namespaces(),
        }
    }

    /// Replaces the whole session.
    pub fn init(&mut self, session: SessionContext) {
        info!(
            "🔧 Imaging session initialized for {} (user: {}, clock offset: {} ms)",
            session.service_address,
            session.username.as_deref().unwrap_or("<none>"),
            session.clock_offset_ms
        );
        self.session = Some(session);
    }

    pub fn set_default_profile_token(&mut self, token: Option<String>) {
        debug!("Default profile token set to {:?}", token);
        self.default_profile_token = token;
    }

    pub fn default_profile_token(&self) -> Option<&str> {
        self.default_profile_token.as_deref()
    }

    pub fn session(&self) -> Option<&SessionContext> {
        self.session.as_ref()
    }

    /// Sends `<timg:{method_name}>` with an optional body fragment.
    pub fn build_request(
        &self,
        method_name: Option<&str>,
        body: Option<&str>,
        callback: Option<Completion<SoapResponse>>,
    ) -> Dispatched<SoapResponse> {
        deliver(BUILD_REQUEST, self.prepare_request(BUILD_REQUEST, method_name, body), callback)
    }

    /// Validates, frames and builds the envelope now; the returned future
    /// only performs the transport call.
    pub(crate) fn prepare_request(
        &self,
        operation: &'static str,
        method_name: Option<&str>,
        body: Option<&str>,
    ) -> Result<Pending<SoapResponse>, ImagingError> {
        let method_name = method_name.ok_or(ImagingError::ArgumentMissing {
            operation: BUILD_REQUEST,
            argument: "methodName",
        })?;
        validate_method_name(method_name).map_err(|details| ImagingError::ArgumentInvalid {
            operation: BUILD_REQUEST,
            argument: "methodName",
            expected: "an XML element name",
            details,
        })?;
        let session = self
            .session
            .clone()
            .ok_or(ImagingError::NotConfigured { operation })?;

        let command = frame_command(IMAGING_PREFIX, method_name, body);
        let envelope = build_envelope(&session, &self.namespaces, &command);
        debug!("✉️ {} built {} envelope ({} bytes)", operation, method_name, envelope.len());

        let transport = Arc::clone(&self.transport);
        let method_name = method_name.to_string();
        Ok(async move {
            transport
                .make_request(COMMAND_GROUP, &session.service_address, &method_name, envelope)
                .await
                .map_err(ImagingError::from)
        }
        .boxed())
    }
}

/// `<prefix:Method/>` for an empty body, otherwise the body wrapped verbatim.
pub fn frame_command(prefix: &str, method_name: &str, body: Option<&str>) -> String {
    match body {
        None | Some("") => format!("<{}:{}/>", prefix, method_name),
        Some(fragment) => format!(
            "<{p}:{m}>{fragment}</{p}:{m}>",
            p = prefix,
            m = method_name,
            fragment = fragment
        ),
    }
}

/// Method names become element names, so they must be a valid unprefixed
/// XML name.
fn validate_method_name(name: &str) -> Result<(), String> {
    let mut chars = name.chars();
    let first = chars.next().ok_or_else(|| "got an empty string".to_string())?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return Err(format!("'{}' must start with a letter or underscore", name));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))) {
        return Err(format!("'{}' contains the character {:?}", name, bad));
    }
    Ok(())
}
