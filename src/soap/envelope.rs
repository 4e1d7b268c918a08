use crate::soap::session::SessionContext;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use log::debug;
use sha1::{Digest, Sha1};

pub const SOAP_ENV_NS: &str = "http://www.w3.org/2003/05/soap-envelope";
const WSSE_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-secext-1.0.xsd";
const WSU_NS: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";
const PASSWORD_DIGEST_TYPE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-username-token-profile-1.0#PasswordDigest";
const BASE64_ENCODING_TYPE: &str =
    "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-soap-message-security-1.0#Base64Binary";

/// Builds a request envelope stamped with the current time and a fresh nonce.
pub fn build_envelope(session: &SessionContext, namespaces: &[String], body: &str) -> String {
    let nonce = *uuid::Uuid::new_v4().as_bytes();
    build_envelope_at(session, namespaces, body, Utc::now(), &nonce)
}

/// Deterministic form of [`build_envelope`]: `now` is the local wall clock,
/// the session's clock offset is applied on top of it.
pub fn build_envelope_at(
    session: &SessionContext,
    namespaces: &[String],
    body: &str,
    now: DateTime<Utc>,
    nonce: &[u8],
) -> String {
    let mut envelope = String::with_capacity(body.len() + 1024);
    envelope.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>");
    envelope.push_str("<s:Envelope xmlns:s=\"");
    envelope.push_str(SOAP_ENV_NS);
    envelope.push('"');
    for ns in namespaces {
        envelope.push(' ');
        envelope.push_str(ns);
    }
    envelope.push('>');

    if session.has_credentials() {
        let created = device_timestamp(now, session.clock_offset_ms);
        envelope.push_str("<s:Header>");
        envelope.push_str(&security_header(session, &created, nonce));
        envelope.push_str("</s:Header>");
    } else {
        debug!("No username configured for {}, omitting WS-Security header", session.service_address);
    }

    envelope.push_str("<s:Body>");
    envelope.push_str(body);
    envelope.push_str("</s:Body>");
    envelope.push_str("</s:Envelope>");
    envelope
}

/// Local time shifted into the device's clock, in the `Created` format.
pub fn device_timestamp(now: DateTime<Utc>, clock_offset_ms: i64) -> String {
    let adjusted = now + Duration::milliseconds(clock_offset_ms);
    adjusted.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// `Base64(SHA1(nonce ++ created ++ password))`
pub fn password_digest(nonce: &[u8], created: &str, password: &str) -> String {
    let mut hasher = Sha1::new();
    hasher.update(nonce);
    hasher.update(created.as_bytes());
    hasher.update(password.as_bytes());
    BASE64.encode(hasher.finalize())
}

fn security_header(session: &SessionContext, created: &str, nonce: &[u8]) -> String {
    let username = session.username.as_deref().unwrap_or_default();
    let password = session.password.as_deref().unwrap_or_default();
    let digest = password_digest(nonce, created, password);
    format!(
        "<Security s:mustUnderstand=\"1\" xmlns=\"{wsse}\">\
         <UsernameToken>\
         <Username>{username}</Username>\
         <Password Type=\"{digest_type}\">{digest}</Password>\
         <Nonce EncodingType=\"{encoding}\">{nonce}</Nonce>\
         <Created xmlns=\"{wsu}\">{created}</Created>\
         </UsernameToken>\
         </Security>",
        wsse = WSSE_NS,
        username = escape_text(username),
        digest_type = PASSWORD_DIGEST_TYPE,
        digest = digest,
        encoding = BASE64_ENCODING_TYPE,
        nonce = BASE64.encode(nonce),
        wsu = WSU_NS,
        created = created,
    )
}

/// Escapes character data for inclusion in element content.
pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use reqwest::Url;

    fn namespaces() -> Vec<String> {
        vec![
            "xmlns:tns1=\"http://www.onvif.org/ver10/topics\"".to_string(),
            "xmlns:timg=\"http://www.onvif.org/ver20/imaging/wsdl\"".to_string(),
        ]
    }

    fn session(username: Option<&str>, password: Option<&str>, offset: i64) -> SessionContext {
        SessionContext::new(
            offset,
            Url::parse("http://10.0.0.5/onvif/imaging_service").unwrap(),
            username.map(str::to_string),
            password.map(str::to_string),
        )
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn anonymous_envelope_has_no_header() {
        let env = build_envelope_at(
            &session(None, None, 0),
            &namespaces(),
            "<timg:GetImagingSettings/>",
            fixed_now(),
            &[0u8; 16],
        );
        assert!(!env.contains("<s:Header>"));
        assert!(env.contains("<s:Body><timg:GetImagingSettings/></s:Body>"));
    }

    #[test]
    fn namespaces_are_declared_in_order_on_the_root() {
        let env = build_envelope_at(&session(None, None, 0), &namespaces(), "", fixed_now(), &[0u8; 16]);
        let root_end = env.find("><s:Body>").unwrap();
        let root = &env[..root_end];
        let tns1 = root.find("xmlns:tns1=").unwrap();
        let timg = root.find("xmlns:timg=").unwrap();
        assert!(root.contains(SOAP_ENV_NS));
        assert!(tns1 < timg);
    }

    #[test]
    fn created_stamp_applies_clock_offset() {
        assert_eq!(device_timestamp(fixed_now(), 0), "2024-03-01T12:00:00.000Z");
        assert_eq!(device_timestamp(fixed_now(), 90_500), "2024-03-01T12:01:30.500Z");
        assert_eq!(device_timestamp(fixed_now(), -1_000), "2024-03-01T11:59:59.000Z");
    }

    #[test]
    fn authenticated_envelope_carries_username_token() {
        let nonce = [7u8; 16];
        let env = build_envelope_at(
            &session(Some("admin"), Some("secret"), 2_000),
            &namespaces(),
            "<timg:GetImagingSettings/>",
            fixed_now(),
            &nonce,
        );
        let created = "2024-03-01T12:00:02.000Z";
        let digest = password_digest(&nonce, created, "secret");
        assert!(env.contains("<s:Header><Security s:mustUnderstand=\"1\""));
        assert!(env.contains("<Username>admin</Username>"));
        assert!(env.contains(&format!(">{}</Password>", digest)));
        assert!(env.contains(&format!(">{}</Nonce>", BASE64.encode(nonce))));
        assert!(env.contains(&format!(">{}</Created>", created)));
        assert!(!env.contains("secret"));
    }

    #[test]
    fn digest_matches_known_vector() {
        let digest = password_digest(&[0u8; 16], "2024-03-01T12:00:00.000Z", "secret");
        assert_eq!(digest, "qWxDurHErt+7Re1VQSZK/3OdcCs=");
        assert_ne!(digest, password_digest(&[1u8; 16], "2024-03-01T12:00:00.000Z", "secret"));
    }

    #[test]
    fn missing_password_digests_the_empty_string() {
        let nonce = [3u8; 16];
        let env = build_envelope_at(&session(Some("viewer"), None, 0), &namespaces(), "", fixed_now(), &nonce);
        let expected = password_digest(&nonce, "2024-03-01T12:00:00.000Z", "");
        assert!(env.contains(&expected));
    }

    #[test]
    fn escapes_markup_in_text() {
        assert_eq!(escape_text("a<b>&\"c'"), "a&lt;b&gt;&amp;&quot;c&apos;");
        assert_eq!(escape_text("VideoSource_1"), "VideoSource_1");
    }
}
