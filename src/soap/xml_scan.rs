//! Just enough XML scanning to pull the `Body` and `Fault` parts out of a SOAP
//! reply. Typed decoding of the payload is left to callers.

/// Returns the inner XML of the first element whose local name is `local_name`,
/// regardless of prefix. Self-closing elements yield `""`.
pub fn element_inner<'a>(xml: &'a str, local_name: &str) -> Option<&'a str> {
    let mut cursor = 0;
    while let Some(rel) = xml[cursor..].find('<') {
        let tag_start = cursor + rel + 1;
        let rest = &xml[tag_start..];
        let name_len = rest
            .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let qname = &rest[..name_len];
        cursor = tag_start;

        if qname.starts_with(['/', '?', '!']) || qname.is_empty() {
            continue;
        }
        let local = qname.rsplit(':').next().unwrap_or(qname);
        if local != local_name {
            continue;
        }

        let open_end = tag_start + rest.find('>')?;
        if xml[..open_end].ends_with('/') {
            return Some("");
        }
        let closing = format!("</{}>", qname);
        let close_start = xml[open_end + 1..].rfind(&closing)? + open_end + 1;
        return Some(&xml[open_end + 1..close_start]);
    }
    None
}

/// Human-readable reason of a SOAP 1.2 (`Reason/Text`) or 1.1 (`faultstring`) fault.
pub fn fault_reason(body: &str) -> Option<String> {
    let fault = element_inner(body, "Fault")?;
    let reason = element_inner(fault, "Text")
        .or_else(|| element_inner(fault, "faultstring"))
        .unwrap_or(fault);
    Some(reason.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPLY: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<env:Envelope xmlns:env="http://www.w3.org/2003/05/soap-envelope" xmlns:timg="http://www.onvif.org/ver20/imaging/wsdl">
<env:Header/>
<env:Body><timg:GetImagingSettingsResponse><timg:ImagingSettings><tt:Brightness>50</tt:Brightness></timg:ImagingSettings></timg:GetImagingSettingsResponse></env:Body>
</env:Envelope>"#;

    #[test]
    fn extracts_body_with_any_prefix() {
        let body = element_inner(REPLY, "Body").unwrap();
        assert!(body.starts_with("<timg:GetImagingSettingsResponse>"));
        assert!(body.ends_with("</timg:GetImagingSettingsResponse>"));
        assert_eq!(element_inner(REPLY, "Header"), Some(""));
    }

    #[test]
    fn skips_declarations_and_closing_tags() {
        assert_eq!(element_inner("<?xml version=\"1.0\"?><a>x</a>", "a"), Some("x"));
        assert_eq!(element_inner("</b><b>y</b>", "b"), Some("y"));
        assert_eq!(element_inner("<Bodyguard>z</Bodyguard>", "Body"), None);
    }

    #[test]
    fn reads_soap12_fault_reason() {
        let body = r#"<s:Fault><s:Code><s:Value>s:Sender</s:Value></s:Code><s:Reason><s:Text xml:lang="en">Sender not Authorized</s:Text></s:Reason></s:Fault>"#;
        assert_eq!(fault_reason(body).as_deref(), Some("Sender not Authorized"));
    }

    #[test]
    fn reads_soap11_faultstring() {
        let body = "<SOAP-ENV:Fault><faultcode>Client</faultcode><faultstring>Bad token</faultstring></SOAP-ENV:Fault>";
        assert_eq!(fault_reason(body).as_deref(), Some("Bad token"));
        assert_eq!(fault_reason("<timg:Ok/>"), None);
    }
}
