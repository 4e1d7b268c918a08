use reqwest::Url;

/// Connection and credential state for one command-group instance.
///
/// Replaced wholesale on re-initialization; never merged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    pub service_address: Url,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Device clock minus local clock, in milliseconds.
    pub clock_offset_ms: i64,
}

impl SessionContext {
    pub fn new(
        clock_offset_ms: i64,
        service_address: Url,
        username: Option<String>,
        password: Option<String>,
    ) -> Self {
        SessionContext {
            service_address,
            username,
            password,
            clock_offset_ms,
        }
    }

    pub fn has_credentials(&self) -> bool {
        self.username.as_deref().is_some_and(|u| !u.is_empty())
    }
}
