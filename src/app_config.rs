use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApplicationConfig {
    pub log_level: Option<String>, // Optional so the CLI or env var can take precedence
    pub request_timeout_secs: f32,
    pub default_profile_token: Option<String>, // Used when a camera has no profile_token of its own
    pub auto_clock_sync: bool, // Measure each device's clock before sending requests
    pub clock_sync_tolerance_ms: i64,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        ApplicationConfig {
            log_level: Some("info".to_string()),
            request_timeout_secs: 10.0,
            default_profile_token: None,
            auto_clock_sync: false,
            clock_sync_tolerance_ms: 5_000,
        }
    }
}
