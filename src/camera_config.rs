use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct CameraConfig {
    pub name: String,
    pub imaging_address: String, // e.g., http://192.168.1.64/onvif/imaging_service
    pub username: Option<String>,
    pub clock_offset_ms: Option<i64>, // Fixed offset; ignored when auto_clock_sync is on
    pub profile_token: Option<String>, // Video source token for imaging requests
}
