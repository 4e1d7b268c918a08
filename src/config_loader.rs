use crate::app_config::ApplicationConfig;
use crate::camera_config::CameraConfig;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use reqwest::Url;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::time::{Duration, Instant};

#[derive(Debug, Deserialize, Clone)]
pub struct MasterConfig {
    #[serde(rename = "application", default)]
    pub app_settings: ApplicationConfig,
    pub cameras: Vec<CameraConfig>,
}

pub fn load_config(path: &str) -> Result<MasterConfig> {
    debug!("📄 Attempting to load config from: {}", path);
    let start_time = Instant::now();

    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file '{}'. 📖", path))?;
    debug!("Read config file in {:?}", start_time.elapsed());

    let config = parse_config(&config_str)
        .with_context(|| format!("Invalid configuration in '{}'", path))?;

    info!("✅ Successfully loaded and validated configuration from '{}' in {:?}", path, start_time.elapsed());
    Ok(config)
}

pub fn parse_config(yaml: &str) -> Result<MasterConfig> {
    let parse_start_time = Instant::now();
    let config: MasterConfig = serde_yaml::from_str(yaml)
        .context("Failed to parse YAML configuration. 💔")?;
    debug!("Parsed YAML in {:?}", parse_start_time.elapsed());

    validate_master_config(&config).context("Master configuration validation failed 👎")?;
    Ok(config)
}

fn validate_master_config(config: &MasterConfig) -> Result<()> {
    debug!("🕵️ Validating master configuration...");
    let validation_start_time = Instant::now();

    if !(config.app_settings.request_timeout_secs > 0.0) {
        bail!("❌ Application request_timeout_secs must be positive.");
    }
    if Duration::try_from_secs_f32(config.app_settings.request_timeout_secs).is_err() {
        bail!("❌ Application request_timeout_secs must be a finite number of seconds.");
    }
    if config.app_settings.clock_sync_tolerance_ms < 0 {
        bail!("❌ Application clock_sync_tolerance_ms cannot be negative.");
    }
    if matches!(config.app_settings.default_profile_token.as_deref(), Some("")) {
        bail!("❌ Application default_profile_token cannot be an empty string.");
    }

    if config.cameras.is_empty() {
        bail!("❌ No cameras defined in the configuration.");
    }

    let mut camera_names = HashSet::new();
    for (idx, camera) in config.cameras.iter().enumerate() {
        debug!("Validating camera #{}: {}", idx + 1, camera.name);
        if camera.name.is_empty() {
            bail!("❌ Camera name cannot be empty for camera #{}.", idx + 1);
        }
        if !camera_names.insert(&camera.name) {
            bail!("❌ Duplicate camera name found: {}", camera.name);
        }
        let address = Url::parse(&camera.imaging_address).with_context(|| {
            format!("❌ Invalid imaging_address '{}' for camera '{}'.", camera.imaging_address, camera.name)
        })?;
        if !matches!(address.scheme(), "http" | "https") {
            bail!("❌ imaging_address for camera '{}' must use http or https.", camera.name);
        }
        if matches!(camera.username.as_deref(), Some("")) {
            bail!("❌ Username for camera '{}' cannot be empty; omit it for anonymous access.", camera.name);
        }
        if matches!(camera.profile_token.as_deref(), Some("")) {
            bail!("❌ profile_token for camera '{}' cannot be empty.", camera.name);
        }
        debug!("Camera '{}' validated successfully.", camera.name);
    }
    info!("👍 Master configuration validated successfully in {:?}.", validation_start_time.elapsed());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"
application:
  log_level: debug
  request_timeout_secs: 5
  default_profile_token: VideoSource_1
cameras:
  - name: front-door
    imaging_address: http://192.168.1.64/onvif/imaging_service
    username: admin
    clock_offset_ms: -250
  - name: garage
    imaging_address: https://192.168.1.65/onvif/imaging
    profile_token: vs2
"#;

    #[test]
    fn parses_valid_config() {
        let config = parse_config(VALID).unwrap();
        assert_eq!(config.cameras.len(), 2);
        assert_eq!(config.app_settings.default_profile_token.as_deref(), Some("VideoSource_1"));
        assert!(!config.app_settings.auto_clock_sync);
        assert_eq!(config.cameras[0].clock_offset_ms, Some(-250));
        assert_eq!(config.cameras[1].username, None);
    }

    #[test]
    fn application_section_is_optional() {
        let config = parse_config(
            "cameras:\n  - name: cam\n    imaging_address: http://10.0.0.2/onvif/imaging_service\n",
        )
        .unwrap();
        assert_eq!(config.app_settings.request_timeout_secs, 10.0);
    }

    #[test]
    fn rejects_duplicate_names() {
        let yaml = "cameras:\n  - name: a\n    imaging_address: http://10.0.0.2/\n  - name: a\n    imaging_address: http://10.0.0.3/\n";
        let err = parse_config(yaml).unwrap_err();
        assert!(format!("{:#}", err).contains("Duplicate camera name"));
    }

    #[test]
    fn rejects_non_http_address() {
        let yaml = "cameras:\n  - name: a\n    imaging_address: rtsp://10.0.0.2/stream\n";
        assert!(parse_config(yaml).is_err());
        let yaml = "cameras:\n  - name: a\n    imaging_address: not a url\n";
        assert!(parse_config(yaml).is_err());
    }

    #[test]
    fn rejects_unrepresentable_timeouts() {
        for timeout in [".inf", ".nan", "1e30", "-3"] {
            let yaml = format!(
                "application:\n  request_timeout_secs: {}\ncameras:\n  - name: a\n    imaging_address: http://10.0.0.2/\n",
                timeout
            );
            assert!(parse_config(&yaml).is_err(), "timeout {} was accepted", timeout);
        }
    }

    #[test]
    fn rejects_empty_tokens_and_usernames() {
        let yaml = "cameras:\n  - name: a\n    imaging_address: http://10.0.0.2/\n    username: ''\n";
        assert!(parse_config(yaml).is_err());
        let yaml = "cameras:\n  - name: a\n    imaging_address: http://10.0.0.2/\n    profile_token: ''\n";
        assert!(parse_config(yaml).is_err());
    }
}
