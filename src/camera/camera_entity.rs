use crate::app_config::ApplicationConfig;
use crate::camera_config::CameraConfig;
use crate::imaging::ImagingService;
use crate::soap::http_transport::HttpSoapTransport;
use crate::soap::session::SessionContext;
use anyhow::{Context, Result};
use log::{debug, warn};
use reqwest::Url;
use std::env;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CameraEntity {
    pub config: CameraConfig,
    password: Option<String>,
}

impl CameraEntity {
    pub fn new(config: CameraConfig) -> Self {
        let mut entity = CameraEntity {
            config,
            password: None,
        };
        entity.load_password();
        entity
    }

    pub fn with_password(config: CameraConfig, password: Option<String>) -> Self {
        CameraEntity { config, password }
    }

    pub fn password_env_var(&self) -> String {
        format!("{}_PASSWORD", self.config.name.to_uppercase().replace('-', "_"))
    }

    fn load_password(&mut self) {
        let env_var_name = self.password_env_var();
        match env::var(&env_var_name) {
            Ok(pass) => self.password = Some(pass),
            Err(_) if self.config.username.is_some() => warn!(
                "Password not found in environment variable '{}' for camera '{}'",
                env_var_name, self.config.name
            ),
            Err(_) => {}
        }
    }

    pub fn imaging_url(&self) -> Result<Url> {
        Url::parse(&self.config.imaging_address)
            .with_context(|| format!("Invalid imaging address for camera '{}'", self.config.name))
    }

    pub fn session(&self, clock_offset_ms: i64) -> Result<SessionContext> {
        Ok(SessionContext::new(
            clock_offset_ms,
            self.imaging_url()?,
            self.config.username.clone(),
            self.password.clone(),
        ))
    }

    /// Profile token from the camera, falling back to the application default.
    pub fn profile_token<'a>(&'a self, app_settings: &'a ApplicationConfig) -> Option<&'a str> {
        self.config
            .profile_token
            .as_deref()
            .or(app_settings.default_profile_token.as_deref())
    }

    pub fn http_transport(&self, app_settings: &ApplicationConfig) -> Result<HttpSoapTransport> {
        let timeout = Duration::try_from_secs_f32(app_settings.request_timeout_secs).with_context(|| {
            format!(
                "Invalid request timeout {}s for camera '{}'",
                app_settings.request_timeout_secs, self.config.name
            )
        })?;
        let transport = HttpSoapTransport::new(timeout)
            .with_context(|| format!("Failed to create HTTP transport for camera '{}'", self.config.name))?;
        Ok(match &self.config.username {
            Some(username) => transport.with_digest_auth(username, self.password.as_deref().unwrap_or_default()),
            None => transport,
        })
    }

    /// A configured imaging service for this camera.
    pub fn imaging_service(&self, app_settings: &ApplicationConfig, clock_offset_ms: i64) -> Result<ImagingService> {
        let transport = self.http_transport(app_settings)?;
        let mut service = ImagingService::new(Arc::new(transport));
        service.init(self.session(clock_offset_ms)?);
        service.set_default_profile_token(self.profile_token(app_settings).map(str::to_string));
        debug!("Imaging service ready for camera '{}'", self.config.name);
        Ok(service)
    }
}
