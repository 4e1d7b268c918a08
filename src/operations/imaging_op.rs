use crate::app_config::ApplicationConfig;
use crate::camera::camera_entity::CameraEntity;
use crate::config_loader::MasterConfig;
use crate::core::camera_manager::CameraManager;
use crate::imaging::{Dispatched, ImagingCommand, Pending};
use crate::operations::op_helper::run_generic_camera_op;
use crate::operations::time_sync_op::measure_clock_offset;
use anyhow::{anyhow, Context, Result};
use clap::ArgMatches;
use log::{debug, info, warn};
use std::time::Instant;

/// The deferred half of a dual-mode call made without a callback.
fn deferred<T>(dispatched: Dispatched<T>) -> Result<Pending<T>> {
    dispatched.ok_or_else(|| anyhow!("Imaging call without callback returned no future"))
}

/// Configured offset, or a fresh measurement when `auto_clock_sync` is on.
/// A failed measurement falls back to the configured value.
pub async fn resolve_clock_offset(cam_entity: &CameraEntity, app_settings: &ApplicationConfig) -> Result<i64> {
    let configured = cam_entity.config.clock_offset_ms.unwrap_or(0);
    if !app_settings.auto_clock_sync {
        return Ok(configured);
    }
    let transport = cam_entity.http_transport(app_settings)?;
    let url = cam_entity.imaging_url()?;
    match measure_clock_offset(transport.client(), &url).await {
        Ok(measured) => Ok(measured),
        Err(e) => {
            warn!(
                "⚠️ Clock check for '{}' failed, using configured offset {} ms: {:#}",
                cam_entity.config.name, configured, e
            );
            Ok(configured)
        }
    }
}

pub async fn handle_get_settings_cli(
    master_config: &MasterConfig,
    camera_manager: &CameraManager,
    args: &ArgMatches,
) -> Result<()> {
    let token_override = args.get_one::<String>("token").cloned();
    debug!("get-settings token override: {:?}", token_override);

    run_generic_camera_op(master_config, camera_manager, args, "Get Imaging Settings", move |cam_entity_arc, app_settings| {
        let token_override = token_override.clone();
        async move {
            let cam_op_start_time = Instant::now();
            let cam_entity = cam_entity_arc.lock().await;
            let cam_name = cam_entity.config.name.clone();

            let offset = resolve_clock_offset(&cam_entity, &app_settings).await?;
            let service = cam_entity.imaging_service(&app_settings, offset)?;
            drop(cam_entity);

            let response = deferred(service.get_imaging_settings(token_override.as_deref(), None))?
                .await
                .with_context(|| format!("GetImagingSettings failed for camera '{}'", cam_name))?;
            info!("📸 Imaging settings for '{}' ({:?}):\n{}", cam_name, cam_op_start_time.elapsed(), response.body);
            Ok::<(), anyhow::Error>(())
        }
    })
    .await
}

pub async fn handle_invoke_cli(
    master_config: &MasterConfig,
    camera_manager: &CameraManager,
    args: &ArgMatches,
) -> Result<()> {
    let camera_name = args
        .get_one::<String>("camera")
        .context("Missing --camera argument for invoke command")?;
    let method = args.get_one::<String>("method").map(String::as_str);
    let body = args.get_one::<String>("body").map(String::as_str);

    let cam_arc = camera_manager
        .get_camera(camera_name)
        .ok_or_else(|| anyhow!("Camera '{}' is not configured", camera_name))?;
    let cam_entity = cam_arc.lock().await;
    let offset = resolve_clock_offset(&cam_entity, &master_config.app_settings).await?;
    let service = cam_entity.imaging_service(&master_config.app_settings, offset)?;
    drop(cam_entity);

    info!("✉️ Invoking imaging {:?} on '{}'", method, camera_name);
    let response = deferred(service.build_request(method, body, None))?
        .await
        .with_context(|| format!("Imaging request failed for camera '{}'", camera_name))?;
    info!("✅ {} replied (HTTP {}):\n{}", response.method_name, response.status, response.body);
    Ok(())
}

pub fn handle_list_commands_cli() -> Result<()> {
    info!("📋 Imaging commands:");
    for command in ImagingCommand::ALL {
        let status = if command.is_implemented() { "✅ implemented" } else { "🚧 not implemented" };
        info!("  {:<24} {:<20} {}", command.method_name(), command.operation_name(), status);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera_config::CameraConfig;

    #[tokio::test]
    async fn configured_offset_is_used_without_auto_sync() {
        let cam = CameraEntity::with_password(
            CameraConfig {
                name: "cam".to_string(),
                imaging_address: "http://127.0.0.1:9/onvif/imaging_service".to_string(),
                username: None,
                clock_offset_ms: Some(1234),
                profile_token: None,
            },
            None,
        );
        let offset = resolve_clock_offset(&cam, &ApplicationConfig::default()).await.unwrap();
        assert_eq!(offset, 1234);
    }

    #[test]
    fn deferred_requires_a_future() {
        assert!(deferred::<u8>(None).is_err());
    }
}
