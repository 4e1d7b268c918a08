use crate::app_config::ApplicationConfig;
use crate::camera::camera_entity::CameraEntity;
use crate::config_loader::MasterConfig;
use crate::core::camera_manager::{parse_camera_names_arg, CameraManager};
use anyhow::{bail, Result};
use clap::ArgMatches;
use futures::future::join_all;
use log::{debug, error, info, warn};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Runs `per_camera_op` concurrently against every camera selected by the
/// `--cameras` argument (all cameras when absent).
///
/// One Tokio task is spawned per camera. Failures are logged per camera; the
/// helper itself fails only when every targeted camera failed.
///
/// # Arguments
/// * `master_config`: The application's master configuration.
/// * `camera_manager`: The camera manager instance.
/// * `args`: Subcommand arguments; `cameras` is read if the subcommand defines it.
/// * `operation_display_name`: A user-friendly name for the operation (e.g., "Get Imaging Settings").
/// * `per_camera_op`: The work for one camera. It receives the camera and shared application settings.
pub async fn run_generic_camera_op<F, Fut>(
    master_config: &MasterConfig,
    camera_manager: &CameraManager,
    args: &ArgMatches,
    operation_display_name: &str,
    per_camera_op: F,
) -> Result<()>
where
    F: Fn(Arc<Mutex<CameraEntity>>, Arc<ApplicationConfig>) -> Fut + Send + Sync + 'static + Clone,
    Fut: std::future::Future<Output = Result<()>> + Send + 'static,
{
    let op_helper_start_time = Instant::now();
    info!("🛠️ Starting operation: '{}'...", operation_display_name);

    let specific_cameras_arg = args.try_get_one::<String>("cameras").ok().flatten();
    let camera_names_to_process = parse_camera_names_arg(specific_cameras_arg);

    let cameras_to_target = match camera_names_to_process {
        Some(ref names) => camera_manager.get_cameras_by_names(names),
        None => camera_manager.get_all_cameras(),
    };

    if cameras_to_target.is_empty() {
        if let Some(names) = camera_names_to_process {
            warn!("⚠️ No cameras found matching names: {:?} for '{}'.", names, operation_display_name);
        } else {
            warn!("⚠️ No cameras configured or found for '{}'.", operation_display_name);
        }
        return Ok(());
    }
    info!("🎯 Targeting {} camera(s) for {}.", cameras_to_target.len(), operation_display_name);

    let mut tasks: Vec<JoinHandle<Result<()>>> = Vec::new();
    let app_settings_arc = Arc::new(master_config.app_settings.clone());

    for cam_entity_arc in cameras_to_target.iter() {
        let op_clone = per_camera_op.clone();
        let task_app_settings = Arc::clone(&app_settings_arc);
        let cam_arc_clone = Arc::clone(cam_entity_arc);
        let operation_display_name_owned = operation_display_name.to_string();

        tasks.push(tokio::spawn(async move {
            let camera_name_for_log = cam_arc_clone.lock().await.config.name.clone();
            debug!("    Task for camera '{}' (operation '{}') started.", camera_name_for_log, operation_display_name_owned);
            let res = op_clone(cam_arc_clone, task_app_settings).await;
            if let Err(e) = &res {
                error!("❌ '{}' failed for camera '{}': {:#}", operation_display_name_owned, camera_name_for_log, e);
            } else {
                debug!("    Task for camera '{}' (operation '{}') finished successfully.", camera_name_for_log, operation_display_name_owned);
            }
            res
        }));
    }

    info!("🔄 Waiting for all {} tasks to complete for '{}'...", tasks.len(), operation_display_name);
    let results = join_all(tasks).await;

    let mut operation_errors = 0;
    for (i, task_result) in results.into_iter().enumerate() {
        match task_result {
            Ok(Ok(())) => {}
            Ok(Err(_)) => operation_errors += 1, // already logged by the task
            Err(join_err) => {
                error!("💀 Task execution failed (panic or cancellation) for '{}' for camera task {}: {:#}", operation_display_name, i + 1, join_err);
                operation_errors += 1;
            }
        }
    }

    info!("🏁 '{}' operation finished in {:?}.", operation_display_name, op_helper_start_time.elapsed());
    if operation_errors == 0 {
        info!("✅ '{}' succeeded for all {} camera(s).", operation_display_name, cameras_to_target.len());
    } else if operation_errors == cameras_to_target.len() {
        bail!("'{}' failed for every targeted camera ({}).", operation_display_name, operation_errors);
    } else {
        warn!(
            "⚠️ '{}' operation completed with {} error(s) out of {} camera(s). Please check logs.",
            operation_display_name,
            operation_errors,
            cameras_to_target.len()
        );
    }
    Ok(())
}
