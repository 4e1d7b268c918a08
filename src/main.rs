use anyhow::{bail, Context, Result};
use log::{debug, error, info};
use rcam_onvif::common::logging_setup;
use rcam_onvif::core::camera_manager::CameraManager;
use rcam_onvif::{cli, config_loader, operations};
use std::time::Instant;

#[tokio::main]
async fn main() -> Result<()> {
    let main_start_time = Instant::now();
    let matches = cli::build_cli().get_matches();

    if let Some(("list-commands", _)) = matches.subcommand() {
        logging_setup::initialize_logging(None, &matches);
        return operations::imaging_op::handle_list_commands_cli();
    }

    let config_path = matches
        .get_one::<String>("config")
        .map(|s| s.as_str())
        .unwrap_or("config/rcam-onvif.yaml");

    let config_load_start_time = Instant::now();
    let master_config = match config_loader::load_config(config_path) {
        Ok(cfg) => {
            logging_setup::initialize_logging(Some(&cfg), &matches);
            info!("✅ Full configuration loaded successfully from: {} in {:?}", config_path, config_load_start_time.elapsed());
            cfg
        }
        Err(e) => {
            logging_setup::initialize_logging(None, &matches);
            error!("❌ Failed to load master configuration from '{}': {:#}. Exiting.", config_path, e);
            return Err(e.context(format!("Failed to load master configuration from '{}'", config_path)));
        }
    };

    info!("🚀 rcam-onvif starting with {} cameras configured.", master_config.cameras.len());
    let camera_manager = CameraManager::new(&master_config).context("Failed to initialize CameraManager")?;

    let Some((operation_name, sub_matches)) = matches.subcommand() else {
        info!("🤔 No subcommand provided. Try 'list-commands' or 'get-settings'.");
        return Ok(());
    };

    debug!("🎬 Dispatching to subcommand: {}", operation_name);
    let op_start_time = Instant::now();
    let op_result: Result<()> = match operation_name {
        "get-settings" => operations::imaging_op::handle_get_settings_cli(&master_config, &camera_manager, sub_matches).await,
        "invoke" => operations::imaging_op::handle_invoke_cli(&master_config, &camera_manager, sub_matches).await,
        "verify-times" => operations::time_sync_op::handle_verify_times_cli(&master_config, &camera_manager, sub_matches).await,
        other => bail!("Subcommand '{}' not implemented.", other),
    };

    if let Err(e) = op_result {
        error!("❌ Operation '{}' failed after {:?}: {:#}", operation_name, op_start_time.elapsed(), e);
        return Err(e);
    }
    info!("✅ Operation '{}' completed successfully in {:?}.", operation_name, op_start_time.elapsed());
    info!("🏁 rcam-onvif finished in {:?}.", main_start_time.elapsed());
    Ok(())
}
