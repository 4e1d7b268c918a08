use crate::common::timestamp_utils;
use crate::config_loader::MasterConfig;
use crate::core::camera_manager::CameraManager;
use crate::operations::op_helper::run_generic_camera_op;
use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use clap::ArgMatches;
use log::{debug, info, warn};
use reqwest::header::DATE;
use reqwest::{Client, Url};

/// Device clock minus local clock, from the `Date` header of a reply.
pub fn offset_from_date_header(
    date_header: &str,
    sent: DateTime<Utc>,
    received: DateTime<Utc>,
) -> Result<i64> {
    let device_time = timestamp_utils::parse_http_date(date_header)
        .ok_or_else(|| anyhow!("Unparseable Date header '{}'", date_header))?;
    let local_time = timestamp_utils::midpoint(sent, received);
    Ok((device_time - local_time).num_milliseconds())
}

/// Estimates the device's clock offset in milliseconds.
///
/// Any HTTP status is fine here; only the `Date` header of the reply is read.
pub async fn measure_clock_offset(client: &Client, address: &Url) -> Result<i64> {
    let sent = Utc::now();
    let response = client
        .get(address.clone())
        .send()
        .await
        .with_context(|| format!("Clock check against {} failed", address))?;
    let received = Utc::now();

    let date = response
        .headers()
        .get(DATE)
        .ok_or_else(|| anyhow!("{} did not send a Date header", address))?
        .to_str()
        .with_context(|| format!("{} sent a non-ASCII Date header", address))?;
    let offset = offset_from_date_header(date, sent, received)?;
    debug!("⏱️ Clock offset for {}: {} ms (round trip {} ms)", address, offset, (received - sent).num_milliseconds());
    Ok(offset)
}

pub async fn handle_verify_times_cli(
    master_config: &MasterConfig,
    camera_manager: &CameraManager,
    args: &ArgMatches,
) -> Result<()> {
    info!("Handling verify-times command...");
    info!("Current system time (UTC): {}", Utc::now().to_rfc3339());

    run_generic_camera_op(master_config, camera_manager, args, "Verify Times", |cam_entity_arc, app_settings| async move {
        let cam_entity = cam_entity_arc.lock().await;
        let transport = cam_entity.http_transport(&app_settings)?;
        let url = cam_entity.imaging_url()?;
        let measured = measure_clock_offset(transport.client(), &url).await?;

        let configured = cam_entity.config.clock_offset_ms.unwrap_or(0);
        let drift = (measured - configured).abs();
        if drift > app_settings.clock_sync_tolerance_ms {
            warn!(
                "Camera '{}' clock offset is {} ms, configured {} ms: OUT OF SYNC by {} ms (tolerance {} ms).",
                cam_entity.config.name, measured, configured, drift, app_settings.clock_sync_tolerance_ms
            );
        } else {
            info!(
                "Camera '{}' clock offset is {} ms, configured {} ms: IN SYNC.",
                cam_entity.config.name, measured, configured
            );
        }
        Ok::<(), anyhow::Error>(())
    })
    .await
}
