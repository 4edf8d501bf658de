//! `heathub status`: connectivity, identity and system settings.

use serde::Serialize;

use heathub_core::{ConnectivityState, Hub};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusView {
    state: ConnectivityState,
    detail: Option<String>,
    hostname: Option<String>,
    mac_address: Option<String>,
    firmware: Option<String>,
    product: Option<String>,
    model: Option<String>,
    manufacturer: Option<String>,
    away: bool,
    eco: bool,
    rooms: usize,
    devices: usize,
    snapshot_version: Option<u64>,
    fetched_at: Option<chrono::DateTime<chrono::Utc>>,
}

fn detail(view: &StatusView, color: bool) -> String {
    let mut lines = vec![format!(
        "Hub:        {}",
        output::paint_state(view.state, color)
    )];
    if let Some(ref detail) = view.detail {
        lines.push(format!("Detail:     {detail}"));
    }
    lines.extend([
        format!("Hostname:   {}", output::text(view.hostname.as_deref())),
        format!("MAC:        {}", output::text(view.mac_address.as_deref())),
        format!("Firmware:   {}", output::text(view.firmware.as_deref())),
        format!("Product:    {}", output::text(view.product.as_deref())),
        format!("Model:      {}", output::text(view.model.as_deref())),
        format!("Maker:      {}", output::text(view.manufacturer.as_deref())),
        format!("Away:       {}", output::paint_flag(view.away, color)),
        format!("Eco:        {}", output::paint_flag(view.eco, color)),
        format!("Rooms:      {}", view.rooms),
        format!("Devices:    {}", view.devices),
    ]);
    if let Some(at) = view.fetched_at {
        lines.push(format!(
            "Refreshed:  {}",
            at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M:%S")
        ));
    }
    lines.join("\n")
}

pub async fn handle(hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    // Connectivity as of the domain refresh, before the station lookup.
    let bridge = hub.bridge_status();

    // The station record is optional; older firmware does not serve it.
    let station = match hub.station().await {
        Ok(station) => Some(station),
        Err(e) => {
            tracing::debug!(error = %e, "station lookup failed");
            None
        }
    };

    let snapshot = hub.snapshot();
    let system = snapshot.as_ref().and_then(|s| s.system().cloned());
    let controller = hub.hub_device();

    let view = StatusView {
        state: bridge
            .as_ref()
            .map_or(ConnectivityState::OfflineCommunicationError, |b| b.state),
        detail: bridge.and_then(|b| b.detail),
        hostname: station.as_ref().and_then(|s| s.mdns_hostname.clone()),
        mac_address: station.as_ref().and_then(|s| s.mac_address.clone()),
        firmware: system
            .as_ref()
            .and_then(|s| s.active_system_version.clone())
            .or_else(|| {
                controller
                    .as_ref()
                    .and_then(|d| d.active_firmware_version.clone())
            }),
        product: controller.as_ref().and_then(|d| d.product_type.clone()),
        model: controller.as_ref().and_then(|d| d.model_identifier.clone()),
        manufacturer: controller.as_ref().and_then(|d| d.manufacturer.clone()),
        away: system.as_ref().is_some_and(heathub_core::System::is_away),
        eco: system.as_ref().is_some_and(heathub_core::System::is_eco),
        rooms: snapshot.as_ref().map_or(0, |s| s.rooms().len()),
        devices: snapshot.as_ref().map_or(0, |s| s.devices().len()),
        snapshot_version: snapshot.as_ref().map(|s| s.version()),
        fetched_at: snapshot.as_ref().map(|s| s.fetched_at()),
    };

    let color = output::should_color(&global.color);
    let out = output::render_single(
        &global.output,
        &view,
        |v| detail(v, color),
        |v| v.state.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
