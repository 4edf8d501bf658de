//! Device command handlers.

use tabled::Tabled;

use heathub_core::{Device, HUB_DEVICE_ID, Hub, HubCommand, Snapshot};

use crate::cli::{DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Type")]
    product: String,
    #[tabled(rename = "Serial")]
    serial: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Signal")]
    signal: String,
    #[tabled(rename = "Battery")]
    battery: String,
    #[tabled(rename = "Locked")]
    locked: String,
    #[tabled(rename = "Firmware")]
    firmware: String,
}

fn row(d: &Device, snapshot: Option<&Snapshot>) -> DeviceRow {
    let room = if d.id == HUB_DEVICE_ID {
        "(hub)".into()
    } else {
        snapshot
            .and_then(|s| s.room_for_device(d.id))
            .map_or_else(|| "-".into(), |r| r.name.clone())
    };
    DeviceRow {
        id: d.id,
        product: output::text(d.product_type.as_deref()),
        serial: output::text(d.serial_number.as_deref()),
        room,
        signal: d
            .signal_strength()
            .map_or_else(|| "-".into(), |s| format!("{s} ({}/4)", s.bars())),
        battery: battery(d),
        locked: match d.device_lock_enabled {
            Some(true) => "yes".into(),
            Some(false) => "no".into(),
            None => "-".into(),
        },
        firmware: output::text(d.active_firmware_version.as_deref()),
    }
}

fn battery(d: &Device) -> String {
    match (d.battery(), d.battery_volts()) {
        (Some(level), Some(volts)) => format!("{}% ({volts:.1} V)", level.percent()),
        (Some(level), None) => format!("{}%", level.percent()),
        (None, Some(volts)) => format!("{volts:.1} V"),
        (None, None) => "-".into(),
    }
}

fn detail(d: &Device, snapshot: Option<&Snapshot>) -> String {
    let r = row(d, snapshot);
    let mut lines = vec![
        format!("ID:        {}", r.id),
        format!("Type:      {}", r.product),
        format!("Model:     {}", output::text(d.model_identifier.as_deref())),
        format!("Serial:    {}", r.serial),
        format!("Room:      {}", r.room),
        format!("Firmware:  {}", r.firmware),
        format!("Hardware:  {}", output::text(d.hardware_version.as_deref())),
        format!("Signal:    {}", r.signal),
        format!("Battery:   {}", r.battery),
        format!("Locked:    {}", r.locked),
    ];
    if let Some(rssi) = d.rssi {
        lines.push(format!("RSSI:      {rssi} dBm"));
    }
    lines.join("\n")
}

/// Find a device by numeric id, falling back to serial number.
fn find(hub: &Hub, identifier: &str) -> Option<Device> {
    let snapshot = hub.snapshot()?;
    identifier
        .parse::<u32>()
        .ok()
        .and_then(|id| snapshot.device(id))
        .or_else(|| snapshot.device_by_serial(identifier))
        .cloned()
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(hub: &Hub, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        DevicesCommand::List => {
            let snapshot = hub.snapshot();
            let devices = snapshot
                .as_ref()
                .map(|s| s.devices().to_vec())
                .unwrap_or_default();
            let out = output::render_list(
                &global.output,
                &devices,
                |d| row(d, snapshot.as_deref()),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { device } => {
            let Some(found) = find(hub, &device) else {
                return Err(CliError::NotFound {
                    resource_type: "device".into(),
                    identifier: device,
                    list_command: "devices list".into(),
                });
            };
            let snapshot = hub.snapshot();
            let out = output::render_single(
                &global.output,
                &found,
                |d| detail(d, snapshot.as_deref()),
                |d| d.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Lock { id, state } => {
            let dispatch = hub
                .dispatch(HubCommand::SetDeviceLock {
                    device_id: id,
                    locked: state.is_on(),
                })
                .await;
            util::ensure_sent(dispatch, "device", &id.to_string(), "devices list")?;
            let verb = if state.is_on() { "locked" } else { "unlocked" };
            util::report(global, &format!("Device {id} {verb}"));
            Ok(())
        }
    }
}
