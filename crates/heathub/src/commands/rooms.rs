//! Room command handlers.

use tabled::Tabled;

use heathub_core::{Hub, HubCommand, Room, Snapshot};

use crate::cli::{GlobalOpts, RoomsArgs, RoomsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Temp")]
    temperature: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Demand")]
    demand: String,
    #[tabled(rename = "Window")]
    window: String,
    #[tabled(rename = "Boost")]
    boost: String,
}

impl From<&Room> for RoomRow {
    fn from(r: &Room) -> Self {
        Self {
            id: r.id,
            name: r.name.clone(),
            mode: output::text(r.mode.as_deref()),
            temperature: output::celsius(r.temperature_celsius()),
            target: output::celsius(r.current_set_point_celsius()),
            demand: output::percent(r.percentage_demand),
            window: output::text(r.window_state.as_deref()),
            boost: if r.is_boosted() {
                output::unix_time(r.override_timeout_unix_time)
            } else {
                "-".into()
            },
        }
    }
}

fn detail(r: &Room, snapshot: Option<&Snapshot>) -> String {
    let mut lines = vec![
        format!("ID:         {}", r.id),
        format!("Name:       {}", r.name),
        format!("Mode:       {}", output::text(r.mode.as_deref())),
        format!("Temp:       {}", output::celsius(r.temperature_celsius())),
        format!(
            "Target:     {}",
            output::celsius(r.current_set_point_celsius())
        ),
        format!("Demand:     {}", output::percent(r.percentage_demand)),
        format!(
            "Window:     {} (detection {})",
            output::text(r.window_state.as_deref()),
            if r.window_detection_active.unwrap_or(false) {
                "on"
            } else {
                "off"
            }
        ),
    ];
    if r.is_boosted() {
        lines.push(format!(
            "Boost:      until {}",
            output::unix_time(r.override_timeout_unix_time)
        ));
    }

    let Some(snapshot) = snapshot else {
        return lines.join("\n");
    };
    if let Some(stat) = r.room_stat_id.and_then(|id| snapshot.room_stat(id)) {
        lines.push(format!(
            "Room stat:  {} ({})",
            stat.id,
            output::celsius(stat.temperature_celsius())
        ));
        if let Some(humidity) = stat.measured_humidity {
            lines.push(format!("Humidity:   {humidity}%"));
        }
    }
    for valve in r
        .smart_valve_ids
        .iter()
        .filter_map(|id| snapshot.smart_valve(*id))
    {
        lines.push(format!(
            "Valve:      {} ({}, {})",
            valve.id,
            output::celsius(valve.temperature_celsius()),
            output::percent(valve.percentage_demand)
        ));
    }
    if let Some(schedule_id) = r.schedule_id {
        lines.push(format!("Schedule:   {schedule_id}"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

async fn send(hub: &Hub, name: &str, command: HubCommand) -> Result<(), CliError> {
    util::ensure_sent(hub.dispatch(command).await, "room", name, "rooms list")
}

pub async fn handle(hub: &Hub, args: RoomsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RoomsCommand::List => {
            let rooms = hub.rooms();
            let out = output::render_list(
                &global.output,
                &rooms,
                |r| RoomRow::from(r),
                |r| r.name.clone(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Get { name } => {
            let Some(room) = hub.room(&name) else {
                return Err(CliError::NotFound {
                    resource_type: "room".into(),
                    identifier: name,
                    list_command: "rooms list".into(),
                });
            };
            let snapshot = hub.snapshot();
            let out = output::render_single(
                &global.output,
                &room,
                |r| detail(r, snapshot.as_deref()),
                |r| r.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::SetPoint { name, celsius } => {
            let set_point = util::tenths_from_celsius("celsius", celsius)?;
            send(
                hub,
                &name,
                HubCommand::SetRoomSetPoint {
                    room: name.clone(),
                    set_point,
                },
            )
            .await?;
            util::report(global, &format!("{name} set to {celsius:.1}°C"));
            Ok(())
        }

        RoomsCommand::Mode { name, mode } => {
            send(
                hub,
                &name,
                HubCommand::SetRoomManualMode {
                    room: name.clone(),
                    manual: mode.is_manual(),
                },
            )
            .await?;
            util::report(global, &format!("{name} switched to {mode:?} mode"));
            Ok(())
        }

        RoomsCommand::Window { name, state } => {
            send(
                hub,
                &name,
                HubCommand::SetRoomWindowDetection {
                    room: name.clone(),
                    enabled: state.is_on(),
                },
            )
            .await?;
            util::report(global, &format!("Window detection {state:?} for {name}"));
            Ok(())
        }

        RoomsCommand::Boost {
            name,
            celsius,
            minutes,
        } => {
            let set_point = util::tenths_from_celsius("celsius", celsius)?;
            send(
                hub,
                &name,
                HubCommand::BoostRoom {
                    room: name.clone(),
                    set_point,
                    duration_minutes: minutes,
                },
            )
            .await?;
            util::report(
                global,
                &format!("{name} boosted to {celsius:.1}°C for {minutes} min"),
            );
            Ok(())
        }

        RoomsCommand::CancelBoost { name } => {
            send(hub, &name, HubCommand::CancelRoomBoost { room: name.clone() }).await?;
            util::report(global, &format!("Boost cancelled for {name}"));
            Ok(())
        }

        RoomsCommand::Schedule { name, file } => {
            let schedule = util::read_schedule(&file)?;
            send(
                hub,
                &name,
                HubCommand::SetRoomSchedule {
                    room: name.clone(),
                    schedule,
                },
            )
            .await?;
            util::report(global, &format!("Schedule updated for {name}"));
            Ok(())
        }
    }
}
