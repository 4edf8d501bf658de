//! Smart plug command handlers.

use tabled::Tabled;

use heathub_core::{Hub, HubCommand, SmartPlug};

use crate::cli::{AwayActionArg, GlobalOpts, PlugsArgs, PlugsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PlugRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Output")]
    output: String,
    #[tabled(rename = "Scheduled")]
    scheduled: String,
    #[tabled(rename = "Away")]
    away: String,
}

impl From<&SmartPlug> for PlugRow {
    fn from(p: &SmartPlug) -> Self {
        Self {
            id: p.id,
            name: output::text(p.name.as_deref()),
            mode: output::text(p.mode.as_deref()),
            output: output::text(p.output_state.as_deref()),
            scheduled: output::text(p.scheduled_state.as_deref()),
            away: output::text(p.away_action.as_deref()),
        }
    }
}

fn detail(p: &SmartPlug, color: bool) -> String {
    [
        format!("ID:        {}", p.id),
        format!("Name:      {}", output::text(p.name.as_deref())),
        format!("Mode:      {}", output::text(p.mode.as_deref())),
        format!("Output:    {}", output::paint_flag(p.is_on(), color)),
        format!("Manual:    {}", output::text(p.manual_state.as_deref())),
        format!("Scheduled: {}", output::text(p.scheduled_state.as_deref())),
        format!("Away:      {}", output::text(p.away_action.as_deref())),
        format!(
            "Schedule:  {}",
            p.schedule_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
    ]
    .join("\n")
}

/// Find a plug by numeric id, falling back to the backing device's serial.
fn find(hub: &Hub, identifier: &str) -> Option<SmartPlug> {
    identifier
        .parse::<u32>()
        .ok()
        .and_then(|id| hub.smart_plug(id))
        .or_else(|| hub.smart_plug_by_serial(identifier))
}

async fn send(hub: &Hub, id: u32, command: HubCommand) -> Result<(), CliError> {
    util::ensure_sent(
        hub.dispatch(command).await,
        "smart plug",
        &id.to_string(),
        "plugs list",
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(hub: &Hub, args: PlugsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        PlugsCommand::List => {
            let plugs = hub.smart_plugs();
            let out = output::render_list(
                &global.output,
                &plugs,
                |p| PlugRow::from(p),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PlugsCommand::Get { plug } => {
            let Some(found) = find(hub, &plug) else {
                return Err(CliError::NotFound {
                    resource_type: "smart plug".into(),
                    identifier: plug,
                    list_command: "plugs list".into(),
                });
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &found,
                |p| detail(p, color),
                |p| p.id.to_string(),
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PlugsCommand::Output { id, state } => {
            send(
                hub,
                id,
                HubCommand::SetSmartPlugOutput {
                    plug_id: id,
                    on: state.is_on(),
                },
            )
            .await?;
            util::report(global, &format!("Plug {id} switched {state:?}"));
            Ok(())
        }

        PlugsCommand::Mode { id, mode } => {
            send(
                hub,
                id,
                HubCommand::SetSmartPlugManualMode {
                    plug_id: id,
                    manual: mode.is_manual(),
                },
            )
            .await?;
            util::report(global, &format!("Plug {id} switched to {mode:?} mode"));
            Ok(())
        }

        PlugsCommand::AwayAction { id, action } => {
            send(
                hub,
                id,
                HubCommand::SetSmartPlugAwayAction {
                    plug_id: id,
                    turn_off: action == AwayActionArg::Off,
                },
            )
            .await?;
            util::report(global, &format!("Plug {id} away action set to {action:?}"));
            Ok(())
        }

        PlugsCommand::Schedule { id, file } => {
            let schedule = util::read_schedule(&file)?;
            send(
                hub,
                id,
                HubCommand::SetSmartPlugSchedule {
                    plug_id: id,
                    schedule,
                },
            )
            .await?;
            util::report(global, &format!("Schedule updated for plug {id}"));
            Ok(())
        }
    }
}
