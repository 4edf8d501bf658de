//! Hot-water command handlers.

use heathub_core::{HotWater, Hub, HubCommand};

use crate::cli::{GlobalOpts, HotWaterArgs, HotWaterCommand};
use crate::error::CliError;
use crate::output;

use super::util;

fn detail(hw: &HotWater, color: bool) -> String {
    let mut lines = vec![
        format!("ID:       {}", hw.id),
        format!("Mode:     {}", output::text(hw.mode.as_deref())),
        format!("Heating:  {}", output::paint_flag(hw.is_heating(), color)),
        format!("Relay:    {}", output::text(hw.hot_water_relay_state.as_deref())),
    ];
    if hw.override_timeout_unix_time.is_some() {
        lines.push(format!(
            "Boost:    until {}",
            output::unix_time(hw.override_timeout_unix_time)
        ));
    }
    lines.join("\n")
}

async fn send(hub: &Hub, command: HubCommand) -> Result<(), CliError> {
    util::ensure_sent(hub.dispatch(command).await, "hot water", "-", "status")
}

pub async fn handle(hub: &Hub, args: HotWaterArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        HotWaterCommand::Show => {
            let Some(hw) = hub.hot_water().into_iter().next() else {
                return Err(CliError::NotFound {
                    resource_type: "hot water zone".into(),
                    identifier: "hot water".into(),
                    list_command: "status".into(),
                });
            };
            let color = output::should_color(&global.color);
            let out = output::render_single(
                &global.output,
                &hw,
                |h| detail(h, color),
                |h| if h.is_heating() { "on".into() } else { "off".into() },
            )?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        HotWaterCommand::Mode { mode } => {
            send(
                hub,
                HubCommand::SetHotWaterManualMode {
                    manual: mode.is_manual(),
                },
            )
            .await?;
            util::report(global, &format!("Hot water switched to {mode:?} mode"));
            Ok(())
        }

        HotWaterCommand::SetPoint { set_point } => {
            send(hub, HubCommand::SetHotWaterSetPoint { set_point }).await?;
            util::report(global, &format!("Hot water setpoint set to {set_point}"));
            Ok(())
        }

        HotWaterCommand::Boost { minutes } => {
            send(
                hub,
                HubCommand::BoostHotWater {
                    duration_minutes: minutes,
                },
            )
            .await?;
            util::report(global, &format!("Hot water boosted for {minutes} min"));
            Ok(())
        }

        HotWaterCommand::CancelBoost => {
            send(hub, HubCommand::CancelHotWaterBoost).await?;
            util::report(global, "Hot water boost cancelled");
            Ok(())
        }
    }
}
