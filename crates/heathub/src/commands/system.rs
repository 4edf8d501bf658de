//! Away and eco mode.

use heathub_core::{Hub, HubCommand};

use crate::cli::{GlobalOpts, SystemArgs, SystemCommand};
use crate::error::CliError;

use super::util;

pub async fn handle(hub: &Hub, args: SystemArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (command, message) = match args.command {
        SystemCommand::Away { state } => (
            HubCommand::SetAwayMode {
                away: state.is_on(),
            },
            format!("Away mode {state:?}"),
        ),
        SystemCommand::Eco { state } => (
            HubCommand::SetEcoMode {
                enabled: state.is_on(),
            },
            format!("Eco mode {state:?}"),
        ),
    };

    util::ensure_sent(hub.dispatch(command).await, "system", "-", "status")?;
    util::report(global, &message);
    Ok(())
}
