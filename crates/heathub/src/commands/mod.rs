//! Command dispatch: bridges CLI args -> hub commands -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod hot_water;
pub mod plugs;
pub mod rooms;
pub mod status;
pub mod system;
pub mod util;
pub mod watch;

use heathub_core::Hub;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a hub-bound command to the appropriate handler.
///
/// The hub has completed one refresh before this is called.
pub async fn dispatch(cmd: Command, hub: &Hub, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Status => status::handle(hub, global).await,
        Command::Rooms(args) => rooms::handle(hub, args, global).await,
        Command::Devices(args) => devices::handle(hub, args, global).await,
        Command::HotWater(args) => hot_water::handle(hub, args, global).await,
        Command::Plugs(args) => plugs::handle(hub, args, global).await,
        Command::System(args) => system::handle(hub, args, global).await,
        // Watch, Config and Completions are handled before dispatch
        Command::Watch(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
