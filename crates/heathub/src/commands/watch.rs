//! `heathub watch`: run the periodic refresh and print a line per cycle.
//!
//! Unlike the other commands this keeps the hub running until Ctrl-C, so
//! it drives the hub lifecycle itself instead of going through
//! `Hub::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use heathub_core::{BridgeStatus, Hub, HubConfig, ListenerHandle, Snapshot};

use crate::cli::{GlobalOpts, WatchArgs};
use crate::error::CliError;
use crate::output;

fn summary(snapshot: &Snapshot) -> String {
    let rooms: Vec<String> = snapshot
        .rooms()
        .iter()
        .map(|r| format!("{} {}", r.name, output::celsius(r.temperature_celsius())))
        .collect();
    format!(
        "[{}] v{} {}",
        snapshot
            .fetched_at()
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S"),
        snapshot.version(),
        rooms.join(", ")
    )
}

fn connectivity_line(status: &BridgeStatus, color: bool) -> String {
    let state = output::paint_state(status.state, color);
    match status.detail {
        Some(ref detail) => format!("hub {state}: {detail}"),
        None => format!("hub {state}"),
    }
}

pub async fn handle(
    mut config: HubConfig,
    args: WatchArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if let Some(secs) = args.interval {
        config.refresh_interval = Duration::from_secs(secs);
    }
    if config.refresh_interval.is_zero() {
        return Err(CliError::Validation {
            field: "interval".into(),
            reason: "must be at least one second".into(),
        });
    }

    let hub = Hub::new(config)?;
    let color = output::should_color(&global.color);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener: ListenerHandle = Arc::new(move || {
        let _ = tx.send(());
    });
    hub.register(&listener);
    let mut connectivity = hub.connectivity();

    hub.start().await;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            Some(()) = rx.recv() => {
                if let Some(snapshot) = hub.snapshot() {
                    output::print_output(&summary(&snapshot), global.quiet);
                }
            }
            Ok(()) = connectivity.changed() => {
                let status = connectivity.borrow_and_update().clone();
                if let Some(status) = status {
                    // Offline transitions matter even under --quiet.
                    if status.state.is_online() {
                        output::print_output(&connectivity_line(&status, color), global.quiet);
                    } else {
                        eprintln!("{}", connectivity_line(&status, color));
                    }
                }
            }
        }
    }

    hub.unregister(&listener);
    hub.stop().await;
    Ok(())
}
