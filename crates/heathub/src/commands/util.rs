//! Shared helpers for command handlers.

use std::io::Read;
use std::path::Path;

use heathub_core::Dispatch;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Warmest setpoint accepted from the command line, °C.
const MAX_SET_POINT_CELSIUS: f64 = 35.0;

/// Coldest setpoint accepted from the command line, °C.
const MIN_SET_POINT_CELSIUS: f64 = 5.0;

/// Convert °C to the hub's tenths of a degree, rejecting out-of-range input.
pub fn tenths_from_celsius(field: &str, celsius: f64) -> Result<i32, CliError> {
    if !celsius.is_finite() || !(MIN_SET_POINT_CELSIUS..=MAX_SET_POINT_CELSIUS).contains(&celsius) {
        return Err(CliError::Validation {
            field: field.into(),
            reason: format!(
                "{celsius} is outside {MIN_SET_POINT_CELSIUS}..={MAX_SET_POINT_CELSIUS} °C"
            ),
        });
    }
    // Range-checked above, so the rounded value always fits.
    #[allow(clippy::cast_possible_truncation, clippy::as_conversions)]
    let tenths = (celsius * 10.0).round() as i32;
    Ok(tenths)
}

/// Read a schedule document from a file, or stdin for "-".
///
/// The text is checked to be JSON and then forwarded as-is.
pub fn read_schedule(path: &Path) -> Result<String, CliError> {
    let contents = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };

    serde_json::from_str::<serde_json::Value>(&contents).map_err(|e| CliError::Validation {
        field: "schedule".into(),
        reason: format!("invalid JSON: {e}"),
    })?;
    Ok(contents)
}

/// Turn a dispatch result into a CLI result.
///
/// An unresolved target is "not found"; any request the hub did not
/// answer with 200 fails the command.
pub fn ensure_sent(
    dispatch: Dispatch,
    resource_type: &str,
    identifier: &str,
    list_command: &str,
) -> Result<(), CliError> {
    match dispatch {
        Dispatch::Unresolved => Err(CliError::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: list_command.into(),
        }),
        Dispatch::Sent(outcomes) => match outcomes.into_iter().find(|o| !o.is_success()) {
            Some(outcome) => Err(CliError::CommandFailed {
                outcome: outcome.to_string(),
            }),
            None => Ok(()),
        },
    }
}

/// Confirmation line on stderr, unless `--quiet`.
pub fn report(global: &GlobalOpts, message: &str) {
    if !global.quiet {
        eprintln!("{message}");
    }
}
