// ── Hub request payloads ──
//
// Fixed-shape PATCH bodies. Setpoints are in tenths of a degree Celsius,
// exactly as the hub expects them.

use serde::Serialize;
use serde_json::json;
use strum::Display;

use heathub_api::PatchBody;

/// Setpoint the hub uses to request hot water during a boost.
pub const HOT_WATER_BOOST_SET_POINT: i32 = 1100;

/// Hot-water setpoint applied while away mode is on.
pub const HOT_WATER_AWAY_SET_POINT: i32 = -200;

/// System override type codes.
const OVERRIDE_AWAY: u8 = 2;
const OVERRIDE_NONE: u8 = 0;

/// Scheduling mode of a room, hot-water zone, or plug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum Mode {
    Manual,
    Auto,
}

impl Mode {
    pub fn manual(manual: bool) -> Self {
        if manual { Self::Manual } else { Self::Auto }
    }
}

/// Requested relay state of a smart plug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum PlugOutput {
    On,
    Off,
}

/// What a smart plug does when away mode is switched on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
pub enum AwayAction {
    Off,
    NoChange,
}

// ── Builders ───────────────────────────────────────────────────────

/// `{"Mode": "Manual" | "Auto"}`
pub fn mode(mode: Mode) -> PatchBody {
    PatchBody::Json(json!({ "Mode": mode }))
}

/// Clears any active override, returning the zone to its schedule.
pub fn override_clear() -> PatchBody {
    PatchBody::Json(json!({
        "RequestOverride": {
            "Type": "None",
            "Originator": "App",
            "DurationMinutes": 0,
            "SetPoint": 0
        }
    }))
}

/// Open-ended manual setpoint.
pub fn set_point(set_point: i32) -> PatchBody {
    PatchBody::Json(json!({
        "RequestOverride": { "Type": "Manual", "SetPoint": set_point }
    }))
}

/// Timed manual setpoint.
pub fn boost(set_point: i32, duration_minutes: u32) -> PatchBody {
    PatchBody::Json(json!({
        "RequestOverride": {
            "Type": "Manual",
            "Originator": "App",
            "DurationMinutes": duration_minutes,
            "SetPoint": set_point
        }
    }))
}

/// System-wide away override. `set_point` is in tenths of °C.
pub fn system_away(away: bool, set_point: i32) -> PatchBody {
    away_override(away, set_point)
}

/// Hot-water away override.
pub fn hot_water_away(away: bool) -> PatchBody {
    away_override(away, HOT_WATER_AWAY_SET_POINT)
}

fn away_override(away: bool, set_point: i32) -> PatchBody {
    let (kind, set_point) = if away {
        (OVERRIDE_AWAY, set_point)
    } else {
        (OVERRIDE_NONE, 0)
    };
    PatchBody::Json(json!({ "Type": kind, "setPoint": set_point }))
}

/// `{"EcoModeEnabled": bool}`
pub fn eco_mode(enabled: bool) -> PatchBody {
    PatchBody::Json(json!({ "EcoModeEnabled": enabled }))
}

/// `{"RequestOutput": "On" | "Off"}`
pub fn plug_output(on: bool) -> PatchBody {
    let output = if on { PlugOutput::On } else { PlugOutput::Off };
    PatchBody::Json(json!({ "RequestOutput": output }))
}

/// `{"AwayAction": "Off" | "NoChange"}`
pub fn plug_away_action(turn_off: bool) -> PatchBody {
    let action = if turn_off {
        AwayAction::Off
    } else {
        AwayAction::NoChange
    };
    PatchBody::Json(json!({ "AwayAction": action }))
}
