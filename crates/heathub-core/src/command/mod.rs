// ── Hub write commands ──
//
// Each command resolves its target against the current snapshot and
// expands into one or two PATCH requests, sent in order. A command whose
// target cannot be resolved plans nothing and sends nothing.

pub mod requests;

use std::time::Duration;

use heathub_api::{PatchBody, endpoints};

use crate::store::Snapshot;
use requests::Mode;

/// One PATCH request of a planned command.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub path: String,
    pub body: PatchBody,
}

impl Patch {
    fn new(path: impl Into<String>, body: PatchBody) -> Self {
        Self {
            path: path.into(),
            body,
        }
    }
}

/// When to re-read the hub after a command has been sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettlePolicy {
    /// Refresh as soon as the writes finish.
    Immediate,
    /// Refresh once the hub has had time to apply the change.
    Delayed(Duration),
}

/// Every mutating operation the hub supports.
///
/// Rooms are addressed by name, plugs and devices by id. Setpoints are in
/// tenths of a degree Celsius, except the away setpoint which comes from
/// configuration in whole degrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubCommand {
    // ── Rooms ────────────────────────────────────────────────────────
    SetRoomSetPoint {
        room: String,
        set_point: i32,
    },
    SetRoomManualMode {
        room: String,
        manual: bool,
    },
    SetRoomWindowDetection {
        room: String,
        enabled: bool,
    },
    BoostRoom {
        room: String,
        set_point: i32,
        duration_minutes: u32,
    },
    CancelRoomBoost {
        room: String,
    },
    SetRoomSchedule {
        room: String,
        schedule: String,
    },

    // ── Hot water ────────────────────────────────────────────────────
    SetHotWaterManualMode {
        manual: bool,
    },
    SetHotWaterSetPoint {
        set_point: i32,
    },
    BoostHotWater {
        duration_minutes: u32,
    },
    CancelHotWaterBoost,

    // ── System ───────────────────────────────────────────────────────
    SetAwayMode {
        away: bool,
    },
    SetEcoMode {
        enabled: bool,
    },
    SetDeviceLock {
        device_id: u32,
        locked: bool,
    },

    // ── Smart plugs ──────────────────────────────────────────────────
    SetSmartPlugSchedule {
        plug_id: u32,
        schedule: String,
    },
    SetSmartPlugManualMode {
        plug_id: u32,
        manual: bool,
    },
    SetSmartPlugOutput {
        plug_id: u32,
        on: bool,
    },
    SetSmartPlugAwayAction {
        plug_id: u32,
        turn_off: bool,
    },
}

impl HubCommand {
    /// Requests to send, in order, or `None` if the target is unknown.
    ///
    /// `away_set_point` is the configured away setpoint in whole °C.
    pub fn plan(&self, snapshot: Option<&Snapshot>, away_set_point: i32) -> Option<Vec<Patch>> {
        let patches = match self {
            Self::SetRoomSetPoint { room, set_point } => {
                let id = room_id(snapshot, room)?;
                vec![Patch::new(endpoints::room(id), requests::set_point(*set_point))]
            }
            Self::SetRoomManualMode { room, manual } => {
                let id = room_id(snapshot, room)?;
                vec![
                    Patch::new(endpoints::room(id), requests::mode(Mode::manual(*manual))),
                    Patch::new(endpoints::room(id), requests::override_clear()),
                ]
            }
            Self::SetRoomWindowDetection { room, enabled } => {
                let id = room_id(snapshot, room)?;
                vec![Patch::new(
                    endpoints::room_window_detection(id),
                    PatchBody::flag(*enabled),
                )]
            }
            Self::BoostRoom {
                room,
                set_point,
                duration_minutes,
            } => {
                let id = room_id(snapshot, room)?;
                vec![Patch::new(
                    endpoints::room(id),
                    requests::boost(*set_point, *duration_minutes),
                )]
            }
            Self::CancelRoomBoost { room } => {
                let id = room_id(snapshot, room)?;
                vec![Patch::new(endpoints::room(id), requests::override_clear())]
            }
            Self::SetRoomSchedule { room, schedule } => {
                let schedule_id = snapshot?.room(room)?.schedule_id?;
                vec![Patch::new(
                    endpoints::schedule(schedule_id),
                    PatchBody::Raw(schedule.clone()),
                )]
            }

            Self::SetHotWaterManualMode { manual } => vec![
                Patch::new(endpoints::hot_water(), requests::mode(Mode::manual(*manual))),
                Patch::new(endpoints::hot_water(), requests::override_clear()),
            ],
            Self::SetHotWaterSetPoint { set_point } => vec![Patch::new(
                endpoints::hot_water(),
                requests::set_point(*set_point),
            )],
            Self::BoostHotWater { duration_minutes } => vec![Patch::new(
                endpoints::hot_water(),
                requests::boost(requests::HOT_WATER_BOOST_SET_POINT, *duration_minutes),
            )],
            Self::CancelHotWaterBoost => vec![Patch::new(
                endpoints::hot_water(),
                requests::override_clear(),
            )],

            Self::SetAwayMode { away } => vec![
                Patch::new(
                    endpoints::SYSTEM_OVERRIDE,
                    requests::system_away(*away, away_set_point.saturating_mul(10)),
                ),
                Patch::new(endpoints::hot_water_override(), requests::hot_water_away(*away)),
            ],
            Self::SetEcoMode { enabled } => vec![Patch::new(
                endpoints::SYSTEM,
                requests::eco_mode(*enabled),
            )],
            Self::SetDeviceLock { device_id, locked } => {
                let id = snapshot?.device(*device_id)?.id;
                vec![Patch::new(endpoints::device_lock(id), PatchBody::flag(*locked))]
            }

            Self::SetSmartPlugSchedule { plug_id, schedule } => {
                let schedule_id = snapshot?.smart_plug(*plug_id)?.schedule_id?;
                vec![Patch::new(
                    endpoints::schedule(schedule_id),
                    PatchBody::Raw(schedule.clone()),
                )]
            }
            Self::SetSmartPlugManualMode { plug_id, manual } => {
                let id = plug_id_of(snapshot, *plug_id)?;
                vec![Patch::new(
                    endpoints::smart_plug(id),
                    requests::mode(Mode::manual(*manual)),
                )]
            }
            Self::SetSmartPlugOutput { plug_id, on } => {
                let id = plug_id_of(snapshot, *plug_id)?;
                vec![Patch::new(endpoints::smart_plug(id), requests::plug_output(*on))]
            }
            Self::SetSmartPlugAwayAction { plug_id, turn_off } => {
                let id = plug_id_of(snapshot, *plug_id)?;
                vec![Patch::new(
                    endpoints::smart_plug(id),
                    requests::plug_away_action(*turn_off),
                )]
            }
        };
        Some(patches)
    }

    /// Plug relay changes need time to take effect; everything else is
    /// visible on the next read.
    pub fn settle_policy(&self, plug_settle_delay: Duration) -> SettlePolicy {
        match self {
            Self::SetSmartPlugOutput { .. } => SettlePolicy::Delayed(plug_settle_delay),
            _ => SettlePolicy::Immediate,
        }
    }
}

fn room_id(snapshot: Option<&Snapshot>, name: &str) -> Option<u32> {
    snapshot?.room(name).map(|r| r.id)
}

fn plug_id_of(snapshot: Option<&Snapshot>, id: u32) -> Option<u32> {
    snapshot?.smart_plug(id).map(|p| p.id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use heathub_api::Domain;

    use super::*;

    fn snapshot() -> Snapshot {
        let domain: Domain = serde_json::from_value(json!({
            "Room": [
                { "id": 7, "Name": "Lounge", "RoomStatId": 5, "ScheduleId": 3 },
                { "id": 8, "Name": "Hall" }
            ],
            "Device": [ { "id": 5, "SerialNumber": "AB12" } ],
            "SmartPlug": [ { "id": 20, "ScheduleId": 4 }, { "id": 21 } ]
        }))
        .unwrap();
        Snapshot::new(domain, Utc::now(), 1)
    }

    #[test]
    fn manual_mode_sends_mode_then_override_clear() {
        let snap = snapshot();
        let plan = HubCommand::SetRoomManualMode {
            room: "lounge".into(),
            manual: true,
        }
        .plan(Some(&snap), 10)
        .unwrap();

        assert_eq!(
            plan,
            vec![
                Patch::new("rooms/7", PatchBody::Json(json!({"Mode":"Manual"}))),
                Patch::new("rooms/7", requests::override_clear()),
            ]
        );
    }

    #[test]
    fn unknown_room_plans_nothing() {
        let snap = snapshot();
        let cmd = HubCommand::SetRoomSetPoint {
            room: "Attic".into(),
            set_point: 210,
        };
        assert!(cmd.plan(Some(&snap), 10).is_none());
        assert!(cmd.plan(None, 10).is_none());
    }

    #[test]
    fn room_without_schedule_plans_nothing() {
        let snap = snapshot();
        let cmd = HubCommand::SetRoomSchedule {
            room: "Hall".into(),
            schedule: "{}".into(),
        };
        assert!(cmd.plan(Some(&snap), 10).is_none());
    }

    #[test]
    fn room_schedule_targets_schedule_id_verbatim() {
        let snap = snapshot();
        let body = r#"{"Monday":{"SetPoints":[]}}"#;
        let plan = HubCommand::SetRoomSchedule {
            room: "Lounge".into(),
            schedule: body.into(),
        }
        .plan(Some(&snap), 10)
        .unwrap();
        assert_eq!(plan, vec![Patch::new("schedules/3", PatchBody::Raw(body.into()))]);
    }

    #[test]
    fn away_mode_scales_configured_set_point() {
        let plan = HubCommand::SetAwayMode { away: true }.plan(None, 16).unwrap();
        assert_eq!(
            plan,
            vec![
                Patch::new("system/RequestOverride", PatchBody::Json(json!({"Type":2,"setPoint":160}))),
                Patch::new("hotwater/2/RequestOverride", PatchBody::Json(json!({"Type":2,"setPoint":-200}))),
            ]
        );
    }

    #[test]
    fn hot_water_commands_need_no_snapshot() {
        let plan = HubCommand::BoostHotWater { duration_minutes: 60 }
            .plan(None, 10)
            .unwrap();
        assert_eq!(plan, vec![Patch::new("hotwater/2", requests::boost(1100, 60))]);
    }

    #[test]
    fn device_lock_requires_known_device() {
        let snap = snapshot();
        let known = HubCommand::SetDeviceLock {
            device_id: 5,
            locked: true,
        };
        let unknown = HubCommand::SetDeviceLock {
            device_id: 6,
            locked: true,
        };
        assert_eq!(
            known.plan(Some(&snap), 10).unwrap(),
            vec![Patch::new("devices/5/DeviceLockEnabled", PatchBody::flag(true))]
        );
        assert!(unknown.plan(Some(&snap), 10).is_none());
    }

    #[test]
    fn plug_schedule_follows_plug_schedule_id() {
        let snap = snapshot();
        let with = HubCommand::SetSmartPlugSchedule {
            plug_id: 20,
            schedule: "{}".into(),
        };
        let without = HubCommand::SetSmartPlugSchedule {
            plug_id: 21,
            schedule: "{}".into(),
        };
        assert_eq!(with.plan(Some(&snap), 10).unwrap()[0].path, "schedules/4");
        assert!(without.plan(Some(&snap), 10).is_none());
    }

    #[test]
    fn only_plug_output_is_delayed() {
        let delay = Duration::from_secs(5);
        assert_eq!(
            HubCommand::SetSmartPlugOutput { plug_id: 20, on: true }.settle_policy(delay),
            SettlePolicy::Delayed(delay)
        );
        assert_eq!(
            HubCommand::SetSmartPlugManualMode {
                plug_id: 20,
                manual: true
            }
            .settle_policy(delay),
            SettlePolicy::Immediate
        );
        assert_eq!(HubCommand::SetEcoMode { enabled: true }.settle_policy(delay), SettlePolicy::Immediate);
    }
}
