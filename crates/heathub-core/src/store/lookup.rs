// ── Snapshot lookups ──
//
// Pure queries over one snapshot. Nothing here mutates or does I/O.
// Ids and serials are expected to be unique; when they are not, the
// first match in collection order wins. Dangling references resolve
// to `None`.

use heathub_api::{Device, Room, RoomStat, Schedule, SmartPlug, SmartValve};

use super::Snapshot;

/// Id of the device record describing the hub itself.
pub const HUB_DEVICE_ID: u32 = 0;

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

impl Snapshot {
    // ── By name ──

    /// Room whose name matches `name`, ignoring case.
    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms().iter().find(|r| eq_ignore_case(&r.name, name))
    }

    // ── By id ──

    pub fn room_by_id(&self, id: u32) -> Option<&Room> {
        self.rooms().iter().find(|r| r.id == id)
    }

    pub fn room_stat(&self, id: u32) -> Option<&RoomStat> {
        self.room_stats().iter().find(|r| r.id == id)
    }

    pub fn smart_valve(&self, id: u32) -> Option<&SmartValve> {
        self.smart_valves().iter().find(|v| v.id == id)
    }

    pub fn smart_plug(&self, id: u32) -> Option<&SmartPlug> {
        self.smart_plugs().iter().find(|p| p.id == id)
    }

    pub fn device(&self, id: u32) -> Option<&Device> {
        self.devices().iter().find(|d| d.id == id)
    }

    pub fn schedule(&self, id: u32) -> Option<&Schedule> {
        self.schedules().iter().find(|s| s.id == id)
    }

    /// The hub's own device record.
    pub fn hub_device(&self) -> Option<&Device> {
        self.device(HUB_DEVICE_ID)
    }

    // ── By serial number ──
    //
    // Room stats, valves, and plugs share their id with the device record
    // that carries the serial number.

    pub fn device_by_serial(&self, serial: &str) -> Option<&Device> {
        self.devices().iter().find(|d| {
            d.serial_number
                .as_deref()
                .is_some_and(|s| eq_ignore_case(s, serial))
        })
    }

    pub fn room_stat_by_serial(&self, serial: &str) -> Option<&RoomStat> {
        self.device_by_serial(serial)
            .and_then(|d| self.room_stat(d.id))
    }

    pub fn smart_valve_by_serial(&self, serial: &str) -> Option<&SmartValve> {
        self.device_by_serial(serial)
            .and_then(|d| self.smart_valve(d.id))
    }

    pub fn smart_plug_by_serial(&self, serial: &str) -> Option<&SmartPlug> {
        self.device_by_serial(serial)
            .and_then(|d| self.smart_plug(d.id))
    }

    // ── Containment ──

    /// Room that has `device_id` as its room stat or among its valves.
    pub fn room_for_device(&self, device_id: u32) -> Option<&Room> {
        self.rooms().iter().find(|r| {
            r.room_stat_id == Some(device_id) || r.smart_valve_ids.contains(&device_id)
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use heathub_api::Domain;

    use super::*;

    fn snapshot() -> Snapshot {
        let domain: Domain = serde_json::from_value(json!({
            "Room": [
                { "id": 7, "Name": "Lounge", "RoomStatId": 5, "SmartValveIds": [11, 12], "ScheduleId": 3 },
                { "id": 8, "Name": "Kitchen", "SmartValveIds": [13], "ScheduleId": 99 },
                { "id": 9, "Name": "lounge", "RoomStatId": 6 }
            ],
            "Device": [
                { "id": 0, "ProductType": "Controller", "SerialNumber": "HUB0001" },
                { "id": 5, "ProductType": "RoomStat", "SerialNumber": "AB12" },
                { "id": 11, "ProductType": "iTRV", "SerialNumber": "CD34" },
                { "id": 20, "ProductType": "SmartPlug", "SerialNumber": "EF56" },
                { "id": 21, "ProductType": "iTRV", "SerialNumber": "ORPHAN" }
            ],
            "RoomStat": [ { "id": 5, "MeasuredTemperature": 201 } ],
            "SmartValve": [ { "id": 11 }, { "id": 12 }, { "id": 13 } ],
            "SmartPlug": [ { "id": 20, "Name": "Heater", "ScheduleId": 4 } ],
            "Schedule": [ { "id": 3, "Type": "Heating" }, { "id": 4, "Type": "OnOff" } ]
        }))
        .unwrap();
        Snapshot::new(domain, Utc::now(), 1)
    }

    #[test]
    fn room_by_name_ignores_case() {
        let snap = snapshot();
        assert_eq!(snap.room("Lounge").unwrap().id, 7);
        assert_eq!(snap.room("KITCHEN").unwrap().id, 8);
        assert!(snap.room("Attic").is_none());
    }

    #[test]
    fn duplicate_names_resolve_to_first() {
        let snap = snapshot();
        assert_eq!(snap.room("lounge").unwrap().id, 7);
    }

    #[test]
    fn serial_resolves_through_device_id() {
        let snap = snapshot();
        assert_eq!(snap.room_stat_by_serial("AB12").unwrap().id, 5);
        assert_eq!(snap.room_stat_by_serial("ab12").unwrap().id, 5);
        assert_eq!(snap.smart_valve_by_serial("cd34").unwrap().id, 11);
        assert_eq!(snap.smart_plug_by_serial("EF56").unwrap().id, 20);
    }

    #[test]
    fn serial_of_wrong_kind_is_a_miss() {
        let snap = snapshot();
        assert!(snap.smart_valve_by_serial("AB12").is_none());
        assert!(snap.room_stat_by_serial("ORPHAN").is_none());
        assert!(snap.room_stat_by_serial("nope").is_none());
    }

    #[test]
    fn room_for_device_checks_stat_and_valves() {
        let snap = snapshot();
        assert_eq!(snap.room_for_device(5).unwrap().id, 7);
        assert_eq!(snap.room_for_device(12).unwrap().id, 7);
        assert_eq!(snap.room_for_device(13).unwrap().id, 8);
        assert!(snap.room_for_device(20).is_none());
    }

    #[test]
    fn dangling_schedule_reference_is_a_miss() {
        let snap = snapshot();
        let kitchen = snap.room("Kitchen").unwrap();
        assert!(snap.schedule(kitchen.schedule_id.unwrap()).is_none());
        assert!(snap.schedule(3).is_some());
    }

    #[test]
    fn hub_device_is_id_zero() {
        let snap = snapshot();
        assert_eq!(snap.hub_device().unwrap().serial_number.as_deref(), Some("HUB0001"));
    }

    #[test]
    fn empty_snapshot_misses_everything() {
        let snap = Snapshot::new(Domain::default(), Utc::now(), 1);
        assert!(snap.room("Lounge").is_none());
        assert!(snap.device(0).is_none());
        assert!(snap.smart_plug_by_serial("EF56").is_none());
        assert!(snap.room_for_device(5).is_none());
    }
}
