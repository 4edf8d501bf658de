// Hub response types
//
// Models for the hub's `/domain` and `/station` bodies. The hub omits
// fields freely depending on device kind and firmware, so nearly every
// field is optional and each record keeps unmodelled keys in `extra`.
// Temperatures and setpoints are reported in tenths of a degree Celsius.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Temperature the hub reports for a sensor it has lost contact with.
pub const OFFLINE_TEMPERATURE: i32 = -32768;

/// Convert a tenths-of-a-degree reading to degrees Celsius.
fn tenths(value: i32) -> f64 {
    f64::from(value) / 10.0
}

// ── Domain ───────────────────────────────────────────────────────────

/// The complete `/domain` body: every entity the hub knows about.
///
/// Collections keep the hub's order; lookups rely on that for
/// first-match semantics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Domain {
    #[serde(default, rename = "System")]
    pub system: Option<System>,
    #[serde(default, rename = "HeatingChannel")]
    pub heating_channels: Vec<HeatingChannel>,
    #[serde(default, rename = "Room")]
    pub rooms: Vec<Room>,
    #[serde(default, rename = "Device")]
    pub devices: Vec<Device>,
    #[serde(default, rename = "SmartValve")]
    pub smart_valves: Vec<SmartValve>,
    #[serde(default, rename = "RoomStat")]
    pub room_stats: Vec<RoomStat>,
    #[serde(default, rename = "Schedule")]
    pub schedules: Vec<Schedule>,
    #[serde(default, rename = "HotWater")]
    pub hot_water: Vec<HotWater>,
    #[serde(default, rename = "SmartPlug")]
    pub smart_plugs: Vec<SmartPlug>,
    /// Catch-all for sections we don't model (`Cloud`, `UpgradeInfo`, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── System ───────────────────────────────────────────────────────────

/// Hub-wide settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct System {
    #[serde(default)]
    pub eco_mode_enabled: Option<bool>,
    /// `"Away"` while away mode is active.
    #[serde(default)]
    pub override_type: Option<String>,
    /// Away-mode setpoint limit, tenths of °C.
    #[serde(default)]
    pub away_mode_set_point_limit: Option<i32>,
    #[serde(default)]
    pub system_mode: Option<String>,
    #[serde(default)]
    pub active_system_version: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub cloud_connection_status: Option<String>,
    #[serde(default)]
    pub unix_time: Option<i64>,
    #[serde(default)]
    pub time_zone_offset: Option<i32>,
    #[serde(default)]
    pub automatic_daylight_saving: Option<bool>,
    #[serde(default)]
    pub valve_protection_enabled: Option<bool>,
    #[serde(default)]
    pub heating_button_override_state: Option<String>,
    #[serde(default)]
    pub hot_water_button_override_state: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl System {
    pub fn is_away(&self) -> bool {
        self.override_type.as_deref() == Some("Away")
    }

    pub fn is_eco(&self) -> bool {
        self.eco_mode_enabled.unwrap_or(false)
    }
}

// ── Device ───────────────────────────────────────────────────────────

/// Radio link quality as seen from one end.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Reception {
    #[serde(default)]
    pub rssi: Option<i32>,
    #[serde(default)]
    pub lqi: Option<i32>,
}

/// Hardware record shared by every paired device (and the hub itself, id 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Device {
    #[serde(rename = "id")]
    pub id: u32,
    #[serde(default)]
    pub node_id: Option<u32>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub product_identifier: Option<String>,
    #[serde(default)]
    pub active_firmware_version: Option<String>,
    #[serde(default)]
    pub model_identifier: Option<String>,
    #[serde(default)]
    pub hardware_version: Option<String>,
    #[serde(default)]
    pub serial_number: Option<String>,
    #[serde(default)]
    pub manufacturer: Option<String>,
    #[serde(default)]
    pub device_lock_enabled: Option<bool>,
    #[serde(default)]
    pub displayed_signal_strength: Option<String>,
    /// Tenths of a volt.
    #[serde(default)]
    pub battery_voltage: Option<i32>,
    #[serde(default)]
    pub battery_level: Option<String>,
    #[serde(default)]
    pub rssi: Option<i32>,
    #[serde(default)]
    pub lqi: Option<i32>,
    #[serde(default)]
    pub reception_of_controller: Option<Reception>,
    #[serde(default)]
    pub reception_of_device: Option<Reception>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Device {
    pub fn battery_volts(&self) -> Option<f64> {
        self.battery_voltage.map(tenths)
    }

    /// Signal strength as a typed level, if the hub reported a known value.
    pub fn signal_strength(&self) -> Option<SignalStrength> {
        self.displayed_signal_strength.as_deref()?.parse().ok()
    }

    /// Battery level as a typed level, if the hub reported a known value.
    pub fn battery(&self) -> Option<BatteryLevel> {
        self.battery_level.as_deref()?.parse().ok()
    }
}

/// Signal strength names as displayed by the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
pub enum SignalStrength {
    NoSignal,
    VeryPoor,
    Poor,
    Medium,
    Good,
    VeryGood,
}

impl SignalStrength {
    /// Bar count on a 0–4 scale.
    pub fn bars(self) -> u8 {
        match self {
            Self::NoSignal => 0,
            Self::VeryPoor | Self::Poor => 1,
            Self::Medium => 2,
            Self::Good => 3,
            Self::VeryGood => 4,
        }
    }
}

/// Battery level names as reported by the hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumString, Display)]
pub enum BatteryLevel {
    Full,
    Normal,
    TwoThirds,
    OneThird,
    Low,
}

impl BatteryLevel {
    /// Approximate charge percentage.
    pub fn percent(self) -> u8 {
        match self {
            Self::Full => 100,
            Self::Normal => 80,
            Self::TwoThirds => 66,
            Self::OneThird => 33,
            Self::Low => 10,
        }
    }
}

// ── Room ─────────────────────────────────────────────────────────────

/// A heating zone. References its room stat, valves, and schedule by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Room {
    #[serde(rename = "id")]
    pub id: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub room_stat_id: Option<u32>,
    #[serde(default)]
    pub smart_valve_ids: Vec<u32>,
    #[serde(default)]
    pub schedule_id: Option<u32>,
    /// `"Auto"` or `"Manual"`.
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub manual_set_point: Option<i32>,
    #[serde(default)]
    pub current_set_point: Option<i32>,
    #[serde(default)]
    pub scheduled_set_point: Option<i32>,
    #[serde(default)]
    pub calculated_temperature: Option<i32>,
    #[serde(default)]
    pub override_type: Option<String>,
    #[serde(default)]
    pub override_setpoint: Option<i32>,
    #[serde(default)]
    pub override_timeout_unix_time: Option<i64>,
    #[serde(default)]
    pub setpoint_origin: Option<String>,
    #[serde(default)]
    pub percentage_demand: Option<i32>,
    #[serde(default)]
    pub control_output_state: Option<String>,
    #[serde(default)]
    pub window_detection_active: Option<bool>,
    #[serde(default)]
    pub window_state: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Room {
    pub fn is_manual(&self) -> bool {
        self.mode.as_deref() == Some("Manual")
    }

    /// A boost is a timed manual override.
    pub fn is_boosted(&self) -> bool {
        self.override_type.as_deref() == Some("Manual") && self.override_timeout_unix_time.is_some()
    }

    pub fn current_set_point_celsius(&self) -> Option<f64> {
        self.current_set_point.map(tenths)
    }

    pub fn temperature_celsius(&self) -> Option<f64> {
        self.calculated_temperature
            .filter(|t| *t != OFFLINE_TEMPERATURE)
            .map(tenths)
    }
}

// ── RoomStat ─────────────────────────────────────────────────────────

/// Wall thermostat readings. Shares its id with the backing [`Device`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RoomStat {
    #[serde(rename = "id")]
    pub id: u32,
    #[serde(default)]
    pub set_point: Option<i32>,
    #[serde(default)]
    pub measured_temperature: Option<i32>,
    #[serde(default)]
    pub measured_humidity: Option<i32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl RoomStat {
    /// `None` when the stat is offline or never reported.
    pub fn temperature_celsius(&self) -> Option<f64> {
        self.measured_temperature
            .filter(|t| *t != OFFLINE_TEMPERATURE)
            .map(tenths)
    }

    pub fn set_point_celsius(&self) -> Option<f64> {
        self.set_point.map(tenths)
    }

    /// The hub reports the offline sentinel once the zigbee link drops.
    pub fn zigbee_connected(&self) -> bool {
        self.measured_temperature != Some(OFFLINE_TEMPERATURE)
    }
}

// ── SmartValve ───────────────────────────────────────────────────────

/// Radiator valve (iTRV). Shares its id with the backing [`Device`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SmartValve {
    #[serde(rename = "id")]
    pub id: u32,
    #[serde(default)]
    pub set_point: Option<i32>,
    #[serde(default)]
    pub measured_temperature: Option<i32>,
    #[serde(default)]
    pub percentage_demand: Option<i32>,
    #[serde(default)]
    pub window_state: Option<String>,
    #[serde(default)]
    pub mounting_orientation: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SmartValve {
    pub fn temperature_celsius(&self) -> Option<f64> {
        self.measured_temperature
            .filter(|t| *t != OFFLINE_TEMPERATURE)
            .map(tenths)
    }

    pub fn zigbee_connected(&self) -> bool {
        self.measured_temperature != Some(OFFLINE_TEMPERATURE)
    }
}

// ── SmartPlug ────────────────────────────────────────────────────────

/// Switched mains socket. Shares its id with the backing [`Device`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SmartPlug {
    #[serde(rename = "id")]
    pub id: u32,
    #[serde(default)]
    pub schedule_id: Option<u32>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub manual_state: Option<String>,
    #[serde(default)]
    pub output_state: Option<String>,
    #[serde(default)]
    pub override_state: Option<String>,
    #[serde(default)]
    pub scheduled_state: Option<String>,
    #[serde(default)]
    pub target_state: Option<String>,
    #[serde(default)]
    pub control_source: Option<String>,
    /// `"Off"` or `"NoChange"`.
    #[serde(default)]
    pub away_action: Option<String>,
    #[serde(default)]
    pub debounce_count: Option<i32>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SmartPlug {
    pub fn is_on(&self) -> bool {
        self.output_state.as_deref() == Some("On")
    }

    pub fn is_manual(&self) -> bool {
        self.mode.as_deref() == Some("Manual")
    }

    pub fn turns_off_when_away(&self) -> bool {
        self.away_action.as_deref() == Some("Off")
    }
}

// ── HotWater / HeatingChannel ────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HotWater {
    #[serde(rename = "id")]
    pub id: u32,
    #[serde(default)]
    pub schedule_id: Option<u32>,
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub override_type: Option<String>,
    #[serde(default)]
    pub override_timeout_unix_time: Option<i64>,
    #[serde(default)]
    pub water_heating_state: Option<String>,
    #[serde(default)]
    pub hot_water_relay_state: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl HotWater {
    pub fn is_heating(&self) -> bool {
        self.water_heating_state.as_deref() == Some("On")
    }

    pub fn is_manual(&self) -> bool {
        self.mode.as_deref() == Some("Manual")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct HeatingChannel {
    #[serde(rename = "id")]
    pub id: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub room_ids: Vec<u32>,
    #[serde(default)]
    pub percentage_demand: Option<i32>,
    #[serde(default)]
    pub demand_on_off_output: Option<String>,
    #[serde(default)]
    pub heating_relay_state: Option<String>,
    #[serde(default)]
    pub is_smart_valve_preventing_demand: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Schedule ─────────────────────────────────────────────────────────

/// A schedule. The rule body is opaque to us and kept as raw JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub id: u32,
    #[serde(flatten)]
    pub body: serde_json::Map<String, serde_json::Value>,
}

// ── Station ──────────────────────────────────────────────────────────

/// Hub identity from `/station`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Station {
    #[serde(default)]
    pub mac_address: Option<String>,
    #[serde(default)]
    pub mdns_hostname: Option<String>,
    #[serde(default)]
    pub connection_status: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn domain_decodes_with_missing_sections() {
        let domain: Domain = serde_json::from_value(json!({
            "Room": [{ "id": 7, "Name": "Lounge", "ScheduleId": 3 }],
            "Cloud": { "Environment": "Prod" }
        }))
        .unwrap();

        assert_eq!(domain.rooms.len(), 1);
        assert_eq!(domain.rooms[0].name, "Lounge");
        assert_eq!(domain.rooms[0].schedule_id, Some(3));
        assert!(domain.rooms[0].smart_valve_ids.is_empty());
        assert!(domain.devices.is_empty());
        assert!(domain.system.is_none());
        assert!(domain.extra.contains_key("Cloud"));
    }

    #[test]
    fn offline_room_stat_has_no_temperature() {
        let stat: RoomStat = serde_json::from_value(json!({
            "id": 5,
            "SetPoint": 205,
            "MeasuredTemperature": OFFLINE_TEMPERATURE,
            "MeasuredHumidity": 48
        }))
        .unwrap();

        assert_eq!(stat.temperature_celsius(), None);
        assert!(!stat.zigbee_connected());
        assert_eq!(stat.set_point_celsius(), Some(20.5));
    }

    #[test]
    fn device_levels_parse_from_hub_names() {
        let device: Device = serde_json::from_value(json!({
            "id": 5,
            "SerialNumber": "AB12",
            "DisplayedSignalStrength": "VeryGood",
            "BatteryLevel": "OneThird",
            "BatteryVoltage": 29
        }))
        .unwrap();

        assert_eq!(device.signal_strength(), Some(SignalStrength::VeryGood));
        assert_eq!(device.signal_strength().map(SignalStrength::bars), Some(4));
        assert_eq!(device.battery(), Some(BatteryLevel::OneThird));
        assert_eq!(device.battery_volts(), Some(2.9));
    }

    #[test]
    fn unknown_level_names_are_ignored() {
        let device: Device = serde_json::from_value(json!({
            "id": 1,
            "DisplayedSignalStrength": "Excellent"
        }))
        .unwrap();
        assert_eq!(device.signal_strength(), None);
        assert_eq!(device.battery(), None);
    }

    #[test]
    fn schedule_keeps_opaque_body() {
        let schedule: Schedule = serde_json::from_value(json!({
            "id": 3,
            "Monday": { "SetPoints": [{ "Time": 700, "DegreesC": 200 }] }
        }))
        .unwrap();
        assert_eq!(schedule.id, 3);
        assert!(schedule.body.contains_key("Monday"));
    }

    #[test]
    fn system_away_and_eco_flags() {
        let system: System = serde_json::from_value(json!({
            "OverrideType": "Away",
            "EcoModeEnabled": true
        }))
        .unwrap();
        assert!(system.is_away());
        assert!(system.is_eco());
    }
}
