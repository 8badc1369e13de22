// ── API-to-domain type conversions ──
//
// Bridges raw `carewatch_api` response types into canonical
// `carewatch_core::model` domain types. Each `From` impl normalizes
// field encodings, parses strings into strong types, and fills sensible
// defaults for missing optional data. Severity normalization happens
// here, exactly once; nothing downstream branches on raw encodings.

use chrono::{DateTime, Utc};

use carewatch_api::models::{RawAlarmEvent, RawAlarmLevel, RawCard, RawCardDevice};

use crate::model::{
    alarm::{AlarmEvent, AlarmStatus, AlarmTier},
    card::{Card, CardDevice, CardKind, UnitClass},
};

// ── Helpers ────────────────────────────────────────────────────────

/// Convert an optional epoch-milliseconds timestamp to `DateTime<Utc>`.
fn epoch_millis_to_datetime(epoch_ms: Option<i64>) -> Option<DateTime<Utc>> {
    epoch_ms.and_then(DateTime::from_timestamp_millis)
}

// ── Severity normalization ─────────────────────────────────────────

/// Map a numeric severity code onto the three-tier scale.
///
/// Two numbering schemes arrive on the wire and overlap consistently:
/// the display scale (`1` = L1, `2` = L2, `3`/`4` = warning band) and
/// the syslog-style scale (`0` = EMERG .. `4` = WARNING). Codes 0 and 1
/// both land in the top tier, 2 in the second, 3 and 4 in the warning
/// band. Anything else is unrecognized and must never win a minimum
/// comparison.
fn tier_from_code(code: i64) -> AlarmTier {
    match code {
        0 | 1 => AlarmTier::L1,
        2 => AlarmTier::L2,
        3 | 4 => AlarmTier::Warning,
        _ => AlarmTier::Unranked,
    }
}

/// Normalize a wire-format severity level to its tier.
///
/// Accepts integers, bare digit strings, `L<digits>` display levels, and
/// the uppercase syslog names. Matching is case-insensitive and
/// whitespace-tolerant. Malformed input degrades to `Unranked` -- never
/// an error.
pub fn normalize_level(raw: &RawAlarmLevel) -> AlarmTier {
    match raw {
        RawAlarmLevel::Number(n) => tier_from_code(*n),
        RawAlarmLevel::Text(s) => {
            let s = s.trim().to_ascii_uppercase();
            match s.as_str() {
                "EMERG" | "ALERT" => AlarmTier::L1,
                "CRIT" => AlarmTier::L2,
                "ERR" | "WARNING" => AlarmTier::Warning,
                _ => s
                    .strip_prefix('L')
                    .unwrap_or(&s)
                    .parse::<i64>()
                    .map_or(AlarmTier::Unranked, tier_from_code),
            }
        }
    }
}

fn map_status(raw: Option<&str>) -> AlarmStatus {
    match raw {
        Some("active") => AlarmStatus::Active,
        Some("acknowledged") => AlarmStatus::Acknowledged,
        Some(other) => AlarmStatus::Other(other.to_owned()),
        // Statusless events are treated as already handled: they must
        // not drive the alert sound.
        None => AlarmStatus::Other(String::new()),
    }
}

fn map_card_kind(raw: &str) -> CardKind {
    match raw {
        "ActiveBed" => CardKind::ActiveBed,
        "Location" => CardKind::Location,
        other => CardKind::Other(other.to_owned()),
    }
}

fn map_unit_class(raw: Option<&str>) -> UnitClass {
    match raw {
        Some("Facility") => UnitClass::Facility,
        Some("Home") => UnitClass::Home,
        Some(other) => UnitClass::Unknown(other.to_owned()),
        None => UnitClass::Unknown(String::new()),
    }
}

// ── Alarm event ────────────────────────────────────────────────────

impl From<RawAlarmEvent> for AlarmEvent {
    fn from(e: RawAlarmEvent) -> Self {
        let tier = e
            .alarm_level
            .as_ref()
            .map_or(AlarmTier::Unranked, normalize_level);

        AlarmEvent {
            id: e.event_id,
            event_type: e.event_type.unwrap_or_default(),
            tier,
            status: map_status(e.alarm_status.as_deref()),
            triggered_at: epoch_millis_to_datetime(e.triggered_at),
            triggered_by: e.triggered_by,
            device_id: e.device_id,
        }
    }
}

// ── Card ───────────────────────────────────────────────────────────

impl From<RawCardDevice> for CardDevice {
    fn from(d: RawCardDevice) -> Self {
        CardDevice {
            id: d.device_id,
            name: d.device_name,
            device_type: d.device_type,
            binding_type: d.binding_type,
        }
    }
}

impl From<RawCard> for Card {
    fn from(c: RawCard) -> Self {
        let kind = map_card_kind(&c.card_type);
        let unit = map_unit_class(c.unit_type.as_deref());

        Card {
            id: c.card_id,
            kind,
            unit,
            name: c.card_name.unwrap_or_default(),
            address: c.card_address.unwrap_or_default(),
            devices: c.devices.into_iter().map(CardDevice::from).collect(),
            alarms: c.alarms.into_iter().map(AlarmEvent::from).collect(),
            updated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn num(n: i64) -> RawAlarmLevel {
        RawAlarmLevel::Number(n)
    }

    fn text(s: &str) -> RawAlarmLevel {
        RawAlarmLevel::Text(s.into())
    }

    #[test]
    fn numeric_and_symbolic_encodings_agree() {
        // Every pair encoding the same tier must normalize identically.
        assert_eq!(normalize_level(&num(1)), normalize_level(&text("L1")));
        assert_eq!(normalize_level(&num(0)), normalize_level(&text("EMERG")));
        assert_eq!(normalize_level(&num(2)), normalize_level(&text("L2")));
        assert_eq!(normalize_level(&num(2)), normalize_level(&text("CRIT")));
        assert_eq!(normalize_level(&num(4)), normalize_level(&text("WARNING")));
        assert_eq!(normalize_level(&num(4)), normalize_level(&text("L4")));
        assert_eq!(normalize_level(&num(3)), normalize_level(&text("ERR")));
    }

    #[test]
    fn tier_assignment() {
        assert_eq!(normalize_level(&text("L1")), AlarmTier::L1);
        assert_eq!(normalize_level(&text("ALERT")), AlarmTier::L1);
        assert_eq!(normalize_level(&num(2)), AlarmTier::L2);
        assert_eq!(normalize_level(&text("L3")), AlarmTier::Warning);
        assert_eq!(normalize_level(&text("WARNING")), AlarmTier::Warning);
    }

    #[test]
    fn matching_is_case_and_whitespace_tolerant() {
        assert_eq!(normalize_level(&text(" l1 ")), AlarmTier::L1);
        assert_eq!(normalize_level(&text("warning")), AlarmTier::Warning);
        assert_eq!(normalize_level(&text("  CRIT")), AlarmTier::L2);
    }

    #[test]
    fn unrecognized_encodings_map_to_sentinel() {
        assert_eq!(normalize_level(&num(7)), AlarmTier::Unranked);
        assert_eq!(normalize_level(&num(-1)), AlarmTier::Unranked);
        assert_eq!(normalize_level(&text("L99")), AlarmTier::Unranked);
        assert_eq!(normalize_level(&text("PANIC")), AlarmTier::Unranked);
        assert_eq!(normalize_level(&text("")), AlarmTier::Unranked);
        assert_eq!(AlarmTier::Unranked.ordinal(), 999);
    }

    #[test]
    fn sentinel_never_wins_a_minimum() {
        let tiers = [AlarmTier::Unranked, AlarmTier::Warning, AlarmTier::Unranked];
        assert_eq!(tiers.iter().copied().min(), Some(AlarmTier::Warning));
    }

    #[test]
    fn statusless_event_does_not_contribute() {
        let event = AlarmEvent::from(RawAlarmEvent {
            event_id: "e1".into(),
            event_type: Some("Fall".into()),
            alarm_level: Some(num(1)),
            alarm_status: None,
            triggered_at: None,
            triggered_by: None,
            device_id: None,
            extra: serde_json::Map::new(),
        });
        assert!(!event.is_contributing());
    }

    #[test]
    fn card_conversion_maps_kind_unit_and_alarms() {
        let raw = RawCard {
            card_id: "c1".into(),
            card_type: "ActiveBed".into(),
            unit_type: Some("Facility".into()),
            card_name: Some("Room 101 Bed A".into()),
            card_address: None,
            tenant_id: None,
            devices: vec![RawCardDevice {
                device_id: "d1".into(),
                device_name: Some("Radar01".into()),
                device_type: Some(2),
                binding_type: Some("direct".into()),
                extra: serde_json::Map::new(),
            }],
            alarms: vec![RawAlarmEvent {
                event_id: "e1".into(),
                event_type: Some("Fall".into()),
                alarm_level: Some(text("L1")),
                alarm_status: Some("active".into()),
                triggered_at: Some(1_699_000_000_000),
                triggered_by: Some("Radar01".into()),
                device_id: Some("d1".into()),
                extra: serde_json::Map::new(),
            }],
            extra: serde_json::Map::new(),
        };

        let card = Card::from(raw);
        assert_eq!(card.kind, CardKind::ActiveBed);
        assert_eq!(card.unit, UnitClass::Facility);
        assert_eq!(card.name, "Room 101 Bed A");
        assert_eq!(card.address, "");
        assert!(card.has_active_alarm());
        assert_eq!(card.top_active_tier(), Some(AlarmTier::L1));
        assert!(card.alarms[0].triggered_at.is_some());
    }

    #[test]
    fn unknown_card_kind_and_unit_are_preserved() {
        let raw = RawCard {
            card_id: "c2".into(),
            card_type: "Ward".into(),
            unit_type: Some("Hospice".into()),
            card_name: None,
            card_address: None,
            tenant_id: None,
            devices: Vec::new(),
            alarms: Vec::new(),
            extra: serde_json::Map::new(),
        };

        let card = Card::from(raw);
        assert_eq!(card.kind, CardKind::Other("Ward".into()));
        assert_eq!(card.unit, UnitClass::Unknown("Hospice".into()));
    }
}
