// Backend API response types
//
// Wire models for the CareWatch backend's JSON API. Fields use
// `#[serde(default)]` liberally because the backend adds and drops
// optional fields between releases; unknown fields land in `extra`
// and must never fail deserialization.

use serde::{Deserialize, Serialize};

// ── List envelope ────────────────────────────────────────────────────

/// Paginated list envelope used by the card-fetch endpoint:
///
/// ```json
/// { "items": [...], "pagination": { "page": 1, "page_size": 50, "total": 2 } }
/// ```
#[derive(Debug, Deserialize)]
pub struct CardPage {
    #[serde(default)]
    pub items: Vec<RawCard>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub total: u64,
}

// ── Card ─────────────────────────────────────────────────────────────

/// A monitorable unit of space (a bed or a location) as the backend
/// serves it, with its bound devices and current alarm events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCard {
    pub card_id: String,
    /// Type discriminator: `"ActiveBed"` or `"Location"`.
    pub card_type: String,
    /// Unit classification: `"Facility"` or `"Home"`. May be absent.
    #[serde(default)]
    pub unit_type: Option<String>,
    #[serde(default)]
    pub card_name: Option<String>,
    #[serde(default)]
    pub card_address: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub devices: Vec<RawCardDevice>,
    #[serde(default)]
    pub alarms: Vec<RawAlarmEvent>,
    /// Catch-all for undocumented fields (vitals, sleep state, counters).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A device bound to a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCardDevice {
    pub device_id: String,
    #[serde(default)]
    pub device_name: Option<String>,
    /// Numeric device class (1 = sleep pad, 2 = radar, ...).
    #[serde(default)]
    pub device_type: Option<i64>,
    /// `"direct"` (bound to bed) or `"indirect"` (bound to location).
    #[serde(default)]
    pub binding_type: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// ── Alarm event ──────────────────────────────────────────────────────

/// One reported alarm condition on a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAlarmEvent {
    pub event_id: String,
    #[serde(default)]
    pub event_type: Option<String>,
    /// Severity level. The backend emits this as either a small integer
    /// (`1`, `2`, `4`, ...) or a string (`"L1"`, `"EMERG"`, ...); the
    /// untagged union captures both so normalization happens exactly
    /// once, downstream.
    #[serde(default)]
    pub alarm_level: Option<RawAlarmLevel>,
    /// `"active"` or `"acknowledged"`.
    #[serde(default)]
    pub alarm_status: Option<String>,
    /// Trigger timestamp in epoch milliseconds.
    #[serde(default)]
    pub triggered_at: Option<i64>,
    /// Device name (e.g. `"Radar01"`) or `"Cloud"`.
    #[serde(default)]
    pub triggered_by: Option<String>,
    /// The reporting device, when the event is traceable to one.
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Severity level exactly as it appears on the wire.
///
/// Kept as a tagged union at the ingestion boundary only; nothing past
/// the conversion layer branches on the raw representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAlarmLevel {
    Number(i64),
    Text(String),
}

// ── Auth ─────────────────────────────────────────────────────────────

/// Successful login payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResult {
    #[serde(rename = "accessToken")]
    pub access_token: String,
    #[serde(default, rename = "refreshToken")]
    pub refresh_token: Option<String>,
    /// The session role code (`"Nurse"`, `"Admin"`, ...).
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_account: Option<String>,
    #[serde(default)]
    pub tenant_id: Option<String>,
    #[serde(default)]
    pub tenant_name: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn alarm_level_accepts_both_encodings() {
        let numeric: RawAlarmEvent =
            serde_json::from_str(r#"{"event_id":"e1","alarm_level":2}"#).unwrap();
        assert_eq!(numeric.alarm_level, Some(RawAlarmLevel::Number(2)));

        let symbolic: RawAlarmEvent =
            serde_json::from_str(r#"{"event_id":"e2","alarm_level":"L1"}"#).unwrap();
        assert_eq!(symbolic.alarm_level, Some(RawAlarmLevel::Text("L1".into())));
    }

    #[test]
    fn card_tolerates_unknown_fields() {
        let card: RawCard = serde_json::from_str(
            r#"{
                "card_id": "c1",
                "card_type": "ActiveBed",
                "unit_type": "Facility",
                "heart": 72,
                "breath": 16,
                "sleep_stage": 2
            }"#,
        )
        .unwrap();
        assert_eq!(card.card_id, "c1");
        assert!(card.devices.is_empty());
        assert!(card.alarms.is_empty());
        assert_eq!(card.extra.get("heart").and_then(serde_json::Value::as_i64), Some(72));
    }

    #[test]
    fn empty_envelope_deserializes() {
        let page: CardPage = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert!(page.pagination.is_none());
    }
}
