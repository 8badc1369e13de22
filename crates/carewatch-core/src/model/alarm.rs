// ── Alarm domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Normalized severity tier of an alarm.
///
/// The backend emits severity in two equivalent encodings -- a small
/// integer and a symbolic string -- which the conversion layer collapses
/// into this single ordinal scale at the ingestion boundary. Lower
/// ordinal = more urgent; `Unranked` carries the sentinel ordinal and can
/// never win a minimum comparison.
///
/// Derived `Ord` follows declaration order, so `tiers.min()` yields the
/// most urgent tier directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlarmTier {
    /// Tier 0 -- emergencies. Drives the L1 alert sound.
    L1,
    /// Tier 1 -- high-priority alerts. Drives the L2 alert sound.
    L2,
    /// Tier 2 -- warnings. Visually indicated only, never audible.
    Warning,
    /// Unrecognized encoding. Inert for both sound and priority.
    Unranked,
}

impl AlarmTier {
    /// The numeric priority rank (0 = most urgent, 999 = sentinel).
    pub fn ordinal(self) -> u16 {
        match self {
            Self::L1 => 0,
            Self::L2 => 1,
            Self::Warning => 2,
            Self::Unranked => 999,
        }
    }

    /// Only the two most severe tiers produce an alert sound.
    pub fn is_audible(self) -> bool {
        matches!(self, Self::L1 | Self::L2)
    }
}

impl std::fmt::Display for AlarmTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::L1 => write!(f, "L1"),
            Self::L2 => write!(f, "L2"),
            Self::Warning => write!(f, "WARNING"),
            Self::Unranked => write!(f, "-"),
        }
    }
}

/// Lifecycle state of an alarm event.
///
/// Only `Active` events contribute to audible notification; everything
/// else is inert for sound purposes but still visible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmStatus {
    Active,
    Acknowledged,
    /// Statuses this client doesn't know about yet, preserved raw.
    Other(String),
}

impl AlarmStatus {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// One reported alarm condition on a card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlarmEvent {
    pub id: String,
    /// Source event type (e.g. `"Fall"`, `"Radar_AbnormalHeartRate"`).
    pub event_type: String,
    pub tier: AlarmTier,
    pub status: AlarmStatus,
    pub triggered_at: Option<DateTime<Utc>>,
    /// Device name or `"Cloud"`.
    pub triggered_by: Option<String>,
    /// The reporting device, when the event is traceable to one.
    /// Absence means the alarm cannot be gated by unit classification.
    pub device_id: Option<String>,
}

impl AlarmEvent {
    /// Whether this event counts toward audible notification.
    pub fn is_contributing(&self) -> bool {
        self.status.is_active()
    }
}
