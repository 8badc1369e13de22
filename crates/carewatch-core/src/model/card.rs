// ── Card domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::alarm::{AlarmEvent, AlarmTier};

/// Card type discriminator: what kind of space this card monitors.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardKind {
    /// A bed with an assigned resident.
    ActiveBed,
    /// A shared location (hallway, bathroom, common room).
    Location,
    /// Discriminators this client doesn't know about yet, preserved raw.
    Other(String),
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ActiveBed => write!(f, "ActiveBed"),
            Self::Location => write!(f, "Location"),
            Self::Other(s) => write!(f, "{s}"),
        }
    }
}

/// Unit classification, used solely to gate which roles may act on an
/// alarm. Unknown classifications deliberately hit the default-allow
/// branch of the alarm-handling policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitClass {
    Facility,
    Home,
    Unknown(String),
}

impl std::fmt::Display for UnitClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Facility => write!(f, "Facility"),
            Self::Home => write!(f, "Home"),
            Self::Unknown(s) => write!(f, "{s}"),
        }
    }
}

/// A device bound to a card. A device belongs to exactly one card, which
/// is what makes device-id -> card resolution well-defined.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDevice {
    pub id: String,
    pub name: Option<String>,
    /// Numeric device class (1 = sleep pad, 2 = radar, ...).
    pub device_type: Option<i64>,
    /// `"direct"` (bound to bed) or `"indirect"` (bound to location).
    pub binding_type: Option<String>,
}

/// A monitorable unit of space aggregating devices and alarm events.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub kind: CardKind,
    pub unit: UnitClass,
    pub name: String,
    pub address: String,
    pub devices: Vec<CardDevice>,
    pub alarms: Vec<AlarmEvent>,
    pub updated_at: DateTime<Utc>,
}

impl Card {
    /// Whether any event on this card counts toward audible notification.
    pub fn has_active_alarm(&self) -> bool {
        self.alarms.iter().any(AlarmEvent::is_contributing)
    }

    /// The most urgent tier among this card's contributing events.
    pub fn top_active_tier(&self) -> Option<AlarmTier> {
        self.alarms
            .iter()
            .filter(|e| e.is_contributing())
            .map(|e| e.tier)
            .min()
    }

    /// The identity tuple used by the monitor's alarming-card set.
    pub fn key(&self) -> CardKey {
        CardKey {
            kind: self.kind.clone(),
            id: self.id.clone(),
        }
    }
}

/// `(card type, card id)` identity tuple. Unique within one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardKey {
    pub kind: CardKind,
    pub id: String,
}

impl std::fmt::Display for CardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}
