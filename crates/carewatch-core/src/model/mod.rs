// ── Canonical domain model ──

pub mod alarm;
pub mod card;
pub mod role;

pub use alarm::{AlarmEvent, AlarmStatus, AlarmTier};
pub use card::{Card, CardDevice, CardKey, CardKind, UnitClass};
pub use role::Role;
