// ── Alarm-handling permission ──
//
// Whether a role may act on (acknowledge) an alarm, gated by the unit
// classification of the card owning the reporting device. Three
// distinct fallback conditions deliberately default to *allow*: an
// alarm with no device reference, a device whose card is not cached
// yet, and an unknown unit classification. The backend re-checks on
// the acknowledge call either way.

use crate::model::{AlarmEvent, Role, UnitClass};
use crate::store::CardStore;

/// The one denial message this policy can produce.
pub const FACILITY_DENIAL_REASON: &str =
    "Only Nurse or Caregiver can handle alarms for Facility cards";

/// Whether `role` may handle `event`.
///
/// Facility cards restrict handling to the on-site care team; Home
/// cards are open to every role. Each unresolvable lookup is an
/// explicit allow -- an alarm that cannot be traced to a gated unit
/// cannot be gated.
pub fn can_handle_alarm(event: &AlarmEvent, store: &CardStore, role: Role) -> bool {
    // No device reference: nothing to resolve a unit from -- allow.
    let Some(device_id) = event.device_id.as_deref() else {
        return true;
    };

    // Card not cached yet: optimistic default pending a full card load.
    let Some(card) = store.card_by_device(device_id) else {
        return true;
    };

    match card.unit {
        UnitClass::Facility => matches!(role, Role::Nurse | Role::Caregiver),
        UnitClass::Home => true,
        // Unknown classifications are not gated -- default allow.
        UnitClass::Unknown(_) => true,
    }
}

/// Human-readable denial reason for tooltips.
///
/// `Some` only for the single negative case (Facility card, role
/// outside the care team); every permitted path returns `None`.
pub fn denial_reason(event: &AlarmEvent, store: &CardStore, role: Role) -> Option<&'static str> {
    let device_id = event.device_id.as_deref()?;
    let card = store.card_by_device(device_id)?;

    if card.unit == UnitClass::Facility && !matches!(role, Role::Nurse | Role::Caregiver) {
        return Some(FACILITY_DENIAL_REASON);
    }

    None
}
