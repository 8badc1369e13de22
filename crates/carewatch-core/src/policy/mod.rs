// ── Access policy evaluator ──
//
// Two independent yes/no questions answered from static, total
// mappings: "may this role open this page" and "may this role handle
// this alarm". Both sides default to *allow* wherever the answer cannot
// be conclusively determined on the client -- the backend remains the
// final authority, and hiding controls on incomplete client-side state
// degrades the console worse than an optimistic button does.

pub mod alarms;
pub mod pages;

pub use alarms::{FACILITY_DENIAL_REASON, can_handle_alarm, denial_reason};
pub use pages::PagePolicy;
