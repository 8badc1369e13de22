// ── Session roles ──

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Actor classification, fixed for the lifetime of a session.
///
/// String forms match the backend's role codes exactly. A role change
/// mid-session requires tearing the session down and reconnecting --
/// nothing in this crate re-reads the role after `connect()`.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    EnumIter,
    Serialize,
    Deserialize,
)]
pub enum Role {
    /// System administrator (cross-tenant, business data read-only).
    SystemAdmin,
    /// Platform operations: tenants, device store, alarm cloud.
    SystemOperator,
    /// Full resource management within a tenant.
    Admin,
    /// Executive director / director of nursing.
    Manager,
    /// IT support: devices, layouts, user accounts.
    #[strum(serialize = "IT")]
    #[serde(rename = "IT")]
    It,
    Nurse,
    Caregiver,
    Resident,
    Family,
}

impl Role {
    /// Platform-operations roles have no monitoring surface: no card
    /// dashboard, no audible alerts. The notification monitor refuses
    /// to start for them.
    pub fn is_platform_operations(self) -> bool {
        matches!(self, Self::SystemAdmin | Self::SystemOperator)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn role_codes_round_trip() {
        assert_eq!(Role::from_str("Nurse").unwrap(), Role::Nurse);
        assert_eq!(Role::from_str("IT").unwrap(), Role::It);
        assert_eq!(Role::It.to_string(), "IT");
        assert_eq!(Role::SystemOperator.to_string(), "SystemOperator");
        assert!(Role::from_str("Janitor").is_err());
    }

    #[test]
    fn platform_roles_are_excluded_from_monitoring() {
        assert!(Role::SystemAdmin.is_platform_operations());
        assert!(Role::SystemOperator.is_platform_operations());
        assert!(!Role::Nurse.is_platform_operations());
        assert!(!Role::Family.is_platform_operations());
    }
}
