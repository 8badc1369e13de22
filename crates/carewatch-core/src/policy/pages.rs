// ── Page-route access policy ──
//
// Static role -> page mapping. Routes may contain `:param` segments;
// lookup is exact match first, then pattern match, then the documented
// fail-open default.

use indexmap::IndexMap;

use crate::model::Role;

// Named role sets keep the table rows readable. The full role list is
// the closed set -- every role the backend can issue.
const ALL: &[Role] = &[
    Role::SystemAdmin,
    Role::SystemOperator,
    Role::Admin,
    Role::Manager,
    Role::It,
    Role::Nurse,
    Role::Caregiver,
    Role::Resident,
    Role::Family,
];

/// Everyone with a monitoring surface (all roles except platform ops).
const MONITORING: &[Role] = &[
    Role::SystemAdmin,
    Role::Admin,
    Role::Manager,
    Role::It,
    Role::Nurse,
    Role::Caregiver,
    Role::Resident,
    Role::Family,
];

/// Tenant-scoped viewers of per-card detail pages and reports.
const CARD_VIEWERS: &[Role] = &[
    Role::Admin,
    Role::Manager,
    Role::It,
    Role::Nurse,
    Role::Caregiver,
    Role::Resident,
    Role::Family,
];

const STAFF_ALARM_READERS: &[Role] = &[
    Role::SystemAdmin,
    Role::Admin,
    Role::Manager,
    Role::It,
    Role::Nurse,
    Role::Caregiver,
];

const MANAGEMENT: &[Role] = &[Role::Admin, Role::Manager, Role::It];

const TENANT_ADMINS: &[Role] = &[Role::SystemAdmin, Role::Admin, Role::Manager, Role::It];

const PLATFORM: &[Role] = &[Role::SystemAdmin, Role::SystemOperator];

const CARE_STAFF: &[Role] = &[Role::Admin, Role::Manager, Role::Nurse, Role::Caregiver];

const DEVICE_SETTERS: &[Role] = &[Role::Admin, Role::Manager, Role::It, Role::Nurse];

const SYSADMIN_ONLY: &[Role] = &[Role::SystemAdmin];

/// Care staff plus the resident themselves (self-service pages).
const CARE_STAFF_AND_RESIDENT: &[Role] = &[
    Role::Admin,
    Role::Manager,
    Role::Nurse,
    Role::Caregiver,
    Role::Resident,
];

const RESIDENT_PROFILE_VIEWERS: &[Role] = &[
    Role::Admin,
    Role::Manager,
    Role::It,
    Role::Nurse,
    Role::Caregiver,
];

const TAG_MANAGERS: &[Role] = &[
    Role::SystemAdmin,
    Role::Admin,
    Role::Manager,
    Role::It,
    Role::Nurse,
    Role::Caregiver,
];

/// Static mapping from route path to the set of roles permitted.
///
/// The table is total over the application's route set; a path with no
/// entry is open to every authenticated role. That fail-open default is
/// deliberate and must stay -- see [`PagePolicy::can_access`].
pub struct PagePolicy {
    table: IndexMap<&'static str, &'static [Role]>,
}

impl PagePolicy {
    pub fn new() -> Self {
        let table: IndexMap<&'static str, &'static [Role]> = IndexMap::from([
            // ── Core monitoring ──────────────────────────────────────
            ("/monitoring/overview", MONITORING),
            ("/monitoring/detail/:cardId", CARD_VIEWERS),
            ("/monitoring/vital-focus/:cardId", CARD_VIEWERS),
            ("/monitoring/wellness-monitor/:cardId", CARD_VIEWERS),
            // Resident and Family read alarms from card detail pages,
            // not from the tenant-wide records view.
            ("/alarm/records", STAFF_ALARM_READERS),
            ("/alarm/cloud", ALL),
            // ── Data management ──────────────────────────────────────
            ("/residents", CARE_STAFF_AND_RESIDENT),
            ("/residents/create", CARE_STAFF),
            ("/resident/:id/profile", RESIDENT_PROFILE_VIEWERS),
            ("/resident/:id/phi", CARE_STAFF),
            ("/resident/:id/contacts", CARE_STAFF_AND_RESIDENT),
            ("/care-coordination/card-overview", DEVICE_SETTERS),
            // ── System settings ──────────────────────────────────────
            ("/devices", MANAGEMENT),
            ("/units", MANAGEMENT),
            ("/unitview", MANAGEMENT),
            ("/admin/devicestore", PLATFORM),
            ("/admin/tenants", PLATFORM),
            ("/admin/users", TENANT_ADMINS),
            ("/admin/users/:id", TENANT_ADMINS),
            ("/admin/roles", TENANT_ADMINS),
            ("/admin/permissions", SYSADMIN_ONLY),
            ("/admin/role-permissions", SYSADMIN_ONLY),
            ("/admin/tags", TAG_MANAGERS),
            // ── Device settings & reports ────────────────────────────
            ("/settings/monitor/sleepace/:deviceId", DEVICE_SETTERS),
            ("/settings/monitor/radar/:deviceId", DEVICE_SETTERS),
            ("/report/sleepace/:deviceId", CARD_VIEWERS),
            ("/report/sleepace/:deviceId/detail/:date", CARD_VIEWERS),
        ]);

        Self { table }
    }

    /// Whether `role` may open the page at `path`.
    ///
    /// Lookup order: exact entry, then `:param` pattern entries. Paths
    /// with no entry at all are accessible to every authenticated role.
    /// That last branch is a designed fail-open default, not an
    /// oversight: new routes ship usable and get locked down by adding
    /// a table row, never the other way around.
    pub fn can_access(&self, role: Role, path: &str) -> bool {
        if let Some(roles) = self.table.get(path) {
            return roles.contains(&role);
        }

        for (pattern, roles) in &self.table {
            if pattern.contains(':') && route_pattern_matches(path, pattern) {
                return roles.contains(&role);
            }
        }

        // No entry: open to all authenticated roles (fail-open default).
        true
    }

    /// Number of routes in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Iterate the table rows (route pattern, permitted roles).
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &'static [Role])> + '_ {
        self.table.iter().map(|(k, v)| (*k, *v))
    }
}

impl Default for PagePolicy {
    fn default() -> Self {
        Self::new()
    }
}

/// Match a concrete path against a `:param` route pattern.
///
/// Segment counts must agree; a `:`-prefixed pattern segment matches any
/// non-empty concrete segment.
fn route_pattern_matches(path: &str, pattern: &str) -> bool {
    let path_segs: Vec<&str> = path.trim_matches('/').split('/').collect();
    let pattern_segs: Vec<&str> = pattern.trim_matches('/').split('/').collect();

    if path_segs.len() != pattern_segs.len() {
        return false;
    }

    path_segs
        .iter()
        .zip(&pattern_segs)
        .all(|(p, pat)| (pat.starts_with(':') && !p.is_empty()) || p == pat)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn unlisted_paths_are_open_to_every_role() {
        let policy = PagePolicy::new();
        for role in Role::iter() {
            assert!(
                policy.can_access(role, "/some/brand-new/page"),
                "{role} should pass the fail-open default"
            );
            // Applies under /admin too: absence from the table means
            // open, regardless of the path prefix.
            assert!(policy.can_access(role, "/admin/not-a-real-page"));
        }
    }

    #[test]
    fn exact_rows_gate_by_role() {
        let policy = PagePolicy::new();

        assert!(policy.can_access(Role::Nurse, "/monitoring/overview"));
        assert!(!policy.can_access(Role::SystemOperator, "/monitoring/overview"));

        assert!(policy.can_access(Role::SystemAdmin, "/admin/permissions"));
        assert!(!policy.can_access(Role::Admin, "/admin/permissions"));

        assert!(policy.can_access(Role::SystemOperator, "/admin/tenants"));
        assert!(!policy.can_access(Role::Manager, "/admin/tenants"));

        assert!(policy.can_access(Role::It, "/devices"));
        assert!(!policy.can_access(Role::Nurse, "/devices"));
    }

    #[test]
    fn alarm_records_excludes_residents_and_family() {
        let policy = PagePolicy::new();
        assert!(policy.can_access(Role::Caregiver, "/alarm/records"));
        assert!(!policy.can_access(Role::Resident, "/alarm/records"));
        assert!(!policy.can_access(Role::Family, "/alarm/records"));
    }

    #[test]
    fn pattern_routes_match_concrete_paths() {
        let policy = PagePolicy::new();

        assert!(policy.can_access(Role::Nurse, "/resident/r-123/phi"));
        assert!(!policy.can_access(Role::Family, "/resident/r-123/phi"));

        assert!(policy.can_access(Role::Family, "/monitoring/vital-focus/card-9"));
        assert!(!policy.can_access(Role::SystemAdmin, "/monitoring/vital-focus/card-9"));

        assert!(policy.can_access(Role::Family, "/report/sleepace/dev-1/detail/2026-08-01"));
    }

    #[test]
    fn pattern_requires_equal_segment_count() {
        assert!(route_pattern_matches("/resident/42/phi", "/resident/:id/phi"));
        assert!(!route_pattern_matches("/resident/42", "/resident/:id/phi"));
        assert!(!route_pattern_matches(
            "/resident/42/phi/extra",
            "/resident/:id/phi"
        ));
    }

    #[test]
    fn every_role_has_a_landing_page() {
        // The table must never lock a role out of the whole console.
        let policy = PagePolicy::new();
        for role in Role::iter() {
            let reachable = policy
                .entries()
                .any(|(_, roles)| roles.contains(&role));
            assert!(reachable, "{role} cannot reach any page");
        }
    }
}
