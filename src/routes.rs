//! The static route table of the admin console. Route metadata is loaded at
//! construction and read-only at navigation time; the guard never mutates it.

/// Login page, the destination of every demotion to logged-out.
pub const LOGIN_PATH: &str = "/login";
/// Registration page.
pub const REGISTER_PATH: &str = "/register";
/// Default landing page for authenticated sessions.
pub const DASHBOARD_PATH: &str = "/dashboard";
/// Dedicated page shown when a route permission is missing.
pub const FORBIDDEN_PATH: &str = "/403";

/// Access requirements for a single route.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMeta {
    pub path: String,
    pub requires_auth: bool,
    pub permission: Option<String>,
}

impl RouteMeta {
    #[must_use]
    pub fn open(path: &str) -> Self {
        Self {
            path: path.to_string(),
            requires_auth: false,
            permission: None,
        }
    }

    #[must_use]
    pub fn authenticated(path: &str) -> Self {
        Self {
            path: path.to_string(),
            requires_auth: true,
            permission: None,
        }
    }

    #[must_use]
    pub fn with_permission(path: &str, permission: &str) -> Self {
        Self {
            path: path.to_string(),
            requires_auth: true,
            permission: Some(permission.to_string()),
        }
    }
}

/// Ordered list of route metadata, resolved by exact path.
#[derive(Clone, Debug)]
pub struct RouteTable {
    routes: Vec<RouteMeta>,
}

impl RouteTable {
    #[must_use]
    pub fn new(routes: Vec<RouteMeta>) -> Self {
        Self { routes }
    }

    /// The admin console's route table.
    #[must_use]
    pub fn admin_console() -> Self {
        Self::new(vec![
            RouteMeta::open(LOGIN_PATH),
            RouteMeta::open(REGISTER_PATH),
            RouteMeta::authenticated(DASHBOARD_PATH),
            RouteMeta::with_permission("/users", "sys:user:read"),
            RouteMeta::with_permission("/dorm/buildings", "dorm:building:read"),
            RouteMeta::with_permission("/dorm/rooms", "dorm:room:read"),
            RouteMeta::with_permission("/dorm/beds", "dorm:bed:read"),
            RouteMeta::with_permission("/students", "student:read"),
            RouteMeta::with_permission("/assignments", "dorm:assignment:read"),
            RouteMeta::with_permission("/repairs", "repair:order:read"),
            RouteMeta::with_permission("/visitors", "visitor:record:read"),
            RouteMeta::open(FORBIDDEN_PATH),
        ])
    }

    #[must_use]
    pub fn find(&self, path: &str) -> Option<&RouteMeta> {
        self.routes.iter().find(|route| route.path == path)
    }

    /// Resolves a path to its metadata. Paths missing from the table carry
    /// no requirements, matching a router that treats absent meta as false.
    #[must_use]
    pub fn resolve(&self, path: &str) -> RouteMeta {
        self.find(path)
            .cloned()
            .unwrap_or_else(|| RouteMeta::open(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admin_console_table_matches_backend_permissions() {
        let table = RouteTable::admin_console();

        let students = table.find("/students").expect("route should exist");
        assert!(students.requires_auth);
        assert_eq!(students.permission.as_deref(), Some("student:read"));

        let dashboard = table.find(DASHBOARD_PATH).expect("route should exist");
        assert!(dashboard.requires_auth);
        assert_eq!(dashboard.permission, None);

        let forbidden = table.find(FORBIDDEN_PATH).expect("route should exist");
        assert!(!forbidden.requires_auth);
    }

    #[test]
    fn unknown_paths_resolve_to_no_requirements() {
        let table = RouteTable::admin_console();
        let route = table.resolve("/definitely/not/here");
        assert!(!route.requires_auth);
        assert_eq!(route.permission, None);
        assert_eq!(route.path, "/definitely/not/here");
    }
}
