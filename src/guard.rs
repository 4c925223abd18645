//! Pre-navigation guarding. `evaluate` is the pure decision function over a
//! session snapshot and the target route's metadata; `NavigationGuard` wraps
//! it with the one asynchronous step, resolving the identity under a bounded
//! wait for sessions that are logged in but not yet initialized.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::debug;

use crate::routes::{DASHBOARD_PATH, FORBIDDEN_PATH, LOGIN_PATH, REGISTER_PATH, RouteMeta, RouteTable};
use crate::session::{Session, SessionSnapshot};
use crate::transport::Notifier;

/// Notice raised when a route's permission requirement is not met.
pub const NO_ROUTE_PERMISSION_NOTICE: &str = "You do not have permission to access this page.";

/// Outcome of a navigation attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    /// Redirect to `path`; `from` carries the originally intended path so
    /// the destination can offer a way back.
    Redirect {
        path: String,
        from: Option<String>,
    },
}

impl GuardDecision {
    #[must_use]
    pub fn redirect(path: &str) -> Self {
        Self::Redirect {
            path: path.to_string(),
            from: None,
        }
    }
}

/// Result of the pure evaluation: either a final decision, or the one case
/// that needs asynchronous work first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardCheck {
    Decided(GuardDecision),
    /// Logged in, identity not yet cached, target requires auth.
    ResolveIdentity,
}

/// Evaluates a navigation attempt in priority order:
///
/// 1. Login/register while logged in redirects to the dashboard.
/// 2. Auth-required target without a credential redirects to login.
/// 3. Auth-required target with a credential but no cached identity needs
///    identity resolution first.
/// 4. A missing route permission redirects to the forbidden page, carrying
///    the intended path.
/// 5. Otherwise the navigation is allowed.
#[must_use]
pub fn evaluate(snapshot: &SessionSnapshot, route: &RouteMeta) -> GuardCheck {
    if route.path == LOGIN_PATH || route.path == REGISTER_PATH {
        return GuardCheck::Decided(if snapshot.logged_in {
            GuardDecision::redirect(DASHBOARD_PATH)
        } else {
            GuardDecision::Allow
        });
    }

    if route.requires_auth && !snapshot.logged_in {
        return GuardCheck::Decided(GuardDecision::redirect(LOGIN_PATH));
    }

    if route.requires_auth && snapshot.identity.is_none() {
        return GuardCheck::ResolveIdentity;
    }

    if let Some(permission) = &route.permission {
        if !snapshot.has_permission(permission) {
            return GuardCheck::Decided(GuardDecision::Redirect {
                path: FORBIDDEN_PATH.to_string(),
                from: Some(route.path.clone()),
            });
        }
    }

    GuardCheck::Decided(GuardDecision::Allow)
}

/// The global pre-navigation check. The host shell calls
/// [`NavigationGuard::before_each`] for every attempted route change and
/// applies the returned decision.
pub struct NavigationGuard {
    session: Session,
    routes: RouteTable,
    notifier: Arc<dyn Notifier>,
    identity_timeout: Duration,
}

impl NavigationGuard {
    #[must_use]
    pub fn new(
        session: Session,
        routes: RouteTable,
        notifier: Arc<dyn Notifier>,
        identity_timeout: Duration,
    ) -> Self {
        Self {
            session,
            routes,
            notifier,
            identity_timeout,
        }
    }

    /// Decides an attempted navigation to `target_path`.
    ///
    /// When the session is logged in but uninitialized, identity resolution
    /// runs under the bounded wait; failure or timeout demotes the session
    /// to logged-out and redirects to login. The wait abandons the shared
    /// fetch without cancelling it, so concurrent navigations still receive
    /// its eventual result.
    pub async fn before_each(&self, target_path: &str) -> GuardDecision {
        let route = self.routes.resolve(target_path);

        let check = match evaluate(&self.session.snapshot(), &route) {
            GuardCheck::ResolveIdentity => self.resolve_identity(&route).await,
            decided => decided,
        };

        match check {
            GuardCheck::Decided(decision) => {
                if let GuardDecision::Redirect { path, .. } = &decision {
                    if path == FORBIDDEN_PATH {
                        self.notifier.warning(NO_ROUTE_PERMISSION_NOTICE);
                    }
                }
                decision
            }
            // The identity vanished between resolution and re-evaluation
            // (for example a concurrent 401); treat it as a failed pass.
            GuardCheck::ResolveIdentity => self.demote(),
        }
    }

    async fn resolve_identity(&self, route: &RouteMeta) -> GuardCheck {
        match timeout(self.identity_timeout, self.session.ensure_identity()).await {
            Ok(Ok(_)) => evaluate(&self.session.snapshot(), route),
            Ok(Err(err)) => {
                debug!("identity resolution failed, demoting to logged out: {err}");
                GuardCheck::Decided(self.demote())
            }
            Err(_) => {
                debug!(
                    "identity resolution exceeded {:?}, demoting to logged out",
                    self.identity_timeout
                );
                GuardCheck::Decided(self.demote())
            }
        }
    }

    fn demote(&self) -> GuardDecision {
        self.session.logout();
        GuardDecision::redirect(LOGIN_PATH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Identity;

    fn snapshot(logged_in: bool, permissions: Option<&[&str]>) -> SessionSnapshot {
        SessionSnapshot {
            logged_in,
            identity: permissions.map(|perms| Identity {
                id: 1,
                username: "admin".to_string(),
                real_name: Some("Admin".to_string()),
                roles: vec!["ADMIN".to_string()],
                permissions: perms.iter().map(|p| (*p).to_string()).collect(),
            }),
        }
    }

    #[test]
    fn login_page_redirects_authenticated_sessions_to_dashboard() {
        let check = evaluate(
            &snapshot(true, Some(&[])),
            &RouteMeta::open(LOGIN_PATH),
        );
        assert_eq!(
            check,
            GuardCheck::Decided(GuardDecision::redirect(DASHBOARD_PATH))
        );
    }

    #[test]
    fn login_page_allows_anonymous_sessions() {
        let check = evaluate(&snapshot(false, None), &RouteMeta::open(LOGIN_PATH));
        assert_eq!(check, GuardCheck::Decided(GuardDecision::Allow));
    }

    #[test]
    fn protected_route_redirects_anonymous_sessions_to_login() {
        let check = evaluate(
            &snapshot(false, None),
            &RouteMeta::authenticated(DASHBOARD_PATH),
        );
        assert_eq!(
            check,
            GuardCheck::Decided(GuardDecision::redirect(LOGIN_PATH))
        );
    }

    #[test]
    fn uninitialized_session_needs_identity_resolution() {
        let check = evaluate(
            &snapshot(true, None),
            &RouteMeta::authenticated(DASHBOARD_PATH),
        );
        assert_eq!(check, GuardCheck::ResolveIdentity);
    }

    #[test]
    fn missing_permission_redirects_to_forbidden_not_login() {
        let check = evaluate(
            &snapshot(true, Some(&["dorm:building:read"])),
            &RouteMeta::with_permission("/students", "student:read"),
        );
        assert_eq!(
            check,
            GuardCheck::Decided(GuardDecision::Redirect {
                path: FORBIDDEN_PATH.to_string(),
                from: Some("/students".to_string()),
            })
        );
    }

    #[test]
    fn matching_permission_allows_navigation() {
        let check = evaluate(
            &snapshot(true, Some(&["student:read"])),
            &RouteMeta::with_permission("/students", "student:read"),
        );
        assert_eq!(check, GuardCheck::Decided(GuardDecision::Allow));
    }

    #[test]
    fn open_routes_never_require_identity() {
        let check = evaluate(&snapshot(true, None), &RouteMeta::open(FORBIDDEN_PATH));
        assert_eq!(check, GuardCheck::Decided(GuardDecision::Allow));
    }
}
