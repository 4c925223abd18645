//! # Dormitory Console (Session & Route-Guard Core)
//!
//! `dormitory-console` is the non-visual core of the dormitory
//! administration console: session bootstrap, bearer-token transport, and
//! pre-navigation guarding, plus the typed API surface for every backend
//! resource (staff users, buildings, rooms, beds, assignments, students,
//! repair tickets, visitor records).
//!
//! ## Session model
//!
//! A non-empty persisted credential means "logged in", independent of
//! whether the identity (roles and permissions) has been resolved yet. The
//! identity is fetched lazily, and concurrent resolution requests coalesce
//! onto a single underlying call — rapid back-to-back navigations never fire
//! duplicate identity requests.
//!
//! ## Interception
//!
//! Every request carries `Authorization: Bearer <token>` when a credential
//! exists. A 401 anywhere tears the session down, routes to the login page,
//! and raises a notice; a 403 raises a notice only, because the user may be
//! legitimately signed in but missing one permission.
//!
//! ## Wiring
//!
//! The host shell owns rendering and navigation; it injects those seams and
//! applies guard decisions:
//!
//! ```no_run
//! use std::sync::Arc;
//! use dormitory_console::{
//!     AppConfig, LogNotifier, MemoryNavigator, NavigationGuard, RouteTable, Session,
//!     SessionContext, TokenStore, Transport,
//! };
//!
//! # fn main() -> Result<(), dormitory_console::Error> {
//! let config = AppConfig::load();
//! let context = SessionContext::new(TokenStore::new(&config.token_path));
//! let navigator = Arc::new(MemoryNavigator::new("/login"));
//! let notifier = Arc::new(LogNotifier);
//! let transport = Transport::new(&config, context.clone(), navigator, notifier.clone())?;
//! let session = Session::new(context, transport.clone());
//! let guard = NavigationGuard::new(
//!     session,
//!     RouteTable::admin_console(),
//!     notifier,
//!     config.identity_timeout,
//! );
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod guard;
pub mod routes;
pub mod session;
pub mod singleflight;
pub mod token;
pub mod transport;

pub use config::AppConfig;
pub use error::Error;
pub use guard::{GuardCheck, GuardDecision, NavigationGuard, evaluate};
pub use routes::{RouteMeta, RouteTable};
pub use session::{Identity, Session, SessionContext, SessionSnapshot};
pub use singleflight::Singleflight;
pub use token::TokenStore;
pub use transport::{LogNotifier, MemoryNavigator, Navigator, Notifier, Transport};

/// User agent sent with every API request.
pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::APP_USER_AGENT;

    #[test]
    fn test_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with("dormitory-console/"));
    }
}
