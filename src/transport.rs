//! HTTP transport shared by every API client. It centralizes request
//! construction, bearer-header attachment, and the two global interception
//! behaviors: a 401 tears the session down and routes to the login page, a
//! 403 only raises a notice. Everything else passes through to the caller.

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{Instrument, debug, error, info_span, warn};
use url::Url;

use crate::api::Envelope;
use crate::config::AppConfig;
use crate::error::Error;
use crate::routes::LOGIN_PATH;
use crate::session::SessionContext;

/// Notice raised when the backend rejects the credential.
pub const SESSION_EXPIRED_NOTICE: &str = "Your session has expired. Please sign in again.";
/// Notice raised when the backend denies an operation.
pub const FORBIDDEN_NOTICE: &str = "You do not have permission to perform this action.";

/// Maximum number of error-body characters surfaced to the caller.
const MAX_ERROR_CHARS: usize = 200;

/// Host-shell seam for reading and replacing the current location.
pub trait Navigator: Send + Sync {
    fn current_path(&self) -> String;
    fn replace(&self, path: &str);
}

/// Host-shell seam for user-visible notices.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
    fn warning(&self, message: &str);
}

/// In-memory [`Navigator`] suitable for shells and tests.
#[derive(Debug)]
pub struct MemoryNavigator {
    path: Mutex<String>,
}

impl MemoryNavigator {
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            path: Mutex::new(initial.to_string()),
        }
    }
}

impl Navigator for MemoryNavigator {
    fn current_path(&self) -> String {
        self.path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn replace(&self, path: &str) {
        debug!("navigating to {path}");
        *self.path.lock().unwrap_or_else(PoisonError::into_inner) = path.to_string();
    }
}

/// [`Notifier`] that routes notices to the tracing subscriber.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn error(&self, message: &str) {
        error!("{message}");
    }

    fn warning(&self, message: &str) {
        warn!("{message}");
    }
}

struct TransportInner {
    client: reqwest::Client,
    base_url: String,
    context: SessionContext,
    navigator: Arc<dyn Navigator>,
    notifier: Arc<dyn Notifier>,
}

/// Arc-shared HTTP transport. Cloning is cheap and shares the client,
/// session context, and shell seams.
#[derive(Clone)]
pub struct Transport {
    inner: Arc<TransportInner>,
}

impl Transport {
    /// Builds the transport from configuration and the injected session
    /// context and shell seams.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the API base URL is invalid or the HTTP
    /// client cannot be constructed.
    pub fn new(
        config: &AppConfig,
        context: SessionContext,
        navigator: Arc<dyn Navigator>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, Error> {
        let base_url = config.api_base_url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url)
            .map_err(|err| Error::Config(format!("invalid API base URL {base_url:?}: {err}")))?;

        let client = reqwest::Client::builder()
            .user_agent(crate::APP_USER_AGENT)
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| Error::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            inner: Arc::new(TransportInner {
                client,
                base_url,
                context,
                navigator,
                notifier,
            }),
        })
    }

    /// # Errors
    /// See [`Transport::execute`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, Error> {
        let url = self.url(path);
        self.execute(self.inner.client.get(&url), Method::GET, &url)
            .await
    }

    /// # Errors
    /// See [`Transport::execute`].
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<Envelope<T>, Error>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path);
        self.execute(self.inner.client.get(&url).query(query), Method::GET, &url)
            .await
    }

    /// # Errors
    /// See [`Transport::execute`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        self.execute(self.inner.client.post(&url).json(body), Method::POST, &url)
            .await
    }

    /// POST without a body, for action endpoints that need none.
    ///
    /// # Errors
    /// See [`Transport::execute`].
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, Error> {
        let url = self.url(path);
        self.execute(self.inner.client.post(&url), Method::POST, &url)
            .await
    }

    /// # Errors
    /// See [`Transport::execute`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<Envelope<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.url(path);
        self.execute(self.inner.client.put(&url).json(body), Method::PUT, &url)
            .await
    }

    /// # Errors
    /// See [`Transport::execute`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<Envelope<T>, Error> {
        let url = self.url(path);
        self.execute(self.inner.client.delete(&url), Method::DELETE, &url)
            .await
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.base_url, path.trim_start_matches('/'))
    }

    /// Sends the request with the bearer header attached and applies the
    /// global interception rules before decoding the envelope.
    ///
    /// # Errors
    /// [`Error::AuthExpired`] on 401 (after clearing the session and routing
    /// to the login page), [`Error::Forbidden`] on 403 (notice only),
    /// [`Error::Http`] on other non-success statuses, [`Error::Timeout`] /
    /// [`Error::Network`] on transport failures, and [`Error::Decode`] when
    /// the body is not a valid envelope.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        method: Method,
        url: &str,
    ) -> Result<Envelope<T>, Error> {
        let mut request = request.header(reqwest::header::ACCEPT, "application/json");
        if let Some(credential) = self.inner.context.credential() {
            request = request.bearer_auth(credential.expose_secret());
        }

        debug!("api request: {} {}", method, url);
        let span = info_span!(
            "api.request",
            http.method = %method,
            url = %url
        );
        let response = request
            .send()
            .instrument(span)
            .await
            .map_err(map_send_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            self.expire_session();
            return Err(Error::AuthExpired(format!(
                "credential rejected by {url}"
            )));
        }
        if status == StatusCode::FORBIDDEN {
            self.inner.notifier.warning(FORBIDDEN_NOTICE);
            return Err(Error::Forbidden(format!("operation denied by {url}")));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Http {
                status: status.as_u16(),
                message: sanitize_body(&body),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| Error::Network(format!("failed to read response body: {err}")))?;
        serde_json::from_str(&body)
            .map_err(|err| Error::Decode(format!("invalid envelope from {url}: {err}")))
    }

    /// Full logout on a 401: clear state, route to the login page unless
    /// already there, and raise the session-expired notice.
    fn expire_session(&self) {
        self.inner.context.clear();
        if self.inner.navigator.current_path() != LOGIN_PATH {
            self.inner.navigator.replace(LOGIN_PATH);
        }
        self.inner.notifier.error(SESSION_EXPIRED_NOTICE);
    }
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.inner.base_url)
            .field("context", &self.inner.context)
            .finish()
    }
}

fn map_send_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Timeout(format!("request timed out: {err}"))
    } else if err.is_connect() {
        Error::Network(format!("unable to reach the server: {err}"))
    } else {
        Error::Network(err.to_string())
    }
}

/// Trims and truncates HTTP error bodies before surfacing them.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "request failed".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{MemoryNavigator, Navigator, sanitize_body};

    #[test]
    fn sanitize_body_trims_and_truncates() {
        assert_eq!(sanitize_body("  "), "request failed");
        assert_eq!(sanitize_body(" oops \n"), "oops");
        let long = "x".repeat(500);
        assert_eq!(sanitize_body(&long).len(), 200);
    }

    #[test]
    fn memory_navigator_tracks_replacements() {
        let navigator = MemoryNavigator::new("/dashboard");
        assert_eq!(navigator.current_path(), "/dashboard");
        navigator.replace("/login");
        assert_eq!(navigator.current_path(), "/login");
    }
}
