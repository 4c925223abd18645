use std::fmt;

/// Crate-wide error type.
///
/// Variants carry owned strings and the enum is `Clone` so that callers
/// coalesced onto a single in-flight identity fetch can all receive the same
/// outcome.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The backend envelope reported `code != 0`; carries the envelope message.
    Domain { code: i32, message: String },
    /// An operation requiring a credential was attempted without one.
    Unauthorized,
    /// The backend rejected the credential (HTTP 401). Handled once at the
    /// transport layer: the session is cleared before this is returned.
    AuthExpired(String),
    /// The backend denied the operation (HTTP 403). Session state is untouched.
    Forbidden(String),
    /// Any other non-success HTTP status.
    Http { status: u16, message: String },
    /// Connection-level failure.
    Network(String),
    /// The request timed out before completing.
    Timeout(String),
    /// The response body could not be decoded.
    Decode(String),
    /// Invalid configuration, such as an unparseable API base URL.
    Config(String),
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Domain { code, message } => {
                write!(formatter, "request rejected (code {code}): {message}")
            }
            Error::Unauthorized => write!(formatter, "unauthorized: no credential present"),
            Error::AuthExpired(message) => write!(formatter, "session expired: {message}"),
            Error::Forbidden(message) => write!(formatter, "forbidden: {message}"),
            Error::Http { status, message } => {
                write!(formatter, "request failed ({status}): {message}")
            }
            Error::Network(message) => write!(formatter, "network error: {message}"),
            Error::Timeout(message) => write!(formatter, "timeout: {message}"),
            Error::Decode(message) => write!(formatter, "response error: {message}"),
            Error::Config(message) => write!(formatter, "config error: {message}"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn domain_error_surfaces_envelope_message() {
        let err = Error::Domain {
            code: 7,
            message: "bad credentials".to_string(),
        };
        assert!(err.to_string().contains("bad credentials"));
        assert!(err.to_string().contains('7'));
    }

    #[test]
    fn errors_are_cloneable_for_shared_outcomes() {
        let err = Error::Timeout("identity fetch timed out".to_string());
        let copy = err.clone();
        assert_eq!(err, copy);
    }
}
