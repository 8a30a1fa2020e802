// Error taxonomy for the auth bridge.
//
// Not-found is never an error: lookups return `Ok(None)` or an empty vec and
// callers branch on it. Everything here represents a rejected request or a
// lower-level failure that propagates unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unified result type for bridge operations.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;

/// HTTP status the route layer maps each error onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpStatus {
    BadRequest = 400,
    Unauthorized = 401,
    Conflict = 409,
    InternalServerError = 500,
}

impl HttpStatus {
    pub fn status_code(&self) -> u16 {
        *self as u16
    }
}

impl fmt::Display for HttpStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_code())
    }
}

/// Errors raised by the adapter, the identity linker, and the route guard.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// An operation that needs an active identity was invoked without one
    /// (no session token, unknown token, or expired session).
    #[error("Authentication required")]
    AuthenticationRequired,

    /// The authenticated identity lacks an email, which linking requires.
    /// Surfaced to the caller; no Teacher record is created.
    #[error("Authenticated user has no email address")]
    MissingEmail,

    /// A create would duplicate a unique key. Propagated unmodified by the
    /// adapter; only the linker's insert-then-lookup path consumes it.
    #[error("Unique constraint violated on {collection}.{field}")]
    UniqueViolation {
        collection: &'static str,
        field: &'static str,
    },

    /// The external auth library asked for a model this bridge does not
    /// store. Explicit by design instead of a silent fallthrough.
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// The payload the auth library handed us could not be coerced into the
    /// target collection's shape.
    #[error("Malformed {model} payload: {reason}")]
    MalformedPayload { model: &'static str, reason: String },

    /// Lower-level store failure, propagated unchanged. No retries.
    #[error("Store error: {0}")]
    Store(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BridgeError {
    /// The HTTP status the route layer should translate this error into.
    /// The body stays a generic "authentication failed" — internal detail
    /// is logged server-side, not sent to the browser.
    pub fn http_status(&self) -> HttpStatus {
        match self {
            Self::AuthenticationRequired => HttpStatus::Unauthorized,
            Self::MissingEmail => HttpStatus::BadRequest,
            Self::UniqueViolation { .. } => HttpStatus::Conflict,
            Self::UnsupportedModel(_) | Self::MalformedPayload { .. } => HttpStatus::BadRequest,
            Self::Store(_) | Self::Other(_) => HttpStatus::InternalServerError,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            BridgeError::AuthenticationRequired.http_status().status_code(),
            401
        );
        assert_eq!(BridgeError::MissingEmail.http_status().status_code(), 400);
        assert_eq!(
            BridgeError::UniqueViolation {
                collection: "teachers",
                field: "email"
            }
            .http_status()
            .status_code(),
            409
        );
        assert_eq!(
            BridgeError::UnsupportedModel("rateLimit".into())
                .http_status()
                .status_code(),
            400
        );
    }

    #[test]
    fn test_display() {
        let err = BridgeError::UniqueViolation {
            collection: "account",
            field: "providerId+accountId",
        };
        assert!(err.to_string().contains("account"));
    }
}
