// Wire record shapes exchanged with the external auth library, and the closed
// set of models the adapter serves.
//
// These are the shapes the auth library sees: camelCase field names and
// date-typed timestamps. The store persists a different shape (epoch
// milliseconds); only the adapter translates between the two.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::BridgeError;

/// The four collections the external auth library reads and writes.
///
/// The library passes model names as strings; parsing into this enum rejects
/// anything else with an explicit `UnsupportedModel` error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthModel {
    User,
    Account,
    Session,
    Verification,
}

impl AuthModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Account => "account",
            Self::Session => "session",
            Self::Verification => "verification",
        }
    }
}

impl fmt::Display for AuthModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AuthModel {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "account" => Ok(Self::Account),
            "session" => Ok(Self::Session),
            "verification" => Ok(Self::Verification),
            other => Err(BridgeError::UnsupportedModel(other.to_string())),
        }
    }
}

/// External identity record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Linkage between a user and one external identity provider.
///
/// `(provider_id, account_id)` is unique: at most one record per external
/// account per provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthAccount {
    pub id: String,
    pub user_id: String,
    /// Provider identifier (e.g. "google").
    pub provider_id: String,
    /// Provider-scoped account id (e.g. the Google `sub`).
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token_expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token_expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A live authenticated session.
///
/// `token` and `id` are the same value: the browser's session cookie carries
/// it, and the store keys the record by it. The store persists only `id`;
/// the adapter restores `token` on the way out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthSession {
    pub id: String,
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AuthSession {
    /// Whether the session has expired at the given instant. The store never
    /// evicts; callers decide.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Short-lived challenge record for email / magic-link verification flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthVerification {
    pub id: String,
    /// The subject of the challenge (typically an email address).
    pub identifier: String,
    /// The secret/token being verified.
    pub value: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_roundtrip() {
        for name in ["user", "account", "session", "verification"] {
            let model: AuthModel = name.parse().unwrap();
            assert_eq!(model.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_model_rejected() {
        let err = "rateLimit".parse::<AuthModel>().unwrap_err();
        assert!(matches!(err, BridgeError::UnsupportedModel(ref m) if m == "rateLimit"));
    }

    #[test]
    fn test_session_expiry_check() {
        let now = Utc::now();
        let session = AuthSession {
            id: "tok".into(),
            token: "tok".into(),
            user_id: "u1".into(),
            expires_at: now,
            ip_address: None,
            user_agent: None,
            created_at: now,
            updated_at: now,
        };
        assert!(session.is_expired_at(now));
        assert!(!session.is_expired_at(now - chrono::TimeDelta::seconds(1)));
    }

    #[test]
    fn test_user_serializes_camel_case() {
        let now = Utc::now();
        let user = AuthUser {
            id: "u1".into(),
            email: "a@b.c".into(),
            name: "A".into(),
            image: None,
            email_verified: true,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&user).unwrap();
        assert!(value.get("emailVerified").is_some());
        assert!(value.get("image").is_none());
    }
}
