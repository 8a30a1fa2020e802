// Stored document shapes.
//
// Every timestamp is epoch milliseconds. The adapter owns the translation to
// the auth library's date-typed wire shape; these structs never carry date
// objects.

use serde::{Deserialize, Serialize};

/// Stored external identity record. Email is persisted lowercase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDoc {
    pub id: String,
    pub email: String,
    pub name: String,
    pub image: Option<String>,
    pub email_verified: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Partial update for a user. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub name: Option<String>,
    pub image: Option<String>,
    pub email_verified: Option<bool>,
    pub updated_at: Option<i64>,
}

/// Stored provider linkage. `(provider_id, account_id)` is a unique index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountDoc {
    pub id: String,
    pub user_id: String,
    pub provider_id: String,
    pub account_id: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub scope: Option<String>,
    pub access_token_expires_at: Option<i64>,
    pub refresh_token_expires_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default)]
pub struct AccountPatch {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub id_token: Option<String>,
    pub scope: Option<String>,
    pub access_token_expires_at: Option<i64>,
    pub refresh_token_expires_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Stored session. `id` is the session token the browser holds; there is no
/// separate token column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDoc {
    pub id: String,
    pub user_id: String,
    pub expires_at: i64,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub expires_at: Option<i64>,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub updated_at: Option<i64>,
}

/// Stored verification challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationDoc {
    pub id: String,
    pub identifier: String,
    pub value: String,
    pub expires_at: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Default)]
pub struct VerificationPatch {
    pub identifier: Option<String>,
    pub value: Option<String>,
    pub expires_at: Option<i64>,
    pub updated_at: Option<i64>,
}

/// Stored domain principal. Distinct from [`UserDoc`]: teachers exist before
/// their first sign-in (invited by an administrator) and carry the
/// application-side identity the rest of the app authorizes against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherDoc {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Unique when set; persisted lowercase.
    pub email: Option<String>,
    /// Back-reference to the linked [`UserDoc`]'s id. Unique when set.
    pub auth_user_id: Option<String>,
    pub is_active: bool,
    /// Auth user id of whoever created this record.
    pub created_by: String,
}

/// Input for creating a teacher; the directory assigns the id.
#[derive(Debug, Clone)]
pub struct NewTeacher {
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub auth_user_id: Option<String>,
    pub is_active: bool,
    pub created_by: String,
}
