// Shape translation between the auth library's wire records and stored
// documents.
//
// Two conventions meet here and nowhere else: the store persists timestamps
// as epoch milliseconds while the library speaks date values, and the
// session's wire `token` is the storage `id`. Neither side is aware of the
// other's convention.

use serde_json::Value;

use schoolbridge_core::error::{BridgeError, BridgeResult};
use schoolbridge_core::id::generate_id;
use schoolbridge_core::model::{AuthAccount, AuthSession, AuthUser, AuthVerification};
use schoolbridge_core::timestamp::{normalize_epoch_millis, normalize_or_now, to_datetime};
use schoolbridge_store::doc::{
    AccountDoc, AccountPatch, SessionDoc, SessionPatch, UserDoc, UserPatch, VerificationDoc,
    VerificationPatch,
};

fn as_object<'a>(
    data: &'a Value,
    model: &'static str,
) -> BridgeResult<&'a serde_json::Map<String, Value>> {
    data.as_object().ok_or_else(|| BridgeError::MalformedPayload {
        model,
        reason: "expected a JSON object".into(),
    })
}

fn req_str(
    obj: &serde_json::Map<String, Value>,
    field: &str,
    model: &'static str,
) -> BridgeResult<String> {
    obj.get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| BridgeError::MalformedPayload {
            model,
            reason: format!("missing required field `{field}`"),
        })
}

fn opt_str(obj: &serde_json::Map<String, Value>, field: &str) -> Option<String> {
    obj.get(field).and_then(Value::as_str).map(str::to_string)
}

fn opt_millis(obj: &serde_json::Map<String, Value>, field: &str) -> Option<i64> {
    obj.get(field).and_then(normalize_epoch_millis)
}

fn req_millis(
    obj: &serde_json::Map<String, Value>,
    field: &str,
    model: &'static str,
) -> BridgeResult<i64> {
    opt_millis(obj, field).ok_or_else(|| BridgeError::MalformedPayload {
        model,
        reason: format!("missing or unparseable timestamp `{field}`"),
    })
}

fn id_or_generate(obj: &serde_json::Map<String, Value>) -> String {
    opt_str(obj, "id").unwrap_or_else(generate_id)
}

fn to_wire<T: serde::Serialize>(record: &T) -> BridgeResult<Value> {
    serde_json::to_value(record).map_err(|e| BridgeError::Other(anyhow::Error::new(e)))
}

// ─── Create payloads ─────────────────────────────────────────────

pub fn user_doc_from_create(data: &Value) -> BridgeResult<UserDoc> {
    let obj = as_object(data, "user")?;
    Ok(UserDoc {
        id: id_or_generate(obj),
        email: req_str(obj, "email", "user")?.to_lowercase(),
        name: opt_str(obj, "name").unwrap_or_default(),
        image: opt_str(obj, "image"),
        email_verified: obj
            .get("emailVerified")
            .and_then(Value::as_bool)
            .unwrap_or(false),
        created_at: normalize_or_now(obj.get("createdAt")),
        updated_at: normalize_or_now(obj.get("updatedAt")),
    })
}

pub fn account_doc_from_create(data: &Value) -> BridgeResult<AccountDoc> {
    let obj = as_object(data, "account")?;
    Ok(AccountDoc {
        id: id_or_generate(obj),
        user_id: req_str(obj, "userId", "account")?,
        provider_id: req_str(obj, "providerId", "account")?,
        account_id: req_str(obj, "accountId", "account")?,
        access_token: opt_str(obj, "accessToken"),
        refresh_token: opt_str(obj, "refreshToken"),
        id_token: opt_str(obj, "idToken"),
        scope: opt_str(obj, "scope"),
        access_token_expires_at: opt_millis(obj, "accessTokenExpiresAt"),
        refresh_token_expires_at: opt_millis(obj, "refreshTokenExpiresAt"),
        created_at: normalize_or_now(obj.get("createdAt")),
        updated_at: normalize_or_now(obj.get("updatedAt")),
    })
}

/// The payload may carry `id`, `token`, or both; they are one value. A
/// payload with neither cannot name a session and is rejected.
pub fn session_doc_from_create(data: &Value) -> BridgeResult<SessionDoc> {
    let obj = as_object(data, "session")?;
    let id = opt_str(obj, "id")
        .or_else(|| opt_str(obj, "token"))
        .ok_or_else(|| BridgeError::MalformedPayload {
            model: "session",
            reason: "missing both `id` and `token`".into(),
        })?;
    Ok(SessionDoc {
        id,
        user_id: req_str(obj, "userId", "session")?,
        expires_at: req_millis(obj, "expiresAt", "session")?,
        ip_address: opt_str(obj, "ipAddress"),
        user_agent: opt_str(obj, "userAgent"),
        created_at: normalize_or_now(obj.get("createdAt")),
        updated_at: normalize_or_now(obj.get("updatedAt")),
    })
}

pub fn verification_doc_from_create(data: &Value) -> BridgeResult<VerificationDoc> {
    let obj = as_object(data, "verification")?;
    Ok(VerificationDoc {
        id: id_or_generate(obj),
        identifier: req_str(obj, "identifier", "verification")?,
        value: req_str(obj, "value", "verification")?,
        expires_at: req_millis(obj, "expiresAt", "verification")?,
        created_at: normalize_or_now(obj.get("createdAt")),
        updated_at: normalize_or_now(obj.get("updatedAt")),
    })
}

// ─── Update payloads ─────────────────────────────────────────────
// Partial: only fields present in the patch are carried over, with
// timestamps re-normalized.

pub fn user_patch_from_value(patch: &Value) -> BridgeResult<UserPatch> {
    let obj = as_object(patch, "user")?;
    Ok(UserPatch {
        email: opt_str(obj, "email").map(|e| e.to_lowercase()),
        name: opt_str(obj, "name"),
        image: opt_str(obj, "image"),
        email_verified: obj.get("emailVerified").and_then(Value::as_bool),
        updated_at: opt_millis(obj, "updatedAt"),
    })
}

pub fn account_patch_from_value(patch: &Value) -> BridgeResult<AccountPatch> {
    let obj = as_object(patch, "account")?;
    Ok(AccountPatch {
        access_token: opt_str(obj, "accessToken"),
        refresh_token: opt_str(obj, "refreshToken"),
        id_token: opt_str(obj, "idToken"),
        scope: opt_str(obj, "scope"),
        access_token_expires_at: opt_millis(obj, "accessTokenExpiresAt"),
        refresh_token_expires_at: opt_millis(obj, "refreshTokenExpiresAt"),
        updated_at: opt_millis(obj, "updatedAt"),
    })
}

pub fn session_patch_from_value(patch: &Value) -> BridgeResult<SessionPatch> {
    let obj = as_object(patch, "session")?;
    Ok(SessionPatch {
        expires_at: opt_millis(obj, "expiresAt"),
        ip_address: opt_str(obj, "ipAddress"),
        user_agent: opt_str(obj, "userAgent"),
        updated_at: opt_millis(obj, "updatedAt"),
    })
}

pub fn verification_patch_from_value(patch: &Value) -> BridgeResult<VerificationPatch> {
    let obj = as_object(patch, "verification")?;
    Ok(VerificationPatch {
        identifier: opt_str(obj, "identifier"),
        value: opt_str(obj, "value"),
        expires_at: opt_millis(obj, "expiresAt"),
        updated_at: opt_millis(obj, "updatedAt"),
    })
}

// ─── Wire records ────────────────────────────────────────────────

pub fn user_to_wire(doc: &UserDoc) -> BridgeResult<Value> {
    to_wire(&AuthUser {
        id: doc.id.clone(),
        email: doc.email.clone(),
        name: doc.name.clone(),
        image: doc.image.clone(),
        email_verified: doc.email_verified,
        created_at: to_datetime(doc.created_at),
        updated_at: to_datetime(doc.updated_at),
    })
}

pub fn account_to_wire(doc: &AccountDoc) -> BridgeResult<Value> {
    to_wire(&AuthAccount {
        id: doc.id.clone(),
        user_id: doc.user_id.clone(),
        provider_id: doc.provider_id.clone(),
        account_id: doc.account_id.clone(),
        access_token: doc.access_token.clone(),
        refresh_token: doc.refresh_token.clone(),
        id_token: doc.id_token.clone(),
        scope: doc.scope.clone(),
        access_token_expires_at: doc.access_token_expires_at.map(to_datetime),
        refresh_token_expires_at: doc.refresh_token_expires_at.map(to_datetime),
        created_at: to_datetime(doc.created_at),
        updated_at: to_datetime(doc.updated_at),
    })
}

/// The wire record exposes both `id` and `token`, restored from the single
/// stored `id` column.
pub fn session_to_wire(doc: &SessionDoc) -> BridgeResult<Value> {
    to_wire(&AuthSession {
        id: doc.id.clone(),
        token: doc.id.clone(),
        user_id: doc.user_id.clone(),
        expires_at: to_datetime(doc.expires_at),
        ip_address: doc.ip_address.clone(),
        user_agent: doc.user_agent.clone(),
        created_at: to_datetime(doc.created_at),
        updated_at: to_datetime(doc.updated_at),
    })
}

pub fn verification_to_wire(doc: &VerificationDoc) -> BridgeResult<Value> {
    to_wire(&AuthVerification {
        id: doc.id.clone(),
        identifier: doc.identifier.clone(),
        value: doc.value.clone(),
        expires_at: to_datetime(doc.expires_at),
        created_at: to_datetime(doc.created_at),
        updated_at: to_datetime(doc.updated_at),
    })
}
