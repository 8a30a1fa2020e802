// Identity store contract: per-collection, index-backed primitives.
//
// The adapter is the only writer of these four collections. Each accessor
// maps to exactly one indexed lookup; joins and business rules live above
// this layer. Not-found is `Ok(None)` / empty, never an error.

use std::fmt;

use async_trait::async_trait;

use crate::doc::{
    AccountDoc, AccountPatch, SessionDoc, SessionPatch, UserDoc, UserPatch, VerificationDoc,
    VerificationPatch,
};
use crate::error::StoreError;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Read/write primitives over the four auth collections.
///
/// Implementations enforce the unique indexes (user email, account
/// provider+account pair) at insert and report [`StoreError::UniqueViolation`]
/// on duplicates. Each call is a single round-trip with per-request atomicity;
/// there are no cross-call transactions.
#[async_trait]
pub trait IdentityStore: Send + Sync + fmt::Debug {
    // ─── Users ───────────────────────────────────────────────────

    async fn insert_user(&self, doc: UserDoc) -> StoreResult<()>;
    async fn user_by_id(&self, id: &str) -> StoreResult<Option<UserDoc>>;
    /// Lookup by email; callers pass the email already lowercased.
    async fn user_by_email(&self, email: &str) -> StoreResult<Option<UserDoc>>;
    async fn patch_user(&self, id: &str, patch: UserPatch) -> StoreResult<Option<UserDoc>>;
    /// Returns whether a record was removed.
    async fn delete_user(&self, id: &str) -> StoreResult<bool>;

    // ─── Accounts ────────────────────────────────────────────────

    async fn insert_account(&self, doc: AccountDoc) -> StoreResult<()>;
    async fn account_by_id(&self, id: &str) -> StoreResult<Option<AccountDoc>>;
    async fn account_by_provider(
        &self,
        provider_id: &str,
        account_id: &str,
    ) -> StoreResult<Option<AccountDoc>>;
    /// All accounts owned by a user, in insertion order.
    async fn accounts_for_user(&self, user_id: &str) -> StoreResult<Vec<AccountDoc>>;
    async fn patch_account(&self, id: &str, patch: AccountPatch)
        -> StoreResult<Option<AccountDoc>>;
    async fn delete_account(&self, id: &str) -> StoreResult<bool>;
    async fn delete_accounts_for_user(&self, user_id: &str) -> StoreResult<u64>;

    // ─── Sessions ────────────────────────────────────────────────

    async fn insert_session(&self, doc: SessionDoc) -> StoreResult<()>;
    /// The session id IS the token; there is only this one lookup.
    async fn session_by_id(&self, id: &str) -> StoreResult<Option<SessionDoc>>;
    async fn sessions_for_user(&self, user_id: &str) -> StoreResult<Vec<SessionDoc>>;
    async fn patch_session(&self, id: &str, patch: SessionPatch)
        -> StoreResult<Option<SessionDoc>>;
    async fn delete_session(&self, id: &str) -> StoreResult<bool>;
    async fn delete_sessions_for_user(&self, user_id: &str) -> StoreResult<u64>;

    // ─── Verifications ───────────────────────────────────────────

    async fn insert_verification(&self, doc: VerificationDoc) -> StoreResult<()>;
    async fn verification_by_id(&self, id: &str) -> StoreResult<Option<VerificationDoc>>;
    async fn verification_by_value(&self, value: &str) -> StoreResult<Option<VerificationDoc>>;
    async fn verification_by_identifier_value(
        &self,
        identifier: &str,
        value: &str,
    ) -> StoreResult<Option<VerificationDoc>>;
    async fn verifications_by_identifier(
        &self,
        identifier: &str,
    ) -> StoreResult<Vec<VerificationDoc>>;
    async fn patch_verification(
        &self,
        id: &str,
        patch: VerificationPatch,
    ) -> StoreResult<Option<VerificationDoc>>;
    async fn delete_verification(&self, id: &str) -> StoreResult<bool>;
    async fn delete_verifications_for_identifier(&self, identifier: &str) -> StoreResult<u64>;
}
