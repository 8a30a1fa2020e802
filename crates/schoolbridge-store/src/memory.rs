// In-memory identity store.
//
// Vec-backed collections behind a `tokio::sync::RwLock`; insertion order is
// preserved, which is the ordering guarantee `find_many` exposes. Uniqueness
// checks are linear scans here; a hosted backend would use its indexes.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::doc::{
    AccountDoc, AccountPatch, SessionDoc, SessionPatch, UserDoc, UserPatch, VerificationDoc,
    VerificationPatch,
};
use crate::error::StoreError;
use crate::identity::{IdentityStore, StoreResult};

#[derive(Debug, Default)]
struct Collections {
    users: Vec<UserDoc>,
    accounts: Vec<AccountDoc>,
    sessions: Vec<SessionDoc>,
    verifications: Vec<VerificationDoc>,
}

/// Thread-safe in-memory identity store. Data is lost on drop.
#[derive(Debug, Clone, Default)]
pub struct MemoryIdentityStore {
    inner: Arc<RwLock<Collections>>,
}

impl MemoryIdentityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record counts per collection, for tests and debugging.
    pub async fn counts(&self) -> (usize, usize, usize, usize) {
        let inner = self.inner.read().await;
        (
            inner.users.len(),
            inner.accounts.len(),
            inner.sessions.len(),
            inner.verifications.len(),
        )
    }

    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        *inner = Collections::default();
    }
}

#[async_trait]
impl IdentityStore for MemoryIdentityStore {
    // ─── Users ───────────────────────────────────────────────────

    async fn insert_user(&self, doc: UserDoc) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.id == doc.id) {
            return Err(StoreError::UniqueViolation {
                collection: "user",
                field: "id",
            });
        }
        if inner.users.iter().any(|u| u.email == doc.email) {
            return Err(StoreError::UniqueViolation {
                collection: "user",
                field: "email",
            });
        }
        inner.users.push(doc);
        Ok(())
    }

    async fn user_by_id(&self, id: &str) -> StoreResult<Option<UserDoc>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> StoreResult<Option<UserDoc>> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.email == email).cloned())
    }

    async fn patch_user(&self, id: &str, patch: UserPatch) -> StoreResult<Option<UserDoc>> {
        let mut inner = self.inner.write().await;
        let Some(user) = inner.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(image) = patch.image {
            user.image = Some(image);
        }
        if let Some(verified) = patch.email_verified {
            user.email_verified = verified;
        }
        if let Some(updated_at) = patch.updated_at {
            user.updated_at = updated_at;
        }
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.users.len();
        inner.users.retain(|u| u.id != id);
        Ok(inner.users.len() < before)
    }

    // ─── Accounts ────────────────────────────────────────────────

    async fn insert_account(&self, doc: AccountDoc) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.accounts.iter().any(|a| a.id == doc.id) {
            return Err(StoreError::UniqueViolation {
                collection: "account",
                field: "id",
            });
        }
        if inner
            .accounts
            .iter()
            .any(|a| a.provider_id == doc.provider_id && a.account_id == doc.account_id)
        {
            return Err(StoreError::UniqueViolation {
                collection: "account",
                field: "providerId+accountId",
            });
        }
        inner.accounts.push(doc);
        Ok(())
    }

    async fn account_by_id(&self, id: &str) -> StoreResult<Option<AccountDoc>> {
        let inner = self.inner.read().await;
        Ok(inner.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn account_by_provider(
        &self,
        provider_id: &str,
        account_id: &str,
    ) -> StoreResult<Option<AccountDoc>> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .iter()
            .find(|a| a.provider_id == provider_id && a.account_id == account_id)
            .cloned())
    }

    async fn accounts_for_user(&self, user_id: &str) -> StoreResult<Vec<AccountDoc>> {
        let inner = self.inner.read().await;
        Ok(inner
            .accounts
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn patch_account(
        &self,
        id: &str,
        patch: AccountPatch,
    ) -> StoreResult<Option<AccountDoc>> {
        let mut inner = self.inner.write().await;
        let Some(account) = inner.accounts.iter_mut().find(|a| a.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.access_token {
            account.access_token = Some(v);
        }
        if let Some(v) = patch.refresh_token {
            account.refresh_token = Some(v);
        }
        if let Some(v) = patch.id_token {
            account.id_token = Some(v);
        }
        if let Some(v) = patch.scope {
            account.scope = Some(v);
        }
        if let Some(v) = patch.access_token_expires_at {
            account.access_token_expires_at = Some(v);
        }
        if let Some(v) = patch.refresh_token_expires_at {
            account.refresh_token_expires_at = Some(v);
        }
        if let Some(v) = patch.updated_at {
            account.updated_at = v;
        }
        Ok(Some(account.clone()))
    }

    async fn delete_account(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.accounts.len();
        inner.accounts.retain(|a| a.id != id);
        Ok(inner.accounts.len() < before)
    }

    async fn delete_accounts_for_user(&self, user_id: &str) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.accounts.len();
        inner.accounts.retain(|a| a.user_id != user_id);
        Ok((before - inner.accounts.len()) as u64)
    }

    // ─── Sessions ────────────────────────────────────────────────

    async fn insert_session(&self, doc: SessionDoc) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.sessions.iter().any(|s| s.id == doc.id) {
            return Err(StoreError::UniqueViolation {
                collection: "session",
                field: "id",
            });
        }
        inner.sessions.push(doc);
        Ok(())
    }

    async fn session_by_id(&self, id: &str) -> StoreResult<Option<SessionDoc>> {
        let inner = self.inner.read().await;
        Ok(inner.sessions.iter().find(|s| s.id == id).cloned())
    }

    async fn sessions_for_user(&self, user_id: &str) -> StoreResult<Vec<SessionDoc>> {
        let inner = self.inner.read().await;
        Ok(inner
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn patch_session(
        &self,
        id: &str,
        patch: SessionPatch,
    ) -> StoreResult<Option<SessionDoc>> {
        let mut inner = self.inner.write().await;
        let Some(session) = inner.sessions.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.expires_at {
            session.expires_at = v;
        }
        if let Some(v) = patch.ip_address {
            session.ip_address = Some(v);
        }
        if let Some(v) = patch.user_agent {
            session.user_agent = Some(v);
        }
        if let Some(v) = patch.updated_at {
            session.updated_at = v;
        }
        Ok(Some(session.clone()))
    }

    async fn delete_session(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.sessions.len();
        inner.sessions.retain(|s| s.id != id);
        Ok(inner.sessions.len() < before)
    }

    async fn delete_sessions_for_user(&self, user_id: &str) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.sessions.len();
        inner.sessions.retain(|s| s.user_id != user_id);
        Ok((before - inner.sessions.len()) as u64)
    }

    // ─── Verifications ───────────────────────────────────────────

    async fn insert_verification(&self, doc: VerificationDoc) -> StoreResult<()> {
        let mut inner = self.inner.write().await;
        if inner.verifications.iter().any(|v| v.id == doc.id) {
            return Err(StoreError::UniqueViolation {
                collection: "verification",
                field: "id",
            });
        }
        inner.verifications.push(doc);
        Ok(())
    }

    async fn verification_by_id(&self, id: &str) -> StoreResult<Option<VerificationDoc>> {
        let inner = self.inner.read().await;
        Ok(inner.verifications.iter().find(|v| v.id == id).cloned())
    }

    async fn verification_by_value(&self, value: &str) -> StoreResult<Option<VerificationDoc>> {
        let inner = self.inner.read().await;
        Ok(inner.verifications.iter().find(|v| v.value == value).cloned())
    }

    async fn verification_by_identifier_value(
        &self,
        identifier: &str,
        value: &str,
    ) -> StoreResult<Option<VerificationDoc>> {
        let inner = self.inner.read().await;
        Ok(inner
            .verifications
            .iter()
            .find(|v| v.identifier == identifier && v.value == value)
            .cloned())
    }

    async fn verifications_by_identifier(
        &self,
        identifier: &str,
    ) -> StoreResult<Vec<VerificationDoc>> {
        let inner = self.inner.read().await;
        Ok(inner
            .verifications
            .iter()
            .filter(|v| v.identifier == identifier)
            .cloned()
            .collect())
    }

    async fn patch_verification(
        &self,
        id: &str,
        patch: VerificationPatch,
    ) -> StoreResult<Option<VerificationDoc>> {
        let mut inner = self.inner.write().await;
        let Some(verification) = inner.verifications.iter_mut().find(|v| v.id == id) else {
            return Ok(None);
        };
        if let Some(v) = patch.identifier {
            verification.identifier = v;
        }
        if let Some(v) = patch.value {
            verification.value = v;
        }
        if let Some(v) = patch.expires_at {
            verification.expires_at = v;
        }
        if let Some(v) = patch.updated_at {
            verification.updated_at = v;
        }
        Ok(Some(verification.clone()))
    }

    async fn delete_verification(&self, id: &str) -> StoreResult<bool> {
        let mut inner = self.inner.write().await;
        let before = inner.verifications.len();
        inner.verifications.retain(|v| v.id != id);
        Ok(inner.verifications.len() < before)
    }

    async fn delete_verifications_for_identifier(&self, identifier: &str) -> StoreResult<u64> {
        let mut inner = self.inner.write().await;
        let before = inner.verifications.len();
        inner.verifications.retain(|v| v.identifier != identifier);
        Ok((before - inner.verifications.len()) as u64)
    }
}
