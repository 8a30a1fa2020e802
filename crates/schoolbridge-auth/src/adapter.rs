// The storage adapter the external auth library drives.
//
// Dispatch is keyed by the closed `AuthModel` enum and by which equality
// clauses are present, routed to the most specific indexed lookup the store
// offers. Timestamp normalization and session token/id aliasing happen in
// `convert`; nothing above or below this layer knows about either.

use std::sync::Arc;

use async_trait::async_trait;

use schoolbridge_core::error::BridgeResult;
use schoolbridge_core::logger::BridgeLogger;
use schoolbridge_core::model::AuthModel;
use schoolbridge_core::query::{eq_str, WhereClause};
use schoolbridge_core::storage::AuthStorage;
use schoolbridge_store::doc::{AccountDoc, SessionDoc, UserDoc, VerificationDoc};
use schoolbridge_store::identity::IdentityStore;

use crate::convert;

/// Implements [`AuthStorage`] against an injected [`IdentityStore`].
///
/// The store client's lifecycle (construction, connection reuse, shutdown)
/// belongs to the host application.
#[derive(Debug, Clone)]
pub struct IdentityAdapter {
    store: Arc<dyn IdentityStore>,
    logger: BridgeLogger,
}

impl IdentityAdapter {
    pub fn new(store: Arc<dyn IdentityStore>, logger: BridgeLogger) -> Self {
        Self { store, logger }
    }

    async fn find_one_user(&self, clauses: &[WhereClause]) -> BridgeResult<Option<UserDoc>> {
        if let Some(id) = eq_str(clauses, "id") {
            return Ok(self.store.user_by_id(id).await?);
        }
        if let Some(email) = eq_str(clauses, "email") {
            return Ok(self.store.user_by_email(&email.to_lowercase()).await?);
        }
        Ok(None)
    }

    async fn find_one_account(&self, clauses: &[WhereClause]) -> BridgeResult<Option<AccountDoc>> {
        if let (Some(provider), Some(account)) =
            (eq_str(clauses, "providerId"), eq_str(clauses, "accountId"))
        {
            return Ok(self.store.account_by_provider(provider, account).await?);
        }
        if let Some(id) = eq_str(clauses, "id") {
            return Ok(self.store.account_by_id(id).await?);
        }
        Ok(None)
    }

    /// Token and id are one value; either clause resolves the same record.
    async fn find_one_session(&self, clauses: &[WhereClause]) -> BridgeResult<Option<SessionDoc>> {
        if let Some(key) = eq_str(clauses, "token").or_else(|| eq_str(clauses, "id")) {
            return Ok(self.store.session_by_id(key).await?);
        }
        Ok(None)
    }

    /// Call sites hold different subsets of {id, value, identifier}, so each
    /// applicable strategy is tried in order and the first hit wins.
    async fn find_one_verification(
        &self,
        clauses: &[WhereClause],
    ) -> BridgeResult<Option<VerificationDoc>> {
        let by_id = eq_str(clauses, "id");
        let by_value = eq_str(clauses, "value");
        let by_identifier = eq_str(clauses, "identifier");

        if let Some(id) = by_id {
            if let Some(row) = self.store.verification_by_id(id).await? {
                return Ok(Some(row));
            }
        }
        if let Some(value) = by_value {
            if let Some(row) = self.store.verification_by_value(value).await? {
                return Ok(Some(row));
            }
        }
        if let (Some(identifier), Some(value)) = (by_identifier, by_value) {
            if let Some(row) = self
                .store
                .verification_by_identifier_value(identifier, value)
                .await?
            {
                return Ok(Some(row));
            }
        }
        if let (Some(identifier), None) = (by_identifier, by_value) {
            let rows = self.store.verifications_by_identifier(identifier).await?;
            if let Some(row) = rows.into_iter().next() {
                return Ok(Some(row));
            }
        }
        // Last resort: some callers pass a token under an arbitrary field
        // name. Try the first clause's value against both id and value.
        if let Some(candidate) = clauses.first().and_then(|c| c.value.as_str()) {
            self.logger
                .debug(&format!("verification lookup falling back on `{candidate}`"));
            if let Some(row) = self.store.verification_by_id(candidate).await? {
                return Ok(Some(row));
            }
            if let Some(row) = self.store.verification_by_value(candidate).await? {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    /// Resolve the target of an update/delete. The auth library addresses
    /// these by primary key, with two grounded exceptions: users may be
    /// addressed by email and accounts by their provider pair.
    async fn resolve_target_id(
        &self,
        model: AuthModel,
        clauses: &[WhereClause],
    ) -> BridgeResult<Option<String>> {
        match model {
            AuthModel::User => {
                if let Some(id) = eq_str(clauses, "id") {
                    return Ok(Some(id.to_string()));
                }
                if let Some(email) = eq_str(clauses, "email") {
                    return Ok(self
                        .store
                        .user_by_email(&email.to_lowercase())
                        .await?
                        .map(|u| u.id));
                }
                Ok(None)
            }
            AuthModel::Account => {
                if let Some(id) = eq_str(clauses, "id") {
                    return Ok(Some(id.to_string()));
                }
                if let (Some(provider), Some(account)) =
                    (eq_str(clauses, "providerId"), eq_str(clauses, "accountId"))
                {
                    return Ok(self
                        .store
                        .account_by_provider(provider, account)
                        .await?
                        .map(|a| a.id));
                }
                Ok(None)
            }
            AuthModel::Session => Ok(eq_str(clauses, "token")
                .or_else(|| eq_str(clauses, "id"))
                .map(str::to_string)),
            AuthModel::Verification => Ok(eq_str(clauses, "id").map(str::to_string)),
        }
    }
}

#[async_trait]
impl AuthStorage for IdentityAdapter {
    async fn create(
        &self,
        model: AuthModel,
        data: serde_json::Value,
    ) -> BridgeResult<serde_json::Value> {
        self.logger.debug(&format!("create {model}"));
        match model {
            AuthModel::User => {
                let doc = convert::user_doc_from_create(&data)?;
                self.store.insert_user(doc.clone()).await?;
                convert::user_to_wire(&doc)
            }
            AuthModel::Account => {
                let doc = convert::account_doc_from_create(&data)?;
                self.store.insert_account(doc.clone()).await?;
                convert::account_to_wire(&doc)
            }
            AuthModel::Session => {
                let doc = convert::session_doc_from_create(&data)?;
                self.store.insert_session(doc.clone()).await?;
                convert::session_to_wire(&doc)
            }
            AuthModel::Verification => {
                let doc = convert::verification_doc_from_create(&data)?;
                self.store.insert_verification(doc.clone()).await?;
                convert::verification_to_wire(&doc)
            }
        }
    }

    async fn find_one(
        &self,
        model: AuthModel,
        where_clauses: &[WhereClause],
    ) -> BridgeResult<Option<serde_json::Value>> {
        self.logger.debug(&format!(
            "find_one {model} by [{}]",
            field_list(where_clauses)
        ));
        match model {
            AuthModel::User => self
                .find_one_user(where_clauses)
                .await?
                .map(|d| convert::user_to_wire(&d))
                .transpose(),
            AuthModel::Account => self
                .find_one_account(where_clauses)
                .await?
                .map(|d| convert::account_to_wire(&d))
                .transpose(),
            AuthModel::Session => self
                .find_one_session(where_clauses)
                .await?
                .map(|d| convert::session_to_wire(&d))
                .transpose(),
            AuthModel::Verification => self
                .find_one_verification(where_clauses)
                .await?
                .map(|d| convert::verification_to_wire(&d))
                .transpose(),
        }
    }

    async fn find_many(
        &self,
        model: AuthModel,
        where_clauses: &[WhereClause],
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> BridgeResult<Vec<serde_json::Value>> {
        self.logger.debug(&format!(
            "find_many {model} by [{}] limit={limit:?} offset={offset:?}",
            field_list(where_clauses)
        ));
        let rows: Vec<serde_json::Value> = match model {
            AuthModel::User => self
                .find_one_user(where_clauses)
                .await?
                .map(|d| convert::user_to_wire(&d))
                .transpose()?
                .into_iter()
                .collect(),
            AuthModel::Account => {
                if let Some(user_id) = eq_str(where_clauses, "userId") {
                    self.store
                        .accounts_for_user(user_id)
                        .await?
                        .iter()
                        .map(convert::account_to_wire)
                        .collect::<BridgeResult<_>>()?
                } else {
                    self.find_one_account(where_clauses)
                        .await?
                        .map(|d| convert::account_to_wire(&d))
                        .transpose()?
                        .into_iter()
                        .collect()
                }
            }
            AuthModel::Session => {
                if let Some(user_id) = eq_str(where_clauses, "userId") {
                    self.store
                        .sessions_for_user(user_id)
                        .await?
                        .iter()
                        .map(convert::session_to_wire)
                        .collect::<BridgeResult<_>>()?
                } else {
                    self.find_one_session(where_clauses)
                        .await?
                        .map(|d| convert::session_to_wire(&d))
                        .transpose()?
                        .into_iter()
                        .collect()
                }
            }
            AuthModel::Verification => {
                if let Some(id) = eq_str(where_clauses, "id") {
                    self.store
                        .verification_by_id(id)
                        .await?
                        .map(|d| convert::verification_to_wire(&d))
                        .transpose()?
                        .into_iter()
                        .collect()
                } else if let Some(identifier) = eq_str(where_clauses, "identifier") {
                    self.store
                        .verifications_by_identifier(identifier)
                        .await?
                        .iter()
                        .map(convert::verification_to_wire)
                        .collect::<BridgeResult<_>>()?
                } else if let Some(value) = eq_str(where_clauses, "value") {
                    self.store
                        .verification_by_value(value)
                        .await?
                        .map(|d| convert::verification_to_wire(&d))
                        .transpose()?
                        .into_iter()
                        .collect()
                } else {
                    Vec::new()
                }
            }
        };

        let offset = offset.unwrap_or(0);
        let sliced = rows
            .into_iter()
            .skip(offset)
            .take(limit.unwrap_or(usize::MAX))
            .collect();
        Ok(sliced)
    }

    async fn update(
        &self,
        model: AuthModel,
        where_clauses: &[WhereClause],
        patch: serde_json::Value,
    ) -> BridgeResult<Option<serde_json::Value>> {
        let Some(id) = self.resolve_target_id(model, where_clauses).await? else {
            self.logger
                .debug(&format!("update {model}: no resolvable target"));
            return Ok(None);
        };
        match model {
            AuthModel::User => {
                let patch = convert::user_patch_from_value(&patch)?;
                self.store
                    .patch_user(&id, patch)
                    .await?
                    .map(|d| convert::user_to_wire(&d))
                    .transpose()
            }
            AuthModel::Account => {
                let patch = convert::account_patch_from_value(&patch)?;
                self.store
                    .patch_account(&id, patch)
                    .await?
                    .map(|d| convert::account_to_wire(&d))
                    .transpose()
            }
            AuthModel::Session => {
                let patch = convert::session_patch_from_value(&patch)?;
                self.store
                    .patch_session(&id, patch)
                    .await?
                    .map(|d| convert::session_to_wire(&d))
                    .transpose()
            }
            AuthModel::Verification => {
                let patch = convert::verification_patch_from_value(&patch)?;
                self.store
                    .patch_verification(&id, patch)
                    .await?
                    .map(|d| convert::verification_to_wire(&d))
                    .transpose()
            }
        }
    }

    async fn delete(&self, model: AuthModel, where_clauses: &[WhereClause]) -> BridgeResult<()> {
        let Some(id) = self.resolve_target_id(model, where_clauses).await? else {
            return Ok(());
        };
        match model {
            AuthModel::User => self.store.delete_user(&id).await?,
            AuthModel::Account => self.store.delete_account(&id).await?,
            AuthModel::Session => self.store.delete_session(&id).await?,
            AuthModel::Verification => self.store.delete_verification(&id).await?,
        };
        Ok(())
    }

    async fn delete_many(
        &self,
        model: AuthModel,
        where_clauses: &[WhereClause],
    ) -> BridgeResult<u64> {
        self.logger.debug(&format!(
            "delete_many {model} by [{}]",
            field_list(where_clauses)
        ));
        // Batch forms first, then fall back to id resolution.
        match model {
            AuthModel::Verification => {
                if let Some(identifier) = eq_str(where_clauses, "identifier") {
                    return Ok(self
                        .store
                        .delete_verifications_for_identifier(identifier)
                        .await?);
                }
            }
            AuthModel::Session => {
                if let Some(user_id) = eq_str(where_clauses, "userId") {
                    return Ok(self.store.delete_sessions_for_user(user_id).await?);
                }
            }
            AuthModel::Account => {
                if let Some(user_id) = eq_str(where_clauses, "userId") {
                    return Ok(self.store.delete_accounts_for_user(user_id).await?);
                }
            }
            AuthModel::User => {}
        }

        let Some(id) = self.resolve_target_id(model, where_clauses).await? else {
            return Ok(0);
        };
        let removed = match model {
            AuthModel::User => self.store.delete_user(&id).await?,
            AuthModel::Account => self.store.delete_account(&id).await?,
            AuthModel::Session => self.store.delete_session(&id).await?,
            AuthModel::Verification => self.store.delete_verification(&id).await?,
        };
        Ok(u64::from(removed))
    }
}

fn field_list(clauses: &[WhereClause]) -> String {
    clauses
        .iter()
        .map(|c| c.field.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
