// The storage contract the external auth library consumes.
//
// The library's internal logic knows nothing about the underlying document
// store; it issues these six operations against model names and equality
// where-clauses, and the adapter does the rest.

use std::fmt;

use async_trait::async_trait;

use crate::error::BridgeResult;
use crate::model::AuthModel;
use crate::query::WhereClause;

/// The operation contract an external auth library expects from its storage
/// backend. Implemented by the bridge's `IdentityAdapter`.
///
/// Records cross this boundary as JSON objects in the library's wire shape:
/// camelCase fields, RFC 3339 date values. Every method is a single
/// round-trip against the store; callers await completion, and lower-level
/// failures propagate unchanged.
#[async_trait]
pub trait AuthStorage: Send + Sync + fmt::Debug {
    /// Create a record. Timestamp-like input fields are normalized, an id is
    /// generated when absent, and the returned record restores date-typed
    /// fields. For sessions, `token` and `id` are the same value and the
    /// returned record carries both.
    async fn create(
        &self,
        model: AuthModel,
        data: serde_json::Value,
    ) -> BridgeResult<serde_json::Value>;

    /// Find a single record by the most specific equality clause available.
    /// `Ok(None)` when no applicable clause matches a record.
    async fn find_one(
        &self,
        model: AuthModel,
        where_clauses: &[WhereClause],
    ) -> BridgeResult<Option<serde_json::Value>>;

    /// Find records with the same dispatch discipline as [`find_one`],
    /// returned in insertion order and sliced by `offset` then `limit`.
    /// Empty, never an error, when nothing matches.
    ///
    /// [`find_one`]: AuthStorage::find_one
    async fn find_many(
        &self,
        model: AuthModel,
        where_clauses: &[WhereClause],
        limit: Option<usize>,
        offset: Option<usize>,
    ) -> BridgeResult<Vec<serde_json::Value>>;

    /// Partial update of the record resolved by an id-equality clause.
    /// Only fields present in `patch` are applied; timestamps in the patch
    /// are re-normalized. `Ok(None)` and no write when nothing matches.
    async fn update(
        &self,
        model: AuthModel,
        where_clauses: &[WhereClause],
        patch: serde_json::Value,
    ) -> BridgeResult<Option<serde_json::Value>>;

    /// Delete the record resolved the same way as [`update`]. No-op when
    /// nothing matches.
    ///
    /// [`update`]: AuthStorage::update
    async fn delete(&self, model: AuthModel, where_clauses: &[WhereClause]) -> BridgeResult<()>;

    /// Delete all matching records, returning how many were removed.
    /// Supports id resolution for every model plus batch forms:
    /// verification by `identifier`, session and account by `userId`.
    async fn delete_many(
        &self,
        model: AuthModel,
        where_clauses: &[WhereClause],
    ) -> BridgeResult<u64>;
}
