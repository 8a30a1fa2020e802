// Store-level errors.
//
// Absence is not an error anywhere in the store; accessors return `Ok(None)`
// or empty vectors. These variants cover constraint violations and backend
// failures only.

use schoolbridge_core::error::BridgeError;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An insert or patch would duplicate a unique index.
    #[error("Unique constraint violated on {collection}.{field}")]
    UniqueViolation {
        collection: &'static str,
        field: &'static str,
    },

    /// Transport or backend failure from the underlying document store.
    #[error("Store backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(self, Self::UniqueViolation { .. })
    }
}

impl From<StoreError> for BridgeError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::UniqueViolation { collection, field } => {
                BridgeError::UniqueViolation { collection, field }
            }
            StoreError::Backend(msg) => BridgeError::Store(msg),
        }
    }
}
