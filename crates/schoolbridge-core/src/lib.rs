#![doc = include_str!("../README.md")]

pub mod error;
pub mod id;
pub mod logger;
pub mod model;
pub mod query;
pub mod storage;
pub mod timestamp;

// Re-exports for convenience
pub use error::{BridgeError, BridgeResult};
pub use logger::{BridgeLogger, LogHandler, LogLevel, LoggerConfig};
pub use model::{AuthAccount, AuthModel, AuthSession, AuthUser, AuthVerification};
pub use query::{Operator, WhereClause};
pub use storage::AuthStorage;
pub use timestamp::{normalize_epoch_millis, to_datetime, SECONDS_CUTOFF_MS};
