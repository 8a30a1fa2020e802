// schoolbridge-auth — adapter, identity linking, and guards.
//
// Wires the external auth library's storage contract onto the identity store
// and resolves authenticated users into domain Teacher records.

pub mod adapter;
pub mod convert;
pub mod guard;
pub mod init;
pub mod linking;
pub mod options;

pub use adapter::IdentityAdapter;
pub use guard::{AuthenticatedTeacher, SessionGuard};
pub use init::SchoolBridge;
pub use linking::IdentityLinker;
pub use options::BridgeOptions;
