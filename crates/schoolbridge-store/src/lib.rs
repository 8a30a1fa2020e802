// schoolbridge-store — document shapes and store backends.
//
// The adapter composes these per-collection primitives; nothing here joins
// across collections or applies business validation.

pub mod doc;
pub mod error;
pub mod identity;
pub mod memory;
pub mod teachers;

pub use doc::{
    AccountDoc, AccountPatch, NewTeacher, SessionDoc, SessionPatch, TeacherDoc, UserDoc,
    UserPatch, VerificationDoc, VerificationPatch,
};
pub use error::StoreError;
pub use identity::IdentityStore;
pub use memory::MemoryIdentityStore;
pub use teachers::{MemoryTeacherDirectory, TeacherDirectory};
