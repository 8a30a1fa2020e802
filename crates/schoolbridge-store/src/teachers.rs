// Teacher directory: the domain principal collection.
//
// Owned by ordinary application mutations; the auth-linking fields
// (`auth_user_id`) are written only through `link_auth_user`, which the
// identity linker calls. Teacher email and auth-user id are unique indexes —
// the uniqueness is what resolves concurrent find-or-create races during
// sign-in, so it is enforced here and not by client-side locking.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use schoolbridge_core::id::generate_id;

use crate::doc::{NewTeacher, TeacherDoc};
use crate::error::StoreError;
use crate::identity::StoreResult;

/// Accessors for the teacher collection.
#[async_trait]
pub trait TeacherDirectory: Send + Sync + fmt::Debug {
    /// Insert a teacher, assigning an id and storing the email lowercase.
    /// Fails with a uniqueness violation when the email or auth-user id
    /// (where set) is already taken.
    async fn create(&self, teacher: NewTeacher) -> StoreResult<TeacherDoc>;

    async fn teacher_by_id(&self, id: &str) -> StoreResult<Option<TeacherDoc>>;

    /// Lookup by email; callers pass the email already lowercased.
    async fn teacher_by_email(&self, email: &str) -> StoreResult<Option<TeacherDoc>>;

    async fn teacher_by_auth_user(&self, auth_user_id: &str) -> StoreResult<Option<TeacherDoc>>;

    /// Attach the auth-user back-reference to an existing teacher.
    /// Returns the updated record, or `None` for an unknown id.
    async fn link_auth_user(
        &self,
        id: &str,
        auth_user_id: &str,
    ) -> StoreResult<Option<TeacherDoc>>;

    /// Soft delete / reactivate. Teachers are never hard-deleted by the
    /// bridge.
    async fn set_active(&self, id: &str, active: bool) -> StoreResult<Option<TeacherDoc>>;

    async fn active_teachers(&self) -> StoreResult<Vec<TeacherDoc>>;
}

/// Thread-safe in-memory teacher directory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTeacherDirectory {
    inner: Arc<RwLock<Vec<TeacherDoc>>>,
}

impl MemoryTeacherDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl TeacherDirectory for MemoryTeacherDirectory {
    async fn create(&self, teacher: NewTeacher) -> StoreResult<TeacherDoc> {
        let mut inner = self.inner.write().await;
        // Stored lowercase so the unique check and email lookups agree
        // regardless of how the invite was typed.
        let email = teacher.email.map(|e| e.to_lowercase());
        if let Some(ref email) = email {
            if inner.iter().any(|t| t.email.as_deref() == Some(email)) {
                return Err(StoreError::UniqueViolation {
                    collection: "teacher",
                    field: "email",
                });
            }
        }
        if let Some(ref auth_user_id) = teacher.auth_user_id {
            if inner
                .iter()
                .any(|t| t.auth_user_id.as_deref() == Some(auth_user_id))
            {
                return Err(StoreError::UniqueViolation {
                    collection: "teacher",
                    field: "authUserId",
                });
            }
        }

        let doc = TeacherDoc {
            id: generate_id(),
            first_name: teacher.first_name,
            last_name: teacher.last_name,
            email,
            auth_user_id: teacher.auth_user_id,
            is_active: teacher.is_active,
            created_by: teacher.created_by,
        };
        inner.push(doc.clone());
        Ok(doc)
    }

    async fn teacher_by_id(&self, id: &str) -> StoreResult<Option<TeacherDoc>> {
        let inner = self.inner.read().await;
        Ok(inner.iter().find(|t| t.id == id).cloned())
    }

    async fn teacher_by_email(&self, email: &str) -> StoreResult<Option<TeacherDoc>> {
        let inner = self.inner.read().await;
        Ok(inner.iter().find(|t| t.email.as_deref() == Some(email)).cloned())
    }

    async fn teacher_by_auth_user(&self, auth_user_id: &str) -> StoreResult<Option<TeacherDoc>> {
        let inner = self.inner.read().await;
        Ok(inner
            .iter()
            .find(|t| t.auth_user_id.as_deref() == Some(auth_user_id))
            .cloned())
    }

    async fn link_auth_user(
        &self,
        id: &str,
        auth_user_id: &str,
    ) -> StoreResult<Option<TeacherDoc>> {
        let mut inner = self.inner.write().await;
        if inner
            .iter()
            .any(|t| t.id != id && t.auth_user_id.as_deref() == Some(auth_user_id))
        {
            return Err(StoreError::UniqueViolation {
                collection: "teacher",
                field: "authUserId",
            });
        }
        let Some(teacher) = inner.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        teacher.auth_user_id = Some(auth_user_id.to_string());
        Ok(Some(teacher.clone()))
    }

    async fn set_active(&self, id: &str, active: bool) -> StoreResult<Option<TeacherDoc>> {
        let mut inner = self.inner.write().await;
        let Some(teacher) = inner.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        teacher.is_active = active;
        Ok(Some(teacher.clone()))
    }

    async fn active_teachers(&self) -> StoreResult<Vec<TeacherDoc>> {
        let inner = self.inner.read().await;
        Ok(inner.iter().filter(|t| t.is_active).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invited(email: &str) -> NewTeacher {
        NewTeacher {
            first_name: "Sam".into(),
            last_name: "Jones".into(),
            email: Some(email.into()),
            auth_user_id: None,
            is_active: true,
            created_by: "admin-1".into(),
        }
    }

    #[tokio::test]
    async fn test_create_assigns_id() {
        let dir = MemoryTeacherDirectory::new();
        let teacher = dir.create(invited("sam@example.com")).await.unwrap();
        assert!(!teacher.id.is_empty());
        assert_eq!(
            dir.teacher_by_id(&teacher.id).await.unwrap().unwrap().email,
            Some("sam@example.com".into())
        );
    }

    #[tokio::test]
    async fn test_email_uniqueness() {
        let dir = MemoryTeacherDirectory::new();
        dir.create(invited("sam@example.com")).await.unwrap();
        let err = dir.create(invited("sam@example.com")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                collection: "teacher",
                field: "email"
            }
        ));
    }

    #[tokio::test]
    async fn test_email_stored_lowercase() {
        let dir = MemoryTeacherDirectory::new();
        let teacher = dir.create(invited("Sam@Example.com")).await.unwrap();
        assert_eq!(teacher.email.as_deref(), Some("sam@example.com"));
        assert!(dir
            .teacher_by_email("sam@example.com")
            .await
            .unwrap()
            .is_some());

        // A differently-cased duplicate still trips the unique check.
        let err = dir.create(invited("SAM@EXAMPLE.COM")).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                collection: "teacher",
                field: "email"
            }
        ));
    }

    #[tokio::test]
    async fn test_auth_user_uniqueness() {
        let dir = MemoryTeacherDirectory::new();
        let mut first = invited("a@example.com");
        first.auth_user_id = Some("auth-1".into());
        dir.create(first).await.unwrap();

        let mut second = invited("b@example.com");
        second.auth_user_id = Some("auth-1".into());
        let err = dir.create(second).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::UniqueViolation {
                field: "authUserId",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_link_auth_user() {
        let dir = MemoryTeacherDirectory::new();
        let teacher = dir.create(invited("sam@example.com")).await.unwrap();
        assert!(teacher.auth_user_id.is_none());

        let linked = dir
            .link_auth_user(&teacher.id, "auth-9")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(linked.auth_user_id.as_deref(), Some("auth-9"));
        assert!(dir.teacher_by_auth_user("auth-9").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_link_unknown_id_is_none() {
        let dir = MemoryTeacherDirectory::new();
        assert!(dir.link_auth_user("missing", "auth-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_soft_delete_and_active_listing() {
        let dir = MemoryTeacherDirectory::new();
        let a = dir.create(invited("a@example.com")).await.unwrap();
        dir.create(invited("b@example.com")).await.unwrap();

        dir.set_active(&a.id, false).await.unwrap();
        let active = dir.active_teachers().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].email.as_deref(), Some("b@example.com"));

        // Reactivation restores visibility.
        dir.set_active(&a.id, true).await.unwrap();
        assert_eq!(dir.active_teachers().await.unwrap().len(), 2);
    }
}
