// Identity linking: find-or-create of the domain Teacher behind an
// authenticated user.
//
// Sign-in races are resolved by the teacher directory's unique indexes, not
// by client-side locking: the linker inserts optimistically and, on a
// uniqueness violation, re-reads the row the concurrent winner created.

use std::sync::Arc;

use schoolbridge_core::error::{BridgeError, BridgeResult};
use schoolbridge_core::logger::BridgeLogger;
use schoolbridge_store::doc::{NewTeacher, TeacherDoc, UserDoc};
use schoolbridge_store::identity::IdentityStore;
use schoolbridge_store::teachers::TeacherDirectory;

/// Resolves sessions to users and users to Teacher records.
#[derive(Debug, Clone)]
pub struct IdentityLinker {
    store: Arc<dyn IdentityStore>,
    teachers: Arc<dyn TeacherDirectory>,
    logger: BridgeLogger,
}

impl IdentityLinker {
    pub fn new(
        store: Arc<dyn IdentityStore>,
        teachers: Arc<dyn TeacherDirectory>,
        logger: BridgeLogger,
    ) -> Self {
        Self {
            store,
            teachers,
            logger,
        }
    }

    /// Resolve a session token to its user. Missing token, unknown token,
    /// expired session, and dangling user reference all collapse into
    /// [`BridgeError::AuthenticationRequired`]; the distinction is logged
    /// server-side, never surfaced.
    pub async fn resolve_session_user(&self, token: Option<&str>) -> BridgeResult<UserDoc> {
        self.resolve_session_user_with_skew(token, 0).await
    }

    /// Like [`resolve_session_user`], accepting a session past its expiry by
    /// up to `skew_secs` to tolerate clock drift between hosts.
    ///
    /// [`resolve_session_user`]: IdentityLinker::resolve_session_user
    pub async fn resolve_session_user_with_skew(
        &self,
        token: Option<&str>,
        skew_secs: i64,
    ) -> BridgeResult<UserDoc> {
        let Some(token) = token else {
            return Err(BridgeError::AuthenticationRequired);
        };
        let Some(session) = self.store.session_by_id(token).await? else {
            self.logger.debug("session token not found");
            return Err(BridgeError::AuthenticationRequired);
        };
        let now = chrono::Utc::now().timestamp_millis();
        if session.expires_at + skew_secs * 1000 <= now {
            self.logger.debug("session expired");
            return Err(BridgeError::AuthenticationRequired);
        }
        let Some(user) = self.store.user_by_id(&session.user_id).await? else {
            self.logger
                .warn(&format!("session {} references a missing user", session.id));
            return Err(BridgeError::AuthenticationRequired);
        };
        Ok(user)
    }

    /// Resolve the session and return the id of its Teacher, creating or
    /// linking one as needed.
    pub async fn ensure_teacher(&self, token: &str) -> BridgeResult<String> {
        let user = self.resolve_session_user(Some(token)).await?;
        let teacher = self
            .ensure_teacher_for_identity(&user.id, Some(&user.email), Some(&user.name))
            .await?;
        Ok(teacher.id)
    }

    /// Find-or-create the Teacher for an authenticated identity.
    ///
    /// Resolution order:
    /// 1. A teacher already linked to this auth user wins outright.
    /// 2. An unlinked teacher with the same email (an administrator invite)
    ///    is linked in place.
    /// 3. Otherwise a new active teacher is created from the display name.
    ///
    /// Steps 2 and 3 can lose a concurrent race; both recover by re-reading
    /// under the auth-user index.
    pub async fn ensure_teacher_for_identity(
        &self,
        auth_user_id: &str,
        email: Option<&str>,
        display_name: Option<&str>,
    ) -> BridgeResult<TeacherDoc> {
        if let Some(existing) = self.teachers.teacher_by_auth_user(auth_user_id).await? {
            return Ok(existing);
        }

        let email = match email {
            Some(e) if !e.trim().is_empty() => e.trim().to_lowercase(),
            _ => return Err(BridgeError::MissingEmail),
        };

        if let Some(invited) = self.teachers.teacher_by_email(&email).await? {
            match invited.auth_user_id.as_deref() {
                None => {
                    match self.teachers.link_auth_user(&invited.id, auth_user_id).await {
                        Ok(Some(linked)) => {
                            self.logger.success(&format!(
                                "linked invited teacher {} to auth user {auth_user_id}",
                                linked.id
                            ));
                            return Ok(linked);
                        }
                        Ok(None) => {
                            // Teacher row vanished between read and link.
                            return self.recover_from_race(auth_user_id).await;
                        }
                        Err(err) if err.is_unique_violation() => {
                            return self.recover_from_race(auth_user_id).await;
                        }
                        Err(err) => return Err(err.into()),
                    }
                }
                Some(owner) if owner == auth_user_id => return Ok(invited),
                // The email belongs to a teacher linked to a different
                // identity. Creating another teacher would duplicate the
                // email, so surface the conflict.
                Some(_) => {
                    self.logger.warn(&format!(
                        "teacher email {email} already linked to a different auth user"
                    ));
                    return Err(BridgeError::UniqueViolation {
                        collection: "teacher",
                        field: "email",
                    });
                }
            }
        }

        let (first_name, last_name) = split_display_name(display_name);
        let new_teacher = NewTeacher {
            first_name,
            last_name,
            email: Some(email),
            auth_user_id: Some(auth_user_id.to_string()),
            is_active: true,
            created_by: auth_user_id.to_string(),
        };
        match self.teachers.create(new_teacher).await {
            Ok(created) => {
                self.logger.success(&format!(
                    "created teacher {} for auth user {auth_user_id}",
                    created.id
                ));
                Ok(created)
            }
            Err(err) if err.is_unique_violation() => self.recover_from_race(auth_user_id).await,
            Err(err) => Err(err.into()),
        }
    }

    /// A concurrent sign-in won the insert or link. The winner's row is
    /// visible under the auth-user index by the time our write failed.
    async fn recover_from_race(&self, auth_user_id: &str) -> BridgeResult<TeacherDoc> {
        self.logger
            .debug(&format!("teacher write lost a race for {auth_user_id}, re-reading"));
        match self.teachers.teacher_by_auth_user(auth_user_id).await? {
            Some(winner) => Ok(winner),
            None => Err(BridgeError::UniqueViolation {
                collection: "teacher",
                field: "email",
            }),
        }
    }
}

/// Split a display name into first/last. The first whitespace-separated token
/// is the first name and everything after it the last name, which may be
/// empty. Absent names get placeholders an administrator can correct later.
fn split_display_name(display_name: Option<&str>) -> (String, String) {
    let trimmed = display_name.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return ("Unknown".to_string(), "User".to_string());
    }
    let mut parts = trimmed.split_whitespace();
    let first = parts.next().unwrap_or("Unknown").to_string();
    let rest = parts.collect::<Vec<_>>().join(" ");
    (first, rest)
}
