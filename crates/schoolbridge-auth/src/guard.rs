// Route-level authentication guard.
//
// The single entry point protected handlers call before doing work: resolve
// the session token, ensure a Teacher exists, reject inactive teachers. The
// caller maps the error to a status via `BridgeError::http_status` and keeps
// the response body generic.

use schoolbridge_core::error::{BridgeError, BridgeResult};
use schoolbridge_core::logger::BridgeLogger;

use crate::linking::IdentityLinker;

/// The identity a protected route acts as once the guard passes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedTeacher {
    pub teacher_id: String,
    pub auth_user_id: String,
    pub email: String,
}

/// Session check for protected routes.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    linker: IdentityLinker,
    logger: BridgeLogger,
    clock_skew_secs: i64,
}

impl SessionGuard {
    pub fn new(linker: IdentityLinker, logger: BridgeLogger, clock_skew_secs: i64) -> Self {
        Self {
            linker,
            logger,
            clock_skew_secs,
        }
    }

    /// Authenticate a request by its session token (usually from a cookie).
    ///
    /// Fails with [`BridgeError::AuthenticationRequired`] when the token is
    /// absent, unknown, or expired beyond the configured clock skew, and
    /// when the resolved teacher has been deactivated.
    pub async fn authenticate(&self, token: Option<&str>) -> BridgeResult<AuthenticatedTeacher> {
        let user = self
            .linker
            .resolve_session_user_with_skew(token, self.clock_skew_secs)
            .await?;
        let teacher = self
            .linker
            .ensure_teacher_for_identity(&user.id, Some(&user.email), Some(&user.name))
            .await?;
        if !teacher.is_active {
            self.logger
                .debug(&format!("teacher {} is deactivated", teacher.id));
            return Err(BridgeError::AuthenticationRequired);
        }
        Ok(AuthenticatedTeacher {
            teacher_id: teacher.id,
            auth_user_id: user.id,
            email: user.email,
        })
    }
}
