// Identity linking and guard behavior through the assembled bridge.

use std::sync::Arc;

use serde_json::json;

use schoolbridge_auth::{BridgeOptions, SchoolBridge};
use schoolbridge_core::error::BridgeError;
use schoolbridge_core::logger::LoggerConfig;
use schoolbridge_core::model::AuthModel;
use schoolbridge_core::storage::AuthStorage;
use schoolbridge_store::doc::NewTeacher;
use schoolbridge_store::teachers::TeacherDirectory;
use schoolbridge_store::{MemoryIdentityStore, MemoryTeacherDirectory};

struct Harness {
    bridge: SchoolBridge,
    teachers: Arc<MemoryTeacherDirectory>,
}

fn harness() -> Harness {
    harness_with_skew(0)
}

fn harness_with_skew(skew_secs: i64) -> Harness {
    let teachers = Arc::new(MemoryTeacherDirectory::new());
    let bridge = SchoolBridge::new(
        BridgeOptions {
            logger: LoggerConfig {
                disabled: true,
                ..Default::default()
            },
            session_clock_skew_secs: skew_secs,
        },
        Arc::new(MemoryIdentityStore::new()),
        teachers.clone(),
    );
    Harness { bridge, teachers }
}

/// Seed a signed-in user the way the auth library would: a user record plus
/// a live session.
async fn sign_in(bridge: &SchoolBridge, user_id: &str, email: &str, name: &str, token: &str) {
    sign_in_with_expiry(
        bridge,
        user_id,
        email,
        name,
        token,
        chrono::Utc::now().timestamp_millis() + 3_600_000,
    )
    .await;
}

async fn sign_in_with_expiry(
    bridge: &SchoolBridge,
    user_id: &str,
    email: &str,
    name: &str,
    token: &str,
    expires_at: i64,
) {
    bridge
        .adapter()
        .create(
            AuthModel::User,
            json!({"id": user_id, "email": email, "name": name}),
        )
        .await
        .unwrap();
    bridge
        .adapter()
        .create(
            AuthModel::Session,
            json!({"token": token, "userId": user_id, "expiresAt": expires_at}),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_new_user_gets_teacher_from_display_name() {
    let h = harness();
    sign_in(&h.bridge, "u1", "jane@x.com", "Jane Doe", "tok-1").await;

    let teacher_id = h.bridge.linker().ensure_teacher("tok-1").await.unwrap();
    let teacher = h
        .teachers
        .teacher_by_id(&teacher_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(teacher.first_name, "Jane");
    assert_eq!(teacher.last_name, "Doe");
    assert_eq!(teacher.email.as_deref(), Some("jane@x.com"));
    assert_eq!(teacher.auth_user_id.as_deref(), Some("u1"));
    assert!(teacher.is_active);
}

#[tokio::test]
async fn test_linking_twice_yields_one_teacher() {
    let h = harness();
    sign_in(&h.bridge, "u1", "jane@x.com", "Jane Doe", "tok-1").await;

    let first = h.bridge.linker().ensure_teacher("tok-1").await.unwrap();
    let second = h.bridge.linker().ensure_teacher("tok-1").await.unwrap();
    assert_eq!(first, second);
    assert_eq!(h.teachers.len().await, 1);
}

#[tokio::test]
async fn test_invited_teacher_linked_case_insensitively() {
    let h = harness();
    let invited = h
        .teachers
        .create(NewTeacher {
            first_name: "Sam".into(),
            last_name: "Jones".into(),
            email: Some("sam@example.com".into()),
            auth_user_id: None,
            is_active: true,
            created_by: "admin-1".into(),
        })
        .await
        .unwrap();

    sign_in(&h.bridge, "u1", "Sam@Example.com", "Sam Jones", "tok-1").await;
    let teacher_id = h.bridge.linker().ensure_teacher("tok-1").await.unwrap();

    assert_eq!(teacher_id, invited.id);
    assert_eq!(h.teachers.len().await, 1);
    let linked = h.teachers.teacher_by_id(&invited.id).await.unwrap().unwrap();
    assert_eq!(linked.auth_user_id.as_deref(), Some("u1"));
}

#[tokio::test]
async fn test_missing_email_creates_no_teacher() {
    let h = harness();
    let err = h
        .bridge
        .linker()
        .ensure_teacher_for_identity("u1", None, Some("Jane Doe"))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::MissingEmail));
    assert!(h.teachers.is_empty().await);

    let err = h
        .bridge
        .linker()
        .ensure_teacher_for_identity("u1", Some("  "), Some("Jane Doe"))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::MissingEmail));
    assert!(h.teachers.is_empty().await);
}

#[tokio::test]
async fn test_nameless_user_gets_placeholder_teacher() {
    let h = harness();
    let teacher = h
        .bridge
        .linker()
        .ensure_teacher_for_identity("u1", Some("anon@x.com"), None)
        .await
        .unwrap();
    assert_eq!(teacher.first_name, "Unknown");
    assert_eq!(teacher.last_name, "User");
}

#[tokio::test]
async fn test_guard_accepts_live_session() {
    let h = harness();
    sign_in(&h.bridge, "u1", "jane@x.com", "Jane Doe", "tok-1").await;

    let authed = h.bridge.guard().authenticate(Some("tok-1")).await.unwrap();
    assert_eq!(authed.auth_user_id, "u1");
    assert_eq!(authed.email, "jane@x.com");
    assert_eq!(
        Some(authed.teacher_id.as_str()),
        h.teachers
            .teacher_by_auth_user("u1")
            .await
            .unwrap()
            .map(|t| t.id)
            .as_deref()
    );
}

#[tokio::test]
async fn test_guard_rejects_missing_and_unknown_tokens() {
    let h = harness();
    for token in [None, Some("no-such-token")] {
        let err = h.bridge.guard().authenticate(token).await.unwrap_err();
        assert!(matches!(err, BridgeError::AuthenticationRequired));
    }
}

#[tokio::test]
async fn test_guard_rejects_expired_session_within_skew_tolerance() {
    let expired_at = chrono::Utc::now().timestamp_millis() - 10_000;

    let strict = harness();
    sign_in_with_expiry(&strict.bridge, "u1", "a@x.com", "A B", "tok-1", expired_at).await;
    let err = strict
        .bridge
        .guard()
        .authenticate(Some("tok-1"))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::AuthenticationRequired));

    // The same 10s-stale session passes under a 30s skew allowance.
    let lenient = harness_with_skew(30);
    sign_in_with_expiry(&lenient.bridge, "u1", "a@x.com", "A B", "tok-1", expired_at).await;
    assert!(lenient
        .bridge
        .guard()
        .authenticate(Some("tok-1"))
        .await
        .is_ok());
}

#[tokio::test]
async fn test_guard_rejects_deactivated_teacher() {
    let h = harness();
    sign_in(&h.bridge, "u1", "jane@x.com", "Jane Doe", "tok-1").await;

    let teacher_id = h.bridge.linker().ensure_teacher("tok-1").await.unwrap();
    h.teachers.set_active(&teacher_id, false).await.unwrap();

    let err = h.bridge.guard().authenticate(Some("tok-1")).await.unwrap_err();
    assert!(matches!(err, BridgeError::AuthenticationRequired));
}

#[tokio::test]
async fn test_email_claimed_by_other_identity_conflicts() {
    let h = harness();
    h.bridge
        .linker()
        .ensure_teacher_for_identity("u1", Some("shared@x.com"), Some("First Owner"))
        .await
        .unwrap();

    let err = h
        .bridge
        .linker()
        .ensure_teacher_for_identity("u2", Some("shared@x.com"), Some("Second Owner"))
        .await
        .unwrap_err();
    assert!(matches!(err, BridgeError::UniqueViolation { .. }));
    assert_eq!(h.teachers.len().await, 1);
}
