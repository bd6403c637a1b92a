use std::sync::Arc;

use tasklane::{
    auth::{SessionIdentity, SessionRecord, SessionService},
    storage::MemorySessionStore,
    Error,
};

use crate::support::{counting_service, identity, now_ms, unknown_token, UnreachableStore};

fn record_for(identity: &SessionIdentity, created_at: i64, expires_at: i64) -> SessionRecord {
    SessionRecord {
        user_id: identity.user_id,
        email: identity.email.clone(),
        name: identity.name.clone(),
        created_at,
        expires_at,
    }
}

#[tokio::test]
async fn created_session_lives_for_seven_days() {
    let (sessions, store) = counting_service();
    let issued = sessions.create_session(identity()).await.unwrap();

    let raw = store.raw_get(&format!("session:{}", issued.token)).await.unwrap();
    let record: SessionRecord = serde_json::from_str(&raw).unwrap();

    assert_eq!(record.expires_at - record.created_at, 604_800_000);
    assert_eq!(issued.expires_at, record.expires_at);
}

#[tokio::test]
async fn created_session_resolves_with_its_identity() {
    let (sessions, _) = counting_service();
    let who = identity();
    let issued = sessions.create_session(who.clone()).await.unwrap();

    let session = sessions.get_session(&issued.token).await.unwrap().unwrap();
    assert_eq!(session.identity(), who);
    assert_eq!(session.token, issued.token);
}

#[tokio::test]
async fn unknown_token_has_no_session() {
    let (sessions, _) = counting_service();
    assert!(sessions.get_session(&unknown_token()).await.unwrap().is_none());
}

#[tokio::test]
async fn malformed_token_never_reaches_the_store() {
    let (sessions, store) = counting_service();
    let uppercase = "A".repeat(64);
    let suffixed = format!("{}:x", unknown_token());

    for token in ["", "short", "*", uppercase.as_str(), suffixed.as_str()] {
        assert!(sessions.get_session(token).await.unwrap().is_none());
        assert!(sessions.refresh_session(token).await.unwrap().is_none());
        sessions.delete_session(token).await.unwrap();
    }

    assert_eq!(store.reads(), 0);
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn expired_record_is_purged_on_read() {
    let (sessions, store) = counting_service();
    let token = unknown_token();
    let key = format!("session:{}", token);
    let now = now_ms();
    store.plant(&key, &record_for(&identity(), now - 10_000, now - 1)).await;

    assert!(sessions.get_session(&token).await.unwrap().is_none());
    assert!(store.raw_get(&key).await.is_none());
}

#[tokio::test]
async fn refresh_rotates_the_token() {
    let (sessions, store) = counting_service();
    let who = identity();
    let old_token = unknown_token();
    let now = now_ms();
    store
        .plant(&format!("session:{}", old_token), &record_for(&who, now - 60_000, now + 60_000))
        .await;

    let issued = sessions.refresh_session(&old_token).await.unwrap().unwrap();
    assert_ne!(issued.token, old_token);
    assert!(issued.expires_at > now + 60_000);

    assert!(sessions.get_session(&old_token).await.unwrap().is_none());

    let renewed = sessions.get_session(&issued.token).await.unwrap().unwrap();
    assert_eq!(renewed.identity(), who);
    assert_eq!(renewed.expires_at, issued.expires_at);
}

#[tokio::test]
async fn refresh_of_unknown_token_writes_nothing() {
    let (sessions, store) = counting_service();

    assert!(sessions.refresh_session(&unknown_token()).await.unwrap().is_none());
    assert_eq!(store.writes(), 0);
}

#[tokio::test]
async fn refresh_of_expired_token_issues_nothing() {
    let (sessions, store) = counting_service();
    let token = unknown_token();
    let now = now_ms();
    store.plant(&format!("session:{}", token), &record_for(&identity(), now - 5_000, now - 1)).await;

    assert!(sessions.refresh_session(&token).await.unwrap().is_none());
    assert_eq!(store.puts.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn concurrent_refreshes_yield_one_successor() {
    let (sessions, _) = counting_service();
    let issued = sessions.create_session(identity()).await.unwrap();

    let (first, second) = tokio::join!(
        sessions.refresh_session(&issued.token),
        sessions.refresh_session(&issued.token)
    );
    let winners = [first.unwrap(), second.unwrap()].into_iter().flatten().count();

    assert_eq!(winners, 1);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let (sessions, _) = counting_service();
    let issued = sessions.create_session(identity()).await.unwrap();

    sessions.delete_session(&issued.token).await.unwrap();
    sessions.delete_session(&issued.token).await.unwrap();
    sessions.delete_session(&unknown_token()).await.unwrap();

    assert!(sessions.get_session(&issued.token).await.unwrap().is_none());
}

#[tokio::test]
async fn storage_failures_propagate() {
    let sessions = SessionService::new(Arc::new(UnreachableStore));

    let err = sessions.create_session(identity()).await.unwrap_err();
    assert!(matches!(err, Error::Storage { .. }));
    assert!(err.is_retryable());

    assert!(sessions.get_session(&unknown_token()).await.is_err());
    assert!(sessions.refresh_session(&unknown_token()).await.is_err());
    assert!(sessions.delete_session(&unknown_token()).await.is_err());
}

#[tokio::test]
async fn sessions_are_scoped_to_their_service_store() {
    let first = SessionService::new(Arc::new(MemorySessionStore::new()));
    let second = SessionService::new(Arc::new(MemorySessionStore::new()));

    let issued = first.create_session(identity()).await.unwrap();
    assert!(second.get_session(&issued.token).await.unwrap().is_none());
}
