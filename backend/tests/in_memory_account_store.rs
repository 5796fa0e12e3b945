//! Behavioural tests for `AccountStore` over the in-process repository.

use std::sync::Arc;

use account_store::domain::{
    AccountStore, Email, ErrorKind, Preferences, PreferencesUpdate, UserDeletion,
};
use account_store::outbound::memory::InMemoryAccountRepository;
use futures::future::join_all;
use rstest::{fixture, rstest};
use serde_json::json;

mod support;

use support::{email, token, user};

struct Harness {
    store: AccountStore<InMemoryAccountRepository>,
    repository: Arc<InMemoryAccountRepository>,
}

#[fixture]
fn harness() -> Harness {
    let repository = Arc::new(InMemoryAccountRepository::new());
    Harness {
        store: AccountStore::new(Arc::clone(&repository)),
        repository,
    }
}

#[rstest]
#[tokio::test]
async fn duplicate_email_conflicts_and_keeps_one_record(harness: Harness) {
    harness
        .store
        .add_user(&user("Ada", "a@x.com"))
        .await
        .expect("first registration");

    let err = harness
        .store
        .add_user(&user("Imposter", "a@x.com"))
        .await
        .expect_err("second registration");

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(harness.repository.user_count().expect("count"), 1);
    let stored = harness
        .store
        .get_user(&email("a@x.com"))
        .await
        .expect("original user");
    assert_eq!(stored.name().as_ref(), "Ada");
}

#[rstest]
#[tokio::test]
async fn unknown_email_is_not_found(harness: Harness) {
    let err = harness
        .store
        .get_user(&email("nobody@x.com"))
        .await
        .expect_err("no such user");

    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[rstest]
#[tokio::test]
async fn second_session_for_user_conflicts(harness: Harness) {
    harness
        .store
        .create_session(&email("a@x.com"), token("t-1"))
        .await
        .expect("first session");

    let err = harness
        .store
        .create_session(&email("a@x.com"), token("t-2"))
        .await
        .expect_err("second session");

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(err.message().contains("user"));
}

#[rstest]
#[tokio::test]
async fn reused_token_conflicts_across_users(harness: Harness) {
    harness
        .store
        .create_session(&email("a@x.com"), token("shared"))
        .await
        .expect("first session");

    let err = harness
        .store
        .create_session(&email("b@x.com"), token("shared"))
        .await
        .expect_err("token reuse");

    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert!(err.message().contains("token"));
    let err = harness
        .store
        .get_user_session(&email("b@x.com"))
        .await
        .expect_err("no session was written for b");
    assert!(err.is_not_found());
}

#[rstest]
#[tokio::test]
async fn deleting_sessions_for_user_without_any_returns_zero(harness: Harness) {
    let removed = harness
        .store
        .delete_user_sessions(&email("a@x.com"))
        .await
        .expect("idempotent delete");

    assert_eq!(removed, 0);
}

#[rstest]
#[tokio::test]
async fn deleting_user_removes_their_sessions(harness: Harness) {
    let owner = email("a@x.com");
    harness
        .store
        .add_user(&user("Ada", "a@x.com"))
        .await
        .expect("register");
    harness
        .store
        .create_session(&owner, token("t-a"))
        .await
        .expect("login");

    let outcome = harness.store.delete_user(&owner).await.expect("delete");

    assert_eq!(
        outcome,
        UserDeletion::Deleted {
            sessions_removed: 1
        }
    );
    assert!(
        harness
            .store
            .get_user(&owner)
            .await
            .expect_err("user gone")
            .is_not_found()
    );
    assert!(
        harness
            .store
            .get_user_session(&owner)
            .await
            .expect_err("session gone")
            .is_not_found()
    );
    assert!(
        harness
            .store
            .get_session_by_token(&token("t-a"))
            .await
            .expect_err("token released")
            .is_not_found()
    );
}

#[rstest]
#[tokio::test]
async fn deleting_user_without_sessions_succeeds(harness: Harness) {
    harness
        .store
        .add_user(&user("Ada", "a@x.com"))
        .await
        .expect("register");

    let outcome = harness
        .store
        .delete_user(&email("a@x.com"))
        .await
        .expect("delete");

    assert_eq!(
        outcome,
        UserDeletion::Deleted {
            sessions_removed: 0
        }
    );
}

#[rstest]
#[tokio::test]
async fn deleting_missing_user_leaves_sessions_in_place(harness: Harness) {
    harness
        .store
        .create_session(&email("ghost@x.com"), token("t-ghost"))
        .await
        .expect("orphan session");

    let outcome = harness
        .store
        .delete_user(&email("ghost@x.com"))
        .await
        .expect("delete");

    assert_eq!(outcome, UserDeletion::NotFound);
    assert_eq!(harness.repository.session_count().expect("count"), 1);
}

#[rstest]
#[tokio::test]
async fn preferences_are_replaced_wholesale(harness: Harness) {
    let owner = email("a@x.com");
    let seeded = user("Ada", "a@x.com").with_preferences(
        Preferences::new()
            .with("theme", json!("light"))
            .with("lang", json!("en")),
    );
    harness.store.add_user(&seeded).await.expect("register");
    let dark = Preferences::new().with("theme", json!("dark"));

    let outcome = harness
        .store
        .update_user_preferences(&owner, Some(&dark))
        .await
        .expect("update");

    assert_eq!(outcome, PreferencesUpdate::Modified);
    let stored = harness.store.get_user(&owner).await.expect("user");
    assert_eq!(stored.preferences().to_value(), json!({"theme": "dark"}));
}

#[rstest]
#[tokio::test]
async fn absent_preferences_are_rejected_without_touching_storage(harness: Harness) {
    let owner = email("a@x.com");
    let seeded = user("Ada", "a@x.com")
        .with_preferences(Preferences::new().with("theme", json!("light")));
    harness.store.add_user(&seeded).await.expect("register");

    let err = harness
        .store
        .update_user_preferences(&owner, None)
        .await
        .expect_err("missing preferences");

    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    let stored = harness.store.get_user(&owner).await.expect("user");
    assert_eq!(stored.preferences().to_value(), json!({"theme": "light"}));
}

#[rstest]
#[tokio::test]
async fn nul_characters_are_rejected_as_invalid_arguments(harness: Harness) {
    let owner = email("a@x.com");
    harness
        .store
        .add_user(&user("Ada", "a@x.com"))
        .await
        .expect("register");
    let with_nul = Preferences::new().with("k", json!("a\u{0000}b"));

    let update = harness
        .store
        .update_user_preferences(&owner, Some(&with_nul))
        .await
        .expect_err("NUL preferences");
    let add = harness
        .store
        .add_user(&user("Bea", "b@x.com").with_preferences(with_nul))
        .await
        .expect_err("NUL preferences on insert");

    assert_eq!(update.kind(), ErrorKind::InvalidArgument);
    assert_eq!(add.kind(), ErrorKind::InvalidArgument);
    assert!(Email::new("x\u{0}y@x.com").is_err());
    assert_eq!(harness.repository.user_count().expect("count"), 1);
    let stored = harness.store.get_user(&owner).await.expect("user");
    assert!(stored.preferences().is_empty());
}

#[rstest]
#[tokio::test]
async fn identical_preferences_report_unchanged(harness: Harness) {
    let owner = email("a@x.com");
    let prefs = Preferences::new().with("theme", json!("dark"));
    harness
        .store
        .add_user(&user("Ada", "a@x.com").with_preferences(prefs.clone()))
        .await
        .expect("register");

    let outcome = harness
        .store
        .update_user_preferences(&owner, Some(&prefs))
        .await
        .expect("update");

    assert_eq!(outcome, PreferencesUpdate::Unchanged);
}

#[rstest]
#[tokio::test]
async fn preferences_for_missing_user_report_not_found(harness: Harness) {
    let outcome = harness
        .store
        .update_user_preferences(&email("nobody@x.com"), Some(&Preferences::new()))
        .await
        .expect("update");

    assert_eq!(outcome, PreferencesUpdate::UserNotFound);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_sessions_with_one_token_admit_exactly_one(harness: Harness) {
    let attempts = (0..16).map(|n| {
        let store = harness.store.clone();
        tokio::spawn(async move {
            store
                .create_session(&email(&format!("user{n}@x.com")), token("contested"))
                .await
        })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();

    let successes = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(successes, 1);
    assert!(
        results
            .iter()
            .filter_map(|result| result.as_ref().err())
            .all(|err| err.kind() == ErrorKind::Conflict)
    );
    assert_eq!(harness.repository.session_count().expect("count"), 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_logins_for_one_user_admit_exactly_one(harness: Harness) {
    let attempts = (0..16).map(|n| {
        let store = harness.store.clone();
        tokio::spawn(async move {
            store
                .create_session(&email("a@x.com"), token(&format!("t-{n}")))
                .await
        })
    });

    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|joined| joined.expect("task completes"))
        .collect();

    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    let session = harness
        .store
        .get_user_session(&email("a@x.com"))
        .await
        .expect("winning session");
    let winner = results
        .into_iter()
        .find_map(Result::ok)
        .expect("one success");
    assert_eq!(session.token(), winner.token());
}
