//! Recovery coordination integration tests
//!
//! Exercises the observer-side convention: the recovery snapshot is read once
//! at attach time and written on every transition into or out of Paused. The
//! in-memory store stands in for the durable one; a pre-seeded store models a
//! snapshot written by a previous process.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use tickdown::engine::{self, AttachmentManager};
use tickdown::recovery::{MemoryStore, RecoverySnapshot, RecoveryStore};
use tickdown::state::{AppState, Phase, RecoveryOutcome, ToggleOutcome};

async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

fn build_app(default_initial: u64, store: Arc<dyn RecoveryStore>) -> Arc<AppState> {
    let attachments = Arc::new(AttachmentManager::new());
    let engine = engine::spawn(Arc::clone(&attachments));
    Arc::new(AppState::new(
        20661,
        "127.0.0.1".to_string(),
        default_initial,
        engine,
        attachments,
        store,
    ))
}

#[tokio::test(start_paused = true)]
async fn fresh_attach_resumes_a_paused_run_at_the_saved_value() {
    // a previous process paused at 42 seconds and was restarted
    let store = Arc::new(MemoryStore::with_snapshot(RecoverySnapshot::paused_at(42)));
    let app = build_app(100, Arc::clone(&store) as Arc<dyn RecoveryStore>);

    let mut attachment = app.attach();
    let outcome = app.recover_on_attach().unwrap();
    assert_eq!(outcome, RecoveryOutcome::Resumed { remaining: 42 });

    settle().await;
    let state = app.countdown();
    assert_eq!(state.remaining(), 42);
    assert_eq!(state.phase(), Phase::Paused);

    // paused means paused: nothing arrives until the user resumes
    assert!(timeout(Duration::from_secs(5), attachment.next_tick())
        .await
        .is_err());

    // the snapshot stays paused until then, so another restart would land here too
    assert!(store.load().unwrap().is_resumable());

    assert_eq!(app.toggle_pause(), ToggleOutcome::Resuming { remaining: 42 });
    assert_eq!(attachment.next_tick().await.unwrap().remaining, 41);
    assert_eq!(attachment.next_tick().await.unwrap().remaining, 40);

    // the resume cleared the paused flag
    assert!(!store.load().unwrap().paused);
}

#[tokio::test(start_paused = true)]
async fn fresh_attach_without_a_snapshot_starts_the_default_countdown() {
    let store = Arc::new(MemoryStore::new());
    let app = build_app(100, store);

    let mut attachment = app.attach();
    let outcome = app.recover_on_attach().unwrap();
    assert_eq!(outcome, RecoveryOutcome::Fresh { initial: 100 });

    settle().await;
    let state = app.countdown();
    assert_eq!(state.remaining(), 100);
    assert_eq!(state.phase(), Phase::Running);

    assert_eq!(attachment.next_tick().await.unwrap().remaining, 99);
}

#[tokio::test(start_paused = true)]
async fn pausing_persists_the_frozen_value() {
    let store = Arc::new(MemoryStore::new());
    let app = build_app(100, Arc::clone(&store) as Arc<dyn RecoveryStore>);

    let mut attachment = app.attach();
    app.start_at(30).unwrap();
    assert_eq!(attachment.next_tick().await.unwrap().remaining, 29);
    assert_eq!(attachment.next_tick().await.unwrap().remaining, 28);

    assert_eq!(
        app.toggle_pause(),
        ToggleOutcome::Pausing {
            remaining: 28,
            persisted: true
        }
    );

    assert_eq!(store.load().unwrap(), RecoverySnapshot::paused_at(28));
}

#[tokio::test(start_paused = true)]
async fn fresh_start_invalidates_a_paused_snapshot() {
    let store = Arc::new(MemoryStore::with_snapshot(RecoverySnapshot::paused_at(42)));
    let app = build_app(100, Arc::clone(&store) as Arc<dyn RecoveryStore>);

    app.start_at(10).unwrap();
    settle().await;

    assert!(!store.load().unwrap().paused);
    assert_eq!(app.countdown().remaining(), 10);
}

#[tokio::test(start_paused = true)]
async fn corrupt_zero_valued_snapshot_degrades_to_a_fresh_start() {
    // paused with nothing on the clock cannot happen in a real run; treat it
    // as no resumable run rather than attempting start(0)
    let store = Arc::new(MemoryStore::with_snapshot(RecoverySnapshot {
        saved_value: 0,
        paused: true,
    }));
    let app = build_app(100, store);

    let outcome = app.recover_on_attach().unwrap();
    assert_eq!(outcome, RecoveryOutcome::Fresh { initial: 100 });

    settle().await;
    assert_eq!(app.countdown().phase(), Phase::Running);
    assert_eq!(app.countdown().remaining(), 100);
}

#[tokio::test(start_paused = true)]
async fn toggle_without_a_countdown_is_ignored_and_writes_nothing() {
    let store = Arc::new(MemoryStore::new());
    let app = build_app(100, Arc::clone(&store) as Arc<dyn RecoveryStore>);

    assert_eq!(app.toggle_pause(), ToggleOutcome::Ignored);
    settle().await;
    assert_eq!(app.countdown().phase(), Phase::Idle);
    assert_eq!(store.load().unwrap(), RecoverySnapshot::default());
}
