//! Engine integration tests
//!
//! Driven entirely on tokio's paused clock: a "second" here is virtual, so
//! the full 100-second scenarios run instantly and deterministically.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use tickdown::engine::{self, AttachmentManager};
use tickdown::state::Phase;

/// Let already-queued commands reach the engine task without advancing time
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn counts_down_to_completion() {
    let attachments = Arc::new(AttachmentManager::new());
    let engine = engine::spawn(Arc::clone(&attachments));
    let mut attachment = attachments.attach();

    engine.start(3).unwrap();

    // exactly n ticks, one per elapsed second, values n-1 .. 0
    for expected in [2, 1, 0] {
        let tick = attachment.next_tick().await.unwrap();
        assert_eq!(tick.remaining, expected);
    }

    settle().await;
    let state = attachments.current();
    assert_eq!(state.phase(), Phase::Completed);
    assert_eq!(state.remaining(), 0);

    // completed is quiescent: no further ticks arrive
    assert!(timeout(Duration::from_secs(10), attachment.next_tick())
        .await
        .is_err());
}

#[tokio::test(start_paused = true)]
async fn pause_freezes_and_resume_continues_exactly() {
    let attachments = Arc::new(AttachmentManager::new());
    let engine = engine::spawn(Arc::clone(&attachments));
    let mut attachment = attachments.attach();

    engine.start(100).unwrap();
    for expected in [99, 98, 97] {
        assert_eq!(attachment.next_tick().await.unwrap().remaining, expected);
    }

    engine.toggle_pause();
    settle().await;
    let state = attachments.current();
    assert_eq!(state.phase(), Phase::Paused);
    assert_eq!(state.remaining(), 97);

    // five more seconds of wall time produce nothing while paused
    assert!(timeout(Duration::from_secs(5), attachment.next_tick())
        .await
        .is_err());
    assert_eq!(attachments.current().remaining(), 97);

    // resume picks up at the frozen value, no ticks lost or double counted
    engine.toggle_pause();
    assert_eq!(attachment.next_tick().await.unwrap().remaining, 96);
    assert_eq!(attachment.next_tick().await.unwrap().remaining, 95);
}

#[tokio::test(start_paused = true)]
async fn even_number_of_toggles_leaves_remaining_unchanged() {
    let attachments = Arc::new(AttachmentManager::new());
    let engine = engine::spawn(Arc::clone(&attachments));
    let mut attachment = attachments.attach();

    engine.start(10).unwrap();
    assert_eq!(attachment.next_tick().await.unwrap().remaining, 9);

    engine.toggle_pause();
    engine.toggle_pause();
    settle().await;
    let state = attachments.current();
    assert_eq!(state.phase(), Phase::Running);
    assert_eq!(state.remaining(), 9);

    assert_eq!(attachment.next_tick().await.unwrap().remaining, 8);
}

#[tokio::test(start_paused = true)]
async fn countdown_survives_detach_and_reattach() {
    let attachments = Arc::new(AttachmentManager::new());
    let engine = engine::spawn(Arc::clone(&attachments));
    let mut attachment = attachments.attach();

    engine.start(10).unwrap();
    assert_eq!(attachment.next_tick().await.unwrap().remaining, 9);

    // nobody is watching, the engine keeps decrementing and drops the ticks
    attachments.detach(attachment);
    for _ in 0..3 {
        tokio::time::advance(Duration::from_secs(1)).await;
        settle().await;
    }

    let mut attachment = attachments.attach();
    // attach-time state paints the current value without waiting for a tick
    assert_eq!(attachment.initial_state().remaining(), 6);
    assert_eq!(attachment.initial_state().phase(), Phase::Running);
    // intermediate values are not replayed, delivery continues from here
    assert_eq!(attachment.next_tick().await.unwrap().remaining, 5);
}

#[tokio::test(start_paused = true)]
async fn restart_mid_countdown_discards_the_prior_run() {
    let attachments = Arc::new(AttachmentManager::new());
    let engine = engine::spawn(Arc::clone(&attachments));
    let mut attachment = attachments.attach();

    engine.start(50).unwrap();
    assert_eq!(attachment.next_tick().await.unwrap().remaining, 49);

    engine.start(5).unwrap();
    settle().await;
    assert_eq!(attachments.current().remaining(), 5);

    for expected in [4, 3, 2, 1, 0] {
        assert_eq!(attachment.next_tick().await.unwrap().remaining, expected);
    }
    settle().await;
    assert_eq!(attachments.current().phase(), Phase::Completed);
}

#[tokio::test(start_paused = true)]
async fn toggle_before_start_is_benign() {
    let attachments = Arc::new(AttachmentManager::new());
    let engine = engine::spawn(Arc::clone(&attachments));

    engine.toggle_pause();
    settle().await;
    assert_eq!(attachments.current().phase(), Phase::Idle);

    // the engine is unharmed and starts normally afterwards
    engine.start(2).unwrap();
    settle().await;
    assert_eq!(attachments.current().phase(), Phase::Running);
    assert_eq!(attachments.current().remaining(), 2);
}

#[tokio::test(start_paused = true)]
async fn start_with_zero_is_rejected_synchronously() {
    let attachments = Arc::new(AttachmentManager::new());
    let engine = engine::spawn(Arc::clone(&attachments));

    assert!(engine.start(0).is_err());
    settle().await;
    assert_eq!(attachments.current().phase(), Phase::Idle);
    assert_eq!(attachments.current().remaining(), 0);
}

#[tokio::test(start_paused = true)]
async fn superseded_observer_receives_nothing_further() {
    let attachments = Arc::new(AttachmentManager::new());
    let engine = engine::spawn(Arc::clone(&attachments));
    let mut first = attachments.attach();

    engine.start(10).unwrap();
    assert_eq!(first.next_tick().await.unwrap().remaining, 9);

    let mut second = attachments.attach();
    assert_eq!(first.next_tick().await, None);
    assert_eq!(second.next_tick().await.unwrap().remaining, 8);
}
