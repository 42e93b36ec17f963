mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::ScriptedBackend;
use kestrel_app_core::{
    CommitFailureKind, CommitNotice, ConfigReconciler, ReconcileError, ReconcilerOptions,
};
use kestrel_core::LauncherConfig;

const PAST_DEBOUNCE: Duration = Duration::from_secs(2);

async fn loaded(backend: &Arc<ScriptedBackend>) -> ConfigReconciler<ScriptedBackend> {
    let reconciler = ConfigReconciler::new(backend.clone(), ReconcilerOptions::default());
    reconciler.load().await.unwrap();
    reconciler
}

#[tokio::test]
async fn load_fills_draft_and_committed_identically() {
    let backend = ScriptedBackend::with_config(LauncherConfig {
        concurrent_downloads: 4,
        ..Default::default()
    });
    let reconciler = loaded(&backend).await;

    assert_eq!(reconciler.draft().concurrent_downloads, 4);
    assert_eq!(reconciler.draft(), reconciler.committed());
    assert!(!reconciler.has_pending_changes());
}

#[tokio::test]
async fn mutate_before_load_is_refused() {
    let backend = ScriptedBackend::new();
    let reconciler = ConfigReconciler::new(backend, ReconcilerOptions::default());
    assert!(matches!(
        reconciler.mutate_draft(|c| c.check_beta_channel = true),
        Err(ReconcileError::NotLoaded)
    ));
}

#[test]
fn mutate_outside_runtime_is_refused() {
    let backend = ScriptedBackend::new();
    let reconciler = ConfigReconciler::new(backend, ReconcilerOptions::default());
    assert!(matches!(
        reconciler.mutate_draft(|c| c.check_beta_channel = true),
        Err(ReconcileError::NoRuntime)
    ));
}

#[tokio::test(start_paused = true)]
async fn rapid_mutations_produce_one_commit_with_last_value() {
    let backend = ScriptedBackend::new();
    let reconciler = loaded(&backend).await;

    for n in 1..=8 {
        reconciler
            .mutate_draft(|c| c.concurrent_downloads = n)
            .unwrap();
        assert!(reconciler.has_pending_changes());
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    assert!(backend.committed_values().is_empty());

    tokio::time::sleep(PAST_DEBOUNCE).await;
    let sent = backend.committed_values();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].concurrent_downloads, 8);
    assert_eq!(reconciler.committed().concurrent_downloads, 8);
    assert!(!reconciler.has_pending_changes());
    assert!(!reconciler.is_commit_pending());
}

#[tokio::test(start_paused = true)]
async fn reset_drops_the_pending_commit() {
    let backend = ScriptedBackend::new();
    let reconciler = loaded(&backend).await;

    reconciler
        .mutate_draft(|c| c.enable_discord_presence = true)
        .unwrap();
    tokio::time::sleep(Duration::from_millis(200)).await;
    reconciler.reset();

    assert!(!reconciler.has_pending_changes());
    assert!(!reconciler.is_commit_pending());
    tokio::time::sleep(PAST_DEBOUNCE).await;
    assert!(backend.committed_values().is_empty());
    assert!(!reconciler.draft().enable_discord_presence);
}

#[tokio::test(start_paused = true)]
async fn failed_commit_keeps_draft_and_can_be_retried() {
    let backend = ScriptedBackend::new();
    backend.set_fails.store(true, Ordering::SeqCst);
    let reconciler = loaded(&backend).await;
    let mut notices = reconciler.subscribe();

    reconciler
        .mutate_draft(|c| c.concurrent_io_limit = 3)
        .unwrap();
    tokio::time::sleep(PAST_DEBOUNCE).await;

    assert!(matches!(
        notices.try_recv().unwrap(),
        CommitNotice::Failed {
            kind: CommitFailureKind::Backend,
            ..
        }
    ));
    assert_eq!(reconciler.draft().concurrent_io_limit, 3);
    assert_eq!(
        reconciler.committed().concurrent_io_limit,
        kestrel_config::DEFAULT_CONCURRENT_IO_LIMIT
    );
    assert!(reconciler.has_pending_changes());
    // No automatic retry.
    tokio::time::sleep(PAST_DEBOUNCE).await;
    assert_eq!(backend.committed_values().len(), 1);

    backend.set_fails.store(false, Ordering::SeqCst);
    let committed = reconciler.commit().await.unwrap();
    assert_eq!(committed.concurrent_io_limit, 3);
    assert!(!reconciler.has_pending_changes());
    assert!(matches!(
        notices.try_recv().unwrap(),
        CommitNotice::Committed(ref c) if c.concurrent_io_limit == 3
    ));
}

#[tokio::test(start_paused = true)]
async fn invalid_draft_never_reaches_backend() {
    let backend = ScriptedBackend::new();
    let reconciler = loaded(&backend).await;
    let mut notices = reconciler.subscribe();

    reconciler
        .mutate_draft(|c| c.custom_game_directory = Some("/games/what?".into()))
        .unwrap();
    tokio::time::sleep(PAST_DEBOUNCE).await;

    assert!(backend.committed_values().is_empty());
    assert!(matches!(
        notices.try_recv().unwrap(),
        CommitNotice::Failed {
            kind: CommitFailureKind::Validation,
            ..
        }
    ));
    assert!(matches!(
        reconciler.commit().await,
        Err(ReconcileError::Validation(_))
    ));
    assert!(reconciler.has_pending_changes());
}

#[tokio::test(start_paused = true)]
async fn edit_during_inflight_commit_is_sent_afterwards() {
    let backend = ScriptedBackend::new();
    backend.hold_commits(true);
    let reconciler = loaded(&backend).await;

    reconciler
        .mutate_draft(|c| c.concurrent_downloads = 2)
        .unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(backend.committed_values().len(), 1);
    assert!(reconciler.is_commit_pending());

    reconciler
        .mutate_draft(|c| c.concurrent_downloads = 7)
        .unwrap();
    assert!(matches!(
        reconciler.commit().await,
        Err(ReconcileError::CommitInFlight)
    ));

    backend.hold_commits(false);
    backend.release_commits(1);
    tokio::time::sleep(PAST_DEBOUNCE).await;

    let sent: Vec<_> = backend
        .committed_values()
        .iter()
        .map(|c| c.concurrent_downloads)
        .collect();
    assert_eq!(sent, vec![2, 7]);
    assert_eq!(reconciler.committed().concurrent_downloads, 7);
    assert_eq!(reconciler.draft().concurrent_downloads, 7);
}

#[tokio::test(start_paused = true)]
async fn reverting_an_edit_by_hand_sends_nothing() {
    let backend = ScriptedBackend::new();
    let reconciler = loaded(&backend).await;

    reconciler.mutate_draft(|c| c.check_beta_channel = true).unwrap();
    reconciler.mutate_draft(|c| c.check_beta_channel = false).unwrap();
    assert!(!reconciler.has_pending_changes());

    tokio::time::sleep(PAST_DEBOUNCE).await;
    assert!(backend.committed_values().is_empty());
}

#[tokio::test(start_paused = true)]
async fn reset_during_inflight_commit_follows_its_result() {
    let backend = ScriptedBackend::new();
    backend.hold_commits(true);
    let reconciler = loaded(&backend).await;

    reconciler
        .mutate_draft(|c| c.concurrent_downloads = 2)
        .unwrap();
    tokio::time::sleep(Duration::from_millis(600)).await;
    assert_eq!(backend.committed_values().len(), 1);

    reconciler
        .mutate_draft(|c| c.concurrent_downloads = 7)
        .unwrap();
    reconciler.reset();
    assert_eq!(
        reconciler.draft().concurrent_downloads,
        kestrel_config::DEFAULT_CONCURRENT_DOWNLOADS
    );

    backend.hold_commits(false);
    backend.release_commits(1);
    tokio::time::sleep(PAST_DEBOUNCE).await;

    assert_eq!(backend.committed_values().len(), 1);
    assert_eq!(reconciler.committed().concurrent_downloads, 2);
    assert_eq!(reconciler.draft().concurrent_downloads, 2);
    assert!(!reconciler.has_pending_changes());
    assert!(!reconciler.is_commit_pending());
}
