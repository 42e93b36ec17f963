use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use kestrel_core::{LauncherConfig, ValidationError};
use thiserror::Error;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::ports::LauncherBackend;

#[derive(Debug, Clone)]
pub struct ReconcilerOptions {
    /// Quiet period after the last draft mutation before a commit is sent.
    pub debounce: Duration,
}

impl Default for ReconcilerOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(kestrel_config::DEFAULT_COMMIT_DEBOUNCE_MS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitFailureKind {
    Validation,
    Backend,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitNotice {
    Committed(LauncherConfig),
    Failed {
        reason: String,
        kind: CommitFailureKind,
    },
}

#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("configuration has not been loaded")]
    NotLoaded,
    #[error("a commit is already in flight")]
    CommitInFlight,
    #[error("no async runtime available to schedule the commit")]
    NoRuntime,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("backend error: {0}")]
    Backend(String),
}

#[derive(Default)]
struct DraftState {
    loaded: bool,
    committed: LauncherConfig,
    draft: LauncherConfig,
    timer: Option<CancellationToken>,
    in_flight: bool,
    /// Set when the user touched the draft while a commit was outstanding.
    /// Cleared by `reset`, which makes the draft follow `committed` again.
    edited_during_flight: bool,
}

impl DraftState {
    fn cancel_timer(&mut self) {
        if let Some(token) = self.timer.take() {
            token.cancel();
        }
    }
}

struct Shared<B> {
    backend: Arc<B>,
    options: ReconcilerOptions,
    state: Mutex<DraftState>,
    notices: broadcast::Sender<CommitNotice>,
}

/// Holds the committed configuration and an editable draft, and writes the
/// draft back to the backend after a debounce window.
///
/// At most one commit is in flight. Edits made while it runs stay in the draft
/// and start a fresh debounce cycle once it resolves.
pub struct ConfigReconciler<B> {
    shared: Arc<Shared<B>>,
}

impl<B> Clone for ConfigReconciler<B> {
    fn clone(&self) -> Self {
        Self {
            shared: self.shared.clone(),
        }
    }
}

impl<B: LauncherBackend> ConfigReconciler<B> {
    pub fn new(backend: Arc<B>, options: ReconcilerOptions) -> Self {
        let (notices, _) = broadcast::channel(64);
        Self {
            shared: Arc::new(Shared {
                backend,
                options,
                state: Mutex::new(DraftState::default()),
                notices,
            }),
        }
    }

    /// Fetches the configuration and sets `committed` and `draft` to it.
    pub async fn load(&self) -> Result<(), ReconcileError> {
        let config = self
            .shared
            .backend
            .get_config()
            .await
            .map_err(|e| ReconcileError::Backend(format!("{e:#}")))?
            .normalized();

        let mut st = self.shared.lock();
        st.cancel_timer();
        st.committed = config.clone();
        st.draft = config;
        st.loaded = true;
        st.edited_during_flight = false;
        tracing::debug!("configuration loaded");
        Ok(())
    }

    /// Applies `edit` to the draft and (re)starts the debounce timer.
    pub fn mutate_draft(
        &self,
        edit: impl FnOnce(&mut LauncherConfig),
    ) -> Result<(), ReconcileError> {
        let handle =
            tokio::runtime::Handle::try_current().map_err(|_| ReconcileError::NoRuntime)?;

        let mut st = self.shared.lock();
        if !st.loaded {
            return Err(ReconcileError::NotLoaded);
        }
        edit(&mut st.draft);

        if st.in_flight {
            st.edited_during_flight = true;
            return Ok(());
        }
        Shared::schedule(&self.shared, &mut st, &handle);
        Ok(())
    }

    /// Sends the draft now, skipping the debounce window.
    pub async fn commit(&self) -> Result<LauncherConfig, ReconcileError> {
        Shared::run_commit(&self.shared).await
    }

    /// Reverts the draft to `committed` and drops any pending commit.
    pub fn reset(&self) {
        let mut st = self.shared.lock();
        st.cancel_timer();
        st.draft = st.committed.clone();
        st.edited_during_flight = false;
        tracing::debug!("draft reset to committed configuration");
    }

    pub fn has_pending_changes(&self) -> bool {
        let st = self.shared.lock();
        st.draft != st.committed
    }

    pub fn is_loaded(&self) -> bool {
        self.shared.lock().loaded
    }

    /// True while a debounce timer is armed or a commit is outstanding.
    pub fn is_commit_pending(&self) -> bool {
        let st = self.shared.lock();
        st.timer.is_some() || st.in_flight
    }

    pub fn draft(&self) -> LauncherConfig {
        self.shared.lock().draft.clone()
    }

    pub fn committed(&self) -> LauncherConfig {
        self.shared.lock().committed.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<CommitNotice> {
        self.shared.notices.subscribe()
    }
}

impl<B: LauncherBackend> Shared<B> {
    fn lock(&self) -> MutexGuard<'_, DraftState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn notify(&self, notice: CommitNotice) {
        // No subscribers is fine.
        let _ = self.notices.send(notice);
    }

    fn schedule(this: &Arc<Self>, st: &mut DraftState, handle: &tokio::runtime::Handle) {
        st.cancel_timer();
        let token = CancellationToken::new();
        st.timer = Some(token.clone());

        let shared = this.clone();
        let delay = this.options.debounce;
        handle.spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {}
                _ = tokio::time::sleep(delay) => Shared::fire_timer(&shared, &token).await,
            }
        });
    }

    async fn fire_timer(this: &Arc<Self>, token: &CancellationToken) {
        {
            let mut st = this.lock();
            // Cancellation happens under the lock, so this check is exact.
            if token.is_cancelled() {
                return;
            }
            st.timer = None;
            if st.in_flight {
                return;
            }
        }
        if let Err(e) = Self::run_commit(this).await {
            tracing::debug!("debounced commit did not go through: {e}");
        }
    }

    async fn run_commit(this: &Arc<Self>) -> Result<LauncherConfig, ReconcileError> {
        let snapshot = {
            let mut st = this.lock();
            if !st.loaded {
                return Err(ReconcileError::NotLoaded);
            }
            if st.in_flight {
                return Err(ReconcileError::CommitInFlight);
            }
            st.cancel_timer();
            if st.draft == st.committed {
                return Ok(st.committed.clone());
            }
            if let Err(e) = st.draft.validate() {
                tracing::info!("draft rejected: {e}");
                this.notify(CommitNotice::Failed {
                    reason: e.to_string(),
                    kind: CommitFailureKind::Validation,
                });
                return Err(e.into());
            }
            st.in_flight = true;
            st.edited_during_flight = false;
            st.draft.clone()
        };

        tracing::info!("committing configuration");
        let result = this.backend.set_config(snapshot).await;

        let mut st = this.lock();
        st.in_flight = false;
        let outcome = match result {
            Ok(accepted) => {
                let accepted = accepted.normalized();
                st.committed = accepted.clone();
                if !st.edited_during_flight {
                    st.draft = accepted.clone();
                }
                this.notify(CommitNotice::Committed(accepted.clone()));
                Ok(accepted)
            }
            Err(e) => {
                let reason = format!("{e:#}");
                tracing::warn!("configuration commit failed: {reason}");
                this.notify(CommitNotice::Failed {
                    reason: reason.clone(),
                    kind: CommitFailureKind::Backend,
                });
                Err(ReconcileError::Backend(reason))
            }
        };

        if st.edited_during_flight && st.draft != st.committed {
            match tokio::runtime::Handle::try_current() {
                Ok(handle) => Self::schedule(this, &mut st, &handle),
                Err(_) => tracing::warn!("edits made during commit left unscheduled"),
            }
        }
        st.edited_during_flight = false;
        outcome
    }
}
