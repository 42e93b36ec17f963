use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use kestrel_core::{LaunchEntry, LaunchState, ProfileId};
use thiserror::Error;
use tokio::sync::broadcast;

use super::events::{LaunchAttemptId, LaunchEvent, LaunchOutcome, LaunchTransition};
use super::store::LaunchStore;
use crate::ports::LauncherBackend;

#[derive(Debug, Clone)]
pub struct TrackerOptions {
    /// How long a successful launch is shown as `Starting`. Zero skips the
    /// `Starting` state entirely.
    pub starting_display: Duration,
    /// Client-side limit for one launch call. `None` waits for the backend
    /// to report success or failure, however long that takes.
    pub launch_timeout: Option<Duration>,
    pub reattach_poll: Duration,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            starting_display: Duration::from_millis(kestrel_config::DEFAULT_STARTING_DISPLAY_MS),
            launch_timeout: None,
            reattach_poll: Duration::from_millis(kestrel_config::DEFAULT_REATTACH_POLL_MS),
        }
    }
}

pub type CompletionCallback = Box<dyn FnOnce(&LaunchOutcome) + Send + 'static>;

#[derive(Default)]
pub struct LaunchRequest {
    pub extra_args: Vec<String>,
    on_complete: Option<CompletionCallback>,
}

impl LaunchRequest {
    pub fn new(extra_args: Vec<String>) -> Self {
        Self {
            extra_args,
            on_complete: None,
        }
    }

    /// Called exactly once when the accepted request resolves.
    pub fn on_complete(mut self, f: impl FnOnce(&LaunchOutcome) + Send + 'static) -> Self {
        self.on_complete = Some(Box::new(f));
        self
    }
}

impl std::fmt::Debug for LaunchRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LaunchRequest")
            .field("extra_args", &self.extra_args)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LaunchRequestError {
    #[error("profile '{profile_id}' already has a launch in progress ({state:?})")]
    AlreadyActive {
        profile_id: ProfileId,
        state: LaunchState,
    },
}

/// Tracks launches per profile. Different profiles launch independently;
/// one profile never has two attempts outstanding.
pub struct LaunchTracker<B> {
    backend: Arc<B>,
    store: LaunchStore,
    options: TrackerOptions,
}

impl<B> Clone for LaunchTracker<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            store: self.store.clone(),
            options: self.options.clone(),
        }
    }
}

impl<B: LauncherBackend> LaunchTracker<B> {
    pub fn new(backend: Arc<B>, options: TrackerOptions) -> Self {
        Self {
            backend,
            store: LaunchStore::new(),
            options,
        }
    }

    pub fn state(&self, profile_id: &str) -> LaunchEntry {
        self.store.entry(profile_id)
    }

    pub fn active(&self) -> Vec<(ProfileId, LaunchEntry)> {
        self.store.entries()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LaunchTransition> {
        self.store.subscribe()
    }

    /// Launches `profile_id` and resolves when the backend answers.
    ///
    /// Refused without a backend call while the profile is `Launching` or
    /// `Starting`. A profile in `Error` may be launched again.
    pub async fn request_launch(
        &self,
        profile_id: &str,
        request: LaunchRequest,
    ) -> Result<LaunchOutcome, LaunchRequestError> {
        let attempt = self
            .store
            .begin(profile_id, LaunchEvent::Requested { at: Utc::now() })
            .map_err(|state| LaunchRequestError::AlreadyActive {
                profile_id: profile_id.to_string(),
                state,
            })?;
        tracing::info!(profile = profile_id, %attempt, "launch requested");

        let result = self.call_launch(profile_id, &request.extra_args).await;

        let outcome = match result {
            Ok(()) => match self.store.apply_for(profile_id, attempt, LaunchEvent::Accepted) {
                Some(_) => {
                    self.close_startup_window(profile_id, attempt);
                    LaunchOutcome::Started
                }
                None => LaunchOutcome::Aborted,
            },
            Err(e) => {
                let message = format!("{e:#}");
                tracing::warn!(profile = profile_id, "launch failed: {message}");
                match self.store.apply_for(
                    profile_id,
                    attempt,
                    LaunchEvent::Failed {
                        message: message.clone(),
                    },
                ) {
                    Some(_) => LaunchOutcome::Failed(message),
                    None => LaunchOutcome::Aborted,
                }
            }
        };

        if let Some(on_complete) = request.on_complete {
            on_complete(&outcome);
        }
        Ok(outcome)
    }

    async fn call_launch(&self, profile_id: &str, extra_args: &[String]) -> anyhow::Result<()> {
        let Some(limit) = self.options.launch_timeout else {
            return self.backend.launch(profile_id, extra_args).await;
        };

        match tokio::time::timeout(limit, self.backend.launch(profile_id, extra_args)).await {
            Ok(result) => result,
            Err(_) => {
                if let Err(e) = self.backend.abort_launch(profile_id).await {
                    tracing::warn!(profile = profile_id, "abort after timeout failed: {e:#}");
                }
                Err(anyhow::anyhow!("launch timed out after {}s", limit.as_secs_f32()))
            }
        }
    }

    fn close_startup_window(&self, profile_id: &str, attempt: LaunchAttemptId) {
        if self.options.starting_display.is_zero() {
            self.store
                .apply_for(profile_id, attempt, LaunchEvent::StartupWindowElapsed);
            return;
        }

        let store = self.store.clone();
        let delay = self.options.starting_display;
        let profile_id = profile_id.to_string();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            store.apply_for(&profile_id, attempt, LaunchEvent::StartupWindowElapsed);
        });
    }

    /// Replaces the status message of an outstanding launch. Ignored when the
    /// profile is not `Launching` or `Starting`.
    pub fn report_progress(&self, profile_id: &str, message: impl Into<String>) {
        self.store.apply(
            profile_id,
            LaunchEvent::Progress {
                message: message.into(),
            },
        );
    }

    /// Asks the backend to stop and returns the profile to `Idle` whatever
    /// the backend answers. A no-op unless the profile is `Launching` or
    /// `Starting`.
    pub async fn request_abort(&self, profile_id: &str) {
        if !self.store.detach(profile_id) {
            tracing::debug!(profile = profile_id, "abort ignored, nothing outstanding");
            return;
        }

        tracing::info!(profile = profile_id, "aborting launch");
        if let Err(e) = self.backend.abort_launch(profile_id).await {
            tracing::warn!(profile = profile_id, "backend abort failed: {e:#}");
        }
        self.store.apply(profile_id, LaunchEvent::Aborted);
    }

    /// Picks up a launch the backend still reports as running, e.g. after the
    /// UI restarted. The profile stays `Launching` until the backend stops
    /// reporting it. Returns whether the backend reported a launch.
    pub async fn reattach(&self, profile_id: &str) -> anyhow::Result<bool> {
        if !self.backend.is_launching(profile_id).await? {
            return Ok(false);
        }

        let attempt = match self
            .store
            .begin(profile_id, LaunchEvent::Reattached { at: Utc::now() })
        {
            Ok(attempt) => attempt,
            // Already tracked locally.
            Err(_) => return Ok(true),
        };
        tracing::info!(profile = profile_id, "reattached to running launch");

        let this = self.clone();
        let profile_id = profile_id.to_string();
        tokio::spawn(async move { this.watch_reattached(&profile_id, attempt).await });
        Ok(true)
    }

    pub async fn reattach_all(&self, profile_ids: &[ProfileId]) {
        let results =
            futures::future::join_all(profile_ids.iter().map(|id| self.reattach(id))).await;
        for (id, result) in profile_ids.iter().zip(results) {
            if let Err(e) = result {
                tracing::warn!(profile = %id, "could not query launch state: {e:#}");
            }
        }
    }

    async fn watch_reattached(&self, profile_id: &str, attempt: LaunchAttemptId) {
        loop {
            tokio::time::sleep(self.options.reattach_poll).await;
            if !self.store.is_current(profile_id, attempt) {
                return;
            }
            match self.backend.is_launching(profile_id).await {
                Ok(true) => continue,
                Ok(false) => {
                    self.store.apply_for(profile_id, attempt, LaunchEvent::Exited);
                    return;
                }
                Err(e) => {
                    tracing::warn!(profile = profile_id, "launch state poll failed: {e:#}");
                }
            }
        }
    }
}
