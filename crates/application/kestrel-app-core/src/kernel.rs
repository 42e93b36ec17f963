use std::sync::Arc;

use crate::commands::AppCommand;
use crate::launch::{LaunchRequest, LaunchTracker, TrackerOptions};
use crate::ports::{LauncherBackend, PreferencesRepo};
use crate::preferences::PreferencesState;
use crate::reconciler::{ConfigReconciler, ReconcileError, ReconcilerOptions};

#[derive(Debug, Clone, Default)]
pub struct KernelOptions {
    pub tracker: TrackerOptions,
    pub reconciler: ReconcilerOptions,
}

/// Wires the state managers to one backend and one preferences store, and
/// routes [`AppCommand`]s to them.
pub struct AppKernel<B, R> {
    pub launches: LaunchTracker<B>,
    pub config: ConfigReconciler<B>,
    pub preferences: PreferencesState<R>,
    user_error: Option<String>,
}

impl<B, R> AppKernel<B, R>
where
    B: LauncherBackend,
    R: PreferencesRepo,
{
    /// Hydrates preferences before anything else can observe them.
    pub fn new(backend: Arc<B>, repo: R, options: KernelOptions) -> Self {
        let preferences = PreferencesState::hydrate(repo);
        Self {
            launches: LaunchTracker::new(backend.clone(), options.tracker),
            config: ConfigReconciler::new(backend, options.reconciler),
            preferences,
            user_error: None,
        }
    }

    /// The last rejected input, if any. Reading it clears it.
    pub fn take_user_error(&mut self) -> Option<String> {
        self.user_error.take()
    }

    fn user_error(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!("user error: {message}");
        self.user_error = Some(message);
    }

    /// Launch and abort run in the background; their progress is visible
    /// through [`LaunchTracker::subscribe`]. Everything else completes before
    /// this returns.
    pub async fn dispatch(&mut self, cmd: AppCommand) {
        match cmd {
            AppCommand::Launch {
                profile_id,
                extra_args,
            } => {
                let current = self.launches.state(&profile_id);
                if current.state.is_active() {
                    self.user_error(format!("'{profile_id}' is already launching"));
                    return;
                }
                let tracker = self.launches.clone();
                tokio::spawn(async move {
                    let request = LaunchRequest::new(extra_args);
                    if let Err(e) = tracker.request_launch(&profile_id, request).await {
                        tracing::debug!("{e}");
                    }
                });
            }

            AppCommand::AbortLaunch(profile_id) => {
                let tracker = self.launches.clone();
                tokio::spawn(async move { tracker.request_abort(&profile_id).await });
            }

            AppCommand::LaunchProgress {
                profile_id,
                message,
            } => self.launches.report_progress(&profile_id, message),

            AppCommand::ReattachLaunches(ids) => self.launches.reattach_all(&ids).await,

            AppCommand::LoadConfig => {
                if let Err(e) = self.config.load().await {
                    self.user_error(format!("Failed to load settings: {e}"));
                }
            }

            AppCommand::EditConfig(edit) => {
                if let Err(e) = self.config.mutate_draft(|draft| edit.apply(draft)) {
                    self.user_error(e.to_string());
                }
            }

            AppCommand::CommitConfig => match self.config.commit().await {
                Ok(_) => {}
                Err(ReconcileError::Validation(e)) => self.user_error(e.to_string()),
                // Backend failures are already published as commit notices.
                Err(ReconcileError::Backend(_)) => {}
                Err(e) => self.user_error(e.to_string()),
            },

            AppCommand::ResetConfig => self.config.reset(),

            AppCommand::SetCustomAccent(hex) => {
                if let Err(e) = self.preferences.set_custom_accent(&hex) {
                    self.user_error(e.to_string());
                }
            }
            AppCommand::SelectAccentPreset(preset) => {
                self.preferences.select_preset(preset);
            }
            AppCommand::SetBorderRadius(radius) => {
                self.preferences.set_border_radius(radius);
            }
            AppCommand::SetGrouping(criterion) => self.preferences.set_grouping(criterion),
            AppCommand::SetWidgets(widgets) => self.preferences.set_widget_config(widgets),
        }
    }
}
