use kestrel_core::{LauncherConfig, UiPreferences};
use kestrel_persistence::JsonPreferencesStore;

/// The command interface of the process that actually installs and starts
/// games. Every call is one outstanding request.
#[async_trait::async_trait]
pub trait LauncherBackend: Send + Sync + 'static {
    async fn launch(&self, profile_id: &str, extra_args: &[String]) -> anyhow::Result<()>;
    async fn abort_launch(&self, profile_id: &str) -> anyhow::Result<()>;
    async fn is_launching(&self, profile_id: &str) -> anyhow::Result<bool>;
    async fn get_config(&self) -> anyhow::Result<LauncherConfig>;
    /// Returns the value the backend actually persisted.
    async fn set_config(&self, config: LauncherConfig) -> anyhow::Result<LauncherConfig>;
}

/// Where UI preferences survive between sessions. `load` must return a
/// value already migrated to the current schema.
pub trait PreferencesRepo: Send + Sync + 'static {
    fn load(&self) -> anyhow::Result<Option<UiPreferences>>;
    fn save(&self, prefs: &UiPreferences) -> anyhow::Result<()>;
}

impl PreferencesRepo for JsonPreferencesStore {
    fn load(&self) -> anyhow::Result<Option<UiPreferences>> {
        Ok(JsonPreferencesStore::load(self)?.map(|loaded| {
            if loaded.was_migrated() {
                tracing::info!(from = loaded.found_schema, "migrated stored preferences");
            }
            loaded.preferences
        }))
    }

    fn save(&self, prefs: &UiPreferences) -> anyhow::Result<()> {
        Ok(JsonPreferencesStore::save(self, prefs)?)
    }
}
