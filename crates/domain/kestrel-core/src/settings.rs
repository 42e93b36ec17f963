use serde::{Deserialize, Serialize};

use crate::validate::{validate_directory, ValidationError};

/// Shell commands run around a game launch.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchHooks {
    pub pre_launch: Option<String>,
    pub wrapper: Option<String>,
    pub post_exit: Option<String>,
}

/// Every user-configurable launcher option.
///
/// Missing fields deserialize to their defaults, so a partial document from
/// the backend still yields a complete configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    pub concurrent_downloads: usize,
    pub concurrent_io_limit: usize,
    pub enable_discord_presence: bool,
    pub check_beta_channel: bool,
    pub hide_on_process_start: bool,
    pub custom_game_directory: Option<String>,
    pub hooks: LaunchHooks,
    /// Command template used by the local backend. `$PROFILE` and `$ARGS`
    /// are substituted.
    pub launch_template: String,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            concurrent_downloads: kestrel_config::DEFAULT_CONCURRENT_DOWNLOADS,
            concurrent_io_limit: kestrel_config::DEFAULT_CONCURRENT_IO_LIMIT,
            enable_discord_presence: false,
            check_beta_channel: false,
            hide_on_process_start: false,
            custom_game_directory: None,
            hooks: LaunchHooks::default(),
            launch_template: String::new(),
        }
    }
}

impl LauncherConfig {
    /// Clamps limits and turns blank optional strings into `None`.
    pub fn normalized(mut self) -> Self {
        self.concurrent_downloads = kestrel_config::clamp_concurrent_downloads(self.concurrent_downloads);
        self.concurrent_io_limit = kestrel_config::clamp_io_limit(self.concurrent_io_limit);
        for slot in [
            &mut self.custom_game_directory,
            &mut self.hooks.pre_launch,
            &mut self.hooks.wrapper,
            &mut self.hooks.post_exit,
        ] {
            if slot.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *slot = None;
            }
        }
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(dir) = &self.custom_game_directory {
            validate_directory(dir)?;
        }
        for (field, hook) in [
            ("pre-launch hook", &self.hooks.pre_launch),
            ("wrapper", &self.hooks.wrapper),
            ("post-exit hook", &self.hooks.post_exit),
        ] {
            if hook.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ValidationError::Empty { field });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_document_is_completed_with_defaults() {
        let cfg: LauncherConfig =
            serde_json::from_str(r#"{"concurrent_downloads": 3, "hooks": {"wrapper": "gamemoderun"}}"#)
                .unwrap();
        assert_eq!(cfg.concurrent_downloads, 3);
        assert_eq!(cfg.concurrent_io_limit, kestrel_config::DEFAULT_CONCURRENT_IO_LIMIT);
        assert_eq!(cfg.hooks.wrapper.as_deref(), Some("gamemoderun"));
        assert_eq!(cfg.hooks.pre_launch, None);
    }

    #[test]
    fn normalized_clamps_and_clears_blank_strings() {
        let cfg = LauncherConfig {
            concurrent_downloads: 0,
            custom_game_directory: Some("  ".into()),
            ..Default::default()
        }
        .normalized();
        assert_eq!(cfg.concurrent_downloads, kestrel_config::MIN_CONCURRENT_DOWNLOADS);
        assert_eq!(cfg.custom_game_directory, None);
    }

    #[test]
    fn forbidden_directory_fails_validation() {
        let cfg = LauncherConfig {
            custom_game_directory: Some("/games/<bad>".into()),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
