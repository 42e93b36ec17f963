use std::path::PathBuf;

use anyhow::Context;
use kestrel_core::LauncherConfig;
use kestrel_infra::launcher::{LaunchSpec, ProcessLauncher};
use kestrel_persistence::JsonConfigFile;

use crate::ports::LauncherBackend;

/// Runs games as local child processes and keeps the launcher configuration
/// in a JSON file.
#[derive(Clone)]
pub struct LocalBackend {
    config: JsonConfigFile,
    launcher: ProcessLauncher,
}

impl LocalBackend {
    pub fn new(config: JsonConfigFile) -> Self {
        Self {
            config,
            launcher: ProcessLauncher::new(),
        }
    }

    pub fn launcher(&self) -> &ProcessLauncher {
        &self.launcher
    }

    async fn read_config(&self) -> anyhow::Result<LauncherConfig> {
        let file = self.config.clone();
        tokio::task::spawn_blocking(move || file.load())
            .await
            .context("config reader task failed")?
            .with_context(|| format!("failed to read {}", self.config.path()))
    }
}

fn launch_spec(config: &LauncherConfig, extra_args: &[String]) -> LaunchSpec {
    LaunchSpec {
        template: config.launch_template.clone(),
        extra_args: extra_args.to_vec(),
        wrapper: config.hooks.wrapper.clone(),
        pre_launch: config.hooks.pre_launch.clone(),
        post_exit: config.hooks.post_exit.clone(),
        working_dir: config.custom_game_directory.as_ref().map(PathBuf::from),
    }
}

#[async_trait::async_trait]
impl LauncherBackend for LocalBackend {
    async fn launch(&self, profile_id: &str, extra_args: &[String]) -> anyhow::Result<()> {
        let config = self.read_config().await?;
        let spec = launch_spec(&config, extra_args);
        let pid = self.launcher.launch(profile_id, &spec).await?;
        tracing::debug!(profile = profile_id, ?pid, "game process started");
        Ok(())
    }

    async fn abort_launch(&self, profile_id: &str) -> anyhow::Result<()> {
        if !self.launcher.abort(profile_id) {
            tracing::debug!(profile = profile_id, "nothing running to abort");
        }
        Ok(())
    }

    async fn is_launching(&self, profile_id: &str) -> anyhow::Result<bool> {
        Ok(self.launcher.is_running(profile_id))
    }

    async fn get_config(&self) -> anyhow::Result<LauncherConfig> {
        self.read_config().await
    }

    async fn set_config(&self, config: LauncherConfig) -> anyhow::Result<LauncherConfig> {
        let config = config.normalized();
        config.validate()?;

        let file = self.config.clone();
        let saved = config.clone();
        tokio::task::spawn_blocking(move || file.save(&saved))
            .await
            .context("config writer task failed")?
            .with_context(|| format!("failed to write {}", self.config.path()))?;
        Ok(config)
    }
}
