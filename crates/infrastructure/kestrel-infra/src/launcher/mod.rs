use std::collections::HashMap;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

mod split;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Launch configuration error: {0}")]
    Config(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Command parsing error")]
    ParseError,
    #[error("Profile '{0}' is already running")]
    AlreadyRunning(String),
    #[error("Pre-launch hook exited with {0}")]
    HookFailed(std::process::ExitStatus),
}

const ARGS_PLACEHOLDER: &str = "__KESTREL_ARGS__";

/// Everything needed to start one profile.
#[derive(Debug, Clone, Default)]
pub struct LaunchSpec {
    /// Command template; `$PROFILE` and `$ARGS` are substituted.
    pub template: String,
    pub extra_args: Vec<String>,
    pub wrapper: Option<String>,
    pub pre_launch: Option<String>,
    pub post_exit: Option<String>,
    pub working_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLaunchCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl LaunchSpec {
    pub fn resolve_command(&self, profile_id: &str) -> Result<ResolvedLaunchCommand, LaunchError> {
        if self.template.trim().is_empty() {
            return Err(LaunchError::Config("No launch template configured".into()));
        }

        // `$ARGS` becomes a placeholder so splitting happens before arguments
        // containing whitespace are injected.
        let cmd_str = self
            .template
            .replace("$PROFILE", profile_id)
            .replace("$ARGS", ARGS_PLACEHOLDER);

        let mut parts = Vec::new();
        if let Some(wrapper) = &self.wrapper {
            parts.extend(split::split_command(wrapper).ok_or(LaunchError::ParseError)?);
        }
        for part in split::split_command(&cmd_str).ok_or(LaunchError::ParseError)? {
            if part == ARGS_PLACEHOLDER {
                parts.extend(self.extra_args.iter().cloned());
            } else {
                parts.push(part.replace(ARGS_PLACEHOLDER, &self.extra_args.join(" ")));
            }
        }

        if parts.is_empty() {
            return Err(LaunchError::Config(
                "Launch template produced empty command".into(),
            ));
        }

        let program = parts.remove(0);
        Ok(ResolvedLaunchCommand {
            program,
            args: parts,
            working_dir: self
                .working_dir
                .clone()
                .unwrap_or_else(|| PathBuf::from(".")),
        })
    }
}

struct RunningProcess {
    pid: Option<u32>,
    stop: CancellationToken,
}

/// Starts game processes and keeps track of the ones still alive, one per
/// profile.
#[derive(Clone, Default)]
pub struct ProcessLauncher {
    running: Arc<Mutex<HashMap<String, RunningProcess>>>,
}

impl ProcessLauncher {
    pub fn new() -> Self {
        Self::default()
    }

    fn running(&self) -> MutexGuard<'_, HashMap<String, RunningProcess>> {
        self.running.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Runs the pre-launch hook, then spawns the game. Returns once the
    /// process has been started; exit is observed in the background.
    pub async fn launch(&self, profile_id: &str, spec: &LaunchSpec) -> Result<Option<u32>, LaunchError> {
        if self.is_running(profile_id) {
            return Err(LaunchError::AlreadyRunning(profile_id.to_string()));
        }

        let cmd = spec.resolve_command(profile_id)?;

        if let Some(hook) = &spec.pre_launch {
            let status = run_hook(hook, &cmd.working_dir).await?;
            if !status.success() {
                return Err(LaunchError::HookFailed(status));
            }
        }

        tracing::info!(
            profile = profile_id,
            program = %cmd.program,
            args = ?cmd.args,
            cwd = ?cmd.working_dir,
            "launching"
        );

        let mut child = Command::new(&cmd.program)
            .args(&cmd.args)
            .current_dir(&cmd.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()?;

        let pid = child.id();
        let stop = CancellationToken::new();
        self.running().insert(
            profile_id.to_string(),
            RunningProcess {
                pid,
                stop: stop.clone(),
            },
        );

        let running = self.running.clone();
        let profile = profile_id.to_string();
        let post_exit = spec.post_exit.clone();
        let cwd = cmd.working_dir.clone();
        tokio::spawn(async move {
            let exited = tokio::select! {
                status = child.wait() => Some(status),
                _ = stop.cancelled() => None,
            };
            match exited {
                Some(Ok(status)) => tracing::info!(profile = %profile, %status, "game exited"),
                Some(Err(e)) => tracing::warn!(profile = %profile, "failed waiting for game: {e}"),
                None => {
                    if let Err(e) = child.kill().await {
                        tracing::warn!(profile = %profile, "failed to kill game: {e}");
                    }
                }
            }
            running
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .remove(&profile);

            if let Some(hook) = post_exit {
                match run_hook(&hook, &cwd).await {
                    Ok(status) if !status.success() => {
                        tracing::warn!(profile = %profile, %status, "post-exit hook failed")
                    }
                    Ok(_) => {}
                    Err(e) => tracing::warn!(profile = %profile, "post-exit hook error: {e}"),
                }
            }
        });

        Ok(pid)
    }

    /// Asks the running process for `profile_id` to stop. Returns `false` if
    /// nothing was running.
    pub fn abort(&self, profile_id: &str) -> bool {
        match self.running().get(profile_id) {
            Some(process) => {
                tracing::info!(profile = profile_id, pid = ?process.pid, "stopping game");
                process.stop.cancel();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, profile_id: &str) -> bool {
        self.running().contains_key(profile_id)
    }

    pub fn running_profiles(&self) -> Vec<String> {
        self.running().keys().cloned().collect()
    }
}

async fn run_hook(hook: &str, cwd: &std::path::Path) -> Result<std::process::ExitStatus, LaunchError> {
    let parts = split::split_command(hook).ok_or(LaunchError::ParseError)?;
    let (program, args) = parts
        .split_first()
        .ok_or_else(|| LaunchError::Config("Hook command is empty".into()))?;
    tracing::debug!(hook, "running hook");
    Ok(Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .status()
        .await?)
}
