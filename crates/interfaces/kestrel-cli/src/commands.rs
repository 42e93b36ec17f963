use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use camino::Utf8Path;
use kestrel_app_core::{
    ConfigEdit, ConfigReconciler, LaunchOutcome, LaunchRequest, LaunchTracker, LauncherBackend,
    LocalBackend, PreferencesState, ReconcilerOptions, TrackerOptions,
};
use kestrel_core::{
    derive_accent, validate::validate_hex_color, AccentColor, AccentPreset, GroupingCriterion,
    LauncherConfig, UiPreferences,
};
use kestrel_persistence::{JsonConfigFile, JsonPreferencesStore};

fn preferences(data_dir: &Utf8Path) -> PreferencesState<JsonPreferencesStore> {
    PreferencesState::hydrate(JsonPreferencesStore::in_dir(data_dir))
}

fn backend(data_dir: &Utf8Path) -> Arc<LocalBackend> {
    Arc::new(LocalBackend::new(JsonConfigFile::in_dir(data_dir)))
}

fn print_accent(accent: &AccentColor) {
    println!("   base:   {}", accent.base);
    println!("   hover:  {}", accent.hover);
    println!("   shadow: {}", accent.shadow);
    println!("   light:  {}", accent.light);
    println!("   dark:   {}", accent.dark);
}

/// Prints the variants derived from `hex` without touching stored state.
pub fn cmd_accent(hex: &str) -> Result<AccentColor> {
    validate_hex_color(hex)?;
    let accent = derive_accent(hex);
    println!(":: Accent derived from {hex}");
    print_accent(&accent);
    Ok(accent)
}

pub fn cmd_prefs_show(data_dir: &Utf8Path) -> Result<UiPreferences> {
    let state = preferences(data_dir);
    let prefs = state.snapshot().clone();
    println!("{}", serde_json::to_string_pretty(&prefs)?);
    Ok(prefs)
}

pub fn cmd_prefs_accent(data_dir: &Utf8Path, hex: &str) -> Result<AccentColor> {
    let mut state = preferences(data_dir);
    let accent = state.set_custom_accent(hex)?.clone();
    println!(":: Accent set to {}", accent.base);
    print_accent(&accent);
    Ok(accent)
}

pub fn cmd_prefs_preset(data_dir: &Utf8Path, preset: AccentPreset) -> Result<AccentColor> {
    let mut state = preferences(data_dir);
    let accent = state.select_preset(preset).clone();
    println!(":: Accent preset {preset:?} ({})", accent.base);
    Ok(accent)
}

pub fn cmd_prefs_grouping(data_dir: &Utf8Path, criterion: GroupingCriterion) -> Result<()> {
    let mut state = preferences(data_dir);
    state.set_grouping(criterion);
    println!(":: Profiles grouped by {criterion:?}");
    Ok(())
}

pub fn cmd_prefs_radius(data_dir: &Utf8Path, radius: u32) -> Result<u32> {
    let mut state = preferences(data_dir);
    let applied = state.set_border_radius(radius);
    if applied != radius {
        println!(":: Border radius clamped to {applied}");
    } else {
        println!(":: Border radius set to {applied}");
    }
    Ok(applied)
}

pub async fn cmd_config_show(data_dir: &Utf8Path) -> Result<LauncherConfig> {
    let config = backend(data_dir).get_config().await?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(config)
}

/// Applies one edit through the reconciler and commits it right away.
pub async fn cmd_config_set(data_dir: &Utf8Path, key: &str, value: &str) -> Result<LauncherConfig> {
    let edit = ConfigEdit::parse(key, value)?;
    let reconciler = ConfigReconciler::new(backend(data_dir), ReconcilerOptions::default());
    reconciler.load().await?;
    reconciler.mutate_draft(|draft| edit.apply(draft))?;

    if !reconciler.has_pending_changes() {
        println!(":: {key} unchanged");
        return Ok(reconciler.committed());
    }
    let committed = reconciler
        .commit()
        .await
        .with_context(|| format!("Failed to update {key}"))?;
    println!(":: {key} updated");
    Ok(committed)
}

/// Launches `profile_id` and, with `wait`, stays attached until the game
/// exits. Ctrl-C aborts the launch.
pub async fn cmd_launch(
    data_dir: &Utf8Path,
    profile_id: &str,
    extra_args: Vec<String>,
    wait: bool,
) -> Result<()> {
    let backend = backend(data_dir);
    let tracker = LaunchTracker::new(backend.clone(), TrackerOptions::default());
    let poll = TrackerOptions::default().reattach_poll;

    println!(":: Launching {profile_id}");
    let request = LaunchRequest::new(extra_args);
    let outcome = tokio::select! {
        res = tracker.request_launch(profile_id, request) => res?,
        _ = tokio::signal::ctrl_c() => {
            tracker.request_abort(profile_id).await;
            LaunchOutcome::Aborted
        }
    };

    match outcome {
        LaunchOutcome::Started => println!(":: Game started"),
        LaunchOutcome::Aborted => {
            println!(":: Launch aborted");
            return Ok(());
        }
        LaunchOutcome::Failed(message) => bail!("Launch failed: {message}"),
    }

    if !wait {
        return Ok(());
    }
    loop {
        tokio::select! {
            _ = tokio::time::sleep(poll) => {
                if !backend.is_launching(profile_id).await? {
                    println!(":: Game exited");
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                backend.abort_launch(profile_id).await?;
                // Let the watcher kill the child before the runtime shuts down.
                tokio::time::sleep(Duration::from_millis(200)).await;
                println!(":: Game stopped");
                return Ok(());
            }
        }
    }
}
