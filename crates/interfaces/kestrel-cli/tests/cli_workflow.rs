use camino::Utf8PathBuf;
use kestrel_cli::commands;
use kestrel_core::{AccentPreset, GroupingCriterion};
use tempfile::tempdir;

fn data_dir() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    (dir, root)
}

#[test]
fn accent_command_rejects_bad_hex() {
    assert!(commands::cmd_accent("#zzzzzz").is_err());
    let accent = commands::cmd_accent("#2e8b57").unwrap();
    assert_eq!(accent.hover, "#297d4e");
}

#[test]
fn preference_changes_survive_between_invocations() {
    let (_dir, root) = data_dir();

    commands::cmd_prefs_accent(&root, "#abcdef").unwrap();
    commands::cmd_prefs_grouping(&root, GroupingCriterion::LastPlayed).unwrap();
    assert_eq!(commands::cmd_prefs_radius(&root, 99).unwrap(), kestrel_config::MAX_BORDER_RADIUS);

    let prefs = commands::cmd_prefs_show(&root).unwrap();
    assert_eq!(prefs.accent_color.base, "#abcdef");
    assert!(prefs.accent_color.is_custom);
    assert_eq!(prefs.profile_grouping_criterion, GroupingCriterion::LastPlayed);
    assert_eq!(prefs.custom_color_history.first(), Some("#abcdef"));

    commands::cmd_prefs_preset(&root, AccentPreset::Rose).unwrap();
    let prefs = commands::cmd_prefs_show(&root).unwrap();
    assert!(!prefs.accent_color.is_custom);
    assert_eq!(prefs.custom_color_history.len(), 1);
}

#[tokio::test]
async fn config_set_commits_to_disk() {
    let (_dir, root) = data_dir();

    let committed = commands::cmd_config_set(&root, "concurrent_downloads", "6")
        .await
        .unwrap();
    assert_eq!(committed.concurrent_downloads, 6);

    commands::cmd_config_set(&root, "wrapper", "gamemoderun")
        .await
        .unwrap();
    let shown = commands::cmd_config_show(&root).await.unwrap();
    assert_eq!(shown.concurrent_downloads, 6);
    assert_eq!(shown.hooks.wrapper.as_deref(), Some("gamemoderun"));
}

#[tokio::test]
async fn config_set_refuses_invalid_values() {
    let (_dir, root) = data_dir();

    assert!(commands::cmd_config_set(&root, "bogus", "1").await.is_err());
    assert!(commands::cmd_config_set(&root, "game_directory", "/games/<x>")
        .await
        .is_err());
    let shown = commands::cmd_config_show(&root).await.unwrap();
    assert_eq!(shown.custom_game_directory, None);
}

#[tokio::test]
async fn launch_without_template_reports_failure() {
    let (_dir, root) = data_dir();
    let err = commands::cmd_launch(&root, "abc", vec![], false)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("Launch failed"));
}

#[cfg(unix)]
#[tokio::test]
async fn launch_with_template_waits_for_exit() {
    let (_dir, root) = data_dir();
    commands::cmd_config_set(&root, "launch_template", "true $PROFILE $ARGS")
        .await
        .unwrap();
    commands::cmd_launch(&root, "abc", vec!["-x".into()], true)
        .await
        .unwrap();
}

#[test]
fn explicit_data_dir_is_used_as_is() {
    let (_dir, root) = data_dir();
    let resolved = kestrel_cli::resolve_data_dir(Some(&root)).unwrap();
    assert_eq!(resolved, root);
    assert!(!resolved.join("ui-preferences.json").exists());
}
