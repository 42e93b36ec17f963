use kestrel_core::{AccentPreset, GroupingCriterion, ProfileId, WidgetSlot};

use crate::config_edit::ConfigEdit;

/// A user intent routed through [`crate::AppKernel::dispatch`].
#[derive(Debug, Clone)]
pub enum AppCommand {
    Launch {
        profile_id: ProfileId,
        extra_args: Vec<String>,
    },
    AbortLaunch(ProfileId),
    /// Progress pushed by the backend while a launch is outstanding.
    LaunchProgress {
        profile_id: ProfileId,
        message: String,
    },
    ReattachLaunches(Vec<ProfileId>),

    LoadConfig,
    EditConfig(ConfigEdit),
    CommitConfig,
    ResetConfig,

    SetCustomAccent(String),
    SelectAccentPreset(AccentPreset),
    SetBorderRadius(u32),
    SetGrouping(GroupingCriterion),
    SetWidgets(Vec<WidgetSlot>),
}
