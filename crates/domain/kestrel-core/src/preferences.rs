use serde::{Deserialize, Serialize};

use crate::accent::AccentColor;
use crate::history::ColorHistory;

/// How the profile list is grouped in the launcher.
///
/// Older records may carry `"none"`, which no longer exists; it is rewritten
/// to [`GroupingCriterion::Group`] when the record is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingCriterion {
    #[default]
    Group,
    Loader,
    GameVersion,
    LastPlayed,
}

impl GroupingCriterion {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "group" => Some(Self::Group),
            "loader" => Some(Self::Loader),
            "game_version" => Some(Self::GameVersion),
            "last_played" => Some(Self::LastPlayed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetSlot {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Presentation preferences kept across sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UiPreferences {
    pub accent_color: AccentColor,
    pub border_radius: u32,
    pub widget_config: Vec<WidgetSlot>,
    pub profile_grouping_criterion: GroupingCriterion,
    pub custom_color_history: ColorHistory,
}

impl Default for UiPreferences {
    fn default() -> Self {
        Self {
            accent_color: AccentColor::default(),
            border_radius: kestrel_config::DEFAULT_BORDER_RADIUS,
            widget_config: Vec::new(),
            profile_grouping_criterion: GroupingCriterion::default(),
            custom_color_history: ColorHistory::new(),
        }
    }
}
