pub mod accent;
pub mod history;
pub mod launch;
pub mod preferences;
pub mod settings;
pub mod validate;

pub use accent::{derive_accent, AccentColor, AccentPreset, Rgb};
pub use history::ColorHistory;
pub use launch::{LaunchEntry, LaunchState};
pub use preferences::{GroupingCriterion, UiPreferences, WidgetSlot};
pub use settings::{LaunchHooks, LauncherConfig};
pub use validate::ValidationError;

/// Identifier of an independently launchable profile.
pub type ProfileId = String;
