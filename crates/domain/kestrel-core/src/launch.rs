use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaunchState {
    #[default]
    Idle,
    Launching,
    Starting,
    Error,
}

impl LaunchState {
    /// `Launching` and `Starting` both mean an attempt is still outstanding.
    pub fn is_active(self) -> bool {
        matches!(self, LaunchState::Launching | LaunchState::Starting)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchEntry {
    pub state: LaunchState,
    pub status_message: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
}

impl LaunchEntry {
    pub fn idle() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        self.state == LaunchState::Idle
    }
}
