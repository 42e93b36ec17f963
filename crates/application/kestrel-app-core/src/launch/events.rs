use chrono::{DateTime, Utc};
use kestrel_core::{LaunchEntry, ProfileId};
use uuid::Uuid;

/// Identifies one accepted launch request. Results tagged with an attempt
/// that is no longer current are discarded.
pub type LaunchAttemptId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchEvent {
    Requested { at: DateTime<Utc> },
    /// A launch found running on the backend after a restart.
    Reattached { at: DateTime<Utc> },
    Progress { message: String },
    /// The backend reported success.
    Accepted,
    StartupWindowElapsed,
    Failed { message: String },
    Aborted,
    /// A reattached launch is no longer running.
    Exited,
}

/// Published after every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchTransition {
    pub profile_id: ProfileId,
    pub entry: LaunchEntry,
}

/// How an accepted launch request ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Started,
    Failed(String),
    Aborted,
}
