pub mod backend;
pub mod commands;
pub mod config_edit;
pub mod kernel;
pub mod launch;
pub mod ports;
pub mod preferences;
pub mod reconciler;

pub use backend::LocalBackend;
pub use commands::AppCommand;
pub use config_edit::{ConfigEdit, ConfigEditError};
pub use kernel::{AppKernel, KernelOptions};
pub use launch::{
    LaunchAttemptId, LaunchEvent, LaunchOutcome, LaunchRequest, LaunchRequestError, LaunchTracker,
    LaunchTransition, TrackerOptions,
};
pub use ports::*;
pub use preferences::PreferencesState;
pub use reconciler::{
    CommitFailureKind, CommitNotice, ConfigReconciler, ReconcileError, ReconcilerOptions,
};
