use kestrel_core::{LaunchEntry, LaunchState};

use super::events::LaunchEvent;

pub fn reduce(mut entry: LaunchEntry, ev: LaunchEvent) -> LaunchEntry {
    match ev {
        LaunchEvent::Requested { at } | LaunchEvent::Reattached { at } => LaunchEntry {
            state: LaunchState::Launching,
            status_message: None,
            started_at: Some(at),
        },

        LaunchEvent::Progress { message } => {
            if entry.state.is_active() {
                entry.status_message = Some(message);
            }
            entry
        }

        LaunchEvent::Accepted => {
            if entry.state == LaunchState::Launching {
                entry.state = LaunchState::Starting;
                entry.status_message = None;
            }
            entry
        }

        LaunchEvent::StartupWindowElapsed => {
            if entry.state == LaunchState::Starting {
                LaunchEntry::idle()
            } else {
                entry
            }
        }

        LaunchEvent::Failed { message } => {
            if entry.state.is_active() {
                entry.state = LaunchState::Error;
                entry.status_message = Some(message);
            }
            entry
        }

        LaunchEvent::Aborted | LaunchEvent::Exited => {
            if entry.state.is_active() {
                LaunchEntry::idle()
            } else {
                entry
            }
        }
    }
}
