use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use kestrel_core::{LaunchEntry, LaunchState, ProfileId};
use tokio::sync::broadcast;

use super::events::{LaunchAttemptId, LaunchEvent, LaunchTransition};
use super::reducer::reduce;

const TRANSITION_CHANNEL_CAPACITY: usize = 256;

struct Slot {
    entry: LaunchEntry,
    attempt: Option<LaunchAttemptId>,
}

/// Holds at most one entry per profile. Profiles without a slot are `Idle`.
#[derive(Clone)]
pub struct LaunchStore {
    slots: Arc<Mutex<HashMap<ProfileId, Slot>>>,
    transitions: broadcast::Sender<LaunchTransition>,
}

impl Default for LaunchStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LaunchStore {
    pub fn new() -> Self {
        let (transitions, _) = broadcast::channel(TRANSITION_CHANNEL_CAPACITY);
        Self {
            slots: Arc::new(Mutex::new(HashMap::new())),
            transitions,
        }
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<ProfileId, Slot>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<LaunchTransition> {
        self.transitions.subscribe()
    }

    pub fn entry(&self, profile_id: &str) -> LaunchEntry {
        self.slots()
            .get(profile_id)
            .map(|slot| slot.entry.clone())
            .unwrap_or_default()
    }

    /// Every profile that is not `Idle`.
    pub fn entries(&self) -> Vec<(ProfileId, LaunchEntry)> {
        let mut out: Vec<_> = self
            .slots()
            .iter()
            .map(|(id, slot)| (id.clone(), slot.entry.clone()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Starts a new attempt unless one is already outstanding. On refusal
    /// the current state is returned.
    pub fn begin(&self, profile_id: &str, ev: LaunchEvent) -> Result<LaunchAttemptId, LaunchState> {
        let mut slots = self.slots();
        let current = slots
            .get(profile_id)
            .map(|slot| slot.entry.clone())
            .unwrap_or_default();
        if current.state.is_active() {
            return Err(current.state);
        }

        let attempt = uuid::Uuid::new_v4();
        let entry = reduce(current, ev);
        slots.insert(
            profile_id.to_string(),
            Slot {
                entry: entry.clone(),
                attempt: Some(attempt),
            },
        );
        self.publish(profile_id, entry);
        Ok(attempt)
    }

    pub fn is_current(&self, profile_id: &str, attempt: LaunchAttemptId) -> bool {
        self.slots()
            .get(profile_id)
            .is_some_and(|slot| slot.attempt == Some(attempt))
    }

    /// Applies `ev` only while `attempt` is still current. Returns `None` for
    /// a superseded attempt.
    pub fn apply_for(
        &self,
        profile_id: &str,
        attempt: LaunchAttemptId,
        ev: LaunchEvent,
    ) -> Option<LaunchEntry> {
        let mut slots = self.slots();
        match slots.get(profile_id) {
            Some(slot) if slot.attempt == Some(attempt) => {}
            _ => {
                tracing::debug!(profile = profile_id, %attempt, ?ev, "dropping event for stale attempt");
                return None;
            }
        }
        Some(self.apply_locked(&mut slots, profile_id, ev))
    }

    pub fn apply(&self, profile_id: &str, ev: LaunchEvent) -> LaunchEntry {
        let mut slots = self.slots();
        self.apply_locked(&mut slots, profile_id, ev)
    }

    /// Detaches the outstanding attempt so its late results are ignored.
    /// Returns `false` when the profile has nothing outstanding.
    pub fn detach(&self, profile_id: &str) -> bool {
        match self.slots().get_mut(profile_id) {
            Some(slot) if slot.entry.state.is_active() => {
                slot.attempt = None;
                true
            }
            _ => false,
        }
    }

    fn apply_locked(
        &self,
        slots: &mut HashMap<ProfileId, Slot>,
        profile_id: &str,
        ev: LaunchEvent,
    ) -> LaunchEntry {
        let Some(slot) = slots.get_mut(profile_id) else {
            // No slot means Idle; only a new request can leave Idle.
            return LaunchEntry::idle();
        };

        let next = reduce(slot.entry.clone(), ev);
        if next == slot.entry {
            return next;
        }

        if next.is_idle() {
            slots.remove(profile_id);
        } else {
            slot.entry = next.clone();
        }
        self.publish(profile_id, next.clone());
        next
    }

    fn publish(&self, profile_id: &str, entry: LaunchEntry) {
        tracing::debug!(profile = profile_id, state = ?entry.state, "launch transition");
        // No subscribers is fine.
        let _ = self.transitions.send(LaunchTransition {
            profile_id: profile_id.to_string(),
            entry,
        });
    }
}
