//! Per-profile launch lifecycle.
//!
//! Transitions are pure ([`reduce`]); the [`LaunchStore`] applies them and
//! publishes each change; the [`LaunchTracker`] drives them from backend
//! calls.

pub mod events;
pub mod reducer;
pub mod store;
pub mod tracker;

pub use events::{LaunchAttemptId, LaunchEvent, LaunchOutcome, LaunchTransition};
pub use reducer::reduce;
pub use store::LaunchStore;
pub use tracker::{LaunchRequest, LaunchRequestError, LaunchTracker, TrackerOptions};
