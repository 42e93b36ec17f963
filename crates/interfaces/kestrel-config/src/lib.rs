//! Central configuration constants for runtime limits and defaults.

/// Delay before a draft configuration change is written to the backend.
pub const DEFAULT_COMMIT_DEBOUNCE_MS: u64 = 500;

/// How long a profile stays in `Starting` after the backend accepted a launch.
pub const DEFAULT_STARTING_DISPLAY_MS: u64 = 1500;

/// Poll interval used while watching a launch reattached after a restart.
pub const DEFAULT_REATTACH_POLL_MS: u64 = 1000;

/// Number of custom accent colors remembered, most recent first.
pub const COLOR_HISTORY_CAPACITY: usize = 10;

/// Accent used when nothing valid is stored.
pub const DEFAULT_ACCENT_HEX: &str = "#3b82f6";

/// Default number of concurrent downloads.
pub const DEFAULT_CONCURRENT_DOWNLOADS: usize = 10;

/// Minimum allowed concurrent downloads.
pub const MIN_CONCURRENT_DOWNLOADS: usize = 1;

/// Maximum allowed concurrent downloads.
pub const MAX_CONCURRENT_DOWNLOADS: usize = 20;

/// Default number of concurrent file operations.
pub const DEFAULT_CONCURRENT_IO_LIMIT: usize = 10;

/// Minimum allowed concurrent file operations.
pub const MIN_CONCURRENT_IO_LIMIT: usize = 1;

/// Maximum allowed concurrent file operations.
pub const MAX_CONCURRENT_IO_LIMIT: usize = 32;

/// Default corner radius in pixels.
pub const DEFAULT_BORDER_RADIUS: u32 = 8;

/// Largest corner radius the UI accepts.
pub const MAX_BORDER_RADIUS: u32 = 32;

/// Clamp a download concurrency value into the allowed range.
pub fn clamp_concurrent_downloads(v: usize) -> usize {
    v.clamp(MIN_CONCURRENT_DOWNLOADS, MAX_CONCURRENT_DOWNLOADS)
}

/// Clamp a file-operation concurrency value into the allowed range.
pub fn clamp_io_limit(v: usize) -> usize {
    v.clamp(MIN_CONCURRENT_IO_LIMIT, MAX_CONCURRENT_IO_LIMIT)
}

pub fn clamp_border_radius(v: u32) -> u32 {
    v.min(MAX_BORDER_RADIUS)
}
