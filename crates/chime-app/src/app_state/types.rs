//! Internal types and constants for the app state module.

use std::path::PathBuf;
use std::time::Duration;

/// How often to poll the bridge queues (approx 60 Hz).
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(16);

/// Capacity of the host event bus.
pub(super) const EVENT_BUS_CAPACITY: usize = 64;

/// Launch-time overrides from the command line.
#[derive(Debug, Clone, Default)]
pub struct LaunchOptions {
    pub data_dir: Option<PathBuf>,
    pub url: Option<String>,
}

/// What the window system last said about the window. The app counts as
/// backgrounded unless it is running, focused and visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct WindowActivity {
    pub focused: bool,
    pub occluded: bool,
    pub suspended: bool,
}

impl Default for WindowActivity {
    fn default() -> Self {
        Self {
            focused: true,
            occluded: false,
            suspended: false,
        }
    }
}

impl WindowActivity {
    pub fn in_background(&self) -> bool {
        !self.focused || self.occluded || self.suspended
    }
}

/// A finished native call, waiting to be handed back to the page.
#[derive(Debug)]
pub(super) struct CallOutcome {
    pub id: u64,
    pub result: Result<serde_json::Value, String>,
}
