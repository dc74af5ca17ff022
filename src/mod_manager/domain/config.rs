use crate::mod_manager::domain::SortOrder;
use serde::{Deserialize, Serialize};
use std::time::Duration;

// ---------------- App Config ----------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerConfig {
    /// Time the 100% state stays visible before the progress dialog closes.
    #[serde(default = "default_progress_close_delay_ms")]
    pub progress_close_delay_ms: u64,
    /// Silence on the progress stream after which an install is failed.
    #[serde(default = "default_progress_stall_timeout_secs")]
    pub progress_stall_timeout_secs: u64,
    #[serde(default = "default_scroll_sample_interval_ms")]
    pub scroll_sample_interval_ms: u64,
    #[serde(default = "default_game_status_poll_secs")]
    pub game_status_poll_secs: u64,
    #[serde(default = "default_profile_mods_page_size")]
    pub profile_mods_page_size: usize,
    #[serde(default)]
    pub default_sort: SortOrder,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            progress_close_delay_ms: default_progress_close_delay_ms(),
            progress_stall_timeout_secs: default_progress_stall_timeout_secs(),
            scroll_sample_interval_ms: default_scroll_sample_interval_ms(),
            game_status_poll_secs: default_game_status_poll_secs(),
            profile_mods_page_size: default_profile_mods_page_size(),
            default_sort: SortOrder::default(),
        }
    }
}

impl ManagerConfig {
    pub fn progress_close_delay(&self) -> Duration {
        Duration::from_millis(self.progress_close_delay_ms)
    }

    pub fn progress_stall_timeout(&self) -> Duration {
        Duration::from_secs(self.progress_stall_timeout_secs.max(1))
    }

    pub fn scroll_sample_interval(&self) -> Duration {
        Duration::from_millis(self.scroll_sample_interval_ms.max(1))
    }

    pub fn game_status_poll_interval(&self) -> Duration {
        Duration::from_secs(self.game_status_poll_secs.max(1))
    }
}

fn default_progress_close_delay_ms() -> u64 {
    50
}

fn default_progress_stall_timeout_secs() -> u64 {
    30
}

fn default_scroll_sample_interval_ms() -> u64 {
    500
}

fn default_game_status_poll_secs() -> u64 {
    5
}

fn default_profile_mods_page_size() -> usize {
    20
}
