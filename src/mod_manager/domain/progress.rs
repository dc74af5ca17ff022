use serde::{Deserialize, Serialize};

/// One `download_progress` payload. Percentages are floats on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadProgress {
    pub current_mod: String,
    pub total_progress: f32,
    pub extract_progress: f32,
}

impl DownloadProgress {
    /// The backend stops at exactly 100; anything above is treated the same.
    pub fn is_complete(&self) -> bool {
        self.total_progress >= 100.0
    }

    pub fn total_percent(&self) -> u8 {
        Self::percent(self.total_progress)
    }

    pub fn extract_percent(&self) -> u8 {
        Self::percent(self.extract_progress)
    }

    // Truncates so 99.9 never displays as done.
    fn percent(value: f32) -> u8 {
        value.clamp(0.0, 100.0) as u8
    }
}
