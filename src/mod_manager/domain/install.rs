use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallSource {
    Steam,
    Local,
}

/// A game installation found by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Install {
    pub path: String,
    pub icon: String,
    pub source: InstallSource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    pub selected_install_path: Option<String>,
    pub installs: Vec<Install>,
}

impl ScanResult {
    pub fn selected_install(&self) -> Option<&Install> {
        let path = self.selected_install_path.as_ref()?;
        self.installs.iter().find(|i| &i.path == path)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatus {
    pub running: bool,
    pub profile: Option<String>,
}

impl GameStatus {
    pub fn is_running(&self, profile: &str) -> bool {
        self.running && self.profile.as_deref() == Some(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selected_install_lookup() {
        let scan = ScanResult {
            selected_install_path: Some("D:/Games/LC".to_string()),
            installs: vec![
                Install {
                    path: "C:/Steam/LC".to_string(),
                    icon: String::new(),
                    source: InstallSource::Steam,
                },
                Install {
                    path: "D:/Games/LC".to_string(),
                    icon: String::new(),
                    source: InstallSource::Local,
                },
            ],
        };
        assert_eq!(scan.selected_install().unwrap().source, InstallSource::Local);
        assert!(ScanResult::default().selected_install().is_none());
    }

    #[test]
    fn test_game_status_profile_match() {
        let status = GameStatus {
            running: true,
            profile: Some("Main".to_string()),
        };
        assert!(status.is_running("Main"));
        assert!(!status.is_running("Other"));
        assert!(!GameStatus::default().is_running("Main"));
    }
}
