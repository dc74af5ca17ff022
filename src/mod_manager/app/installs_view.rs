use crate::mod_manager::business::{Route, SharedManagerState};
use crate::mod_manager::domain::Install;

/// View model of the install selector.
pub struct InstallsView {
    state: SharedManagerState,
}

impl InstallsView {
    pub fn new(state: SharedManagerState) -> Self {
        Self { state }
    }

    pub fn mount(&self) {
        self.state.write().scan();
    }

    pub fn is_scanning(&self) -> bool {
        self.state.read().scanning
    }

    pub fn installs(&self) -> Vec<Install> {
        self.state
            .read()
            .scan
            .as_ref()
            .map(|scan| scan.installs.clone())
            .unwrap_or_default()
    }

    pub fn is_selected(&self, install: &Install) -> bool {
        self.state
            .read()
            .scan
            .as_ref()
            .and_then(|scan| scan.selected_install_path.as_deref())
            == Some(install.path.as_str())
    }

    pub fn add_manual(&self) {
        self.state.write().add_manual_install();
    }

    /// Selecting an install leads back to the profiles.
    pub fn select(&self, install: &Install) -> Route {
        self.state.read().select_install(&install.path);
        Route::Profiles
    }

    /// Install shown in the top bar.
    pub fn selected_install(&self) -> Option<Install> {
        self.state.read().selected_install.clone()
    }
}
