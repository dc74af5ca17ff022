use crate::mod_manager::app::game_status::GameStatusPoller;
use crate::mod_manager::business::SharedManagerState;
use crate::mod_manager::domain::ProfileInfo;

/// View model of the profiles screen.
pub struct ProfilesView {
    state: SharedManagerState,
    poller: Option<GameStatusPoller>,
}

impl ProfilesView {
    pub fn new(state: SharedManagerState) -> Self {
        Self {
            state,
            poller: None,
        }
    }

    pub fn mount(&mut self) {
        {
            let state = self.state.read();
            state.load_profiles();
            state.load_selected_install();
        }
        self.poller = Some(GameStatusPoller::start(&self.state));
    }

    pub fn unmount(&mut self) {
        self.poller = None;
    }

    pub fn profiles(&self) -> Vec<ProfileInfo> {
        self.state.read().profiles.clone()
    }

    pub fn is_running(&self, profile: &str) -> bool {
        self.state.read().game_status().is_running(profile)
    }

    // Add profile dialog
    pub fn open_add_dialog(&self) {
        self.state.write().open_profile_form();
    }

    pub fn add_profile(&self, name: &str, icon: Option<String>) {
        self.state.write().create_profile(name.trim(), icon);
    }

    pub fn add_dialog_error(&self) -> Option<String> {
        self.state.read().profile_form_error.clone()
    }

    pub fn delete_profile(&self, name: &str) {
        self.state.read().delete_profile(name);
    }

    pub fn open_folder(&self, profile: &ProfileInfo) {
        self.state.read().show_in_explorer(&profile.folder);
    }

    pub fn toggle_play(&self, profile: &str) {
        self.state.read().play_or_stop(profile);
    }
}
