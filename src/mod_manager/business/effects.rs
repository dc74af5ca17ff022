use crate::mod_manager::business::download::AttemptId;
use crate::mod_manager::domain::{SearchRequest, SearchTicket};

/// Why a profile is being created; decides where a failure is reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CreatePurpose {
    /// The "Add profile" dialog.
    Manual,
    /// The profile gate, a download follows on success.
    Install,
}

#[derive(Clone, Debug)]
pub enum Effect {
    // Load-in effects
    Bootstrap,

    // Install effects
    Scan,
    AddManualInstall,
    SelectInstall {
        path: String,
    },
    LoadSelectedInstall,

    // Profile effects
    LoadProfiles,
    LoadProfile {
        name: String,
    },
    CreateProfile {
        name: String,
        icon: Option<String>,
        purpose: CreatePurpose,
    },
    DeleteProfile {
        name: String,
    },

    // Mod effects
    LoadProfileMods {
        profile: String,
    },
    ToggleMod {
        profile: String,
        full_name: String,
    },
    DeleteMod {
        profile: String,
        full_name: String,
    },

    // Game effects
    CheckGameStatus,
    /// Stops the running game first when asked, then starts `play`.
    SwitchGame {
        stop_running: bool,
        play: Option<String>,
    },

    // Search effects
    Search {
        ticket: SearchTicket,
        request: SearchRequest,
    },

    // Download effects
    DownloadMod {
        attempt: AttemptId,
        profile: String,
        version_name: String,
    },

    // Misc
    ShowInExplorer {
        path: String,
    },
}
