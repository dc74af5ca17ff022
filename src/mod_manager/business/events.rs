use crate::mod_manager::business::download::AttemptId;
use crate::mod_manager::business::effects::CreatePurpose;
use crate::mod_manager::domain::{
    DownloadProgress, GameStatus, Install, ModInfo, Profile, ProfileInfo, ScanResult,
    SearchResultPage, SearchTicket,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Profiles,
    Installs,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    // Load-in events
    Routed(Route),
    FailedBootstrap {
        error: String,
    },

    // Install events
    InstallsChanged,
    SelectedInstallChanged,
    FailedInstallCommand {
        error: String,
    },

    // Profile events
    ProfilesChanged,
    ProfileChanged {
        name: String,
    },
    ProfileCreated {
        name: String,
    },
    FailedProfileCreation {
        name: String,
        error: String,
    },
    ProfileDeleted {
        name: String,
    },
    FailedProfileCommand {
        name: String,
        error: String,
    },

    // Mod events
    ProfileModsChanged {
        profile: String,
    },
    FailedModCommand {
        profile: String,
        full_name: String,
        error: String,
    },

    // Game events
    GameStatusChanged,
    FailedGameCommand {
        error: String,
    },

    // Search events
    SearchResultsChanged,
    ScrollToTop,

    // Download events
    ProfileGateOpened,
    ProfileGateClosed,
    ProgressDialogOpened,
    ProgressUpdated(DownloadProgress),
    ProgressDialogClosed,
    InstallCompleted {
        profile: String,
        version_name: String,
    },
    FailedInstall {
        profile: String,
        version_name: String,
        error: String,
    },

    // Misc
    FailedExplorer {
        path: String,
        error: String,
    },
}

pub enum InternalEvent {
    Standard(Event),

    Bootstrapped {
        package_loaded: bool,
        scan: Result<ScanResult, String>,
    },

    ScanCompleted(ScanResult),
    SelectedInstallLoaded(Option<Install>),

    ProfilesLoaded(Vec<ProfileInfo>),
    ProfileLoaded(Profile),
    ProfileCreated {
        name: String,
        purpose: CreatePurpose,
    },
    FailedProfileCreation {
        name: String,
        purpose: CreatePurpose,
        error: String,
    },
    ProfileDeleted {
        name: String,
    },

    ProfileModsLoaded {
        profile: String,
        mods: Vec<ModInfo>,
    },
    ModChanged {
        profile: String,
    },

    GameStatusChecked(GameStatus),

    SearchCompleted {
        ticket: SearchTicket,
        page: usize,
        results: SearchResultPage,
    },
    FailedSearch {
        ticket: SearchTicket,
        error: String,
    },

    DownloadCommandFinished {
        attempt: AttemptId,
        result: Result<(), String>,
    },
    DownloadProgress(DownloadProgress),
    /// Nothing arrived on the progress stream for the stall timeout.
    ProgressSilent,
    ProgressDialogCloseDue {
        attempt: AttemptId,
    },
}
