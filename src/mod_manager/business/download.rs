use crate::mod_manager::domain::{DownloadProgress, ModSummary};
use std::time::Duration;
use tokio::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AttemptId(pub u64);

/// What the user asked to install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallRequest {
    pub mod_name: String,
    pub version_name: String,
    pub icon: Option<String>,
}

impl InstallRequest {
    /// Targets the representative (first) version.
    pub fn for_latest(m: &ModSummary) -> Option<Self> {
        let version = m.latest()?;
        Some(Self {
            mod_name: m.name.clone(),
            version_name: version.full_name.clone(),
            icon: Some(version.icon.clone()).filter(|i| !i.is_empty()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub id: AttemptId,
    pub profile: String,
    pub request: InstallRequest,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadFailure {
    Command(String),
    Stalled(Duration),
}

impl DownloadFailure {
    pub fn reason(&self) -> String {
        match self {
            Self::Command(message) => message.clone(),
            Self::Stalled(after) => format!("no progress for {}s", after.as_secs()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadPhase {
    Idle,
    AwaitingProfile { request: InstallRequest },
    Requested(Attempt),
    InProgress(Attempt),
    /// 100% reached, the dialog closes after the debounce delay.
    Completing(Attempt),
    Completed(Attempt),
    Failed {
        attempt: Attempt,
        failure: DownloadFailure,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallStep {
    NeedsProfile,
    Dispatch(Attempt),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum InstallError {
    #[error("an install into `{0}` is still running")]
    Busy(String),
    #[error("`{0}` has no version to install")]
    NoVersion(String),
    #[error("`{0}` is not among the current search results")]
    UnknownMod(String),
    #[error("no install is waiting for a profile")]
    NothingPending,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressDialog {
    pub open: bool,
    pub progress: Option<DownloadProgress>,
}

/// Result of feeding one progress event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressTransition {
    pub applied: bool,
    pub opened: Option<AttemptId>,
    pub finished: Option<AttemptId>,
}

/// Tracks a single install from request to the closed progress dialog.
///
/// The progress stream carries no request id, so at most one attempt is
/// tracked and every event is attributed to it.
pub struct DownloadOrchestrator {
    phase: DownloadPhase,
    dialog: ProgressDialog,
    last_attempt: u64,
    last_activity: Option<Instant>,
}

impl Default for DownloadOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}

impl DownloadOrchestrator {
    pub fn new() -> Self {
        Self {
            phase: DownloadPhase::Idle,
            dialog: ProgressDialog::default(),
            last_attempt: 0,
            last_activity: None,
        }
    }

    pub fn phase(&self) -> &DownloadPhase {
        &self.phase
    }

    pub fn dialog(&self) -> &ProgressDialog {
        &self.dialog
    }

    pub fn is_busy(&self) -> bool {
        self.active_attempt().is_some()
    }

    pub fn pending_request(&self) -> Option<&InstallRequest> {
        match &self.phase {
            DownloadPhase::AwaitingProfile { request } => Some(request),
            _ => None,
        }
    }

    pub fn request_install(
        &mut self,
        request: InstallRequest,
        profile: Option<&str>,
    ) -> Result<InstallStep, InstallError> {
        if let Some(active) = self.active_attempt() {
            return Err(InstallError::Busy(active.profile.clone()));
        }
        match profile {
            Some(profile) => Ok(InstallStep::Dispatch(self.begin(profile, request))),
            None => {
                self.phase = DownloadPhase::AwaitingProfile { request };
                Ok(InstallStep::NeedsProfile)
            }
        }
    }

    pub fn resume_with_profile(&mut self, profile: &str) -> Result<Attempt, InstallError> {
        let DownloadPhase::AwaitingProfile { request } = &self.phase else {
            return Err(InstallError::NothingPending);
        };
        let request = request.clone();
        Ok(self.begin(profile, request))
    }

    pub fn abandon_selection(&mut self) {
        if matches!(self.phase, DownloadPhase::AwaitingProfile { .. }) {
            self.phase = DownloadPhase::Idle;
        }
    }

    pub fn on_progress(&mut self, progress: DownloadProgress) -> ProgressTransition {
        let attempt = match &self.phase {
            DownloadPhase::Requested(a) | DownloadPhase::InProgress(a) => a.clone(),
            // The backend goes quiet while it fetches a package, so a stall is not final.
            DownloadPhase::Failed {
                attempt,
                failure: DownloadFailure::Stalled(_),
            } => {
                log::info!(
                    "Install of {} into `{}` resumed after a stall",
                    attempt.request.version_name,
                    attempt.profile
                );
                attempt.clone()
            }
            _ => {
                log::debug!(
                    "Ignoring progress for {} outside of an install",
                    progress.current_mod
                );
                return ProgressTransition::default();
            }
        };
        self.last_activity = Some(Instant::now());

        let mut transition = ProgressTransition {
            applied: true,
            ..Default::default()
        };
        if !self.dialog.open {
            self.dialog.open = true;
            transition.opened = Some(attempt.id);
        }
        self.phase = DownloadPhase::InProgress(attempt.clone());

        let complete = progress.is_complete();
        self.dialog.progress = Some(progress);
        if complete {
            log::info!(
                "Install of {} into `{}` finished",
                attempt.request.version_name,
                attempt.profile
            );
            transition.finished = Some(attempt.id);
            self.phase = DownloadPhase::Completing(attempt);
        }
        transition
    }

    /// The debounce after 100% elapsed. Returns the completed attempt.
    pub fn on_close_due(&mut self, id: AttemptId) -> Option<Attempt> {
        match &self.phase {
            DownloadPhase::Completing(a) if a.id == id => {
                let attempt = a.clone();
                self.dialog.open = false;
                self.phase = DownloadPhase::Completed(attempt.clone());
                Some(attempt)
            }
            _ => None,
        }
    }

    /// The install command itself answered. Only failures change state.
    pub fn on_command_result(&mut self, id: AttemptId, result: Result<(), String>) -> Option<Attempt> {
        let error = match result {
            Ok(()) => return None,
            Err(error) => error,
        };
        let attempt = self.active_attempt().filter(|a| a.id == id)?.clone();
        if matches!(self.phase, DownloadPhase::Completing(_)) {
            log::warn!("Install command reported `{error}` after completion");
            return None;
        }
        Some(self.fail(attempt, DownloadFailure::Command(error)))
    }

    /// Fails the active attempt when nothing was heard for `timeout`.
    pub fn check_stall(&mut self, timeout: Duration) -> Option<Attempt> {
        let attempt = match &self.phase {
            DownloadPhase::Requested(a) | DownloadPhase::InProgress(a) => a.clone(),
            _ => return None,
        };
        let silent_for = self.last_activity.map(|t| t.elapsed())?;
        if silent_for < timeout {
            return None;
        }
        Some(self.fail(attempt, DownloadFailure::Stalled(silent_for)))
    }

    /// Dismisses a finished or failed attempt.
    pub fn acknowledge(&mut self) {
        if matches!(
            self.phase,
            DownloadPhase::Completed(_) | DownloadPhase::Failed { .. }
        ) {
            self.phase = DownloadPhase::Idle;
            self.dialog.progress = None;
        }
    }

    fn active_attempt(&self) -> Option<&Attempt> {
        match &self.phase {
            DownloadPhase::Requested(a)
            | DownloadPhase::InProgress(a)
            | DownloadPhase::Completing(a) => Some(a),
            _ => None,
        }
    }

    fn begin(&mut self, profile: &str, request: InstallRequest) -> Attempt {
        self.last_attempt += 1;
        let attempt = Attempt {
            id: AttemptId(self.last_attempt),
            profile: profile.to_string(),
            request,
        };
        log::info!(
            "Installing {} into `{}`",
            attempt.request.version_name,
            attempt.profile
        );
        self.dialog = ProgressDialog::default();
        self.last_activity = Some(Instant::now());
        self.phase = DownloadPhase::Requested(attempt.clone());
        attempt
    }

    fn fail(&mut self, attempt: Attempt, failure: DownloadFailure) -> Attempt {
        log::warn!(
            "Install of {} into `{}` failed: {}",
            attempt.request.version_name,
            attempt.profile,
            failure.reason()
        );
        self.dialog.open = false;
        self.phase = DownloadPhase::Failed {
            attempt: attempt.clone(),
            failure,
        };
        attempt
    }
}
