use crate::mod_manager::business::download::{
    Attempt, AttemptId, DownloadOrchestrator, InstallError, InstallRequest, InstallStep,
};
use crate::mod_manager::business::profile_gate::ProfileGate;
use crate::mod_manager::business::search_builder::SearchBuilder;
use crate::mod_manager::business::view_cache::{ViewStateCache, keys};
use crate::mod_manager::business::{CreatePurpose, Effect, Event, InternalEvent, Route};
use crate::mod_manager::domain::{
    GameStatus, Install, ManagerConfig, ModSummary, ModType, ProfileInfo, ScanResult, SortOrder,
};
use crate::mod_manager::infra::BackendClient;
use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::mpsc;

pub type SharedManagerState = Arc<RwLock<ManagerState>>;

pub struct ManagerState {
    rt_handle: tokio::runtime::Handle,
    effect_sx: mpsc::Sender<Effect>,
    event_sx: mpsc::Sender<InternalEvent>,

    client: BackendClient,
    config: Arc<ManagerConfig>,

    pub cache: ViewStateCache,
    pub search: SearchBuilder,
    pub downloads: DownloadOrchestrator,
    pub gate: ProfileGate,

    pub loading: bool,
    pub route: Option<Route>,
    pub scan: Option<ScanResult>,
    pub scanning: bool,
    pub selected_install: Option<Install>,
    pub profiles: Vec<ProfileInfo>,
    /// Inline message of the "Add profile" dialog.
    pub profile_form_error: Option<String>,
    /// Profile the search screen installs into, when opened from a profile.
    pub install_target: Option<String>,
}

impl ManagerState {
    pub fn new(
        rt_handle: tokio::runtime::Handle,
        client: BackendClient,
        config: Arc<ManagerConfig>,
        cache: ViewStateCache,
        effect_sx: mpsc::Sender<Effect>,
        event_sx: mpsc::Sender<InternalEvent>,
    ) -> Self {
        let search = SearchBuilder::new(cache.clone(), config.default_sort);
        Self {
            rt_handle,
            effect_sx,
            event_sx,

            client,
            config,

            cache,
            search,
            downloads: DownloadOrchestrator::new(),
            gate: ProfileGate::new(),

            loading: true,
            route: None,
            scan: None,
            scanning: false,
            selected_install: None,
            profiles: Vec::new(),
            profile_form_error: None,
            install_target: None,
        }
    }

    pub fn rt_handle(&self) -> &tokio::runtime::Handle {
        &self.rt_handle
    }

    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub fn config(&self) -> &Arc<ManagerConfig> {
        &self.config
    }

    pub fn event_sender(&self) -> mpsc::Sender<InternalEvent> {
        self.event_sx.clone()
    }

    pub fn dispatch(&self, effect: Effect) {
        if let Err(e) = self.effect_sx.try_send(effect) {
            log::warn!("Dropping effect, runtime unavailable: {e}");
        }
    }

    pub fn game_status(&self) -> GameStatus {
        self.cache.get(keys::GAME_STATUS, GameStatus::default())
    }

    // ---------------- Load-in ----------------
    pub fn bootstrap(&mut self) {
        self.loading = true;
        self.dispatch(Effect::Bootstrap);
    }

    // ---------------- Installs ----------------
    pub fn scan(&mut self) {
        self.scanning = true;
        self.dispatch(Effect::Scan);
    }

    pub fn add_manual_install(&mut self) {
        self.scanning = true;
        self.dispatch(Effect::AddManualInstall);
    }

    pub fn select_install(&self, path: &str) {
        self.dispatch(Effect::SelectInstall {
            path: path.to_string(),
        });
    }

    pub fn load_selected_install(&self) {
        self.dispatch(Effect::LoadSelectedInstall);
    }

    // ---------------- Profiles ----------------
    pub fn load_profiles(&self) {
        self.dispatch(Effect::LoadProfiles);
    }

    pub fn load_profile(&self, name: &str) {
        self.dispatch(Effect::LoadProfile {
            name: name.to_string(),
        });
    }

    /// Resets the "Add profile" dialog.
    pub fn open_profile_form(&mut self) {
        self.profile_form_error = None;
    }

    pub fn create_profile(&mut self, name: &str, icon: Option<String>) {
        self.profile_form_error = None;
        self.dispatch(Effect::CreateProfile {
            name: name.to_string(),
            icon,
            purpose: CreatePurpose::Manual,
        });
    }

    pub fn delete_profile(&self, name: &str) {
        self.dispatch(Effect::DeleteProfile {
            name: name.to_string(),
        });
    }

    pub fn show_in_explorer(&self, path: &str) {
        self.dispatch(Effect::ShowInExplorer {
            path: path.to_string(),
        });
    }

    // ---------------- Mods ----------------
    pub fn load_profile_mods(&self, profile: &str) {
        self.dispatch(Effect::LoadProfileMods {
            profile: profile.to_string(),
        });
    }

    pub fn toggle_mod(&self, profile: &str, full_name: &str) {
        self.dispatch(Effect::ToggleMod {
            profile: profile.to_string(),
            full_name: full_name.to_string(),
        });
    }

    pub fn delete_mod(&self, profile: &str, full_name: &str) {
        self.dispatch(Effect::DeleteMod {
            profile: profile.to_string(),
            full_name: full_name.to_string(),
        });
    }

    // ---------------- Game ----------------
    pub fn check_game_status(&self) {
        self.dispatch(Effect::CheckGameStatus);
    }

    /// Play button of a profile: stops whatever runs, starts `profile` unless
    /// it was the one running.
    pub fn play_or_stop(&self, profile: &str) {
        let status = self.game_status();
        let play = (!status.is_running(profile)).then(|| profile.to_string());
        self.dispatch(Effect::SwitchGame {
            stop_running: status.running,
            play,
        });
    }

    // ---------------- Search ----------------
    pub fn run_search(
        &mut self,
        query: &str,
        page: usize,
        sort: SortOrder,
        show_loading: bool,
    ) {
        let (ticket, request) = self.search.prepare(query, page, sort, show_loading);
        log::debug!("Search {ticket:?} `{}` page {}", request.query, request.page);
        self.dispatch(Effect::Search { ticket, request });
    }

    pub fn initial_search(&mut self) {
        if self.search.needs_initial_search() {
            let sort = self.search.filters().sort_order;
            self.run_search("", 0, sort, true);
        }
    }

    pub fn set_query(&mut self, query: &str) {
        let sort = self.search.filters().sort_order;
        self.run_search(query, 0, sort, false);
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        let query = self.search.filters().query;
        self.run_search(&query, 0, sort, true);
    }

    pub fn toggle_type(&mut self, mod_type: ModType) {
        self.search.toggle_type(mod_type);
        self.refresh_search(0);
    }

    pub fn set_category(&mut self, category: &str, selected: bool) {
        self.search.set_category(category, selected);
        self.refresh_search(0);
    }

    pub fn clear_filters(&mut self) {
        self.search.clear_filters();
        self.refresh_search(0);
    }

    /// Zero-based page.
    pub fn go_to_page(&mut self, page: usize) {
        self.refresh_search(page);
    }

    fn refresh_search(&mut self, page: usize) {
        let filters = self.search.filters();
        self.run_search(&filters.query, page, filters.sort_order, true);
    }

    // ---------------- Install flow ----------------
    pub fn request_install(&mut self, m: &ModSummary) -> Result<Option<Event>, InstallError> {
        let request =
            InstallRequest::for_latest(m).ok_or_else(|| InstallError::NoVersion(m.name.clone()))?;
        let target = self.install_target.clone();
        match self.downloads.request_install(request, target.as_deref())? {
            InstallStep::Dispatch(attempt) => {
                self.dispatch_download(&attempt);
                Ok(None)
            }
            InstallStep::NeedsProfile => {
                let Some(request) = self.downloads.pending_request().cloned() else {
                    return Err(InstallError::NothingPending);
                };
                self.gate.open(request, self.profiles.clone());
                self.load_profiles();
                Ok(Some(Event::ProfileGateOpened))
            }
        }
    }

    pub fn select_gate_profile(&mut self, profile: &str) -> Result<(), InstallError> {
        let attempt = self.downloads.resume_with_profile(profile)?;
        self.gate.close();
        self.dispatch_download(&attempt);
        Ok(())
    }

    pub fn create_gate_profile(&mut self) {
        if let Some((name, icon)) = self.gate.begin_create() {
            self.dispatch(Effect::CreateProfile {
                name,
                icon,
                purpose: CreatePurpose::Install,
            });
        }
    }

    pub fn cancel_gate(&mut self) {
        self.gate.close();
        self.downloads.abandon_selection();
    }

    pub fn acknowledge_install(&mut self) {
        self.downloads.acknowledge();
    }

    fn dispatch_download(&self, attempt: &Attempt) {
        self.dispatch(Effect::DownloadMod {
            attempt: attempt.id,
            profile: attempt.profile.clone(),
            version_name: attempt.request.version_name.clone(),
        });
    }

    fn schedule_dialog_close(&self, attempt: AttemptId) {
        let tx = self.event_sx.clone();
        let delay = self.config.progress_close_delay();
        self.rt_handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx
                .send(InternalEvent::ProgressDialogCloseDue { attempt })
                .await;
        });
    }

    fn failed_install(attempt: Attempt, error: String, was_open: bool) -> Vec<Event> {
        let mut events = Vec::new();
        if was_open {
            events.push(Event::ProgressDialogClosed);
        }
        events.push(Event::FailedInstall {
            profile: attempt.profile,
            version_name: attempt.request.version_name,
            error,
        });
        events
    }

    // ---------------- Events ----------------
    pub fn apply(&mut self, internal: InternalEvent) -> Vec<Event> {
        match internal {
            InternalEvent::Standard(event) => {
                if let Event::FailedInstallCommand { .. } = event {
                    self.scanning = false;
                }
                vec![event]
            }

            InternalEvent::Bootstrapped {
                package_loaded,
                scan,
            } => {
                self.loading = false;
                if !package_loaded {
                    log::warn!("Package index unavailable, continuing with scan");
                }
                match scan {
                    Ok(scan) => {
                        let route = if scan.selected_install_path.is_some() {
                            Route::Profiles
                        } else {
                            Route::Installs
                        };
                        self.selected_install = scan.selected_install().cloned();
                        self.scan = Some(scan);
                        self.route = Some(route);
                        vec![Event::InstallsChanged, Event::Routed(route)]
                    }
                    Err(error) => {
                        self.route = Some(Route::Installs);
                        vec![
                            Event::FailedBootstrap { error },
                            Event::Routed(Route::Installs),
                        ]
                    }
                }
            }

            InternalEvent::ScanCompleted(scan) => {
                self.scanning = false;
                self.selected_install = scan.selected_install().cloned();
                self.scan = Some(scan);
                vec![Event::InstallsChanged]
            }

            InternalEvent::SelectedInstallLoaded(install) => {
                if let Some(scan) = self.scan.as_mut() {
                    scan.selected_install_path = install.as_ref().map(|i| i.path.clone());
                }
                self.selected_install = install;
                vec![Event::SelectedInstallChanged]
            }

            InternalEvent::ProfilesLoaded(profiles) => {
                self.gate.set_profiles(profiles.clone());
                self.profiles = profiles;
                vec![Event::ProfilesChanged]
            }

            InternalEvent::ProfileLoaded(profile) => {
                let name = profile.name.clone();
                self.cache.set(&keys::profile(&name), profile);
                vec![Event::ProfileChanged { name }]
            }

            InternalEvent::ProfileCreated { name, purpose } => {
                let mut events = vec![Event::ProfileCreated { name: name.clone() }];
                match purpose {
                    CreatePurpose::Manual => self.profile_form_error = None,
                    CreatePurpose::Install => match self.downloads.resume_with_profile(&name) {
                        Ok(attempt) => {
                            self.gate.close();
                            self.dispatch_download(&attempt);
                            events.push(Event::ProfileGateClosed);
                        }
                        Err(e) => log::warn!("Profile `{name}` created but {e}"),
                    },
                }
                self.load_profiles();
                events
            }

            InternalEvent::FailedProfileCreation {
                name,
                purpose,
                error,
            } => {
                log::warn!("Failed to create profile `{name}`: {error}");
                match purpose {
                    CreatePurpose::Manual => self.profile_form_error = Some(error.clone()),
                    CreatePurpose::Install => self.gate.on_create_failed(error.clone()),
                }
                vec![Event::FailedProfileCreation { name, error }]
            }

            InternalEvent::ProfileDeleted { name } => {
                self.cache.remove(&keys::profile(&name));
                self.cache.remove(&keys::profile_mods(&name));
                self.cache.remove(&keys::profile_page(&name));
                if self.install_target.as_deref() == Some(name.as_str()) {
                    self.install_target = None;
                }
                self.load_profiles();
                vec![Event::ProfileDeleted { name }]
            }

            InternalEvent::ProfileModsLoaded { profile, mods } => {
                self.cache.set(&keys::profile_mods(&profile), mods);
                vec![Event::ProfileModsChanged { profile }]
            }

            InternalEvent::ModChanged { profile } => {
                self.load_profile_mods(&profile);
                self.load_profiles();
                Vec::new()
            }

            InternalEvent::GameStatusChecked(status) => {
                self.cache.set(keys::GAME_STATUS, status);
                vec![Event::GameStatusChanged]
            }

            InternalEvent::SearchCompleted {
                ticket,
                page,
                results,
            } => {
                if self.search.apply_results(ticket, page, results) {
                    vec![Event::SearchResultsChanged, Event::ScrollToTop]
                } else {
                    Vec::new()
                }
            }

            InternalEvent::FailedSearch { ticket, error } => {
                self.search.apply_failure(ticket, &error);
                Vec::new()
            }

            InternalEvent::DownloadCommandFinished { attempt, result } => {
                let was_open = self.downloads.dialog().open;
                let error = result.as_ref().err().cloned().unwrap_or_default();
                match self.downloads.on_command_result(attempt, result) {
                    Some(failed) => Self::failed_install(failed, error, was_open),
                    None => Vec::new(),
                }
            }

            InternalEvent::DownloadProgress(progress) => {
                let transition = self.downloads.on_progress(progress.clone());
                let mut events = Vec::new();
                if transition.opened.is_some() {
                    events.push(Event::ProgressDialogOpened);
                }
                if transition.applied {
                    events.push(Event::ProgressUpdated(progress));
                }
                if let Some(attempt) = transition.finished {
                    self.schedule_dialog_close(attempt);
                }
                events
            }

            InternalEvent::ProgressSilent => {
                let was_open = self.downloads.dialog().open;
                let timeout = self.config.progress_stall_timeout();
                match self.downloads.check_stall(timeout) {
                    Some(failed) => {
                        let reason = format!("no progress for {}s", timeout.as_secs());
                        Self::failed_install(failed, reason, was_open)
                    }
                    None => Vec::new(),
                }
            }

            InternalEvent::ProgressDialogCloseDue { attempt } => {
                match self.downloads.on_close_due(attempt) {
                    Some(done) => {
                        self.load_profiles();
                        vec![
                            Event::ProgressDialogClosed,
                            Event::InstallCompleted {
                                profile: done.profile,
                                version_name: done.request.version_name,
                            },
                        ]
                    }
                    None => Vec::new(),
                }
            }
        }
    }
}
