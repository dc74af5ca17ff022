use crate::mod_manager::business::{
    Event, GateOption, InstallError, InternalEvent, SearchPresentation, SharedManagerState,
    keys, present_search,
};
use crate::mod_manager::domain::{DownloadProgress, ModType, SortOrder};
use crate::mod_manager::infra::Subscription;
use futures::StreamExt;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Latest scroll offset reported by the list, sampled into the cache.
#[derive(Clone, Default)]
pub struct ScrollTracker {
    offset: Arc<Mutex<f32>>,
}

impl ScrollTracker {
    pub fn get(&self) -> f32 {
        *self.offset.lock()
    }

    pub fn set(&self, offset: f32) {
        *self.offset.lock() = offset;
    }
}

/// View model of the search screen.
pub struct SearchView {
    state: SharedManagerState,
    scroll: ScrollTracker,
    tasks: Vec<JoinHandle<()>>,
}

impl SearchView {
    pub fn new(state: SharedManagerState) -> Self {
        Self {
            state,
            scroll: ScrollTracker::default(),
            tasks: Vec::new(),
        }
    }

    /// `profile` is the install target when the screen is opened from a profile.
    pub fn mount(&mut self, profile: Option<String>) {
        self.unmount();

        let (rt_handle, client, config, events, cache) = {
            let mut state = self.state.write();
            state.install_target = profile;
            state.load_profiles();
            state.initial_search();
            (
                state.rt_handle().clone(),
                state.client().clone(),
                state.config().clone(),
                state.event_sender(),
                state.cache.clone(),
            )
        };
        self.scroll
            .set(cache.get(keys::SEARCH_SCROLL_POSITION, 0.0f32));

        match client.subscribe_download_progress() {
            Ok(subscription) => {
                self.tasks.push(rt_handle.spawn(forward_progress(
                    subscription,
                    events,
                    config.progress_stall_timeout(),
                )));
            }
            Err(e) => log::warn!("Download progress will not be shown: {e}"),
        }

        let scroll = self.scroll.clone();
        let interval = config.scroll_sample_interval();
        self.tasks.push(rt_handle.spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                cache.set(keys::SEARCH_SCROLL_POSITION, scroll.get());
            }
        }));
    }

    /// Stops the progress listener and the scroll sampler.
    pub fn unmount(&mut self) {
        if self.tasks.is_empty() {
            return;
        }
        for task in self.tasks.drain(..) {
            task.abort();
        }
        self.state
            .read()
            .cache
            .set(keys::SEARCH_SCROLL_POSITION, self.scroll.get());
    }

    pub fn is_mounted(&self) -> bool {
        !self.tasks.is_empty()
    }

    pub fn handle_event(&mut self, event: &Event) {
        if let Event::ScrollToTop = event {
            self.scroll.set(0.0);
        }
    }

    pub fn on_scroll(&self, offset: f32) {
        self.scroll.set(offset);
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll.get()
    }

    pub fn presentation(&self) -> SearchPresentation {
        let state = self.state.read();
        present_search(
            &state.search.filters(),
            &state.search.results(),
            state.search.is_loading(),
            chrono::Utc::now(),
        )
    }

    // ---------------- Filters ----------------
    pub fn submit_query(&self, query: &str) {
        self.state.write().set_query(query);
    }

    pub fn set_sort(&self, sort: SortOrder) {
        self.state.write().set_sort(sort);
    }

    pub fn toggle_type(&self, mod_type: ModType) {
        self.state.write().toggle_type(mod_type);
    }

    pub fn set_category(&self, category: &str, selected: bool) {
        self.state.write().set_category(category, selected);
    }

    pub fn clear_filters(&self) {
        self.state.write().clear_filters();
    }

    /// 1-based, as shown by the pagination control.
    pub fn select_page(&self, page: usize) {
        self.state.write().go_to_page(page.saturating_sub(1));
    }

    // ---------------- Install ----------------
    pub fn install(&self, full_name: &str) -> Result<Option<Event>, InstallError> {
        let summary = {
            let state = self.state.read();
            state
                .search
                .results()
                .items
                .iter()
                .find(|m| m.full_name == full_name)
                .cloned()
        };
        let summary = summary.ok_or_else(|| InstallError::UnknownMod(full_name.to_string()))?;
        self.state.write().request_install(&summary)
    }

    pub fn gate_options(&self) -> Vec<GateOption> {
        self.state.read().gate.options()
    }

    pub fn gate_error(&self) -> Option<String> {
        self.state.read().gate.error().map(str::to_string)
    }

    pub fn choose_gate_option(&self, option: &GateOption) -> Result<(), InstallError> {
        let mut state = self.state.write();
        match option {
            GateOption::Existing(profile) => state.select_gate_profile(&profile.name),
            GateOption::CreateNew { .. } => {
                state.create_gate_profile();
                Ok(())
            }
        }
    }

    pub fn cancel_gate(&self) {
        self.state.write().cancel_gate();
    }

    pub fn progress(&self) -> Option<DownloadProgress> {
        let state = self.state.read();
        let dialog = state.downloads.dialog();
        if dialog.open {
            dialog.progress.clone()
        } else {
            None
        }
    }
}

impl Drop for SearchView {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Forwards progress payloads to the coordinator until the task is aborted.
/// Silence longer than `stall_timeout` is reported so a hung install fails.
async fn forward_progress(
    mut subscription: Subscription<DownloadProgress>,
    events: mpsc::Sender<InternalEvent>,
    stall_timeout: Duration,
) {
    loop {
        let event = match tokio::time::timeout(stall_timeout, subscription.next()).await {
            Ok(Some(progress)) => InternalEvent::DownloadProgress(progress),
            Ok(None) => break,
            Err(_) => InternalEvent::ProgressSilent,
        };
        if events.send(event).await.is_err() {
            break;
        }
    }
    log::debug!("Progress listener on `{}` stopped", subscription.event());
}
