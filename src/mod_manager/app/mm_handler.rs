use crate::mod_manager::business::{
    Effect, Event, InternalEvent, ManagerState, SharedManagerState, ViewStateCache,
};
use crate::mod_manager::domain::ManagerConfig;
use crate::mod_manager::infra::{Backend, BackendClient, ConfigManager, MMRuntime};
use parking_lot::RwLock;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Owns the coordinator: channels, runtime task and shared state.
pub struct MMHandler {
    rt_handle: tokio::runtime::Handle,
    state: SharedManagerState,
    event_rx: mpsc::Receiver<InternalEvent>,
    pending: VecDeque<Event>,
}

impl MMHandler {
    pub fn new(
        rt_handle: tokio::runtime::Handle,
        backend: Arc<dyn Backend>,
        config: ManagerConfig,
    ) -> Self {
        // 1. Communication Channels
        let (effect_sx, effect_rx) = mpsc::channel::<Effect>(1024);
        let (event_sx, event_rx) = mpsc::channel::<InternalEvent>(1024);

        // 2. Infrastructure
        let client = BackendClient::new(backend);
        let cache = ViewStateCache::new();

        // 3. Runtime and State
        let runtime_fn =
            MMRuntime::create(rt_handle.clone(), client.clone(), effect_rx, event_sx.clone());

        let state = Arc::new(RwLock::new(ManagerState::new(
            rt_handle.clone(),
            client,
            Arc::new(config),
            cache,
            effect_sx,
            event_sx,
        )));

        // 4. Background Workers
        rt_handle.spawn(runtime_fn);

        Self {
            rt_handle,
            state,
            event_rx,
            pending: VecDeque::new(),
        }
    }

    /// Loads (or creates) `config.toml` in `config_dir` before wiring up.
    pub async fn with_config_dir(
        rt_handle: tokio::runtime::Handle,
        backend: Arc<dyn Backend>,
        config_dir: PathBuf,
    ) -> anyhow::Result<Self> {
        let config = ConfigManager::new(config_dir).init().await?;
        Ok(Self::new(rt_handle, backend, config))
    }

    pub async fn launch(
        rt_handle: tokio::runtime::Handle,
        backend: Arc<dyn Backend>,
    ) -> anyhow::Result<Self> {
        let handler =
            Self::with_config_dir(rt_handle, backend, ConfigManager::default_dir()).await?;
        handler.bootstrap();
        Ok(handler)
    }

    pub fn rt_handle(&self) -> &tokio::runtime::Handle {
        &self.rt_handle
    }

    pub fn state(&self) -> SharedManagerState {
        self.state.clone()
    }

    pub fn is_loaded(&self) -> bool {
        !self.state.read().loading
    }

    pub fn bootstrap(&self) {
        self.state.write().bootstrap();
    }

    /// Folds every internal event that is already waiting.
    pub fn poll_events(&mut self) -> Vec<Event> {
        let mut events: Vec<Event> = self.pending.drain(..).collect();
        while let Ok(internal) = self.event_rx.try_recv() {
            events.extend(self.state.write().apply(internal));
        }
        events
    }

    /// Waits for the next public event.
    pub async fn next_event(&mut self) -> Option<Event> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Some(event);
            }
            let internal = self.event_rx.recv().await?;
            let events = self.state.write().apply(internal);
            self.pending.extend(events);
        }
    }

    /// Pushes an event produced by a direct intent into the same queue.
    pub fn push_event(&mut self, event: Event) {
        self.pending.push_back(event);
    }
}

impl Drop for MMHandler {
    fn drop(&mut self) {
        self.state.read().cache.clear();
    }
}
