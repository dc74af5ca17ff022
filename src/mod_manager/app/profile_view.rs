use crate::mod_manager::app::game_status::GameStatusPoller;
use crate::mod_manager::business::{
    ModTablePage, ModTableQuery, Persisted, SharedManagerState, SortDirection, keys,
    present_profile_mods,
};
use crate::mod_manager::domain::{ModInfo, Profile};

/// View model of a single profile and its installed mods.
pub struct ProfileView {
    state: SharedManagerState,
    name: String,
    filter: String,
    direction: SortDirection,
    page: Persisted<usize>,
    poller: Option<GameStatusPoller>,
}

impl ProfileView {
    pub fn new(state: SharedManagerState, name: &str) -> Self {
        let page = state.read().cache.slot(keys::profile_page(name), 1usize);
        Self {
            state,
            name: name.to_string(),
            filter: String::new(),
            direction: SortDirection::Ascending,
            page,
            poller: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mount(&mut self) {
        {
            let state = self.state.read();
            state.load_profile(&self.name);
            state.load_profile_mods(&self.name);
        }
        self.poller = Some(GameStatusPoller::start(&self.state));
    }

    pub fn unmount(&mut self) {
        self.poller = None;
    }

    pub fn profile(&self) -> Option<Profile> {
        self.state.read().cache.get_opt(&keys::profile(&self.name))
    }

    pub fn mods(&self) -> Vec<ModInfo> {
        self.state
            .read()
            .cache
            .get(&keys::profile_mods(&self.name), Vec::new())
    }

    // ---------------- Table ----------------
    pub fn set_filter(&mut self, filter: &str) {
        self.filter = filter.to_string();
        self.page.set(1);
    }

    pub fn toggle_sort(&mut self) {
        self.direction = self.direction.flipped();
    }

    pub fn set_page(&self, page: usize) {
        self.page.set(page.max(1));
    }

    pub fn table(&self) -> ModTablePage {
        let page_size = self.state.read().config().profile_mods_page_size;
        present_profile_mods(
            &self.mods(),
            &ModTableQuery {
                filter: self.filter.clone(),
                direction: self.direction,
                page: self.page.get(),
                page_size,
            },
        )
    }

    // ---------------- Actions ----------------
    pub fn toggle_mod(&self, m: &ModInfo) {
        self.state.read().toggle_mod(&self.name, &m.full_name);
    }

    pub fn delete_mod(&self, m: &ModInfo) {
        self.state.read().delete_mod(&self.name, &m.full_name);
    }

    pub fn open_mod_folder(&self, m: &ModInfo) {
        self.state.read().show_in_explorer(&m.folder);
    }

    pub fn open_profile_folder(&self) {
        if let Some(profile) = self.profile() {
            self.state.read().show_in_explorer(&profile.folder);
        }
    }

    pub fn is_running(&self) -> bool {
        self.state.read().game_status().is_running(&self.name)
    }

    pub fn toggle_play(&self) {
        self.state.read().play_or_stop(&self.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mod_manager::app::MMHandler;
    use crate::mod_manager::business::Event;
    use crate::mod_manager::domain::{ManagerConfig, fixtures};
    use crate::mod_manager::infra::fake_backend::FakeBackend;
    use serde_json::{Value, json};
    use std::time::Duration;

    async fn wait_for(handler: &mut MMHandler, wanted: impl Fn(&Event) -> bool) {
        loop {
            let event = tokio::time::timeout(Duration::from_secs(5), handler.next_event())
                .await
                .expect("event not seen in time")
                .expect("event channel closed");
            if wanted(&event) {
                return;
            }
        }
    }

    fn mods_json(count: usize) -> Value {
        let mods: Vec<ModInfo> = (0..count)
            .map(|i| fixtures::mod_info(&format!("Mod{i:02}"), i % 2 == 0))
            .collect();
        serde_json::to_value(mods).unwrap()
    }

    fn setup(backend: &std::sync::Arc<FakeBackend>) -> MMHandler {
        backend.reply(
            "get_profile",
            json!({ "name": "Main", "icon": null, "folder": "/p/Main" }),
        );
        backend.reply("get_profile_mods", mods_json(45));
        MMHandler::new(
            tokio::runtime::Handle::current(),
            backend.clone(),
            ManagerConfig::default(),
        )
    }

    #[tokio::test]
    async fn test_mount_caches_profile_and_mods() {
        let backend = FakeBackend::new();
        let mut handler = setup(&backend);
        let mut view = ProfileView::new(handler.state(), "Main");

        view.mount();
        tokio::time::sleep(Duration::from_millis(20)).await;
        let events = handler.poll_events();
        assert!(events.contains(&Event::ProfileChanged {
            name: "Main".to_string()
        }));
        assert!(events.contains(&Event::ProfileModsChanged {
            profile: "Main".to_string()
        }));

        assert_eq!(view.profile().unwrap().folder, "/p/Main");
        let table = view.table();
        assert_eq!(table.filtered_count, 45);
        assert_eq!(table.total_pages, 3);
        assert_eq!(table.rows.len(), 20);
        assert!(table.show_pagination);

        view.unmount();
    }

    #[tokio::test]
    async fn test_page_survives_new_view_and_resets_on_filter() {
        let backend = FakeBackend::new();
        let mut handler = setup(&backend);
        let mut view = ProfileView::new(handler.state(), "Main");
        view.mount();
        wait_for(&mut handler, |e| matches!(e, Event::ProfileModsChanged { .. })).await;

        view.set_page(3);
        assert_eq!(view.table().rows.len(), 5);

        let mut again = ProfileView::new(handler.state(), "Main");
        assert_eq!(again.table().rows.len(), 5);

        again.set_filter("mod0");
        let table = again.table();
        assert_eq!(table.filtered_count, 10);
        assert!(!table.show_pagination);
        assert_eq!(table.rows[0].name, "Mod00");

        again.toggle_sort();
        assert_eq!(again.table().rows[0].name, "Mod09");
    }

    #[tokio::test]
    async fn test_toggle_refetches_mods() {
        let backend = FakeBackend::new();
        let mut handler = setup(&backend);
        let view = ProfileView::new(handler.state(), "Main");
        let m = fixtures::mod_info("Mod01", false);

        view.toggle_mod(&m);
        wait_for(&mut handler, |e| matches!(e, Event::ProfileModsChanged { .. })).await;
        assert_eq!(
            backend.calls("toggle_mod"),
            vec![json!({ "profile": "Main", "name": "Author-Mod01" })]
        );
        assert_eq!(backend.calls("get_profile_mods").len(), 1);
    }
}
