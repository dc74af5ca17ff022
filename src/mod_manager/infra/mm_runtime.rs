use crate::mod_manager::business::{CreatePurpose, Effect, Event, InternalEvent};
use crate::mod_manager::infra::{BackendClient, BackendError};
use std::pin::Pin;
use tokio::sync::mpsc;

pub type AsyncRunFn = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Executes effects against the backend and reports back as internal events.
pub struct MMRuntime {
    rt_handle: tokio::runtime::Handle,
    client: BackendClient,
    effect_rx: mpsc::Receiver<Effect>,
    event_tx: mpsc::Sender<InternalEvent>,
}

impl MMRuntime {
    pub fn create(
        rt_handle: tokio::runtime::Handle,
        client: BackendClient,
        effect_rx: mpsc::Receiver<Effect>,
        event_tx: mpsc::Sender<InternalEvent>,
    ) -> AsyncRunFn {
        let mut runtime = Self {
            rt_handle,
            client,
            effect_rx,
            event_tx,
        };

        Box::pin(async move {
            runtime.run().await;
        })
    }

    pub async fn run(&mut self) {
        while let Some(effect) = self.effect_rx.recv().await {
            self.handle_effect(effect);
        }
        log::debug!("Effect channel closed, runtime stopped");
    }

    fn handle_effect(&self, effect: Effect) {
        let client = self.client.clone();
        let tx = self.event_tx.clone();
        match effect {
            Effect::Bootstrap => {
                self.rt_handle.spawn(async move {
                    let package_loaded = match client.load_package().await {
                        Ok(()) => true,
                        Err(e) => {
                            log::warn!("Failed to load package index: {e}");
                            false
                        }
                    };
                    let scan = client.scan().await.map_err(|e| e.reason());
                    let _ = tx
                        .send(InternalEvent::Bootstrapped {
                            package_loaded,
                            scan,
                        })
                        .await;
                });
            }

            Effect::Scan => {
                self.rt_handle.spawn(async move {
                    let event = match client.scan().await {
                        Ok(scan) => InternalEvent::ScanCompleted(scan),
                        Err(e) => InternalEvent::Standard(Event::FailedInstallCommand {
                            error: e.reason(),
                        }),
                    };
                    let _ = tx.send(event).await;
                });
            }

            Effect::AddManualInstall => {
                self.rt_handle.spawn(async move {
                    let rescanned = async {
                        client.add_manual_install().await?;
                        client.scan().await
                    };
                    let event = match rescanned.await {
                        Ok(scan) => InternalEvent::ScanCompleted(scan),
                        Err(e) => InternalEvent::Standard(Event::FailedInstallCommand {
                            error: e.reason(),
                        }),
                    };
                    let _ = tx.send(event).await;
                });
            }

            Effect::SelectInstall { path } => {
                self.rt_handle.spawn(async move {
                    if let Err(e) = client.select_install(Some(path.as_str())).await {
                        let _ = tx
                            .send(InternalEvent::Standard(Event::FailedInstallCommand {
                                error: e.reason(),
                            }))
                            .await;
                        return;
                    }
                    match client.get_selected_install().await {
                        Ok(install) => {
                            let _ = tx.send(InternalEvent::SelectedInstallLoaded(install)).await;
                        }
                        Err(e) => log::warn!("Failed to read selected install: {e}"),
                    }
                });
            }

            Effect::LoadSelectedInstall => {
                self.rt_handle.spawn(async move {
                    match client.get_selected_install().await {
                        Ok(install) => {
                            let _ = tx.send(InternalEvent::SelectedInstallLoaded(install)).await;
                        }
                        Err(e) => log::warn!("Failed to read selected install: {e}"),
                    }
                });
            }

            Effect::LoadProfiles => {
                self.rt_handle.spawn(async move {
                    match client.get_profiles().await {
                        Ok(profiles) => {
                            let _ = tx.send(InternalEvent::ProfilesLoaded(profiles)).await;
                        }
                        Err(e) => log::warn!("Failed to load profiles: {e}"),
                    }
                });
            }

            Effect::LoadProfile { name } => {
                self.rt_handle.spawn(async move {
                    match client.get_profile(&name).await {
                        Ok(profile) => {
                            let _ = tx.send(InternalEvent::ProfileLoaded(profile)).await;
                        }
                        Err(e) => log::warn!("Failed to load profile `{name}`: {e}"),
                    }
                });
            }

            Effect::CreateProfile {
                name,
                icon,
                purpose,
            } => {
                self.rt_handle.spawn(async move {
                    let event = match client.create_profile(&name, icon.as_deref()).await {
                        Ok(()) => InternalEvent::ProfileCreated { name, purpose },
                        Err(e) => InternalEvent::FailedProfileCreation {
                            name,
                            purpose,
                            error: e.reason(),
                        },
                    };
                    let _ = tx.send(event).await;
                });
            }

            Effect::DeleteProfile { name } => {
                self.rt_handle.spawn(async move {
                    let event = match client.delete_profile(&name).await {
                        Ok(()) => InternalEvent::ProfileDeleted { name },
                        Err(e) => InternalEvent::Standard(Event::FailedProfileCommand {
                            name,
                            error: e.reason(),
                        }),
                    };
                    let _ = tx.send(event).await;
                });
            }

            Effect::LoadProfileMods { profile } => {
                self.rt_handle.spawn(async move {
                    match client.get_profile_mods(&profile).await {
                        Ok(mods) => {
                            let _ = tx
                                .send(InternalEvent::ProfileModsLoaded { profile, mods })
                                .await;
                        }
                        Err(e) => log::warn!("Failed to load mods of `{profile}`: {e}"),
                    }
                });
            }

            Effect::ToggleMod { profile, full_name } => {
                self.rt_handle.spawn(async move {
                    let result = client.toggle_mod(&profile, &full_name).await;
                    let _ = tx.send(mod_changed(profile, full_name, result)).await;
                });
            }

            Effect::DeleteMod { profile, full_name } => {
                self.rt_handle.spawn(async move {
                    let result = client.delete_mod(&profile, &full_name).await;
                    let _ = tx.send(mod_changed(profile, full_name, result)).await;
                });
            }

            Effect::CheckGameStatus => {
                self.rt_handle.spawn(async move {
                    match client.get_game_status().await {
                        Ok(status) => {
                            let _ = tx.send(InternalEvent::GameStatusChecked(status)).await;
                        }
                        Err(e) => log::warn!("Failed to read game status: {e}"),
                    }
                });
            }

            Effect::SwitchGame { stop_running, play } => {
                self.rt_handle.spawn(async move {
                    let mut result = Ok(());
                    if stop_running {
                        result = client.stop_game().await;
                    }
                    if let Some(profile) = play.filter(|_| result.is_ok()) {
                        result = client.play_profile(&profile).await;
                    }
                    if let Err(e) = result {
                        let _ = tx
                            .send(InternalEvent::Standard(Event::FailedGameCommand {
                                error: e.reason(),
                            }))
                            .await;
                    }
                    match client.get_game_status().await {
                        Ok(status) => {
                            let _ = tx.send(InternalEvent::GameStatusChecked(status)).await;
                        }
                        Err(e) => log::warn!("Failed to read game status: {e}"),
                    }
                });
            }

            Effect::Search { ticket, request } => {
                self.rt_handle.spawn(async move {
                    let event = match client.search(&request).await {
                        Ok(results) => InternalEvent::SearchCompleted {
                            ticket,
                            page: request.page,
                            results,
                        },
                        Err(e) => InternalEvent::FailedSearch {
                            ticket,
                            error: e.to_string(),
                        },
                    };
                    let _ = tx.send(event).await;
                });
            }

            Effect::DownloadMod {
                attempt,
                profile,
                version_name,
            } => {
                self.rt_handle.spawn(async move {
                    let result = client
                        .download_mod(&profile, &version_name)
                        .await
                        .map_err(|e| e.reason());
                    let _ = tx
                        .send(InternalEvent::DownloadCommandFinished { attempt, result })
                        .await;
                });
            }

            Effect::ShowInExplorer { path } => {
                self.rt_handle.spawn(async move {
                    if let Err(e) = client.show_in_explorer(&path).await {
                        let _ = tx
                            .send(InternalEvent::Standard(Event::FailedExplorer {
                                path,
                                error: e.reason(),
                            }))
                            .await;
                    }
                });
            }
        }
    }
}

fn mod_changed(
    profile: String,
    full_name: String,
    result: Result<(), BackendError>,
) -> InternalEvent {
    match result {
        Ok(()) => InternalEvent::ModChanged { profile },
        Err(e) => InternalEvent::Standard(Event::FailedModCommand {
            profile,
            full_name,
            error: e.reason(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mod_manager::business::AttemptId;
    use crate::mod_manager::domain::{SearchFilters, SearchTicket};
    use crate::mod_manager::infra::fake_backend::FakeBackend;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn start(backend: Arc<FakeBackend>) -> (mpsc::Sender<Effect>, mpsc::Receiver<InternalEvent>) {
        let (effect_sx, effect_rx) = mpsc::channel(16);
        let (event_sx, event_rx) = mpsc::channel(16);
        let run = MMRuntime::create(
            tokio::runtime::Handle::current(),
            BackendClient::new(backend),
            effect_rx,
            event_sx,
        );
        tokio::spawn(run);
        (effect_sx, event_rx)
    }

    async fn next(rx: &mut mpsc::Receiver<InternalEvent>) -> InternalEvent {
        tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("no event in time")
            .expect("runtime gone")
    }

    #[tokio::test]
    async fn test_bootstrap_loads_package_then_scans() {
        let backend = FakeBackend::new();
        backend.fail("load_package", "offline");
        backend.reply(
            "scan",
            json!({
                "selected_install_path": null,
                "installs": [{ "path": "C:/LC", "icon": "", "source": "Steam" }]
            }),
        );
        let (effects, mut events) = start(backend.clone());

        effects.send(Effect::Bootstrap).await.unwrap();
        match next(&mut events).await {
            InternalEvent::Bootstrapped {
                package_loaded,
                scan,
            } => {
                assert!(!package_loaded);
                assert_eq!(scan.unwrap().installs.len(), 1);
            }
            _ => panic!("expected bootstrap result"),
        }
        assert_eq!(backend.command_log(), vec!["load_package", "scan"]);
    }

    #[tokio::test]
    async fn test_manual_install_rescans_after_picker() {
        let backend = FakeBackend::new();
        backend.reply("add_manual_install", json!(null));
        backend.reply(
            "scan",
            json!({
                "selected_install_path": null,
                "installs": [{ "path": "D:/Games/LC", "icon": "", "source": "Local" }]
            }),
        );
        let (effects, mut events) = start(backend.clone());

        effects.send(Effect::AddManualInstall).await.unwrap();
        match next(&mut events).await {
            InternalEvent::ScanCompleted(scan) => {
                assert_eq!(scan.installs[0].path, "D:/Games/LC");
            }
            _ => panic!("expected a rescan"),
        }
        assert_eq!(backend.command_log(), vec!["add_manual_install", "scan"]);
    }

    #[tokio::test]
    async fn test_create_profile_failure_carries_reason() {
        let backend = FakeBackend::new();
        backend.fail("create_profile", "A profile with that name already exists");
        let (effects, mut events) = start(backend.clone());

        effects
            .send(Effect::CreateProfile {
                name: "Main".to_string(),
                icon: None,
                purpose: CreatePurpose::Manual,
            })
            .await
            .unwrap();
        match next(&mut events).await {
            InternalEvent::FailedProfileCreation { name, error, .. } => {
                assert_eq!(name, "Main");
                assert_eq!(error, "A profile with that name already exists");
            }
            _ => panic!("expected creation failure"),
        }
        assert_eq!(
            backend.calls("create_profile"),
            vec![json!({ "name": "Main", "icon": null })]
        );
    }

    #[tokio::test]
    async fn test_search_sends_wire_request() {
        let backend = FakeBackend::new();
        backend.reply(
            "search",
            json!({ "categories": ["Libraries"], "mods": [], "pages": 4 }),
        );
        let (effects, mut events) = start(backend.clone());

        let mut filters = SearchFilters::default();
        filters.categories.insert("Libraries".to_string(), true);
        filters.categories.insert("Emotes".to_string(), false);
        effects
            .send(Effect::Search {
                ticket: SearchTicket(7),
                request: filters.to_request(),
            })
            .await
            .unwrap();

        match next(&mut events).await {
            InternalEvent::SearchCompleted {
                ticket,
                page,
                results,
            } => {
                assert_eq!(ticket, SearchTicket(7));
                assert_eq!(page, 0);
                assert_eq!(results.total_pages, 4);
            }
            _ => panic!("expected search result"),
        }
        assert_eq!(
            backend.calls("search"),
            vec![json!({
                "query": "",
                "page": 0,
                "sort": "rating",
                "categories": ["Libraries"],
                "types": { "Mods": 0, "Modpacks": 0 }
            })]
        );
    }

    #[tokio::test]
    async fn test_switch_game_stops_before_playing() {
        let backend = FakeBackend::new();
        backend.reply(
            "get_game_status",
            json!({ "running": true, "profile": "Other" }),
        );
        let (effects, mut events) = start(backend.clone());

        effects
            .send(Effect::SwitchGame {
                stop_running: true,
                play: Some("Other".to_string()),
            })
            .await
            .unwrap();
        assert!(matches!(
            next(&mut events).await,
            InternalEvent::GameStatusChecked(status) if status.running
        ));
        assert_eq!(
            backend.command_log(),
            vec!["stop_game", "play_profile", "get_game_status"]
        );
    }

    #[tokio::test]
    async fn test_download_command_uses_camel_case_args() {
        let backend = FakeBackend::new();
        let (effects, mut events) = start(backend.clone());

        effects
            .send(Effect::DownloadMod {
                attempt: AttemptId(3),
                profile: "Main".to_string(),
                version_name: "Evaisa-LethalLib-1.1.0".to_string(),
            })
            .await
            .unwrap();
        assert!(matches!(
            next(&mut events).await,
            InternalEvent::DownloadCommandFinished { attempt: AttemptId(3), result: Ok(()) }
        ));
        assert_eq!(
            backend.calls("download_mod"),
            vec![json!({ "profileName": "Main", "versionName": "Evaisa-LethalLib-1.1.0" })]
        );
    }

    #[tokio::test]
    async fn test_mod_toggle_failure_is_reported() {
        let backend = FakeBackend::new();
        backend.fail("toggle_mod", "locked");
        let (effects, mut events) = start(backend);

        effects
            .send(Effect::ToggleMod {
                profile: "Main".to_string(),
                full_name: "Evaisa-LethalLib".to_string(),
            })
            .await
            .unwrap();
        assert!(matches!(
            next(&mut events).await,
            InternalEvent::Standard(Event::FailedModCommand { error, .. }) if error == "locked"
        ));
    }
}
