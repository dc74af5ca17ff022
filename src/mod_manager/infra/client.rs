use crate::mod_manager::domain::{
    DownloadProgress, GameStatus, Install, ModInfo, Profile, ProfileInfo, ScanResult,
    SearchRequest, SearchResultPage,
};
use crate::mod_manager::infra::backend::{Backend, BackendError, Subscription};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;

pub const DOWNLOAD_PROGRESS_EVENT: &str = "download_progress";

/// Typed view over the backend command surface.
#[derive(Clone)]
pub struct BackendClient {
    backend: Arc<dyn Backend>,
}

impl BackendClient {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    // Package index
    pub async fn load_package(&self) -> Result<(), BackendError> {
        self.call_unit("load_package", Value::Null).await
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResultPage, BackendError> {
        let args = serde_json::to_value(request).map_err(|source| BackendError::Decode {
            command: "search".to_string(),
            source,
        })?;
        self.call("search", args).await
    }

    // Installs
    pub async fn scan(&self) -> Result<ScanResult, BackendError> {
        self.call("scan", Value::Null).await
    }

    /// Opens the backend's folder picker. The new install shows up on the next scan.
    pub async fn add_manual_install(&self) -> Result<(), BackendError> {
        self.call_unit("add_manual_install", Value::Null).await
    }

    pub async fn select_install(&self, path: Option<&str>) -> Result<(), BackendError> {
        self.call_unit("select_install", json!({ "path": path })).await
    }

    pub async fn get_selected_install(&self) -> Result<Option<Install>, BackendError> {
        self.call("get_selected_install", Value::Null).await
    }

    // Profiles
    pub async fn get_profiles(&self) -> Result<Vec<ProfileInfo>, BackendError> {
        self.call("get_profiles", Value::Null).await
    }

    pub async fn get_profile(&self, name: &str) -> Result<Profile, BackendError> {
        self.call("get_profile", json!({ "name": name })).await
    }

    pub async fn create_profile(&self, name: &str, icon: Option<&str>) -> Result<(), BackendError> {
        self.call_unit("create_profile", json!({ "name": name, "icon": icon }))
            .await
    }

    pub async fn delete_profile(&self, name: &str) -> Result<(), BackendError> {
        self.call_unit("delete_profile", json!({ "name": name })).await
    }

    pub async fn get_profile_mods(&self, profile: &str) -> Result<Vec<ModInfo>, BackendError> {
        self.call("get_profile_mods", json!({ "profile": profile }))
            .await
    }

    pub async fn toggle_mod(&self, profile: &str, full_name: &str) -> Result<(), BackendError> {
        self.call_unit("toggle_mod", json!({ "profile": profile, "name": full_name }))
            .await
    }

    pub async fn delete_mod(&self, profile: &str, full_name: &str) -> Result<(), BackendError> {
        self.call_unit("delete_mod", json!({ "profile": profile, "name": full_name }))
            .await
    }

    pub async fn download_mod(
        &self,
        profile_name: &str,
        version_name: &str,
    ) -> Result<(), BackendError> {
        self.call_unit(
            "download_mod",
            json!({ "profileName": profile_name, "versionName": version_name }),
        )
        .await
    }

    // Game
    pub async fn play_profile(&self, name: &str) -> Result<(), BackendError> {
        self.call_unit("play_profile", json!({ "name": name })).await
    }

    pub async fn stop_game(&self) -> Result<(), BackendError> {
        self.call_unit("stop_game", Value::Null).await
    }

    pub async fn get_game_status(&self) -> Result<GameStatus, BackendError> {
        self.call("get_game_status", Value::Null).await
    }

    // Misc
    pub async fn show_in_explorer(&self, path: &str) -> Result<(), BackendError> {
        self.call_unit("show_in_explorer", json!({ "path": path }))
            .await
    }

    pub fn subscribe_download_progress(
        &self,
    ) -> Result<Subscription<DownloadProgress>, BackendError> {
        let stream = self.backend.listen(DOWNLOAD_PROGRESS_EVENT)?;
        Ok(Subscription::new(DOWNLOAD_PROGRESS_EVENT, stream))
    }

    async fn call<T: DeserializeOwned>(&self, command: &str, args: Value) -> Result<T, BackendError> {
        log::debug!("invoke `{command}`");
        let raw = self.backend.invoke(command, args).await?;
        serde_json::from_value(raw).map_err(|source| BackendError::Decode {
            command: command.to_string(),
            source,
        })
    }

    async fn call_unit(&self, command: &str, args: Value) -> Result<(), BackendError> {
        log::debug!("invoke `{command}`");
        self.backend.invoke(command, args).await.map(|_| ())
    }
}
