use crate::mod_manager::domain::ManagerConfig;
use std::path::{Path, PathBuf};

pub struct ConfigManager {
    config_dir: PathBuf,
}

impl ConfigManager {
    pub fn new(config_dir: PathBuf) -> Self {
        Self { config_dir }
    }

    /// `<platform config dir>/thunder-mod-manager`
    pub fn default_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("thunder-mod-manager")
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Creates the directory and a default config on first run, then loads it.
    pub async fn init(&self) -> anyhow::Result<ManagerConfig> {
        self.ensure_dirs().await?;
        if !self.config_exists() {
            return self.create_default_config().await;
        }
        self.load_config().await
    }

    pub async fn ensure_dirs(&self) -> anyhow::Result<()> {
        tokio::fs::create_dir_all(&self.config_dir).await?;
        Ok(())
    }

    // Config operations
    pub fn config_exists(&self) -> bool {
        self.config_path().exists()
    }

    pub async fn load_config(&self) -> anyhow::Result<ManagerConfig> {
        let content = tokio::fs::read_to_string(self.config_path()).await?;
        let config: ManagerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    pub async fn save_config(&self, config: &ManagerConfig) -> anyhow::Result<()> {
        let toml_str = toml::to_string_pretty(config)?;
        tokio::fs::write(self.config_path(), toml_str).await?;
        Ok(())
    }

    pub async fn create_default_config(&self) -> anyhow::Result<ManagerConfig> {
        let config = ManagerConfig::default();
        self.save_config(&config).await?;
        Ok(config)
    }

    fn config_path(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }
}
