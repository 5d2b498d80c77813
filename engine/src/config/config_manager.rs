use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::{
    ConfigContentProvider, ConfigSerializer, FileContentConfigProvider, Validate,
    YamlConfigSerializer,
};
use crate::game::EngineConfig;
use crate::{log, log_warn};

/// Loads, validates and caches a config. Missing content yields `TConfig::default()`.
pub struct ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer = YamlConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    config_serializer: TConfigSerializer,
    config_content_provider: TConfigContentProvider,
    config: Arc<Mutex<Option<TConfig>>>,
}

impl<TConfig> ConfigManager<FileContentConfigProvider, TConfig, YamlConfigSerializer>
where
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
{
    pub fn from_yaml_file(file_path: impl AsRef<Path>) -> Self {
        Self::new(
            FileContentConfigProvider::new(file_path.as_ref()),
            YamlConfigSerializer,
        )
    }
}

impl<TConfigContentProvider, TConfig, TConfigSerializer>
    ConfigManager<TConfigContentProvider, TConfig, TConfigSerializer>
where
    TConfigContentProvider: ConfigContentProvider,
    TConfig: Clone + for<'de> Deserialize<'de> + Serialize + Validate + Default,
    TConfigSerializer: ConfigSerializer<TConfig>,
{
    pub fn new(
        config_content_provider: TConfigContentProvider,
        config_serializer: TConfigSerializer,
    ) -> Self {
        Self {
            config: Arc::new(Mutex::new(None)),
            config_content_provider,
            config_serializer,
        }
    }

    pub fn get_config(&self) -> Result<TConfig, String> {
        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config cache lock poisoned".to_string())?;

        if let Some(config) = current.as_ref() {
            return Ok(config.clone());
        }

        let Some(config_data) = self.config_content_provider.get_config_content()? else {
            log!("No config content found, using defaults");
            return Ok(TConfig::default());
        };

        let config = self.config_serializer.deserialize(&config_data)?;
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        *current = Some(config.clone());
        Ok(config)
    }

    pub fn set_config(&self, config: &TConfig) -> Result<(), String> {
        config
            .validate()
            .map_err(|e| format!("Config validation error: {}", e))?;

        let serialized_config = self.config_serializer.serialize(config)?;
        self.config_content_provider
            .set_config_content(&serialized_config)?;

        let mut current = self
            .config
            .lock()
            .map_err(|_| "Config cache lock poisoned".to_string())?;
        *current = Some(config.clone());
        Ok(())
    }

    /// Drops the cached value so the next `get_config` re-reads the provider.
    pub fn reload(&self) -> Result<TConfig, String> {
        {
            let mut current = self
                .config
                .lock()
                .map_err(|_| "Config cache lock poisoned".to_string())?;
            *current = None;
        }
        self.get_config()
    }
}

pub fn load_engine_config(path: Option<&Path>) -> Result<EngineConfig, String> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };

    let manager: ConfigManager<FileContentConfigProvider, EngineConfig> =
        ConfigManager::from_yaml_file(path);
    manager.get_config().inspect_err(|e| {
        log_warn!("Failed to load engine config from {}: {}", path.display(), e);
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InMemoryConfigProvider;
    use crate::game::{EngineConfig, TileType};

    fn manager_with(content: Option<&str>) -> ConfigManager<InMemoryConfigProvider, EngineConfig> {
        ConfigManager::new(
            InMemoryConfigProvider::new(content.map(str::to_string)),
            YamlConfigSerializer,
        )
    }

    #[test]
    fn test_missing_content_yields_defaults() {
        let manager = manager_with(None);
        assert_eq!(manager.get_config().unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let manager = manager_with(Some("grid:\n  tile_types: [red, blue, green]\n"));
        let err = manager.get_config().unwrap_err();
        assert!(err.starts_with("Config validation error"), "{}", err);
    }

    #[test]
    fn test_malformed_yaml_is_rejected() {
        let manager = manager_with(Some("grid: [not, a, map"));
        assert!(manager.get_config().unwrap_err().starts_with("Failed to deserialize"));
    }

    #[test]
    fn test_set_config_persists_and_caches() {
        let manager = manager_with(None);
        let mut config = EngineConfig::default();
        config.grid.rows = 6;
        config.grid.tile_types = vec![TileType::Red, TileType::Blue, TileType::Green, TileType::Pink];

        manager.set_config(&config).unwrap();
        assert_eq!(manager.get_config().unwrap(), config);
        assert_eq!(manager.reload().unwrap(), config);
    }

    #[test]
    fn test_set_config_refuses_invalid() {
        let manager = manager_with(None);
        let mut config = EngineConfig::default();
        config.controller.max_cascade_iterations = 0;
        assert!(manager.set_config(&config).is_err());
        assert_eq!(manager.get_config().unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_load_engine_config_from_file() {
        let path = std::env::temp_dir().join(format!("match3_config_{}.yaml", std::process::id()));
        std::fs::write(&path, "grid:\n  rows: 5\n  cols: 9\n").unwrap();

        let config = load_engine_config(Some(&path)).unwrap();
        assert_eq!(config.grid.rows, 5);
        assert_eq!(config.grid.cols, 9);

        std::fs::remove_file(&path).unwrap();
        assert_eq!(load_engine_config(Some(&path)).unwrap(), EngineConfig::default());
        assert_eq!(load_engine_config(None).unwrap(), EngineConfig::default());
    }
}
