use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Engine settings, loaded from JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub title: String,
    /// Frames driven by a headless run.
    pub ticks: u64,
    /// Asset manifest registered at pre-initialization. Without one the
    /// built-in `default` shader and `brick` texture are registered.
    pub manifest: Option<PathBuf>,
    /// Refuse to create a root whose name is already taken instead of
    /// replacing the existing root.
    pub strict_names: bool,
    /// Width over height of the render target.
    pub aspect_ratio: f32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "RenderStar".into(),
            ticks: 60,
            manifest: None,
            strict_names: false,
            aspect_ratio: 16.0 / 9.0,
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let file = std::fs::File::open(path)?;
        let config: Self = serde_json::from_reader(file)?;
        Ok(config)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), EngineError> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.title, "RenderStar");
        assert_eq!(config.ticks, 60);
        assert!(config.manifest.is_none());
        assert!(!config.strict_names);
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{ "ticks": 5 }"#).unwrap();
        assert_eq!(config.ticks, 5);
        assert_eq!(config.title, "RenderStar");
    }

    #[test]
    fn save_and_load() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let config = EngineConfig {
            title: "Demo".into(),
            strict_names: true,
            manifest: Some(PathBuf::from("assets.json")),
            ..EngineConfig::default()
        };
        config.save(tmp.path()).unwrap();
        assert_eq!(EngineConfig::load(tmp.path()).unwrap(), config);
    }

    #[test]
    fn load_malformed_is_config_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[1, 2").unwrap();
        assert!(matches!(
            EngineConfig::load(tmp.path()),
            Err(EngineError::Config(_))
        ));
    }
}
