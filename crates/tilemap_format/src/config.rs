//! 编辑器配置（RON）。文件不存在时使用默认值。

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use tilemap_core::EditorSettings;

use crate::files::{write_replacing, LayerFiles};

pub const DEFAULT_CONFIG_FILE: &str = "editor.ron";

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    pub settings: EditorSettings,
    pub files: LayerFiles,
    /// 调色板文件名，相对 `files.dir`。
    pub palette_file: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            settings: EditorSettings::default(),
            files: LayerFiles::default(),
            palette_file: "palette.ron".to_string(),
        }
    }
}

impl EditorConfig {
    pub fn palette_path(&self) -> PathBuf {
        self.files.dir.join(&self.palette_file)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(ron::error::SpannedError),
    Encode(ron::Error),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "io error: {err}"),
            ConfigError::Parse(err) => write!(f, "parse error: {err}"),
            ConfigError::Encode(err) => write!(f, "encode error: {err}"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Io(err) => Some(err),
            ConfigError::Parse(err) => Some(err),
            ConfigError::Encode(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}

impl From<ron::error::SpannedError> for ConfigError {
    fn from(value: ron::error::SpannedError) -> Self {
        ConfigError::Parse(value)
    }
}

impl From<ron::Error> for ConfigError {
    fn from(value: ron::Error) -> Self {
        ConfigError::Encode(value)
    }
}

pub fn load_config(path: &Path) -> Result<EditorConfig, ConfigError> {
    if !path.exists() {
        return Ok(EditorConfig::default());
    }
    let text = std::fs::read_to_string(path)?;
    let config = ron::from_str::<EditorConfig>(&text)?;
    info!("loaded config {}", path.display());
    Ok(config)
}

pub fn save_config(config: &EditorConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let text = ron::ser::to_string_pretty(config, ron::ser::PrettyConfig::default())?;
    write_replacing(path, &text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_core::Rgb;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_config(&tmp.path().join("nope.ron")).unwrap();
        assert_eq!(config, EditorConfig::default());
        assert_eq!(config.settings.map_width, 64);
        assert_eq!(config.files.walls, "map.txt");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            r##"(
                settings: (map_width: 32, palette: {7: "#ff0000"}),
                files: (dir: "levels"),
            )"##,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.settings.map_width, 32);
        assert_eq!(config.settings.map_height, 64);
        assert_eq!(config.settings.palette.get(7), Some(Rgb::new(255, 0, 0)));
        assert_eq!(config.settings.palette.len(), 1);
        assert_eq!(config.files.dir, PathBuf::from("levels"));
        assert_eq!(config.files.floors, "floor.txt");
        assert_eq!(config.palette_path(), PathBuf::from("levels").join("palette.ron"));
    }

    #[test]
    fn test_bad_color_is_parse_error() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, r#"(settings: (palette: {1: "red"}))"#).unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_save_then_load() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("cfg").join(DEFAULT_CONFIG_FILE);
        let mut config = EditorConfig::default();
        config.settings.max_scale = 64.0;
        config.files.ceilings = "top.txt".to_string();
        save_config(&config, &path).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }
}
