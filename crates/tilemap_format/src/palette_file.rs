//! 调色板文件（RON）：`{1: "#222222", 2: "#8b4513"}`。
//!
//! 与三层地图文件分开保存，地图的保存/读取不会碰它。

use std::path::Path;

use tilemap_core::Palette;

use crate::config::ConfigError;
use crate::files::write_replacing;

pub fn save_palette(palette: &Palette, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let text = ron::ser::to_string_pretty(palette, ron::ser::PrettyConfig::default())?;
    write_replacing(path, &text)?;
    Ok(())
}

/// 文件不存在时返回 `Ok(None)`。
pub fn load_palette(path: &Path) -> Result<Option<Palette>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let text = std::fs::read_to_string(path)?;
    Ok(Some(ron::from_str::<Palette>(&text)?))
}
