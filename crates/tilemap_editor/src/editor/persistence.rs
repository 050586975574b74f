//! 宿主侧的文件读写：启动配置、三层地图、调色板。
//!
//! 核心库不做 I/O；`Effect::Save` / `Effect::Load` 由这里完成，结果写回 `EditorState`。

use std::path::Path;

use bevy::prelude::*;
use tilemap_core::EditorState;
use tilemap_format::{
    load_config, load_layers, load_palette, save_layers, save_palette, EditorConfig,
};

/// 读取配置；文件损坏时退回默认值并给出提示。
pub fn load_startup_config(path: &Path) -> (EditorConfig, Option<String>) {
    match load_config(path) {
        Ok(config) => (config, None),
        Err(err) => {
            warn!("config {} ignored: {err}", path.display());
            (
                EditorConfig::default(),
                Some(format!("Config error, using defaults: {err}")),
            )
        }
    }
}

/// 根据配置构造初始状态；调色板文件存在时覆盖配置里的调色板。
pub fn initial_state(config: &EditorConfig) -> (EditorState, Option<String>) {
    let mut state = EditorState::new(&config.settings);
    let path = config.palette_path();
    match load_palette(&path) {
        Ok(Some(palette)) => {
            info!("loaded palette {} ({} entries)", path.display(), palette.len());
            state.replace_palette(palette);
            (state, None)
        }
        Ok(None) => (state, None),
        Err(err) => {
            warn!("palette {} ignored: {err}", path.display());
            (state, Some(format!("Palette error: {err}")))
        }
    }
}

/// 保存三层；返回给 HUD 的提示文本。
pub fn save_map(state: &EditorState, config: &EditorConfig) -> Result<String, String> {
    match save_layers(state.store(), &config.files) {
        Ok(()) => Ok(format!("Saved to {}", config.files.dir.display())),
        Err(err) => {
            warn!("save failed: {err}");
            Err(format!("Save failed: {err}"))
        }
    }
}

/// 读取三层；失败时地图保持不变。
pub fn load_map(state: &mut EditorState, config: &EditorConfig) -> Result<String, String> {
    match load_layers(&config.files) {
        Ok(store) => {
            let (w, h) = (store.width(), store.height());
            state.replace_layers(store);
            Ok(format!("Loaded {w} x {h} map"))
        }
        Err(err) => {
            warn!("load failed: {err}");
            Err(format!("Load failed: {err}"))
        }
    }
}

/// 调色板改动后立即落盘。
pub fn persist_palette(state: &EditorState, config: &EditorConfig) -> Result<(), String> {
    let path = config.palette_path();
    save_palette(state.palette(), &path).map_err(|err| {
        warn!("palette save failed: {err}");
        format!("Palette save failed: {err}")
    })
}
