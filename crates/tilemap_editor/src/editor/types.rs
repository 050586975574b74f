//! 资源（Resource）与组件（Component）的集中定义。
//!
//! 编辑器状态本身是 `tilemap_core::EditorState`（开启 `bevy` feature 后即为 Resource），
//! 这里只放宿主侧需要的数据。

use bevy::prelude::*;
use tilemap_format::EditorConfig;

/// 标记世界相机。
#[derive(Component)]
pub struct WorldCamera;

/// HUD 文本节点。
#[derive(Component)]
pub struct HudText;

/// 画布上每个可见格子对应的 sprite，重建画布时整体 despawn。
#[derive(Component)]
pub struct CellSprite;

/// 启动时读到的配置（地图文件位置、默认尺寸、调色板文件）。
#[derive(Resource, Clone, Debug)]
pub struct EditorFiles {
    pub config: EditorConfig,
}

/// HUD 最下面一行：最近一次保存/读取/出错的提示。
#[derive(Resource, Default, Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    text: String,
}

impl StatusLine {
    pub fn set(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
