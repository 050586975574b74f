use bevy::prelude::*;

use crate::editor::types::WorldCamera;

/// 世界初始化：一个固定在原点的 2D 相机。
///
/// 平移和缩放都由 `Viewport` 的 offset/scale 完成，相机本身不动，
/// 因此画布坐标与窗口逻辑像素一一对应。
pub fn setup_world(mut commands: Commands) {
    commands.spawn((Camera2d, WorldCamera));
}

/// 窗口逻辑尺寸（即可见画布大小）。
pub fn canvas_size(window: &Window) -> Vec2 {
    Vec2::new(window.width(), window.height())
}
