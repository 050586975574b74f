//! 三层网格地图编辑器（墙 / 地板 / 天花板）
//!
//! 目标：
//! - 画布上左键绘制、Shift + 左键擦除，右键 / 中键拖动平移，滚轮以光标为锚点缩放
//! - 每层一个纯文本文件保存/读取
//! - 调色板（编号 -> 颜色）可增删改
//!
//! 说明：
//! - 本 crate 使用 Bevy 0.18，只负责输入采集与渲染；编辑逻辑全部在 `tilemap_core`。
//! - 画布坐标以窗口左上角为原点、y 向下，与 `Window::cursor_position()` 一致。

mod paths;
mod persistence;
mod types;
mod ui;
mod util;
mod world;

mod app;

use bevy::prelude::Color;

pub const UI_BG: Color = Color::srgb(0.12, 0.12, 0.12);
pub const HUD_BG: Color = Color::srgba(0.0, 0.0, 0.0, 0.55);

pub const GRID_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.08);
pub const BORDER_COLOR: Color = Color::srgba(1.0, 1.0, 1.0, 0.30);
pub const HOVER_COLOR: Color = Color::srgb(1.0, 0.85, 0.2);
pub const WALL_EDGE_COLOR: Color = Color::BLACK;

/// 天花板半透明绘制，避免完全遮住下面的墙和地板。
pub const CEILING_ALPHA: f32 = 0.5;

pub use app::run;
