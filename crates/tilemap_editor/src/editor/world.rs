//! 世界（World）侧逻辑：相机、输入分发、画布渲染。
//!
//! 关键点：
//! - 所有编辑都走 `EditorState::dispatch`，这里只负责把 Bevy 的输入翻译成 `EditorInput`。
//! - 画布 sprite 只在 `EditorState` 变化（或窗口尺寸变化）时重建；网格和 hover 用 gizmos 每帧画。

mod camera;
mod canvas;
mod input;
mod shortcuts;

pub use camera::setup_world;
pub use canvas::{draw_canvas_helpers, rebuild_cell_sprites};
pub use input::editor_input;
