#![forbid(unsafe_code)]

// 纯逻辑 crate：三层格子地图（walls / floors / ceilings）的编辑引擎。
//
// - 图层存储（LayerStore）
// - 视口坐标变换（平移/缩放）
// - 调色板、单格 Undo、绘制会话
// - 输入事件分发（EditorState::dispatch）
//
// 这里不做任何文件 I/O，读写由 tilemap_format 负责。

mod error;
mod input;
mod layer;
mod palette;
mod session;
mod state;
mod undo;
mod viewport;

pub use error::{EditorError, GridError, PaletteError};
pub use input::{Effect, EditorCommand, EditorInput, Gesture, PointerButton};
pub use layer::{Grid, LayerId, LayerStore, TileId, EMPTY_TILE};
pub use palette::{default_palette, ColorParseError, Palette, Rgb};
pub use session::EditSession;
pub use state::{EditorSettings, EditorState, RenderCell, MAX_MAP_SIDE};
pub use undo::{UndoEntry, UndoStack};
pub use viewport::{
    grid_line_step, CellPos, CellWindow, ScreenPos, Viewport, ZoomDirection, ZOOM_STEP,
};
