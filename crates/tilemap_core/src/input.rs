//! 宿主 UI 送进来的输入事件，以及分发后的结果。

use crate::layer::{LayerId, TileId};
use crate::palette::Rgb;
use crate::viewport::ScreenPos;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    /// 绘制 / 擦除
    Primary,
    /// 平移
    Secondary,
    /// 平移
    Tertiary,
}

impl PointerButton {
    pub fn pans(self) -> bool {
        matches!(self, PointerButton::Secondary | PointerButton::Tertiary)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditorCommand {
    Save,
    Load,
    NewSize { width: u32, height: u32 },
    Undo,
    ClearActiveLayer,
    SelectLayer(LayerId),
    NextLayer,
    PrevLayer,
    SelectTile(TileId),
    NextTile,
    PrevTile,
    PaletteAdd { id: TileId, color: Rgb },
    PaletteEdit { id: TileId, color: Rgb },
    PaletteRemove(TileId),
    /// 修改当前选中编号的颜色。
    EditSelected(Rgb),
    RemoveSelected,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EditorInput {
    PointerDown {
        pos: ScreenPos,
        button: PointerButton,
        erase: bool,
    },
    PointerMove {
        pos: ScreenPos,
        erase: bool,
    },
    PointerUp {
        button: PointerButton,
    },
    Wheel {
        pos: ScreenPos,
        delta: f32,
    },
    Command(EditorCommand),
}

/// 手势状态机：idle -> painting / panning -> idle。
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Gesture {
    #[default]
    Idle,
    Painting,
    Panning {
        button: PointerButton,
        last: ScreenPos,
    },
}

/// 分发一个输入后需要宿主做的事。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    None,
    Redraw,
    /// 需要宿主把三层写到磁盘。
    Save,
    /// 需要宿主从磁盘读取三层，成功后调用 `EditorState::replace_layers`。
    Load,
}
