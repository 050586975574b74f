use tracing::trace;

use crate::layer::{LayerId, LayerStore, TileId, EMPTY_TILE};
use crate::palette::Palette;
use crate::undo::{UndoEntry, UndoStack};
use crate::viewport::{ScreenPos, Viewport};

/// 当前编辑图层 + 当前选中的 tile 编号。
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EditSession {
    pub active_layer: LayerId,
    /// 调色板为空时没有选中。
    pub selected: Option<TileId>,
}

impl EditSession {
    pub fn new(palette: &Palette) -> Self {
        Self {
            active_layer: LayerId::Walls,
            selected: palette.first_id(),
        }
    }

    /// 鼠标位置绘制/擦除当前图层的一格。
    ///
    /// 光标在地图外、没有选中编号（且不是擦除）、或者值没变时都不做任何事，返回 None。
    /// 否则写入并记录一条 undo，返回该记录。
    pub fn paint_at(
        &self,
        pos: ScreenPos,
        erase: bool,
        viewport: &Viewport,
        store: &mut LayerStore,
        undo: &mut UndoStack,
    ) -> Option<UndoEntry> {
        let (x, y) = viewport
            .world_to_cell(pos)
            .in_bounds(store.width(), store.height())?;

        let new = if erase { EMPTY_TILE } else { self.selected? };
        let old = store.get(self.active_layer, x, y).ok()?;
        if old == new {
            return None;
        }

        store.set(self.active_layer, x, y, new).ok()?;
        let entry = UndoEntry {
            layer: self.active_layer,
            x,
            y,
            old,
            new,
        };
        undo.record(entry);
        trace!("paint {} ({x}, {y}) {old} -> {new}", self.active_layer);
        Some(entry)
    }

    /// 调色板删除了 `removed` 之后修正选中项。
    pub fn on_palette_removed(&mut self, removed: TileId, palette: &Palette) {
        if self.selected == Some(removed) {
            self.selected = palette.first_id();
        }
    }
}
