use tracing::debug;

use crate::error::GridError;
use crate::layer::{LayerId, LayerStore, TileId};

/// 一次单格修改。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UndoEntry {
    pub layer: LayerId,
    pub x: u32,
    pub y: u32,
    pub old: TileId,
    pub new: TileId,
}

/// 单格撤销栈：无上限、没有 redo。
///
/// 整体替换格子（改尺寸 / 读取 / 清空图层）时必须 `clear()`，
/// 否则旧记录会指向已经不存在的内容。
#[derive(Clone, Debug, Default)]
pub struct UndoStack {
    entries: Vec<UndoEntry>,
}

impl UndoStack {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&UndoEntry> {
        self.entries.last()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// 值没变的写入不记录。
    pub fn record(&mut self, entry: UndoEntry) {
        if entry.old == entry.new {
            return;
        }
        self.entries.push(entry);
    }

    /// 弹出最近一条并把该格恢复为旧值。栈为空时什么也不做。
    pub fn undo(&mut self, store: &mut LayerStore) -> Result<Option<UndoEntry>, GridError> {
        let Some(entry) = self.entries.pop() else {
            debug!("undo: stack empty");
            return Ok(None);
        };
        store.set(entry.layer, entry.x, entry.y, entry.old)?;
        debug!(
            "undo: {} ({}, {}) {} -> {}",
            entry.layer, entry.x, entry.y, entry.new, entry.old
        );
        Ok(Some(entry))
    }
}
