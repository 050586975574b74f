//! 编辑器状态聚合：图层存储、调色板、视口、会话、撤销栈与手势。
//!
//! 宿主只持有一个 `EditorState`，所有修改都经由这里的方法或 `dispatch`。

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{EditorError, GridError, PaletteError};
use crate::input::{Effect, EditorCommand, EditorInput, Gesture, PointerButton};
use crate::layer::{LayerId, LayerStore, TileId, EMPTY_TILE};
use crate::palette::{default_palette, Palette, Rgb};
use crate::session::EditSession;
use crate::undo::{UndoEntry, UndoStack};
use crate::viewport::{CellWindow, ScreenPos, Viewport, ZoomDirection};

/// 地图单边的最大格数。
pub const MAX_MAP_SIDE: u32 = 4096;

/// 启动参数（默认尺寸、缩放范围、初始调色板）。
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Debug, PartialEq)]
pub struct EditorSettings {
    pub map_width: u32,
    pub map_height: u32,
    pub scale: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub palette: Palette,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            map_width: 64,
            map_height: 64,
            scale: 20.0,
            min_scale: 6.0,
            max_scale: 120.0,
            palette: default_palette(),
        }
    }
}

/// 交给渲染方的一格：屏幕位置、边长和解析后的颜色。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderCell {
    pub layer: LayerId,
    pub x: u32,
    pub y: u32,
    pub origin: ScreenPos,
    pub size: f32,
    pub color: Rgb,
}

#[cfg_attr(feature = "bevy", derive(bevy::prelude::Resource))]
#[derive(Clone, Debug)]
pub struct EditorState {
    store: LayerStore,
    palette: Palette,
    viewport: Viewport,
    session: EditSession,
    undo: UndoStack,
    gesture: Gesture,
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new(&EditorSettings::default())
    }
}

fn check_size(width: u32, height: u32) -> Result<(), EditorError> {
    let ok = |v: u32| (1..=MAX_MAP_SIDE).contains(&v);
    if ok(width) && ok(height) {
        Ok(())
    } else {
        Err(EditorError::InvalidSize { width, height })
    }
}

impl EditorState {
    /// 非法的默认尺寸会被夹紧到 `1..=MAX_MAP_SIDE`。
    pub fn new(settings: &EditorSettings) -> Self {
        let width = settings.map_width.clamp(1, MAX_MAP_SIDE);
        let height = settings.map_height.clamp(1, MAX_MAP_SIDE);
        Self {
            store: LayerStore::new(width, height),
            palette: settings.palette.clone(),
            viewport: Viewport::new(settings.scale, settings.min_scale, settings.max_scale),
            session: EditSession::new(&settings.palette),
            undo: UndoStack::default(),
            gesture: Gesture::Idle,
        }
    }

    pub fn store(&self) -> &LayerStore {
        &self.store
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn undo_stack(&self) -> &UndoStack {
        &self.undo
    }

    pub fn gesture(&self) -> Gesture {
        self.gesture
    }

    pub fn active_layer(&self) -> LayerId {
        self.session.active_layer
    }

    pub fn selected_tile(&self) -> Option<TileId> {
        self.session.selected
    }

    pub fn get_cell(&self, layer: LayerId, x: u32, y: u32) -> Result<TileId, GridError> {
        self.store.get(layer, x, y)
    }

    /// 程序化写入（不经过 undo）。越界返回错误。
    pub fn set_cell(
        &mut self,
        layer: LayerId,
        x: u32,
        y: u32,
        value: TileId,
    ) -> Result<(), GridError> {
        self.store.set(layer, x, y, value)
    }

    // --- 视口 ---

    pub fn zoom(&mut self, cursor: ScreenPos, direction: ZoomDirection) {
        self.viewport.zoom(cursor, direction);
    }

    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.viewport.pan(dx, dy);
    }

    pub fn visible_window(&self, viewport_width: f32, viewport_height: f32) -> CellWindow {
        self.viewport.visible_cell_window(
            viewport_width,
            viewport_height,
            self.store.width(),
            self.store.height(),
        )
    }

    // --- 格子编辑 ---

    pub fn paint_at(&mut self, pos: ScreenPos, erase: bool) -> Option<UndoEntry> {
        self.session
            .paint_at(pos, erase, &self.viewport, &mut self.store, &mut self.undo)
    }

    pub fn undo(&mut self) -> Result<Option<UndoEntry>, EditorError> {
        Ok(self.undo.undo(&mut self.store)?)
    }

    /// 新尺寸：三层全部清空，撤销历史作废。
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), EditorError> {
        check_size(width, height)?;
        self.store.resize(width, height);
        self.undo.clear();
        info!("new map {width}x{height}");
        Ok(())
    }

    pub fn clear_active_layer(&mut self) {
        let layer = self.session.active_layer;
        self.store.clear_layer(layer);
        self.undo.clear();
        info!("cleared layer {layer}");
    }

    /// 读取成功后整体替换三层（尺寸跟随新数据），撤销历史作废。
    pub fn replace_layers(&mut self, store: LayerStore) {
        info!("replaced layers ({}x{})", store.width(), store.height());
        self.store = store;
        self.undo.clear();
    }

    pub fn select_layer(&mut self, layer: LayerId) {
        self.session.active_layer = layer;
    }

    // --- 调色板 ---

    pub fn select_tile(&mut self, id: TileId) -> Result<(), PaletteError> {
        if !self.palette.contains(id) {
            return Err(PaletteError::UnknownId(id));
        }
        self.session.selected = Some(id);
        Ok(())
    }

    /// 新增条目并选中它。
    pub fn palette_add(&mut self, id: TileId, color: Rgb) -> Result<(), PaletteError> {
        self.palette.add(id, color)?;
        self.session.selected = Some(id);
        debug!("palette add {id} = {color}");
        Ok(())
    }

    pub fn palette_edit(&mut self, id: TileId, color: Rgb) -> Result<(), PaletteError> {
        let old = self.palette.edit(id, color)?;
        debug!("palette edit {id}: {old} -> {color}");
        Ok(())
    }

    /// 删除条目，不会修改任何格子。
    pub fn palette_remove(&mut self, id: TileId) -> Result<(), PaletteError> {
        self.palette.remove(id)?;
        self.session.on_palette_removed(id, &self.palette);
        debug!("palette remove {id}");
        Ok(())
    }

    /// 整体替换调色板（例如从文件读取），选中项不在新调色板里时回退。
    pub fn replace_palette(&mut self, palette: Palette) {
        self.palette = palette;
        let keep = self
            .session
            .selected
            .filter(|&id| self.palette.contains(id));
        self.session.selected = keep.or_else(|| self.palette.first_id());
    }

    fn selected_or_err(&self) -> Result<TileId, PaletteError> {
        self.session.selected.ok_or(PaletteError::NoSelection)
    }

    // --- 渲染查询 ---

    /// 0 或调色板中没有的编号返回 None（不绘制）。
    pub fn resolve_color(&self, layer: LayerId, x: u32, y: u32) -> Result<Option<Rgb>, GridError> {
        let id = self.store.get(layer, x, y)?;
        if id == EMPTY_TILE {
            return Ok(None);
        }
        Ok(self.palette.get(id))
    }

    /// 可见窗口内所有需要绘制的格子，按 `LayerId::DRAW_ORDER` 分层排列。
    pub fn visible_cells(&self, viewport_width: f32, viewport_height: f32) -> Vec<RenderCell> {
        let window = self.visible_window(viewport_width, viewport_height);
        let scale = self.viewport.scale();
        let mut out = Vec::new();
        for layer in LayerId::DRAW_ORDER {
            let grid = self.store.layer(layer);
            for (x, y) in window.cells() {
                let Some(color) = grid
                    .get(x, y)
                    .filter(|&id| id != EMPTY_TILE)
                    .and_then(|id| self.palette.get(id))
                else {
                    continue;
                };
                out.push(RenderCell {
                    layer,
                    x,
                    y,
                    origin: self.viewport.cell_to_canvas(x as i32, y as i32),
                    size: scale,
                    color,
                });
            }
        }
        out
    }

    pub fn status_text(&self) -> String {
        let sel = self
            .session
            .selected
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "Layer: {} | Sel ID: {} | Map: {} x {} | Zoom: {:.1}px",
            self.session.active_layer,
            sel,
            self.store.width(),
            self.store.height(),
            self.viewport.scale()
        )
    }

    // --- 输入分发 ---

    /// 处理一个输入事件。出错时状态保持不变。
    pub fn dispatch(&mut self, input: EditorInput) -> Result<Effect, EditorError> {
        match input {
            EditorInput::PointerDown { pos, button, erase } => Ok(self.pointer_down(pos, button, erase)),
            EditorInput::PointerMove { pos, erase } => Ok(self.pointer_move(pos, erase)),
            EditorInput::PointerUp { button } => {
                self.pointer_up(button);
                Ok(Effect::None)
            }
            EditorInput::Wheel { pos, delta } => {
                let Some(direction) = ZoomDirection::from_wheel(delta) else {
                    return Ok(Effect::None);
                };
                self.zoom(pos, direction);
                Ok(Effect::Redraw)
            }
            EditorInput::Command(cmd) => self.command(cmd),
        }
    }

    fn pointer_down(&mut self, pos: ScreenPos, button: PointerButton, erase: bool) -> Effect {
        if button.pans() {
            if self.gesture == Gesture::Painting {
                return Effect::None;
            }
            self.gesture = Gesture::Panning { button, last: pos };
            return Effect::None;
        }
        if matches!(self.gesture, Gesture::Panning { .. }) {
            return Effect::None;
        }
        self.gesture = Gesture::Painting;
        self.paint_effect(pos, erase)
    }

    fn pointer_move(&mut self, pos: ScreenPos, erase: bool) -> Effect {
        match self.gesture {
            Gesture::Idle => Effect::None,
            Gesture::Painting => self.paint_effect(pos, erase),
            Gesture::Panning { button, last } => {
                let (dx, dy) = (pos.x - last.x, pos.y - last.y);
                self.gesture = Gesture::Panning { button, last: pos };
                if dx == 0.0 && dy == 0.0 {
                    return Effect::None;
                }
                self.pan(dx, dy);
                Effect::Redraw
            }
        }
    }

    fn pointer_up(&mut self, button: PointerButton) {
        let ends = match self.gesture {
            Gesture::Idle => false,
            Gesture::Painting => button == PointerButton::Primary,
            Gesture::Panning { button: active, .. } => active == button,
        };
        if ends {
            self.gesture = Gesture::Idle;
        }
    }

    fn paint_effect(&mut self, pos: ScreenPos, erase: bool) -> Effect {
        match self.paint_at(pos, erase) {
            Some(_) => Effect::Redraw,
            None => Effect::None,
        }
    }

    fn command(&mut self, cmd: EditorCommand) -> Result<Effect, EditorError> {
        match cmd {
            EditorCommand::Save => return Ok(Effect::Save),
            EditorCommand::Load => return Ok(Effect::Load),
            EditorCommand::NewSize { width, height } => self.resize(width, height)?,
            EditorCommand::Undo => {
                if self.undo()?.is_none() {
                    return Ok(Effect::None);
                }
            }
            EditorCommand::ClearActiveLayer => self.clear_active_layer(),
            EditorCommand::SelectLayer(layer) => self.select_layer(layer),
            EditorCommand::NextLayer => self.select_layer(self.session.active_layer.next()),
            EditorCommand::PrevLayer => self.select_layer(self.session.active_layer.prev()),
            EditorCommand::SelectTile(id) => self.select_tile(id)?,
            EditorCommand::NextTile | EditorCommand::PrevTile => {
                let forward = matches!(cmd, EditorCommand::NextTile);
                let Some(id) = self.palette.cycle(self.session.selected, forward) else {
                    return Ok(Effect::None);
                };
                self.session.selected = Some(id);
            }
            EditorCommand::PaletteAdd { id, color } => self.palette_add(id, color)?,
            EditorCommand::PaletteEdit { id, color } => self.palette_edit(id, color)?,
            EditorCommand::PaletteRemove(id) => self.palette_remove(id)?,
            EditorCommand::EditSelected(color) => {
                let id = self.selected_or_err()?;
                self.palette_edit(id, color)?;
            }
            EditorCommand::RemoveSelected => {
                let id = self.selected_or_err()?;
                self.palette_remove(id)?;
            }
        }
        Ok(Effect::Redraw)
    }
}
