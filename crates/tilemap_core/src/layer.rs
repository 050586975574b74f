//! 三层格子数据：walls / floors / ceilings，共享同一个 (width, height)。

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::GridError;

/// 格子里存的 tile 编号。对引擎来说是不透明整数。
pub type TileId = u32;

/// 0 在所有图层中都表示“空”。
pub const EMPTY_TILE: TileId = 0;

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerId {
    #[default]
    Walls,
    Floors,
    Ceilings,
}

impl LayerId {
    /// 固定顺序（保存顺序 / 图层切换顺序）。
    pub const ALL: [LayerId; 3] = [LayerId::Walls, LayerId::Floors, LayerId::Ceilings];

    /// 绘制顺序：地面在最下，墙在中间，天花板覆盖在最上。
    pub const DRAW_ORDER: [LayerId; 3] = [LayerId::Floors, LayerId::Walls, LayerId::Ceilings];

    pub fn name(self) -> &'static str {
        match self {
            LayerId::Walls => "walls",
            LayerId::Floors => "floors",
            LayerId::Ceilings => "ceilings",
        }
    }

    #[inline]
    fn slot(self) -> usize {
        match self {
            LayerId::Walls => 0,
            LayerId::Floors => 1,
            LayerId::Ceilings => 2,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.slot() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.slot() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for LayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// 单层格子，行优先存储。
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    width: u32,
    height: u32,
    cells: Vec<TileId>,
}

impl Grid {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY_TILE; width as usize * height as usize],
        }
    }

    /// 由逐行数据构建。要求每行长度一致，否则返回 None。
    pub fn from_rows(rows: Vec<Vec<TileId>>) -> Option<Self> {
        let height = rows.len();
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        let cells: Vec<TileId> = rows.into_iter().flatten().collect();
        Some(Self {
            width: u32::try_from(width).ok()?,
            height: u32::try_from(height).ok()?,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    #[inline]
    pub fn idx(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    pub fn get(&self, x: u32, y: u32) -> Option<TileId> {
        if !self.contains(x, y) {
            return None;
        }
        self.cells.get(self.idx(x, y)).copied()
    }

    /// 越界时返回 false，不修改任何数据。
    pub fn set(&mut self, x: u32, y: u32, value: TileId) -> bool {
        if !self.contains(x, y) {
            return false;
        }
        let idx = self.idx(x, y);
        self.cells[idx] = value;
        true
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileId]> {
        // width 为 0 时 chunks 会 panic
        self.cells.chunks(self.width.max(1) as usize)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&t| t == EMPTY_TILE)
    }
}

/// 三层格子的存储。三层尺寸在任何时刻都一致。
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayerStore {
    width: u32,
    height: u32,
    layers: [Grid; 3],
}

impl LayerStore {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            layers: [
                Grid::new(width, height),
                Grid::new(width, height),
                Grid::new(width, height),
            ],
        }
    }

    /// 用三张已存在的 Grid 组装。任意两张尺寸不同则返回 None。
    pub fn from_layers(walls: Grid, floors: Grid, ceilings: Grid) -> Option<Self> {
        let (width, height) = (walls.width, walls.height);
        let same = |g: &Grid| g.width == width && g.height == height;
        if !same(&floors) || !same(&ceilings) {
            return None;
        }
        Some(Self {
            width,
            height,
            layers: [walls, floors, ceilings],
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height
    }

    pub fn layer(&self, layer: LayerId) -> &Grid {
        &self.layers[layer.slot()]
    }

    fn bounds_error(&self, layer: LayerId, x: u32, y: u32) -> GridError {
        GridError::OutOfBounds {
            layer,
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }

    pub fn get(&self, layer: LayerId, x: u32, y: u32) -> Result<TileId, GridError> {
        self.layer(layer)
            .get(x, y)
            .ok_or_else(|| self.bounds_error(layer, x, y))
    }

    pub fn set(&mut self, layer: LayerId, x: u32, y: u32, value: TileId) -> Result<(), GridError> {
        if !self.layers[layer.slot()].set(x, y, value) {
            return Err(self.bounds_error(layer, x, y));
        }
        Ok(())
    }

    /// 破坏式改尺寸：三层全部替换为新的空格子，旧内容整体丢弃（不裁剪也不填充）。
    pub fn resize(&mut self, width: u32, height: u32) {
        *self = Self::new(width, height);
    }

    /// 只清空一层，其它两层不动。
    pub fn clear_layer(&mut self, layer: LayerId) {
        self.layers[layer.slot()] = Grid::new(self.width, self.height);
    }
}

impl Default for LayerStore {
    fn default() -> Self {
        Self::new(64, 64)
    }
}
