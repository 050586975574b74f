use crate::layer::{LayerId, TileId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    OutOfBounds {
        layer: LayerId,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::OutOfBounds {
                layer,
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "cell ({x}, {y}) on layer {layer} is outside the {width}x{height} map"
            ),
        }
    }
}

impl std::error::Error for GridError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// 调色板 ID 必须是正整数（0 保留为“空”）。
    InvalidId,
    DuplicateId(TileId),
    UnknownId(TileId),
    /// 当前没有选中任何 ID。
    NoSelection,
}

impl std::fmt::Display for PaletteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteError::InvalidId => write!(f, "palette id must be a positive integer"),
            PaletteError::DuplicateId(id) => write!(f, "id {id} already exists in palette"),
            PaletteError::UnknownId(id) => write!(f, "id {id} is not in the palette"),
            PaletteError::NoSelection => write!(f, "no palette id selected"),
        }
    }
}

impl std::error::Error for PaletteError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorError {
    Grid(GridError),
    Palette(PaletteError),
    InvalidSize { width: u32, height: u32 },
}

impl std::fmt::Display for EditorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorError::Grid(err) => err.fmt(f),
            EditorError::Palette(err) => err.fmt(f),
            EditorError::InvalidSize { width, height } => write!(
                f,
                "invalid map size {width}x{height} (each side must be 1..={})",
                crate::state::MAX_MAP_SIDE
            ),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Grid(err) => Some(err),
            EditorError::Palette(err) => Some(err),
            EditorError::InvalidSize { .. } => None,
        }
    }
}

impl From<GridError> for EditorError {
    fn from(value: GridError) -> Self {
        EditorError::Grid(value)
    }
}

impl From<PaletteError> for EditorError {
    fn from(value: PaletteError) -> Self {
        EditorError::Palette(value)
    }
}
