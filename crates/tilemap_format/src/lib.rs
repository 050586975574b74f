#![forbid(unsafe_code)]

//! 地图文本格式：每层一个文件，每行一行格子，整数以空白分隔。
//!
//! ```text
//! 0 0 1 1
//! 0 2 2 1
//! ```
//!
//! 没有文件头，也没有元数据；行数 = height，每行 token 数 = width。

mod config;
mod files;
mod palette_file;

pub use config::{load_config, save_config, ConfigError, EditorConfig, DEFAULT_CONFIG_FILE};
pub use files::{load_layers, save_layers, LayerFiles, LoadError, SaveError};
pub use palette_file::{load_palette, save_palette};

use tilemap_core::{Grid, TileId};

/// 单个图层文本的解析错误。行号、列号从 1 开始。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    BadToken {
        line: usize,
        column: usize,
        token: String,
    },
    Ragged {
        line: usize,
        expected: usize,
        found: usize,
    },
    Empty,
}

impl std::fmt::Display for FormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatError::BadToken {
                line,
                column,
                token,
            } => write!(
                f,
                "line {line}, column {column}: {token:?} is not a tile id"
            ),
            FormatError::Ragged {
                line,
                expected,
                found,
            } => write!(
                f,
                "line {line} has {found} columns, expected {expected}"
            ),
            FormatError::Empty => write!(f, "no rows"),
        }
    }
}

impl std::error::Error for FormatError {}

pub fn encode_layer(grid: &Grid) -> String {
    let mut out = String::with_capacity(grid.width() as usize * grid.height() as usize * 2);
    for row in grid.rows() {
        let line: Vec<String> = row.iter().map(|t| t.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

/// 空行会被跳过；每行列数必须一致。
pub fn decode_layer(text: &str) -> Result<Grid, FormatError> {
    let mut rows: Vec<Vec<TileId>> = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let row = line
            .split_whitespace()
            .enumerate()
            .map(|(col, token)| {
                token.parse::<TileId>().map_err(|_| FormatError::BadToken {
                    line: line_no,
                    column: col + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<TileId>, FormatError>>()?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(FormatError::Ragged {
                    line: line_no,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
    }

    if rows.is_empty() {
        return Err(FormatError::Empty);
    }
    Grid::from_rows(rows).ok_or(FormatError::Empty)
}
