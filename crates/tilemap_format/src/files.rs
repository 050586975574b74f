//! 三层文件的保存 / 读取。
//!
//! 保存顺序固定（walls, floors, ceilings），任一文件失败立即停止，已写入的文件不回滚。
//! 读取时三层全部解析并通过尺寸检查后才返回新的 `LayerStore`。

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tilemap_core::{Grid, LayerId, LayerStore, MAX_MAP_SIDE};

use crate::{decode_layer, encode_layer, FormatError};

/// 三个图层文件所在目录与文件名。
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct LayerFiles {
    pub dir: PathBuf,
    pub walls: String,
    pub floors: String,
    pub ceilings: String,
}

impl Default for LayerFiles {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            walls: "map.txt".to_string(),
            floors: "floor.txt".to_string(),
            ceilings: "ceil.txt".to_string(),
        }
    }
}

impl LayerFiles {
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            ..Self::default()
        }
    }

    pub fn file_name(&self, layer: LayerId) -> &str {
        match layer {
            LayerId::Walls => &self.walls,
            LayerId::Floors => &self.floors,
            LayerId::Ceilings => &self.ceilings,
        }
    }

    pub fn path(&self, layer: LayerId) -> PathBuf {
        self.dir.join(self.file_name(layer))
    }
}

#[derive(Debug)]
pub enum SaveError {
    /// 地图目录建不出来，还没有写任何一层。
    CreateDir { path: PathBuf, source: io::Error },
    Write {
        layer: LayerId,
        path: PathBuf,
        source: io::Error,
    },
}

impl SaveError {
    /// 写失败的那一层；建目录失败时为 None。
    pub fn layer(&self) -> Option<LayerId> {
        match self {
            SaveError::CreateDir { .. } => None,
            SaveError::Write { layer, .. } => Some(*layer),
        }
    }
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveError::CreateDir { path, source } => write!(
                f,
                "failed creating map directory {}: {source}",
                path.display()
            ),
            SaveError::Write {
                layer,
                path,
                source,
            } => write!(
                f,
                "failed saving {layer} layer to {}: {source}",
                path.display()
            ),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SaveError::CreateDir { source, .. } | SaveError::Write { source, .. } => Some(source),
        }
    }
}

#[derive(Debug)]
pub enum LoadError {
    Missing {
        layer: LayerId,
        path: PathBuf,
    },
    Io {
        layer: LayerId,
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        layer: LayerId,
        path: PathBuf,
        source: FormatError,
    },
    /// `expected` 以 walls 层为准，(width, height)。
    ShapeMismatch {
        layer: LayerId,
        path: PathBuf,
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// 宽或高超过 `MAX_MAP_SIDE`，与新建地图的上限一致。
    TooLarge {
        layer: LayerId,
        path: PathBuf,
        width: u32,
        height: u32,
    },
}

impl LoadError {
    pub fn layer(&self) -> LayerId {
        match self {
            LoadError::Missing { layer, .. }
            | LoadError::Io { layer, .. }
            | LoadError::Parse { layer, .. }
            | LoadError::ShapeMismatch { layer, .. }
            | LoadError::TooLarge { layer, .. } => *layer,
        }
    }
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Missing { path, .. } => write!(f, "{} not found", path.display()),
            LoadError::Io { path, source, .. } => {
                write!(f, "failed reading {}: {source}", path.display())
            }
            LoadError::Parse { path, source, .. } => write!(f, "{}: {source}", path.display()),
            LoadError::ShapeMismatch {
                layer,
                path,
                expected,
                found,
            } => write!(
                f,
                "{} ({layer}) is {}x{}, expected {}x{} like the walls layer",
                path.display(),
                found.0,
                found.1,
                expected.0,
                expected.1
            ),
            LoadError::TooLarge {
                path,
                width,
                height,
                ..
            } => write!(
                f,
                "{} is {width}x{height}, larger than the {MAX_MAP_SIDE} cell limit",
                path.display()
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io { source, .. } => Some(source),
            LoadError::Parse { source, .. } => Some(source),
            LoadError::Missing { .. }
            | LoadError::ShapeMismatch { .. }
            | LoadError::TooLarge { .. } => None,
        }
    }
}

/// 先写 `<name>.tmp` 再 rename，单个文件不会出现写了一半的情况。
pub(crate) fn write_replacing(path: &Path, text: &str) -> io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    std::fs::write(&tmp, text)?;
    if let Err(err) = std::fs::rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(err);
    }
    Ok(())
}

pub fn save_layers(store: &LayerStore, files: &LayerFiles) -> Result<(), SaveError> {
    if !files.dir.as_os_str().is_empty() {
        std::fs::create_dir_all(&files.dir).map_err(|source| SaveError::CreateDir {
            path: files.dir.clone(),
            source,
        })?;
    }

    for layer in LayerId::ALL {
        let path = files.path(layer);
        let text = encode_layer(store.layer(layer));
        write_replacing(&path, &text).map_err(|source| SaveError::Write {
            layer,
            path: path.clone(),
            source,
        })?;
        debug!("saved {layer} -> {}", path.display());
    }
    info!(
        "saved {}x{} map to {}",
        store.width(),
        store.height(),
        files.dir.display()
    );
    Ok(())
}

fn read_layer(files: &LayerFiles, layer: LayerId) -> Result<Grid, LoadError> {
    let path = files.path(layer);
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(LoadError::Missing { layer, path });
        }
        Err(source) => return Err(LoadError::Io { layer, path, source }),
    };
    decode_layer(&text).map_err(|source| LoadError::Parse { layer, path, source })
}

pub fn load_layers(files: &LayerFiles) -> Result<LayerStore, LoadError> {
    let walls = read_layer(files, LayerId::Walls)?;
    let floors = read_layer(files, LayerId::Floors)?;
    let ceilings = read_layer(files, LayerId::Ceilings)?;

    let expected = (walls.width(), walls.height());
    if expected.0 > MAX_MAP_SIDE || expected.1 > MAX_MAP_SIDE {
        return Err(LoadError::TooLarge {
            layer: LayerId::Walls,
            path: files.path(LayerId::Walls),
            width: expected.0,
            height: expected.1,
        });
    }
    for (layer, grid) in [(LayerId::Floors, &floors), (LayerId::Ceilings, &ceilings)] {
        let found = (grid.width(), grid.height());
        if found != expected {
            return Err(LoadError::ShapeMismatch {
                layer,
                path: files.path(layer),
                expected,
                found,
            });
        }
    }

    let store = LayerStore::from_layers(walls, floors, ceilings).ok_or_else(|| {
        LoadError::ShapeMismatch {
            layer: LayerId::Walls,
            path: files.path(LayerId::Walls),
            expected,
            found: expected,
        }
    })?;
    info!(
        "loaded {}x{} map from {}",
        store.width(),
        store.height(),
        files.dir.display()
    );
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, text: &str) {
        std::fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn test_save_writes_three_files() {
        let tmp = tempfile::tempdir().unwrap();
        let files = LayerFiles::in_dir(tmp.path());
        let store = LayerStore::new(2, 2);

        save_layers(&store, &files).unwrap();
        for name in ["map.txt", "floor.txt", "ceil.txt"] {
            let text = std::fs::read_to_string(tmp.path().join(name)).unwrap();
            assert_eq!(text, "0 0\n0 0\n");
            assert_eq!(text.lines().count(), 2);
            assert!(!tmp.path().join(format!("{name}.tmp")).exists());
        }

        let loaded = load_layers(&files).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (2, 2));
        for layer in LayerId::ALL {
            assert!(loaded.layer(layer).is_empty());
        }
    }

    #[test]
    fn test_save_then_load_same_cells() {
        let tmp = tempfile::tempdir().unwrap();
        let files = LayerFiles::in_dir(tmp.path().join("maps"));
        let mut store = LayerStore::new(5, 3);
        store.set(LayerId::Walls, 0, 0, 1).unwrap();
        store.set(LayerId::Walls, 4, 2, 3).unwrap();
        store.set(LayerId::Floors, 2, 1, 2).unwrap();
        store.set(LayerId::Ceilings, 3, 0, 4).unwrap();

        save_layers(&store, &files).unwrap();
        assert_eq!(load_layers(&files).unwrap(), store);
    }

    #[test]
    fn test_load_missing_file_names_it() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "map.txt", "0 0\n");
        write(tmp.path(), "ceil.txt", "0 0\n");
        let err = load_layers(&LayerFiles::in_dir(tmp.path())).unwrap_err();
        assert!(matches!(err, LoadError::Missing { layer: LayerId::Floors, .. }));
        assert!(err.to_string().contains("floor.txt"));
    }

    #[test]
    fn test_load_bad_token() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "map.txt", "0 0\n");
        write(tmp.path(), "floor.txt", "0 0\n");
        write(tmp.path(), "ceil.txt", "0 wall\n");
        let err = load_layers(&LayerFiles::in_dir(tmp.path())).unwrap_err();
        assert_eq!(err.layer(), LayerId::Ceilings);
        assert!(matches!(
            err,
            LoadError::Parse {
                source: FormatError::BadToken { line: 1, column: 2, .. },
                ..
            }
        ));
    }

    #[test]
    fn test_load_rejects_row_count_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "map.txt", "0 0\n0 0\n");
        write(tmp.path(), "floor.txt", "0 0\n0 0\n0 0\n");
        write(tmp.path(), "ceil.txt", "0 0\n0 0\n");
        let err = load_layers(&LayerFiles::in_dir(tmp.path())).unwrap_err();
        match err {
            LoadError::ShapeMismatch {
                layer,
                expected,
                found,
                ..
            } => {
                assert_eq!(layer, LayerId::Floors);
                assert_eq!(expected, (2, 2));
                assert_eq!(found, (2, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_rejects_column_count_mismatch() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "map.txt", "0 0\n0 0\n");
        write(tmp.path(), "floor.txt", "0 0\n0 0\n");
        write(tmp.path(), "ceil.txt", "0 0 0\n0 0 0\n");
        let err = load_layers(&LayerFiles::in_dir(tmp.path())).unwrap_err();
        assert!(matches!(
            err,
            LoadError::ShapeMismatch {
                layer: LayerId::Ceilings,
                found: (3, 2),
                ..
            }
        ));
    }

    #[test]
    fn test_load_rejects_ragged_layer() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "map.txt", "0 0\n0\n");
        write(tmp.path(), "floor.txt", "0 0\n0 0\n");
        write(tmp.path(), "ceil.txt", "0 0\n0 0\n");
        let err = load_layers(&LayerFiles::in_dir(tmp.path())).unwrap_err();
        assert!(matches!(
            err,
            LoadError::Parse {
                layer: LayerId::Walls,
                source: FormatError::Ragged { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_save_stops_at_first_failure() {
        let tmp = tempfile::tempdir().unwrap();
        // floor.txt 是目录，rename 会失败
        std::fs::create_dir(tmp.path().join("floor.txt")).unwrap();
        std::fs::create_dir(tmp.path().join("floor.txt").join("keep")).unwrap();
        let files = LayerFiles::in_dir(tmp.path());

        let err = save_layers(&LayerStore::new(2, 2), &files).unwrap_err();
        assert_eq!(err.layer(), Some(LayerId::Floors));
        assert!(err.to_string().contains("floor.txt"));
        assert!(tmp.path().join("map.txt").is_file());
        assert!(!tmp.path().join("ceil.txt").exists());
        assert!(!tmp.path().join("floor.txt.tmp").exists());
    }

    #[test]
    fn test_custom_file_names() {
        let tmp = tempfile::tempdir().unwrap();
        let files = LayerFiles {
            dir: tmp.path().to_path_buf(),
            walls: "w.txt".to_string(),
            floors: "f.txt".to_string(),
            ceilings: "c.txt".to_string(),
        };
        save_layers(&LayerStore::new(1, 1), &files).unwrap();
        assert!(tmp.path().join("w.txt").is_file());
        assert_eq!(files.path(LayerId::Ceilings), tmp.path().join("c.txt"));
    }

    #[test]
    fn test_load_rejects_oversized_map() {
        let tmp = tempfile::tempdir().unwrap();
        let row = vec!["0"; (MAX_MAP_SIDE + 1) as usize].join(" ");
        for name in ["map.txt", "floor.txt", "ceil.txt"] {
            write(tmp.path(), name, &row);
        }
        let err = load_layers(&LayerFiles::in_dir(tmp.path())).unwrap_err();
        assert!(matches!(
            err,
            LoadError::TooLarge {
                layer: LayerId::Walls,
                width: 4097,
                height: 1,
                ..
            }
        ));

        // 刚好在上限内的可以读
        let row = vec!["0"; MAX_MAP_SIDE as usize].join(" ");
        for name in ["map.txt", "floor.txt", "ceil.txt"] {
            write(tmp.path(), name, &row);
        }
        let store = load_layers(&LayerFiles::in_dir(tmp.path())).unwrap();
        assert_eq!((store.width(), store.height()), (MAX_MAP_SIDE, 1));
    }

    #[test]
    fn test_save_reports_directory_failure() {
        let tmp = tempfile::tempdir().unwrap();
        // 父路径是普通文件，目录建不出来
        write(tmp.path(), "blocker", "x");
        let files = LayerFiles::in_dir(tmp.path().join("blocker").join("maps"));

        let err = save_layers(&LayerStore::new(2, 2), &files).unwrap_err();
        assert!(matches!(err, SaveError::CreateDir { .. }));
        assert_eq!(err.layer(), None);
        let msg = err.to_string();
        assert!(msg.contains("map directory"));
        assert!(!msg.contains("walls layer"));
    }
}
