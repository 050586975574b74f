//! 配置文件路径相关的工具函数。

use std::path::PathBuf;

use tilemap_format::DEFAULT_CONFIG_FILE;

/// 覆盖配置文件位置的环境变量。
pub const CONFIG_ENV_VAR: &str = "TILEMAP_EDITOR_CONFIG";

/// 编辑器配置文件路径。
///
/// 优先使用环境变量；否则是当前工作目录下的 `editor.ron`（与默认的地图目录 `.` 保持一致）。
pub fn editor_config_path() -> PathBuf {
    config_path_from(std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from))
}

fn config_path_from(overridden: Option<PathBuf>) -> PathBuf {
    overridden
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}
