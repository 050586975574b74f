use bevy::prelude::*;
use tilemap_core::{EditorCommand, EditorState, LayerId, Rgb, TileId};
use tilemap_format::EditorConfig;

/// 新增编号 / E 键改色时轮换使用的颜色。
const PRESET_COLORS: [Rgb; 8] = [
    Rgb::new(0xc0, 0x39, 0x2b),
    Rgb::new(0x27, 0xae, 0x60),
    Rgb::new(0x29, 0x80, 0xb9),
    Rgb::new(0xf3, 0x9c, 0x12),
    Rgb::new(0x8e, 0x44, 0xad),
    Rgb::new(0x16, 0xa0, 0x85),
    Rgb::new(0xd3, 0x54, 0x00),
    Rgb::new(0xbd, 0xc3, 0xc7),
];

const DIGIT_KEYS: [(KeyCode, TileId); 9] = [
    (KeyCode::Digit1, 1),
    (KeyCode::Digit2, 2),
    (KeyCode::Digit3, 3),
    (KeyCode::Digit4, 4),
    (KeyCode::Digit5, 5),
    (KeyCode::Digit6, 6),
    (KeyCode::Digit7, 7),
    (KeyCode::Digit8, 8),
    (KeyCode::Digit9, 9),
];

pub fn generated_color(id: TileId) -> Rgb {
    PRESET_COLORS[id as usize % PRESET_COLORS.len()]
}

/// 预设表里 `current` 的下一个颜色；不在表里时从第一个开始。
pub fn next_preset(current: Option<Rgb>) -> Rgb {
    let pos = current.and_then(|c| PRESET_COLORS.iter().position(|&p| p == c));
    match pos {
        Some(i) => PRESET_COLORS[(i + 1) % PRESET_COLORS.len()],
        None => PRESET_COLORS[0],
    }
}

/// 把本帧按下的键翻译成编辑命令。
///
/// - S / L：保存 / 读取
/// - Ctrl+N：按配置的默认尺寸新建
/// - Ctrl+Z：撤销
/// - Ctrl+Delete：清空当前层
/// - PageUp / PageDown、F1-F3：切换图层
/// - [ / ]、1-9：选择编号
/// - Insert / E / Backspace：调色板 新增 / 改色 / 删除
///
/// 新建和清空会丢掉内容且无法撤销，所以必须按住 Ctrl。
pub fn commands_from_keys(
    keys: &ButtonInput<KeyCode>,
    state: &EditorState,
    config: &EditorConfig,
) -> Vec<EditorCommand> {
    let ctrl = keys.pressed(KeyCode::ControlLeft) || keys.pressed(KeyCode::ControlRight);
    let mut out = Vec::new();

    if ctrl {
        if keys.just_pressed(KeyCode::KeyZ) {
            out.push(EditorCommand::Undo);
        }
        if keys.just_pressed(KeyCode::KeyN) {
            out.push(EditorCommand::NewSize {
                width: config.settings.map_width,
                height: config.settings.map_height,
            });
        }
        if keys.just_pressed(KeyCode::Delete) {
            out.push(EditorCommand::ClearActiveLayer);
        }
        return out;
    }

    if keys.just_pressed(KeyCode::KeyS) {
        out.push(EditorCommand::Save);
    }
    if keys.just_pressed(KeyCode::KeyL) {
        out.push(EditorCommand::Load);
    }

    if keys.just_pressed(KeyCode::PageUp) {
        out.push(EditorCommand::NextLayer);
    }
    if keys.just_pressed(KeyCode::PageDown) {
        out.push(EditorCommand::PrevLayer);
    }
    for (key, layer) in [
        (KeyCode::F1, LayerId::Walls),
        (KeyCode::F2, LayerId::Floors),
        (KeyCode::F3, LayerId::Ceilings),
    ] {
        if keys.just_pressed(key) {
            out.push(EditorCommand::SelectLayer(layer));
        }
    }

    if keys.just_pressed(KeyCode::BracketRight) {
        out.push(EditorCommand::NextTile);
    }
    if keys.just_pressed(KeyCode::BracketLeft) {
        out.push(EditorCommand::PrevTile);
    }
    for (key, id) in DIGIT_KEYS {
        if keys.just_pressed(key) {
            out.push(EditorCommand::SelectTile(id));
        }
    }

    if keys.just_pressed(KeyCode::Insert) {
        let id = state.palette().next_free_id();
        out.push(EditorCommand::PaletteAdd {
            id,
            color: generated_color(id),
        });
    }
    if keys.just_pressed(KeyCode::KeyE) {
        let current = state.selected_tile().and_then(|id| state.palette().get(id));
        out.push(EditorCommand::EditSelected(next_preset(current)));
    }
    if keys.just_pressed(KeyCode::Backspace) {
        out.push(EditorCommand::RemoveSelected);
    }

    out
}
