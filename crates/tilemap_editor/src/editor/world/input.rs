use bevy::ecs::message::MessageReader;
use bevy::ecs::system::SystemParam;
use bevy::input::mouse::MouseWheel;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use tilemap_core::{Effect, EditorCommand, EditorInput, EditorState, PointerButton, ScreenPos};
use tilemap_format::EditorConfig;

use crate::editor::persistence::{load_map, persist_palette, save_map};
use crate::editor::types::{EditorFiles, StatusLine};

use super::shortcuts::commands_from_keys;

const POINTER_BUTTONS: [(MouseButton, PointerButton); 3] = [
    (MouseButton::Left, PointerButton::Primary),
    (MouseButton::Right, PointerButton::Secondary),
    (MouseButton::Middle, PointerButton::Tertiary),
];

#[derive(SystemParam)]
pub struct EditorInputParams<'w, 's> {
    pub buttons: Res<'w, ButtonInput<MouseButton>>,
    pub keys: Res<'w, ButtonInput<KeyCode>>,
    pub wheel: MessageReader<'w, 's, MouseWheel>,
    pub windows: Query<'w, 's, &'static Window, With<PrimaryWindow>>,
    pub state: ResMut<'w, EditorState>,
    pub files: Res<'w, EditorFiles>,
    pub status: ResMut<'w, StatusLine>,
}

/// 一个输入处理完之后宿主要做的事。
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputOutcome {
    /// 画布需要重建。
    pub redraw: bool,
    /// 要显示在 HUD 上的提示。
    pub message: Option<String>,
}

/// 采集本帧的鼠标/滚轮/键盘输入，逐个交给 `EditorState::dispatch`。
pub fn editor_input(mut p: EditorInputParams, mut last_cursor: Local<Option<Vec2>>) {
    let cursor = p.windows.single().ok().and_then(|w| w.cursor_position());
    let erase = p.keys.pressed(KeyCode::ShiftLeft) || p.keys.pressed(KeyCode::ShiftRight);

    let mut inputs = pointer_inputs(&p.buttons, cursor, *last_cursor, erase);
    *last_cursor = cursor;

    // 同一帧的滚轮事件合并成一次缩放（触控板会连续发很多小的像素增量）
    let wheel: f32 = p.wheel.read().map(|ev| ev.y).sum();
    if let Some(pos) = cursor {
        inputs.extend(wheel_input(pos, wheel));
    }

    inputs.extend(
        commands_from_keys(&p.keys, &p.state, &p.files.config)
            .into_iter()
            .map(EditorInput::Command),
    );

    if let Some(msg) = dispatch_all(&mut p.state, inputs, &p.files.config) {
        p.status.set(msg);
    }
}

/// 本帧滚轮增量之和 -> 至多一个缩放事件。
pub fn wheel_input(pos: Vec2, delta: f32) -> Option<EditorInput> {
    if delta.abs() < f32::EPSILON {
        return None;
    }
    Some(EditorInput::Wheel {
        pos: pos.into(),
        delta,
    })
}

/// 依次分发，返回最后一条提示。
///
/// 分发时绕过变更检测，只有某个输入确实需要重画时才标记 `EditorState` 已变更，
/// 悬停、空闲时的移动不会触发画布重建。
pub fn dispatch_all(
    state: &mut ResMut<EditorState>,
    inputs: Vec<EditorInput>,
    config: &EditorConfig,
) -> Option<String> {
    let mut redraw = false;
    let mut message = None;
    for input in inputs {
        let outcome = apply_input(state.bypass_change_detection(), input, config);
        redraw |= outcome.redraw;
        if outcome.message.is_some() {
            message = outcome.message;
        }
    }
    if redraw {
        state.set_changed();
    }
    message
}

/// 鼠标按键与移动 -> 输入事件。顺序：按下、移动、松开。
pub fn pointer_inputs(
    buttons: &ButtonInput<MouseButton>,
    cursor: Option<Vec2>,
    last_cursor: Option<Vec2>,
    erase: bool,
) -> Vec<EditorInput> {
    let mut out = Vec::new();

    if let Some(pos) = cursor {
        for (mouse, button) in POINTER_BUTTONS {
            if buttons.just_pressed(mouse) {
                out.push(EditorInput::PointerDown {
                    pos: ScreenPos::from(pos),
                    button,
                    erase,
                });
            }
        }
        if last_cursor != Some(pos) {
            out.push(EditorInput::PointerMove {
                pos: ScreenPos::from(pos),
                erase,
            });
        }
    }

    for (mouse, button) in POINTER_BUTTONS {
        if buttons.just_released(mouse) {
            out.push(EditorInput::PointerUp { button });
        }
    }

    out
}

/// 分发一个输入并处理副作用（保存/读取/调色板落盘）。错误只进 HUD 提示和日志。
pub fn apply_input(state: &mut EditorState, input: EditorInput, config: &EditorConfig) -> InputOutcome {
    let touches_palette = matches!(
        input,
        EditorInput::Command(
            EditorCommand::PaletteAdd { .. }
                | EditorCommand::PaletteEdit { .. }
                | EditorCommand::PaletteRemove(_)
                | EditorCommand::EditSelected(_)
                | EditorCommand::RemoveSelected
        )
    );

    match state.dispatch(input) {
        Ok(Effect::Save) => {
            let (Ok(msg) | Err(msg)) = save_map(state, config);
            InputOutcome {
                redraw: false,
                message: Some(msg),
            }
        }
        Ok(Effect::Load) => match load_map(state, config) {
            Ok(msg) => InputOutcome {
                redraw: true,
                message: Some(msg),
            },
            Err(msg) => InputOutcome {
                redraw: false,
                message: Some(msg),
            },
        },
        Ok(effect) => InputOutcome {
            redraw: effect == Effect::Redraw,
            message: if touches_palette {
                persist_palette(state, config).err()
            } else {
                None
            },
        },
        Err(err) => {
            warn!("{err}");
            InputOutcome {
                redraw: false,
                message: Some(err.to_string()),
            }
        }
    }
}
