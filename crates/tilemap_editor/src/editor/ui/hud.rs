//! 左上角 HUD 文案。

use bevy::prelude::*;
use tilemap_core::EditorState;

use crate::editor::types::{HudText, StatusLine};
use crate::editor::HUD_BG;

const HELP_LINES: [&str; 3] = [
    "LMB paint | Shift+LMB erase | RMB/MMB drag pan | Wheel zoom",
    "S save | L load | Ctrl+N new | Ctrl+Z undo | Ctrl+Del clear layer | PgUp/PgDn F1-F3 layer",
    "[ ] 1-9 select | Ins add | E recolor | Backspace remove",
];

/// UI 初始化：HUD 文本节点。
pub fn setup_ui(mut commands: Commands) {
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 13.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            max_width: Val::Px(560.0),
            padding: UiRect::all(Val::Px(8.0)),
            ..default()
        },
        BackgroundColor(HUD_BG),
        ZIndex(800),
        bevy::ui::FocusPolicy::Pass,
        HudText,
    ));
}

/// HUD 全文：状态行、调色板（选中项加方括号）、按键说明、最近提示。
pub fn hud_message(state: &EditorState, status: &StatusLine) -> String {
    let selected = state.selected_tile();
    let palette: Vec<String> = state
        .palette()
        .iter()
        .map(|(id, color)| {
            if Some(id) == selected {
                format!("[{id} {color}]")
            } else {
                format!("{id} {color}")
            }
        })
        .collect();

    let mut msg = state.status_text();
    msg.push_str("\nPalette: ");
    if palette.is_empty() {
        msg.push_str("(empty)");
    } else {
        msg.push_str(&palette.join("  "));
    }
    for line in HELP_LINES {
        msg.push('\n');
        msg.push_str(line);
    }
    if !status.text().is_empty() {
        msg.push_str("\n> ");
        msg.push_str(status.text());
    }
    msg
}

pub fn update_hud_text(
    mut commands: Commands,
    state: Res<EditorState>,
    status: Res<StatusLine>,
    hud_q: Query<Entity, With<HudText>>,
) {
    let Some(hud_entity) = hud_q.iter().next() else {
        return;
    };
    if !state.is_changed() && !status.is_changed() {
        return;
    }
    commands
        .entity(hud_entity)
        .insert(Text::new(hud_message(&state, &status)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_core::EditorSettings;

    #[test]
    fn test_hud_marks_selection() {
        let state = EditorState::new(&EditorSettings::default());
        let msg = hud_message(&state, &StatusLine::default());
        let mut lines = msg.lines();
        assert_eq!(
            lines.next(),
            Some("Layer: walls | Sel ID: 1 | Map: 64 x 64 | Zoom: 20.0px")
        );
        assert_eq!(
            lines.next(),
            Some("Palette: [1 #222222]  2 #8b4513  3 #888888  4 #004400")
        );
        assert!(!msg.contains("> "));
    }

    #[test]
    fn test_hud_shows_status_line() {
        let state = EditorState::new(&EditorSettings::default());
        let mut status = StatusLine::default();
        status.set("Saved to .");
        assert!(hud_message(&state, &status).ends_with("\n> Saved to ."));
    }
}
