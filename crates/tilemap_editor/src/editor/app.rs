//! 编辑器应用装配（Bevy App 构建与系统注册）。

use bevy::prelude::*;

use super::{
	paths::editor_config_path,
	persistence::{initial_state, load_startup_config},
	types::{EditorFiles, StatusLine},
	ui,
	world,
	UI_BG,
};

/// 运行编辑器。
pub fn run() -> AppExit {
	App::new()
		.insert_resource(ClearColor(UI_BG))
		.add_plugins(DefaultPlugins.set(WindowPlugin {
			primary_window: Some(Window {
				title: "Map Editor".to_string(),
				..default()
			}),
			..default()
		}))
		// --- Resources ---
		.init_resource::<StatusLine>()
		.add_systems(
			Startup,
			(
				// --- Startup ---
				setup_editor,
				world::setup_world,
				ui::setup_ui,
			),
		)
		.add_systems(
			Update,
			(
				// 输入 -> 状态 -> 画布/HUD，同一帧内生效
				world::editor_input,
				world::rebuild_cell_sprites,
				world::draw_canvas_helpers,
				ui::update_hud_text,
			)
				.chain(),
		)
		.run()
}

/// 读配置与调色板文件，插入 `EditorState` / `EditorFiles`。
///
/// 放在 Startup 里做，保证日志插件已经初始化。
fn setup_editor(mut commands: Commands, mut status: ResMut<StatusLine>) {
	let config_path = editor_config_path();
	let (config, config_note) = load_startup_config(&config_path);
	let (state, palette_note) = initial_state(&config);
	info!(
		"editor ready: {}x{} map, files in {}, config {}",
		state.store().width(),
		state.store().height(),
		config.files.dir.display(),
		config_path.display()
	);

	if let Some(note) = config_note.or(palette_note) {
		status.set(note);
	}
	commands.insert_resource(state);
	commands.insert_resource(EditorFiles { config });
}
