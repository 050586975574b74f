use bevy::app::AppExit;

fn main() -> AppExit {
    tilemap_editor::run()
}
