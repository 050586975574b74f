//! UI：只有一个左上角 HUD。

mod hud;

pub use hud::{setup_ui, update_hud_text};
