use bevy::prelude::*;
use bevy::ecs::system::Command;

struct DespawnSilently(Entity);

impl Command for DespawnSilently {
	fn apply(self, world: &mut World) {
		if world.entities().contains(self.0) {
			let _ = world.despawn(self.0);
		}
	}
}

/// 安全地 despawn 一个实体：画布重建时同一帧可能重复提交，实体已不存在也不会报 command error。
pub fn despawn_silently(commands: &mut Commands, entity: Entity) {
	commands.queue(DespawnSilently(entity));
}

/// 核心库的 `#rrggbb` 颜色 -> Bevy 颜色。
pub fn to_bevy_color(rgb: tilemap_core::Rgb, alpha: f32) -> Color {
	Color::srgba_u8(rgb.r, rgb.g, rgb.b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

/// 画布坐标（左上原点，y 向下） -> 世界坐标（窗口中心原点，y 向上）。
///
/// 世界相机固定在原点、正交投影 1 单位 = 1 逻辑像素。
pub fn canvas_to_world(pos: Vec2, window_size: Vec2) -> Vec2 {
	Vec2::new(pos.x - window_size.x * 0.5, window_size.y * 0.5 - pos.y)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_canvas_to_world() {
		let size = Vec2::new(800.0, 600.0);
		assert_eq!(canvas_to_world(Vec2::ZERO, size), Vec2::new(-400.0, 300.0));
		assert_eq!(canvas_to_world(Vec2::new(400.0, 300.0), size), Vec2::ZERO);
		assert_eq!(canvas_to_world(size, size), Vec2::new(400.0, -300.0));
	}
}
