use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use tilemap_core::{grid_line_step, EditorState, LayerId, RenderCell, ScreenPos};

use crate::editor::types::CellSprite;
use crate::editor::util::{canvas_to_world, despawn_silently, to_bevy_color};
use crate::editor::{BORDER_COLOR, CEILING_ALPHA, GRID_COLOR, HOVER_COLOR, WALL_EDGE_COLOR};

use super::camera::canvas_size;

/// 一个要画的矩形（画布坐标，左上角 + 边长）。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellQuad {
    pub origin: Vec2,
    pub size: f32,
    pub color: Color,
    pub z: f32,
}

/// 天花板向内收缩的像素数，让下面的格子露出一圈。
pub fn ceiling_inset(scale: f32) -> f32 {
    (scale * 0.12).max(1.0)
}

/// 一个格子展开成的矩形：
/// - 地板：整格
/// - 墙：黑边 + 内部色块
/// - 天花板：内缩、半透明
pub fn cell_quads(cell: &RenderCell) -> Vec<CellQuad> {
    let origin = Vec2::from(cell.origin);
    let size = cell.size;
    match cell.layer {
        LayerId::Floors => vec![CellQuad {
            origin,
            size,
            color: to_bevy_color(cell.color, 1.0),
            z: 0.0,
        }],
        LayerId::Walls => {
            let fill = CellQuad {
                origin: origin + Vec2::splat(1.0),
                size: size - 2.0,
                color: to_bevy_color(cell.color, 1.0),
                z: 1.1,
            };
            if size <= 4.0 {
                return vec![CellQuad { origin, size, ..fill }];
            }
            vec![
                CellQuad {
                    origin,
                    size,
                    color: WALL_EDGE_COLOR,
                    z: 1.0,
                },
                fill,
            ]
        }
        LayerId::Ceilings => {
            let inset = ceiling_inset(size);
            let inner = size - inset * 2.0;
            if inner <= 0.0 {
                return Vec::new();
            }
            vec![CellQuad {
                origin: origin + Vec2::splat(inset),
                size: inner,
                color: to_bevy_color(cell.color, CEILING_ALPHA),
                z: 2.0,
            }]
        }
    }
}

/// 状态或窗口尺寸变化时，重建可见范围内的格子 sprite。
pub fn rebuild_cell_sprites(
    mut commands: Commands,
    state: Res<EditorState>,
    windows: Query<&Window, With<PrimaryWindow>>,
    existing: Query<Entity, With<CellSprite>>,
    mut last_size: Local<Vec2>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = canvas_size(window);
    if !state.is_changed() && *last_size == size {
        return;
    }
    *last_size = size;

    for e in &existing {
        despawn_silently(&mut commands, e);
    }

    for cell in state.visible_cells(size.x, size.y) {
        for quad in cell_quads(&cell) {
            let center = canvas_to_world(quad.origin + Vec2::splat(quad.size * 0.5), size);
            commands.spawn((
                Sprite::from_color(quad.color, Vec2::splat(quad.size)),
                Transform::from_xyz(center.x, center.y, quad.z),
                CellSprite,
            ));
        }
    }
}

/// `[start, end]` 内所有 `step` 的整数倍。
pub fn grid_line_positions(start: u32, end: u32, step: u32) -> Vec<u32> {
    let step = step.max(1);
    let first = start.div_ceil(step) * step;
    (first..=end).step_by(step as usize).collect()
}

/// 网格线、地图边界、鼠标所在格子的高亮。每帧用 gizmos 画。
pub fn draw_canvas_helpers(
    mut gizmos: Gizmos,
    state: Res<EditorState>,
    windows: Query<&Window, With<PrimaryWindow>>,
) {
    let Ok(window) = windows.single() else {
        return;
    };
    let size = canvas_size(window);
    let viewport = state.viewport();
    let (map_w, map_h) = (state.store().width(), state.store().height());

    let to_world = |x: u32, y: u32| -> Vec2 {
        canvas_to_world(viewport.cell_to_canvas(x as i32, y as i32).into(), size)
    };

    let window_cells = state.visible_window(size.x, size.y);
    if !window_cells.is_empty() {
        let step = grid_line_step(viewport.scale());
        for x in grid_line_positions(window_cells.left, window_cells.right, step) {
            gizmos.line_2d(
                to_world(x, window_cells.top),
                to_world(x, window_cells.bottom),
                GRID_COLOR,
            );
        }
        for y in grid_line_positions(window_cells.top, window_cells.bottom, step) {
            gizmos.line_2d(
                to_world(window_cells.left, y),
                to_world(window_cells.right, y),
                GRID_COLOR,
            );
        }
    }

    // 地图边界
    let corners = [
        to_world(0, 0),
        to_world(map_w, 0),
        to_world(map_w, map_h),
        to_world(0, map_h),
    ];
    for i in 0..4 {
        gizmos.line_2d(corners[i], corners[(i + 1) % 4], BORDER_COLOR);
    }

    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Some((cx, cy)) = viewport
        .world_to_cell(ScreenPos::from(cursor))
        .in_bounds(map_w, map_h)
    else {
        return;
    };
    let hover = [
        to_world(cx, cy),
        to_world(cx + 1, cy),
        to_world(cx + 1, cy + 1),
        to_world(cx, cy + 1),
    ];
    for i in 0..4 {
        gizmos.line_2d(hover[i], hover[(i + 1) % 4], HOVER_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilemap_core::Rgb;

    fn cell(layer: LayerId, size: f32) -> RenderCell {
        RenderCell {
            layer,
            x: 0,
            y: 0,
            origin: ScreenPos::new(10.0, 20.0),
            size,
            color: Rgb::new(0x88, 0x88, 0x88),
        }
    }

    #[test]
    fn test_floor_fills_cell() {
        let quads = cell_quads(&cell(LayerId::Floors, 20.0));
        assert_eq!(quads.len(), 1);
        assert_eq!(quads[0].origin, Vec2::new(10.0, 20.0));
        assert_eq!(quads[0].size, 20.0);
    }

    #[test]
    fn test_wall_has_edge_under_fill() {
        let quads = cell_quads(&cell(LayerId::Walls, 20.0));
        assert_eq!(quads.len(), 2);
        assert_eq!(quads[0].color, WALL_EDGE_COLOR);
        assert!(quads[0].z < quads[1].z);
        assert_eq!(quads[1].size, 18.0);

        assert_eq!(cell_quads(&cell(LayerId::Walls, 4.0)).len(), 1);
    }

    #[test]
    fn test_ceiling_is_inset_and_on_top() {
        let quads = cell_quads(&cell(LayerId::Ceilings, 50.0));
        assert_eq!(quads.len(), 1);
        let inset = ceiling_inset(50.0);
        assert!((inset - 6.0).abs() < 1e-4);
        assert!((quads[0].origin - Vec2::new(16.0, 26.0)).length() < 1e-4);
        assert!((quads[0].size - 38.0).abs() < 1e-4);
        assert!(quads[0].z > 1.1);
        assert_eq!(ceiling_inset(6.0), 1.0);
    }

    #[test]
    fn test_grid_line_positions() {
        assert_eq!(grid_line_positions(0, 4, 1), vec![0, 1, 2, 3, 4]);
        assert_eq!(grid_line_positions(3, 10, 2), vec![4, 6, 8, 10]);
        assert_eq!(grid_line_positions(5, 5, 2), Vec::<u32>::new());
        assert_eq!(grid_line_positions(0, 3, 0), vec![0, 1, 2, 3]);
    }
}
