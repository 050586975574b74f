//! 视口：屏幕像素 <-> 格子坐标。
//!
//! 约定：`screen = cell * scale + offset`，屏幕原点在左上角，y 向下。

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 每次滚轮缩放的倍率。
pub const ZOOM_STEP: f32 = 1.12;

/// 屏幕（画布）像素坐标。
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPos {
    pub x: f32,
    pub y: f32,
}

impl ScreenPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(feature = "bevy")]
impl From<bevy::math::Vec2> for ScreenPos {
    fn from(v: bevy::math::Vec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

#[cfg(feature = "bevy")]
impl From<ScreenPos> for bevy::math::Vec2 {
    fn from(p: ScreenPos) -> Self {
        bevy::math::Vec2::new(p.x, p.y)
    }
}

/// 格子坐标。可能为负或超出地图（鼠标经常拖出地图之外）。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellPos {
    pub x: i32,
    pub y: i32,
}

impl CellPos {
    /// 落在 `[0, width) x [0, height)` 内时返回无符号坐标。
    pub fn in_bounds(self, width: u32, height: u32) -> Option<(u32, u32)> {
        let x = u32::try_from(self.x).ok()?;
        let y = u32::try_from(self.y).ok()?;
        (x < width && y < height).then_some((x, y))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// 滚轮增量 -> 方向。正数为放大，0 没有方向。
    pub fn from_wheel(delta: f32) -> Option<Self> {
        if delta > 0.0 {
            Some(ZoomDirection::In)
        } else if delta < 0.0 {
            Some(ZoomDirection::Out)
        } else {
            None
        }
    }

    pub fn factor(self) -> f32 {
        match self {
            ZoomDirection::In => ZOOM_STEP,
            ZoomDirection::Out => 1.0 / ZOOM_STEP,
        }
    }
}

/// 可见格子范围，`right` / `bottom` 不包含。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellWindow {
    pub left: u32,
    pub top: u32,
    pub right: u32,
    pub bottom: u32,
}

impl CellWindow {
    pub fn is_empty(&self) -> bool {
        self.left >= self.right || self.top >= self.bottom
    }

    pub fn cell_count(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        (self.right - self.left) as usize * (self.bottom - self.top) as usize
    }

    /// 行优先遍历窗口内所有格子。
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.top..self.bottom).flat_map(move |y| (self.left..self.right).map(move |x| (x, y)))
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    scale: f32,
    offset: ScreenPos,
    min_scale: f32,
    max_scale: f32,
}

impl Viewport {
    /// `min_scale > max_scale` 时两者会被交换。
    pub fn new(scale: f32, min_scale: f32, max_scale: f32) -> Self {
        let (min_scale, max_scale) = if min_scale <= max_scale {
            (min_scale, max_scale)
        } else {
            (max_scale, min_scale)
        };
        Self {
            scale: scale.clamp(min_scale, max_scale),
            offset: ScreenPos::default(),
            min_scale,
            max_scale,
        }
    }

    #[inline]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    #[inline]
    pub fn offset(&self) -> ScreenPos {
        self.offset
    }

    pub fn scale_limits(&self) -> (f32, f32) {
        (self.min_scale, self.max_scale)
    }

    pub fn set_offset(&mut self, offset: ScreenPos) {
        self.offset = offset;
    }

    /// 屏幕像素 -> 连续的格子坐标（未取整）。
    #[inline]
    fn to_cell_space(&self, pos: ScreenPos) -> (f32, f32) {
        (
            (pos.x - self.offset.x) / self.scale,
            (pos.y - self.offset.y) / self.scale,
        )
    }

    pub fn world_to_cell(&self, pos: ScreenPos) -> CellPos {
        let (cx, cy) = self.to_cell_space(pos);
        CellPos {
            x: cx.floor() as i32,
            y: cy.floor() as i32,
        }
    }

    /// 格子左上角在屏幕上的位置。
    pub fn cell_to_canvas(&self, x: i32, y: i32) -> ScreenPos {
        ScreenPos {
            x: x as f32 * self.scale + self.offset.x,
            y: y as f32 * self.scale + self.offset.y,
        }
    }

    /// 以光标为锚点缩放：缩放前后光标下的世界坐标保持不变。
    pub fn zoom(&mut self, cursor: ScreenPos, direction: ZoomDirection) {
        let (wx, wy) = self.to_cell_space(cursor);
        self.scale = (self.scale * direction.factor()).clamp(self.min_scale, self.max_scale);
        self.offset = ScreenPos {
            x: cursor.x - wx * self.scale,
            y: cursor.y - wy * self.scale,
        };
    }

    /// 拖拽平移，直接累加像素增量。
    pub fn pan(&mut self, dx: f32, dy: f32) {
        self.offset.x += dx;
        self.offset.y += dy;
    }

    /// 视口四角反变换到格子坐标，外扩一格后夹紧到地图范围。
    pub fn visible_cell_window(
        &self,
        viewport_width: f32,
        viewport_height: f32,
        map_width: u32,
        map_height: u32,
    ) -> CellWindow {
        let (x0, y0) = self.to_cell_space(ScreenPos::new(0.0, 0.0));
        let (x1, y1) = self.to_cell_space(ScreenPos::new(viewport_width, viewport_height));

        let clamp = |v: f32, max: u32| -> u32 {
            if v.is_nan() || v <= 0.0 {
                0
            } else {
                (v as u64).min(max as u64) as u32
            }
        };

        let right = clamp(x1.ceil() + 1.0, map_width);
        let bottom = clamp(y1.ceil() + 1.0, map_height);
        let left = clamp(x0.floor() - 1.0, map_width).min(right);
        let top = clamp(y0.floor() - 1.0, map_height).min(bottom);

        CellWindow {
            left,
            top,
            right,
            bottom,
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(20.0, 6.0, 120.0)
    }
}

/// 网格线间隔（格数）。缩得很小时稀疏绘制，保证线间距不低于 8 像素。
pub fn grid_line_step(scale: f32) -> u32 {
    if scale >= 10.0 || scale <= 0.0 {
        return 1;
    }
    ((8.0 / scale).ceil() as u32).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_to_cell_floors() {
        let mut vp = Viewport::new(20.0, 6.0, 120.0);
        assert_eq!(vp.world_to_cell(ScreenPos::new(0.0, 0.0)), CellPos { x: 0, y: 0 });
        assert_eq!(vp.world_to_cell(ScreenPos::new(19.9, 39.9)), CellPos { x: 0, y: 1 });
        assert_eq!(vp.world_to_cell(ScreenPos::new(-0.1, 20.0)), CellPos { x: -1, y: 1 });

        vp.pan(10.0, -5.0);
        assert_eq!(vp.world_to_cell(ScreenPos::new(9.0, 0.0)), CellPos { x: -1, y: 0 });
        assert_eq!(vp.world_to_cell(ScreenPos::new(30.0, 15.0)), CellPos { x: 1, y: 1 });
    }

    #[test]
    fn test_cell_to_canvas_inverts_world_to_cell() {
        let mut vp = Viewport::new(16.0, 6.0, 120.0);
        vp.pan(33.0, -12.0);
        for (x, y) in [(0, 0), (3, 7), (-2, 5)] {
            let corner = vp.cell_to_canvas(x, y);
            // 格子中心反算回同一个格子
            let center = ScreenPos::new(corner.x + 8.0, corner.y + 8.0);
            assert_eq!(vp.world_to_cell(center), CellPos { x, y });
        }
    }

    #[test]
    fn test_zoom_keeps_cell_under_cursor() {
        let cursors = [
            ScreenPos::new(123.4, 56.7),
            ScreenPos::new(5.5, 401.3),
            ScreenPos::new(777.7, 333.3),
        ];
        for cursor in cursors {
            for direction in [ZoomDirection::In, ZoomDirection::Out] {
                let mut vp = Viewport::new(20.0, 6.0, 120.0);
                vp.pan(-41.0, 17.0);
                for _ in 0..8 {
                    let before = vp.world_to_cell(cursor);
                    vp.zoom(cursor, direction);
                    let after = vp.world_to_cell(cursor);
                    assert!((before.x - after.x).abs() <= 1);
                    assert!((before.y - after.y).abs() <= 1);
                }
            }
        }
    }

    #[test]
    fn test_zoom_anchor_is_exact_in_continuous_space() {
        let mut vp = Viewport::new(20.0, 6.0, 120.0);
        let cursor = ScreenPos::new(310.0, 95.0);
        let (wx, wy) = vp.to_cell_space(cursor);
        vp.zoom(cursor, ZoomDirection::In);
        let (ax, ay) = vp.to_cell_space(cursor);
        assert!((wx - ax).abs() < 1e-3);
        assert!((wy - ay).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_clamps_scale() {
        let mut vp = Viewport::new(20.0, 6.0, 120.0);
        for _ in 0..100 {
            vp.zoom(ScreenPos::new(50.0, 50.0), ZoomDirection::In);
        }
        assert_eq!(vp.scale(), 120.0);
        for _ in 0..100 {
            vp.zoom(ScreenPos::new(50.0, 50.0), ZoomDirection::Out);
        }
        assert_eq!(vp.scale(), 6.0);
    }

    #[test]
    fn test_zoom_step_factor() {
        let mut vp = Viewport::new(20.0, 6.0, 120.0);
        vp.zoom(ScreenPos::new(0.0, 0.0), ZoomDirection::In);
        assert!((vp.scale() - 22.4).abs() < 1e-4);
        // 以原点为锚点时 offset 不变
        assert_eq!(vp.offset(), ScreenPos::new(0.0, 0.0));
    }

    #[test]
    fn test_new_clamps_initial_scale() {
        assert_eq!(Viewport::new(500.0, 6.0, 120.0).scale(), 120.0);
        assert_eq!(Viewport::new(20.0, 120.0, 6.0).scale_limits(), (6.0, 120.0));
    }

    #[test]
    fn test_visible_window_expands_and_clamps() {
        let mut vp = Viewport::new(10.0, 6.0, 120.0);
        let win = vp.visible_cell_window(100.0, 50.0, 64, 64);
        assert_eq!(
            win,
            CellWindow {
                left: 0,
                top: 0,
                right: 11,
                bottom: 6
            }
        );

        vp.pan(-205.0, -100.0);
        let win = vp.visible_cell_window(100.0, 50.0, 64, 64);
        assert_eq!(win.left, 19);
        assert_eq!(win.top, 9);
        assert_eq!(win.right, 32);
        assert_eq!(win.bottom, 16);
    }

    #[test]
    fn test_visible_window_clamps_to_small_map() {
        let vp = Viewport::new(10.0, 6.0, 120.0);
        let win = vp.visible_cell_window(800.0, 600.0, 4, 3);
        assert_eq!(
            win,
            CellWindow {
                left: 0,
                top: 0,
                right: 4,
                bottom: 3
            }
        );
        assert_eq!(win.cell_count(), 12);
        assert_eq!(win.cells().count(), 12);
    }

    #[test]
    fn test_visible_window_empty_when_map_off_screen() {
        let mut vp = Viewport::new(10.0, 6.0, 120.0);
        vp.pan(5000.0, 0.0);
        let win = vp.visible_cell_window(100.0, 100.0, 8, 8);
        assert!(win.is_empty());
        assert_eq!(win.cells().count(), 0);

        let mut vp = Viewport::new(10.0, 6.0, 120.0);
        vp.pan(-5000.0, -5000.0);
        assert!(vp.visible_cell_window(100.0, 100.0, 8, 8).is_empty());
    }

    #[test]
    fn test_grid_line_step() {
        assert_eq!(grid_line_step(20.0), 1);
        assert_eq!(grid_line_step(10.0), 1);
        assert_eq!(grid_line_step(8.0), 1);
        assert_eq!(grid_line_step(6.0), 2);
        assert_eq!(grid_line_step(2.5), 4);
    }

    #[test]
    fn test_cell_in_bounds() {
        assert_eq!(CellPos { x: 2, y: 3 }.in_bounds(4, 4), Some((2, 3)));
        assert_eq!(CellPos { x: -1, y: 0 }.in_bounds(4, 4), None);
        assert_eq!(CellPos { x: 4, y: 0 }.in_bounds(4, 4), None);
    }
}
