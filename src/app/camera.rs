use eframe::egui::{Pos2, Rect, Vec2, pos2};

pub const ZOOM_MIN: f32 = 0.05;
pub const ZOOM_MAX: f32 = 10.0;
pub const WHEEL_ZOOM_STEP: f32 = 1.1;
pub const MINIMAP_ZOOM_STEP: f32 = 1.15;
const FIT_ZOOM_MAX: f32 = 2.0;

/// Affine world → canvas mapping: `screen = offset + world * zoom`.
///
/// Screen coordinates are relative to the canvas' top-left corner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    pub offset: Vec2,
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Camera {
    pub fn world_to_screen(&self, world: Vec2) -> Pos2 {
        (self.offset + world * self.zoom).to_pos2()
    }

    pub fn screen_to_world(&self, screen: Pos2) -> Vec2 {
        (screen.to_vec2() - self.offset) / self.zoom
    }

    pub fn world_rect_to_screen(&self, world: Rect) -> Rect {
        Rect::from_min_max(
            self.world_to_screen(world.min.to_vec2()),
            self.world_to_screen(world.max.to_vec2()),
        )
    }

    pub fn zoom_at(&mut self, anchor: Pos2, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let world = self.screen_to_world(anchor);
        self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);
        self.offset = anchor.to_vec2() - world * self.zoom;
    }

    pub fn fit(&mut self, bounds: Rect, viewport: Vec2) {
        if viewport.x <= 0.0 || viewport.y <= 0.0 {
            return;
        }
        let size = bounds.size();
        let mut zoom = FIT_ZOOM_MAX;
        if size.x > 0.0 {
            zoom = zoom.min(viewport.x / size.x);
        }
        if size.y > 0.0 {
            zoom = zoom.min(viewport.y / size.y);
        }
        self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        self.center_on(bounds.center().to_vec2(), viewport);
    }

    pub fn center_on(&mut self, world: Vec2, viewport: Vec2) {
        self.offset = viewport * 0.5 - world * self.zoom;
    }

    pub fn shift_origin(&mut self, shift: Vec2) {
        self.offset += shift * self.zoom;
    }

    pub fn visible_world_rect(&self, viewport: Vec2) -> Rect {
        Rect::from_min_max(
            self.screen_to_world(Pos2::ZERO).to_pos2(),
            self.screen_to_world(pos2(viewport.x, viewport.y)).to_pos2(),
        )
    }
}
