use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke, StrokeKind, Vec2, pos2, vec2};

use super::super::GraphView;
use super::super::render_utils::dim_color;

pub const MINIMAP_SIZE: Vec2 = vec2(150.0, 100.0);
const MINIMAP_MARGIN: f32 = 10.0;
const MINIMAP_PADDING: f32 = 0.05;

pub fn minimap_frame(viewport: Vec2) -> Rect {
    let max = pos2(viewport.x - MINIMAP_MARGIN, viewport.y - MINIMAP_MARGIN);
    Rect::from_min_max(max - MINIMAP_SIZE, max)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimapTransform {
    frame: Rect,
    world_center: Pos2,
    scale: f32,
}

impl MinimapTransform {
    pub fn new(frame: Rect, world_bounds: Rect) -> Self {
        let padded = world_bounds.expand2(world_bounds.size() * MINIMAP_PADDING);
        let size = padded.size().max(vec2(1.0, 1.0));
        let scale = (frame.width() / size.x).min(frame.height() / size.y);
        Self {
            frame,
            world_center: padded.center(),
            scale,
        }
    }

    pub fn frame(&self) -> Rect {
        self.frame
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn to_minimap(&self, world: Vec2) -> Pos2 {
        self.frame.center() + (world.to_pos2() - self.world_center) * self.scale
    }

    pub fn to_world(&self, point: Pos2) -> Vec2 {
        self.world_center.to_vec2() + (point - self.frame.center()) / self.scale
    }
}

impl GraphView {
    pub(in crate::app) fn minimap_transform(&self) -> Option<MinimapTransform> {
        if !self.settings.minimap {
            return None;
        }
        let bounds = self.visible_bounds()?;
        Some(MinimapTransform::new(minimap_frame(self.viewport()), bounds))
    }

    /// `origin` is the canvas' top-left corner in absolute screen space.
    pub(in crate::app) fn paint_minimap(&self, painter: &Painter, origin: Vec2) {
        let Some(transform) = self.minimap_transform() else {
            return;
        };
        let frame = transform.frame().translate(origin);
        painter.rect_filled(frame, 3.0, Color32::from_rgba_unmultiplied(12, 15, 20, 220));

        let place = |world: Vec2| transform.to_minimap(world) + origin;
        let edge_stroke = Stroke::new(0.6, Color32::from_rgba_unmultiplied(150, 160, 175, 90));
        for &(from, to) in &self.model.edges {
            if self.visibility.is_filtered(from) || self.visibility.is_filtered(to) {
                continue;
            }
            painter.line_segment(
                [place(self.layout[from].pos), place(self.layout[to].pos)],
                edge_stroke,
            );
        }

        for (index, (node, record)) in self.model.nodes.iter().zip(&self.layout).enumerate() {
            if self.visibility.is_filtered(index) {
                continue;
            }
            let mut color = self.palette.color_for(node);
            if self.visibility.is_dimmed(index) {
                color = dim_color(color, 0.3);
            }
            let side = (record.width * transform.scale()).clamp(1.5, 8.0);
            painter.rect_filled(
                Rect::from_center_size(place(record.pos), vec2(side, side)),
                0.0,
                color,
            );
        }

        let visible = self.camera.visible_world_rect(self.viewport());
        let viewport_rect = Rect::from_min_max(
            place(visible.min.to_vec2()),
            place(visible.max.to_vec2()),
        )
        .intersect(frame);
        if viewport_rect.is_positive() {
            painter.rect_stroke(
                viewport_rect,
                0.0,
                Stroke::new(1.0, Color32::from_gray(230)),
                StrokeKind::Inside,
            );
        }
        painter.rect_stroke(
            frame,
            3.0,
            Stroke::new(1.0, Color32::from_rgb(70, 80, 95)),
            StrokeKind::Outside,
        );
    }

    pub(in crate::app) fn recenter_from_minimap(&mut self, point: Pos2) {
        let Some(transform) = self.minimap_transform() else {
            return;
        };
        let world = transform.to_world(point);
        let viewport = self.viewport();
        self.camera.center_on(world, viewport);
    }
}
