use eframe::egui::{
    Align2, Color32, CursorIcon, FontId, Key, Painter, PointerButton, Rect, Response, Sense,
    Stroke, StrokeKind, Ui, Vec2,
};

use super::super::GraphView;
use super::super::render_utils::{
    contrast_text_color, darken, dim_color, draw_background, edge_visible,
};
use super::edges::{EdgeStroke, edge_endpoints, paint_edge};
use super::{NODE_FONT_SIZE, PointerMode, remeasure_layout};

/// egui reports wheel motion in points; one mouse notch is roughly this many.
const SCROLL_POINTS_PER_NOTCH: f32 = 40.0;
const MIN_LABEL_FONT: f32 = 3.0;
const DIM_FACTOR: f32 = 0.3;

impl GraphView {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return;
        }
        self.canvas = rect;
        let painter = ui.painter_at(rect);

        if self.measure_dirty {
            remeasure_layout(&mut self.layout, &self.model.nodes, &painter);
            self.measure_dirty = false;
        }
        if self.pending_fit {
            self.pending_fit = false;
            self.fit_to_view();
        }

        self.handle_canvas_input(ui, rect, &response);
        self.handle_keyboard(ui);
        self.on_frame();

        draw_background(&painter, rect, &self.camera);
        if self.model.is_empty() {
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No build targets to display",
                FontId::proportional(16.0),
                Color32::from_gray(160),
            );
            return;
        }

        let origin = rect.min.to_vec2();
        self.paint_edges(&painter, rect, origin);
        self.paint_nodes(&painter, rect, origin);
        self.paint_minimap(&painter, origin);
    }

    fn handle_canvas_input(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        let (pressed, released, double, pointer, scroll) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.button_double_clicked(PointerButton::Primary),
                input.pointer.interact_pos(),
                input.raw_scroll_delta.y,
            )
        });
        let Some(pos) = pointer.map(|pos| pos - rect.min.to_vec2()) else {
            return;
        };

        if pressed && response.hovered() {
            self.pointer_down(pos);
        } else if !self.pointer.is_idle() {
            self.pointer_move(pos);
        }
        if released && !self.pointer.is_idle() {
            self.pointer_up(pos);
        }
        if double && response.hovered() {
            self.double_click(pos);
        }
        if scroll != 0.0 && response.hovered() {
            self.wheel(pos, scroll / SCROLL_POINTS_PER_NOTCH);
        }

        let cursor = match &self.pointer {
            PointerMode::Panning { .. } | PointerMode::DraggingNode { .. } => CursorIcon::Grabbing,
            PointerMode::DraggingMinimap => CursorIcon::Crosshair,
            PointerMode::Idle if response.hovered() && self.hit_test(pos).is_some() => {
                CursorIcon::PointingHand
            }
            PointerMode::Idle => return,
        };
        ui.ctx().set_cursor_icon(cursor);
    }

    fn handle_keyboard(&mut self, ui: &Ui) {
        if ui.ctx().wants_keyboard_input() || !ui.input(|input| input.key_pressed(Key::Escape)) {
            return;
        }
        if self.selected.is_some() {
            self.deselect();
        } else {
            self.step_back();
        }
    }

    fn paint_edges(&self, painter: &Painter, rect: Rect, origin: Vec2) {
        let zoom = self.camera.zoom;
        let width = (self.settings.tapered_width * zoom).max(1.0);
        let selected = self.selected.as_deref().and_then(|id| self.model.index_of(id));
        let mut highlighted = Vec::new();

        for &(from, to) in &self.model.edges {
            if self.visibility.is_filtered(from) || self.visibility.is_filtered(to) {
                continue;
            }
            let (base, tip) = edge_endpoints(from, to, self.settings.edge_direction);
            if selected.is_some_and(|index| index == from || index == to) {
                highlighted.push((base, tip));
                continue;
            }

            let base_pos = self.camera.world_to_screen(self.layout[base].pos) + origin;
            let tip_pos = self.camera.world_to_screen(self.layout[tip].pos) + origin;
            if !edge_visible(rect, base_pos, tip_pos, width) {
                continue;
            }

            let alpha = if self.visibility.is_dimmed(from) || self.visibility.is_dimmed(to) {
                35
            } else {
                130
            };
            let color = Color32::from_rgba_unmultiplied(140, 150, 165, alpha);
            paint_edge(
                painter,
                self.settings.edge_style,
                &EdgeStroke {
                    base: base_pos,
                    tip: tip_pos,
                    base_color: color,
                    tip_color: color,
                    width,
                },
            );
        }

        for (base, tip) in highlighted {
            let base_pos = self.camera.world_to_screen(self.layout[base].pos) + origin;
            let tip_pos = self.camera.world_to_screen(self.layout[tip].pos) + origin;
            let mut base_color = self.palette.color_for(&self.model.nodes[base]);
            let mut tip_color = Color32::WHITE;
            if self.visibility.is_dimmed(base) || self.visibility.is_dimmed(tip) {
                base_color = dim_color(base_color, 0.6);
                tip_color = dim_color(tip_color, 0.6);
            }
            paint_edge(
                painter,
                self.settings.edge_style,
                &EdgeStroke {
                    base: base_pos,
                    tip: tip_pos,
                    base_color,
                    tip_color,
                    width: width * 1.5,
                },
            );
        }
    }

    fn paint_nodes(&self, painter: &Painter, rect: Rect, origin: Vec2) {
        let zoom = self.camera.zoom;
        let font_size = NODE_FONT_SIZE * zoom;
        let corner = 4.0 * zoom;

        for (index, (node, record)) in self.model.nodes.iter().zip(&self.layout).enumerate() {
            if self.visibility.is_filtered(index) {
                continue;
            }
            let screen = self
                .camera
                .world_rect_to_screen(record.world_rect())
                .translate(origin);
            if !rect.intersects(screen.expand(8.0)) {
                continue;
            }

            let dimmed = self.visibility.is_dimmed(index);
            let base_fill = self.palette.color_for(node);
            let fill = if dimmed {
                dim_color(base_fill, DIM_FACTOR)
            } else {
                base_fill
            };

            if self.focus.is_root(&node.id) {
                for ring in 1..=3 {
                    let spread = ring as f32 * 3.0;
                    let alpha = 150 - ring * 40;
                    painter.rect_stroke(
                        screen.expand(spread),
                        corner + spread,
                        Stroke::new(3.0, Color32::from_rgba_unmultiplied(245, 200, 70, alpha)),
                        StrokeKind::Outside,
                    );
                }
            }

            painter.rect_filled(screen, corner, fill);
            painter.rect_stroke(
                screen,
                corner,
                Stroke::new(1.0, darken(fill, 0.4)),
                StrokeKind::Inside,
            );
            if self.selected.as_deref() == Some(node.id.as_str()) {
                painter.rect_stroke(
                    screen.expand(2.0),
                    corner + 2.0,
                    Stroke::new(2.0, Color32::WHITE),
                    StrokeKind::Outside,
                );
            }

            if font_size >= MIN_LABEL_FONT {
                let text_color = contrast_text_color(base_fill);
                painter.text(
                    screen.center(),
                    Align2::CENTER_CENTER,
                    node.display_label(),
                    FontId::proportional(font_size),
                    if dimmed {
                        dim_color(text_color, DIM_FACTOR)
                    } else {
                        text_color
                    },
                );
            }
        }
    }

    pub(in crate::app) fn visible_counts(&self) -> (usize, usize) {
        let edges = self
            .model
            .edges
            .iter()
            .filter(|(from, to)| {
                !self.visibility.is_filtered(*from) && !self.visibility.is_filtered(*to)
            })
            .count();
        (self.visibility.visible_count(), edges)
    }
}
