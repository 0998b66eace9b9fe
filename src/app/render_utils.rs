use std::collections::BTreeMap;

use eframe::egui::{Color32, Painter, Pos2, Rect, Stroke};

use crate::host::{GraphNode, TargetType};

use super::camera::Camera;

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const GRID_CELL: f32 = 50.0;
const GRID_MIN_SCREEN_CELL: f32 = 8.0;

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn darken(color: Color32, amount: f32) -> Color32 {
    blend_color(color, Color32::from_rgba_unmultiplied(0, 0, 0, color.a()), amount)
}

fn luminance(color: Color32) -> f32 {
    (0.299 * color.r() as f32 + 0.587 * color.g() as f32 + 0.114 * color.b() as f32) / 255.0
}

pub(super) fn contrast_text_color(fill: Color32) -> Color32 {
    if luminance(fill) > 0.5 {
        Color32::from_gray(20)
    } else {
        Color32::from_gray(240)
    }
}

pub(super) fn hex_string(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

#[derive(Clone, Debug, Default, PartialEq)]
pub(super) struct CategoryPalette {
    overrides: BTreeMap<TargetType, Color32>,
}

impl CategoryPalette {
    pub(super) fn default_color(target_type: TargetType) -> Color32 {
        match target_type {
            TargetType::Executable => Color32::from_rgb(79, 163, 224),
            TargetType::StaticLibrary => Color32::from_rgb(111, 191, 115),
            TargetType::SharedLibrary => Color32::from_rgb(236, 168, 76),
            TargetType::ModuleLibrary => Color32::from_rgb(193, 132, 222),
            TargetType::ObjectLibrary => Color32::from_rgb(224, 120, 120),
            TargetType::InterfaceLibrary => Color32::from_rgb(142, 202, 196),
            TargetType::Utility => Color32::from_rgb(150, 150, 150),
            TargetType::Unknown => Color32::from_rgb(170, 176, 186),
        }
    }

    pub(super) fn apply(&mut self, colors: &BTreeMap<TargetType, String>) {
        for (target_type, hex) in colors {
            match Color32::from_hex(hex) {
                Ok(color) => {
                    self.overrides.insert(*target_type, color);
                }
                Err(error) => log::debug!("ignoring color {hex:?} for {target_type}: {error:?}"),
            }
        }
    }

    pub(super) fn set(&mut self, target_type: TargetType, color: Color32) {
        self.overrides.insert(target_type, color);
    }

    pub(super) fn category_color(&self, target_type: TargetType) -> Color32 {
        self.overrides
            .get(&target_type)
            .copied()
            .unwrap_or_else(|| Self::default_color(target_type))
    }

    pub(super) fn color_for(&self, node: &GraphNode) -> Color32 {
        if let Some(color) = self.overrides.get(&node.target_type) {
            return *color;
        }
        node.color
            .as_deref()
            .and_then(|hex| Color32::from_hex(hex).ok())
            .unwrap_or_else(|| Self::default_color(node.target_type))
    }

    pub(super) fn to_hex_map(&self) -> BTreeMap<TargetType, String> {
        self.overrides
            .iter()
            .map(|(target_type, color)| (*target_type, hex_string(*color)))
            .collect()
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect, camera: &Camera) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = GRID_CELL * camera.zoom;
    let origin = rect.min + camera.offset;
    if step >= GRID_MIN_SCREEN_CELL {
        let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));
        for x in grid_lines(origin.x, step, rect.left(), rect.right()) {
            painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        }
        for y in grid_lines(origin.y, step, rect.top(), rect.bottom()) {
            painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        }
    }

    let axis = Stroke::new(1.5, Color32::from_rgba_unmultiplied(110, 130, 160, 120));
    if (rect.left()..=rect.right()).contains(&origin.x) {
        painter.line_segment(
            [Pos2::new(origin.x, rect.top()), Pos2::new(origin.x, rect.bottom())],
            axis,
        );
    }
    if (rect.top()..=rect.bottom()).contains(&origin.y) {
        painter.line_segment(
            [Pos2::new(rect.left(), origin.y), Pos2::new(rect.right(), origin.y)],
            axis,
        );
    }
}

pub(super) fn grid_lines(origin: f32, step: f32, min: f32, max: f32) -> impl Iterator<Item = f32> {
    let first = min + (origin - min).rem_euclid(step);
    (0..)
        .map(move |line| first + line as f32 * step)
        .take_while(move |position| *position <= max)
}

pub(super) fn edge_visible(rect: Rect, start: Pos2, end: Pos2, padding: f32) -> bool {
    let min_x = start.x.min(end.x) - padding;
    let max_x = start.x.max(end.x) + padding;
    let min_y = start.y.min(end.y) - padding;
    let max_y = start.y.max(end.y) + padding;

    if max_x < rect.left() || min_x > rect.right() || max_y < rect.top() || min_y > rect.bottom() {
        return false;
    }

    if rect.contains(start) || rect.contains(end) {
        return true;
    }

    let top_left = rect.left_top();
    let top_right = rect.right_top();
    let bottom_left = rect.left_bottom();
    let bottom_right = rect.right_bottom();

    segments_intersect(start, end, top_left, top_right)
        || segments_intersect(start, end, top_right, bottom_right)
        || segments_intersect(start, end, bottom_right, bottom_left)
        || segments_intersect(start, end, bottom_left, top_left)
}

fn segments_intersect(a1: Pos2, a2: Pos2, b1: Pos2, b2: Pos2) -> bool {
    fn cross(o: Pos2, a: Pos2, b: Pos2) -> f32 {
        let oa = a - o;
        let ob = b - o;
        (oa.x * ob.y) - (oa.y * ob.x)
    }

    let a_min_x = a1.x.min(a2.x);
    let a_max_x = a1.x.max(a2.x);
    let a_min_y = a1.y.min(a2.y);
    let a_max_y = a1.y.max(a2.y);
    let b_min_x = b1.x.min(b2.x);
    let b_max_x = b1.x.max(b2.x);
    let b_min_y = b1.y.min(b2.y);
    let b_max_y = b1.y.max(b2.y);

    if a_max_x < b_min_x || b_max_x < a_min_x || a_max_y < b_min_y || b_max_y < a_min_y {
        return false;
    }

    let c1 = cross(a1, a2, b1);
    let c2 = cross(a1, a2, b2);
    let c3 = cross(b1, b2, a1);
    let c4 = cross(b1, b2, a2);

    (c1 <= 0.0 && c2 >= 0.0 || c1 >= 0.0 && c2 <= 0.0)
        && (c3 <= 0.0 && c4 >= 0.0 || c3 >= 0.0 && c4 <= 0.0)
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    #[test]
    fn text_contrasts_with_fill() {
        assert_eq!(contrast_text_color(Color32::WHITE), Color32::from_gray(20));
        assert_eq!(contrast_text_color(Color32::from_rgb(20, 30, 90)), Color32::from_gray(240));
    }

    #[test]
    fn darken_keeps_alpha_and_reduces_channels() {
        let border = darken(Color32::from_rgb(200, 100, 50), 0.5);
        assert_eq!((border.r(), border.g(), border.b(), border.a()), (100, 50, 25, 255));
    }

    #[test]
    fn palette_prefers_overrides_then_node_color() {
        let mut palette = CategoryPalette::default();
        let mut node = GraphNode::new("app", TargetType::Executable);
        assert_eq!(palette.color_for(&node), CategoryPalette::default_color(TargetType::Executable));

        node.color = Some("#102030".to_owned());
        assert_eq!(palette.color_for(&node), Color32::from_rgb(0x10, 0x20, 0x30));

        palette.apply(&BTreeMap::from([
            (TargetType::Executable, "#ff0000".to_owned()),
            (TargetType::SharedLibrary, "not a color".to_owned()),
        ]));
        assert_eq!(palette.color_for(&node), Color32::from_rgb(255, 0, 0));
        assert_eq!(
            palette.to_hex_map(),
            BTreeMap::from([(TargetType::Executable, "#ff0000".to_owned())])
        );
    }

    #[test]
    fn grid_lines_follow_the_origin() {
        let lines = grid_lines(130.0, 50.0, 0.0, 200.0).collect::<Vec<_>>();
        assert_eq!(lines, [30.0, 80.0, 130.0, 180.0]);
    }

    #[test]
    fn edges_crossing_the_view_are_kept() {
        let rect = Rect::from_min_max(pos2(0.0, 0.0), pos2(100.0, 100.0));
        assert!(edge_visible(rect, pos2(-50.0, 50.0), pos2(150.0, 50.0), 0.0));
        assert!(!edge_visible(rect, pos2(-50.0, -10.0), pos2(-10.0, -50.0), 0.0));
    }
}
