use eframe::egui::{Color32, Mesh, Painter, Pos2, Shape, Stroke, Vec2};

use crate::host::{EdgeDirection, EdgeStyle};

use super::super::render_utils::blend_color;

const CHEVRON_COUNT: usize = 3;
const TIP_WIDTH_RATIO: f32 = 0.1;

#[derive(Clone, Copy, Debug)]
pub(super) struct EdgeStroke {
    pub(super) base: Pos2,
    pub(super) tip: Pos2,
    pub(super) base_color: Color32,
    pub(super) tip_color: Color32,
    pub(super) width: f32,
}

pub(super) fn edge_endpoints<T>(from: T, to: T, direction: EdgeDirection) -> (T, T) {
    match direction {
        EdgeDirection::Dependency => (from, to),
        EdgeDirection::Inverse => (to, from),
    }
}

fn unit_normal(base: Pos2, tip: Pos2) -> Option<(Vec2, Vec2)> {
    let along = tip - base;
    let length = along.length();
    if length < 1e-3 {
        return None;
    }
    let dir = along / length;
    Some((dir, dir.rot90()))
}

/// Corners `[base_left, base_right, tip_right, tip_left]` of a wedge `width` wide at the base.
pub(super) fn tapered_quad(base: Pos2, tip: Pos2, width: f32) -> Option<[Pos2; 4]> {
    let (_, normal) = unit_normal(base, tip)?;
    let base_half = normal * (width * 0.5);
    let tip_half = normal * (width * TIP_WIDTH_RATIO * 0.5).max(0.25);
    Some([
        base - base_half,
        base + base_half,
        tip + tip_half,
        tip - tip_half,
    ])
}

pub(super) fn chevron_strokes(base: Pos2, tip: Pos2, size: f32) -> Vec<[Pos2; 3]> {
    let Some((dir, normal)) = unit_normal(base, tip) else {
        return Vec::new();
    };
    let mid = base + (tip - base) * 0.5;
    let spacing = size * 0.9;
    let first = -(CHEVRON_COUNT as f32 - 1.0) * 0.5;

    (0..CHEVRON_COUNT)
        .map(|slot| {
            let apex = mid + dir * ((first + slot as f32) * spacing + size * 0.5);
            let back = apex - dir * size;
            [back + normal * size * 0.6, apex, back - normal * size * 0.6]
        })
        .collect()
}

fn push_gradient_quad(mesh: &mut Mesh, corners: [Pos2; 4], base_color: Color32, tip_color: Color32) {
    let first = mesh.vertices.len() as u32;
    mesh.colored_vertex(corners[0], base_color);
    mesh.colored_vertex(corners[1], base_color);
    mesh.colored_vertex(corners[2], tip_color);
    mesh.colored_vertex(corners[3], tip_color);
    mesh.add_triangle(first, first + 1, first + 2);
    mesh.add_triangle(first, first + 2, first + 3);
}

fn line_quad(base: Pos2, tip: Pos2, width: f32) -> Option<[Pos2; 4]> {
    let (_, normal) = unit_normal(base, tip)?;
    let half = normal * (width * 0.5);
    Some([base - half, base + half, tip + half, tip - half])
}

pub(super) fn paint_edge(painter: &Painter, style: EdgeStyle, edge: &EdgeStroke) {
    let mut mesh = Mesh::default();
    match style {
        EdgeStyle::Tapered => {
            if let Some(corners) = tapered_quad(edge.base, edge.tip, edge.width) {
                push_gradient_quad(&mut mesh, corners, edge.base_color, edge.tip_color);
            }
        }
        EdgeStyle::Chevrons => {
            let line_width = (edge.width * 0.25).max(1.0);
            if let Some(corners) = line_quad(edge.base, edge.tip, line_width) {
                push_gradient_quad(&mut mesh, corners, edge.base_color, edge.tip_color);
            }
            let size = (edge.width * 1.2).max(4.0);
            for (slot, chevron) in chevron_strokes(edge.base, edge.tip, size)
                .into_iter()
                .enumerate()
            {
                let t = 0.4 + slot as f32 * 0.1;
                let color = blend_color(edge.base_color, edge.tip_color, t);
                painter.add(Shape::line(chevron.to_vec(), Stroke::new(line_width, color)));
            }
        }
        EdgeStyle::Line => {
            let line_width = (edge.width * 0.25).max(1.0);
            if let Some(corners) = line_quad(edge.base, edge.tip, line_width) {
                push_gradient_quad(&mut mesh, corners, edge.base_color, edge.tip_color);
            }
        }
    }

    if !mesh.is_empty() {
        painter.add(Shape::mesh(mesh));
    }
}
