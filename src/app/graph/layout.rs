use std::collections::HashMap;
use std::f32::consts::TAU;

use eframe::egui::{Color32, FontId, Painter, Rect, Vec2, vec2};

use crate::host::GraphNode;

pub const NODE_FONT_SIZE: f32 = 12.0;
pub const NODE_HEIGHT: f32 = 26.0;
const NODE_PADDING_X: f32 = 12.0;
const NODE_MIN_WIDTH: f32 = 40.0;
const SEED_RADIUS_MIN: f32 = 100.0;
const SEED_RADIUS_PER_NODE: f32 = 10.0;

pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32;
}

pub struct ApproxTextMeasure;

impl TextMeasure for ApproxTextMeasure {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * 0.6
    }
}

impl TextMeasure for Painter {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        self.layout_no_wrap(
            text.to_owned(),
            FontId::proportional(font_size),
            Color32::WHITE,
        )
        .size()
        .x
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LayoutNode {
    pub id: String,
    pub pos: Vec2,
    pub vel: Vec2,
    pub width: f32,
}

impl LayoutNode {
    pub fn size(&self) -> Vec2 {
        vec2(self.width, NODE_HEIGHT)
    }

    pub fn world_rect(&self) -> Rect {
        Rect::from_center_size(self.pos.to_pos2(), self.size())
    }
}

fn node_width(node: &GraphNode, measure: &dyn TextMeasure) -> f32 {
    (measure.text_width(node.display_label(), NODE_FONT_SIZE) + NODE_PADDING_X * 2.0)
        .max(NODE_MIN_WIDTH)
}

/// Builds the layout for `nodes`, carrying over position and velocity of every id that
/// already had a record. New ids are seeded on a circle around the origin.
pub fn reconcile_layout(
    previous: Vec<LayoutNode>,
    nodes: &[GraphNode],
    measure: &dyn TextMeasure,
) -> Vec<LayoutNode> {
    let mut prior_nodes = previous
        .into_iter()
        .map(|node| (node.id.clone(), node))
        .collect::<HashMap<_, _>>();

    let count = nodes.len();
    let radius = (count as f32 * SEED_RADIUS_PER_NODE).max(SEED_RADIUS_MIN);

    nodes
        .iter()
        .enumerate()
        .map(|(index, node)| {
            let width = node_width(node, measure);
            if let Some(mut prior) = prior_nodes.remove(&node.id) {
                prior.width = width;
                return prior;
            }

            let angle = TAU * index as f32 / count as f32;
            LayoutNode {
                id: node.id.clone(),
                pos: vec2(angle.cos(), angle.sin()) * radius,
                vel: Vec2::ZERO,
                width,
            }
        })
        .collect()
}

pub fn remeasure_layout(layout: &mut [LayoutNode], nodes: &[GraphNode], measure: &dyn TextMeasure) {
    for (record, node) in layout.iter_mut().zip(nodes) {
        record.width = node_width(node, measure);
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::host::TargetType;

    fn nodes(ids: &[&str]) -> Vec<GraphNode> {
        ids.iter()
            .map(|id| GraphNode::new(*id, TargetType::StaticLibrary))
            .collect()
    }

    #[test]
    fn new_nodes_are_seeded_on_a_circle() {
        let layout = reconcile_layout(Vec::new(), &nodes(&["a", "b", "c", "d"]), &ApproxTextMeasure);

        assert_eq!(layout.len(), 4);
        for node in &layout {
            assert!((node.pos.length() - 100.0).abs() < 1e-3);
            assert_eq!(node.vel, Vec2::ZERO);
        }
        assert!((layout[0].pos - vec2(100.0, 0.0)).length() < 1e-3);
        assert!((layout[1].pos - vec2(0.0, 100.0)).length() < 1e-3);
    }

    #[test]
    fn seed_radius_grows_with_node_count() {
        let ids = (0..25).map(|index| format!("t{index}")).collect::<Vec<_>>();
        let graph_nodes = ids
            .iter()
            .map(|id| GraphNode::new(id.as_str(), TargetType::Executable))
            .collect::<Vec<_>>();
        let layout = reconcile_layout(Vec::new(), &graph_nodes, &ApproxTextMeasure);
        assert!((layout[3].pos.length() - 250.0).abs() < 1e-2);
    }

    #[test]
    fn width_follows_the_label() {
        let mut short = GraphNode::new("x", TargetType::Executable);
        short.label = "x".to_owned();
        let mut long = GraphNode::new("y", TargetType::Executable);
        long.label = "a_rather_long_target_name".to_owned();

        let layout = reconcile_layout(Vec::new(), &[short, long], &ApproxTextMeasure);
        assert_eq!(layout[0].width, 40.0);
        assert!((layout[1].width - (25.0 * 12.0 * 0.6 + 24.0)).abs() < 1e-3);
    }

    #[test]
    fn removed_ids_disappear() {
        let first = reconcile_layout(Vec::new(), &nodes(&["a", "b"]), &ApproxTextMeasure);
        let second = reconcile_layout(first, &nodes(&["b"]), &ApproxTextMeasure);
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].id, "b");
    }

    proptest! {
        #[test]
        fn surviving_ids_keep_position_and_velocity(
            keep in proptest::collection::vec(any::<bool>(), 1..16),
            extra in 0usize..6,
            jiggle in (-500.0f32..500.0, -500.0f32..500.0, -15.0f32..15.0, -15.0f32..15.0),
        ) {
            let first_ids = (0..keep.len()).map(|index| format!("n{index}")).collect::<Vec<_>>();
            let first_nodes = first_ids
                .iter()
                .map(|id| GraphNode::new(id.as_str(), TargetType::SharedLibrary))
                .collect::<Vec<_>>();
            let mut first = reconcile_layout(Vec::new(), &first_nodes, &ApproxTextMeasure);
            for (index, node) in first.iter_mut().enumerate() {
                node.pos += vec2(jiggle.0, jiggle.1) * index as f32;
                node.vel = vec2(jiggle.2, jiggle.3);
            }

            let mut second_nodes = first_nodes
                .iter()
                .zip(&keep)
                .filter(|(_, kept)| **kept)
                .map(|(node, _)| node.clone())
                .collect::<Vec<_>>();
            second_nodes.extend((0..extra).map(|index| GraphNode::new(format!("new{index}"), TargetType::Executable)));
            second_nodes.reverse();

            let before = first.clone();
            let second = reconcile_layout(first, &second_nodes, &ApproxTextMeasure);

            prop_assert_eq!(second.len(), second_nodes.len());
            for (record, node) in second.iter().zip(&second_nodes) {
                prop_assert_eq!(&record.id, &node.id);
                if let Some(old) = before.iter().find(|old| old.id == node.id) {
                    prop_assert_eq!(record.pos, old.pos);
                    prop_assert_eq!(record.vel, old.vel);
                } else {
                    prop_assert_eq!(record.vel, Vec2::ZERO);
                }
            }
        }
    }
}
