mod build;
mod edges;
mod interaction;
mod layout;
mod minimap;
mod view;

use std::collections::{HashMap, HashSet};

use crate::host::{GraphEdge, GraphNode};

pub(in crate::app) use interaction::PointerMode;
pub use layout::{
    ApproxTextMeasure, LayoutNode, NODE_FONT_SIZE, reconcile_layout, remeasure_layout,
};
pub use minimap::minimap_frame;

#[derive(Clone, Debug, Default)]
pub struct GraphModel {
    pub nodes: Vec<GraphNode>,
    /// `(from, to)` as indices into `nodes`.
    pub edges: Vec<(usize, usize)>,
    pub index_by_id: HashMap<String, usize>,
}

impl GraphModel {
    pub fn normalize(raw_nodes: Vec<GraphNode>, raw_edges: &[GraphEdge]) -> Self {
        let mut nodes = Vec::with_capacity(raw_nodes.len());
        let mut index_by_id = HashMap::with_capacity(raw_nodes.len());

        for node in raw_nodes {
            if !node.target_type.is_buildable() || index_by_id.contains_key(&node.id) {
                continue;
            }
            index_by_id.insert(node.id.clone(), nodes.len());
            nodes.push(node);
        }

        let edges = raw_edges
            .iter()
            .filter_map(|edge| {
                let from = index_by_id.get(&edge.from)?;
                let to = index_by_id.get(&edge.to)?;
                Some((*from, *to))
            })
            .collect::<Vec<_>>();

        let dropped = raw_edges.len() - edges.len();
        if dropped > 0 {
            log::debug!("dropped {dropped} edges with unknown endpoints");
        }

        Self {
            nodes,
            edges,
            index_by_id,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn dependencies(&self, index: usize) -> Vec<usize> {
        self.unique_neighbors(index, |&(from, to)| (from == index).then_some(to))
    }

    pub fn consumers(&self, index: usize) -> Vec<usize> {
        self.unique_neighbors(index, |&(from, to)| (to == index).then_some(from))
    }

    fn unique_neighbors(
        &self,
        index: usize,
        pick: impl Fn(&(usize, usize)) -> Option<usize>,
    ) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.edges
            .iter()
            .filter_map(pick)
            .filter(|&other| other != index && seen.insert(other))
            .collect()
    }
}
