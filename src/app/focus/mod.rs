use std::collections::HashSet;

mod collect;

use self::collect::collect_reachable;
use super::GraphView;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Breadcrumb {
    pub id: String,
    pub label: String,
}

#[derive(Clone, Debug, Default)]
pub struct FocusState {
    pub root: Option<String>,
    pub history: Vec<Breadcrumb>,
    pub reachable: HashSet<String>,
}

impl FocusState {
    pub fn is_active(&self) -> bool {
        self.root.is_some()
    }

    pub fn is_root(&self, id: &str) -> bool {
        self.root.as_deref() == Some(id)
    }

    fn clear(&mut self) {
        self.root = None;
        self.history.clear();
        self.reachable.clear();
    }
}

impl GraphView {
    pub(in crate::app) fn focus_on_node(&mut self, id: &str) {
        let Some(index) = self.model.index_of(id) else {
            log::debug!("focus requested for unknown target {id}");
            return;
        };

        self.focus.reachable = collect_reachable(&self.model, index, self.settings.edge_direction);
        self.focus.root = Some(id.to_owned());
        if self.focus.history.last().map(|crumb| crumb.id.as_str()) != Some(id) {
            self.focus.history.push(Breadcrumb {
                id: id.to_owned(),
                label: self.model.nodes[index].display_label().to_owned(),
            });
        }
        log::info!(
            "focused on {id}: {} reachable targets, depth {}",
            self.focus.reachable.len(),
            self.focus.history.len()
        );

        self.shift_origin_to(index);
        self.refresh_visibility();
        self.restart_simulation();
    }

    /// `None` leaves focus mode; `Some(i)` pops history back to entry `i`.
    pub(in crate::app) fn navigate_breadcrumb(&mut self, index: Option<usize>) {
        let Some(index) = index else {
            self.exit_focus();
            return;
        };
        if index >= self.focus.history.len() {
            return;
        }

        self.focus.history.truncate(index + 1);
        let id = self.focus.history[index].id.clone();
        let Some(node_index) = self.model.index_of(&id) else {
            self.exit_focus();
            return;
        };

        self.focus.reachable =
            collect_reachable(&self.model, node_index, self.settings.edge_direction);
        self.focus.root = Some(id);
        self.shift_origin_to(node_index);
        self.refresh_visibility();
        self.restart_simulation();
    }

    pub(in crate::app) fn exit_focus(&mut self) {
        if !self.focus.is_active() && self.focus.history.is_empty() {
            return;
        }
        self.focus.clear();
        log::info!("left focus mode");
        self.refresh_visibility();
        self.restart_simulation();
    }

    pub(in crate::app) fn step_back(&mut self) {
        match self.focus.history.len() {
            0 => {}
            1 => self.exit_focus(),
            depth => self.navigate_breadcrumb(Some(depth - 2)),
        }
    }

    pub(in crate::app) fn recenter_focus_root(&mut self) {
        let Some(index) = self.focus.root.as_deref().and_then(|id| self.model.index_of(id)) else {
            return;
        };
        self.shift_origin_to(index);
        self.restart_simulation();
    }

    pub(in crate::app) fn revalidate_focus(&mut self) {
        let Some(root) = self.focus.root.clone() else {
            return;
        };
        match self.model.index_of(&root) {
            Some(index) => {
                self.focus.reachable =
                    collect_reachable(&self.model, index, self.settings.edge_direction);
                self.focus
                    .history
                    .retain(|crumb| self.model.index_by_id.contains_key(&crumb.id));
            }
            None => {
                log::info!("focused target {root} disappeared, leaving focus mode");
                self.focus.clear();
            }
        }
    }

    fn shift_origin_to(&mut self, index: usize) {
        let Some(shift) = self.layout.get(index).map(|node| node.pos) else {
            return;
        };
        for node in &mut self.layout {
            node.pos -= shift;
        }
        self.camera.shift_origin(shift);
        self.camera_dirty = true;
    }
}
