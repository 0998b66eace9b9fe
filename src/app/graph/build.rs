use eframe::egui::{Color32, Rect, Vec2};

use crate::host::{GraphSnapshot, InboundMessage, OutboundMessage, SettingsPatch, TargetType};

use super::super::GraphView;
use super::super::render_utils::CategoryPalette;
use super::{ApproxTextMeasure, GraphModel, PointerMode, reconcile_layout};

impl GraphView {
    pub(in crate::app) fn handle_inbound(&mut self, message: InboundMessage) {
        match message {
            InboundMessage::Update(snapshot) => self.apply_update(snapshot),
            InboundMessage::Settings(patch) => self.apply_settings(&patch),
            InboundMessage::ShowSettings => {
                self.settings.settings_visible = !self.settings.settings_visible;
            }
            InboundMessage::Screenshot => self.screenshot_requested = true,
            InboundMessage::ToggleLayout => self.shake(),
            InboundMessage::FocusNode { target_id } => self.focus_on_node(&target_id),
        }
    }

    pub(in crate::app) fn apply_update(&mut self, snapshot: GraphSnapshot) {
        let GraphSnapshot {
            nodes,
            edges,
            settings,
        } = snapshot;
        if let Some(patch) = &settings {
            self.apply_settings(patch);
        }

        self.model = GraphModel::normalize(nodes, &edges);
        self.search.excluded_types.clear();

        let previous = std::mem::take(&mut self.layout);
        self.layout = reconcile_layout(previous, &self.model.nodes, &ApproxTextMeasure);
        self.measure_dirty = true;

        if self
            .selected
            .as_deref()
            .is_some_and(|id| self.model.index_of(id).is_none())
        {
            self.selected = None;
        }
        if self
            .pointer
            .dragged_id()
            .is_some_and(|id| self.model.index_of(id).is_none())
        {
            self.pointer = PointerMode::Idle;
        }
        self.revalidate_focus();
        self.refresh_visibility();

        if self.fit_on_first_update && !self.model.is_empty() {
            self.fit_on_first_update = false;
            self.pending_fit = true;
        }

        log::info!(
            "applied snapshot: {} targets, {} edges",
            self.model.nodes.len(),
            self.model.edges.len()
        );
        self.restart_simulation();
    }

    pub(in crate::app) fn apply_settings(&mut self, patch: &SettingsPatch) {
        let effects = self.settings.apply(patch);
        if let Some(colors) = &patch.node_colors {
            self.palette.apply(colors);
        }

        if effects.edge_direction {
            self.revalidate_focus();
            if self.refresh_visibility() {
                self.restart_simulation();
            }
        }
        match effects.sim_enabled {
            Some(true) => self.restart_simulation(),
            Some(false) => self.sim_loop.stop(self.scheduler.as_mut()),
            None => {}
        }
        if effects.sim_params {
            self.restart_simulation();
        }
    }

    pub(in crate::app) fn change_setting(&mut self, patch: SettingsPatch) {
        self.apply_settings(&patch);
        for (key, value) in patch.entries() {
            self.outbox.push(OutboundMessage::UpdateSetting { key, value });
        }
    }

    pub(in crate::app) fn change_category_color(
        &mut self,
        target_type: TargetType,
        color: Color32,
    ) {
        self.palette.set(target_type, color);
        self.change_setting(SettingsPatch {
            node_colors: Some(self.palette.to_hex_map()),
            ..SettingsPatch::default()
        });
    }

    pub(in crate::app) fn reset_category_colors(&mut self) {
        self.palette = CategoryPalette::default();
        self.change_setting(SettingsPatch {
            node_colors: Some(Default::default()),
            ..SettingsPatch::default()
        });
    }

    pub(in crate::app) fn filters_changed(&mut self) {
        if self.refresh_visibility() {
            self.restart_simulation();
        }
    }

    pub(in crate::app) fn shake(&mut self) {
        for node in &mut self.layout {
            node.vel = Vec2::ZERO;
        }
        self.restart_simulation();
    }

    pub(in crate::app) fn visible_bounds(&self) -> Option<Rect> {
        self.layout
            .iter()
            .enumerate()
            .filter(|(index, _)| !self.visibility.is_filtered(*index))
            .map(|(_, node)| node.world_rect())
            .reduce(|bounds, rect| bounds.union(rect))
    }

    pub(in crate::app) fn fit_to_view(&mut self) {
        let Some(bounds) = self.visible_bounds() else {
            return;
        };
        let viewport = self.viewport();
        self.camera.fit(bounds, viewport);
        self.camera_dirty = true;
    }

    pub(in crate::app) fn center_on_node(&mut self, index: usize) {
        let Some(world) = self.layout.get(index).map(|node| node.pos) else {
            return;
        };
        let viewport = self.viewport();
        self.camera.center_on(world, viewport);
        self.camera_dirty = true;
    }
}
