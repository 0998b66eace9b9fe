use eframe::egui::{self, RichText, Ui};

use crate::util::short_path;

use super::super::GraphView;
use super::super::search::ranked_matches;

const SEARCH_RESULT_LIMIT: usize = 50;

enum DetailsAction {
    Select(usize),
    Focus(String),
    Center(usize),
}

impl GraphView {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Selection Details");
        ui.add_space(6.0);

        let action = match self.selected.as_deref().and_then(|id| self.model.index_of(id)) {
            Some(index) => self.draw_selected_node(ui, index),
            None => self.draw_search_results(ui),
        };

        match action {
            Some(DetailsAction::Select(index)) => {
                let id = self.model.nodes[index].id.clone();
                self.select(id);
                self.center_on_node(index);
            }
            Some(DetailsAction::Focus(id)) => self.focus_on_node(&id),
            Some(DetailsAction::Center(index)) => self.center_on_node(index),
            None => {}
        }
    }

    fn draw_selected_node(&self, ui: &mut Ui, index: usize) -> Option<DetailsAction> {
        let node = &self.model.nodes[index];
        let mut action = None;

        ui.label(RichText::new(node.display_label()).strong());
        ui.small(node.id.as_str());
        ui.add_space(6.0);
        ui.label(format!("Type: {}", node.target_type.label()));
        if !node.source_path.is_empty() {
            ui.label(format!("Source: {}", short_path(&node.source_path)))
                .on_hover_text(node.source_path.as_str());
        }

        ui.horizontal(|ui| {
            if ui
                .button("Focus")
                .on_hover_text("Show only what is reachable from this target.")
                .clicked()
            {
                action = Some(DetailsAction::Focus(node.id.clone()));
            }
            if ui.button("Center").clicked() {
                action = Some(DetailsAction::Center(index));
            }
        });

        for (title, neighbors) in [
            ("Dependencies", self.model.dependencies(index)),
            ("Consumers", self.model.consumers(index)),
        ] {
            ui.separator();
            ui.label(RichText::new(format!("{title} ({})", neighbors.len())).strong());
            if neighbors.is_empty() {
                ui.label("None.");
                continue;
            }
            egui::ScrollArea::vertical()
                .id_salt(title)
                .max_height(220.0)
                .show(ui, |ui| {
                    for neighbor in neighbors {
                        if ui.link(self.model.nodes[neighbor].display_label()).clicked() {
                            action = Some(DetailsAction::Select(neighbor));
                        }
                    }
                });
        }

        action
    }

    fn draw_search_results(&self, ui: &mut Ui) -> Option<DetailsAction> {
        if !self.search.is_active() {
            ui.label("Select a target in the graph, or type a search to list matches.");
            return None;
        }

        let results = ranked_matches(
            &self.model.nodes,
            &self.visibility,
            self.search.query(),
            self.search.mode,
            SEARCH_RESULT_LIMIT,
        );
        ui.label(RichText::new(format!("Search results ({})", results.len())).strong());
        if results.is_empty() {
            ui.label("No visible target matches.");
            return None;
        }

        let mut action = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            for index in results {
                let node = &self.model.nodes[index];
                let response = ui
                    .link(node.display_label())
                    .on_hover_text(node.target_type.label());
                if response.clicked() {
                    action = Some(DetailsAction::Select(index));
                }
            }
        });
        action
    }
}
