use std::collections::BTreeSet;

use eframe::egui::{self, Align, Color32, Layout, RichText, Ui};

use crate::host::{EdgeDirection, SettingsPatch, TargetType};

use super::super::GraphView;
use super::super::search::{FilterPolicy, SearchMode};

impl GraphView {
    pub(in crate::app) fn draw_toolbar(
        &mut self,
        ui: &mut Ui,
        host_error: &mut Option<String>,
        reload_requested: &mut bool,
    ) {
        ui.horizontal(|ui| {
            ui.heading("Target graph");
            ui.separator();

            if ui
                .button("Fit")
                .on_hover_text("Frame every visible target.")
                .clicked()
            {
                self.fit_to_view();
            }
            if ui
                .button("Shake")
                .on_hover_text("Reset velocities and let the layout relax again.")
                .clicked()
            {
                self.shake();
            }

            let sim_label = if self.settings.sim_enabled {
                "Pause"
            } else {
                "Resume"
            };
            if ui
                .button(sim_label)
                .on_hover_text("Stop or restart the force simulation.")
                .clicked()
            {
                let enabled = !self.settings.sim_enabled;
                self.change_setting(SettingsPatch {
                    sim_enabled: Some(enabled),
                    ..SettingsPatch::default()
                });
            }

            let direction = self.settings.edge_direction;
            if ui
                .button(direction.label())
                .on_hover_text("Swap which end of an edge is drawn as its base; focus follows it.")
                .clicked()
            {
                self.change_setting(SettingsPatch {
                    edge_direction: Some(direction.toggled()),
                    ..SettingsPatch::default()
                });
            }

            if ui
                .button("Screenshot")
                .on_hover_text("Export the canvas as PNG.")
                .clicked()
            {
                self.screenshot_requested = true;
            }
            if ui
                .selectable_label(self.settings.settings_visible, "Settings")
                .clicked()
            {
                let visible = !self.settings.settings_visible;
                self.change_setting(SettingsPatch {
                    settings_visible: Some(visible),
                    ..SettingsPatch::default()
                });
            }
            if ui
                .button("Reload view")
                .on_hover_text("Recreate the view and reload the graph; the camera is kept.")
                .clicked()
            {
                *reload_requested = true;
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let (nodes, edges) = self.visible_counts();
                ui.label(format!("targets: {nodes}/{}", self.model.nodes.len()));
                ui.label(format!("edges: {edges}"));
                if self.is_simulating() {
                    ui.spinner();
                }
            });
        });

        if let Some(error) = host_error.as_deref() {
            let mut dismissed = false;
            ui.horizontal(|ui| {
                ui.label(RichText::new(error).color(Color32::from_rgb(240, 120, 110)));
                dismissed = ui.small_button("Dismiss").clicked();
            });
            if dismissed {
                *host_error = None;
            }
        }
    }

    pub(in crate::app) fn draw_filter_row(&mut self, ui: &mut Ui) {
        let mut changed = false;

        ui.horizontal_wrapped(|ui| {
            ui.label("Search");
            let mut query = self.search.query().to_owned();
            let response = ui
                .add(egui::TextEdit::singleline(&mut query).desired_width(220.0))
                .on_hover_text("Substring match; `*`, `(` or `[` switch to a case-insensitive regex.");
            if response.changed() {
                self.search.set_query(query);
                changed = true;
            }

            for mode in [SearchMode::Name, SearchMode::Path] {
                changed |= ui
                    .selectable_value(&mut self.search.mode, mode, mode.label())
                    .changed();
            }
            ui.separator();
            for policy in [FilterPolicy::Dim, FilterPolicy::Hide] {
                changed |= ui
                    .selectable_value(&mut self.search.policy, policy, policy.label())
                    .on_hover_text(match policy {
                        FilterPolicy::Dim => "Fade non-matching targets but keep them in the layout.",
                        FilterPolicy::Hide => "Remove non-matching targets from view and simulation.",
                    })
                    .changed();
            }
            ui.separator();

            let present = self
                .model
                .nodes
                .iter()
                .map(|node| node.target_type)
                .collect::<BTreeSet<TargetType>>();
            for target_type in present {
                let mut shown = !self.search.excluded_types.contains(&target_type);
                let swatch = self.palette.category_color(target_type);
                if ui
                    .checkbox(&mut shown, RichText::new(target_type.label()).color(swatch))
                    .changed()
                {
                    changed |= self.search.set_type_excluded(target_type, !shown);
                }
            }
        });

        if changed {
            self.filters_changed();
        }
    }

    pub(in crate::app) fn draw_breadcrumbs(&mut self, ui: &mut Ui) {
        let mut navigate = None;

        ui.horizontal_wrapped(|ui| {
            let scope = match self.settings.edge_direction {
                EdgeDirection::Dependency => "dependencies of",
                EdgeDirection::Inverse => "consumers of",
            };
            if ui.link("All targets").clicked() {
                navigate = Some(None);
            }
            let last = self.focus.history.len().saturating_sub(1);
            for (index, crumb) in self.focus.history.iter().enumerate() {
                ui.label("›");
                if index == last {
                    ui.strong(crumb.label.as_str());
                } else if ui.link(crumb.label.as_str()).clicked() {
                    navigate = Some(Some(index));
                }
            }
            ui.label(
                RichText::new(format!("({scope} the focused target)"))
                    .small()
                    .weak(),
            );
        });

        if let Some(target) = navigate {
            self.navigate_breadcrumb(target);
        }
    }
}
