use std::collections::BTreeMap;

use eframe::egui::{self, Context, Ui};

use crate::host::{EdgeDirection, EdgeStyle, SettingsPatch, TargetType};

use super::super::GraphView;
use super::super::physics::SimParams;

const SECTION_EDGES: &str = "edges";
const SECTION_SIMULATION: &str = "simulation";
const SECTION_VIEW: &str = "view";
const SECTION_COLORS: &str = "colors";

fn slider_patch(
    ui: &mut Ui,
    value: f32,
    range: std::ops::RangeInclusive<f32>,
    text: &str,
    hover: &str,
    logarithmic: bool,
) -> Option<f32> {
    let mut edited = value;
    let response = ui
        .add(
            egui::Slider::new(&mut edited, range)
                .text(text)
                .logarithmic(logarithmic)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hover);
    (response.changed() && edited != value).then_some(edited)
}

impl GraphView {
    pub(in crate::app) fn draw_settings_window(&mut self, ctx: &Context) {
        if !self.settings.settings_visible {
            return;
        }

        let mut open = true;
        let mut patches = Vec::new();
        egui::Window::new("Settings")
            .open(&mut open)
            .resizable(false)
            .default_width(320.0)
            .show(ctx, |ui| {
                self.section(ui, SECTION_EDGES, "Edges", &mut patches, Self::edge_settings);
                self.section(
                    ui,
                    SECTION_SIMULATION,
                    "Simulation",
                    &mut patches,
                    Self::simulation_settings,
                );
                self.section(ui, SECTION_VIEW, "View", &mut patches, Self::view_settings);
                self.color_section(ui, &mut patches);
            });

        if !open {
            patches.push(SettingsPatch {
                settings_visible: Some(false),
                ..SettingsPatch::default()
            });
        }
        for patch in patches {
            self.change_setting(patch);
        }
    }

    fn section(
        &self,
        ui: &mut Ui,
        key: &str,
        title: &str,
        patches: &mut Vec<SettingsPatch>,
        body: fn(&Self, &mut Ui, &mut Vec<SettingsPatch>),
    ) {
        let open = self.settings.section_open(key);
        let output = egui::CollapsingHeader::new(title)
            .open(Some(open))
            .show(ui, |ui| body(self, ui, patches));
        if output.header_response.clicked() {
            patches.push(SettingsPatch {
                settings_collapse: Some(BTreeMap::from([(key.to_owned(), open)])),
                ..SettingsPatch::default()
            });
        }
    }

    fn edge_settings(&self, ui: &mut Ui, patches: &mut Vec<SettingsPatch>) {
        ui.horizontal(|ui| {
            ui.label("Style");
            for style in EdgeStyle::ALL {
                if ui
                    .selectable_label(self.settings.edge_style == style, style.label())
                    .clicked()
                    && self.settings.edge_style != style
                {
                    patches.push(SettingsPatch {
                        edge_style: Some(style),
                        ..SettingsPatch::default()
                    });
                }
            }
        });
        ui.horizontal(|ui| {
            ui.label("Direction");
            for direction in [EdgeDirection::Dependency, EdgeDirection::Inverse] {
                if ui
                    .selectable_label(self.settings.edge_direction == direction, direction.label())
                    .on_hover_text("Also decides whether focus follows dependencies or consumers.")
                    .clicked()
                    && self.settings.edge_direction != direction
                {
                    patches.push(SettingsPatch {
                        edge_direction: Some(direction),
                        ..SettingsPatch::default()
                    });
                }
            }
        });
        if let Some(width) = slider_patch(
            ui,
            self.settings.tapered_width,
            0.5..=40.0,
            "Edge width",
            "Base width of tapered edges, in world units.",
            false,
        ) {
            patches.push(SettingsPatch {
                tapered_width: Some(width),
                ..SettingsPatch::default()
            });
        }
    }

    fn simulation_settings(&self, ui: &mut Ui, patches: &mut Vec<SettingsPatch>) {
        let sim = self.settings.sim;
        let mut patch = SettingsPatch::default();

        patch.sim_repulsion = slider_patch(
            ui,
            sim.repulsion,
            100.0..=200_000.0,
            "Repulsion",
            "How hard every pair of targets pushes apart.",
            true,
        );
        patch.sim_attraction = slider_patch(
            ui,
            sim.attraction,
            0.0..=50.0,
            "Attraction",
            "Spring strength along edges.",
            false,
        );
        patch.sim_gravity = slider_patch(
            ui,
            sim.gravity,
            0.0..=0.2,
            "Gravity",
            "Pull toward the origin, or the focused target.",
            false,
        );
        patch.sim_link_length = slider_patch(
            ui,
            sim.link_length,
            10.0..=600.0,
            "Link length",
            "Distance scale of the edge springs.",
            false,
        );
        patch.sim_min_distance = slider_patch(
            ui,
            sim.min_distance,
            0.0..=400.0,
            "Min distance",
            "Below this distance repulsion gets a short-range boost.",
            false,
        );
        let mut steps = sim.steps_per_frame as u32;
        if ui
            .add(egui::Slider::new(&mut steps, 1..=50).text("Steps per frame"))
            .changed()
            && steps as usize != sim.steps_per_frame
        {
            patch.sim_steps_per_frame = Some(steps);
        }
        patch.sim_threshold = slider_patch(
            ui,
            sim.threshold,
            0.0..=50.0,
            "Rest threshold",
            "Total movement per step below which the simulation stops.",
            false,
        );
        patch.sim_damping = slider_patch(
            ui,
            sim.damping,
            0.0..=1.0,
            "Damping",
            "Fraction of velocity kept each step.",
            false,
        );

        if ui.button("Reset simulation constants").clicked() {
            let defaults = SimParams::default();
            patch = SettingsPatch {
                sim_repulsion: Some(defaults.repulsion),
                sim_attraction: Some(defaults.attraction),
                sim_gravity: Some(defaults.gravity),
                sim_link_length: Some(defaults.link_length),
                sim_min_distance: Some(defaults.min_distance),
                sim_steps_per_frame: Some(defaults.steps_per_frame as u32),
                sim_threshold: Some(defaults.threshold),
                sim_damping: Some(defaults.damping),
                ..SettingsPatch::default()
            };
        }

        if !patch.is_empty() {
            patches.push(patch);
        }
    }

    fn view_settings(&self, ui: &mut Ui, patches: &mut Vec<SettingsPatch>) {
        let mut minimap = self.settings.minimap;
        if ui.checkbox(&mut minimap, "Minimap").changed() {
            patches.push(SettingsPatch {
                minimap: Some(minimap),
                ..SettingsPatch::default()
            });
        }
        let mut auto_pause = self.settings.auto_pause_drag;
        if ui
            .checkbox(&mut auto_pause, "Pause simulation while dragging")
            .changed()
        {
            patches.push(SettingsPatch {
                auto_pause_drag: Some(auto_pause),
                ..SettingsPatch::default()
            });
        }
        let mut enabled = self.settings.sim_enabled;
        if ui.checkbox(&mut enabled, "Simulation enabled").changed() {
            patches.push(SettingsPatch {
                sim_enabled: Some(enabled),
                ..SettingsPatch::default()
            });
        }
    }

    fn color_section(&mut self, ui: &mut Ui, patches: &mut Vec<SettingsPatch>) {
        let open = self.settings.section_open(SECTION_COLORS);
        let mut recolor = None;
        let mut reset = false;
        let output = egui::CollapsingHeader::new("Colors")
            .open(Some(open))
            .show(ui, |ui| {
                egui::Grid::new("category_colors").num_columns(2).show(ui, |ui| {
                    for target_type in TargetType::ALL {
                        if !target_type.is_buildable() {
                            continue;
                        }
                        let mut color = self.palette.category_color(target_type);
                        ui.label(target_type.label());
                        if ui.color_edit_button_srgba(&mut color).changed() {
                            recolor = Some((target_type, color));
                        }
                        ui.end_row();
                    }
                });
                reset = ui.button("Reset colors").clicked();
            });
        if output.header_response.clicked() {
            patches.push(SettingsPatch {
                settings_collapse: Some(BTreeMap::from([(SECTION_COLORS.to_owned(), open)])),
                ..SettingsPatch::default()
            });
        }

        if let Some((target_type, color)) = recolor {
            self.change_category_color(target_type, color);
        }
        if reset {
            self.reset_category_colors();
        }
    }
}
