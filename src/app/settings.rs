use std::collections::BTreeMap;

use crate::host::{EdgeDirection, EdgeStyle, SettingsPatch};

use super::physics::SimParams;

pub(in crate::app) const DEFAULT_TAPERED_WIDTH: f32 = 6.0;

#[derive(Clone, Debug, PartialEq)]
pub struct ViewSettings {
    pub edge_direction: EdgeDirection,
    pub edge_style: EdgeStyle,
    pub tapered_width: f32,
    pub sim: SimParams,
    pub minimap: bool,
    pub auto_pause_drag: bool,
    pub sim_enabled: bool,
    pub settings_collapse: BTreeMap<String, bool>,
    pub settings_visible: bool,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            edge_direction: EdgeDirection::Dependency,
            edge_style: EdgeStyle::Tapered,
            tapered_width: DEFAULT_TAPERED_WIDTH,
            sim: SimParams::default(),
            minimap: true,
            auto_pause_drag: false,
            sim_enabled: true,
            settings_collapse: BTreeMap::new(),
            settings_visible: false,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct SettingsEffects {
    pub(in crate::app) sim_params: bool,
    pub(in crate::app) edge_direction: bool,
    pub(in crate::app) sim_enabled: Option<bool>,
}

impl ViewSettings {
    pub(in crate::app) fn apply(&mut self, patch: &SettingsPatch) -> SettingsEffects {
        let mut effects = SettingsEffects::default();

        if let Some(direction) = patch.edge_direction
            && direction != self.edge_direction
        {
            self.edge_direction = direction;
            effects.edge_direction = true;
        }
        if let Some(style) = patch.edge_style {
            self.edge_style = style;
        }
        if let Some(width) = patch.tapered_width {
            self.tapered_width = finite_or(width, self.tapered_width).clamp(0.5, 40.0);
        }

        let before = self.sim;
        let sim = &mut self.sim;
        if let Some(value) = patch.sim_repulsion {
            sim.repulsion = finite_or(value, sim.repulsion).max(0.0);
        }
        if let Some(value) = patch.sim_attraction {
            sim.attraction = finite_or(value, sim.attraction).max(0.0);
        }
        if let Some(value) = patch.sim_gravity {
            sim.gravity = finite_or(value, sim.gravity).max(0.0);
        }
        if let Some(value) = patch.sim_link_length {
            sim.link_length = finite_or(value, sim.link_length).max(1.0);
        }
        if let Some(value) = patch.sim_min_distance {
            sim.min_distance = finite_or(value, sim.min_distance).max(0.0);
        }
        if let Some(value) = patch.sim_steps_per_frame {
            sim.steps_per_frame = (value as usize).clamp(1, 50);
        }
        if let Some(value) = patch.sim_threshold {
            sim.threshold = finite_or(value, sim.threshold).max(0.0);
        }
        if let Some(value) = patch.sim_damping {
            sim.damping = finite_or(value, sim.damping).clamp(0.0, 1.0);
        }
        effects.sim_params = self.sim != before;

        if let Some(minimap) = patch.minimap {
            self.minimap = minimap;
        }
        if let Some(auto_pause) = patch.auto_pause_drag {
            self.auto_pause_drag = auto_pause;
        }
        if let Some(enabled) = patch.sim_enabled
            && enabled != self.sim_enabled
        {
            self.sim_enabled = enabled;
            effects.sim_enabled = Some(enabled);
        }
        if let Some(collapse) = &patch.settings_collapse {
            self.settings_collapse
                .extend(collapse.iter().map(|(key, value)| (key.clone(), *value)));
        }
        if let Some(visible) = patch.settings_visible {
            self.settings_visible = visible;
        }

        effects
    }

    pub(in crate::app) fn section_open(&self, section: &str) -> bool {
        !self.settings_collapse.get(section).copied().unwrap_or(false)
    }
}

fn finite_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() { value } else { fallback }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_keys_leave_values_alone() {
        let mut settings = ViewSettings::default();
        let effects = settings.apply(&SettingsPatch {
            edge_style: Some(EdgeStyle::Line),
            ..SettingsPatch::default()
        });

        assert_eq!(settings.edge_style, EdgeStyle::Line);
        assert_eq!(settings.sim, SimParams::default());
        assert!(settings.minimap);
        assert_eq!(effects, SettingsEffects::default());
    }

    #[test]
    fn simulation_constants_are_sanitized() {
        let mut settings = ViewSettings::default();
        let effects = settings.apply(&SettingsPatch {
            sim_damping: Some(1.7),
            sim_steps_per_frame: Some(0),
            sim_repulsion: Some(f32::NAN),
            ..SettingsPatch::default()
        });

        assert!(effects.sim_params);
        assert_eq!(settings.sim.damping, 1.0);
        assert_eq!(settings.sim.steps_per_frame, 1);
        assert_eq!(settings.sim.repulsion, SimParams::default().repulsion);
    }

    #[test]
    fn direction_and_enable_changes_are_reported() {
        let mut settings = ViewSettings::default();
        let effects = settings.apply(&SettingsPatch {
            edge_direction: Some(EdgeDirection::Inverse),
            sim_enabled: Some(false),
            ..SettingsPatch::default()
        });
        assert!(effects.edge_direction);
        assert_eq!(effects.sim_enabled, Some(false));

        let repeated = settings.apply(&SettingsPatch {
            edge_direction: Some(EdgeDirection::Inverse),
            ..SettingsPatch::default()
        });
        assert!(!repeated.edge_direction);
    }

    #[test]
    fn collapse_state_merges_per_section() {
        let mut settings = ViewSettings::default();
        settings.apply(&SettingsPatch {
            settings_collapse: Some(BTreeMap::from([("edges".to_owned(), true)])),
            ..SettingsPatch::default()
        });
        settings.apply(&SettingsPatch {
            settings_collapse: Some(BTreeMap::from([("simulation".to_owned(), true)])),
            ..SettingsPatch::default()
        });

        assert!(!settings.section_open("edges"));
        assert!(!settings.section_open("simulation"));
        assert!(settings.section_open("colors"));
    }
}
