use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::snapshot::TargetType;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeDirection {
    /// Follow dependencies: base at the dependent, tip at the dependency.
    #[default]
    Dependency,
    /// Follow consumers: base at the dependency, tip at the dependent.
    Inverse,
}

impl EdgeDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Dependency => Self::Inverse,
            Self::Inverse => Self::Dependency,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dependency => "Dependencies",
            Self::Inverse => "Consumers",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    #[default]
    Tapered,
    Chevrons,
    Line,
}

impl EdgeStyle {
    pub const ALL: [EdgeStyle; 3] = [Self::Tapered, Self::Chevrons, Self::Line];

    pub fn label(self) -> &'static str {
        match self {
            Self::Tapered => "Tapered",
            Self::Chevrons => "Chevrons",
            Self::Line => "Line",
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub edge_direction: Option<EdgeDirection>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub edge_style: Option<EdgeStyle>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub tapered_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub sim_repulsion: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub sim_attraction: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub sim_gravity: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub sim_link_length: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub sim_min_distance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub sim_steps_per_frame: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub sim_threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub sim_damping: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub minimap: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub auto_pause_drag: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub sim_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub settings_collapse: Option<BTreeMap<String, bool>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub settings_visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient")]
    pub node_colors: Option<BTreeMap<TargetType, String>>,
}

/// A value of the wrong shape unsets its key instead of rejecting the whole object.
pub(super) fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match T::deserialize(&value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(error) => {
            log::debug!("ignoring setting value {value}: {error}");
            Ok(None)
        }
    }
}

impl SettingsPatch {
    pub fn entries(&self) -> Vec<(String, Value)> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map
                .into_iter()
                .filter(|(_, value)| !value.is_null())
                .collect(),
            Ok(_) => Vec::new(),
            Err(error) => {
                log::warn!("failed to encode settings patch: {error}");
                Vec::new()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_stay_unset() {
        let patch: SettingsPatch =
            serde_json::from_str(r#"{"edgeStyle":"chevrons","simDamping":0.9}"#).expect("parses");
        assert_eq!(patch.edge_style, Some(EdgeStyle::Chevrons));
        assert_eq!(patch.sim_damping, Some(0.9));
        assert_eq!(patch.edge_direction, None);
        assert_eq!(patch.minimap, None);
    }

    #[test]
    fn entries_only_report_set_keys() {
        let patch = SettingsPatch {
            edge_direction: Some(EdgeDirection::Inverse),
            sim_steps_per_frame: Some(3),
            ..SettingsPatch::default()
        };
        let entries = patch.entries();
        assert_eq!(entries.len(), 2);
        assert!(entries.contains(&("edgeDirection".to_owned(), serde_json::json!("inverse"))));
        assert!(entries.contains(&("simStepsPerFrame".to_owned(), serde_json::json!(3))));
        assert!(SettingsPatch::default().is_empty());
    }

    #[test]
    fn bad_values_unset_only_their_own_key() {
        let patch: SettingsPatch = serde_json::from_str(
            r#"{"edgeStyle":"curved","simStepsPerFrame":-1,"minimap":"yes","simDamping":0.7}"#,
        )
        .expect("parses");
        assert_eq!(patch.edge_style, None);
        assert_eq!(patch.sim_steps_per_frame, None);
        assert_eq!(patch.minimap, None);
        assert_eq!(patch.sim_damping, Some(0.7));
    }

    #[test]
    fn node_colors_are_keyed_by_target_type() {
        let patch: SettingsPatch =
            serde_json::from_str(r##"{"nodeColors":{"EXECUTABLE":"#ff0000"}}"##).expect("parses");
        let colors = patch.node_colors.expect("colors present");
        assert_eq!(colors.get(&TargetType::Executable).map(String::as_str), Some("#ff0000"));
    }
}
