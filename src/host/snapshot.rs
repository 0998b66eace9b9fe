use std::fmt;

use serde::{Deserialize, Serialize};

use super::settings::{SettingsPatch, lenient};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetType {
    Executable,
    StaticLibrary,
    SharedLibrary,
    ModuleLibrary,
    ObjectLibrary,
    InterfaceLibrary,
    Utility,
    #[default]
    Unknown,
}

impl TargetType {
    pub const ALL: [TargetType; 8] = [
        Self::Executable,
        Self::StaticLibrary,
        Self::SharedLibrary,
        Self::ModuleLibrary,
        Self::ObjectLibrary,
        Self::InterfaceLibrary,
        Self::Utility,
        Self::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Executable => "EXECUTABLE",
            Self::StaticLibrary => "STATIC_LIBRARY",
            Self::SharedLibrary => "SHARED_LIBRARY",
            Self::ModuleLibrary => "MODULE_LIBRARY",
            Self::ObjectLibrary => "OBJECT_LIBRARY",
            Self::InterfaceLibrary => "INTERFACE_LIBRARY",
            Self::Utility => "UTILITY",
            Self::Unknown => "UNKNOWN",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Executable => "Executable",
            Self::StaticLibrary => "Static lib",
            Self::SharedLibrary => "Shared lib",
            Self::ModuleLibrary => "Module lib",
            Self::ObjectLibrary => "Object lib",
            Self::InterfaceLibrary => "Interface lib",
            Self::Utility => "Utility",
            Self::Unknown => "Other",
        }
    }

    pub fn is_buildable(self) -> bool {
        self != Self::Utility
    }
}

impl From<String> for TargetType {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "EXECUTABLE" => Self::Executable,
            "STATIC_LIBRARY" => Self::StaticLibrary,
            "SHARED_LIBRARY" => Self::SharedLibrary,
            "MODULE_LIBRARY" => Self::ModuleLibrary,
            "OBJECT_LIBRARY" => Self::ObjectLibrary,
            "INTERFACE_LIBRARY" => Self::InterfaceLibrary,
            "UTILITY" => Self::Utility,
            _ => Self::Unknown,
        }
    }
}

impl From<TargetType> for String {
    fn from(value: TargetType) -> Self {
        value.as_str().to_owned()
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(rename = "type", default)]
    pub target_type: TargetType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<String>,
    #[serde(default)]
    pub source_path: String,
}

impl GraphNode {
    pub fn new(id: impl Into<String>, target_type: TargetType) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            target_type,
            color: None,
            shape: None,
            source_path: String::new(),
        }
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// `from` depends on `to`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphEdge {
    pub from: String,
    pub to: String,
}

impl GraphEdge {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<GraphNode>,
    #[serde(default)]
    pub edges: Vec<GraphEdge>,
    #[serde(default, deserialize_with = "lenient")]
    pub settings: Option<SettingsPatch>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_target_types_do_not_fail_deserialization() {
        let node: GraphNode =
            serde_json::from_str(r#"{"id":"gen","type":"CUSTOM_COMMAND"}"#).expect("node parses");
        assert_eq!(node.target_type, TargetType::Unknown);
        assert_eq!(node.display_label(), "gen");
    }

    #[test]
    fn node_fields_use_camel_case() {
        let node: GraphNode = serde_json::from_str(
            r##"{"id":"app","label":"App","type":"EXECUTABLE","color":"#4ec9b0","shape":"box","sourcePath":"src/app"}"##,
        )
        .expect("node parses");
        assert_eq!(node.target_type, TargetType::Executable);
        assert_eq!(node.source_path, "src/app");
        assert_eq!(node.color.as_deref(), Some("#4ec9b0"));
    }

    #[test]
    fn target_type_round_trips_through_its_wire_name() {
        let value = serde_json::to_value(TargetType::InterfaceLibrary).expect("serializes");
        assert_eq!(value, serde_json::json!("INTERFACE_LIBRARY"));
        assert!(!TargetType::Utility.is_buildable());
    }
}
