use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::settings::SettingsPatch;
use super::snapshot::GraphSnapshot;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InboundMessage {
    Update(GraphSnapshot),
    Settings(SettingsPatch),
    ShowSettings,
    Screenshot,
    ToggleLayout,
    #[serde(rename_all = "camelCase")]
    FocusNode { target_id: String },
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum OutboundMessage {
    Ready,
    #[serde(rename_all = "camelCase")]
    NodeClick { target_id: String },
    UpdateSetting { key: String, value: Value },
    #[serde(rename_all = "camelCase")]
    SaveScreenshot { data_uri: String },
}

pub fn parse_inbound(raw: &str) -> Result<InboundMessage> {
    serde_json::from_str(raw).context("invalid inbound message JSON")
}
