//! Messages consumed by the page-context core.
//!
//! The wire shape matches what the control surface sends:
//! `{"action": "toggleZapMode", "active": true}` and
//! `{"action": "zapElement", "x": 10, "y": 20}`.

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// A request addressed to the page-context core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ZapMessage {
    /// Activate or deactivate targeting mode.
    ToggleZapMode { active: bool },

    /// Zap whatever element sits at the given viewport coordinates.
    ZapElement {
        #[serde(default)]
        x: f64,
        #[serde(default)]
        y: f64,
    },
}

impl ZapMessage {
    /// Parse a message from its JSON wire form.
    pub fn from_json(json: &str) -> Result<Self, ProtocolError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if value.get("action").and_then(|a| a.as_str()).is_none() {
            return Err(ProtocolError::InvalidMessage("missing action".to_string()));
        }
        serde_json::from_value(value).map_err(|e| ProtocolError::InvalidMessage(e.to_string()))
    }

    pub fn action(&self) -> &'static str {
        match self {
            ZapMessage::ToggleZapMode { .. } => "toggleZapMode",
            ZapMessage::ZapElement { .. } => "zapElement",
        }
    }
}

/// Reply to a [`ZapMessage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZapResponse {
    pub success: bool,
}

impl ZapResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }

    pub fn failed() -> Self {
        Self { success: false }
    }
}
