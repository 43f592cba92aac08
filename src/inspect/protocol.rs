//! Control-plane protocol between the controller and the page agent.
//!
//! Requests are `{"action": "..."}` and answers are `{"success": bool}`,
//! matching the page agent's `dispatch` entry point.

use serde::{Deserialize, Serialize};

/// Actions the page agent understands
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InspectorAction {
    /// Show/hide the whole inspector UI (toolbar included)
    ToggleInspector,

    /// Arm/disarm element selection while the UI stays up
    ToggleSelectMode,

    /// Re-capture the last selected element's screenshot
    TakeScreenshot,
}

impl InspectorAction {
    /// Wire name of the action
    pub fn as_str(&self) -> &'static str {
        match self {
            InspectorAction::ToggleInspector => "toggleInspector",
            InspectorAction::ToggleSelectMode => "toggleSelectMode",
            InspectorAction::TakeScreenshot => "takeScreenshot",
        }
    }
}

/// A request to the page agent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionRequest {
    pub action: InspectorAction,
}

impl ActionRequest {
    pub fn new(action: InspectorAction) -> Self {
        Self { action }
    }
}

/// The page agent's answer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
