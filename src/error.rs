//! Error types and result aliases for the inspector.

use thiserror::Error;

/// Errors that can occur while driving the browser or completing a capture
#[derive(Debug, Error)]
pub enum InspectorError {
    /// Failed to launch a browser instance
    #[error("Failed to launch browser: {0}")]
    LaunchFailed(String),

    /// Failed to connect to an existing browser instance
    #[error("Failed to connect to browser: {0}")]
    ConnectionFailed(String),

    /// Tab-level operation failed (create, close, lookup)
    #[error("Tab operation failed: {0}")]
    TabOperationFailed(String),

    /// Navigation failed or timed out
    #[error("Navigation failed: {0}")]
    NavigationFailed(String),

    /// JavaScript evaluation in the page failed
    #[error("Evaluation failed: {0}")]
    EvaluationFailed(String),

    /// No element matched the given selector
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// The page agent could not be reached, even after re-injection
    #[error("Inspector agent unreachable: {0}. Reload the page and try again")]
    AgentUnreachable(String),

    /// A capture payload from the page agent could not be parsed
    #[error("Failed to parse capture payload: {0}")]
    CapturePayloadInvalid(String),

    /// The target element was detached from the document before its
    /// metadata could be read
    #[error("Element is detached from the document")]
    DetachedElement,

    /// Clipboard write failed; text and image writes fail independently
    #[error("Clipboard {kind} write failed: {reason}")]
    ClipboardFailed { kind: ClipboardKind, reason: String },

    /// Screenshot data returned by the page was not a usable PNG
    #[error("Screenshot data invalid: {0}")]
    ScreenshotInvalid(String),
}

/// Which clipboard payload kind a write failure refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardKind {
    Text,
    Image,
}

impl std::fmt::Display for ClipboardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClipboardKind::Text => write!(f, "text"),
            ClipboardKind::Image => write!(f, "image"),
        }
    }
}

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, InspectorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = InspectorError::LaunchFailed("no chrome binary".to_string());
        assert_eq!(err.to_string(), "Failed to launch browser: no chrome binary");
    }

    #[test]
    fn test_clipboard_error_display() {
        let err = InspectorError::ClipboardFailed {
            kind: ClipboardKind::Image,
            reason: "denied".to_string(),
        };
        assert_eq!(err.to_string(), "Clipboard image write failed: denied");
    }

    #[test]
    fn test_agent_unreachable_mentions_reload() {
        let err = InspectorError::AgentUnreachable("no response".to_string());
        assert!(err.to_string().contains("Reload the page"));
    }
}
