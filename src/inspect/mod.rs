//! Inspection session control
//!
//! The [`Inspector`] controller owns the session lifecycle: it injects the
//! page agent, arms and disarms capture mode, polls for captured elements,
//! completes captures (summarization, styles, location, screenshot), and
//! publishes reports to the clipboard.

pub mod inspector;
pub mod loader;
pub mod protocol;
pub mod state;

pub use inspector::Inspector;
pub use loader::{LoadOutcome, LoadSource, RendererLoader};
pub use protocol::{ActionRequest, ActionResponse, InspectorAction};
pub use state::{InspectMode, InspectState};

use std::path::PathBuf;

/// Public CDN fallback for the rendering library
pub const DEFAULT_RENDERER_CDN: &str = "https://cdn.jsdelivr.net/npm/html2canvas@1.4.1/dist/html2canvas.min.js";

/// Tunables for an inspection session
#[derive(Debug, Clone)]
pub struct InspectorConfig {
    /// Local file to inline-inject as the first renderer load strategy
    pub renderer_path: Option<PathBuf>,

    /// URL to try before the public CDN
    pub renderer_url: Option<String>,

    /// Public CDN URL, the last load strategy
    pub renderer_cdn: String,

    /// Delay before capturing an interactive element, letting native widget
    /// behavior (dropdown opening) finish first
    pub settle_delay_ms: u64,

    /// Per-strategy timeout when racing script load/error events
    pub load_timeout_ms: u64,
}

impl InspectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the local renderer file
    pub fn renderer_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.renderer_path = Some(path.into());
        self
    }

    /// Builder method: set the renderer URL override
    pub fn renderer_url(mut self, url: impl Into<String>) -> Self {
        self.renderer_url = Some(url.into());
        self
    }

    /// Builder method: set the interactive-capture settle delay
    pub fn settle_delay_ms(mut self, delay: u64) -> Self {
        self.settle_delay_ms = delay;
        self
    }
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            renderer_path: None,
            renderer_url: None,
            renderer_cdn: DEFAULT_RENDERER_CDN.to_string(),
            settle_delay_ms: 500,
            load_timeout_ms: 8_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = InspectorConfig::default();
        assert!(config.renderer_path.is_none());
        assert!(config.renderer_url.is_none());
        assert_eq!(config.settle_delay_ms, 500);
        assert!(config.renderer_cdn.contains("html2canvas"));
    }

    #[test]
    fn test_config_builder() {
        let config = InspectorConfig::new()
            .renderer_path("/opt/renderer.min.js")
            .renderer_url("https://assets.internal/html2canvas.js")
            .settle_delay_ms(250);

        assert_eq!(config.renderer_path, Some(PathBuf::from("/opt/renderer.min.js")));
        assert_eq!(config.renderer_url.as_deref(), Some("https://assets.internal/html2canvas.js"));
        assert_eq!(config.settle_delay_ms, 250);
    }
}
