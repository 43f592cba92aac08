//! The inspection session controller.
//!
//! Owns the single inspection session for a tab: injects the page agent
//! (tearing down any previous instance), drives the armed/idle state
//! machine, polls the agent's capture queue, completes captures with
//! summarization/styles/location/screenshot, and publishes reports to the
//! clipboard.

use crate::browser::BrowserSession;
use crate::capture::{ElementRecord, RawCapture, ScreenshotAsset};
use crate::clipboard::ReportClipboard;
use crate::error::{InspectorError, Result};
use crate::inspect::loader::{LoadOutcome, RendererLoader};
use crate::inspect::protocol::{ActionResponse, InspectorAction};
use crate::inspect::state::{InspectMode, InspectState};
use crate::inspect::InspectorConfig;
use crate::report;
use headless_chrome::Tab;
use serde::Deserialize;
use std::sync::Arc;

/// The page agent source, embedded at build time
const AGENT_JS: &str = include_str!("page/inspector.js");

/// What the agent's takePending returns
#[derive(Debug, Deserialize)]
struct PollBatch {
    #[serde(default)]
    active: bool,

    #[serde(default)]
    captures: Vec<RawCapture>,
}

/// Controller for one inspection session.
///
/// Only one session exists per tab: injecting the agent destroys any
/// previous page-side instance, and the controller itself is single-owner
/// by construction.
pub struct Inspector {
    tab: Arc<Tab>,
    config: InspectorConfig,
    state: InspectState,
    loader: RendererLoader,
    renderer: Option<LoadOutcome>,
    last_record: Option<ElementRecord>,
}

impl Inspector {
    /// Attach to the session's active tab and inject the page agent
    pub fn attach(session: &BrowserSession, config: InspectorConfig) -> Result<Self> {
        Self::attach_to_tab(session.tab()?, config)
    }

    /// Attach to a specific tab and inject the page agent
    pub fn attach_to_tab(tab: Arc<Tab>, config: InspectorConfig) -> Result<Self> {
        let loader = RendererLoader::from_config(&config);
        let inspector =
            Self { tab, config, state: InspectState::new(), loader, renderer: None, last_record: None };
        inspector.inject_agent()?;
        Ok(inspector)
    }

    /// The tab this session is attached to
    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    /// Current mode
    pub fn mode(&self) -> InspectMode {
        self.state.mode()
    }

    /// Whether capture mode is armed
    pub fn is_armed(&self) -> bool {
        self.state.is_armed()
    }

    /// The most recently completed capture
    pub fn last_record(&self) -> Option<&ElementRecord> {
        self.last_record.as_ref()
    }

    /// Outcome of the renderer load, once attempted
    pub fn renderer_outcome(&self) -> Option<&LoadOutcome> {
        self.renderer.as_ref()
    }

    /// (Re)inject the page agent; any previous instance destroys itself
    fn inject_agent(&self) -> Result<()> {
        let style_properties = serde_json::to_string(crate::capture::STYLE_PROPERTIES)
            .map_err(|e| InspectorError::EvaluationFailed(format!("style list serialization failed: {}", e)))?;
        let source = AGENT_JS
            .replace("__SETTLE_DELAY__", &self.config.settle_delay_ms.to_string())
            .replace("__STYLE_PROPERTIES__", &style_properties);
        let result = self
            .tab
            .evaluate(&source, false)
            .map_err(|e| InspectorError::EvaluationFailed(format!("agent injection failed: {}", e)))?;

        match result.value {
            Some(value) if value.as_bool() == Some(true) => Ok(()),
            other => Err(InspectorError::EvaluationFailed(format!(
                "agent injection returned unexpected value: {:?}",
                other
            ))),
        }
    }

    /// Evaluate an expression guarded against a missing agent; None means
    /// the agent is gone (navigation wiped it)
    fn eval_agent(&self, call: &str, await_promise: bool) -> Result<Option<serde_json::Value>> {
        let expr = format!("window.__elementInspector ? window.__elementInspector.{} : null", call);
        let result = self
            .tab
            .evaluate(&expr, await_promise)
            .map_err(|e| InspectorError::EvaluationFailed(e.to_string()))?;

        match result.value {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => Ok(Some(value)),
        }
    }

    /// Arm inspect mode
    pub fn activate(&mut self) -> Result<()> {
        self.sync_state()?;
        if self.state.is_armed() {
            return Ok(());
        }
        self.dispatch(InspectorAction::ToggleSelectMode)?;
        Ok(())
    }

    /// Disarm inspect mode. A no-op when already idle; no listeners are
    /// removed twice and nothing errors.
    pub fn deactivate(&mut self) -> Result<()> {
        if !self.state.is_armed() {
            return Ok(());
        }
        self.sync_state()?;
        if self.state.is_armed() {
            self.dispatch(InspectorAction::ToggleSelectMode)?;
        }
        Ok(())
    }

    /// Tear down the page agent entirely: listeners, stylesheet, toolbar,
    /// and the page-global handle
    pub fn destroy(&mut self) -> Result<()> {
        // The agent may already be gone after a navigation; that is fine
        if let Err(e) = self.eval_agent("destroy()", false) {
            log::debug!("Agent teardown evaluate failed (already gone?): {}", e);
        }
        self.state.disarm();
        Ok(())
    }

    /// Send a control-plane action to the page agent.
    ///
    /// When the agent is unreachable (typically wiped by a navigation), it
    /// is re-injected and the action retried once; a second failure reports
    /// [`InspectorError::AgentUnreachable`].
    pub fn dispatch(&mut self, action: InspectorAction) -> Result<ActionResponse> {
        match self.try_dispatch(action) {
            Ok(response) => Ok(response),
            Err(first) => {
                log::warn!("Agent did not answer {} ({}); re-injecting and retrying", action.as_str(), first);
                self.inject_agent()
                    .map_err(|e| InspectorError::AgentUnreachable(format!("re-injection failed: {}", e)))?;
                self.try_dispatch(action)
                    .map_err(|e| InspectorError::AgentUnreachable(format!("retry failed: {}", e)))
            }
        }
    }

    fn try_dispatch(&mut self, action: InspectorAction) -> Result<ActionResponse> {
        let call = format!("dispatch('{}')", action.as_str());
        let value = self
            .eval_agent(&call, false)?
            .ok_or_else(|| InspectorError::EvaluationFailed("agent not present".to_string()))?;

        let json = value
            .as_str()
            .ok_or_else(|| InspectorError::EvaluationFailed("dispatch returned a non-string".to_string()))?;

        let response: ActionResponse = serde_json::from_str(json)
            .map_err(|e| InspectorError::EvaluationFailed(format!("bad dispatch response: {}", e)))?;

        self.sync_state()?;
        Ok(response)
    }

    /// Mirror the page agent's armed flag into the controller state
    fn sync_state(&mut self) -> Result<()> {
        if let Some(value) = self.eval_agent("isArmed()", false)? {
            match value.as_bool() {
                Some(true) => {
                    self.state.arm();
                }
                Some(false) => {
                    self.state.disarm();
                }
                None => {}
            }
        }
        Ok(())
    }

    /// Drain the agent's pending captures and complete each one.
    ///
    /// A capture that fails to complete (detached element) is logged and
    /// surfaced as a page notification; it never aborts the poll or the
    /// session.
    pub fn poll(&mut self) -> Result<Vec<ElementRecord>> {
        let Some(value) = self.eval_agent("takePending()", false)? else {
            return Ok(Vec::new());
        };

        let json = value
            .as_str()
            .ok_or_else(|| InspectorError::CapturePayloadInvalid("takePending returned a non-string".to_string()))?;

        let batch: PollBatch =
            serde_json::from_str(json).map_err(|e| InspectorError::CapturePayloadInvalid(e.to_string()))?;

        // The page side may have disarmed itself (one-shot click capture,
        // Escape) or been armed from the toolbar
        if batch.active {
            self.state.arm();
        } else {
            self.state.disarm();
        }

        let mut records = Vec::new();
        for raw in batch.captures {
            match self.complete_capture(raw) {
                Ok(record) => records.push(record),
                Err(e) => {
                    log::warn!("Capture failed: {}", e);
                    self.notify("Capture failed.", "error");
                }
            }
        }

        Ok(records)
    }

    /// Capture an element programmatically by CSS selector
    pub fn capture_selector(&mut self, selector: &str) -> Result<ElementRecord> {
        let literal = serde_json::to_string(selector)
            .map_err(|e| InspectorError::EvaluationFailed(format!("bad selector literal: {}", e)))?;

        let value = self
            .eval_agent(&format!("captureBySelector({})", literal), false)?
            .ok_or_else(|| InspectorError::AgentUnreachable("agent not present".to_string()))?;

        let json = value
            .as_str()
            .ok_or_else(|| InspectorError::CapturePayloadInvalid("capture returned a non-string".to_string()))?;

        if json.is_empty() {
            return Err(InspectorError::ElementNotFound(selector.to_string()));
        }

        let raw: RawCapture =
            serde_json::from_str(json).map_err(|e| InspectorError::CapturePayloadInvalid(e.to_string()))?;

        self.complete_capture(raw)
    }

    /// Turn a raw payload into a finished record, including the screenshot
    /// step. Screenshot failures never fail the capture.
    pub fn complete_capture(&mut self, raw: RawCapture) -> Result<ElementRecord> {
        let mut record = ElementRecord::from_capture(raw)?;

        let renderer_loaded = self.ensure_renderer().is_loaded();
        if renderer_loaded {
            match self.screenshot_last() {
                Ok(shot) => record.set_screenshot(shot, true),
                Err(e) => {
                    log::warn!("Screenshot capture failed: {}", e);
                    record.set_screenshot(None, true);
                }
            }
        } else {
            record.set_screenshot(None, false);
        }

        self.last_record = Some(record.clone());
        Ok(record)
    }

    /// Load the rendering library lazily, once per session. The degraded
    /// mode is announced a single time via a transient notification.
    pub fn ensure_renderer(&mut self) -> LoadOutcome {
        if let Some(outcome) = &self.renderer {
            return outcome.clone();
        }

        let outcome = self.loader.ensure_loaded(&self.tab);
        if !outcome.is_loaded() {
            self.notify("Screenshots unavailable due to site security policy", "error");
        }
        self.renderer = Some(outcome.clone());
        outcome
    }

    /// Screenshot the last selected element at 2x scale, sized to its
    /// rendered box. None when the renderer is absent or capture threw.
    pub fn screenshot_last(&mut self) -> Result<Option<ScreenshotAsset>> {
        let Some(value) = self.eval_agent("screenshotLast()", true)? else {
            return Ok(None);
        };

        match value.as_str() {
            Some("") | None => Ok(None),
            Some(data_url) => Ok(Some(ScreenshotAsset::from_data_url(data_url)?)),
        }
    }

    /// Re-capture the last selected element's screenshot and copy it to the
    /// clipboard as an image. Returns false (with a notification) when the
    /// renderer is unavailable or no element has been selected yet.
    pub fn take_screenshot(&mut self, clipboard: &mut ReportClipboard) -> Result<bool> {
        if !self.ensure_renderer().is_loaded() {
            self.notify("Screenshots unavailable due to site security policy", "error");
            return Ok(false);
        }

        match self.screenshot_last()? {
            Some(asset) => {
                let png = asset.png_bytes()?;
                clipboard.write_png(&png)?;
                self.notify("Screenshot copied to clipboard", "success");
                Ok(true)
            }
            None => {
                self.notify("No element selected for screenshot", "error");
                Ok(false)
            }
        }
    }

    /// Write a record's report (text) and screenshot (image) to the
    /// clipboard. The two writes fail independently; each failure is
    /// surfaced as its own notification and neither aborts the other.
    /// Returns the rendered report text.
    pub fn publish(&mut self, record: &ElementRecord, clipboard: &mut ReportClipboard) -> Result<String> {
        let text = report::format_report(record);

        match clipboard.write_text(&text) {
            Ok(()) => self.notify("Report copied to clipboard", "success"),
            Err(e) => {
                log::error!("{}", e);
                self.notify("Copy failed", "error");
            }
        }

        if let Some(screenshot) = &record.screenshot {
            let written = screenshot.png_bytes().and_then(|png| clipboard.write_png(&png));
            match written {
                Ok(()) => self.notify("Screenshot copied to clipboard", "success"),
                Err(e) => {
                    log::error!("{}", e);
                    self.notify("Screenshot copy failed", "error");
                }
            }
        }

        Ok(text)
    }

    /// Show a transient page notification; at most one is visible at a time
    pub fn notify(&self, message: &str, kind: &str) {
        let literal = serde_json::to_string(message).unwrap_or_else(|_| "\"\"".to_string());
        let call = format!("showNotification({}, '{}')", literal, kind);
        if let Err(e) = self.eval_agent(&call, false) {
            log::debug!("Notification failed: {}", e);
        }
    }
}
