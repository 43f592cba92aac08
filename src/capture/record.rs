//! Captured element snapshots.
//!
//! An [`ElementRecord`] is a complete, self-contained, immutable snapshot of
//! one captured element. Nothing in it refers back into the live DOM, so a
//! record stays valid no matter how the page mutates after capture.

use crate::capture::location::{AncestryStep, LocationInfo};
use crate::capture::styles::StyleSnapshot;
use crate::classify::{self, ElementFacts};
use crate::error::{InspectorError, Result};
use crate::summarize;
use base64::Engine;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bounding box of an element's rendered box, in CSS pixels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Create a new BoundingBox
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Check if the bounding box has a visible area
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// What triggered a capture
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CaptureTrigger {
    /// Right-click while armed (repeatable)
    #[default]
    RightClick,

    /// Direct left-click on a non-interactive element (one-shot)
    Click,

    /// Left-click on an interactive element, captured after the settle delay
    DelayedClick,

    /// Programmatic capture by CSS selector
    Programmatic,
}

/// One `<option>` of a captured select control
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,

    #[serde(default)]
    pub selected: bool,
}

/// Full state of a captured `<select>` control
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SelectInfo {
    #[serde(default)]
    pub selected_value: String,

    #[serde(default)]
    pub selected_text: String,

    /// -1 when nothing is selected
    #[serde(default)]
    pub selected_index: i32,

    #[serde(default)]
    pub options: Vec<SelectOption>,
}

impl SelectInfo {
    /// Total number of options
    pub fn total_options(&self) -> usize {
        self.options.len()
    }
}

/// Aggregate statistics for a main container
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ContainerStats {
    /// Number of direct element children
    pub total_children: usize,

    /// Serialized size of the container's outer HTML in bytes
    pub html_size: usize,

    /// Depth of the first-child chain, capped at 10
    pub nesting_depth: usize,

    /// Child signature (tag, optionally qualified by first class) -> count,
    /// in first-seen order
    #[serde(default)]
    pub child_types: IndexMap<String, usize>,
}

impl ContainerStats {
    /// Approximate content size in whole kilobytes
    pub fn size_kb(&self) -> usize {
        ((self.html_size as f64) / 1024.0).round() as usize
    }

    /// The `limit` most frequent child signatures, count descending
    /// (insertion order breaks ties)
    pub fn top_child_types(&self, limit: usize) -> Vec<(&str, usize)> {
        let mut entries: Vec<(&str, usize)> = self.child_types.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries.truncate(limit);
        entries
    }
}

/// Optional PNG screenshot of the captured element's rendered box
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScreenshotAsset {
    /// Base64-encoded PNG bytes (no data-URL prefix)
    pub data: String,
}

impl ScreenshotAsset {
    /// Build from a `data:image/png;base64,...` URL as returned by the page
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let data = data_url
            .strip_prefix("data:image/png;base64,")
            .ok_or_else(|| InspectorError::ScreenshotInvalid("not a PNG data URL".to_string()))?;

        if data.is_empty() {
            return Err(InspectorError::ScreenshotInvalid("empty image data".to_string()));
        }

        Ok(Self { data: data.to_string() })
    }

    /// Decode to raw PNG bytes
    pub fn png_bytes(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.data)
            .map_err(|e| InspectorError::ScreenshotInvalid(format!("base64 decode failed: {}", e)))
    }
}

/// The raw facts collected by the page agent at capture time. This is the
/// serde boundary between the injected JavaScript and Rust; everything past
/// this point is derived by pure functions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCapture {
    /// Lowercased tag name; empty when the element could not be read
    #[serde(default)]
    pub tag: String,

    /// Attribute name -> value, names lowercased
    #[serde(default)]
    pub attributes: HashMap<String, String>,

    #[serde(default)]
    pub outer_html: String,

    /// Trimmed innerText
    #[serde(default)]
    pub text: String,

    /// Full computed-style map as reported by getComputedStyle
    #[serde(default)]
    pub computed_styles: HashMap<String, String>,

    /// Path from the element itself up to `<body>` inclusive
    #[serde(default)]
    pub ancestry: Vec<AncestryStep>,

    /// 1-based position among all element siblings
    #[serde(default = "default_sibling")]
    pub sibling_index: usize,

    #[serde(default = "default_sibling")]
    pub total_siblings: usize,

    /// Number of direct element children
    #[serde(default)]
    pub child_count: usize,

    /// Click handler assigned as a DOM property
    #[serde(default)]
    pub has_click_handler: bool,

    /// Inside a known menu/select/dropdown container
    #[serde(default)]
    pub in_dropdown_container: bool,

    /// Present only for `<select>` elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<SelectInfo>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,

    /// Page URL at capture time
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub trigger: CaptureTrigger,

    /// Set by the agent when the element left the document before its
    /// metadata could be read
    #[serde(default)]
    pub detached: bool,
}

fn default_sibling() -> usize {
    1
}

impl RawCapture {
    /// The capability description used by the classifier and the
    /// main-container heuristics
    pub fn element_facts(&self) -> ElementFacts {
        ElementFacts {
            tag: self.tag.to_ascii_lowercase(),
            attributes: self.attributes.clone(),
            has_click_handler_property: self.has_click_handler,
            in_dropdown_container: self.in_dropdown_container,
        }
    }
}

/// A complete captured snapshot of one element
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ElementRecord {
    /// Lowercased tag name
    pub tag: String,

    /// Outer HTML, cleaned; a structural summary for main containers
    pub html: String,

    /// Short CSS selector (`#id` or `tag.classes`)
    pub selector: String,

    /// Page URL at capture time
    pub url: String,

    /// Trimmed text content
    pub text: String,

    /// Classifier verdict for this element
    pub interactive: bool,

    /// Whether the element was summarized as a main container
    pub is_main_container: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_stats: Option<ContainerStats>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<SelectInfo>,

    pub location: LocationInfo,

    pub styles: StyleSnapshot,

    /// Whether the rendering library was available when this record was made
    pub screenshot_supported: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<ScreenshotAsset>,

    pub trigger: CaptureTrigger,
}

impl ElementRecord {
    /// Derive a record from the raw page facts. Pure except for the error
    /// path: a detached/unreadable element is the only failure.
    pub fn from_capture(raw: RawCapture) -> Result<Self> {
        if raw.detached || raw.tag.is_empty() {
            return Err(InspectorError::DetachedElement);
        }

        let facts = raw.element_facts();
        let interactive = classify::is_interactive(&facts);
        let is_main_container = summarize::is_main_container(&facts, raw.child_count, raw.outer_html.len());

        let (html, container_stats) = if is_main_container {
            (summarize::container_summary(&raw.outer_html), Some(summarize::container_stats(&raw.outer_html)))
        } else {
            (summarize::clean_html(&raw.outer_html), None)
        };

        let selector = crate::capture::location::element_selector(
            &facts.tag,
            facts.attr("id").filter(|id| !id.is_empty()),
            facts.attr("class").filter(|c| !c.is_empty()),
        );

        let location = LocationInfo::from_ancestry(&raw.ancestry, raw.sibling_index, raw.total_siblings);
        let styles = StyleSnapshot::from_computed(&raw.computed_styles);

        Ok(Self {
            tag: facts.tag,
            html,
            selector,
            url: raw.url,
            text: raw.text,
            interactive,
            is_main_container,
            container_stats,
            select: raw.select,
            location,
            styles,
            screenshot_supported: false,
            screenshot: None,
            trigger: raw.trigger,
        })
    }

    /// Record the screenshot step's outcome. A missing asset with
    /// `supported` set means capture was attempted and failed; the record
    /// stays valid either way.
    pub fn set_screenshot(&mut self, screenshot: Option<ScreenshotAsset>, supported: bool) {
        self.screenshot = screenshot;
        self.screenshot_supported = supported;
    }

    /// Whether a screenshot was actually captured
    pub fn has_screenshot(&self) -> bool {
        self.screenshot.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::location::AncestryStep;

    fn button_capture() -> RawCapture {
        RawCapture {
            tag: "button".to_string(),
            attributes: HashMap::from([("class".to_string(), "btn-primary".to_string())]),
            outer_html: r#"<button class="btn-primary">Save</button>"#.to_string(),
            text: "Save".to_string(),
            computed_styles: HashMap::from([("display".to_string(), "inline-block".to_string())]),
            ancestry: vec![
                AncestryStep::new("button").with_class("btn-primary"),
                AncestryStep::new("form").with_class("editor"),
                AncestryStep::new("body"),
            ],
            sibling_index: 2,
            total_siblings: 3,
            child_count: 0,
            has_click_handler: false,
            in_dropdown_container: false,
            select: None,
            bounding_box: Some(BoundingBox::new(10.0, 20.0, 80.0, 30.0)),
            url: "https://example.com/editor".to_string(),
            trigger: CaptureTrigger::RightClick,
            detached: false,
        }
    }

    #[test]
    fn test_button_record() {
        let record = ElementRecord::from_capture(button_capture()).expect("valid capture");

        assert_eq!(record.tag, "button");
        assert_eq!(record.selector, "button.btn-primary");
        assert!(record.interactive);
        assert!(!record.is_main_container);
        assert!(record.container_stats.is_none());
        assert_eq!(record.styles.get("display"), Some("inline-block"));
        assert_eq!(record.location.dom_path, "form.editor > button.btn-primary");
        assert_eq!(record.location.xpath, "/html/body/form[1]/button[1]");
        assert!(!record.has_screenshot());
    }

    #[test]
    fn test_detached_element_is_an_error() {
        let mut raw = button_capture();
        raw.detached = true;
        assert!(matches!(ElementRecord::from_capture(raw), Err(InspectorError::DetachedElement)));

        let empty = RawCapture { tag: String::new(), ..button_capture() };
        assert!(ElementRecord::from_capture(empty).is_err());
    }

    #[test]
    fn test_main_container_record_gets_summary_and_stats() {
        let items: String = (0..50).map(|i| format!("<li>item {}</li>", i)).collect();
        let raw = RawCapture {
            tag: "div".to_string(),
            attributes: HashMap::from([("id".to_string(), "app".to_string())]),
            outer_html: format!(r#"<div id="app">{}</div>"#, items),
            child_count: 50,
            ancestry: vec![AncestryStep::new("div").with_id("app"), AncestryStep::new("body")],
            ..button_capture()
        };

        let record = ElementRecord::from_capture(raw).expect("valid capture");
        assert!(record.is_main_container);
        assert_eq!(record.selector, "#app");
        assert!(record.html.contains("Total children: 50"));
        assert!(record.html.contains("45 more similar"));

        let stats = record.container_stats.expect("container stats present");
        assert_eq!(stats.total_children, 50);
    }

    #[test]
    fn test_screenshot_flags() {
        let mut record = ElementRecord::from_capture(button_capture()).expect("valid capture");

        // Renderer available but capture threw
        record.set_screenshot(None, true);
        assert!(record.screenshot_supported);
        assert!(!record.has_screenshot());

        record.set_screenshot(Some(ScreenshotAsset { data: "aGk=".to_string() }), true);
        assert!(record.has_screenshot());
    }

    #[test]
    fn test_screenshot_asset_from_data_url() {
        let asset = ScreenshotAsset::from_data_url("data:image/png;base64,aGVsbG8=").expect("valid data url");
        assert_eq!(asset.png_bytes().expect("decodes"), b"hello");

        assert!(ScreenshotAsset::from_data_url("data:image/jpeg;base64,xxxx").is_err());
        assert!(ScreenshotAsset::from_data_url("data:image/png;base64,").is_err());
    }

    #[test]
    fn test_container_stats_top_child_types() {
        let stats = ContainerStats {
            total_children: 10,
            html_size: 2048,
            nesting_depth: 2,
            child_types: IndexMap::from([
                ("li.item".to_string(), 3),
                ("div.ad".to_string(), 6),
                ("p".to_string(), 1),
            ]),
        };

        assert_eq!(stats.size_kb(), 2);
        let top = stats.top_child_types(2);
        assert_eq!(top, vec![("div.ad", 6), ("li.item", 3)]);
    }

    #[test]
    fn test_raw_capture_deserializes_from_agent_json() {
        let json = r#"{
            "tag": "select",
            "attributes": {"name": "country"},
            "outer_html": "<select name=\"country\"><option>US</option></select>",
            "text": "US",
            "sibling_index": 1,
            "total_siblings": 1,
            "url": "https://example.com",
            "trigger": "delayed_click",
            "select": {
                "selected_value": "US",
                "selected_text": "US",
                "selected_index": 0,
                "options": [{"value": "US", "text": "US", "selected": true}]
            }
        }"#;

        let raw: RawCapture = serde_json::from_str(json).expect("agent payload parses");
        assert_eq!(raw.trigger, CaptureTrigger::DelayedClick);
        let select = raw.select.expect("select info");
        assert_eq!(select.total_options(), 1);
        assert!(select.options[0].selected);
    }
}
