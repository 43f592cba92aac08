//! Shareable text report rendering.
//!
//! Pure template rendering of an [`ElementRecord`] into a multi-section
//! markdown report. No I/O: the clipboard and notification steps live with
//! the inspector controller.

use crate::capture::ElementRecord;
use crate::summarize::truncate_str;

/// Text previews in the header are cut at this many characters
const TEXT_PREVIEW_LIMIT: usize = 200;

/// Child-type lines listed in the container statistics section
const REPORT_CHILD_TYPES: usize = 5;

/// Render the full text report for a captured element
pub fn format_report(record: &ElementRecord) -> String {
    let mut out = String::new();

    let title = if record.is_main_container { "Main Container Inspection" } else { "Element Inspection" };
    out.push_str(&format!("# {}\n\n", title));
    out.push_str(&format!("**URL:** {}\n", record.url));
    out.push_str(&format!("**Selector:** `{}`\n", record.selector));
    if !record.text.is_empty() {
        let preview = truncate_str(&record.text, TEXT_PREVIEW_LIMIT);
        let ellipsis = if preview.len() < record.text.len() { "..." } else { "" };
        out.push_str(&format!("**Text Content:** {}{}\n", preview, ellipsis));
    }

    if let Some(stats) = &record.container_stats {
        out.push_str("\n## Container Statistics\n\n");
        out.push_str(&format!("- **Total Children:** {}\n", stats.total_children));
        out.push_str(&format!("- **Content Size:** {}KB\n", stats.size_kb()));
        out.push_str(&format!("- **Nesting Depth:** {} levels\n", stats.nesting_depth));
        if !stats.child_types.is_empty() {
            out.push_str("- **Child Element Types:**\n");
            for (signature, count) in stats.top_child_types(REPORT_CHILD_TYPES) {
                out.push_str(&format!("  - {}x `{}`\n", count, signature));
            }
        }
    }

    if let Some(select) = &record.select {
        out.push_str("\n## Select Element Details\n\n");
        out.push_str(&format!("- **Selected Value:** `{}`\n", select.selected_value));
        out.push_str(&format!("- **Selected Text:** \"{}\"\n", select.selected_text));
        out.push_str(&format!("- **Selected Index:** {}\n", select.selected_index));
        out.push_str(&format!("- **Total Options:** {}\n", select.total_options()));
        out.push_str("\n### All Options\n\n");
        for (index, option) in select.options.iter().enumerate() {
            let marker = if option.selected { " [selected]" } else { "" };
            out.push_str(&format!("- {}: \"{}\" (value: `{}`){}\n", index, option.text, option.value, marker));
        }
    }

    out.push_str("\n## Element Location\n\n");
    out.push_str("### DOM Path\n\n```css\n");
    out.push_str(&record.location.dom_path);
    out.push_str("\n```\n\n### XPath\n\n```xpath\n");
    out.push_str(&record.location.xpath);
    out.push_str("\n```\n\n### Context\n\n");
    match &record.location.parent {
        Some(parent) => out.push_str(&format!("- **Parent:** `{}`\n", parent.selector)),
        None => out.push_str("- **Parent:** None (root)\n"),
    }
    let position = if record.location.is_first_child {
        "First"
    } else if record.location.is_last_child {
        "Last"
    } else {
        "Middle"
    };
    out.push_str(&format!(
        "- **Position:** {} of {} children ({})\n",
        record.location.sibling_index, record.location.total_siblings, position
    ));

    if !record.styles.is_empty() {
        out.push_str("\n## Computed Styles\n\n```css\n");
        out.push_str(&record.styles.as_css_rule(&record.selector));
        out.push_str("\n```\n");
    }

    let html_title = if record.is_main_container { "Container Structure Summary" } else { "HTML Structure" };
    out.push_str(&format!("\n## {}\n\n```html\n", html_title));
    out.push_str(&record.html);
    out.push_str("\n```\n\n");

    out.push_str(&screenshot_line(record));
    out.push('\n');

    out
}

/// The explicit screenshot-availability line; degraded mode is stated, not
/// silently omitted
fn screenshot_line(record: &ElementRecord) -> String {
    if record.has_screenshot() {
        "**Screenshot:** copied to the clipboard as a separate image.".to_string()
    } else if record.screenshot_supported {
        "**Screenshot:** capture failed; styles and markup were still collected.".to_string()
    } else {
        "**Screenshot:** unavailable - the rendering library could not be loaded.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::record::{RawCapture, ScreenshotAsset};
    use crate::capture::{AncestryStep, SelectInfo, SelectOption};
    use std::collections::HashMap;

    fn button_record() -> ElementRecord {
        let raw = RawCapture {
            tag: "button".to_string(),
            attributes: HashMap::from([("class".to_string(), "btn-primary".to_string())]),
            outer_html: r#"<button class="btn-primary">Save</button>"#.to_string(),
            text: "Save".to_string(),
            computed_styles: HashMap::from([("display".to_string(), "inline-block".to_string())]),
            ancestry: vec![
                AncestryStep::new("button").with_class("btn-primary"),
                AncestryStep::new("form"),
                AncestryStep::new("body"),
            ],
            sibling_index: 1,
            total_siblings: 2,
            child_count: 0,
            has_click_handler: false,
            in_dropdown_container: false,
            select: None,
            bounding_box: None,
            url: "https://example.com".to_string(),
            trigger: Default::default(),
            detached: false,
        };
        ElementRecord::from_capture(raw).expect("valid capture")
    }

    #[test]
    fn test_report_header() {
        let report = format_report(&button_record());

        assert!(report.starts_with("# Element Inspection\n"));
        assert!(report.contains("**URL:** https://example.com\n"));
        assert!(report.contains("**Selector:** `button.btn-primary`"));
        assert!(report.contains("**Text Content:** Save\n"));
    }

    #[test]
    fn test_report_location_section() {
        let report = format_report(&button_record());

        assert!(report.contains("form > button.btn-primary"));
        assert!(report.contains("/html/body/form[1]/button[1]"));
        assert!(report.contains("- **Parent:** `form`"));
        assert!(report.contains("- **Position:** 1 of 2 children (First)"));
    }

    #[test]
    fn test_report_styles_section() {
        let report = format_report(&button_record());
        assert!(report.contains("button.btn-primary {\n  display: inline-block;\n}"));
    }

    #[test]
    fn test_report_degraded_screenshot_line() {
        let report = format_report(&button_record());
        assert!(report.contains("**Screenshot:** unavailable - the rendering library could not be loaded."));
    }

    #[test]
    fn test_report_screenshot_states() {
        let mut record = button_record();

        record.set_screenshot(None, true);
        assert!(format_report(&record).contains("**Screenshot:** capture failed"));

        record.set_screenshot(Some(ScreenshotAsset { data: "aGk=".to_string() }), true);
        assert!(format_report(&record).contains("copied to the clipboard as a separate image"));
    }

    #[test]
    fn test_report_select_section() {
        let mut record = button_record();
        record.select = Some(SelectInfo {
            selected_value: "us".to_string(),
            selected_text: "United States".to_string(),
            selected_index: 1,
            options: vec![
                SelectOption { value: "ca".to_string(), text: "Canada".to_string(), selected: false },
                SelectOption { value: "us".to_string(), text: "United States".to_string(), selected: true },
            ],
        });

        let report = format_report(&record);
        assert!(report.contains("## Select Element Details"));
        assert!(report.contains("- **Selected Value:** `us`"));
        assert!(report.contains("- **Total Options:** 2"));
        assert!(report.contains("- 1: \"United States\" (value: `us`) [selected]"));
        assert!(report.contains("- 0: \"Canada\" (value: `ca`)\n"));
    }

    #[test]
    fn test_report_container_section() {
        let items: String = (0..50).map(|i| format!("<li>item {}</li>", i)).collect();
        let raw = RawCapture {
            tag: "div".to_string(),
            attributes: HashMap::from([("id".to_string(), "app".to_string())]),
            outer_html: format!(r#"<div id="app">{}</div>"#, items),
            child_count: 50,
            ancestry: vec![AncestryStep::new("div").with_id("app"), AncestryStep::new("body")],
            text: String::new(),
            computed_styles: HashMap::new(),
            sibling_index: 1,
            total_siblings: 1,
            has_click_handler: false,
            in_dropdown_container: false,
            select: None,
            bounding_box: None,
            url: "https://example.com/feed".to_string(),
            trigger: Default::default(),
            detached: false,
        };
        let record = ElementRecord::from_capture(raw).expect("valid capture");

        let report = format_report(&record);
        assert!(report.starts_with("# Main Container Inspection"));
        assert!(report.contains("## Container Statistics"));
        assert!(report.contains("- **Total Children:** 50"));
        assert!(report.contains("  - 50x `li`"));
        assert!(report.contains("## Container Structure Summary"));
    }

    #[test]
    fn test_report_is_deterministic() {
        let record = button_record();
        assert_eq!(format_report(&record), format_report(&record));
    }

    #[test]
    fn test_long_text_preview_is_truncated() {
        let mut record = button_record();
        record.text = "x".repeat(500);

        let report = format_report(&record);
        let line =
            report.lines().find(|l| l.starts_with("**Text Content:**")).expect("text line present");
        assert!(line.ends_with("..."));
        assert!(line.len() < 250);
    }
}
