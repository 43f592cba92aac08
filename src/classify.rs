//! Interactivity classification
//!
//! Decides whether an element is "interactive" (forms, links, ARIA roles,
//! dropdown triggers), which drives capture timing: interactive elements keep
//! their default behavior and are captured after a settle delay, everything
//! else is captured immediately.
//!
//! Each heuristic is a standalone predicate over [`ElementFacts`] so it can
//! be unit-tested on its own; [`is_interactive`] chains them in priority
//! order and returns true on the first match.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Form-control tags that always need their native click behavior
const FORM_CONTROL_TAGS: &[&str] = &["select", "input", "textarea", "button"];

/// ARIA roles treated as interactive
const INTERACTIVE_ROLES: &[&str] = &["button", "link", "menuitem", "option", "tab", "checkbox", "radio"];

/// Attributes that mark an element as a dropdown/toggle trigger
const DROPDOWN_MARKER_ATTRS: &[&str] = &["aria-haspopup", "data-toggle", "data-bs-toggle"];

/// Word-bounded class tokens that look interactive
static INTERACTIVE_CLASS_TOKENS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(btn|button|dropdown|menu|toggle|clickable|interactive)\b")
        .expect("interactive class token pattern is valid")
});

/// The capability description of a candidate element, as collected by the
/// page agent at event time. No live DOM reference is retained.
#[derive(Debug, Clone, Default)]
pub struct ElementFacts {
    /// Lowercased tag name
    pub tag: String,

    /// Attribute name -> value, names lowercased
    pub attributes: HashMap<String, String>,

    /// Whether a click handler was assigned as a DOM property
    /// (`element.onclick`), which never shows up as an attribute
    pub has_click_handler_property: bool,

    /// Whether the element sits inside a known menu/select/dropdown container
    pub in_dropdown_container: bool,
}

impl ElementFacts {
    /// Create facts for a bare element of the given tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into().to_ascii_lowercase(), ..Self::default() }
    }

    /// Builder method: add an attribute
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Builder method: mark a property-assigned click handler
    pub fn with_click_handler(mut self) -> Self {
        self.has_click_handler_property = true;
        self
    }

    /// Builder method: mark the element as living inside a dropdown container
    pub fn inside_dropdown(mut self) -> Self {
        self.in_dropdown_container = true;
        self
    }

    /// Get an attribute value by (lowercase) name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The class attribute, or "" when absent
    pub fn class_attr(&self) -> &str {
        self.attr("class").unwrap_or("")
    }
}

/// Form controls (`select`, `input`, `textarea`, `button`) definitely need
/// their click behavior
pub fn is_form_control(facts: &ElementFacts) -> bool {
    FORM_CONTROL_TAGS.contains(&facts.tag.as_str())
}

/// An anchor with an actual destination
pub fn is_link_with_destination(facts: &ElementFacts) -> bool {
    facts.tag == "a" && facts.attr("href").is_some_and(|href| !href.is_empty())
}

/// Explicit interactive ARIA role
pub fn has_interactive_role(facts: &ElementFacts) -> bool {
    facts.attr("role").is_some_and(|role| INTERACTIVE_ROLES.contains(&role))
}

/// A click handler, whether attribute or property assigned
pub fn has_click_handler(facts: &ElementFacts) -> bool {
    facts.has_click_handler_property || facts.attr("onclick").is_some()
}

/// Dropdown/toggle trigger markers (`aria-haspopup`, `data-toggle`, ...)
pub fn has_dropdown_marker(facts: &ElementFacts) -> bool {
    DROPDOWN_MARKER_ATTRS.iter().any(|attr| facts.attributes.contains_key(*attr))
}

/// Class attribute contains an interactive-looking token
pub fn has_interactive_class(facts: &ElementFacts) -> bool {
    INTERACTIVE_CLASS_TOKENS.is_match(&facts.class_attr().to_ascii_lowercase())
}

/// Explicit non-negative focus order (`tabindex` other than "-1")
pub fn has_focus_order(facts: &ElementFacts) -> bool {
    facts
        .attr("tabindex")
        .and_then(|t| t.trim().parse::<i32>().ok())
        .is_some_and(|t| t >= 0)
}

/// Whether the element should be treated as interactive for capture timing.
///
/// Pure function; returns true on the first matching heuristic, in priority
/// order, false if none match.
pub fn is_interactive(facts: &ElementFacts) -> bool {
    is_form_control(facts)
        || is_link_with_destination(facts)
        || has_interactive_role(facts)
        || has_click_handler(facts)
        || has_dropdown_marker(facts)
        || facts.in_dropdown_container
        || has_interactive_class(facts)
        || has_focus_order(facts)
}
