//! Structural location of a captured element: CSS selector, DOM path, XPath,
//! and parent/sibling context. Computed once from the ancestry facts reported
//! by the page agent; never mutated afterwards.

use serde::{Deserialize, Serialize};

/// One step on the path from the element to the document root, as reported
/// by the page agent. The first step is the element itself; the last is
/// `<body>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AncestryStep {
    /// Lowercased tag name
    pub tag: String,

    /// id attribute, when present and non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// class attribute, when present and non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// 1-based position among same-tag element siblings
    #[serde(default = "default_index")]
    pub same_tag_index: usize,

    /// Number of same-tag element siblings, including this one
    #[serde(default = "default_index")]
    pub same_tag_count: usize,
}

fn default_index() -> usize {
    1
}

impl AncestryStep {
    /// Create a step for a bare tag
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), id: None, class: None, same_tag_index: 1, same_tag_count: 1 }
    }

    /// Builder method: set the id attribute
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Builder method: set the class attribute
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    /// Builder method: set the same-tag sibling position
    pub fn with_position(mut self, index: usize, count: usize) -> Self {
        self.same_tag_index = index;
        self.same_tag_count = count;
        self
    }
}

/// Summary of the captured element's parent
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParentInfo {
    pub tag: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Short CSS selector for the parent
    pub selector: String,
}

/// Structural context for a captured element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocationInfo {
    /// Parent element summary; None when the element is the document body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<ParentInfo>,

    /// 1-based position among all element siblings
    pub sibling_index: usize,

    /// Total number of element siblings, including this one
    pub total_siblings: usize,

    pub is_first_child: bool,
    pub is_last_child: bool,

    /// CSS-selector chain from the nearest id-bearing ancestor (or body)
    /// down to the element
    pub dom_path: String,

    /// Absolute XPath with same-tag sibling indexing
    pub xpath: String,
}

impl LocationInfo {
    /// Derive location info from the ancestry chain and sibling facts.
    ///
    /// `ancestry` runs from the element itself up to `<body>` inclusive.
    /// Deterministic: the same input always yields identical strings.
    pub fn from_ancestry(ancestry: &[AncestryStep], sibling_index: usize, total_siblings: usize) -> Self {
        let parent = ancestry.get(1).map(|step| ParentInfo {
            tag: step.tag.clone(),
            id: step.id.clone(),
            class: step.class.clone(),
            selector: element_selector(&step.tag, step.id.as_deref(), step.class.as_deref()),
        });

        Self {
            parent,
            sibling_index,
            total_siblings,
            is_first_child: sibling_index == 1,
            is_last_child: sibling_index == total_siblings,
            dom_path: dom_path(ancestry),
            xpath: xpath(ancestry),
        }
    }
}

/// Short CSS selector for an element: `#id` wins outright, otherwise the tag
/// qualified with every class
pub fn element_selector(tag: &str, id: Option<&str>, class: Option<&str>) -> String {
    if let Some(id) = id {
        if !id.is_empty() {
            return format!("#{}", id);
        }
    }

    let mut selector = tag.to_string();
    if let Some(class) = class {
        for c in class.split_whitespace() {
            selector.push('.');
            selector.push_str(c);
        }
    }
    selector
}

/// Build the DOM path: a CSS-selector chain from root-most to the element,
/// ascending until `<body>` or an id-qualified ancestor, whichever comes
/// first (an id is unique, so ascent stops there)
pub fn dom_path(ancestry: &[AncestryStep]) -> String {
    let mut parts: Vec<String> = Vec::new();

    for step in ancestry {
        if step.tag == "body" && !parts.is_empty() {
            break;
        }

        if let Some(id) = step.id.as_deref().filter(|id| !id.is_empty()) {
            parts.push(format!("{}#{}", step.tag, id));
            break;
        }

        let mut selector = step.tag.clone();
        if let Some(class) = step.class.as_deref() {
            for c in class.split_whitespace() {
                selector.push('.');
                selector.push_str(c);
            }
        }
        if step.same_tag_count > 1 {
            selector.push_str(&format!(":nth-of-type({})", step.same_tag_index));
        }
        parts.push(selector);

        if step.tag == "body" {
            break;
        }
    }

    parts.reverse();
    parts.join(" > ")
}

/// Build the absolute XPath, rooted at `/html/body`, indexing each step
/// among its same-tag siblings
pub fn xpath(ancestry: &[AncestryStep]) -> String {
    let mut path = String::from("/html/body");

    let below_body: Vec<&AncestryStep> = ancestry.iter().take_while(|step| step.tag != "body").collect();

    for step in below_body.iter().rev() {
        path.push_str(&format!("/{}[{}]", step.tag, step.same_tag_index));
    }

    path
}
