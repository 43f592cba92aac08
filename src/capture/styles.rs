//! Computed-style snapshots.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Fixed allow-list of CSS properties worth reporting, in output order
pub const STYLE_PROPERTIES: &[&str] = &[
    "display", "position", "top", "right", "bottom", "left",
    "width", "height", "margin", "padding", "border", "border-radius",
    "background", "background-color", "background-image", "background-size",
    "color", "font-family", "font-size", "font-weight", "line-height",
    "text-align", "text-decoration", "opacity", "visibility",
    "z-index", "overflow", "transform", "transition", "animation",
    "box-shadow", "flex", "grid", "justify-content", "align-items",
];

/// Values that carry no information and are dropped from the snapshot
const NOOP_VALUES: &[&str] = &["none", "initial", "auto", "normal", ""];

/// Immutable mapping from allow-listed CSS property names to their computed
/// values at capture time. Built once; insertion order follows
/// [`STYLE_PROPERTIES`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct StyleSnapshot {
    properties: IndexMap<String, String>,
}

impl StyleSnapshot {
    /// Build a snapshot from the full computed-style map reported by the
    /// page, keeping only allow-listed properties with meaningful values
    pub fn from_computed(computed: &HashMap<String, String>) -> Self {
        let mut properties = IndexMap::new();
        for &prop in STYLE_PROPERTIES {
            if let Some(value) = computed.get(prop) {
                if !NOOP_VALUES.contains(&value.trim()) {
                    properties.insert(prop.to_string(), value.clone());
                }
            }
        }
        Self { properties }
    }

    /// Number of retained properties
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Whether no properties survived filtering
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Get a property value
    pub fn get(&self, property: &str) -> Option<&str> {
        self.properties.get(property).map(String::as_str)
    }

    /// Iterate over (property, value) pairs in allow-list order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.properties.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Render the snapshot as a CSS rule for the given selector
    pub fn as_css_rule(&self, selector: &str) -> String {
        let mut css = format!("{} {{\n", selector);
        for (prop, value) in self.iter() {
            css.push_str(&format!("  {}: {};\n", prop, value));
        }
        css.push('}');
        css
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn computed(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_sentinels_are_dropped() {
        let snapshot = StyleSnapshot::from_computed(&computed(&[
            ("display", "flex"),
            ("position", "static"),
            ("transform", "none"),
            ("width", "auto"),
            ("font-weight", "normal"),
            ("color", ""),
        ]));

        assert_eq!(snapshot.get("display"), Some("flex"));
        assert_eq!(snapshot.get("position"), Some("static"));
        assert_eq!(snapshot.get("transform"), None);
        assert_eq!(snapshot.get("width"), None);
        assert_eq!(snapshot.get("font-weight"), None);
        assert_eq!(snapshot.get("color"), None);
    }

    #[test]
    fn test_unlisted_properties_are_ignored() {
        let snapshot = StyleSnapshot::from_computed(&computed(&[
            ("display", "block"),
            ("caret-color", "red"),
        ]));

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.get("caret-color"), None);
    }

    #[test]
    fn test_order_follows_allow_list() {
        let snapshot = StyleSnapshot::from_computed(&computed(&[
            ("color", "red"),
            ("display", "block"),
            ("position", "absolute"),
        ]));

        let keys: Vec<&str> = snapshot.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["display", "position", "color"]);
    }

    #[test]
    fn test_as_css_rule() {
        let snapshot = StyleSnapshot::from_computed(&computed(&[
            ("display", "flex"),
            ("color", "rgb(0, 0, 0)"),
        ]));

        let css = snapshot.as_css_rule("button.btn-primary");
        assert!(css.starts_with("button.btn-primary {\n"));
        assert!(css.contains("  display: flex;\n"));
        assert!(css.contains("  color: rgb(0, 0, 0);\n"));
        assert!(css.ends_with("}"));
    }
}
