//! Pure recursive collapse of repeated sibling groups over a detached,
//! parsed tree. The input markup is never mutated; a new bounded string is
//! built up from a depth-first walk.

use super::GROUP_LIMIT;
use indexmap::IndexMap;
use scraper::{ElementRef, Html, Node};

/// Tags serialized without a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source", "track", "wbr",
];

/// Parse a snippet and re-serialize it with repeated sibling groups
/// collapsed. Returns None when the markup yields no element nodes at all,
/// in which case the caller falls back to string-level truncation.
pub(crate) fn collapse_html(html: &str) -> Option<String> {
    let fragment = Html::parse_fragment(html);
    let root = fragment.root_element();

    if !root.children().any(|child| child.value().is_element()) {
        return None;
    }

    let mut out = String::new();
    serialize_children(root, &mut out);
    Some(out)
}

/// Serialize a single node (element, text, or comment) to a new string
pub(crate) fn serialize_node_to_string(node: ego_tree::NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    serialize_node(node, &mut out);
    out
}

/// Signature used to group siblings: tag plus the full class string
pub(crate) fn group_key(element: ElementRef<'_>) -> String {
    format!("{}.{}", element.value().name(), element.value().attr("class").unwrap_or(""))
}

/// Human-readable signature: tag, qualified by the first class when present
pub(crate) fn display_signature(element: ElementRef<'_>) -> String {
    match element.value().attr("class").and_then(|c| c.split_whitespace().next()) {
        Some(first) => format!("{}.{}", element.value().name(), first),
        None => element.value().name().to_string(),
    }
}

fn serialize_node(node: ego_tree::NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(&html_escape::encode_text(&**text)),
        Node::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(&**comment);
            out.push_str("-->");
        }
        Node::Element(_) => {
            if let Some(element) = ElementRef::wrap(node) {
                serialize_element(element, out);
            }
        }
        _ => {}
    }
}

fn serialize_element(element: ElementRef<'_>, out: &mut String) {
    let tag = element.value().name();

    out.push('<');
    out.push_str(tag);
    for (name, value) in element.value().attrs() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(bounded_attr(name, value)));
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&tag) {
        return;
    }

    serialize_children(element, out);

    out.push_str("</");
    out.push_str(tag);
    out.push('>');
}

/// Oversized payload attributes are replaced by short placeholders during
/// serialization; everything else passes through
fn bounded_attr<'a>(name: &str, value: &'a str) -> &'a str {
    match name {
        "d" | "path" if value.len() >= 200 => "M0,0",
        "points" if value.len() >= 200 => "0,0",
        "style" if value.len() >= 300 => "/* truncated */",
        "class" if value.len() >= 200 => "truncated",
        _ => value,
    }
}

/// Serialize an element's children, collapsing oversized sibling groups.
///
/// With at most [`GROUP_LIMIT`] element children, every child node (text and
/// comments included) is kept in order. Beyond that, element children are
/// grouped by signature in first-appearance order; each group keeps its
/// first [`GROUP_LIMIT`] members (recursively collapsed) and the remainder
/// becomes a single marker comment with the omitted count.
pub(crate) fn serialize_children(parent: ElementRef<'_>, out: &mut String) {
    let element_children: Vec<_> = parent.children().filter(|n| n.value().is_element()).collect();

    if element_children.len() <= GROUP_LIMIT {
        for child in parent.children() {
            serialize_node(child, out);
        }
        return;
    }

    let mut groups: IndexMap<String, Vec<ego_tree::NodeRef<'_, Node>>> = IndexMap::new();
    for child in element_children {
        if let Some(element) = ElementRef::wrap(child) {
            groups.entry(group_key(element)).or_default().push(child);
        }
    }

    for members in groups.values() {
        for member in members.iter().take(GROUP_LIMIT) {
            serialize_node(*member, out);
            out.push('\n');
        }

        if members.len() > GROUP_LIMIT {
            let first = ElementRef::wrap(members[0]).expect("group members are elements");
            out.push_str(&format!(
                "<!-- ... and {} more similar {} elements ... -->\n",
                members.len() - GROUP_LIMIT,
                display_signature(first)
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_sibling_groups_are_kept_whole() {
        let html = r#"<ul><li class="row">a</li><li class="row">b</li><li class="row">c</li></ul>"#;
        let out = collapse_html(html).expect("valid markup");

        assert_eq!(out.matches("<li").count(), 3);
        assert!(!out.contains("more similar"));
    }

    #[test]
    fn test_oversized_group_keeps_five_plus_marker() {
        let items: String = (0..8).map(|i| format!(r#"<li class="row">item {}</li>"#, i)).collect();
        let html = format!("<ul>{}</ul>", items);

        let out = collapse_html(&html).expect("valid markup");
        assert_eq!(out.matches("<li").count(), 5);
        assert!(out.contains("3 more similar"));
        assert!(out.contains("li.row"));
    }

    #[test]
    fn test_groups_split_by_signature() {
        let rows: String = (0..7).map(|i| format!(r#"<li class="row">r{}</li>"#, i)).collect();
        let ads: String = (0..2).map(|i| format!(r#"<li class="ad">a{}</li>"#, i)).collect();
        let html = format!("<ul>{}{}</ul>", rows, ads);

        let out = collapse_html(&html).expect("valid markup");
        // 5 rows + marker, both ads intact
        assert_eq!(out.matches("<li").count(), 7);
        assert!(out.contains("2 more similar li.row"));
        assert!(!out.contains("more similar li.ad"));
    }

    #[test]
    fn test_nested_groups_collapse_depth_first() {
        let inner: String = (0..9).map(|i| format!("<span>s{}</span>", i)).collect();
        let html = format!(r#"<div><section class="wrap">{}</section></div>"#, inner);

        let out = collapse_html(&html).expect("valid markup");
        assert_eq!(out.matches("<span").count(), 5);
        assert!(out.contains("4 more similar span"));
    }

    #[test]
    fn test_long_attributes_bounded_during_serialization() {
        let html = format!(r#"<svg><path d="{}"></path></svg>"#, "L1,1 ".repeat(100));
        let out = collapse_html(&html).expect("valid markup");
        assert!(out.contains(r#"d="M0,0""#));
    }

    #[test]
    fn test_text_only_input_yields_none() {
        assert!(collapse_html("just some text").is_none());
        assert!(collapse_html("").is_none());
    }

    #[test]
    fn test_void_elements_have_no_closing_tag() {
        let out = collapse_html(r#"<p>before<br>after</p>"#).expect("valid markup");
        assert!(out.contains("<br>"));
        assert!(!out.contains("</br>"));
    }
}
