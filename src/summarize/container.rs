//! Main-container detection and structural summaries.
//!
//! Large structural nodes (feeds, page wrappers, app roots) are reported as
//! a statistics-led summary instead of full markup: aggregate stats, the
//! opening tag, a child-signature breakdown, a bounded set of sample
//! children, and the closing tag.

use super::collapse::{self, display_signature};
use super::{GROUP_LIMIT, SIZE_THRESHOLD, truncate_str};
use crate::capture::record::ContainerStats;
use crate::classify::ElementFacts;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};

/// Direct-child count above which an element is a main container
const CHILD_COUNT_LIMIT: usize = 10;

/// Serialized size above which an element is a main container
const HTML_SIZE_LIMIT: usize = 10_000;

/// Tags that are page-level semantic containers on their own
const CONTAINER_TAGS: &[&str] = &["main", "body"];

/// Class display is cut beyond this many characters in the opening tag
const CLASS_DISPLAY_LIMIT: usize = 100;

/// Sample children larger than this are individually truncated
const SAMPLE_SIZE_LIMIT: usize = 500;
const SAMPLE_KEEP: usize = 300;

/// Number of child signatures listed in the breakdown
const BREAKDOWN_LIMIT: usize = 10;

static RE_CONTAINER_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new("container|wrapper|main|content|page|layout|grid|feed|list")
        .expect("container class pattern is valid")
});

static RE_CONTAINER_ID: Lazy<Regex> = Lazy::new(|| {
    Regex::new("container|wrapper|main|content|page|layout|root").expect("container id pattern is valid")
});

/// Whether an element should be summarized structurally instead of
/// serialized in full
pub fn is_main_container(facts: &ElementFacts, child_count: usize, html_len: usize) -> bool {
    child_count > CHILD_COUNT_LIMIT
        || html_len > HTML_SIZE_LIMIT
        || CONTAINER_TAGS.contains(&facts.tag.as_str())
        || RE_CONTAINER_CLASS.is_match(facts.class_attr())
        || facts.attr("id").is_some_and(|id| RE_CONTAINER_ID.is_match(id))
        || facts.attr("role") == Some("main")
}

/// Compute aggregate statistics for a container's outer HTML
pub fn container_stats(html: &str) -> ContainerStats {
    let fragment = Html::parse_fragment(html);
    let container = fragment.root_element().children().find_map(ElementRef::wrap);

    match container {
        Some(container) => stats_for(container, html.len()),
        None => ContainerStats { html_size: html.len(), ..ContainerStats::default() },
    }
}

fn stats_for(container: ElementRef<'_>, html_size: usize) -> ContainerStats {
    let mut child_types: IndexMap<String, usize> = IndexMap::new();
    let mut total_children = 0;

    for child in container.children().filter_map(ElementRef::wrap) {
        total_children += 1;
        *child_types.entry(display_signature(child)).or_insert(0) += 1;
    }

    ContainerStats { total_children, html_size, nesting_depth: nesting_depth(container), child_types }
}

/// Depth of the first-child chain, capped at 10 levels
fn nesting_depth(container: ElementRef<'_>) -> usize {
    let mut depth = 0;
    let mut current = container;
    while let Some(first_child) = current.children().find_map(ElementRef::wrap) {
        depth += 1;
        current = first_child;
        if depth >= 10 {
            break;
        }
    }
    depth
}

/// Render the structural summary of a main container from its outer HTML
pub fn container_summary(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let Some(container) = fragment.root_element().children().find_map(ElementRef::wrap) else {
        return super::hard_truncate(&super::truncate_attributes(html), SIZE_THRESHOLD);
    };

    let stats = stats_for(container, html.len());
    let tag = container.value().name();
    let mut out = String::new();

    out.push_str("<!-- MAIN CONTAINER SUMMARY -->\n");
    out.push_str(&format!("<!-- Total children: {} -->\n", stats.total_children));
    out.push_str(&format!("<!-- Content size: {}KB -->\n", stats.size_kb()));
    out.push_str(&format!("<!-- Nesting depth: {} levels -->\n\n", stats.nesting_depth));

    out.push_str(&format!("<{}", tag));
    if let Some(id) = container.value().attr("id").filter(|id| !id.is_empty()) {
        out.push_str(&format!(" id=\"{}\"", id));
    }
    if let Some(class) = container.value().attr("class").filter(|c| !c.is_empty()) {
        if class.len() > CLASS_DISPLAY_LIMIT {
            out.push_str(&format!(" class=\"{}...\"", truncate_str(class, CLASS_DISPLAY_LIMIT)));
        } else {
            out.push_str(&format!(" class=\"{}\"", class));
        }
    }
    for attr in ["role", "data-testid", "aria-label"] {
        if let Some(value) = container.value().attr(attr) {
            out.push_str(&format!(" {}=\"{}\"", attr, value));
        }
    }
    out.push_str(">\n\n");

    out.push_str("  <!-- CHILD ELEMENT BREAKDOWN -->\n");
    for (signature, count) in stats.top_child_types(BREAKDOWN_LIMIT) {
        out.push_str(&format!("  <!-- {}x {} -->\n", count, signature));
    }
    out.push('\n');

    serialize_sample_children(container, &mut out);

    out.push_str(&format!("</{}>", tag));
    out
}

/// Emit the container's children through the sibling-group collapse, with
/// each sample individually bounded
fn serialize_sample_children(container: ElementRef<'_>, out: &mut String) {
    let element_children: Vec<_> = container.children().filter(|n| n.value().is_element()).collect();

    if element_children.len() <= GROUP_LIMIT {
        for child in &element_children {
            emit_sample(*child, out);
        }
        return;
    }

    let mut groups: IndexMap<String, Vec<ego_tree::NodeRef<'_, scraper::Node>>> = IndexMap::new();
    for child in element_children {
        if let Some(element) = ElementRef::wrap(child) {
            groups.entry(collapse::group_key(element)).or_default().push(child);
        }
    }

    for members in groups.values() {
        for member in members.iter().take(GROUP_LIMIT) {
            emit_sample(*member, out);
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
    out.push('\n');
}

fn emit_sample(node: ego_tree::NodeRef<'_, scraper::Node>, out: &mut String) {
    let rendered = collapse::serialize_node_to_string(node);

    if rendered.len() > SAMPLE_SIZE_LIMIT {
        out.push_str(truncate_str(&rendered, SAMPLE_KEEP));
        out.push_str("\n  <!-- ... child content truncated ... -->\n");
        if let Some(element) = ElementRef::wrap(node) {
            out.push_str(&format!("</{}>", element.value().name()));
        }
    } else {
        out.push_str(&rendered);
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_html(children: usize) -> String {
        let items: String = (0..children).map(|i| format!("<li>item {}</li>", i)).collect();
        format!(r#"<div id="app">{}</div>"#, items)
    }

    #[test]
    fn test_child_count_triggers_main_container() {
        let facts = ElementFacts::new("div").with_attribute("id", "app");
        assert!(is_main_container(&facts, 50, 900));
        assert!(!is_main_container(&facts, 3, 900));
    }

    #[test]
    fn test_size_and_tag_triggers() {
        let div = ElementFacts::new("div");
        assert!(is_main_container(&div, 1, 20_000));

        let main = ElementFacts::new("main");
        assert!(is_main_container(&main, 0, 10));
    }

    #[test]
    fn test_token_and_role_triggers() {
        let wrapper = ElementFacts::new("div").with_attribute("class", "page-wrapper");
        assert!(is_main_container(&wrapper, 1, 10));

        let root_id = ElementFacts::new("div").with_attribute("id", "root");
        assert!(is_main_container(&root_id, 1, 10));

        let role_main = ElementFacts::new("section").with_attribute("role", "main");
        assert!(is_main_container(&role_main, 1, 10));

        let plain = ElementFacts::new("div").with_attribute("class", "card").with_attribute("id", "x17");
        assert!(!is_main_container(&plain, 1, 10));
    }

    #[test]
    fn test_container_stats() {
        let html = feed_html(12);
        let stats = container_stats(&html);

        assert_eq!(stats.total_children, 12);
        assert_eq!(stats.html_size, html.len());
        assert_eq!(stats.nesting_depth, 1);
        assert_eq!(stats.child_types.get("li"), Some(&12));
    }

    #[test]
    fn test_summary_of_fifty_item_feed() {
        let html = feed_html(50);
        let summary = container_summary(&html);

        assert!(summary.contains("Total children: 50"));
        assert_eq!(summary.matches("<li>").count(), 5);
        assert!(summary.contains("45 more similar"));
        assert!(summary.contains(r#"<div id="app">"#));
        assert!(summary.contains("  <!-- 50x li -->"));
        assert!(summary.ends_with("</div>"));
    }

    #[test]
    fn test_summary_keeps_small_child_sets_whole() {
        let html = r#"<main class="page"><header>h</header><section>s</section><footer>f</footer></main>"#;
        let summary = container_summary(&html);

        assert!(summary.contains("Total children: 3"));
        assert!(summary.contains("<header>h</header>"));
        assert!(summary.contains("<section>s</section>"));
        assert!(summary.contains("<footer>f</footer>"));
        assert!(!summary.contains("more similar"));
    }

    #[test]
    fn test_summary_truncates_long_class_display() {
        let class = "c".repeat(150);
        let html = format!(r#"<div class="{}"><p>a</p></div>"#, class);
        let summary = container_summary(&html);

        assert!(summary.contains(&format!(r#"class="{}...""#, "c".repeat(100))));
    }

    #[test]
    fn test_summary_bounds_oversized_samples() {
        let big_child = format!("<article><p>{}</p></article>", "long text ".repeat(100));
        let html = format!(r#"<div id="content">{}</div>"#, big_child);
        let summary = container_summary(&html);

        assert!(summary.contains("child content truncated"));
        assert!(summary.contains("</article>"));
    }
}
