//! Multi-strategy loader for the optional in-page rendering library.
//!
//! Screenshots need html2canvas inside the page. Content-security policies
//! routinely block one injection route or another, so the loader walks an
//! ordered strategy list and the first success wins: a local file inlined
//! into the page, then a configured URL, then the public CDN. All strategies
//! failing is a degraded mode, not an error; callers keep working without
//! screenshots.

use crate::inspect::InspectorConfig;
use headless_chrome::Tab;
use std::path::PathBuf;
use std::sync::Arc;

/// Where the rendering library ended up coming from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadSource {
    /// Already present in the page's global scope
    AlreadyPresent,

    /// Inlined from a local file
    LocalFile,

    /// Loaded from the configured URL override
    ConfiguredUrl,

    /// Loaded from the public CDN
    Cdn,
}

/// Outcome of [`RendererLoader::ensure_loaded`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded(LoadSource),
    Unavailable,
}

impl LoadOutcome {
    /// Whether the rendering capability is usable
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// One entry in the ordered strategy list
#[derive(Debug, Clone, PartialEq, Eq)]
enum Strategy {
    /// Read a local file and evaluate its source directly in the page
    InlineFile(PathBuf),

    /// Inject a `<script src>` element and race its load/error events
    ScriptUrl(LoadSource, String),
}

/// Loads the rendering library into a page, tolerating CSP failures
#[derive(Debug, Clone)]
pub struct RendererLoader {
    local_path: Option<PathBuf>,
    url_override: Option<String>,
    cdn_url: String,
    load_timeout_ms: u64,
}

impl RendererLoader {
    /// Build a loader from the session config
    pub fn from_config(config: &InspectorConfig) -> Self {
        Self {
            local_path: config.renderer_path.clone(),
            url_override: config.renderer_url.clone(),
            cdn_url: config.renderer_cdn.clone(),
            load_timeout_ms: config.load_timeout_ms,
        }
    }

    /// The ordered strategy list, most preferred first
    fn strategies(&self) -> Vec<Strategy> {
        let mut strategies = Vec::new();
        if let Some(path) = &self.local_path {
            strategies.push(Strategy::InlineFile(path.clone()));
        }
        if let Some(url) = &self.url_override {
            strategies.push(Strategy::ScriptUrl(LoadSource::ConfiguredUrl, url.clone()));
        }
        strategies.push(Strategy::ScriptUrl(LoadSource::Cdn, self.cdn_url.clone()));
        strategies
    }

    /// Make the rendering library available in the page, if possible.
    ///
    /// Idempotent: resolves immediately when the library is already present.
    /// Never fails hard; every strategy error degrades to the next one, and
    /// exhausting the list yields [`LoadOutcome::Unavailable`].
    pub fn ensure_loaded(&self, tab: &Arc<Tab>) -> LoadOutcome {
        if renderer_present(tab) {
            return LoadOutcome::Loaded(LoadSource::AlreadyPresent);
        }

        for strategy in self.strategies() {
            let source = match &strategy {
                Strategy::InlineFile(_) => LoadSource::LocalFile,
                Strategy::ScriptUrl(source, _) => source.clone(),
            };

            if self.attempt(tab, &strategy) && renderer_present(tab) {
                log::info!("Rendering library loaded via {:?}", source);
                return LoadOutcome::Loaded(source);
            }

            log::debug!("Renderer load strategy {:?} failed, trying next", source);
        }

        log::warn!("All renderer load strategies failed; screenshots disabled");
        LoadOutcome::Unavailable
    }

    /// Run one strategy; false on any failure
    fn attempt(&self, tab: &Arc<Tab>, strategy: &Strategy) -> bool {
        match strategy {
            Strategy::InlineFile(path) => {
                let source = match std::fs::read_to_string(path) {
                    Ok(source) => source,
                    Err(e) => {
                        log::debug!("Cannot read renderer file {}: {}", path.display(), e);
                        return false;
                    }
                };
                tab.evaluate(&source, false).is_ok()
            }
            Strategy::ScriptUrl(_, url) => {
                let expr = script_injection_expr(url, self.load_timeout_ms);
                match tab.evaluate(&expr, true) {
                    Ok(result) => result.value.and_then(|v| v.as_bool()).unwrap_or(false),
                    Err(e) => {
                        log::debug!("Script injection evaluate failed for {}: {}", url, e);
                        false
                    }
                }
            }
        }
    }
}

/// Whether the library is already in the page's global scope
fn renderer_present(tab: &Arc<Tab>) -> bool {
    tab.evaluate("typeof window.html2canvas === 'function'", false)
        .ok()
        .and_then(|r| r.value)
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// Promise racing a script element's load/error events against a timeout
fn script_injection_expr(url: &str, timeout_ms: u64) -> String {
    let url_literal = serde_json::to_string(url).unwrap_or_else(|_| "\"\"".to_string());
    format!(
        r#"new Promise((resolve) => {{
    const script = document.createElement('script');
    script.src = {url};
    script.onload = () => resolve(true);
    script.onerror = () => resolve(false);
    setTimeout(() => resolve(false), {timeout});
    document.head.appendChild(script);
}})"#,
        url = url_literal,
        timeout = timeout_ms
    )
}
