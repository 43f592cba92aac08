//! # element-inspector
//!
//! A Rust library for visually inspecting DOM elements on live pages via the
//! Chrome DevTools Protocol (CDP). Pick any element on a page, extract a
//! structured description of it (HTML snippet, computed CSS, DOM/XPath
//! location, optional screenshot), and copy a shareable text report to the
//! clipboard.
//!
//! ## How it works
//!
//! A small page agent (embedded JavaScript) is injected into the target tab.
//! It draws the hover highlight, arms the capture listeners (right-click
//! captures repeatedly; left-click on non-interactive elements captures once
//! and disarms; left-click on interactive elements lets the widget open
//! first, then captures whatever expanded), and queues raw element facts.
//! The controller polls that queue and derives everything else in Rust:
//! interactivity classification, main-container summarization, computed-style
//! filtering, DOM path/XPath generation, report formatting, and clipboard
//! writes.
//!
//! Screenshots are optional: a multi-strategy loader tries to bring the
//! rendering library into the page (local file, configured URL, public CDN)
//! and the session degrades to no-screenshot mode when every strategy is
//! blocked by the site's content-security policy.
//!
//! ## Example
//!
//! ```rust,no_run
//! use element_inspector::{BrowserSession, Inspector, InspectorConfig, LaunchOptions};
//!
//! # fn main() -> element_inspector::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! session.navigate("https://example.com")?;
//! session.wait_for_navigation()?;
//!
//! let mut inspector = Inspector::attach(&session, InspectorConfig::default())?;
//! inspector.activate()?;
//!
//! // The user right-clicks elements on the page; poll for the captures
//! let records = inspector.poll()?;
//! for record in &records {
//!     println!("{}", element_inspector::report::format_report(record));
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Browser session management and configuration
//! - [`inspect`]: The inspection session controller, page agent, renderer loader
//! - [`capture`]: Captured element snapshots (records, location, styles)
//! - [`classify`]: Interactivity classification predicates
//! - [`summarize`]: HTML cleaning, sibling-group collapse, container summaries
//! - [`report`]: Text report rendering
//! - [`clipboard`]: Text and image clipboard output
//! - [`error`]: Error types and result aliases

pub mod browser;
pub mod capture;
pub mod classify;
pub mod clipboard;
pub mod error;
pub mod inspect;
pub mod report;
pub mod summarize;

pub use browser::{BrowserSession, ConnectionOptions, LaunchOptions};
pub use capture::{ElementRecord, LocationInfo, RawCapture, ScreenshotAsset, SelectInfo, StyleSnapshot};
pub use clipboard::ReportClipboard;
pub use error::{InspectorError, Result};
pub use inspect::{InspectMode, Inspector, InspectorAction, InspectorConfig, LoadOutcome};
