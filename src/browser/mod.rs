//! Browser session management and configuration
//!
//! Wraps launching or connecting to a Chrome/Chromium instance and resolving
//! the active tab that inspection runs against.

pub mod config;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use session::BrowserSession;
