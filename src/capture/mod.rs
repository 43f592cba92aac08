//! Element capture data model
//!
//! Everything a capture produces lives here:
//! - RawCapture: the serde payload collected by the page agent
//! - ElementRecord: the derived, immutable snapshot
//! - LocationInfo: DOM path, XPath, and parent/sibling context
//! - StyleSnapshot: allow-listed computed styles
//! - ScreenshotAsset: optional base64 PNG of the element's rendered box

pub mod location;
pub mod record;
pub mod styles;

pub use location::{AncestryStep, LocationInfo, ParentInfo, dom_path, element_selector, xpath};
pub use record::{
    BoundingBox, CaptureTrigger, ContainerStats, ElementRecord, RawCapture, ScreenshotAsset, SelectInfo,
    SelectOption,
};
pub use styles::{STYLE_PROPERTIES, StyleSnapshot};
