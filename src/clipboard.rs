//! Clipboard output.
//!
//! Text reports and PNG screenshots are written separately and fail
//! independently; the two are never combined into one write.

use crate::error::{ClipboardKind, InspectorError, Result};
use arboard::Clipboard;

/// Writes inspection output to the OS clipboard
pub struct ReportClipboard {
    clipboard: Clipboard,
}

impl ReportClipboard {
    /// Open a clipboard handle
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().map_err(|e| InspectorError::ClipboardFailed {
            kind: ClipboardKind::Text,
            reason: format!("clipboard unavailable: {}", e),
        })?;
        Ok(Self { clipboard })
    }

    /// Write the plain-text report
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.clipboard.set_text(text).map_err(|e| InspectorError::ClipboardFailed {
            kind: ClipboardKind::Text,
            reason: e.to_string(),
        })
    }

    /// Write a PNG screenshot as an image
    pub fn write_png(&mut self, png_data: &[u8]) -> Result<()> {
        let img = image::load_from_memory(png_data)
            .map_err(|e| InspectorError::ClipboardFailed {
                kind: ClipboardKind::Image,
                reason: format!("PNG decode failed: {}", e),
            })?
            .to_rgba8();

        let image_data = arboard::ImageData {
            width: img.width() as usize,
            height: img.height() as usize,
            bytes: std::borrow::Cow::Owned(img.into_raw()),
        };

        self.clipboard.set_image(image_data).map_err(|e| InspectorError::ClipboardFailed {
            kind: ClipboardKind::Image,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Requires a display server / OS clipboard
    #[test]
    #[ignore]
    fn test_text_round_trip() {
        let mut clipboard = ReportClipboard::new().expect("clipboard available");
        clipboard.write_text("# Element Inspection").expect("text write works");

        let mut raw = Clipboard::new().expect("clipboard available");
        assert_eq!(raw.get_text().expect("text readable"), "# Element Inspection");
    }

    #[test]
    #[ignore]
    fn test_invalid_png_is_an_image_error() {
        let mut clipboard = ReportClipboard::new().expect("clipboard available");
        let err = clipboard.write_png(b"not a png").expect_err("bogus PNG rejected");
        assert!(matches!(err, InspectorError::ClipboardFailed { kind: ClipboardKind::Image, .. }));
    }
}
