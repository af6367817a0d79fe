//! Static platform/browser capture geometry.
//!
//! Each supported (platform, browser) pair maps to a capture origin (where
//! the browser content area starts on screen) and a chrome-crop offset. The
//! lookup is checked: a pair with no entry is a configuration error, not a
//! silent fallback.

use crate::error::RecorderError;
use siterec_types::{BrowserKind, PixelOffset, Platform};

/// Capture geometry for one (platform, browser) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenOffset {
    /// Top-left corner of the browser content area on the captured display.
    pub origin: PixelOffset,
    /// Height/width of window chrome to crop out of the recording.
    pub offset: PixelOffset,
}

impl ScreenOffset {
    const fn new(origin_x: i32, origin_y: i32, offset_x: i32, offset_y: i32) -> Self {
        Self {
            origin: PixelOffset {
                x: origin_x,
                y: origin_y,
            },
            offset: PixelOffset {
                x: offset_x,
                y: offset_y,
            },
        }
    }
}

/// Look up the capture geometry for a (platform, browser) pair.
///
/// Returns `RecorderError::MissingOffset` for pairs with no entry (for
/// example Safari anywhere but macOS).
pub fn screen_offset(
    platform: Platform,
    browser: BrowserKind,
) -> Result<ScreenOffset, RecorderError> {
    use BrowserKind::*;
    use Platform::*;

    let entry = match (platform, browser) {
        (Linux, Firefox) => ScreenOffset::new(0, 71, 0, 168),
        (Linux, Chrome) => ScreenOffset::new(0, 66, 0, 66),
        (Windows, Firefox) => ScreenOffset::new(0, 71, 0, 168),
        (Windows, Chrome) => ScreenOffset::new(0, 66, 0, 66),
        (Windows, Edge) => ScreenOffset::new(0, 66, 0, 84),
        (MacOs, Firefox) => ScreenOffset::new(0, 71, 0, 80),
        (MacOs, Chrome) => ScreenOffset::new(0, 66, 0, 80),
        (MacOs, Edge) => ScreenOffset::new(0, 66, 0, 84),
        (MacOs, Safari) => ScreenOffset::new(0, 66, 0, 66),
        (platform, browser) => return Err(RecorderError::MissingOffset { platform, browser }),
    };

    Ok(entry)
}

/// Browsers with a geometry entry on the given platform.
pub fn supported_browsers(platform: Platform) -> Vec<BrowserKind> {
    [
        BrowserKind::Firefox,
        BrowserKind::Chrome,
        BrowserKind::Edge,
        BrowserKind::Safari,
    ]
    .into_iter()
    .filter(|browser| screen_offset(platform, *browser).is_ok())
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_table_entries_resolve() {
        let pairs = [
            (Platform::Linux, BrowserKind::Firefox),
            (Platform::Linux, BrowserKind::Chrome),
            (Platform::Windows, BrowserKind::Firefox),
            (Platform::Windows, BrowserKind::Chrome),
            (Platform::Windows, BrowserKind::Edge),
            (Platform::MacOs, BrowserKind::Firefox),
            (Platform::MacOs, BrowserKind::Chrome),
            (Platform::MacOs, BrowserKind::Edge),
            (Platform::MacOs, BrowserKind::Safari),
        ];
        for (platform, browser) in pairs {
            let entry = screen_offset(platform, browser)
                .unwrap_or_else(|e| panic!("{}/{}: {}", platform, browser, e));
            assert!(entry.origin.y > 0, "{}/{} origin", platform, browser);
            assert!(entry.offset.y > 0, "{}/{} offset", platform, browser);
        }
    }

    #[test]
    fn test_missing_pairs_are_errors() {
        for (platform, browser) in [
            (Platform::Linux, BrowserKind::Edge),
            (Platform::Linux, BrowserKind::Safari),
            (Platform::Windows, BrowserKind::Safari),
        ] {
            match screen_offset(platform, browser) {
                Err(RecorderError::MissingOffset { .. }) => {}
                other => panic!("expected MissingOffset, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_known_geometry_values() {
        let entry = screen_offset(Platform::Linux, BrowserKind::Firefox).unwrap();
        assert_eq!(entry.origin, PixelOffset::new(0, 71));
        assert_eq!(entry.offset, PixelOffset::new(0, 168));

        let entry = screen_offset(Platform::MacOs, BrowserKind::Safari).unwrap();
        assert_eq!(entry.origin, PixelOffset::new(0, 66));
        assert_eq!(entry.offset, PixelOffset::new(0, 66));
    }

    #[test]
    fn test_supported_browsers_per_platform() {
        assert_eq!(
            supported_browsers(Platform::Linux),
            vec![BrowserKind::Firefox, BrowserKind::Chrome]
        );
        assert_eq!(supported_browsers(Platform::MacOs).len(), 4);
        assert!(!supported_browsers(Platform::Windows).contains(&BrowserKind::Safari));
    }
}
