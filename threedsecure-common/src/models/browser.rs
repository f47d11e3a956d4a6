// File: threedsecure-common/src/models/browser.rs

use serde::Serialize;

/// Color depths the directory server accepts, highest first.
pub const ALLOWED_COLOR_DEPTHS: [u8; 8] = [48, 32, 24, 16, 15, 8, 4, 1];

/// Accept header the issuer expects alongside the fingerprint.
pub const ACCEPT_HEADER: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.9";

/// Browser fingerprint PATCHed to `{base}/{id}/browser` before the
/// authentication loop starts.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BrowserData {
    pub java_enabled: bool,
    pub javascript_enabled: bool,
    pub language: String,
    pub user_agent: String,
    pub screen_width: u32,
    pub screen_height: u32,
    pub time_zone_offset: i32,
    pub color_depth: u8,
    pub accept_header: String,
}

impl BrowserData {
    /// Builds the payload from raw device metrics. The reported color
    /// depth is snapped down to the nearest allowed value (default 48).
    pub fn new(
        language: impl Into<String>,
        user_agent: impl Into<String>,
        screen_width: u32,
        screen_height: u32,
        time_zone_offset: i32,
        color_depth: u8,
    ) -> Self {
        let color_depth = ALLOWED_COLOR_DEPTHS
            .iter()
            .copied()
            .find(|d| *d <= color_depth)
            .unwrap_or(48);

        Self {
            java_enabled: true,
            javascript_enabled: true,
            language: language.into(),
            user_agent: user_agent.into(),
            screen_width,
            screen_height,
            time_zone_offset,
            color_depth,
            accept_header: ACCEPT_HEADER.to_string(),
        }
    }
}
