// File: threedsecure-common/src/models/challenge.rs

use serde::{Deserialize, Serialize};

/// EMVCo challenge window size codes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChallengeWindowSize {
    #[serde(rename = "01")]
    H400xW250,
    #[serde(rename = "02")]
    H400xW390,
    #[serde(rename = "03")]
    H600xW500,
    #[serde(rename = "04")]
    H400xW600,
    #[serde(rename = "05")]
    Fullscreen,
}

impl ChallengeWindowSize {
    /// First matching breakpoint wins.
    pub fn from_width(width: u32) -> Self {
        match width {
            0..=250 => ChallengeWindowSize::H400xW250,
            251..=390 => ChallengeWindowSize::H400xW390,
            391..=500 => ChallengeWindowSize::H600xW500,
            501..=600 => ChallengeWindowSize::H400xW600,
            _ => ChallengeWindowSize::Fullscreen,
        }
    }
}

/// Driver-side view of the UI container the frames mount into. The
/// host application owns layout; the driver only needs the observed
/// width to pick a challenge window size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MountPoint {
    pub width: u32,
}

impl MountPoint {
    pub fn new(width: u32) -> Self {
        Self { width }
    }
}
