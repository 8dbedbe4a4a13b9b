//! Destination platform definitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output frame rate used for every platform render.
pub const FRAME_RATE: u32 = 30;

/// Destination platform for an exported clip.
///
/// Every platform currently shares the same vertical 9:16 frame; the mapping
/// is static configuration, not derived data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Instagram Reels
    InstagramReels,
    /// YouTube Shorts
    YoutubeShorts,
    /// TikTok
    Tiktok,
}

impl Platform {
    /// All supported platforms, in display order.
    pub const ALL: &'static [Platform] = &[
        Platform::InstagramReels,
        Platform::YoutubeShorts,
        Platform::Tiktok,
    ];

    /// Human-readable platform name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::InstagramReels => "Instagram Reels",
            Platform::YoutubeShorts => "YouTube Shorts",
            Platform::Tiktok => "TikTok",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::InstagramReels => "instagram_reels",
            Platform::YoutubeShorts => "youtube_shorts",
            Platform::Tiktok => "tiktok",
        }
    }

    /// Output frame size for this platform.
    pub fn frame_size(&self) -> FrameSize {
        match self {
            Platform::InstagramReels | Platform::YoutubeShorts | Platform::Tiktok => FrameSize {
                width: 1080,
                height: 1920,
            },
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PlatformParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "instagram_reels" => Ok(Platform::InstagramReels),
            "youtube_shorts" => Ok(Platform::YoutubeShorts),
            "tiktok" => Ok(Platform::Tiktok),
            _ => Err(PlatformParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unknown platform: {0}")]
pub struct PlatformParseError(String);

/// Output frame dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for FrameSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Render output specification: the platform's frame size plus the fixed
/// frame rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OutputSpec {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

impl OutputSpec {
    /// Build the output specification for a platform.
    pub fn for_platform(platform: Platform) -> Self {
        let frame = platform.frame_size();
        Self {
            width: frame.width,
            height: frame.height,
            frame_rate: FRAME_RATE,
        }
    }
}
