//! Composition descriptors.
//!
//! A composition is the engine-agnostic, layered description of a rendered
//! output: the trimmed source footage, optional auto-generated captions, and
//! an optional title overlay. Building one is pure and deterministic —
//! identical inputs always yield a structurally identical descriptor, which
//! is what makes retrying a failed submission idempotent.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ClipRequest;

/// Name of the video layer, referenced by the caption layer as its
/// transcript source.
pub const VIDEO_LAYER_NAME: &str = "video-1";

/// How long the title overlay stays on screen, in seconds.
pub const TITLE_WINDOW_SECS: f64 = 3.0;

/// Duration of the title fade-out at the end of its window, in seconds.
pub const TITLE_FADE_SECS: f64 = 0.5;

/// How a layer is fitted into the output frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum LayerFit {
    /// Fill the frame, cropping overflow.
    Cover,
}

/// Visual styling for the caption layer.
///
/// Captions use a highlight-as-spoken effect keyed to the video layer's own
/// audio track; the engine derives word timing itself. These are fixed
/// design values, not per-call configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CaptionStyle {
    /// Highlight effect applied as words are spoken.
    pub transcript_effect: String,
    /// Color of the currently-spoken word.
    pub transcript_color: String,
    pub font_family: String,
    pub font_weight: u16,
    /// Font size in vmin units.
    pub font_size_vmin: f64,
    pub fill_color: String,
    pub stroke_color: String,
    /// Stroke width in vmin units.
    pub stroke_width_vmin: f64,
    /// Backdrop behind the caption block.
    pub background_color: String,
}

impl Default for CaptionStyle {
    fn default() -> Self {
        Self {
            transcript_effect: "karaoke".to_string(),
            transcript_color: "#FFD700".to_string(),
            font_family: "Montserrat".to_string(),
            font_weight: 800,
            font_size_vmin: 6.0,
            fill_color: "#ffffff".to_string(),
            stroke_color: "#000000".to_string(),
            stroke_width_vmin: 0.8,
            background_color: "rgba(0,0,0,0.6)".to_string(),
        }
    }
}

/// Visual styling for the title overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TitleStyle {
    pub font_family: String,
    pub font_weight: u16,
    /// Font size in vmin units.
    pub font_size_vmin: f64,
    pub fill_color: String,
    pub stroke_color: String,
    /// Stroke width in vmin units.
    pub stroke_width_vmin: f64,
    /// Backdrop behind the title text.
    pub background_color: String,
}

impl Default for TitleStyle {
    fn default() -> Self {
        Self {
            font_family: "Montserrat".to_string(),
            font_weight: 700,
            font_size_vmin: 4.5,
            fill_color: "#ffffff".to_string(),
            stroke_color: "#000000".to_string(),
            stroke_width_vmin: 0.5,
            background_color: "rgba(0,0,0,0.7)".to_string(),
        }
    }
}

/// A single layer of a composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Layer {
    /// Trimmed source footage. Exactly one per composition, always first.
    Video {
        /// Source URL the engine pulls footage from.
        source: String,
        /// Trim start within the source, in seconds.
        trim_start: f64,
        /// Trim end within the source, in seconds.
        trim_end: f64,
        fit: LayerFit,
    },

    /// Auto-generated captions, keyed to the named video layer's audio.
    Captions {
        /// Name of the layer whose audio supplies the transcript.
        transcript_source: String,
        style: CaptionStyle,
    },

    /// Title overlay, visible for the first [`TITLE_WINDOW_SECS`] seconds
    /// and fading out at the end of that window.
    Title {
        text: String,
        /// Window start offset, in seconds.
        starts_at: f64,
        /// Window duration, in seconds.
        duration: f64,
        /// Fade-out duration at the end of the window, in seconds.
        fade_out: f64,
        style: TitleStyle,
    },
}

impl Layer {
    pub fn is_video(&self) -> bool {
        matches!(self, Layer::Video { .. })
    }
}

/// Ordered layer stack describing one rendered output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CompositionDescriptor {
    pub layers: Vec<Layer>,
}

impl CompositionDescriptor {
    /// Build the composition for a clip request.
    ///
    /// Pure and total: malformed time ranges are the caller's responsibility
    /// (the export surface validates before dispatch). The caption layer is
    /// present iff captions are enabled; the title layer is present iff the
    /// title is non-empty.
    pub fn build(clip: &ClipRequest) -> Self {
        let mut layers = vec![Layer::Video {
            source: clip.source.watch_url(),
            trim_start: clip.start_seconds,
            trim_end: clip.end_seconds,
            fit: LayerFit::Cover,
        }];

        if clip.captions_enabled {
            layers.push(Layer::Captions {
                transcript_source: VIDEO_LAYER_NAME.to_string(),
                style: CaptionStyle::default(),
            });
        }

        if !clip.title.trim().is_empty() {
            layers.push(Layer::Title {
                text: clip.title.clone(),
                starts_at: 0.0,
                duration: TITLE_WINDOW_SECS,
                fade_out: TITLE_FADE_SECS,
                style: TitleStyle::default(),
            });
        }

        Self { layers }
    }

    /// Whether this composition carries a caption layer.
    pub fn has_captions(&self) -> bool {
        self.layers
            .iter()
            .any(|layer| matches!(layer, Layer::Captions { .. }))
    }

    /// Title text, if a title layer is present.
    pub fn title_text(&self) -> Option<&str> {
        self.layers.iter().find_map(|layer| match layer {
            Layer::Title { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SourceVideoId;

    fn clip() -> ClipRequest {
        ClipRequest::new(
            SourceVideoId::parse("dQw4w9WgXcQ").unwrap(),
            10.0,
            40.0,
            "Big Moment",
        )
    }

    #[test]
    fn test_build_is_deterministic() {
        let request = clip();
        let first = CompositionDescriptor::build(&request);
        let second = CompositionDescriptor::build(&request);
        assert_eq!(first, second);
    }

    #[test]
    fn test_video_layer_is_first_and_unique() {
        let descriptor = CompositionDescriptor::build(&clip());
        assert!(descriptor.layers[0].is_video());
        assert_eq!(
            descriptor.layers.iter().filter(|l| l.is_video()).count(),
            1
        );

        match &descriptor.layers[0] {
            Layer::Video {
                source,
                trim_start,
                trim_end,
                fit,
            } => {
                assert_eq!(source, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
                assert_eq!(*trim_start, 10.0);
                assert_eq!(*trim_end, 40.0);
                assert_eq!(*fit, LayerFit::Cover);
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_captions_present_iff_enabled() {
        let with = CompositionDescriptor::build(&clip());
        assert!(with.has_captions());

        let without = CompositionDescriptor::build(&clip().with_captions(false));
        assert!(!without.has_captions());
    }

    #[test]
    fn test_captions_reference_video_layer() {
        let descriptor = CompositionDescriptor::build(&clip());
        let transcript_source = descriptor.layers.iter().find_map(|layer| match layer {
            Layer::Captions {
                transcript_source, ..
            } => Some(transcript_source.as_str()),
            _ => None,
        });
        assert_eq!(transcript_source, Some(VIDEO_LAYER_NAME));
    }

    #[test]
    fn test_title_present_iff_non_empty() {
        let descriptor = CompositionDescriptor::build(&clip());
        assert_eq!(descriptor.title_text(), Some("Big Moment"));

        let mut untitled = clip();
        untitled.title = String::new();
        let descriptor = CompositionDescriptor::build(&untitled);
        assert_eq!(descriptor.title_text(), None);

        // Whitespace-only titles are treated as empty.
        untitled.title = "   ".to_string();
        let descriptor = CompositionDescriptor::build(&untitled);
        assert_eq!(descriptor.title_text(), None);
    }

    #[test]
    fn test_title_window_constants() {
        let descriptor = CompositionDescriptor::build(&clip());
        match descriptor
            .layers
            .iter()
            .find(|l| matches!(l, Layer::Title { .. }))
            .unwrap()
        {
            Layer::Title {
                starts_at,
                duration,
                fade_out,
                ..
            } => {
                assert_eq!(*starts_at, 0.0);
                assert_eq!(*duration, TITLE_WINDOW_SECS);
                assert_eq!(*fade_out, TITLE_FADE_SECS);
            }
            _ => unreachable!(),
        }
    }
}
