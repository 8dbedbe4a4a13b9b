//! Render engine wire types.
//!
//! The engine element schema is flat: every element is a `video` or `text`
//! object with optional styling fields. [`RenderSubmission::new`] translates
//! the engine-agnostic composition descriptor into that schema.

use serde::{Deserialize, Serialize};

use cship_models::{CompositionDescriptor, Layer, LayerFit, OutputSpec};

/// Job status as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineJobStatus {
    /// Accepted, not yet started.
    Planned,
    /// Actively rendering.
    Rendering,
    /// Output file is ready.
    Succeeded,
    /// Render failed.
    Failed,
}

impl EngineJobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineJobStatus::Succeeded | EngineJobStatus::Failed)
    }
}

/// One accepted render in a submission response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderHandle {
    /// Engine-assigned job id.
    pub id: String,
    pub status: EngineJobStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Status report for a single render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusReport {
    pub id: String,
    pub status: EngineJobStatus,
    /// Render progress as a fraction in `[0, 1]`. Absent reports count as 0.
    #[serde(default)]
    pub progress: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

// Fixed element geometry. Captions sit in the lower third, the title near
// the top; both span 90% of the frame width.
const CAPTION_WIDTH: &str = "90%";
const CAPTION_HEIGHT: &str = "25%";
const CAPTION_X_ALIGNMENT: &str = "50%";
const CAPTION_Y_ALIGNMENT: &str = "85%";
const CAPTION_BG_X_PADDING: &str = "5%";
const CAPTION_BG_Y_PADDING: &str = "3%";
const CAPTION_BG_BORDER_RADIUS: &str = "10%";
const TITLE_WIDTH: &str = "90%";
const TITLE_X_ALIGNMENT: &str = "50%";
const TITLE_Y_ALIGNMENT: &str = "8%";
const TITLE_BG_X_PADDING: &str = "4%";
const TITLE_BG_Y_PADDING: &str = "2%";
const TITLE_BG_BORDER_RADIUS: &str = "8%";

/// A single element in the engine's composition schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim_start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trim_end: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_effect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_alignment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_alignment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_x_padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_y_padding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_border_radius: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animations: Option<Vec<Animation>>,
}

impl Element {
    fn empty(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            name: None,
            source: None,
            trim_start: None,
            trim_end: None,
            fit: None,
            text: None,
            transcript_source: None,
            transcript_effect: None,
            transcript_color: None,
            width: None,
            height: None,
            x_alignment: None,
            y_alignment: None,
            font_family: None,
            font_weight: None,
            font_size: None,
            fill_color: None,
            stroke_color: None,
            stroke_width: None,
            background_color: None,
            background_x_padding: None,
            background_y_padding: None,
            background_border_radius: None,
            text_align: None,
            time: None,
            duration: None,
            animations: None,
        }
    }

    fn from_layer(layer: &Layer) -> Self {
        match layer {
            Layer::Video {
                source,
                trim_start,
                trim_end,
                fit,
            } => {
                let mut element = Element::empty("video");
                element.name = Some(cship_models::composition::VIDEO_LAYER_NAME.to_string());
                element.source = Some(source.clone());
                element.trim_start = Some(*trim_start);
                element.trim_end = Some(*trim_end);
                element.fit = Some(match fit {
                    LayerFit::Cover => "cover".to_string(),
                });
                element
            }
            Layer::Captions {
                transcript_source,
                style,
            } => {
                let mut element = Element::empty("text");
                element.transcript_source = Some(transcript_source.clone());
                element.transcript_effect = Some(style.transcript_effect.clone());
                element.transcript_color = Some(style.transcript_color.clone());
                element.width = Some(CAPTION_WIDTH.to_string());
                element.height = Some(CAPTION_HEIGHT.to_string());
                element.x_alignment = Some(CAPTION_X_ALIGNMENT.to_string());
                element.y_alignment = Some(CAPTION_Y_ALIGNMENT.to_string());
                element.font_family = Some(style.font_family.clone());
                element.font_weight = Some(style.font_weight.to_string());
                element.font_size = Some(format!("{} vmin", style.font_size_vmin));
                element.fill_color = Some(style.fill_color.clone());
                element.stroke_color = Some(style.stroke_color.clone());
                element.stroke_width = Some(format!("{} vmin", style.stroke_width_vmin));
                element.background_color = Some(style.background_color.clone());
                element.background_x_padding = Some(CAPTION_BG_X_PADDING.to_string());
                element.background_y_padding = Some(CAPTION_BG_Y_PADDING.to_string());
                element.background_border_radius = Some(CAPTION_BG_BORDER_RADIUS.to_string());
                element.text_align = Some("center".to_string());
                element
            }
            Layer::Title {
                text,
                starts_at,
                duration,
                fade_out,
                style,
            } => {
                let mut element = Element::empty("text");
                element.text = Some(text.clone());
                element.width = Some(TITLE_WIDTH.to_string());
                element.x_alignment = Some(TITLE_X_ALIGNMENT.to_string());
                element.y_alignment = Some(TITLE_Y_ALIGNMENT.to_string());
                element.font_family = Some(style.font_family.clone());
                element.font_weight = Some(style.font_weight.to_string());
                element.font_size = Some(format!("{} vmin", style.font_size_vmin));
                element.fill_color = Some(style.fill_color.clone());
                element.stroke_color = Some(style.stroke_color.clone());
                element.stroke_width = Some(format!("{} vmin", style.stroke_width_vmin));
                element.background_color = Some(style.background_color.clone());
                element.background_x_padding = Some(TITLE_BG_X_PADDING.to_string());
                element.background_y_padding = Some(TITLE_BG_Y_PADDING.to_string());
                element.background_border_radius = Some(TITLE_BG_BORDER_RADIUS.to_string());
                element.text_align = Some("center".to_string());
                element.time = Some(*starts_at);
                element.duration = Some(*duration);
                element.animations = Some(vec![Animation::fade_out_at_end(*fade_out)]);
                element
            }
        }
    }
}

/// Element animation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Animation {
    #[serde(rename = "type")]
    pub kind: String,
    pub fade_out: bool,
    /// Anchor within the element's window (`"end"` for exit animations).
    pub time: String,
    pub duration: f64,
}

impl Animation {
    fn fade_out_at_end(duration: f64) -> Self {
        Self {
            kind: "fade".to_string(),
            fade_out: true,
            time: "end".to_string(),
            duration,
        }
    }
}

/// Submission request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSubmission {
    pub output_format: String,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub elements: Vec<Element>,
    /// The engine offers a push channel; this system polls instead, so the
    /// field is always absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl RenderSubmission {
    /// Translate a composition descriptor and output spec into the engine
    /// schema.
    pub fn new(descriptor: &CompositionDescriptor, output: &OutputSpec) -> Self {
        Self {
            output_format: "mp4".to_string(),
            width: output.width,
            height: output.height,
            frame_rate: output.frame_rate,
            elements: descriptor.layers.iter().map(Element::from_layer).collect(),
            webhook_url: None,
        }
    }
}
