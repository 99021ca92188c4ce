//! Image synthesis request and task response types.

use base64::Engine as _;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of a synthesis task submission.
///
/// Model-specific fields the typed structs do not cover go into `extra` on
/// [`ImageInput`] or [`ImageParameters`] and are serialized inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRequest {
    pub model: String,
    pub input: ImageInput,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ImageParameters>,
}

impl ImageRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            input: ImageInput {
                prompt: Some(prompt.into()),
                ..Default::default()
            },
            parameters: None,
        }
    }

    pub fn with_input(mut self, input: ImageInput) -> Self {
        self.input = input;
        self
    }

    pub fn with_parameters(mut self, parameters: ImageParameters) -> Self {
        self.parameters = Some(parameters);
        self
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.input.negative_prompt = Some(negative_prompt.into());
        self
    }

    /// Edit function for `wanx2.1-imageedit` (e.g. `description_edit`, `stylization_all`).
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.input.function = Some(function.into());
        self
    }

    pub fn with_base_image_url(mut self, url: impl Into<String>) -> Self {
        self.input.base_image_url = Some(url.into());
        self
    }

    pub fn with_mask_image_url(mut self, url: impl Into<String>) -> Self {
        self.input.mask_image_url = Some(url.into());
        self
    }

    pub fn with_sketch_image_url(mut self, url: impl Into<String>) -> Self {
        self.input.sketch_image_url = Some(url.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_prompt: Option<String>,
    /// Reference image for style/content guidance (`wanx-v1`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_img: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mask_image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sketch_image_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageInput {
    /// Encode raw image bytes as a `data:` URL accepted wherever an image URL is.
    pub fn data_url(bytes: &[u8], mime_type: &str) -> String {
        format!(
            "data:{};base64,{}",
            mime_type,
            base64::engine::general_purpose::STANDARD.encode(bytes)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
    /// `"1024*1024"` style dimensions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_strength: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ref_mode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prompt_extend: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watermark: Option<bool>,

    // image edit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upscale_factor: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_sketch: Option<bool>,

    // sketch to image
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sketch_weight: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub realisticness: Option<u32>,

    // out-painting
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_ratio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom_offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left_offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right_offset: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_quality: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit_image_size: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Task state as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    Pending,
    Running,
    Suspended,
    Succeeded,
    Failed,
    Canceled,
    #[serde(other)]
    Unknown,
}

/// Response of both submission and result lookup.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageAsyncResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<ImageOutput>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<ImageUsage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ImageAsyncResponse {
    pub fn task_id(&self) -> Option<&str> {
        self.output.as_ref()?.task_id.as_deref()
    }

    pub fn task_status(&self) -> Option<TaskStatus> {
        self.output.as_ref()?.task_status
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageOutput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub results: Vec<ImageResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_metrics: Option<TaskMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submit_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// One generated image, or the reason it was not produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskMetrics {
    #[serde(rename = "TOTAL", default)]
    pub total: u32,
    #[serde(rename = "SUCCEEDED", default)]
    pub succeeded: u32,
    #[serde(rename = "FAILED", default)]
    pub failed: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_count: Option<u32>,
}
