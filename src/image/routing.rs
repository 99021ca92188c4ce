use crate::models::IMAGE_TO_IMAGE_MODELS;
use std::fmt;

const SERVICE_PREFIX: &str = "/api/v1/services/aigc/";
const RESOURCE_SUFFIX: &str = "/image-synthesis";

/// Task result lookup, `{task_id}` is filled per call.
pub const TASK_PATH: &str = "/api/v1/tasks/{task_id}";

/// Which synthesis endpoint serves a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoutingClass {
    TextToImage,
    ImageToImage,
}

impl RoutingClass {
    /// Exact, case-sensitive match against the image-to-image catalog.
    /// Unlisted models, known or not, route to text-to-image.
    pub fn classify(model: &str) -> Self {
        if IMAGE_TO_IMAGE_MODELS.contains(&model) {
            Self::ImageToImage
        } else {
            Self::TextToImage
        }
    }

    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::TextToImage => "text2image",
            Self::ImageToImage => "image2image",
        }
    }

    pub fn submit_path(&self) -> String {
        format!("{}{}{}", SERVICE_PREFIX, self.path_segment(), RESOURCE_SUFFIX)
    }
}

impl fmt::Display for RoutingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}
