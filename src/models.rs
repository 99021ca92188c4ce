//! Image model identifiers.
//!
//! Plain strings: the service accepts any model name, and the client only needs
//! the catalog to pick an endpoint (see [`crate::image::RoutingClass`]).

pub const WANX_V1: &str = "wanx-v1";
pub const WANX2_1_T2I_TURBO: &str = "wanx2.1-t2i-turbo";
pub const WANX2_1_T2I_PLUS: &str = "wanx2.1-t2i-plus";
pub const WAN2_2_T2I_PLUS: &str = "wan2.2-t2i-plus";
pub const WAN2_2_T2I_FLASH: &str = "wan2.2-t2i-flash";
pub const WAN2_5_T2I_PREVIEW: &str = "wan2.5-t2i-preview";
pub const QWEN_IMAGE: &str = "qwen-image";
pub const QWEN_IMAGE_PLUS: &str = "qwen-image-plus";
pub const QWEN_MT_IMAGE: &str = "qwen-mt-image";

pub const WANX2_1_IMAGE_EDIT: &str = "wanx2.1-imageedit";
pub const IMAGE_OUT_PAINTING: &str = "image-out-painting";
pub const WANX_X_PAINTING: &str = "wanx-x-painting";
pub const WANX_SKETCH_TO_IMAGE_LITE: &str = "wanx-sketch-to-image-lite";

pub const DEFAULT_IMAGE_MODEL: &str = WANX_V1;

/// Models served by the `image2image` endpoint. Everything else goes to `text2image`.
pub const IMAGE_TO_IMAGE_MODELS: &[&str] = &[
    WANX2_1_IMAGE_EDIT,
    IMAGE_OUT_PAINTING,
    WANX_X_PAINTING,
    WANX_SKETCH_TO_IMAGE_LITE,
];

pub const TEXT_TO_IMAGE_MODELS: &[&str] = &[
    WANX_V1,
    WANX2_1_T2I_TURBO,
    WANX2_1_T2I_PLUS,
    WAN2_2_T2I_PLUS,
    WAN2_2_T2I_FLASH,
    WAN2_5_T2I_PREVIEW,
    QWEN_IMAGE,
    QWEN_IMAGE_PLUS,
    QWEN_MT_IMAGE,
];

pub fn is_known_model(model: &str) -> bool {
    IMAGE_TO_IMAGE_MODELS.contains(&model) || TEXT_TO_IMAGE_MODELS.contains(&model)
}
