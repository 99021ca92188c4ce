//! 图像生成模块：DashScope 文生图 / 图生图异步任务的提交与结果查询。
//!
//! Image synthesis: asynchronous task submission and task result lookup.

mod client;
mod routing;
mod types;

pub use client::{ImageApi, ImageApiBuilder, DEFAULT_BASE_URL};
pub use routing::{RoutingClass, TASK_PATH};
pub use types::{
    ImageAsyncResponse, ImageInput, ImageOutput, ImageParameters, ImageRequest, ImageResult,
    ImageUsage, TaskMetrics, TaskStatus,
};
