//! # dashscope-image
//!
//! 这是 DashScope 图像生成服务的异步 Rust 客户端：按模型路由提交任务，并按任务 ID 查询结果。
//!
//! Async client for DashScope image synthesis.
//!
//! ## Overview
//!
//! The service runs image generation as asynchronous tasks. This crate submits a
//! task to the endpoint that serves the requested model (`text2image` or
//! `image2image`) and fetches a task's current state by its ID. Scheduling of
//! status checks is left to the caller.
//!
//! ## Key Features
//!
//! - **Model-aware routing**: [`image::RoutingClass`] picks the endpoint from the model name
//! - **Immutable clients**: [`ImageApi`] is `Clone + Send + Sync`; derive variants with [`ImageApi::mutate`]
//! - **Pluggable error handling**: [`transport::ResponseErrorHandler`] decides what a non-success status means
//! - **Environment config**: [`ImageApiBuilder::from_env`] reads `DASHSCOPE_*` variables
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dashscope_image::{ImageApi, ImageRequest};
//!
//! #[tokio::main]
//! async fn main() -> dashscope_image::Result<()> {
//!     let api = ImageApi::builder().api_key("your-api-key")?.build()?;
//!
//!     let submitted = api
//!         .submit_image_gen_task(ImageRequest::new("wanx2.1-t2i-turbo", "a lighthouse at dusk"))
//!         .await?;
//!     let task_id = submitted
//!         .body()
//!         .and_then(|b| b.task_id())
//!         .unwrap_or_default()
//!         .to_string();
//!
//!     let status = api.get_image_gen_task_result(&task_id).await?;
//!     println!("{:?}", status.body().and_then(|b| b.task_status()));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`image`] | Client, builder, routing, request/response types |
//! | [`transport`] | HTTP transport, response envelope, error handlers |
//! | [`auth`] | API key and default headers |
//! | [`config`] | Environment-driven configuration |
//! | [`models`] | Model identifiers |
//! | [`error_code`] | Error classes with retry semantics |

pub mod auth;
pub mod config;
pub mod error_code;
pub mod image;
pub mod models;
pub mod transport;

pub use image::{
    ImageApi, ImageApiBuilder, ImageAsyncResponse, ImageInput, ImageParameters, ImageRequest,
    RoutingClass, TaskStatus,
};
pub use transport::{ErrorOutcome, ResponseEntity, ResponseErrorHandler};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext};
