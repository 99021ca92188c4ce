//! Integration tests with mock HTTP server

pub mod mock_server;
mod concurrency;
mod error_handling;
mod submit;
