//! Image Adapter - 文生图客户端实现

mod dashscope_image_client;
mod fake_image_client;

pub use dashscope_image_client::*;
pub use fake_image_client::FakeImageClient;
