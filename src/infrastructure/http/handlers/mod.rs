//! HTTP Handlers

mod image;
mod ping;
mod project;
mod scene;
mod text;
mod visual;

pub use image::*;
pub use ping::*;
pub use project::*;
pub use scene::*;
pub use text::*;
pub use visual::*;
