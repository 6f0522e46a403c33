//! BrightBoard Render Library
//!
//! Renderer abstraction for BrightBoard: a backend-neutral display-list
//! scene builder, an explicit image cache, and a software rasterizer for
//! board snapshots sent to the analysis collaborator.

mod renderer;

pub mod image_cache;
pub mod raster;
pub mod scene;

pub use image_cache::{decode_image, CacheEntry, ImageCache};
pub use raster::{board_snapshot_data_url, png_data_url, rasterize};
pub use renderer::{RenderContext, RenderResult, Renderer, RendererError};
pub use scene::{DisplayListRenderer, DrawCmd, Scene, HANDLE_SIZE};
