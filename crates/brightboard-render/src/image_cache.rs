//! Explicit image loading, decoupled from drawing.
//!
//! The renderer never decodes inline. The frame loop asks the cache for
//! each image stroke's bitmap; a miss marks the entry pending and reports
//! it, the host decodes (synchronously or off the frame path) and feeds
//! the result back, then triggers a re-render.

use crate::renderer::{RenderResult, RendererError};
use brightboard_core::stroke::{Image as ImageStroke, StrokeGeometry, StrokeId};
use image::RgbaImage;
use log::warn;
use std::collections::HashMap;

#[derive(Debug)]
pub enum CacheEntry {
    /// Decode requested, bitmap not delivered yet.
    Pending,
    Ready(RgbaImage),
    /// Decode failed; the stroke draws as nothing from here on.
    Failed,
}

/// Bitmap cache keyed by stroke id. Append-only per id; repeated
/// requests for the same stroke are idempotent.
#[derive(Debug, Default)]
pub struct ImageCache {
    entries: HashMap<StrokeId, CacheEntry>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure an entry exists for this stroke. Returns true when the
    /// stroke was newly marked pending and the host should decode it.
    pub fn request(&mut self, stroke: &ImageStroke) -> bool {
        match self.entries.get(&stroke.id()) {
            Some(_) => false,
            None => {
                self.entries.insert(stroke.id(), CacheEntry::Pending);
                true
            }
        }
    }

    /// Deliver a decode outcome for a pending entry.
    pub fn complete(&mut self, id: StrokeId, result: RenderResult<RgbaImage>) {
        let entry = match result {
            Ok(bitmap) => CacheEntry::Ready(bitmap),
            Err(err) => {
                warn!("image decode failed for stroke {id}: {err}");
                CacheEntry::Failed
            }
        };
        self.entries.insert(id, entry);
    }

    pub fn get(&self, id: StrokeId) -> Option<&RgbaImage> {
        match self.entries.get(&id) {
            Some(CacheEntry::Ready(bitmap)) => Some(bitmap),
            _ => None,
        }
    }

    pub fn is_pending(&self, id: StrokeId) -> bool {
        matches!(self.entries.get(&id), Some(CacheEntry::Pending))
    }

    /// Convenience for hosts that decode on the spot.
    pub fn load(&mut self, stroke: &ImageStroke) {
        if self.request(stroke) {
            self.complete(stroke.id(), decode_image(stroke));
        }
    }
}

/// Decode an image stroke's bytes into an RGBA bitmap.
pub fn decode_image(stroke: &ImageStroke) -> RenderResult<RgbaImage> {
    let bytes = stroke
        .data()
        .ok_or_else(|| RendererError::ImageDecode("invalid base64 payload".to_string()))?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| RendererError::ImageDecode(e.to_string()))?;
    Ok(decoded.to_rgba8())
}
