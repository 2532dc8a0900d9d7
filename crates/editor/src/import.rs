//! Image-decode boundary
//!
//! Decoding happens outside the engine; a layer is only admitted once the
//! final pixel dimensions are known. A failed decode surfaces as an error
//! and creates nothing.

use shared::{LayerId, PixelRef};

use crate::error::EngineResult;
use crate::state::DocumentRegistry;

/// A decoded image ready to be placed as a layer
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Handle into the host's pixel cache
    pub source: PixelRef,
    /// Pixel width
    pub width: f64,
    /// Pixel height
    pub height: f64,
}

/// External decode collaborator
pub trait ImageDecoder {
    /// Decode raw bytes into a cached pixel source and its dimensions
    fn decode(&mut self, bytes: &[u8]) -> EngineResult<DecodedImage>;
}

/// Decode `bytes` and add the result as a layer on the active document
pub fn import_image(
    registry: &mut DocumentRegistry,
    decoder: &mut dyn ImageDecoder,
    name: &str,
    bytes: &[u8],
) -> EngineResult<LayerId> {
    let image = decoder.decode(bytes)?;
    registry.add_layer(name, Some(image.source), image.width, image.height)
}
