use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::EngineError;

static NEXT_IMAGE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of an [`Image`].
///
/// Clones of an image share its id; constructing a new image (even from identical
/// bytes) yields a new id. The texture cache keys on this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(u64);

impl ImageId {
    fn next() -> Self {
        ImageId(NEXT_IMAGE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgba8,
    Rgb8,
}

impl PixelFormat {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Rgba8 => 4,
            PixelFormat::Rgb8 => 3,
        }
    }
}

/// Immutable decoded bitmap: row-major, tightly packed, first row at the top.
#[derive(Debug, Clone)]
pub struct Image {
    id: ImageId,
    width: u32,
    height: u32,
    format: PixelFormat,
    pixels: Arc<[u8]>,
}

impl Image {
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        pixels: impl Into<Arc<[u8]>>,
    ) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidImage(format!(
                "dimensions must be > 0 (got {width}x{height})"
            )));
        }

        let pixels = pixels.into();
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(format.bytes_per_pixel()))
            .ok_or_else(|| EngineError::InvalidImage(format!("{width}x{height} overflows")))?;
        if pixels.len() != expected {
            return Err(EngineError::InvalidImage(format!(
                "{width}x{height} {format:?} needs {expected} bytes, got {}",
                pixels.len()
            )));
        }

        Ok(Self {
            id: ImageId::next(),
            width,
            height,
            format,
            pixels,
        })
    }

    /// Convenience for RGBA8 buffers (the common decode output).
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, EngineError> {
        Self::new(width, height, PixelFormat::Rgba8, pixels)
    }

    pub fn id(&self) -> ImageId {
        self.id
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
    pub fn format(&self) -> PixelFormat {
        self.format
    }
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}
