//! Sprite atlas: a loaded source image that glyph textures are cropped from.
//!
//! An [`Atlas`] can only be built from pixels that are already in memory, so
//! anything holding one knows the image finished loading.

use crate::geometry::Rect;
use crate::raster::{Raster, Surface};

/// A loaded atlas image
#[derive(Debug, Clone)]
pub struct Atlas {
    raster: Raster,
}

impl Atlas {
    pub fn new(raster: Raster) -> Self {
        Self { raster }
    }

    pub fn width(&self) -> u32 {
        self.raster.width()
    }

    pub fn height(&self) -> u32 {
        self.raster.height()
    }

    pub fn raster(&self) -> &Raster {
        &self.raster
    }

    /// Copy `rect` out of the atlas into a standalone raster
    ///
    /// The rectangle must be non-empty and lie fully inside the atlas.
    pub fn crop(&self, rect: Rect) -> Result<Raster, AtlasError> {
        if rect.is_empty() {
            return Err(AtlasError::EmptyRect(rect));
        }
        if !self.raster.bounds().contains(&rect) {
            return Err(AtlasError::OutOfBounds {
                rect,
                width: self.width(),
                height: self.height(),
            });
        }

        let mut out = Raster::new(rect.width as u32, rect.height as u32);
        let dst = out.bounds();
        out.blit(&self.raster, rect, dst);
        Ok(out)
    }
}

/// Errors raised while cropping glyph textures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtlasError {
    /// Crop rectangle has no area
    EmptyRect(Rect),
    /// Crop rectangle extends past the atlas edges
    OutOfBounds { rect: Rect, width: u32, height: u32 },
}

impl std::fmt::Display for AtlasError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtlasError::EmptyRect(rect) => write!(f, "cannot crop empty rect {:?}", rect),
            AtlasError::OutOfBounds {
                rect,
                width,
                height,
            } => write!(
                f,
                "crop rect {:?} lies outside the {}x{} atlas",
                rect, width, height
            ),
        }
    }
}

impl std::error::Error for AtlasError {}
