//! Note glyphs - the pixel-art stamps a rendered note is drawn with
//!
//! A glyph is either a single fixed-size stamp or a tile repeated along the
//! note's length. Both kinds carry a plain texture and a highlight texture
//! (the plain one with a one-pixel green outline) used while the note
//! crosses the playhead.

pub mod catalog;

pub use catalog::{BucketSpec, GlyphCatalog, GlyphId, GlyphRegistry};

use crate::geometry::Rect;
use crate::raster::{Color, Raster, Surface};

/// Cropped texture pair for one atlas rectangle
#[derive(Debug, Clone)]
pub struct Stamp {
    /// Source rectangle in the atlas
    rect: Rect,
    texture: Raster,
    highlight: Raster,
}

impl Stamp {
    /// Wrap a cropped texture, synthesizing its highlight variant
    pub fn new(rect: Rect, texture: Raster) -> Self {
        let highlight = highlight_texture(&texture);
        Self {
            rect,
            texture,
            highlight,
        }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn width(&self) -> i32 {
        self.texture.width() as i32
    }

    pub fn height(&self) -> i32 {
        self.texture.height() as i32
    }

    pub fn texture(&self) -> &Raster {
        &self.texture
    }

    pub fn highlight(&self) -> &Raster {
        &self.highlight
    }

    /// Blit one copy with its bottom-left corner at (`x`, `y_base`)
    ///
    /// The highlight texture is one pixel larger on every side, so it is
    /// shifted up-left by one to keep the body in place.
    fn stamp<S: Surface + ?Sized>(&self, surface: &mut S, x: i32, y_base: i32, highlight: bool) {
        let (tex, dx, dy) = if highlight {
            (&self.highlight, x - 1, y_base - self.height() - 1)
        } else {
            (&self.texture, x, y_base - self.height())
        };
        let src = tex.bounds();
        surface.blit(tex, src, src.translate(dx, dy));
    }
}

/// Visual asset used to draw a note
#[derive(Debug, Clone)]
pub enum Glyph {
    /// One fixed-size stamp regardless of note length
    Single(Stamp),
    /// A tile repeated to cover the note length
    Repeating(Stamp),
}

impl Glyph {
    pub fn stamp(&self) -> &Stamp {
        match self {
            Glyph::Single(stamp) | Glyph::Repeating(stamp) => stamp,
        }
    }

    pub fn is_repeating(&self) -> bool {
        matches!(self, Glyph::Repeating(_))
    }

    /// Draw at (`x`, `y_base`) for a note `width` pixels long
    ///
    /// Repeating tiles that fall entirely outside the surface are skipped.
    pub fn draw<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        x: i32,
        y_base: i32,
        width: f64,
        highlight: bool,
    ) {
        match self {
            Glyph::Single(stamp) => stamp.stamp(surface, x, y_base, highlight),
            Glyph::Repeating(stamp) => {
                let step = stamp.width() as i64 + 1;
                let count = loop_count(width, step);
                let (first, end) =
                    visible_tiles(x as i64, step, count, surface.width() as i64);
                for i in first..end {
                    // Visible tiles start within one step of the surface
                    let tile_x = x as i64 + i * step;
                    stamp.stamp(surface, tile_x as i32, y_base, highlight);
                }
            }
        }
    }

    /// Horizontal span actually covered when drawn for `width`
    ///
    /// Single stamps ignore the requested width; repeating tiles cover
    /// whole tiles (plus one pixel gap each), at least one. Saturates at `i32::MAX` for absurdly long notes.
    pub fn render_width(&self, width: f64) -> i32 {
        match self {
            Glyph::Single(stamp) => stamp.width(),
            Glyph::Repeating(stamp) => {
                let step = stamp.width() as i64 + 1;
                (loop_count(width, step) * step).min(i32::MAX as i64) as i32
            }
        }
    }
}

/// Number of tiles for a requested width (always at least one)
fn loop_count(width: f64, step: i64) -> i64 {
    // Float to int casts saturate, so huge widths stay in range
    ((width / step as f64).floor() as i32).max(1) as i64
}

/// Range of tile indices that can touch a surface `surface_width` wide
///
/// A highlighted tile reaches one pixel past its step on the left, so the
/// bounds are kept one pixel loose.
fn visible_tiles(x: i64, step: i64, count: i64, surface_width: i64) -> (i64, i64) {
    let first = (-x).div_euclid(step).clamp(0, count);
    let end = (surface_width - x + step).div_euclid(step).clamp(first, count);
    (first, end)
}

/// Build the outlined variant of `texture`
///
/// The result is two pixels larger in each dimension. Every opaque-ish
/// source pixel paints [`Color::HALO_GREEN`] into its four orthogonal
/// neighbours, then the original is composited on top at (1, 1).
pub fn highlight_texture(texture: &Raster) -> Raster {
    let mut out = Raster::new(texture.width() + 2, texture.height() + 2);

    for y in 0..texture.height() as i32 {
        for x in 0..texture.width() as i32 {
            let covered = texture.pixel(x, y).is_some_and(|c| !c.is_transparent());
            if covered {
                out.put_pixel(x, y + 1, Color::HALO_GREEN);
                out.put_pixel(x + 2, y + 1, Color::HALO_GREEN);
                out.put_pixel(x + 1, y, Color::HALO_GREEN);
                out.put_pixel(x + 1, y + 2, Color::HALO_GREEN);
            }
        }
    }

    let src = texture.bounds();
    out.blit(texture, src, src.translate(1, 1));
    out
}
