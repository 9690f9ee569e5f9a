//! Glyph catalog - crops the registered glyphs from an atlas and picks one
//! for a note by its pixel width.

use rand::Rng;

use crate::atlas::{Atlas, AtlasError};
use crate::geometry::Rect;

use super::{Glyph, Stamp};

/// Index of a glyph inside its [`GlyphCatalog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GlyphId(pub(crate) usize);

impl GlyphId {
    pub const fn index(&self) -> usize {
        self.0
    }
}

/// A group of interchangeable single stamps sized for notes near
/// `target_width` pixels
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BucketSpec {
    pub target_width: f64,
    pub variants: Vec<Rect>,
}

/// Atlas layout of every glyph the catalog provides
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphRegistry {
    /// Short-note buckets, in priority order for ties
    pub short: Vec<BucketSpec>,
    /// Tile used for long notes
    pub long: Rect,
    /// Widths at or above this use the long tile
    pub long_threshold: f64,
}

impl GlyphRegistry {
    /// Layout of the bundled note atlas
    pub fn standard() -> Self {
        Self {
            short: vec![
                BucketSpec {
                    target_width: 20.0,
                    variants: vec![
                        Rect::new(2, 28, 21, 10),
                        Rect::new(26, 26, 20, 12),
                        Rect::new(49, 26, 22, 12),
                    ],
                },
                BucketSpec {
                    target_width: 74.0,
                    variants: vec![Rect::new(74, 14, 47, 24)],
                },
            ],
            long: Rect::new(124, 15, 78, 23),
            long_threshold: 70.0,
        }
    }

    /// Smallest atlas size that contains every registered rectangle
    pub fn required_atlas_size(&self) -> (u32, u32) {
        let (w, h) = self
            .short
            .iter()
            .flat_map(|b| b.variants.iter())
            .chain(std::iter::once(&self.long))
            .fold((0, 0), |(w, h), rc| (w.max(rc.right()), h.max(rc.bottom())));
        (w.max(0) as u32, h.max(0) as u32)
    }
}

impl Default for GlyphRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

struct Bucket {
    target_width: f64,
    glyphs: Vec<GlyphId>,
}

/// Owns every note glyph and selects one per note
pub struct GlyphCatalog {
    glyphs: Vec<Glyph>,
    buckets: Vec<Bucket>,
    long: GlyphId,
    long_threshold: f64,
}

impl GlyphCatalog {
    /// Build the standard catalog from a loaded atlas
    pub fn new(atlas: &Atlas) -> Result<Self, AtlasError> {
        Self::from_registry(atlas, &GlyphRegistry::standard())
    }

    /// Crop every glyph in `registry` from `atlas`
    ///
    /// Buckets without variants are dropped.
    pub fn from_registry(atlas: &Atlas, registry: &GlyphRegistry) -> Result<Self, AtlasError> {
        let mut glyphs = Vec::new();
        let mut buckets = Vec::with_capacity(registry.short.len());

        for spec in &registry.short {
            let mut ids = Vec::with_capacity(spec.variants.len());
            for &rect in &spec.variants {
                ids.push(GlyphId(glyphs.len()));
                glyphs.push(Glyph::Single(Stamp::new(rect, atlas.crop(rect)?)));
            }
            if !ids.is_empty() {
                buckets.push(Bucket {
                    target_width: spec.target_width,
                    glyphs: ids,
                });
            }
        }

        let long = GlyphId(glyphs.len());
        glyphs.push(Glyph::Repeating(Stamp::new(
            registry.long,
            atlas.crop(registry.long)?,
        )));

        log::debug!(
            "glyph catalog: {} glyphs in {} short buckets",
            glyphs.len(),
            buckets.len()
        );

        Ok(Self {
            glyphs,
            buckets,
            long,
            long_threshold: registry.long_threshold,
        })
    }

    /// `None` for an id handed out by a different catalog
    pub fn glyph(&self, id: GlyphId) -> Option<&Glyph> {
        self.glyphs.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn long_glyph(&self) -> GlyphId {
        self.long
    }

    /// Index of the short bucket nearest to `width` (first wins on ties),
    /// or `None` when the long tile applies
    pub fn bucket_for(&self, width: f64) -> Option<usize> {
        if width >= self.long_threshold {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for (i, bucket) in self.buckets.iter().enumerate() {
            let diff = (bucket.target_width - width).abs();
            match best {
                Some((_, best_diff)) if best_diff <= diff => {}
                _ => best = Some((i, diff)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Glyph variants of one short bucket
    pub fn bucket_glyphs(&self, bucket: usize) -> &[GlyphId] {
        &self.buckets[bucket].glyphs
    }

    /// Pick a glyph for a note `width` pixels long
    ///
    /// Short notes get a random variant from the nearest bucket; long notes
    /// (and every note if no short bucket exists) get the repeating tile.
    pub fn select<R: Rng + ?Sized>(&self, width: f64, rng: &mut R) -> GlyphId {
        match self.bucket_for(width) {
            Some(bucket) => {
                let variants = &self.buckets[bucket].glyphs;
                variants[rng.random_range(0..variants.len())]
            }
            None => self.long,
        }
    }
}
