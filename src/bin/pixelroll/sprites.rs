//! Built-in note atlas, painted at startup
//!
//! Each registered rectangle gets a small pixel-art capsule. The long tile
//! has no end caps so repeated copies read as one bar.

use pixelroll::geometry::Rect;
use pixelroll::glyph::GlyphRegistry;
use pixelroll::raster::{Color, Raster};

const OUTLINE: Color = Color::rgb(40, 24, 56);

const BODIES: [Color; 5] = [
    Color::rgb(232, 98, 120),
    Color::rgb(246, 176, 72),
    Color::rgb(120, 196, 232),
    Color::rgb(164, 120, 232),
    Color::rgb(98, 208, 150),
];

fn lighten(c: Color) -> Color {
    let up = |v: u8| v.saturating_add((255 - v) / 2);
    Color::rgb(up(c.r), up(c.g), up(c.b))
}

fn darken(c: Color) -> Color {
    Color::rgb(c.r / 4 * 3, c.g / 4 * 3, c.b / 4 * 3)
}

/// Paint one capsule into `rect`; `caps` rounds and closes the ends
fn paint_note(raster: &mut Raster, rect: Rect, body: Color, caps: bool) {
    let (left, top) = (rect.left(), rect.top());
    let (right, bottom) = (rect.right() - 1, rect.bottom() - 1);

    for y in top..=bottom {
        for x in left..=right {
            let at_end = x == left || x == right;
            let at_edge = y == top || y == bottom;
            let corner = at_end && at_edge;

            let color = if caps && corner {
                continue;
            } else if at_edge || (caps && at_end) {
                OUTLINE
            } else if y == top + 1 {
                lighten(body)
            } else if y == bottom - 1 {
                darken(body)
            } else {
                body
            };
            raster.put_pixel(x, y, color);
        }
    }
}

/// Atlas covering every rectangle of `registry`
pub fn paint_atlas(registry: &GlyphRegistry) -> Raster {
    let (width, height) = registry.required_atlas_size();
    let mut raster = Raster::new(width, height);

    let mut palette = BODIES.iter().cycle();
    for bucket in &registry.short {
        for &rect in &bucket.variants {
            let body = palette.next().copied().unwrap_or(Color::WHITE);
            paint_note(&mut raster, rect, body, true);
        }
    }
    paint_note(&mut raster, registry.long, BODIES[2], false);

    log::debug!("painted {}x{} note atlas", raster.width(), raster.height());
    raster
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_atlas_fills_every_glyph() {
        let registry = GlyphRegistry::standard();
        let atlas = paint_atlas(&registry);
        assert_eq!((atlas.width(), atlas.height()), (202, 38));

        let long = registry.long;
        assert_eq!(atlas.pixel(long.left(), long.top() + 5), Some(BODIES[2]));
        let first = registry.short[0].variants[0];
        assert!(atlas.pixel(first.left(), first.top()).unwrap().is_transparent());
        assert_eq!(atlas.pixel(first.left() + 1, first.top()), Some(OUTLINE));
    }
}
