//! RGBA pixel buffers and the immediate-mode drawing surface.
//!
//! [`Surface`] is the drawing contract the renderer and glyphs paint
//! through: clear, filled rectangles, blits with independent source and
//! destination rectangles, a smoothing toggle and raw pixel access.
//! [`Raster`] is the in-memory implementation used for textures, the atlas
//! and the backing store a host presents.
//!
//! Fills and blits composite source-over. Raw pixel writes replace the
//! destination pixel.

use crate::geometry::Rect;

/// Straight (non-premultiplied) RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    /// Outline color used for highlighted glyphs
    pub const HALO_GREEN: Color = Color::rgb(0, 255, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray with the same value on all three channels
    pub const fn gray(value: u8) -> Self {
        Self::rgb(value, value, value)
    }

    pub const fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Composite `self` over `dst`
    pub fn over(self, dst: Color) -> Color {
        match self.a {
            255 => self,
            0 => dst,
            _ => {
                let sa = self.a as f32 / 255.0;
                let da = dst.a as f32 / 255.0;
                let out_a = sa + da * (1.0 - sa);
                let mix = |s: u8, d: u8| -> u8 {
                    let v = (s as f32 * sa + d as f32 * da * (1.0 - sa)) / out_a;
                    v.round().clamp(0.0, 255.0) as u8
                };
                Color {
                    r: mix(self.r, dst.r),
                    g: mix(self.g, dst.g),
                    b: mix(self.b, dst.b),
                    a: (out_a * 255.0).round() as u8,
                }
            }
        }
    }
}

/// Immediate-mode 2D drawing target
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Reallocate the backing store; contents are cleared
    fn resize(&mut self, width: u32, height: u32);

    /// Reset every pixel to transparent
    fn clear(&mut self);

    /// Toggle filtered (bilinear) sampling for scaled blits
    fn set_smoothing(&mut self, enabled: bool);

    fn smoothing(&self) -> bool;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    /// Draw `src_rect` of `src` into `dst_rect`, scaling if the sizes differ
    fn blit(&mut self, src: &Raster, src_rect: Rect, dst_rect: Rect);

    /// Read a pixel; `None` outside the surface
    fn pixel(&self, x: i32, y: i32) -> Option<Color>;

    /// Overwrite a pixel without blending; ignored outside the surface
    fn put_pixel(&mut self, x: i32, y: i32, color: Color);
}

/// Owned RGBA8 pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
    smoothing: bool,
}

impl Raster {
    /// Create a fully transparent raster
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::TRANSPARENT; width as usize * height as usize],
            smoothing: true,
        }
    }

    /// Build a raster from tightly packed RGBA bytes (row-major)
    pub fn from_rgba(width: u32, height: u32, bytes: &[u8]) -> Result<Self, RasterError> {
        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: bytes.len(),
            });
        }
        let pixels = bytes
            .chunks_exact(4)
            .map(|px| Color::rgba(px[0], px[1], px[2], px[3]))
            .collect();
        Ok(Self {
            width,
            height,
            pixels,
            smoothing: true,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The whole raster as a rectangle at the origin
    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width as i32, self.height as i32)
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    /// Row-major pixel slice
    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    /// Copy out as packed RGBA bytes
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|c| [c.r, c.g, c.b, c.a])
            .collect()
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[inline]
    fn blend(&mut self, x: i32, y: i32, color: Color) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.over(self.pixels[i]);
        }
    }

    /// Bilinear sample at absolute source coordinates, clamped to `area`
    fn sample_bilinear(&self, area: &Rect, u: f32, v: f32) -> Color {
        let fx = (u - 0.5).max(area.left() as f32);
        let fy = (v - 0.5).max(area.top() as f32);
        let x0 = fx.floor() as i32;
        let y0 = fy.floor() as i32;
        let tx = fx - x0 as f32;
        let ty = fy - y0 as f32;
        let at = |x: i32, y: i32| {
            self.pixel(x.min(area.right() - 1), y.min(area.bottom() - 1))
                .unwrap_or(Color::TRANSPARENT)
        };
        let c00 = at(x0, y0);
        let c10 = at(x0 + 1, y0);
        let c01 = at(x0, y0 + 1);
        let c11 = at(x0 + 1, y0 + 1);
        let lerp = |a: u8, b: u8, t: f32| a as f32 + (b as f32 - a as f32) * t;
        let channel = |f: fn(&Color) -> u8| -> u8 {
            let top = lerp(f(&c00), f(&c10), tx);
            let bottom = lerp(f(&c01), f(&c11), tx);
            (top + (bottom - top) * ty).round().clamp(0.0, 255.0) as u8
        };
        Color {
            r: channel(|c| c.r),
            g: channel(|c| c.g),
            b: channel(|c| c.b),
            a: channel(|c| c.a),
        }
    }
}

impl Surface for Raster {
    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
        self.pixels = vec![Color::TRANSPARENT; width as usize * height as usize];
    }

    fn clear(&mut self) {
        self.pixels.fill(Color::TRANSPARENT);
    }

    fn set_smoothing(&mut self, enabled: bool) {
        self.smoothing = enabled;
    }

    fn smoothing(&self) -> bool {
        self.smoothing
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let area = rect.intersect(&self.bounds());
        for y in area.top()..area.bottom() {
            for x in area.left()..area.right() {
                self.blend(x, y, color);
            }
        }
    }

    fn blit(&mut self, src: &Raster, src_rect: Rect, dst_rect: Rect) {
        let src_area = src_rect.intersect(&src.bounds());
        if src_area.is_empty() || dst_rect.is_empty() {
            return;
        }
        let visible = dst_rect.intersect(&self.bounds());
        if visible.is_empty() {
            return;
        }

        // Source pixels per destination pixel along each axis
        let scale_x = src_rect.width as f32 / dst_rect.width as f32;
        let scale_y = src_rect.height as f32 / dst_rect.height as f32;
        let unscaled = src_rect.size() == dst_rect.size();

        for y in visible.top()..visible.bottom() {
            for x in visible.left()..visible.right() {
                // Pixel center mapped into absolute source coordinates
                let u = src_rect.x as f32 + ((x - dst_rect.x) as f32 + 0.5) * scale_x;
                let v = src_rect.y as f32 + ((y - dst_rect.y) as f32 + 0.5) * scale_y;
                let color = if unscaled || !self.smoothing {
                    let sx = u.floor() as i32;
                    let sy = v.floor() as i32;
                    if sx < src_area.left()
                        || sx >= src_area.right()
                        || sy < src_area.top()
                        || sy >= src_area.bottom()
                    {
                        continue;
                    }
                    match src.pixel(sx, sy) {
                        Some(c) => c,
                        None => continue,
                    }
                } else {
                    src.sample_bilinear(&src_area, u, v)
                };
                self.blend(x, y, color);
            }
        }
    }

    fn pixel(&self, x: i32, y: i32) -> Option<Color> {
        Raster::pixel(self, x, y)
    }

    fn put_pixel(&mut self, x: i32, y: i32, color: Color) {
        Raster::put_pixel(self, x, y, color)
    }
}

/// Errors raised while constructing a raster
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RasterError {
    /// Byte buffer does not match `width * height * 4`
    BufferSize { expected: usize, actual: usize },
}

impl std::fmt::Display for RasterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RasterError::BufferSize { expected, actual } => {
                write!(
                    f,
                    "RGBA buffer has {} bytes, expected {} bytes",
                    actual, expected
                )
            }
        }
    }
}

impl std::error::Error for RasterError {}
