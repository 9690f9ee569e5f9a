//! Roll widget - shows a raster with half-block cells
//!
//! Each terminal cell holds two vertically stacked pixels: the upper one as
//! the `▀` foreground, the lower one as the background.

use pixelroll::raster::{Color as Pixel, Raster};
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

const BACKDROP: Pixel = Pixel::rgb(18, 16, 28);

pub struct RollView<'a> {
    surface: &'a Raster,
}

impl<'a> RollView<'a> {
    pub fn new(surface: &'a Raster) -> Self {
        Self { surface }
    }

    fn color_at(&self, x: i32, y: i32) -> Color {
        let p = self
            .surface
            .pixel(x, y)
            .map_or(BACKDROP, |p| p.over(BACKDROP));
        Color::Rgb(p.r, p.g, p.b)
    }
}

impl Widget for RollView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for row in 0..area.height {
            for col in 0..area.width {
                let (x, y) = (col as i32, row as i32 * 2);
                let upper = self.color_at(x, y);
                let lower = self.color_at(x, y + 1);
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_char('▀').set_fg(upper).set_bg(lower);
                }
            }
        }
    }
}
