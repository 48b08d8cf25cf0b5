//! Draws one [`FrameVisual`] into a terminal buffer: both slots are
//! rasterized, blurred, opacity-composited, then thresholded into the goo
//! silhouette. Glyph cells of the dominant slot keep their characters;
//! every other lit cell gets a shade glyph.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::Widget;

use crate::color;
use crate::error::{MorphError, MorphResult};
use crate::field;
use crate::visual::FrameVisual;

/// Shade ramp for goo cells that carry no glyph.
const SHADES: [char; 4] = ['░', '▒', '▓', '█'];

/// Share of a lit cell's pre-threshold mass a slot must contribute before
/// its character is drawn instead of a shade.
const GLYPH_DOMINANCE: f32 = 0.5;

/// Stateless widget over one frame's visual parameters. Rendering is a
/// pure function of the visual and the draw area.
pub struct MorphView<'a> {
    visual: &'a FrameVisual,
    outgoing_color: Color,
    incoming_color: Color,
}

impl<'a> MorphView<'a> {
    pub fn new(visual: &'a FrameVisual) -> Self {
        Self {
            visual,
            outgoing_color: Color::White,
            incoming_color: Color::White,
        }
    }

    pub fn colors(mut self, outgoing: Color, incoming: Color) -> Self {
        self.outgoing_color = outgoing;
        self.incoming_color = incoming;
        self
    }
}

impl Widget for MorphView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let (w, h) = (area.width, area.height);

        let (out_field, out_glyphs) = field::rasterize(&self.visual.outgoing.word, w, h);
        let (in_field, in_glyphs) = field::rasterize(&self.visual.incoming.word, w, h);

        let out_blurred = field::blur(&out_field, self.visual.outgoing.blur_px);
        let in_blurred = field::blur(&in_field, self.visual.incoming.blur_px);

        let composite = field::composite(
            &out_blurred,
            self.visual.outgoing.opacity_percent / 100.0,
            &in_blurred,
            self.visual.incoming.opacity_percent / 100.0,
        );

        let out_glyph = glyph_grid(&out_glyphs, w, h);
        let in_glyph = glyph_grid(&in_glyphs, w, h);

        for y in 0..h {
            for x in 0..w {
                let a = field::threshold(composite.value.get(x, y));

                if a <= 0.0 {
                    continue;
                }

                let share = composite.incoming_share.get(x, y);
                let i = y as usize * w as usize + x as usize;

                let symbol = if share >= GLYPH_DOMINANCE {
                    in_glyph[i]
                } else {
                    out_glyph[i]
                };
                let symbol = symbol.unwrap_or_else(|| shade(a));

                let fg = color::scale_lightness(
                    color::mix(self.outgoing_color, self.incoming_color, share),
                    a,
                );

                let cell = &mut buf[(area.x + x, area.y + y)];
                cell.set_char(symbol);
                cell.set_style(Style::new().fg(fg));
            }
        }
    }
}

/// The draw area must host the longest word on one row.
pub fn surface_fits(area: Rect, words: &[String]) -> MorphResult<()> {
    let needed_width = words
        .iter()
        .map(|w| w.chars().count())
        .max()
        .unwrap_or(0)
        .min(u16::MAX as usize) as u16;

    if area.width < needed_width || area.height < 1 {
        return Err(MorphError::SurfaceTooSmall {
            needed_width,
            needed_height: 1,
            actual_width: area.width,
            actual_height: area.height,
        });
    }

    Ok(())
}

fn glyph_grid(cells: &[(u16, u16, char)], width: u16, height: u16) -> Vec<Option<char>> {
    let mut grid = vec![None; width as usize * height as usize];

    for &(x, y, ch) in cells {
        grid[y as usize * width as usize + x as usize] = Some(ch);
    }

    grid
}

fn shade(a: f32) -> char {
    let idx = ((a * SHADES.len() as f32).ceil() as usize).clamp(1, SHADES.len());
    SHADES[idx - 1]
}
