//! Coverage fields: the pixel pipeline behind the goo effect, at cell
//! resolution. A word is rasterized into per-cell coverage, blurred,
//! composited against the other slot by opacity, then pushed through the
//! threshold transfer that merges the blurred overlap into one silhouette.

/// Nominal pixel geometry of one terminal cell. Blur radii arrive in
/// pixels; a cell is about twice as tall as it is wide, so vertical spread
/// uses half the horizontal cell count.
const CELL_PX_W: f32 = 8.0;
const CELL_PX_H: f32 = 16.0;

/// Row-major scalar grid of glyph coverage in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageField {
    width: u16,
    height: u16,
    data: Vec<f32>,
}

impl CoverageField {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn get(&self, x: u16, y: u16) -> f32 {
        self.data[self.idx(x, y)]
    }

    pub fn set(&mut self, x: u16, y: u16, value: f32) {
        let i = self.idx(x, y);
        self.data[i] = value;
    }

    fn idx(&self, x: u16, y: u16) -> usize {
        debug_assert!(x < self.width && y < self.height);
        y as usize * self.width as usize + x as usize
    }
}

/// Place `word` centered in a `width` x `height` grid, one cell per char.
/// Returns the coverage field and the glyph cells for character overlay.
/// Words wider than the grid are clipped at both edges.
pub fn rasterize(word: &str, width: u16, height: u16) -> (CoverageField, Vec<(u16, u16, char)>) {
    let mut field = CoverageField::new(width, height);
    let mut glyphs = Vec::new();

    if width == 0 || height == 0 {
        return (field, glyphs);
    }

    let chars: Vec<char> = word.chars().collect();
    let y = height / 2;
    let x0 = (i32::from(width) - chars.len() as i32) / 2;

    for (i, &ch) in chars.iter().enumerate() {
        let x = x0 + i as i32;

        if ch == ' ' || x < 0 || x >= i32::from(width) {
            continue;
        }

        let x = x as u16;
        field.set(x, y, 1.0);
        glyphs.push((x, y, ch));
    }

    (field, glyphs)
}

/// Separable clamp-to-edge box blur. The pixel radius is converted to
/// whole cells per axis; a radius under one cell leaves that axis crisp.
pub fn blur(field: &CoverageField, radius_px: f32) -> CoverageField {
    let radius_px = radius_px.max(0.0);
    let rx = (radius_px / CELL_PX_W) as i32;
    let ry = (radius_px / CELL_PX_H) as i32;

    if rx == 0 && ry == 0 {
        return field.clone();
    }

    let tmp = horizontal_pass(field, rx);
    vertical_pass(&tmp, ry)
}

fn horizontal_pass(src: &CoverageField, radius: i32) -> CoverageField {
    if radius == 0 {
        return src.clone();
    }

    let mut dst = CoverageField::new(src.width, src.height);
    let w = i32::from(src.width);
    let norm = 1.0 / (2 * radius + 1) as f32;

    for y in 0..src.height {
        for x in 0..w {
            let mut acc = 0.0;

            for dx in -radius..=radius {
                let sx = (x + dx).clamp(0, w - 1) as u16;
                acc += src.get(sx, y);
            }

            dst.set(x as u16, y, acc * norm);
        }
    }

    dst
}

fn vertical_pass(src: &CoverageField, radius: i32) -> CoverageField {
    if radius == 0 {
        return src.clone();
    }

    let mut dst = CoverageField::new(src.width, src.height);
    let h = i32::from(src.height);
    let norm = 1.0 / (2 * radius + 1) as f32;

    for y in 0..h {
        for x in 0..src.width {
            let mut acc = 0.0;

            for dy in -radius..=radius {
                let sy = (y + dy).clamp(0, h - 1) as u16;
                acc += src.get(x, sy);
            }

            dst.set(x, y as u16, acc * norm);
        }
    }

    dst
}

/// Opacity-weighted sum of the two slot fields, plus the incoming slot's
/// share of each cell for color mixing.
pub struct Composite {
    pub value: CoverageField,
    pub incoming_share: CoverageField,
}

/// Fields must have the same dimensions. `w_out` / `w_in` are the slot
/// opacities scaled to `[0, 1]`.
pub fn composite(
    outgoing: &CoverageField,
    w_out: f32,
    incoming: &CoverageField,
    w_in: f32,
) -> Composite {
    assert_eq!(
        (outgoing.width, outgoing.height),
        (incoming.width, incoming.height),
        "fields must have the same dimensions"
    );

    let mut value = CoverageField::new(outgoing.width, outgoing.height);
    let mut incoming_share = CoverageField::new(outgoing.width, outgoing.height);

    for y in 0..outgoing.height {
        for x in 0..outgoing.width {
            let from_out = outgoing.get(x, y) * w_out;
            let from_in = incoming.get(x, y) * w_in;
            let total = from_out + from_in;

            value.set(x, y, total);
            // Empty cells get a neutral share; they render blank anyway.
            let share = if total > 1e-6 { from_in / total } else { 0.5 };
            incoming_share.set(x, y, share);
        }
    }

    Composite {
        value,
        incoming_share,
    }
}

/// Alpha transfer that collapses soft coverage into a hard silhouette:
/// `a' = clamp(255a - 140)`. A steep step centered near 0.55.
pub fn threshold(v: f32) -> f32 {
    (v * 255.0 - 140.0).clamp(0.0, 1.0)
}
