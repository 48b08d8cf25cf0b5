//! Perceptual fades over ratatui colors, via Oklab.
//!
//! The renderer needs exactly two operations: scaling a color's lightness
//! by the thresholded goo value, and mixing the two slot colors by the
//! incoming slot's share of a cell. Both are done in Oklab so the fades
//! read as uniform; colors without a concrete RGB form (`Reset`,
//! `Indexed`) fall back to nearest-endpoint picks.

use ratatui::style::Color;

#[derive(Debug, Clone, Copy)]
struct Oklab {
    l: f32,
    a: f32,
    b: f32,
}

#[derive(Debug, Clone, Copy)]
struct LinRgb {
    r: f32,
    g: f32,
    b: f32,
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn linear_rgb_to_oklab(rgb: LinRgb) -> Oklab {
    let LinRgb { r, g, b } = rgb;

    let l = 0.4122214708 * r + 0.5363325363 * g + 0.0514459929 * b;
    let m = 0.2119034982 * r + 0.6806995451 * g + 0.1073969566 * b;
    let s = 0.0883024619 * r + 0.2817188376 * g + 0.6299787005 * b;

    let l = l.cbrt();
    let m = m.cbrt();
    let s = s.cbrt();

    Oklab {
        l: 0.2104542553 * l + 0.7936177850 * m - 0.0040720468 * s,
        a: 1.9779984951 * l - 2.4285922050 * m + 0.4505937099 * s,
        b: 0.0259040371 * l + 0.7827717662 * m - 0.8086757660 * s,
    }
}

fn oklab_to_linear_rgb(lab: Oklab) -> LinRgb {
    let Oklab { l, a, b } = lab;

    let l_ = l + 0.3963377774 * a + 0.2158037573 * b;
    let m_ = l - 0.1055613458 * a - 0.0638541728 * b;
    let s_ = l - 0.0894841775 * a - 1.2914855480 * b;

    let l = l_ * l_ * l_;
    let m = m_ * m_ * m_;
    let s = s_ * s_ * s_;

    LinRgb {
        r: 4.0767416621 * l - 3.3077115913 * m + 0.2309699292 * s,
        g: -1.2684380046 * l + 2.6097574011 * m - 0.3413193965 * s,
        b: -0.0041960863 * l - 0.7034186147 * m + 1.7076147010 * s,
    }
}

fn srgb_to_oklab(r: u8, g: u8, b: u8) -> Oklab {
    linear_rgb_to_oklab(LinRgb {
        r: srgb_to_linear(r as f32 / 255.0),
        g: srgb_to_linear(g as f32 / 255.0),
        b: srgb_to_linear(b as f32 / 255.0),
    })
}

fn oklab_to_color(lab: Oklab) -> Color {
    let lin = oklab_to_linear_rgb(lab);
    let to_u8 = |c: f32| (linear_to_srgb(c.clamp(0.0, 1.0)) * 255.0 + 0.5) as u8;

    Color::Rgb(to_u8(lin.r), to_u8(lin.g), to_u8(lin.b))
}

/// `None` means the color has no concrete RGB representation to fade.
fn color_to_oklab(color: Color) -> Option<Oklab> {
    match color {
        Color::Rgb(r, g, b) => Some(srgb_to_oklab(r, g, b)),
        Color::Black => Some(srgb_to_oklab(0, 0, 0)),
        Color::Red => Some(srgb_to_oklab(128, 0, 0)),
        Color::Green => Some(srgb_to_oklab(0, 128, 0)),
        Color::Yellow => Some(srgb_to_oklab(128, 128, 0)),
        Color::Blue => Some(srgb_to_oklab(0, 0, 128)),
        Color::Magenta => Some(srgb_to_oklab(128, 0, 128)),
        Color::Cyan => Some(srgb_to_oklab(0, 128, 128)),
        Color::Gray => Some(srgb_to_oklab(192, 192, 192)),
        Color::DarkGray => Some(srgb_to_oklab(128, 128, 128)),
        Color::LightRed => Some(srgb_to_oklab(255, 0, 0)),
        Color::LightGreen => Some(srgb_to_oklab(0, 255, 0)),
        Color::LightYellow => Some(srgb_to_oklab(255, 255, 0)),
        Color::LightBlue => Some(srgb_to_oklab(0, 0, 255)),
        Color::LightMagenta => Some(srgb_to_oklab(255, 0, 255)),
        Color::LightCyan => Some(srgb_to_oklab(0, 255, 255)),
        Color::White => Some(srgb_to_oklab(255, 255, 255)),
        Color::Reset | Color::Indexed(_) => None,
    }
}

/// Scale lightness by `factor` (0.0 = black, 1.0 = unchanged).
pub fn scale_lightness(color: Color, factor: f32) -> Color {
    let factor = factor.clamp(0.0, 1.0);

    match color_to_oklab(color) {
        Some(lab) => oklab_to_color(Oklab {
            l: lab.l * factor,
            ..lab
        }),
        None if factor >= 0.5 => color,
        None => Color::Reset,
    }
}

/// Mix two colors; `t` is the share of `dst`.
pub fn mix(src: Color, dst: Color, t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);

    match (color_to_oklab(src), color_to_oklab(dst)) {
        (Some(a), Some(b)) => oklab_to_color(Oklab {
            l: a.l + (b.l - a.l) * t,
            a: a.a + (b.a - a.a) * t,
            b: a.b + (b.b - a.b) * t,
        }),
        _ if t < 0.5 => src,
        _ => dst,
    }
}
