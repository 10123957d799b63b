// certgen: drawing names onto the template

use crate::error::CertError;
use crate::font::LoadedFont;
use ::image::{Rgb, RgbImage};
use ab_glyph::{point, Font, GlyphId, ScaleFont};
use imageproc::drawing::draw_text_mut;

/// Pixel coordinate the text is centered on. Not checked against image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CenterPoint {
    pub x: i32,
    pub y: i32,
}

impl CenterPoint {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Middle of an image of the given size
    pub fn of_image(image: &RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self::new((width / 2) as i32, (height / 2) as i32)
    }
}

/// Right and bottom ink edges of `text` drawn from the origin, in pixels.
///
/// Glyphs are laid out the way `draw_text_mut` places them (pen on the
/// ascent line), so the measured box is the box that gets drawn.
pub fn measure_text(font: &LoadedFont, text: &str) -> (u32, u32) {
    let scaled = font.font.as_scaled(font.scale);
    let mut caret = 0.0f32;
    let mut last: Option<GlyphId> = None;
    let (mut right, mut bottom) = (0.0f32, 0.0f32);

    for ch in text.chars() {
        let glyph_id = scaled.glyph_id(ch);
        let glyph = glyph_id.with_scale_and_position(font.scale, point(caret, scaled.ascent()));
        caret += scaled.h_advance(glyph_id);

        if let Some(outlined) = font.font.outline_glyph(glyph) {
            if let Some(prev) = last {
                caret += scaled.kern(glyph_id, prev);
            }
            last = Some(glyph_id);
            let bounds = outlined.px_bounds();
            right = right.max(bounds.max.x);
            bottom = bottom.max(bounds.max.y);
        }
    }

    (right.ceil() as u32, bottom.ceil() as u32)
}

/// Top-left draw origin that centers a box of `size` on `center`.
pub fn centered_origin(center: CenterPoint, size: (u32, u32)) -> (i32, i32) {
    let (width, height) = size;
    (center.x - (width / 2) as i32, center.y - (height / 2) as i32)
}

/// Draw `text` centered on `center` over a copy of `template`.
///
/// Text that does not fit is clipped at the canvas edge.
pub fn render_centered_text(
    template: &RgbImage,
    text: &str,
    center: CenterPoint,
    font: &LoadedFont,
    color: Rgb<u8>,
) -> RgbImage {
    let mut canvas = template.clone();
    if text.is_empty() {
        return canvas;
    }

    let (x, y) = centered_origin(center, measure_text(font, text));
    draw_text_mut(&mut canvas, color, x, y, font.scale, &font.font, text);
    canvas
}

pub fn parse_hex_color(s: &str) -> Result<Rgb<u8>, CertError> {
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CertError::InvalidColor(s.to_string()));
    }

    let channel = |i: usize| {
        u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| CertError::InvalidColor(s.to_string()))
    };
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}
