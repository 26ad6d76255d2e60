//! # HarfBuzz-backed Fonts
//!
//! [`ShapedFont`] implements the [`Font`] measurement contract on top of a
//! HarfBuzz face. Run measurement goes through real shaping, so cluster
//! formation, kerning and mark placement are reflected in the per-code-unit
//! advances the line breaker sees; the other trait methods read glyph
//! metrics directly.

use harfbuzz_rs::{shape, Face, Feature, Font as HbFont, Owned, Tag, UnicodeBuffer};

use crate::font::{BoundsRect, Font, FontExtent};
use crate::utf16;

/// A font backed by a HarfBuzz face.
///
/// The face is scaled to its own units per em; all metrics are converted to
/// pixels with `size / upem` at query time.
#[derive(Debug)]
pub struct ShapedFont {
    font: Owned<HbFont<'static>>,
    upem: f32,
}

impl ShapedFont {
    /// Loads face `index` from raw font data.
    ///
    /// The data is copied and kept for the process lifetime, matching the
    /// usual pattern of loading an application's fonts once at startup.
    pub fn from_bytes(data: &[u8], index: u32) -> Self {
        let data: &'static [u8] = Box::leak(data.to_vec().into_boxed_slice());
        let face = Face::from_bytes(data, index);
        let mut font = HbFont::new(face);
        let upem = font.scale().0.max(1);
        font.set_scale(upem, upem);
        ShapedFont { font, upem: upem as f32 }
    }

    #[inline]
    fn px(&self, font_units: i32, size: f32) -> f32 {
        font_units as f32 * size / self.upem
    }

    fn nominal_glyph(&self, code_point: u32) -> Option<u32> {
        char::from_u32(code_point).and_then(|c| self.font.get_nominal_glyph(c))
    }
}

impl Font for ShapedFont {
    fn advance(&self, code_point: u32, size: f32) -> f32 {
        match self.nominal_glyph(code_point) {
            Some(glyph) => self.px(self.font.get_glyph_h_advance(glyph), size),
            None => 0.0,
        }
    }

    fn extent(&self, _code_point: u32, size: f32) -> FontExtent {
        match self.font.get_font_h_extents() {
            // HarfBuzz reports y-up: ascender positive, descender negative.
            Some(extents) => FontExtent::new(
                -self.px(extents.ascender, size),
                -self.px(extents.descender, size),
            ),
            None => FontExtent::default(),
        }
    }

    fn glyph_bounds(&self, code_point: u32, size: f32) -> BoundsRect {
        let Some(glyph) = self.nominal_glyph(code_point) else {
            return BoundsRect::default();
        };
        let Some(extents) = self.font.get_glyph_extents(glyph) else {
            return BoundsRect::default();
        };
        // y_bearing is the box top above the baseline; height grows downward
        // from there (negative in font units).
        BoundsRect::new(
            self.px(extents.x_bearing, size),
            -self.px(extents.y_bearing, size),
            self.px(extents.x_bearing + extents.width, size),
            -self.px(extents.y_bearing + extents.height, size),
        )
    }

    fn shape_run(&self, units: &[u16], size: f32, ignore_kerning: bool) -> Vec<f32> {
        if units.is_empty() {
            return Vec::new();
        }

        // HarfBuzz clusters refer to UTF-8 byte offsets of the buffer text.
        let view = utf16::Utf8View::new(units);
        let buffer = UnicodeBuffer::new().add_str(&view.text);
        let kern_off = [Feature::new(Tag::new('k', 'e', 'r', 'n'), 0, ..)];
        let features: &[Feature] = if ignore_kerning { &kern_off } else { &[] };
        let output = shape(&self.font, buffer, features);

        let positions = output.get_glyph_positions();
        let infos = output.get_glyph_infos();

        let mut advances = vec![0.0; units.len()];
        for (position, info) in positions.iter().zip(infos.iter()) {
            let unit = view.byte_to_unit[info.cluster as usize];
            advances[unit] += self.px(position.x_advance, size);
        }
        advances
    }
}
