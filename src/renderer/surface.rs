//! Host-visible output: the projection buffer magnified by an integer
//! factor, plus the "click to focus" overlay painted on pause.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use super::{OPAQUE_BLACK, Rgba};

const OVERLAY_TEXT: &str = "CLICK TO FOCUS";
/// Left edge of the overlay text, in projection pixels.
const OVERLAY_X: usize = 37;
const TEXT_COLOR: Rgba = 0xFF_FFFFFF;

const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;
const ADVANCE: usize = GLYPH_W + 1;

type Glyph = [u8; GLYPH_H];

/// 5×7 bitmaps for the overlay text; bit 4 is the leftmost column.
static GLYPHS: Lazy<HashMap<char, Glyph>> = Lazy::new(|| {
    HashMap::from([
        ('C', [0b01110, 0b10001, 0b10000, 0b10000, 0b10000, 0b10001, 0b01110]),
        ('F', [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000]),
        ('I', [0b01110, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110]),
        ('K', [0b10001, 0b10010, 0b10100, 0b11000, 0b10100, 0b10010, 0b10001]),
        ('L', [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111]),
        ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
        ('S', [0b01111, 0b10000, 0b10000, 0b01110, 0b00001, 0b00001, 0b11110]),
        ('T', [0b11111, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100, 0b00100]),
        ('U', [0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ])
});

/// Halve every colour channel, keep the pixel opaque.
#[inline]
fn dim(c: Rgba) -> Rgba {
    ((c >> 1) & 0x00_7F7F7F) | 0xFF_000000
}

pub struct Surface {
    logical_w: usize,
    logical_h: usize,
    scale: usize,
    pixels: Vec<Rgba>,
}

impl Surface {
    /// Surface showing a `logical_w × logical_h` frame at `scale`×.
    pub fn new(logical_w: usize, logical_h: usize, scale: usize) -> Self {
        let scale = scale.max(1);
        Self {
            logical_w,
            logical_h,
            scale,
            pixels: vec![OPAQUE_BLACK; logical_w * scale * logical_h * scale],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.logical_w * self.scale
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.logical_h * self.scale
    }

    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Copy a finished frame, replicating each source pixel into a
    /// `scale × scale` block.  Frames of another size are ignored.
    pub fn present(&mut self, src: &[Rgba], w: usize, h: usize) {
        if w != self.logical_w || h != self.logical_h || src.len() != w * h {
            log::warn!("dropping {w}x{h} frame for {}x{} surface", self.logical_w, self.logical_h);
            return;
        }
        let dst_w = self.width();
        for (y, row) in src.chunks_exact(w).enumerate() {
            let first = y * self.scale * dst_w;
            {
                let line = &mut self.pixels[first..first + dst_w];
                for (x, &c) in row.iter().enumerate() {
                    line[x * self.scale..(x + 1) * self.scale].fill(c);
                }
            }
            for r in 1..self.scale {
                self.pixels.copy_within(first..first + dst_w, first + r * dst_w);
            }
        }
    }

    /// Darken the last presented frame and write the focus prompt,
    /// vertically centred, starting at column 37 of the logical frame.
    pub fn draw_pause_overlay(&mut self) {
        for p in &mut self.pixels {
            *p = dim(*p);
        }

        // the text sits on the centre line, like a baseline
        let top = (self.logical_h / 2).saturating_sub(GLYPH_H);
        for (i, ch) in OVERLAY_TEXT.chars().enumerate() {
            let Some(glyph) = GLYPHS.get(&ch) else {
                continue; // space
            };
            let left = OVERLAY_X + i * ADVANCE;
            for (gy, bits) in glyph.iter().enumerate() {
                for gx in 0..GLYPH_W {
                    if bits & (0b10000 >> gx) != 0 {
                        self.fill_logical(left + gx, top + gy, TEXT_COLOR);
                    }
                }
            }
        }
    }

    /// Paint one logical pixel (a `scale × scale` block), clipped.
    fn fill_logical(&mut self, x: usize, y: usize, c: Rgba) {
        if x >= self.logical_w || y >= self.logical_h {
            return;
        }
        let dst_w = self.width();
        for r in 0..self.scale {
            let start = (y * self.scale + r) * dst_w + x * self.scale;
            self.pixels[start..start + self.scale].fill(c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn present_magnifies_each_pixel() {
        let mut s = Surface::new(2, 2, 3);
        s.present(&[1, 2, 3, 4], 2, 2);
        assert_eq!((s.width(), s.height()), (6, 6));
        let px = s.pixels();
        assert_eq!(&px[0..6], &[1, 1, 1, 2, 2, 2]);
        assert_eq!(&px[12..18], &[1, 1, 1, 2, 2, 2]);
        assert_eq!(&px[18..24], &[3, 3, 3, 4, 4, 4]);
        assert_eq!(px[35], 4);
    }

    #[test]
    fn wrong_sized_frame_is_ignored() {
        let mut s = Surface::new(2, 2, 1);
        s.present(&[7; 9], 3, 3);
        assert!(s.pixels().iter().all(|&p| p == OPAQUE_BLACK));
    }

    #[test]
    fn overlay_dims_and_writes_text() {
        let mut s = Surface::new(160, 120, 1);
        s.present(&vec![0xFF_C8C8C8; 160 * 120], 160, 120);
        s.draw_pause_overlay();

        let px = s.pixels();
        assert_eq!(px[0], 0xFF_646464);
        let white = px.iter().filter(|&&p| p == TEXT_COLOR).count();
        assert!(white > 50, "only {white} text pixels");
        // 'C' starts with a blank column then the top bar
        assert_eq!(px[(60 - GLYPH_H) * 160 + 38], TEXT_COLOR);
        assert_eq!(px[(60 - GLYPH_H) * 160 + 37], 0xFF_646464);
    }

    #[test]
    fn every_overlay_letter_has_a_glyph() {
        for ch in OVERLAY_TEXT.chars().filter(|c| !c.is_whitespace()) {
            assert!(GLYPHS.contains_key(&ch), "missing glyph {ch}");
        }
    }
}
