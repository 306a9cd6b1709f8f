// Format-agnostic store of textures sampled by the column renderer.
// Procedural bitmaps and decoded images are both baked into the same
// `Texture` pixel array at scene-load time, so sampling never branches.

use crate::renderer::{Rgba, rgba};
use crate::world::map::Cell;

/// Things that can go wrong when baking a texture.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture has zero width or height")]
    Empty,

    /// Pixel / texel vector does not match `w * h`.
    #[error("expected {expected} texels for {w}x{h}, got {found}")]
    Size {
        w: usize,
        h: usize,
        expected: usize,
        found: usize,
    },

    /// Bitmap refers to a colour the palette does not have.
    #[error("bitmap index {index} outside palette of {len} colours")]
    Palette { index: u8, len: usize },
}

/// How a texture is described before it is baked.
#[derive(Clone, Debug, PartialEq)]
pub enum TextureSource {
    /// Small grid of palette indices.
    Bitmap {
        w: usize,
        h: usize,
        texels: Vec<u8>,
        palette: Vec<Rgba>,
    },
    /// Pixels decoded from a raster asset, already resampled to `w × h`.
    Image { w: usize, h: usize, pixels: Vec<Rgba> },
}

impl TextureSource {
    /// The 8×8 two-tone brick pattern used for material 1.
    pub fn brick() -> Self {
        #[rustfmt::skip]
        const BRICK: [u8; 64] = [
            1, 1, 1, 1, 1, 1, 1, 1,
            0, 0, 0, 1, 0, 0, 0, 1,
            1, 1, 1, 1, 1, 1, 1, 1,
            0, 1, 0, 0, 0, 1, 0, 0,
            1, 1, 1, 1, 1, 1, 1, 1,
            0, 0, 0, 1, 0, 0, 0, 1,
            1, 1, 1, 1, 1, 1, 1, 1,
            0, 1, 0, 0, 0, 1, 0, 0,
        ];
        TextureSource::Bitmap {
            w: 8,
            h: 8,
            texels: BRICK.to_vec(),
            palette: vec![rgba(255, 241, 232, 255), rgba(194, 195, 199, 255)],
        }
    }

    /// Resolve palette indices (if any) into a flat pixel array.
    pub fn bake(self) -> Result<Texture, TextureError> {
        match self {
            TextureSource::Image { w, h, pixels } => Texture::new(w, h, pixels),
            TextureSource::Bitmap {
                w,
                h,
                texels,
                palette,
            } => {
                let pixels = texels
                    .iter()
                    .map(|&i| {
                        palette.get(i as usize).copied().ok_or(TextureError::Palette {
                            index: i,
                            len: palette.len(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Texture::new(w, h, pixels)
            }
        }
    }
}

/// Immutable row-major pixel array with periodic sampling.
#[derive(Clone, Debug, PartialEq)]
pub struct Texture {
    w: usize,
    h: usize,
    pixels: Vec<Rgba>,
}

impl Texture {
    pub fn new(w: usize, h: usize, pixels: Vec<Rgba>) -> Result<Self, TextureError> {
        if w == 0 || h == 0 {
            return Err(TextureError::Empty);
        }
        if pixels.len() != w * h {
            return Err(TextureError::Size {
                w,
                h,
                expected: w * h,
                found: pixels.len(),
            });
        }
        Ok(Self { w, h, pixels })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.h
    }

    /// Colour at texel `(u, v)`; both wrap, so any integer is valid.
    #[inline]
    pub fn sample(&self, u: i32, v: i32) -> Rgba {
        let u = u.rem_euclid(self.w as i32) as usize;
        let v = v.rem_euclid(self.h as i32) as usize;
        self.pixels[v * self.w + u]
    }
}

/// All textures a scene can sample.
///
/// * wall material `m` (map code `m > 0`) uses `walls[m - 1]`;
/// * floor cell code `c` uses `floors[c]`, falling back to `floors[0]`;
/// * the background strip is optional and simply skipped when absent.
#[derive(Clone, Debug, Default)]
pub struct TextureBank {
    walls: Vec<Texture>,
    floors: Vec<Texture>,
    background: Option<Texture>,
}

impl TextureBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the texture for the next wall material; returns its code.
    pub fn push_wall(&mut self, tex: Texture) -> Cell {
        self.walls.push(tex);
        self.walls.len() as Cell
    }

    pub fn push_floor(&mut self, tex: Texture) {
        self.floors.push(tex);
    }

    pub fn set_background(&mut self, tex: Texture) {
        self.background = Some(tex);
    }

    /// Number of wall materials (codes `1 ..= wall_count`).
    pub fn wall_count(&self) -> usize {
        self.walls.len()
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    #[inline]
    pub fn wall(&self, material: Cell) -> Option<&Texture> {
        material
            .checked_sub(1)
            .and_then(|i| self.walls.get(i as usize))
    }

    #[inline]
    pub fn floor(&self, cell: Cell) -> Option<&Texture> {
        self.floors.get(cell as usize).or_else(|| self.floors.first())
    }

    #[inline]
    pub fn background(&self) -> Option<&Texture> {
        self.background.as_ref()
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: usize, h: usize, color: Rgba) -> Texture {
        Texture::new(w, h, vec![color; w * h]).unwrap()
    }

    #[test]
    fn brick_bakes_through_palette() {
        let tex = TextureSource::brick().bake().unwrap();
        assert_eq!((tex.width(), tex.height()), (8, 8));
        assert_eq!(tex.sample(0, 0), rgba(194, 195, 199, 255));
        assert_eq!(tex.sample(0, 1), rgba(255, 241, 232, 255));
        assert_eq!(tex.sample(3, 1), rgba(194, 195, 199, 255));
    }

    #[test]
    fn bad_palette_index_rejected() {
        let src = TextureSource::Bitmap {
            w: 1,
            h: 1,
            texels: vec![2],
            palette: vec![0xFF_000000],
        };
        assert_eq!(
            src.bake().unwrap_err(),
            TextureError::Palette { index: 2, len: 1 }
        );
    }

    #[test]
    fn size_mismatch_rejected() {
        let err = Texture::new(2, 2, vec![0; 3]).unwrap_err();
        assert!(matches!(err, TextureError::Size { expected: 4, .. }));
        assert_eq!(Texture::new(0, 4, vec![]).unwrap_err(), TextureError::Empty);
    }

    #[test]
    fn sampling_wraps_any_coordinate() {
        let pixels = (0..12).collect::<Vec<Rgba>>();
        let tex = Texture::new(4, 3, pixels).unwrap();
        assert_eq!(tex.sample(1, 2), 9);
        assert_eq!(tex.sample(5, 2), 9);
        assert_eq!(tex.sample(-3, -1), 9);
        assert_eq!(tex.sample(i32::MAX, i32::MIN), tex.sample(3, 1));
    }

    #[test]
    fn bank_lookup_rules() {
        let mut bank = TextureBank::new();
        assert!(bank.floor(0).is_none());
        assert!(bank.background().is_none());

        let brick = bank.push_wall(solid(2, 2, 1));
        let image = bank.push_wall(solid(2, 2, 2));
        assert_eq!((brick, image), (1, 2));
        assert_eq!(bank.wall(2).unwrap().sample(0, 0), 2);
        assert!(bank.wall(0).is_none());
        assert!(bank.wall(3).is_none());

        bank.push_floor(solid(1, 1, 7));
        assert_eq!(bank.floor(0).unwrap().sample(0, 0), 7);
        // unknown codes fall back to the default floor
        assert_eq!(bank.floor(5).unwrap().sample(0, 0), 7);
    }
}
