//! ---------------------------------------------------------------------------
//! Classic software (CPU) column renderer
//!
//! * Fills an internal `Vec<u32>` projection buffer in **0xAARRGGBB** format.
//! * Each column is drawn back to front: background strip above the wall,
//!   textured wall slice, then inverse-projected floor below it.
//! * Every write is clipped to the buffer; wall slices of clamped height
//!   may extend far beyond it.
//! ---------------------------------------------------------------------------

use glam::Vec2;

use crate::{
    engine::Ray,
    renderer::{OPAQUE_BLACK, Renderer, Rgba},
    sim::Player,
    world::{Scene, Texture},
};

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

/// Raycaster column renderer.
#[derive(Default)]
pub struct Software {
    scratch: Vec<Rgba>,
    width: usize,
    height: usize,
    height_f: f32,
    half_h: f32,
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize) {
        // (re)allocate if resolution changed
        if w != self.width || h != self.height {
            self.width = w;
            self.height = h;
            self.height_f = h as f32;
            self.half_h = self.height_f * 0.5;
            self.scratch.resize(w * h, 0);
        }
        self.scratch.fill(OPAQUE_BLACK);
    }

    fn draw_column(&mut self, ray: &Ray, player: &Player, scene: &Scene) {
        if ray.column >= self.width {
            return;
        }
        // integer half-height, as the rows below are laid out on whole pixels
        let wall_h = ray.wall_height.floor();

        if let Some(bg) = scene.textures().background() {
            self.draw_background(ray.column, self.half_h - wall_h, player, bg);
        }

        let tex = scene.wall_texture(ray.material);
        self.draw_wall(ray.column, wall_h, ray.texture_u(tex.width()), tex);

        self.draw_floor(ray, wall_h, player, scene);
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        submit(&self.scratch, self.width, self.height);
    }
}

/*──────────────────────── column passes ──────────────────────────────*/

impl Software {
    /// Finished (or in-progress) projection buffer.
    #[inline]
    pub fn frame(&self) -> &[Rgba] {
        &self.scratch
    }

    #[inline]
    fn put(&mut self, x: usize, y: usize, color: Rgba) {
        self.scratch[y * self.width + x] = color;
    }

    /// Rows `y1, y1 + 1, …` while `< y2`, each written at `floor(row)`.
    fn fill_span(&mut self, x: usize, y1: f32, y2: f32, color: Rgba) {
        let skip = (-y1).ceil().max(0.0);
        let limit = y2.min(self.height_f);
        let mut y = y1 + skip;
        while y < limit {
            self.put(x, y as usize, color);
            y += 1.0;
        }
    }

    /// Parallax strip for rows `0 .. top`, indexed by view angle + column.
    fn draw_background(&mut self, x: usize, top: f32, player: &Player, bg: &Texture) {
        let u = (player.angle + x as f32).floor() as i32;
        let rows = top.clamp(0.0, self.height_f) as usize;
        for y in 0..rows {
            let color = bg.sample(u, y as i32);
            self.put(x, y, color);
        }
    }

    /// One texel row at a time, stretched over `2 * wall_h` device rows.
    ///
    /// Each texel run is extended by 2 rows so integer rounding never
    /// leaves a gap between neighbouring texels.
    fn draw_wall(&mut self, x: usize, wall_h: f32, u: i32, tex: &Texture) {
        let step = wall_h * 2.0 / tex.height() as f32;
        let mut y = self.half_h - wall_h;
        for v in 0..tex.height() {
            if y >= self.height_f {
                break;
            }
            let color = tex.sample(u, v as i32);
            self.fill_span(x, y, (y + step + 2.0).floor(), color);
            y += step;
        }
    }

    /// Inverse-project every row below the wall onto the floor plane.
    fn draw_floor(&mut self, ray: &Ray, wall_h: f32, player: &Player, scene: &Scene) {
        let start = self.half_h + wall_h + 1.0;
        if start >= self.height_f {
            return;
        }
        let (s, c) = ray.angle.to_radians().sin_cos();
        let dir = Vec2::new(c, s);
        let correction = (player.angle - ray.angle).to_radians().cos();

        for y in start as usize..self.height {
            let row_distance = self.height_f / (2.0 * y as f32 - self.height_f) / correction;
            let tile = player.pos + dir * row_distance;

            let Some(cell) = scene.map().cell_at(tile) else {
                continue;
            };
            let Some(tex) = scene.textures().floor(cell) else {
                continue;
            };
            let (u, v) = floor_texel(tile, tex.width(), tex.height());
            let color = tex.sample(u, v);
            self.put(ray.column, y, color);
        }
    }
}

/// Texel under world point `tile` for a `w × h` floor texture that
/// repeats once per map cell.
#[inline]
pub fn floor_texel(tile: Vec2, w: usize, h: usize) -> (i32, i32) {
    let u = (tile.x * w as f32).floor() as i32;
    let v = (tile.y * h as f32).floor() as i32;
    (u.rem_euclid(w as i32), v.rem_euclid(h as i32))
}

/*──────────────────────────────── Tests ───────────────────────────────*/
