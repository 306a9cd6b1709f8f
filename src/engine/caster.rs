//! Per-column ray marching against the map grid.
//!
//! Rays advance in fixed steps of `1 / precision` cells and stop on the
//! first non-zero cell.  The raw distance is multiplied by the cosine of
//! the ray's offset from the view direction (fisheye correction) so flat
//! walls stay flat.

use glam::Vec2;

use super::Projection;
use crate::{
    sim::Player,
    world::{Cell, EMPTY, Map},
};

/// Material used when a ray leaves the grid without hitting anything.
pub const ESCAPE_MATERIAL: Cell = 1;

/// Result of casting one column.  Lives for a single frame only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub column: usize,
    pub angle: f32, // degrees
    pub origin: Vec2,
    pub dir: Vec2,
    /// March position where the ray stopped.
    pub hit: Vec2,
    pub material: Cell,
    /// Stopped by the grid edge or the step cap instead of a wall cell.
    pub escaped: bool,
    pub steps: u32,
    pub distance: f32,
    pub corrected: f32,
    /// Half the projected wall height in pixels, already clamped.
    pub wall_height: f32,
}

impl Ray {
    /// Texture column for this hit: `floor(w * (hit.x + hit.y)) mod w`.
    ///
    /// Summing both coordinates stands in for tracking which wall face
    /// was struck, so orientation depends on coordinate parity.
    #[inline]
    pub fn texture_u(&self, tex_w: usize) -> i32 {
        let u = (tex_w as f32 * (self.hit.x + self.hit.y)).floor() as i32;
        u.rem_euclid(tex_w as i32)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct RayCaster {
    precision: u32,
    min_distance: f32,
    projection: Projection,
}

impl RayCaster {
    pub fn new(precision: u32, min_distance: f32, projection: Projection) -> Self {
        Self {
            precision,
            min_distance,
            projection,
        }
    }

    #[inline]
    pub fn projection(&self) -> Projection {
        self.projection
    }

    /// `player.angle - half_fov + column * fov / width`, in degrees.
    #[inline]
    pub fn ray_angle(&self, player: &Player, column: usize) -> f32 {
        player.angle - player.half_fov + column as f32 * (player.fov / self.projection.w as f32)
    }

    /// Half-height in pixels of a wall at `corrected` distance.
    ///
    /// Distances below the configured floor are clamped so a wall touching
    /// the eye yields a large but finite height.
    #[inline]
    pub fn wall_height(&self, corrected: f32) -> f32 {
        self.projection.half_h / corrected.max(self.min_distance)
    }

    /// Upper bound on march steps for `map`; a closed map never reaches it.
    #[inline]
    pub fn max_steps(&self, map: &Map) -> u32 {
        let span = u32::try_from(map.width() + map.height()).unwrap_or(u32::MAX);
        self.precision.saturating_mul(span)
    }

    pub fn cast(&self, map: &Map, player: &Player, column: usize) -> Ray {
        let angle = self.ray_angle(player, column);
        let (s, c) = angle.to_radians().sin_cos();
        let dir = Vec2::new(c, s);
        let step = dir / self.precision as f32;
        let max_steps = self.max_steps(map);

        let mut p = player.pos;
        let mut steps = 0;
        let (material, escaped) = loop {
            p += step;
            steps += 1;
            match map.cell_at(p) {
                _ if !map.contains(p) => break (ESCAPE_MATERIAL, true),
                Some(EMPTY) if steps < max_steps => {}
                Some(EMPTY) | None => break (ESCAPE_MATERIAL, true),
                Some(code) => break (code, false),
            }
        };

        let distance = (p - player.pos).length();
        let corrected = distance * (angle - player.angle).to_radians().cos();

        Ray {
            column,
            angle,
            origin: player.pos,
            dir,
            hit: p,
            material,
            escaped,
            steps,
            distance,
            corrected,
            wall_height: self.wall_height(corrected),
        }
    }

    /// Cast every column into `out` (cleared first).
    pub fn cast_all(&self, map: &Map, player: &Player, out: &mut Vec<Ray>) {
        out.clear();
        out.extend((0..self.projection.w).map(|col| self.cast(map, player, col)));
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlayerConfig;

    const PRECISION: u32 = 64;

    fn caster() -> RayCaster {
        RayCaster::new(PRECISION, 0.05, Projection::new(160, 120))
    }

    fn player_at(x: f32, y: f32, angle: f32) -> Player {
        Player::new(&PlayerConfig {
            x,
            y,
            angle,
            ..PlayerConfig::default()
        })
    }

    fn room(w: usize, h: usize) -> Map {
        let rows: Vec<Vec<Cell>> = (0..h)
            .map(|y| {
                (0..w)
                    .map(|x| Cell::from(x == 0 || y == 0 || x == w - 1 || y == h - 1))
                    .collect()
            })
            .collect();
        Map::from_rows(&rows).unwrap()
    }

    #[test]
    fn centre_column_needs_no_correction() {
        let map = Map::reference();
        let ray = caster().cast(&map, &player_at(2.0, 2.0, 90.0), 80);
        assert_eq!(ray.angle, 90.0);
        assert_eq!(ray.corrected, ray.distance);
        assert!(!ray.escaped);
    }

    #[test]
    fn corridor_distance_is_eight() {
        // 1-wide corridor along +X, wall at x = 9
        let mut rows = vec![vec![1u16; 10]; 3];
        rows[1][1..9].fill(0);
        let map = Map::from_rows(&rows).unwrap();

        let ray = caster().cast(&map, &player_at(1.0, 1.5, 0.0), 80);
        assert!((ray.corrected - 8.0).abs() <= 1.0 / PRECISION as f32);
        assert_eq!(ray.material, 1);
    }

    #[test]
    fn hit_converges_to_axis_aligned_wall() {
        let map = room(10, 10);
        let player = player_at(1.5, 4.5, 20.0);
        let ray = caster().cast(&map, &player, 80);

        let analytic = Vec2::new(9.0, 4.5 + 7.5 * 20f32.to_radians().tan());
        let err = (ray.hit - analytic).length();
        assert!(err <= 1.0 / PRECISION as f32 + 1e-3, "hit {} vs {analytic}", ray.hit);
    }

    #[test]
    fn every_ray_terminates_in_closed_map() {
        let map = Map::reference();
        let c = caster();
        let bound = PRECISION * map.width().max(map.height()) as u32;
        for angle in [0.0, 37.0, 90.0, 181.5, 270.0, 333.0] {
            let mut rays = Vec::new();
            c.cast_all(&map, &player_at(4.5, 4.5, angle), &mut rays);
            assert_eq!(rays.len(), 160);
            for r in &rays {
                assert!(r.steps <= bound, "column {} took {} steps", r.column, r.steps);
                assert!(!r.escaped);
                assert_ne!(r.material, EMPTY);
            }
        }
    }

    #[test]
    fn huge_precision_saturates_step_cap() {
        let map = Map::reference();
        let c = RayCaster::new(1 << 30, 0.05, Projection::new(160, 120));
        assert_eq!(c.max_steps(&map), u32::MAX);
        assert_eq!(caster().max_steps(&map), PRECISION * 20);
    }

    #[test]
    fn wall_height_decreases_with_distance() {
        let c = caster();
        let mut prev = f32::INFINITY;
        for i in 1..200 {
            let d = 0.05 + i as f32 * 0.05;
            let h = c.wall_height(d);
            assert!(h < prev, "not decreasing at {d}");
            prev = h;
        }
    }

    #[test]
    fn wall_height_is_clamped_near_zero() {
        let c = caster();
        assert_eq!(c.wall_height(0.0), 60.0 / 0.05);
        assert_eq!(c.wall_height(-1.0), 60.0 / 0.05);
        assert!(c.wall_height(1e-9).is_finite());
    }

    #[test]
    fn texture_u_stays_in_range() {
        let map = Map::reference();
        let mut rays = Vec::new();
        caster().cast_all(&map, &player_at(7.3, 2.2, 215.0), &mut rays);
        for r in &rays {
            for w in [1, 8, 16] {
                assert!((0..w as i32).contains(&r.texture_u(w)));
            }
        }
        let far = Ray {
            hit: Vec2::new(1.0e6 + 0.3, 2.0e6 + 0.1),
            ..rays[0]
        };
        assert!((0..16).contains(&far.texture_u(16)));
    }

    #[test]
    fn leaving_the_grid_selects_material_one() {
        let map = Map::from_rows(&[[1u16, 1, 1], [1, 0, 1], [1, 1, 1]]).unwrap();
        let ray = caster().cast(&map, &player_at(1.5, 1.5, 0.0), 80);
        assert!(!ray.escaped);

        // A player standing outside the grid marches straight off it.
        let ray = caster().cast(&map, &player_at(-0.5, -0.5, 180.0), 80);
        assert!(ray.escaped);
        assert_eq!(ray.material, ESCAPE_MATERIAL);
        assert_eq!(ray.steps, 1);
    }
}
