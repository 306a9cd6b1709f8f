//! Axis-separated wall collision against the map grid.
//!
//! Each axis of a move is tested on its own and committed only if the
//! probe cell (target pushed out by `radius` along the move) is walkable.
//! Moving diagonally into a wall therefore slides along it.  Two solid
//! cells touching only at a corner can still be slipped between.

use glam::Vec2;

use crate::world::Map;

/// Move `pos` by `delta`; returns the committed position.
///
/// Y is resolved first against the old column, then X against the
/// (possibly updated) row, so the returned centre always sits on a
/// walkable cell when it started on one and `|delta| * (1 + radius) < 1`.
pub fn slide_move(map: &Map, pos: Vec2, delta: Vec2, radius: f32) -> Vec2 {
    let target = pos + delta;
    let probe = target + delta * radius;
    let mut out = pos;

    if map.is_open(pos.x.floor() as i32, probe.y.floor() as i32) {
        out.y = target.y;
    }
    if map.is_open(probe.x.floor() as i32, out.y.floor() as i32) {
        out.x = target.x;
    }
    out
}
