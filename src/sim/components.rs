use bitflags::bitflags;
use glam::Vec2;

use crate::config::PlayerConfig;

/// Viewer pose and movement tuning.  Angles are in degrees.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,           // map-cell units
    pub angle: f32,          // [0, 360), 0 = +X, 90 = +Y
    pub fov: f32,
    pub half_fov: f32,
    pub move_speed: f32,     // cells / tick
    pub rotation_speed: f32, // degrees / tick
    pub radius: f32,
}

impl Player {
    pub fn new(cfg: &PlayerConfig) -> Self {
        Self {
            pos: Vec2::new(cfg.x, cfg.y),
            angle: cfg.angle.rem_euclid(360.0),
            fov: cfg.fov,
            half_fov: cfg.fov * 0.5,
            move_speed: cfg.move_speed,
            rotation_speed: cfg.rotation_speed,
            radius: cfg.radius,
        }
    }

    /// Unit vector of the current heading.
    #[inline]
    pub fn forward(&self) -> Vec2 {
        let (s, c) = self.angle.to_radians().sin_cos();
        Vec2::new(c, s)
    }

    /// Rotate by `delta` degrees, keeping the angle in `[0, 360)`.
    #[inline]
    pub fn turn(&mut self, delta: f32) {
        self.angle = (self.angle + delta).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0 for tiny negatives
        if self.angle >= 360.0 {
            self.angle = 0.0;
        }
    }
}

/// One of the four logical controls.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Forward,
    Back,
    TurnLeft,
    TurnRight,
}

bitflags! {
    /// Controls currently held down; set by key-down, cleared by key-up.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct InputFlags: u8 {
        const FORWARD    = 0x01;
        const BACK       = 0x02;
        const TURN_LEFT  = 0x04;
        const TURN_RIGHT = 0x08;
    }
}

impl From<Control> for InputFlags {
    fn from(c: Control) -> Self {
        match c {
            Control::Forward => InputFlags::FORWARD,
            Control::Back => InputFlags::BACK,
            Control::TurnLeft => InputFlags::TURN_LEFT,
            Control::TurnRight => InputFlags::TURN_RIGHT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_wraps_both_ways() {
        let mut p = Player::new(&PlayerConfig::default());
        p.angle = 2.0;
        p.turn(-4.5);
        assert!((p.angle - 357.5).abs() < 1e-4);
        p.turn(4.5);
        assert!((p.angle - 2.0).abs() < 1e-4);
        p.angle = 358.0;
        p.turn(4.5);
        assert!((p.angle - 2.5).abs() < 1e-4);
    }

    #[test]
    fn forward_follows_angle() {
        let mut p = Player::new(&PlayerConfig::default());
        assert!((p.forward() - Vec2::Y).length() < 1e-6);
        p.angle = 0.0;
        assert!((p.forward() - Vec2::X).length() < 1e-6);
    }

    #[test]
    fn new_derives_half_fov() {
        let p = Player::new(&PlayerConfig::default());
        assert_eq!(p.half_fov, 30.0);
        assert_eq!(p.pos, Vec2::new(2.0, 2.0));
    }
}
