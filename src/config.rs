//! Engine-wide constants, gathered in one place so the binary can
//! override them from the command line.

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

use crate::engine::Projection;

/// Finest ray-march subdivision accepted by [`EngineConfig::validate`].
pub const MAX_PRECISION: u32 = 4096;

/// Declared sample size of an image asset.  Decoded pixels are resampled
/// to this size, independent of the file's own dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AssetSize {
    pub w: usize,
    pub h: usize,
}

/// One raster asset: where to read it and how large to sample it.
#[derive(Clone, Debug)]
pub struct AssetSpec {
    pub path: PathBuf,
    pub size: AssetSize,
}

#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub x: f32,
    pub y: f32,
    pub angle: f32,          // degrees
    pub fov: f32,            // degrees
    pub move_speed: f32,     // map-cells / tick
    pub rotation_speed: f32, // degrees / tick
    pub radius: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            x: 2.0,
            y: 2.0,
            angle: 90.0,
            fov: 60.0,
            move_speed: 0.1,
            rotation_speed: 4.5,
            radius: 0.3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct EngineConfig {
    /* on-screen surface */
    pub screen_w: usize,
    pub screen_h: usize,
    pub scale: usize,

    /* timing */
    pub tick: Duration,
    pub load_timeout: Duration,
    pub load_poll: Duration,

    /* ray casting */
    pub precision: u32,
    pub min_distance: f32,

    pub player: PlayerConfig,

    /* assets */
    pub wall: AssetSpec,
    pub floor: AssetSpec,
    pub background: AssetSpec,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            screen_w: 640,
            screen_h: 480,
            scale: 4,
            tick: Duration::from_millis(30),
            load_timeout: Duration::from_secs(10),
            load_poll: Duration::from_millis(100),
            precision: 64,
            min_distance: 0.05,
            player: PlayerConfig::default(),
            wall: AssetSpec {
                path: PathBuf::from("assets/texture.png"),
                size: AssetSize { w: 16, h: 16 },
            },
            floor: AssetSpec {
                path: PathBuf::from("assets/floor.png"),
                size: AssetSize { w: 16, h: 16 },
            },
            background: AssetSpec {
                path: PathBuf::from("assets/background.png"),
                size: AssetSize { w: 360, h: 60 },
            },
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("screen {w}x{h} is not divisible by scale {scale}")]
    Scale { w: usize, h: usize, scale: usize },

    #[error("`{0}` must be positive")]
    NotPositive(&'static str),

    /// A single tick must never carry the probe across a whole cell.
    #[error("move speed {speed} with radius {radius} can skip a map cell in one tick")]
    TooFast { speed: f32, radius: f32 },

    #[error("precision {precision} exceeds the limit of {max} steps per cell")]
    TooFine { precision: u32, max: u32 },

    /// The fisheye cosine must stay positive across the whole view.
    #[error("field of view {0}° must lie strictly between 0° and 180°")]
    Fov(f32),

    #[error("asset `{0}` declares an empty sample size")]
    EmptyAsset(&'static str),
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scale == 0
            || self.screen_w % self.scale != 0
            || self.screen_h % self.scale != 0
            || self.screen_w < self.scale
            || self.screen_h < self.scale
        {
            return Err(ConfigError::Scale {
                w: self.screen_w,
                h: self.screen_h,
                scale: self.scale,
            });
        }

        let p = &self.player;
        for (name, v) in [
            ("fov", p.fov),
            ("move_speed", p.move_speed),
            ("rotation_speed", p.rotation_speed),
            ("min_distance", self.min_distance),
        ] {
            if v <= 0.0 || !v.is_finite() {
                return Err(ConfigError::NotPositive(name));
            }
        }
        if p.fov >= 180.0 {
            return Err(ConfigError::Fov(p.fov));
        }
        if p.radius < 0.0 {
            return Err(ConfigError::NotPositive("radius"));
        }
        if self.precision == 0 {
            return Err(ConfigError::NotPositive("precision"));
        }
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::TooFine {
                precision: self.precision,
                max: MAX_PRECISION,
            });
        }
        if self.tick.is_zero() {
            return Err(ConfigError::NotPositive("tick"));
        }
        if p.move_speed * (1.0 + p.radius) >= 1.0 {
            return Err(ConfigError::TooFast {
                speed: p.move_speed,
                radius: p.radius,
            });
        }

        for (name, spec) in [
            ("wall", &self.wall),
            ("floor", &self.floor),
            ("background", &self.background),
        ] {
            if spec.size.w == 0 || spec.size.h == 0 {
                return Err(ConfigError::EmptyAsset(name));
            }
        }
        Ok(())
    }

    /// Internal render resolution (screen divided by the magnification).
    pub fn projection(&self) -> Projection {
        Projection::new(self.screen_w / self.scale, self.screen_h / self.scale)
    }
}
