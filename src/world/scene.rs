use glam::Vec2;
use thiserror::Error;

use super::{
    map::{Cell, EMPTY, Map, MapError},
    texture::{Texture, TextureBank, TextureError, TextureSource},
};

#[derive(Error, Debug, PartialEq)]
pub enum SceneError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error(transparent)]
    Texture(#[from] TextureError),

    /// A wall code with no texture behind it.
    #[error("cell ({x}, {y}) uses material {code} but only {available} wall textures exist")]
    UnknownMaterial {
        code: Cell,
        x: usize,
        y: usize,
        available: usize,
    },

    /// Player start is off the grid or inside a wall.
    #[error("spawn point ({x}, {y}) is not on an empty cell")]
    BadSpawn { x: f32, y: f32 },
}

/// Textures handed to [`Scene::load`], still in descriptor form.
#[derive(Clone, Debug, Default)]
pub struct SceneAssets {
    pub walls: Vec<TextureSource>,
    pub floors: Vec<TextureSource>,
    pub background: Option<TextureSource>,
}

impl SceneAssets {
    /// Demo layout: procedural brick for material 1, the decoded wall
    /// image for material 2, one floor and one background strip.
    pub fn reference(wall: TextureSource, floor: TextureSource, background: TextureSource) -> Self {
        Self {
            walls: vec![TextureSource::brick(), wall],
            floors: vec![floor],
            background: Some(background),
        }
    }
}

/// Immutable world: map grid plus every texture it can reference.
#[derive(Clone, Debug)]
pub struct Scene {
    map: Map,
    bank: TextureBank,
    /// Material 1, drawn for escaped rays and unknown codes.
    fallback: Texture,
}

impl Scene {
    /// Bake all textures and check that every wall code has one.
    ///
    /// Material 1 must exist even if the map never uses it: a ray that
    /// leaves the grid is drawn with it.
    pub fn load(map: Map, assets: SceneAssets) -> Result<Self, SceneError> {
        let mut bank = TextureBank::new();
        for src in assets.walls {
            bank.push_wall(src.bake()?);
        }
        for src in assets.floors {
            bank.push_floor(src.bake()?);
        }
        if let Some(src) = assets.background {
            bank.set_background(src.bake()?);
        }

        let fallback = bank
            .wall(1)
            .cloned()
            .ok_or(SceneError::UnknownMaterial {
                code: 1,
                x: 0,
                y: 0,
                available: 0,
            })?;
        if let Some((x, y, code)) = map
            .cells()
            .find(|&(_, _, c)| c != EMPTY && bank.wall(c).is_none())
        {
            return Err(SceneError::UnknownMaterial {
                code,
                x,
                y,
                available: bank.wall_count(),
            });
        }

        log::info!(
            "scene loaded: {}x{} map, {} wall / {} floor textures, background {}",
            map.width(),
            map.height(),
            bank.wall_count(),
            bank.floor_count(),
            if bank.background().is_some() { "on" } else { "off" },
        );
        Ok(Self {
            map,
            bank,
            fallback,
        })
    }

    #[inline]
    pub fn map(&self) -> &Map {
        &self.map
    }

    #[inline]
    pub fn textures(&self) -> &TextureBank {
        &self.bank
    }

    /// Texture for a wall hit; codes were checked at load time.
    #[inline]
    pub fn wall_texture(&self, material: Cell) -> &Texture {
        self.bank.wall(material).unwrap_or(&self.fallback)
    }

    /// The player's centre must start on an empty cell inside the grid.
    pub fn check_spawn(&self, pos: Vec2) -> Result<(), SceneError> {
        match self.map.cell_at(pos) {
            Some(EMPTY) if self.map.contains(pos) => Ok(()),
            _ => Err(SceneError::BadSpawn { x: pos.x, y: pos.y }),
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn flat(color: u32) -> TextureSource {
        TextureSource::Image {
            w: 2,
            h: 2,
            pixels: vec![color; 4],
        }
    }

    #[test]
    fn reference_scene_loads() {
        let assets = SceneAssets::reference(flat(1), flat(2), flat(3));
        let scene = Scene::load(Map::reference(), assets).unwrap();
        assert_eq!(scene.textures().wall_count(), 2);
        assert_eq!(scene.wall_texture(2).sample(0, 0), 1);
        assert_eq!(scene.textures().floor(0).unwrap().sample(1, 1), 2);
        assert!(scene.textures().background().is_some());
    }

    #[test]
    fn missing_material_is_fatal() {
        let assets = SceneAssets {
            walls: vec![TextureSource::brick()],
            ..SceneAssets::default()
        };
        let err = Scene::load(Map::reference(), assets).unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnknownMaterial {
                code: 2,
                available: 1,
                ..
            }
        ));
    }

    #[test]
    fn bad_texture_aborts_load() {
        let assets = SceneAssets {
            walls: vec![TextureSource::Image {
                w: 3,
                h: 3,
                pixels: vec![0; 2],
            }],
            ..SceneAssets::default()
        };
        let map = Map::from_rows(&[[1, 1], [1, 1]]).unwrap();
        assert!(matches!(
            Scene::load(map, assets),
            Err(SceneError::Texture(TextureError::Size { .. }))
        ));
    }

    #[test]
    fn no_wall_textures_is_fatal() {
        let map = Map::from_rows(&[[1, 1], [1, 1]]).unwrap();
        assert!(matches!(
            Scene::load(map, SceneAssets::default()),
            Err(SceneError::UnknownMaterial {
                code: 1,
                available: 0,
                ..
            })
        ));
    }

    #[test]
    fn unknown_material_draws_material_one() {
        let assets = SceneAssets {
            walls: vec![flat(5)],
            ..SceneAssets::default()
        };
        let map = Map::from_rows(&[[1, 1, 1], [1, 0, 1], [1, 1, 1]]).unwrap();
        let scene = Scene::load(map, assets).unwrap();
        assert_eq!(scene.wall_texture(1).sample(0, 0), 5);
        assert_eq!(scene.wall_texture(9).sample(0, 0), 5);
    }

    #[test]
    fn spawn_must_be_on_an_empty_cell() {
        let assets = SceneAssets {
            walls: vec![TextureSource::brick()],
            ..SceneAssets::default()
        };
        let map = Map::from_rows(&[[1, 1, 1], [1, 0, 1], [1, 1, 1]]).unwrap();
        let scene = Scene::load(map, assets).unwrap();

        assert_eq!(scene.check_spawn(Vec2::new(1.5, 1.5)), Ok(()));
        // the default start (2, 2) is the corner wall of a 3×3 room
        assert_eq!(
            scene.check_spawn(Vec2::new(2.0, 2.0)),
            Err(SceneError::BadSpawn { x: 2.0, y: 2.0 })
        );
        assert!(scene.check_spawn(Vec2::new(7.0, 1.5)).is_err());
        assert!(scene.check_spawn(Vec2::new(-0.5, 1.5)).is_err());
    }

    #[test]
    fn floors_and_background_are_optional() {
        let assets = SceneAssets {
            walls: vec![TextureSource::brick()],
            ..SceneAssets::default()
        };
        let map = Map::from_rows(&[[1, 1, 1], [1, 0, 1], [1, 1, 1]]).unwrap();
        let scene = Scene::load(map, assets).unwrap();
        assert!(scene.textures().floor(0).is_none());
        assert!(scene.textures().background().is_none());
    }
}
