pub mod map;
mod scene;
pub mod texture;

pub use map::{Cell, EMPTY, Map, MapError};
pub use scene::{Scene, SceneAssets, SceneError};
pub use texture::{Texture, TextureBank, TextureError, TextureSource};
