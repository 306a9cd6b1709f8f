mod caster;
mod frame_loop;
mod types;

pub use caster::{ESCAPE_MATERIAL, Ray, RayCaster};
pub use frame_loop::{FocusState, FrameLoop, InputEvent};
pub use types::Projection;
