mod collision;
mod components;
mod systems;
mod tic;

pub use collision::slide_move;
pub use components::{Control, InputFlags, Player};
pub use systems::player_update;
pub use tic::{MAX_CATCH_UP, Simulation, TickSchedule};
