use super::{InputFlags, Player, collision::slide_move};
use crate::world::Map;

/// Apply one tick of held controls to `player`.
///
/// Forward and back are evaluated independently (holding both cancels
/// out only if neither is blocked); turning is a fixed step per tick.
pub fn player_update(player: &mut Player, input: InputFlags, map: &Map) {
    let step = player.forward() * player.move_speed;

    if input.contains(InputFlags::FORWARD) {
        player.pos = slide_move(map, player.pos, step, player.radius);
    }
    if input.contains(InputFlags::BACK) {
        player.pos = slide_move(map, player.pos, -step, player.radius);
    }

    if input.contains(InputFlags::TURN_LEFT) {
        player.turn(-player.rotation_speed);
    }
    if input.contains(InputFlags::TURN_RIGHT) {
        player.turn(player.rotation_speed);
    }
}
