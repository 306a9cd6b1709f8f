use std::time::{Duration, Instant};

use super::{Control, InputFlags, Player, systems};
use crate::{config::PlayerConfig, world::Map};

/// Ticks allowed to run back-to-back before the schedule resyncs.
pub const MAX_CATCH_UP: u32 = 4;

/// Mutable game state: the player pose and the controls held down.
#[derive(Clone, Debug, PartialEq)]
pub struct Simulation {
    player: Player,
    input: InputFlags,
}

impl Simulation {
    pub fn new(cfg: &PlayerConfig) -> Self {
        Self {
            player: Player::new(cfg),
            input: InputFlags::empty(),
        }
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn input(&self) -> InputFlags {
        self.input
    }

    pub fn press(&mut self, c: Control) {
        self.input.insert(c.into());
    }

    pub fn release(&mut self, c: Control) {
        self.input.remove(c.into());
    }

    /// Drop every held control (focus loss, teardown).
    pub fn release_all(&mut self) {
        self.input = InputFlags::empty();
    }

    /// Run one fixed-rate tick.
    pub fn tick(&mut self, map: &Map) {
        systems::player_update(&mut self.player, self.input, map);
    }
}

/// Fixed-interval timer, advanced by the caller's clock.
///
/// Dropping the schedule is the cancellation: nothing else can fire it.
#[derive(Clone, Copy, Debug)]
pub struct TickSchedule {
    interval: Duration,
    next: Instant,
}

impl TickSchedule {
    /// First tick fires one `interval` after `now`.
    pub fn start(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of ticks due at `now`; advances the deadline past them.
    ///
    /// When more than [`MAX_CATCH_UP`] are owed the backlog is dropped and
    /// the next deadline restarts from `now`.
    pub fn due(&mut self, now: Instant) -> u32 {
        let mut n = 0;
        while now >= self.next {
            n += 1;
            self.next += self.interval;
            if n == MAX_CATCH_UP {
                if now >= self.next {
                    log::debug!("tick backlog dropped");
                    self.next = now + self.interval;
                }
                break;
            }
        }
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: Duration = Duration::from_millis(30);

    #[test]
    fn nothing_due_before_first_interval() {
        let t0 = Instant::now();
        let mut s = TickSchedule::start(TICK, t0);
        assert_eq!(s.due(t0), 0);
        assert_eq!(s.due(t0 + Duration::from_millis(29)), 0);
        assert_eq!(s.due(t0 + TICK), 1);
        assert_eq!(s.due(t0 + TICK), 0);
    }

    #[test]
    fn catches_up_then_resyncs() {
        let t0 = Instant::now();
        let mut s = TickSchedule::start(TICK, t0);
        assert_eq!(s.due(t0 + TICK * 3), 3);

        let late = t0 + TICK * 100;
        assert_eq!(s.due(late), MAX_CATCH_UP);
        assert_eq!(s.due(late), 0);
        assert_eq!(s.due(late + TICK), 1);
    }

    #[test]
    fn press_and_release_toggle_flags() {
        let mut sim = Simulation::new(&PlayerConfig::default());
        sim.press(Control::Forward);
        sim.press(Control::TurnLeft);
        assert_eq!(sim.input(), InputFlags::FORWARD | InputFlags::TURN_LEFT);
        sim.release(Control::Forward);
        assert_eq!(sim.input(), InputFlags::TURN_LEFT);
        sim.release_all();
        assert!(sim.input().is_empty());
    }

    #[test]
    fn tick_moves_player() {
        let mut sim = Simulation::new(&PlayerConfig::default());
        sim.press(Control::Forward);
        sim.tick(&Map::reference());
        assert!((sim.player().pos.y - 2.1).abs() < 1e-5);
    }
}
