//! Fixed-tick driver and the Running / Paused focus state machine.
//!
//! The loop is the single owner of all mutable state: the simulation,
//! the renderer's projection buffer and the visible surface.  Input
//! events only flip flags or request a state change; pixels are produced
//! exclusively by [`FrameLoop::pump`] while Running.

use std::time::{Duration, Instant};

use super::{Ray, RayCaster};
use crate::{
    config::EngineConfig,
    renderer::{Renderer, RendererExt, Software, Surface},
    sim::{Control, Simulation, TickSchedule},
    world::{Scene, SceneError},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusState {
    Running,
    Paused,
}

/// Host events, already decoded from the window system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Control),
    KeyUp(Control),
    /// Pointer activation on the surface or input focus returning.
    FocusGained,
    /// Window lost input focus.
    FocusLost,
}

pub struct FrameLoop<R: Renderer = Software> {
    scene: Scene,
    sim: Simulation,
    caster: RayCaster,
    renderer: R,
    surface: Surface,
    /// per-tick scratch, cleared before every cast
    rays: Vec<Ray>,

    state: FocusState,
    /// Only `resume` / `pause` / `teardown` touch this.
    schedule: Option<TickSchedule>,
    interval: Duration,
    ticks: u64,
    warned_escape: bool,
}

impl<R: Renderer> FrameLoop<R> {
    /// A loop over a fully loaded scene, starting Paused.
    ///
    /// Fails when the configured start position is not an empty cell.
    pub fn new(cfg: &EngineConfig, scene: Scene, renderer: R) -> Result<Self, SceneError> {
        let sim = Simulation::new(&cfg.player);
        scene.check_spawn(sim.player().pos)?;

        let projection = cfg.projection();
        Ok(Self {
            scene,
            sim,
            caster: RayCaster::new(cfg.precision, cfg.min_distance, projection),
            renderer,
            surface: Surface::new(projection.w, projection.h, cfg.scale),
            rays: Vec::with_capacity(projection.w),
            state: FocusState::Paused,
            schedule: None,
            interval: cfg.tick,
            ticks: 0,
            warned_escape: false,
        })
    }

    #[inline]
    pub fn state(&self) -> FocusState {
        self.state
    }

    #[inline]
    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    #[inline]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[inline]
    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Ticks executed since construction.
    #[inline]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Paused → Running.  The pose is kept; only the timer restarts.
    pub fn resume(&mut self, now: Instant) -> bool {
        if self.state == FocusState::Running {
            return false;
        }
        self.schedule = Some(TickSchedule::start(self.interval, now));
        self.state = FocusState::Running;
        log::info!("running (tick {:?})", self.interval);
        true
    }

    /// Running → Paused.  Cancels the timer, then paints the overlay once
    /// over the last presented frame.
    pub fn pause(&mut self) -> bool {
        if self.state == FocusState::Paused {
            return false;
        }
        self.schedule = None;
        self.state = FocusState::Paused;
        // no key-up arrives while unfocused
        self.sim.release_all();
        self.surface.draw_pause_overlay();
        log::info!("paused after {} ticks", self.ticks);
        true
    }

    pub fn handle(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::KeyDown(c) => self.sim.press(c),
            InputEvent::KeyUp(c) => self.sim.release(c),
            InputEvent::FocusGained => {
                self.resume(now);
            }
            InputEvent::FocusLost => {
                self.pause();
            }
        }
    }

    /// Run every tick due at `now`, one after another; returns how many.
    pub fn pump(&mut self, now: Instant) -> u32 {
        let due = match self.schedule.as_mut() {
            Some(s) => s.due(now),
            None => return 0,
        };
        for _ in 0..due {
            self.tick();
        }
        due
    }

    /// Update player → cast every column → clear, draw and present.
    pub fn tick(&mut self) {
        self.sim.tick(self.scene.map());

        let player = self.sim.player();
        self.caster.cast_all(self.scene.map(), player, &mut self.rays);

        if !self.warned_escape && self.rays.iter().any(|r| r.escaped) {
            log::warn!(
                "ray left the map from {}; drawing it with material 1",
                player.pos
            );
            self.warned_escape = true;
        }

        let proj = self.caster.projection();
        let surface = &mut self.surface;
        self.renderer.draw_frame(
            proj.w,
            proj.h,
            &self.rays,
            player,
            &self.scene,
            |fb, w, h| surface.present(fb, w, h),
        );
        self.ticks += 1;
    }

    /// Stop for good: cancel the timer and drop held input.  Consuming
    /// `self` guarantees no tick can run afterwards.
    pub fn teardown(mut self) -> Simulation {
        self.schedule = None;
        self.sim.release_all();
        log::info!("frame loop torn down after {} ticks", self.ticks);
        self.sim
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
