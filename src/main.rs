//! First-person grid raycaster in a `minifb` window.
//!
//! ```bash
//! cargo run --release -- --wall assets/texture.png --map level.txt
//! ```
//!
//! W/S (or ↑/↓) move, A/D (or ←/→) turn, Esc quits.  Clicking the window
//! or giving it focus resumes a paused view.

use std::{
    fs,
    path::PathBuf,
    thread,
    time::{Duration, Instant},
};

use anyhow::{Context, Result};
use clap::Parser;
use minifb::{Key, KeyRepeat, MouseButton, Window, WindowOptions};

use raycast_rs::{
    EngineConfig,
    assets::load_scene_assets,
    engine::{FocusState, FrameLoop, InputEvent},
    renderer::Software,
    sim::Control,
    world::{Map, Scene},
};

#[derive(Parser, Debug)]
#[command(version, about = "Grid raycaster with textured walls and floor")]
struct Cli {
    /// Wall texture image (material 2)
    #[arg(long)]
    wall: Option<PathBuf>,

    /// Floor texture image
    #[arg(long)]
    floor: Option<PathBuf>,

    /// Panoramic background strip
    #[arg(long)]
    background: Option<PathBuf>,

    /// Text map file; the built-in 10×10 room when omitted
    #[arg(long)]
    map: Option<PathBuf>,

    /// Screen pixels per projection pixel
    #[arg(long, default_value_t = 4)]
    scale: usize,

    /// Simulation tick interval in milliseconds
    #[arg(long, default_value_t = 30)]
    tick_ms: u64,

    /// Ray-march sub-steps per map cell
    #[arg(long, default_value_t = 64)]
    precision: u32,

    /// Give up on asset decoding after this many milliseconds
    #[arg(long, default_value_t = 10_000)]
    load_timeout_ms: u64,
}

impl Cli {
    fn config(&self) -> EngineConfig {
        let mut cfg = EngineConfig {
            scale: self.scale,
            tick: Duration::from_millis(self.tick_ms),
            precision: self.precision,
            load_timeout: Duration::from_millis(self.load_timeout_ms),
            ..EngineConfig::default()
        };
        if let Some(p) = &self.wall {
            cfg.wall.path = p.clone();
        }
        if let Some(p) = &self.floor {
            cfg.floor.path = p.clone();
        }
        if let Some(p) = &self.background {
            cfg.background.path = p.clone();
        }
        cfg
    }
}

fn control_for(key: Key) -> Option<Control> {
    match key {
        Key::W | Key::Up => Some(Control::Forward),
        Key::S | Key::Down => Some(Control::Back),
        Key::A | Key::Left => Some(Control::TurnLeft),
        Key::D | Key::Right => Some(Control::TurnRight),
        _ => None,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let cfg = cli.config();
    cfg.validate().context("invalid configuration")?;

    let map = match &cli.map {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?
            .parse::<Map>()
            .with_context(|| format!("parsing {}", path.display()))?,
        None => Map::reference(),
    };

    let mut win = Window::new(
        "raycast",
        cfg.screen_w,
        cfg.screen_h,
        WindowOptions::default(),
    )?;

    // keep the window pumping while the decoders run
    let poll = cfg.load_poll;
    let assets = load_scene_assets(&cfg, || {
        win.update();
        thread::sleep(poll);
    })
    .context("loading textures")?;

    let scene = Scene::load(map, assets).context("building scene")?;
    let mut frames =
        FrameLoop::new(&cfg, scene, Software::default()).context("placing the player")?;
    frames.resume(Instant::now());

    let mut was_active = true;
    while win.is_open() && !win.is_key_down(Key::Escape) {
        let now = Instant::now();

        let active = win.is_active();
        if active != was_active {
            let ev = if active {
                InputEvent::FocusGained
            } else {
                InputEvent::FocusLost
            };
            frames.handle(ev, now);
            was_active = active;
        }
        if frames.state() == FocusState::Paused && win.get_mouse_down(MouseButton::Left) {
            frames.handle(InputEvent::FocusGained, now);
        }

        for c in win
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(control_for)
        {
            frames.handle(InputEvent::KeyDown(c), now);
        }
        for c in win.get_keys_released().into_iter().filter_map(control_for) {
            frames.handle(InputEvent::KeyUp(c), now);
        }

        frames.pump(now);

        let surface = frames.surface();
        win.update_with_buffer(surface.pixels(), surface.width(), surface.height())?;

        // sleep until roughly the next tick; input is sampled in between
        thread::sleep(cfg.tick / 4);
    }

    let sim = frames.teardown();
    log::info!("final pose {} @ {:.1}°", sim.player().pos, sim.player().angle);
    Ok(())
}
