//! Asynchronous image assets.
//!
//! Every raster texture is decoded off the main thread and polled until
//! ready.  Nothing is rendered until *all* of them are; a slot that never
//! arrives turns into [`AssetError::Timeout`] instead of a silent stall.

use std::{
    io,
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, TryRecvError},
    task::Poll,
    thread,
    time::{Duration, Instant},
};

use image::imageops::FilterType;
use thiserror::Error;

use crate::{
    config::{AssetSize, AssetSpec, EngineConfig},
    renderer::rgba,
    world::{SceneAssets, TextureSource},
};

#[derive(Error, Debug)]
pub enum AssetError {
    /// The decode worker could not be started.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("cannot decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Worker exited without reporting a result.
    #[error("decode worker vanished")]
    WorkerGone,

    /// Loader finished with a different number of textures than asked for.
    #[error("expected {expected} textures, loader produced {found}")]
    Count { expected: usize, found: usize },

    #[error("asset `{name}` failed to load")]
    Failed {
        name: &'static str,
        #[source]
        source: Box<AssetError>,
    },

    #[error("assets not ready after {waited:?}: {}", .pending.join(", "))]
    Timeout {
        waited: Duration,
        pending: Vec<&'static str>,
    },
}

/// Something that eventually yields one texture.
pub trait AssetSource {
    /// Non-blocking.  Once `Ready` has been returned the source is spent.
    fn poll(&mut self) -> Poll<Result<TextureSource, AssetError>>;
}

/// Decode `path`, resample it to `size` and force every pixel opaque.
pub fn decode(path: &Path, size: AssetSize) -> Result<TextureSource, AssetError> {
    let img = image::open(path).map_err(|source| AssetError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let img = img
        .resize_exact(size.w as u32, size.h as u32, FilterType::Triangle)
        .to_rgba8();

    let pixels = img.pixels().map(|p| rgba(p[0], p[1], p[2], 255)).collect();
    Ok(TextureSource::Image {
        w: size.w,
        h: size.h,
        pixels,
    })
}

/*───────────────────────── file-backed source ─────────────────────────*/

/// Image file decoded on a dedicated worker thread.
pub struct FileSource {
    rx: Option<Receiver<Result<TextureSource, AssetError>>>,
}

impl FileSource {
    pub fn spawn(spec: AssetSpec) -> Result<Self, AssetError> {
        let (tx, rx) = mpsc::channel();
        let name = format!("decode {}", spec.path.display());
        thread::Builder::new().name(name).spawn(move || {
            let res = decode(&spec.path, spec.size);
            // receiver gone means the loader was dropped; nothing to do
            let _ = tx.send(res);
        })?;
        Ok(Self { rx: Some(rx) })
    }
}

impl AssetSource for FileSource {
    fn poll(&mut self) -> Poll<Result<TextureSource, AssetError>> {
        let Some(rx) = &self.rx else {
            return Poll::Ready(Err(AssetError::WorkerGone));
        };
        match rx.try_recv() {
            Ok(res) => {
                self.rx = None;
                Poll::Ready(res)
            }
            Err(TryRecvError::Empty) => Poll::Pending,
            Err(TryRecvError::Disconnected) => {
                self.rx = None;
                Poll::Ready(Err(AssetError::WorkerGone))
            }
        }
    }
}

/*──────────────────────────── loader ──────────────────────────────────*/

struct Slot {
    name: &'static str,
    source: Box<dyn AssetSource>,
    ready: Option<TextureSource>,
}

/// Polls a fixed set of named sources until every one is ready.
#[derive(Default)]
pub struct AssetLoader {
    slots: Vec<Slot>,
}

impl AssetLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// The three images of the default scene, each on its own worker.
    pub fn from_config(cfg: &EngineConfig) -> Result<Self, AssetError> {
        let mut loader = Self::new();
        for (name, spec) in [
            ("wall", &cfg.wall),
            ("floor", &cfg.floor),
            ("background", &cfg.background),
        ] {
            log::info!("loading {name} from {}", spec.path.display());
            loader.add(name, FileSource::spawn(spec.clone())?);
        }
        Ok(loader)
    }

    pub fn add(&mut self, name: &'static str, source: impl AssetSource + 'static) {
        self.slots.push(Slot {
            name,
            source: Box::new(source),
            ready: None,
        });
    }

    /// Names still outstanding, in insertion order.
    pub fn pending(&self) -> Vec<&'static str> {
        self.slots
            .iter()
            .filter(|s| s.ready.is_none())
            .map(|s| s.name)
            .collect()
    }

    /// Poll every outstanding source once.
    ///
    /// `Ready(Ok)` carries all textures in insertion order.  The first
    /// failing source aborts the whole load.
    pub fn poll(&mut self) -> Poll<Result<Vec<TextureSource>, AssetError>> {
        for slot in self.slots.iter_mut().filter(|s| s.ready.is_none()) {
            match slot.source.poll() {
                Poll::Pending => {}
                Poll::Ready(Ok(tex)) => {
                    log::debug!("asset `{}` decoded", slot.name);
                    slot.ready = Some(tex);
                }
                Poll::Ready(Err(e)) => {
                    return Poll::Ready(Err(AssetError::Failed {
                        name: slot.name,
                        source: Box::new(e),
                    }));
                }
            }
        }
        if self.slots.iter().any(|s| s.ready.is_none()) {
            return Poll::Pending;
        }
        Poll::Ready(Ok(self
            .slots
            .iter_mut()
            .filter_map(|s| s.ready.take())
            .collect()))
    }

    /// Block until ready, sleeping `interval` between polls.
    pub fn wait(
        &mut self,
        timeout: Duration,
        interval: Duration,
    ) -> Result<Vec<TextureSource>, AssetError> {
        self.wait_with(timeout, || thread::sleep(interval))
    }

    /// Like [`wait`](Self::wait) but calls `idle` between polls, letting
    /// the host keep its window responsive.  `idle` is expected to block
    /// for roughly one poll interval.
    pub fn wait_with<F>(
        &mut self,
        timeout: Duration,
        mut idle: F,
    ) -> Result<Vec<TextureSource>, AssetError>
    where
        F: FnMut(),
    {
        let start = Instant::now();
        loop {
            if let Poll::Ready(res) = self.poll() {
                return res;
            }
            let waited = start.elapsed();
            if waited >= timeout {
                let pending = self.pending();
                log::warn!("asset load timed out after {waited:?}: {pending:?}");
                return Err(AssetError::Timeout { waited, pending });
            }
            idle();
        }
    }
}

/// Decode the configured images and lay them out as the default scene.
pub fn load_scene_assets<F>(cfg: &EngineConfig, idle: F) -> Result<SceneAssets, AssetError>
where
    F: FnMut(),
{
    let mut loader = AssetLoader::from_config(cfg)?;
    let textures = loader.wait_with(cfg.load_timeout, idle)?;
    let [wall, floor, background] = scene_triple(textures)?;
    log::info!("all assets ready");
    Ok(SceneAssets::reference(wall, floor, background))
}

/// Split loader output into wall, floor and background.
fn scene_triple(textures: Vec<TextureSource>) -> Result<[TextureSource; 3], AssetError> {
    let found = textures.len();
    textures
        .try_into()
        .map_err(|_| AssetError::Count { expected: 3, found })
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
