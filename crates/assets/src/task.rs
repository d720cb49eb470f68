//! Background asset loading with progress reporting and cancellation.
//!
//! A worker thread reads the file in chunks, reporting progress over a
//! channel, then imports it. The owner drains events once per frame with
//! [`LoadHandle::poll`].

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use sceneview_core::Scene;
use tracing::{debug, info, warn};

use crate::{import_gltf, AssetError};

/// Default read size per progress step.
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Bytes read so far out of the file size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadProgress {
    /// Bytes read.
    pub loaded: u64,
    /// File size in bytes, 0 if unknown.
    pub total: u64,
}

impl LoadProgress {
    /// Completion percentage, or 0 when the total is unknown.
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        (self.loaded as f64 / self.total as f64 * 100.0) as f32
    }
}

/// A successfully imported asset.
#[derive(Debug)]
pub struct LoadedAsset {
    /// Imported scene fragment, rooted at a node named `"model"`.
    pub scene: Scene,
    /// File the asset came from.
    pub source: PathBuf,
    /// Number of surfaces in the fragment.
    pub surfaces: usize,
}

/// Events emitted by a load. Exactly one terminal event (`Loaded`,
/// `Failed` or `Cancelled`) ends the stream.
#[derive(Debug)]
pub enum LoadEvent {
    /// More bytes were read.
    Progress(LoadProgress),
    /// The asset was imported.
    Loaded(LoadedAsset),
    /// Reading or importing failed.
    Failed(AssetError),
    /// The load was cancelled.
    Cancelled,
}

impl LoadEvent {
    /// True for `Loaded`, `Failed` and `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, LoadEvent::Progress(_))
    }
}

/// Spawns background loads.
#[derive(Debug, Clone)]
pub struct AssetLoader {
    chunk_size: usize,
}

impl Default for AssetLoader {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl AssetLoader {
    /// Loader that reports progress every `chunk_size` bytes.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
        }
    }

    /// Start loading `path` with default settings.
    pub fn spawn(path: impl Into<PathBuf>) -> LoadHandle {
        Self::default().start(path)
    }

    /// Start loading `path` on a worker thread.
    pub fn start(&self, path: impl Into<PathBuf>) -> LoadHandle {
        let path = path.into();
        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        info!(path = %path.display(), "Loading asset");
        let worker = Worker {
            path: path.clone(),
            chunk_size: self.chunk_size,
            cancel: cancel.clone(),
            tx: tx.clone(),
        };
        let spawned = thread::Builder::new()
            .name("asset-loader".into())
            .spawn(move || worker.run());
        if let Err(err) = spawned {
            let _ = tx.send(LoadEvent::Failed(AssetError::Io(err)));
        }

        LoadHandle {
            path,
            rx,
            cancel,
            finished: false,
        }
    }
}

/// Owner side of a background load. Dropping the handle cancels the load.
#[derive(Debug)]
pub struct LoadHandle {
    path: PathBuf,
    rx: Receiver<LoadEvent>,
    cancel: Arc<AtomicBool>,
    finished: bool,
}

impl LoadHandle {
    /// File being loaded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Request cancellation. No `Loaded` event is delivered afterwards.
    pub fn cancel(&self) {
        if !self.finished {
            debug!(path = %self.path.display(), "Cancelling asset load");
        }
        self.cancel.store(true, Ordering::Relaxed);
    }

    /// True once a terminal event has been delivered.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Drain every event that is ready without blocking.
    pub fn poll(&mut self) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while !self.finished {
            match self.rx.try_recv() {
                Ok(event) => events.extend(self.accept(event)),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    events.extend(self.accept(LoadEvent::Failed(AssetError::Disconnected)))
                }
            }
        }
        events
    }

    /// Block up to `timeout` for the next event.
    pub fn next_event(&mut self, timeout: Duration) -> Option<LoadEvent> {
        while !self.finished {
            match self.rx.recv_timeout(timeout) {
                Ok(event) => {
                    if let Some(event) = self.accept(event) {
                        return Some(event);
                    }
                }
                Err(RecvTimeoutError::Timeout) => return None,
                Err(RecvTimeoutError::Disconnected) => {
                    return self.accept(LoadEvent::Failed(AssetError::Disconnected));
                }
            }
        }
        None
    }

    /// Block until the load finishes, discarding progress.
    pub fn wait(mut self) -> Result<LoadedAsset, AssetError> {
        loop {
            match self.next_event(Duration::from_secs(60)) {
                Some(LoadEvent::Loaded(asset)) => return Ok(asset),
                Some(LoadEvent::Failed(err)) => return Err(err),
                Some(LoadEvent::Cancelled) => return Err(AssetError::Cancelled),
                Some(LoadEvent::Progress(_)) => {}
                None if self.finished => return Err(AssetError::Disconnected),
                None => {}
            }
        }
    }

    fn accept(&mut self, event: LoadEvent) -> Option<LoadEvent> {
        let cancelled = self.cancel.load(Ordering::Relaxed);
        let event = match event {
            LoadEvent::Progress(_) if cancelled => return None,
            LoadEvent::Loaded(_) if cancelled => LoadEvent::Cancelled,
            other => other,
        };
        if event.is_terminal() {
            self.finished = true;
        }
        Some(event)
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
    }
}

struct Worker {
    path: PathBuf,
    chunk_size: usize,
    cancel: Arc<AtomicBool>,
    tx: Sender<LoadEvent>,
}

impl Worker {
    fn run(self) {
        let event = match self.load() {
            Ok(asset) => LoadEvent::Loaded(asset),
            Err(AssetError::Cancelled) => LoadEvent::Cancelled,
            Err(err) => {
                warn!(path = %self.path.display(), error = %err, "Asset load failed");
                LoadEvent::Failed(err)
            }
        };
        let _ = self.tx.send(event);
    }

    fn load(&self) -> Result<LoadedAsset, AssetError> {
        let bytes = self.read()?;
        self.check_cancel()?;

        let scene = import_gltf(&bytes, self.path.parent())?;
        self.check_cancel()?;

        let surfaces = scene.surface_count();
        info!(path = %self.path.display(), surfaces, "Asset loaded");
        Ok(LoadedAsset {
            scene,
            source: self.path.clone(),
            surfaces,
        })
    }

    fn read(&self) -> Result<Vec<u8>, AssetError> {
        let mut file = File::open(&self.path)?;
        let total = file.metadata().map(|m| m.len()).unwrap_or(0);
        let mut bytes = Vec::with_capacity(total as usize);
        let mut chunk = vec![0u8; self.chunk_size];

        loop {
            self.check_cancel()?;
            let n = file.read(&mut chunk)?;
            if n == 0 {
                break;
            }
            bytes.extend_from_slice(&chunk[..n]);
            let progress = LoadProgress {
                loaded: bytes.len() as u64,
                total,
            };
            if self.tx.send(LoadEvent::Progress(progress)).is_err() {
                return Err(AssetError::Disconnected);
            }
        }
        Ok(bytes)
    }

    fn check_cancel(&self) -> Result<(), AssetError> {
        if self.cancel.load(Ordering::Relaxed) {
            return Err(AssetError::Cancelled);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_handles_unknown_total() {
        assert_eq!(LoadProgress { loaded: 10, total: 0 }.percent(), 0.0);
        assert_eq!(LoadProgress { loaded: 50, total: 200 }.percent(), 25.0);
        assert_eq!(LoadProgress { loaded: 200, total: 200 }.percent(), 100.0);
    }

    #[test]
    fn missing_file_fails_with_io() {
        let handle = AssetLoader::spawn("/definitely/not/here/scene.gltf");
        assert!(matches!(handle.wait(), Err(AssetError::Io(_))));
    }

    #[test]
    fn progress_is_dropped_after_cancel() {
        let (tx, rx) = mpsc::channel();
        let mut handle = LoadHandle {
            path: PathBuf::from("scene.gltf"),
            rx,
            cancel: Arc::new(AtomicBool::new(false)),
            finished: false,
        };
        tx.send(LoadEvent::Progress(LoadProgress { loaded: 1, total: 2 }))
            .unwrap();
        handle.cancel();
        tx.send(LoadEvent::Loaded(LoadedAsset {
            scene: Scene::new(),
            source: PathBuf::from("scene.gltf"),
            surfaces: 0,
        }))
        .unwrap();

        let events = handle.poll();
        assert_eq!(events.len(), 1);
        assert!(matches!(events[0], LoadEvent::Cancelled));
        assert!(handle.is_finished());
    }

    #[test]
    fn vanished_worker_reports_disconnect() {
        let (tx, rx) = mpsc::channel::<LoadEvent>();
        drop(tx);
        let mut handle = LoadHandle {
            path: PathBuf::from("scene.gltf"),
            rx,
            cancel: Arc::new(AtomicBool::new(false)),
            finished: false,
        };
        let events = handle.poll();
        assert!(matches!(events.as_slice(), [LoadEvent::Failed(AssetError::Disconnected)]));
        assert!(handle.poll().is_empty());
    }
}
