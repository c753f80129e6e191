use futures::channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use futures::{FutureExt, StreamExt};
use image::RgbaImage;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::CanvasError;
use crate::scene::{ImageId, Scene};

/// Where a placed image's pixels come from.
#[derive(Clone)]
pub enum ImageSource {
    /// Encoded file on disk
    Path(PathBuf),
    /// Encoded bytes already in memory (dropped files, clipboard, network)
    Memory { uri: String, bytes: Arc<[u8]> },
    /// Pixels that need no decoding
    Rgba { uri: String, image: Arc<RgbaImage> },
}

impl std::fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ImageSource::Memory { uri, bytes } => f
                .debug_struct("Memory")
                .field("uri", uri)
                .field("bytes_len", &bytes.len())
                .finish(),
            ImageSource::Rgba { uri, image } => f
                .debug_struct("Rgba")
                .field("uri", uri)
                .field("dimensions", &image.dimensions())
                .finish(),
        }
    }
}

impl ImageSource {
    pub fn path(path: impl Into<PathBuf>) -> Self {
        ImageSource::Path(path.into())
    }

    pub fn memory(uri: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        ImageSource::Memory {
            uri: uri.into(),
            bytes: bytes.into(),
        }
    }

    pub fn rgba(uri: impl Into<String>, image: RgbaImage) -> Self {
        ImageSource::Rgba {
            uri: uri.into(),
            image: Arc::new(image),
        }
    }

    /// Identity of the source; a changed uri means the bitmap must be reloaded
    pub fn uri(&self) -> String {
        match self {
            ImageSource::Path(path) => path.display().to_string(),
            ImageSource::Memory { uri, .. } | ImageSource::Rgba { uri, .. } => uri.clone(),
        }
    }

    fn decode(&self) -> Result<Arc<RgbaImage>, CanvasError> {
        let bytes = match self {
            ImageSource::Rgba { image, .. } => return Ok(Arc::clone(image)),
            ImageSource::Memory { bytes, .. } => Arc::clone(bytes),
            ImageSource::Path(path) => std::fs::read(path)
                .map_err(|source| CanvasError::Io {
                    path: path.clone(),
                    source,
                })?
                .into(),
        };

        let decoded = image::load_from_memory(&bytes).map_err(|source| CanvasError::Decode {
            uri: self.uri(),
            source,
        })?;
        Ok(Arc::new(decoded.to_rgba8()))
    }
}

/// Pending-redraw flag shared between decode tasks and the UI thread.
///
/// Decode tasks only ever call [`RedrawSignal::request`]; the host registers a
/// waker (for egui, `Context::request_repaint`) to get its event loop going.
#[derive(Default)]
pub struct RedrawSignal {
    pending: AtomicBool,
    waker: Mutex<Option<Box<dyn Fn() + Send + Sync>>>,
}

impl std::fmt::Debug for RedrawSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedrawSignal")
            .field("pending", &self.pending.load(Ordering::Relaxed))
            .field("waker", &self.waker.lock().is_some())
            .finish()
    }
}

impl RedrawSignal {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        *self.waker.lock() = Some(Box::new(waker));
    }

    pub fn request(&self) {
        self.pending.store(true, Ordering::Release);
        if let Some(waker) = self.waker.lock().as_ref() {
            waker();
        }
    }

    /// Clear and return the pending flag
    pub fn take(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }
}

/// How decode tasks are run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodeExecutor {
    /// Decode off the UI thread (a thread per request natively, a local
    /// future on wasm)
    #[default]
    Background,
    /// Decode on the calling thread. Results are still only applied by
    /// [`ImageCache::poll`].
    Inline,
}

impl DecodeExecutor {
    fn spawn(self, task: impl FnOnce() + Send + 'static) {
        match self {
            DecodeExecutor::Inline => task(),
            #[cfg(not(target_arch = "wasm32"))]
            DecodeExecutor::Background => {
                if let Err(err) = std::thread::Builder::new()
                    .name("image-decode".to_owned())
                    .spawn(task)
                {
                    log::warn!("Could not spawn decode thread: {}", err);
                }
            }
            #[cfg(target_arch = "wasm32")]
            DecodeExecutor::Background => {
                wasm_bindgen_futures::spawn_local(async move { task() });
            }
        }
    }
}

struct CacheEntry {
    uri: String,
    generation: u64,
    bitmap: Option<Arc<RgbaImage>>,
    failed: bool,
}

struct DecodeResult {
    id: ImageId,
    generation: u64,
    result: Result<Arc<RgbaImage>, CanvasError>,
}

/// Maps image ids to decoded bitmaps.
///
/// Loading is asynchronous and lookup synchronous: [`ImageCache::get`] returns
/// `None` until a decode has been applied by [`ImageCache::poll`]. Only the
/// owner of the cache writes to it; decode tasks talk back over a channel.
pub struct ImageCache {
    entries: HashMap<ImageId, CacheEntry>,
    next_generation: u64,
    sender: UnboundedSender<DecodeResult>,
    receiver: UnboundedReceiver<DecodeResult>,
    executor: DecodeExecutor,
    redraw: Arc<RedrawSignal>,
}

impl std::fmt::Debug for ImageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageCache")
            .field("entries", &self.entries.len())
            .field("executor", &self.executor)
            .finish_non_exhaustive()
    }
}

impl ImageCache {
    pub fn new(executor: DecodeExecutor, redraw: Arc<RedrawSignal>) -> Self {
        let (sender, receiver) = mpsc::unbounded();
        Self {
            entries: HashMap::new(),
            next_generation: 0,
            sender,
            receiver,
            executor,
            redraw,
        }
    }

    pub fn redraw_signal(&self) -> &Arc<RedrawSignal> {
        &self.redraw
    }

    /// Start decoding `source` for `id` unless it is already cached or in
    /// flight for the same source. Never blocks.
    pub fn ensure_loaded(&mut self, id: ImageId, source: &ImageSource) {
        let uri = source.uri();
        if self.entries.get(&id).is_some_and(|entry| entry.uri == uri) {
            return;
        }

        self.next_generation += 1;
        let generation = self.next_generation;
        log::debug!("Decoding image {} from {}", id, uri);
        self.entries.insert(
            id,
            CacheEntry {
                uri,
                generation,
                bitmap: None,
                failed: false,
            },
        );

        let source = source.clone();
        let sender = self.sender.clone();
        let redraw = Arc::clone(&self.redraw);
        self.executor.spawn(move || {
            let result = source.decode();
            // The receiver lives as long as the cache; a send error only
            // means the cache is gone and nobody needs the bitmap.
            if sender.unbounded_send(DecodeResult { id, generation, result }).is_ok() {
                redraw.request();
            }
        });
    }

    /// Apply finished decodes. Results for evicted or superseded entries are
    /// discarded. Returns true if any bitmap became available.
    pub fn poll(&mut self) -> bool {
        let mut loaded = false;
        while let Some(Some(done)) = self.receiver.next().now_or_never() {
            let Some(entry) = self.entries.get_mut(&done.id) else {
                log::debug!("Dropping decode for evicted image {}", done.id);
                continue;
            };
            if entry.generation != done.generation {
                log::debug!("Dropping stale decode for image {}", done.id);
                continue;
            }

            match done.result {
                Ok(bitmap) => {
                    log::info!("Decoded image {}: {}x{}", done.id, bitmap.width(), bitmap.height());
                    entry.bitmap = Some(bitmap);
                    loaded = true;
                }
                Err(err) => {
                    log::warn!("{}", err);
                    entry.failed = true;
                }
            }
        }
        loaded
    }

    /// The decoded bitmap, or `None` while it is still loading (or failed)
    pub fn get(&self, id: ImageId) -> Option<&Arc<RgbaImage>> {
        self.entries.get(&id).and_then(|entry| entry.bitmap.as_ref())
    }

    pub fn is_pending(&self, id: ImageId) -> bool {
        self.entries
            .get(&id)
            .is_some_and(|entry| entry.bitmap.is_none() && !entry.failed)
    }

    pub fn has_failed(&self, id: ImageId) -> bool {
        self.entries.get(&id).is_some_and(|entry| entry.failed)
    }

    pub fn evict(&mut self, id: ImageId) {
        if self.entries.remove(&id).is_some() {
            log::debug!("Evicted image {}", id);
        }
    }

    /// Drop entries whose image left the scene and start loads for new or
    /// changed sources.
    pub fn reconcile(&mut self, scene: &Scene) {
        self.entries.retain(|id, _| scene.contains(*id));
        for image in scene.images() {
            if let Some(source) = &image.source {
                self.ensure_loaded(image.id, source);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
