//! Bounded cache of decoded frame images.
//!
//! Decoding itself lives outside the engine: on a miss the caller invokes
//! the [`FrameDecoder`] and populates the cache. Entries own their pixel
//! buffers, so eviction releases the memory.

use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};

use image::RgbaImage;
use log::warn;
use lru::LruCache;
use uuid::Uuid;

use crate::error::EngineError;
use crate::evaluation::timing::map_global_frame_to_source;
use crate::model::asset::Asset;
use crate::model::layer::TimeRange;

const DEFAULT_FRAME_CACHE_SIZE: usize = 100;

/// One decoded frame. Dropping it releases the pixel buffer.
pub struct FrameImage {
    image: RgbaImage,
}

impl FrameImage {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FrameKey {
    pub asset_id: Uuid,
    pub frame: u64,
}

impl FrameKey {
    pub fn new(asset_id: Uuid, frame: u64) -> Self {
        Self { asset_id, frame }
    }
}

impl fmt::Display for FrameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.asset_id, self.frame)
    }
}

/// External frame-decode collaborator. May fail; failure is logged by the
/// caller and never fatal (the last good frame stays on screen).
pub trait FrameDecoder {
    fn decode_frame(&self, asset: &Asset, frame: u64) -> Result<FrameImage, EngineError>;
}

/// Fixed-capacity LRU over decoded frames, keyed by (asset, frame).
///
/// Shared with the decode side behind an `Arc`; each get/put is atomic.
pub struct FrameImageCache {
    inner: Mutex<LruCache<FrameKey, Arc<FrameImage>>>,
}

impl FrameImageCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FRAME_CACHE_SIZE)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity must be > 0");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Look up a frame, promoting it to most-recently-used.
    pub fn get(&self, key: FrameKey) -> Option<Arc<FrameImage>> {
        self.inner.lock().unwrap().get(&key).cloned()
    }

    /// Insert a frame, evicting the least-recently-used entry when full.
    pub fn put(&self, key: FrameKey, frame: Arc<FrameImage>) {
        self.inner.lock().unwrap().put(key, frame);
    }

    /// Drop every cached frame of one asset (asset replaced or deleted).
    pub fn clear_asset(&self, asset_id: Uuid) {
        let mut inner = self.inner.lock().unwrap();
        let stale: Vec<FrameKey> = inner
            .iter()
            .map(|(key, _)| *key)
            .filter(|key| key.asset_id == asset_id)
            .collect();
        for key in stale {
            inner.pop(&key);
        }
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap().clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

impl Default for FrameImageCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache-through frame fetch: map the global frame into the source, serve
/// from the cache, or decode and populate.
///
/// `Ok(None)` means the layer is inactive at `global_frame`. An asset still
/// loading reports [`EngineError::AssetNotReady`]; decode failures are
/// logged and propagated so the caller can keep its previous frame.
pub fn fetch_frame(
    cache: &FrameImageCache,
    decoder: &dyn FrameDecoder,
    asset: &Asset,
    time_range: &TimeRange,
    global_frame: u64,
) -> Result<Option<Arc<FrameImage>>, EngineError> {
    let Some(source_frame) = map_global_frame_to_source(global_frame, time_range, asset.frame_count())
    else {
        return Ok(None);
    };

    if !asset.is_ready() {
        return Err(EngineError::AssetNotReady(asset.id));
    }

    let key = FrameKey::new(asset.id, source_frame);
    if let Some(frame) = cache.get(key) {
        return Ok(Some(frame));
    }

    match decoder.decode_frame(asset, source_frame) {
        Ok(frame) => {
            let frame = Arc::new(frame);
            cache.put(key, frame.clone());
            Ok(Some(frame))
        }
        Err(err) => {
            warn!("frame decode failed for {}: {}", key, err);
            Err(err)
        }
    }
}
