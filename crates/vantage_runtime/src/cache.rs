//! Deduplicating render-model cache.
//!
//! The first lookup of a name spawns a background worker that polls the
//! [`ModelProvider`] (sleep-and-retry, never busy-spin) until the load
//! settles; the render loop keeps drawing "no model" while the entry is
//! [`ModelState::Pending`].  Later frames drain the result, upload it to the
//! GPU through the [`ModelUploader`] seam and cache the outcome — success
//! and terminal failure alike — so the provider is polled at most once per
//! distinct name.
//!
//! Lookup is case-insensitive; at most one GPU instance exists per name.
//! Dropping the cache raises a cancellation flag and joins outstanding
//! workers, so shutdown mid-load is clean.

use std::collections::hash_map::Entry as MapEntry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crate::models::{LoadPoll, ModelData, ModelProvider, ProviderError};

/// Uploads a finished [`ModelData`] into its GPU-resident form `M`.
///
/// A seam rather than a direct wgpu call so the cache's control flow is
/// testable without a graphics device.
pub trait ModelUploader<M> {
    fn upload(&self, name: &str, data: &ModelData) -> anyhow::Result<M>;
}

/// Outcome of a cache lookup for the current frame.
pub enum ModelState<M> {
    /// Loaded and GPU-resident.  The `Arc` shares the cache's single
    /// instance; its lifetime is the cache's lifetime.
    Ready(Arc<M>),
    /// Load in flight; render without a model and ask again next frame.
    Pending,
    /// Terminal failure; the device renders without a model for the session.
    Unavailable,
}

impl<M> ModelState<M> {
    /// The loaded model, if any.
    pub fn ready(&self) -> Option<Arc<M>> {
        match self {
            ModelState::Ready(m) => Some(Arc::clone(m)),
            _ => None,
        }
    }
}

enum Entry<M> {
    Pending {
        rx: Receiver<Result<ModelData, ProviderError>>,
        worker: Option<JoinHandle<()>>,
    },
    Ready(Arc<M>),
    Unavailable,
}

/// See the module docs.
pub struct ModelCache<M> {
    provider: Arc<dyn ModelProvider>,
    entries: HashMap<String, Entry<M>>,
    cancel: Arc<AtomicBool>,
    poll_interval: Duration,
}

impl<M> ModelCache<M> {
    pub fn new(provider: Arc<dyn ModelProvider>) -> Self {
        Self {
            provider,
            entries: HashMap::new(),
            cancel: Arc::new(AtomicBool::new(false)),
            poll_interval: Duration::from_millis(1),
        }
    }

    /// Looks up `name`, starting a background load on first encounter.
    ///
    /// Call once per frame per wanted model until the state settles; settled
    /// states are plain map lookups.
    pub fn find_or_load(&mut self, name: &str, uploader: &dyn ModelUploader<M>) -> ModelState<M> {
        let key = name.to_ascii_lowercase();

        match self.entries.entry(key) {
            MapEntry::Vacant(slot) => {
                let (rx, worker) = spawn_load(
                    Arc::clone(&self.provider),
                    name.to_owned(),
                    Arc::clone(&self.cancel),
                    self.poll_interval,
                );
                slot.insert(Entry::Pending {
                    rx,
                    worker: Some(worker),
                });
                ModelState::Pending
            }
            MapEntry::Occupied(mut slot) => match slot.get_mut() {
                Entry::Ready(model) => ModelState::Ready(Arc::clone(model)),
                Entry::Unavailable => ModelState::Unavailable,
                Entry::Pending { rx, worker } => match rx.try_recv() {
                    Ok(result) => {
                        if let Some(handle) = worker.take() {
                            let _ = handle.join();
                        }
                        let settled = Self::settle(name, result, uploader);
                        let state = match &settled {
                            Entry::Ready(m) => ModelState::Ready(Arc::clone(m)),
                            _ => ModelState::Unavailable,
                        };
                        slot.insert(settled);
                        state
                    }
                    Err(TryRecvError::Empty) => ModelState::Pending,
                    // Worker exited without a result (cancelled) — treat the
                    // model as unavailable rather than re-spawning.
                    Err(TryRecvError::Disconnected) => {
                        slot.insert(Entry::Unavailable);
                        ModelState::Unavailable
                    }
                },
            },
        }
    }

    /// Number of successfully loaded models currently resident.
    pub fn loaded_count(&self) -> usize {
        self.entries
            .values()
            .filter(|e| matches!(e, Entry::Ready(_)))
            .count()
    }

    fn settle(
        name: &str,
        result: Result<ModelData, ProviderError>,
        uploader: &dyn ModelUploader<M>,
    ) -> Entry<M> {
        match result {
            Ok(data) => match uploader.upload(name, &data) {
                Ok(model) => {
                    log::info!(
                        "render model `{}` loaded ({} vertices)",
                        name,
                        data.vertices.len()
                    );
                    Entry::Ready(Arc::new(model))
                }
                Err(err) => {
                    log::warn!("GPU upload failed for render model `{}`: {:#}", name, err);
                    Entry::Unavailable
                }
            },
            Err(err) => {
                log::warn!("unable to load render model `{}`: {}", name, err);
                Entry::Unavailable
            }
        }
    }
}

impl<M> Drop for ModelCache<M> {
    fn drop(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        for entry in self.entries.values_mut() {
            if let Entry::Pending { worker, .. } = entry {
                if let Some(handle) = worker.take() {
                    let _ = handle.join();
                }
            }
        }
    }
}

/// Polls the provider on a worker thread until the load settles or the cache
/// is dropped.
fn spawn_load(
    provider: Arc<dyn ModelProvider>,
    name: String,
    cancel: Arc<AtomicBool>,
    poll_interval: Duration,
) -> (
    Receiver<Result<ModelData, ProviderError>>,
    JoinHandle<()>,
) {
    let (tx, rx) = std::sync::mpsc::channel();
    let handle = std::thread::spawn(move || loop {
        if cancel.load(Ordering::Relaxed) {
            return;
        }
        match provider.poll_model(&name) {
            LoadPoll::Loading => std::thread::sleep(poll_interval),
            LoadPoll::Ready(data) => {
                let _ = tx.send(Ok(data));
                return;
            }
            LoadPoll::Failed(err) => {
                let _ = tx.send(Err(err));
                return;
            }
        }
    });
    (rx, handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ModelVertex, TextureData};
    use std::sync::atomic::AtomicUsize;

    fn tiny_model() -> ModelData {
        ModelData {
            vertices: vec![ModelVertex {
                position: [0.0; 3],
                normal: [0.0, 1.0, 0.0],
                tex_coord: [0.0; 2],
            }],
            indices: vec![0, 0, 0],
            texture: TextureData {
                width: 1,
                height: 1,
                rgba: vec![255; 4],
            },
        }
    }

    /// Counts polls; optionally reports `Loading` a fixed number of times
    /// before settling.
    struct CountingProvider {
        polls: AtomicUsize,
        loading_polls: usize,
        fail: bool,
    }

    impl CountingProvider {
        fn ready() -> Self {
            Self {
                polls: AtomicUsize::new(0),
                loading_polls: 0,
                fail: false,
            }
        }
        fn failing() -> Self {
            Self {
                polls: AtomicUsize::new(0),
                loading_polls: 0,
                fail: true,
            }
        }
        fn slow(loading_polls: usize) -> Self {
            Self {
                polls: AtomicUsize::new(0),
                loading_polls,
                fail: false,
            }
        }
    }

    impl ModelProvider for CountingProvider {
        fn poll_model(&self, name: &str) -> LoadPoll {
            let n = self.polls.fetch_add(1, Ordering::SeqCst);
            if n < self.loading_polls {
                LoadPoll::Loading
            } else if self.fail {
                LoadPoll::Failed(ProviderError::UnknownModel(name.to_owned()))
            } else {
                LoadPoll::Ready(tiny_model())
            }
        }
    }

    /// Hangs forever — exercises the cancellation path.
    struct HangingProvider;

    impl ModelProvider for HangingProvider {
        fn poll_model(&self, _: &str) -> LoadPoll {
            LoadPoll::Loading
        }
    }

    /// Test uploader: "GPU resource" is the vertex count.
    struct CountUploader {
        uploads: AtomicUsize,
    }

    impl CountUploader {
        fn new() -> Self {
            Self {
                uploads: AtomicUsize::new(0),
            }
        }
    }

    impl ModelUploader<usize> for CountUploader {
        fn upload(&self, _: &str, data: &ModelData) -> anyhow::Result<usize> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            Ok(data.vertices.len())
        }
    }

    /// Drives the cache until the named entry leaves `Pending`.
    fn settle(
        cache: &mut ModelCache<usize>,
        name: &str,
        uploader: &CountUploader,
    ) -> ModelState<usize> {
        for _ in 0..1000 {
            match cache.find_or_load(name, uploader) {
                ModelState::Pending => std::thread::sleep(Duration::from_millis(1)),
                settled => return settled,
            }
        }
        panic!("model `{name}` never settled");
    }

    #[test]
    fn second_lookup_returns_same_instance_without_reload() {
        let provider = Arc::new(CountingProvider::ready());
        let uploader = CountUploader::new();
        let mut cache: ModelCache<usize> = ModelCache::new(Arc::clone(&provider) as _);

        let first = settle(&mut cache, "controller_left", &uploader)
            .ready()
            .expect("load succeeds");
        let second = cache
            .find_or_load("controller_left", &uploader)
            .ready()
            .expect("cached");

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.polls.load(Ordering::SeqCst), 1);
        assert_eq!(uploader.uploads.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let provider = Arc::new(CountingProvider::ready());
        let uploader = CountUploader::new();
        let mut cache: ModelCache<usize> = ModelCache::new(Arc::clone(&provider) as _);

        let first = settle(&mut cache, "Vive_Wand", &uploader).ready().unwrap();
        let second = cache
            .find_or_load("vive_wand", &uploader)
            .ready()
            .expect("same entry");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(provider.polls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn permanent_failure_is_cached_and_silent() {
        let provider = Arc::new(CountingProvider::failing());
        let uploader = CountUploader::new();
        let mut cache: ModelCache<usize> = ModelCache::new(Arc::clone(&provider) as _);

        assert!(matches!(
            settle(&mut cache, "ghost", &uploader),
            ModelState::Unavailable
        ));
        assert!(matches!(
            cache.find_or_load("ghost", &uploader),
            ModelState::Unavailable
        ));
        assert_eq!(provider.polls.load(Ordering::SeqCst), 1);
        assert_eq!(uploader.uploads.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn slow_load_settles_after_retries() {
        let provider = Arc::new(CountingProvider::slow(3));
        let uploader = CountUploader::new();
        let mut cache: ModelCache<usize> = ModelCache::new(Arc::clone(&provider) as _);

        let model = settle(&mut cache, "hmd", &uploader).ready().unwrap();
        assert_eq!(*model, 1);
        assert_eq!(provider.polls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn drop_cancels_in_flight_load() {
        let mut cache: ModelCache<usize> = ModelCache::new(Arc::new(HangingProvider));
        let uploader = CountUploader::new();
        assert!(matches!(
            cache.find_or_load("never", &uploader),
            ModelState::Pending
        ));
        // Drop joins the worker; the test hangs if cancellation is broken.
        drop(cache);
    }
}
