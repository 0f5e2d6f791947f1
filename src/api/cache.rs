//! Time-bounded memoization of the lookups hit on every interaction.

use std::cell::RefCell;
use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

use super::{
    ApiError, FeatureStds, GraphId, PlaygroundBackend, PredictionSeries, SaveGraphRequest,
    SaveGraphResponse, SavedGraph, UserId,
};
use crate::config::CacheSettings;
use crate::presets::PresetEntry;
use crate::sweep::SweepRequest;

/// Values that expire `ttl` after insertion.
#[derive(Debug)]
pub(crate) struct TtlCache<K, V> {
    ttl: Duration,
    entries: HashMap<K, (Instant, V)>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    pub(crate) fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    /// Fresh value for `key` as of `now`, if any.
    pub(crate) fn get(&self, key: &K, now: Instant) -> Option<V> {
        let (stored_at, value) = self.entries.get(key)?;
        (now.saturating_duration_since(*stored_at) < self.ttl).then(|| value.clone())
    }

    pub(crate) fn insert(&mut self, key: K, value: V, now: Instant) {
        self.entries.insert(key, (now, value));
    }

    pub(crate) fn remove(&mut self, key: &K) {
        self.entries.remove(key);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Decorates a backend with per-endpoint caches.
///
/// The feature list is keyed by endpoint alone and saved graphs by user id.
/// A successful save drops the saving user's saved-graph entry.
pub struct CachedBackend<B> {
    inner: B,
    features: RefCell<TtlCache<(), Vec<String>>>,
    saved_graphs: RefCell<TtlCache<UserId, Vec<SavedGraph>>>,
}

impl<B: PlaygroundBackend> CachedBackend<B> {
    pub fn new(inner: B, settings: &CacheSettings) -> Self {
        Self::with_ttls(inner, settings.features_ttl(), settings.saved_graphs_ttl())
    }

    pub fn with_ttls(inner: B, features_ttl: Duration, saved_graphs_ttl: Duration) -> Self {
        Self {
            inner,
            features: RefCell::new(TtlCache::new(features_ttl)),
            saved_graphs: RefCell::new(TtlCache::new(saved_graphs_ttl)),
        }
    }
}

impl<B: PlaygroundBackend> PlaygroundBackend for CachedBackend<B> {
    fn list_features(&self) -> Result<Vec<String>, ApiError> {
        let now = Instant::now();
        if let Some(features) = self.features.borrow().get(&(), now) {
            tracing::trace!("Feature list served from cache");
            return Ok(features);
        }
        let features = self.inner.list_features()?;
        self.features
            .borrow_mut()
            .insert((), features.clone(), now);
        Ok(features)
    }

    fn fetch_presets(&self) -> Result<Vec<PresetEntry>, ApiError> {
        self.inner.fetch_presets()
    }

    fn fetch_saved_graphs(&self, user_id: UserId) -> Result<Vec<SavedGraph>, ApiError> {
        let now = Instant::now();
        if let Some(graphs) = self.saved_graphs.borrow().get(&user_id, now) {
            tracing::trace!(user_id, "Saved graphs served from cache");
            return Ok(graphs);
        }
        let graphs = self.inner.fetch_saved_graphs(user_id)?;
        self.saved_graphs
            .borrow_mut()
            .insert(user_id, graphs.clone(), now);
        Ok(graphs)
    }

    fn load_graph(&self, id: GraphId) -> Result<SavedGraph, ApiError> {
        self.inner.load_graph(id)
    }

    fn save_graph(&self, request: &SaveGraphRequest) -> Result<SaveGraphResponse, ApiError> {
        let response = self.inner.save_graph(request)?;
        self.invalidate_saved_graphs(request.user_id);
        Ok(response)
    }

    fn predict_sweep(&self, request: &SweepRequest) -> Result<PredictionSeries, ApiError> {
        self.inner.predict_sweep(request)
    }

    fn fetch_feature_stds(&self) -> Result<FeatureStds, ApiError> {
        self.inner.fetch_feature_stds()
    }

    fn invalidate_saved_graphs(&self, user_id: UserId) {
        self.saved_graphs.borrow_mut().remove(&user_id);
    }

    fn clear_cache(&self) {
        self.features.borrow_mut().clear();
        self.saved_graphs.borrow_mut().clear();
    }
}
