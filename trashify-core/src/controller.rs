//! Orchestrates "location changed, fetch, project, publish" for nearby disposal points.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::{DateTime, Local};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::appearance::project;
use crate::model::{
    Annotation, Coordinate, DisposalPoint, MapRegion, QueryId, QueryState, SearchQuery,
    SearchRadius,
};
use crate::ports::{ProximitySearch, SearchError, TokenProvider};

#[derive(Debug, Clone, Copy, Default)]
/// Tunables for [`NearbyItemsController`].
pub struct ControllerConfig {
    /// Distance band used for every issued query.
    pub radius: SearchRadius,
}

#[derive(Debug, Clone, PartialEq)]
/// Everything the presentation layer renders, published as one value.
pub struct NearbySnapshot {
    /// Lifecycle of the latest query.
    pub state: QueryState,
    /// Pins from the last successful query. Kept while loading and after failures.
    pub annotations: Vec<Annotation>,
    /// Where the map is centered, once anything has been selected or located.
    pub region: Option<MapRegion>,
    /// Last reported device position.
    pub device_location: Option<Coordinate>,
    /// Whether device fixes move the map center.
    pub recenter_on_device: bool,
    /// When [`Self::annotations`] were last replaced.
    pub updated_at: Option<DateTime<Local>>,
}

impl Default for NearbySnapshot {
    fn default() -> Self {
        Self {
            state: QueryState::Idle,
            annotations: Vec::new(),
            region: None,
            device_location: None,
            recenter_on_device: true,
            updated_at: None,
        }
    }
}

/// Handle to a spawned query. Dropping it leaves the query running.
#[derive(Debug)]
pub struct InFlight {
    id: QueryId,
    handle: JoinHandle<()>,
}

impl InFlight {
    /// Sequence id of the query.
    #[must_use]
    pub fn id(&self) -> QueryId {
        self.id
    }

    /// Wait until the query's result has been applied or discarded.
    pub async fn settled(self) {
        if let Err(err) = self.handle.await {
            warn!(query = %self.id, error = %err, "Query task did not finish");
        }
    }
}

/// Drives [`QueryState`] from location events and publishes [`NearbySnapshot`]s.
///
/// Cloning yields another handle to the same controller.
#[derive(Clone)]
pub struct NearbyItemsController {
    inner: Arc<Inner>,
}

struct Inner {
    search: Arc<dyn ProximitySearch>,
    tokens: Arc<dyn TokenProvider>,
    config: ControllerConfig,
    latest: AtomicU64,
    located: AtomicBool,
    snapshot: watch::Sender<NearbySnapshot>,
}

impl NearbyItemsController {
    /// Create an idle controller.
    #[must_use]
    pub fn new(
        search: Arc<dyn ProximitySearch>,
        tokens: Arc<dyn TokenProvider>,
        config: ControllerConfig,
    ) -> Self {
        let (snapshot, _) = watch::channel(NearbySnapshot::default());
        Self {
            inner: Arc::new(Inner {
                search,
                tokens,
                config,
                latest: AtomicU64::new(0),
                located: AtomicBool::new(false),
                snapshot,
            }),
        }
    }

    /// The user picked a location: center there and search around it.
    ///
    /// Returns as soon as the query is spawned.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] when the configured radius is inverted.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn on_location_selected(&self, coordinate: Coordinate) -> Result<InFlight, SearchError> {
        let query = SearchQuery::within(coordinate, self.inner.config.radius)?;
        info!(location = %coordinate, "Location selected");
        Ok(self.issue(query, true))
    }

    /// The device reported its position.
    ///
    /// The first fix searches around the device. Every fix moves the map center
    /// while recentering is on.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidQuery`] when the first fix cannot be searched
    /// because the configured radius is inverted. Later fixes never fail.
    ///
    /// # Panics
    ///
    /// Panics when a query has to be spawned outside a tokio runtime.
    pub fn on_device_location(
        &self,
        coordinate: Coordinate,
    ) -> Result<Option<InFlight>, SearchError> {
        self.inner.snapshot.send_modify(|snapshot| {
            snapshot.device_location = Some(coordinate);
            if snapshot.recenter_on_device || snapshot.region.is_none() {
                snapshot.region = Some(MapRegion::around(coordinate));
            }
        });

        if self.inner.located.swap(true, Ordering::SeqCst) {
            return Ok(None);
        }
        debug!(location = %coordinate, "First device fix");
        let query = SearchQuery::within(coordinate, self.inner.config.radius)?;
        Ok(Some(self.issue(query, false)))
    }

    /// Apply the result of query `id`. Results of superseded or already settled
    /// queries are dropped.
    ///
    /// Returns whether the result was applied.
    pub fn on_query_completed(
        &self,
        id: QueryId,
        result: Result<Vec<DisposalPoint>, SearchError>,
    ) -> bool {
        self.inner.complete(id, result)
    }

    /// State of the latest query.
    #[must_use]
    pub fn current_state(&self) -> QueryState {
        self.inner.snapshot.borrow().state.clone()
    }

    /// Copy of everything currently published.
    #[must_use]
    pub fn snapshot(&self) -> NearbySnapshot {
        self.inner.snapshot.borrow().clone()
    }

    /// Receiver notified on every published change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NearbySnapshot> {
        self.inner.snapshot.subscribe()
    }

    /// Whether device fixes move the map center.
    #[must_use]
    pub fn should_recenter_on_device(&self) -> bool {
        self.inner.snapshot.borrow().recenter_on_device
    }

    /// Turn device recentering on or off.
    pub fn set_recenter_on_device(&self, enabled: bool) {
        self.inner.snapshot.send_if_modified(|snapshot| {
            let changed = snapshot.recenter_on_device != enabled;
            snapshot.recenter_on_device = enabled;
            changed
        });
    }

    /// Flip device recentering and return the new value.
    pub fn toggle_recenter_on_device(&self) -> bool {
        let mut enabled = false;
        self.inner.snapshot.send_modify(|snapshot| {
            snapshot.recenter_on_device = !snapshot.recenter_on_device;
            enabled = snapshot.recenter_on_device;
        });
        enabled
    }

    /// Remove all pins. Query state is left alone.
    pub fn clear_annotations(&self) {
        self.inner.snapshot.send_if_modified(|snapshot| {
            let had_pins = !snapshot.annotations.is_empty();
            snapshot.annotations.clear();
            had_pins
        });
    }

    fn issue(&self, query: SearchQuery, center_on_origin: bool) -> InFlight {
        let mut id = QueryId(0);
        self.inner.snapshot.send_modify(|snapshot| {
            id = QueryId(self.inner.latest.fetch_add(1, Ordering::SeqCst) + 1);
            snapshot.state = QueryState::Loading;
            if center_on_origin {
                snapshot.region = Some(MapRegion::around(query.origin()));
            }
        });
        debug!(query = %id, origin = %query.origin(), "Issuing proximity query");

        let inner = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let token = inner.tokens.current_token();
            let result = inner.search.fetch(&query, &token).await;
            inner.complete(id, result);
        });

        InFlight { id, handle }
    }
}

impl Inner {
    fn complete(&self, id: QueryId, result: Result<Vec<DisposalPoint>, SearchError>) -> bool {
        let applied = self.snapshot.send_if_modified(|snapshot| {
            if self.latest.load(Ordering::SeqCst) != id.0 || !snapshot.state.is_loading() {
                return false;
            }

            match result {
                Ok(points) => {
                    debug!(query = %id, count = points.len(), "Query loaded");
                    snapshot.annotations = points
                        .iter()
                        .map(|point| Annotation {
                            point: point.clone(),
                            style: project(&point.category),
                        })
                        .collect();
                    snapshot.state = QueryState::Loaded(points);
                    snapshot.updated_at = Some(Local::now());
                }
                Err(err) => {
                    warn!(query = %id, error = %err, "Query failed");
                    snapshot.state = QueryState::Failed {
                        kind: err.kind(),
                        reason: err.to_string(),
                    };
                }
            }
            true
        });

        if !applied {
            debug!(query = %id, "Dropping stale or duplicate query result");
        }
        applied
    }
}
