//! Proximity search against `GET {base}/trash/distance`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Request};
use serde::Deserialize;
use tracing::{debug, warn};

use trashify_core::{
    model::{Coordinate, DisposalPoint, InvalidCoordinate, PointId, SearchQuery},
    ports::{ProximitySearch, SearchError},
};

use crate::config::ClientConfig;

const DISTANCE_PATH: &str = "/trash/distance";
const UNKNOWN_ERROR: &str = "Unknown Error";

/// Response from /trash/distance
#[derive(Debug, Deserialize)]
struct TrashInDistanceResponse {
    status: i64,
    trash: Option<Vec<TrashInDistance>>,
    error: Option<Vec<Option<String>>>,
}

/// Single disposal point from /trash/distance
#[derive(Debug, Deserialize)]
struct TrashInDistance {
    uuid: String,
    geolocation: Geolocation,
    tag: String,
}

/// `[longitude, latitude, ..]`, validated on decode. Extra values such as altitude are ignored.
#[derive(Debug, Deserialize)]
#[serde(try_from = "Vec<f64>")]
struct Geolocation(Coordinate);

impl TryFrom<Vec<f64>> for Geolocation {
    type Error = String;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        let [longitude, latitude, ..] = values.as_slice() else {
            return Err(format!(
                "geolocation needs longitude and latitude, got {} values",
                values.len()
            ));
        };
        Coordinate::new(*latitude, *longitude)
            .map(Self)
            .map_err(|err: InvalidCoordinate| err.to_string())
    }
}

impl From<TrashInDistance> for DisposalPoint {
    fn from(entry: TrashInDistance) -> Self {
        Self {
            id: PointId(entry.uuid),
            location: entry.geolocation.0,
            category: entry.tag,
        }
    }
}

/// HTTP implementation of [`ProximitySearch`].
pub struct ProximitySearchClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl ProximitySearchClient {
    /// Create a search client bound to the given HTTP client.
    #[must_use]
    pub fn new(client: Client, config: &ClientConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.timeout,
        }
    }

    /// Build the outbound request for `query`.
    ///
    /// Coordinates are written with six decimals. An empty token is still sent as `Bearer `.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Transport`] when the base URL does not form a valid URL.
    pub fn build_request(&self, query: &SearchQuery, token: &str) -> Result<Request, SearchError> {
        let origin = query.origin();
        let mut params = vec![
            ("latitude", format!("{:.6}", origin.latitude())),
            ("longitude", format!("{:.6}", origin.longitude())),
        ];
        if let Some(min) = query.min_distance_m() {
            params.push(("minDistance", min.to_string()));
        }
        if let Some(max) = query.max_distance_m() {
            params.push(("maxDistance", max.to_string()));
        }

        let request = self
            .client
            .get(format!("{}{DISTANCE_PATH}", self.base_url))
            .query(&params)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .timeout(self.timeout)
            .build()?;

        Ok(request)
    }
}

#[async_trait]
impl ProximitySearch for ProximitySearchClient {
    async fn fetch(
        &self,
        query: &SearchQuery,
        token: &str,
    ) -> Result<Vec<DisposalPoint>, SearchError> {
        let request = self.build_request(query, token)?;
        debug!(url = %request.url(), "Fetching disposal points");

        let body = self
            .client
            .execute(request)
            .await
            .inspect_err(|err| warn!(error = %err, "Distance request failed"))?
            .bytes()
            .await?;

        decode_response(&body)
    }
}

/// Decode a /trash/distance body.
///
/// `trash` decides the outcome. The `status` field and the HTTP status are not consulted.
///
/// # Errors
///
/// Returns [`SearchError::Decode`] for bodies of the wrong shape and
/// [`SearchError::Remote`] when `trash` is absent.
pub fn decode_response(body: &[u8]) -> Result<Vec<DisposalPoint>, SearchError> {
    let response: TrashInDistanceResponse = serde_json::from_slice(body)?;

    match response.trash {
        Some(trash) => {
            debug!(status = response.status, count = trash.len(), "Decoded disposal points");
            Ok(trash.into_iter().map(DisposalPoint::from).collect())
        }
        None => {
            let message = response
                .error
                .and_then(|errors| errors.into_iter().next().flatten())
                .unwrap_or_else(|| UNKNOWN_ERROR.to_owned());
            debug!(status = response.status, %message, "Server reported no disposal points");
            Err(SearchError::Remote(message))
        }
    }
}
