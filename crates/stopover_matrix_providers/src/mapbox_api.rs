use std::fmt::Display;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::travel_matrices::TravelMatrices;

/// `[longitude, latitude]`, the order Mapbox expects.
pub type MapboxPoint = [f64; 2];

/// The Matrix API rejects requests with more coordinates than this.
pub const MAPBOX_MAX_COORDINATES: usize = 25;

#[derive(Deserialize, Serialize, JsonSchema, Copy, Clone, Hash, Debug, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MapboxProfile {
    Driving,
    Walking,
    Cycling,
    DrivingTraffic,
}

impl Display for MapboxProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                MapboxProfile::Driving => "driving",
                MapboxProfile::Walking => "walking",
                MapboxProfile::Cycling => "cycling",
                MapboxProfile::DrivingTraffic => "driving-traffic",
            }
        )
    }
}

#[derive(Debug, Error)]
pub enum MapboxError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Matrix request rejected with code: {0}")]
    MatrixCode(String),

    #[error("Too many coordinates: {0} (the Matrix API allows at most {MAPBOX_MAX_COORDINATES})")]
    TooManyCoordinates(usize),

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

#[derive(Deserialize)]
struct MatrixResponse {
    code: String,

    /// Travel times in seconds, `null` for unmeasured pairs
    durations: Option<Vec<Vec<Option<f64>>>>,

    /// Distances in meters, `null` for unmeasured pairs
    distances: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Deserialize)]
struct GeocodingResponse {
    features: Vec<GeocodingFeature>,
}

#[derive(Deserialize)]
struct GeocodingFeature {
    /// `[longitude, latitude]`
    center: MapboxPoint,
}

pub struct MapboxClientParams {
    pub access_token: String,
}

impl MapboxClientParams {
    pub fn from_env() -> anyhow::Result<Self> {
        let access_token = std::env::var("MAPBOX_ACCESS_TOKEN")
            .map_err(|_| anyhow::anyhow!("MAPBOX_ACCESS_TOKEN is not set"))?;

        Ok(Self { access_token })
    }
}

pub const MAPBOX_MATRIX_API_URL: &str = "https://api.mapbox.com/directions-matrix/v1/mapbox";
pub const MAPBOX_GEOCODING_API_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

pub struct MapboxClient {
    params: MapboxClientParams,
    client: reqwest::Client,
}

impl MapboxClient {
    pub fn new(params: MapboxClientParams) -> Self {
        Self {
            params,
            client: reqwest::Client::new(),
        }
    }

    /// Resolve a free-text place name to a point, `None` when Mapbox has no
    /// feature for it.
    pub async fn geocode(&self, name: &str) -> Result<Option<geo_types::Point>, MapboxError> {
        let url = format!("{}/{}.json", MAPBOX_GEOCODING_API_URL, name);
        let response = self
            .client
            .get(url)
            .query(&[
                ("access_token", self.params.access_token.as_str()),
                ("limit", "1"),
                ("types", "place,address"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(MapboxError::Api { status, message });
        }

        let geocoding: GeocodingResponse = response.json().await?;

        Ok(geocoding
            .features
            .first()
            .map(|feature| geo_types::Point::new(feature.center[0], feature.center[1])))
    }

    /// Fetch the full duration/distance matrix over `points` in one call.
    pub async fn fetch_matrix<P>(
        &self,
        points: &[P],
        profile: MapboxProfile,
    ) -> Result<TravelMatrices, MapboxError>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        if points.len() > MAPBOX_MAX_COORDINATES {
            return Err(MapboxError::TooManyCoordinates(points.len()));
        }

        let coordinates = points
            .iter()
            .map(|p| {
                let point: geo_types::Point = p.into();
                format!("{},{}", point.x(), point.y())
            })
            .collect::<Vec<_>>()
            .join(";");

        let url = format!("{}/{}/{}", MAPBOX_MATRIX_API_URL, profile, coordinates);

        debug!("MapboxApi: requesting matrix for {} points", points.len());

        let response = self
            .client
            .get(url)
            .query(&[
                ("access_token", self.params.access_token.as_str()),
                ("annotations", "duration,distance"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(MapboxError::Api { status, message });
        }

        let matrix: MatrixResponse = response.json().await?;

        if matrix.code != "Ok" {
            return Err(MapboxError::MatrixCode(matrix.code));
        }

        let durations = matrix
            .durations
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();
        let distances = matrix
            .distances
            .unwrap_or_default()
            .into_iter()
            .flatten()
            .collect();

        Ok(TravelMatrices {
            durations,
            distances,
        })
    }
}
