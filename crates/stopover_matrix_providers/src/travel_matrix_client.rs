use tracing::debug;

use crate::{
    as_the_crow_flies::as_the_crow_flies_matrices,
    cache::{FileCache, MatricesCache},
    mapbox_api::{MapboxClient, MapboxClientParams},
    travel_matrices::TravelMatrices,
    travel_matrix_provider::TravelMatrixProvider,
};

pub struct TravelMatrixClient<C> {
    mapbox_client: MapboxClient,
    cache: C,
}

impl TravelMatrixClient<FileCache> {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self::new(
            MapboxClientParams::from_env()?,
            FileCache::default(),
        ))
    }
}

impl<C> TravelMatrixClient<C>
where
    C: MatricesCache,
{
    pub fn new(params: MapboxClientParams, cache: C) -> Self {
        Self {
            mapbox_client: MapboxClient::new(params),
            cache,
        }
    }

    pub async fn fetch_matrix<P>(
        &self,
        points: &[P],
        provider: &TravelMatrixProvider,
    ) -> anyhow::Result<TravelMatrices>
    where
        for<'a> &'a P: Into<geo_types::Point>,
    {
        match self.cache.get_cached(provider, points) {
            Ok(Some(matrices)) => return Ok(matrices),
            Ok(None) => {}
            Err(err) => debug!("Matrix cache lookup failed: {err}"),
        }

        let matrices = match provider {
            TravelMatrixProvider::MapboxApi { profile } => {
                self.mapbox_client.fetch_matrix(points, *profile).await?
            }
            TravelMatrixProvider::AsTheCrowFlies { speed_kmh } => {
                as_the_crow_flies_matrices(points, *speed_kmh)
            }
            TravelMatrixProvider::Custom { matrices } => matrices.clone(),
        };

        if let Err(err) = self.cache.cache(provider, points, &matrices) {
            debug!("Matrix cache write failed: {err}");
        }

        Ok(matrices)
    }
}
