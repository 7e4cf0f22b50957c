use std::future::Future;

use crate::mapbox_api::MapboxClient;

/// Resolves a free-text place name to a point. Consumers treat `Ok(None)` as
/// "name not found" and decide for themselves whether that is fatal.
pub trait Geocoder {
    fn resolve(
        &self,
        name: &str,
    ) -> impl Future<Output = anyhow::Result<Option<geo_types::Point>>> + Send;
}

impl Geocoder for MapboxClient {
    async fn resolve(&self, name: &str) -> anyhow::Result<Option<geo_types::Point>> {
        Ok(self.geocode(name).await?)
    }
}
