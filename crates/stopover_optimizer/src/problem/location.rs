use crate::define_index_newtype;

define_index_newtype!(LocationIdx, Location);

/// A named place with resolved coordinates. Immutable once built; locations
/// are distinct by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    name: String,
    point: geo::Point,
}

impl Location {
    pub fn new(name: impl Into<String>, lon: f64, lat: f64) -> Self {
        Self {
            name: name.into(),
            point: geo::Point::new(lon, lat),
        }
    }

    pub fn from_point(name: impl Into<String>, point: geo::Point) -> Self {
        Self {
            name: name.into(),
            point,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn lon(&self) -> f64 {
        self.point.x()
    }

    pub fn lat(&self) -> f64 {
        self.point.y()
    }
}

impl From<&Location> for geo::Point<f64> {
    fn from(location: &Location) -> Self {
        location.point
    }
}
