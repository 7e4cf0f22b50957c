use stopover_matrix_providers::mapbox_api::MapboxProfile;

pub fn parse_profile(value: &str) -> Result<MapboxProfile, String> {
    match value {
        "driving" => Ok(MapboxProfile::Driving),
        "walking" => Ok(MapboxProfile::Walking),
        "cycling" => Ok(MapboxProfile::Cycling),
        "driving-traffic" => Ok(MapboxProfile::DrivingTraffic),
        other => Err(format!(
            "unknown profile '{other}' (expected driving, walking, cycling or driving-traffic)"
        )),
    }
}
