use trainsafe_core::Position;
use thiserror::Error;

pub const MEAN_EARTH_RADIUS_KM: f64 = 6_371.0088;

const EPSILON: f64 = 1e-12;

#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    #[error("step must be finite, got {step_km}")]
    NonFiniteStep { step_km: f64 },

    #[error("bearing must be finite, got {bearing_deg}")]
    NonFiniteBearing { bearing_deg: f64 },

    #[error("distance must be finite and >= 0.0, got {distance_km}")]
    InvalidDistance { distance_km: f64 },

    #[error(transparent)]
    Core(#[from] trainsafe_core::CoreError),
}

pub fn haversine_distance_km(from: &Position, to: &Position) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lon1 = from.longitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let lon2 = to.longitude().to_radians();

    MEAN_EARTH_RADIUS_KM * haversine_central_angle(lat1, lon1, lat2, lon2)
}

pub fn initial_bearing_degrees(from: &Position, to: &Position) -> f64 {
    let lat1 = from.latitude().to_radians();
    let lon1 = from.longitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let lon2 = to.longitude().to_radians();

    let delta_lon = lon2 - lon1;
    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    let bearing = y.atan2(x).to_degrees();
    normalize_bearing_degrees(bearing)
}

/// Destination reached by travelling `distance_km` from `from` along the
/// great circle with initial bearing `bearing_deg`.
pub fn destination_point(
    from: &Position,
    bearing_deg: f64,
    distance_km: f64,
) -> Result<Position, GeoError> {
    if !bearing_deg.is_finite() {
        return Err(GeoError::NonFiniteBearing { bearing_deg });
    }
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(GeoError::InvalidDistance { distance_km });
    }

    let lat1 = from.latitude().to_radians();
    let lon1 = from.longitude().to_radians();
    let bearing = bearing_deg.to_radians();
    let angular = distance_km / MEAN_EARTH_RADIUS_KM;

    let sin_lat2 =
        (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos()).clamp(-1.0, 1.0);
    let lat2 = sin_lat2.asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos())
            .atan2(angular.cos() - lat1.sin() * sin_lat2);

    Ok(Position::new(
        lat2.to_degrees(),
        normalize_longitude_degrees(lon2.to_degrees()),
    )?)
}

/// Advance `from` towards `to` by `step_km`.
///
/// The step interpolates linearly in latitude/longitude, not along the
/// great circle; separation is still measured great-circle. Valid for the
/// short per-tick steps this simulation takes. A step covering at least
/// the remaining separation snaps exactly onto `to`; a zero or negative
/// step leaves `from` unchanged.
pub fn move_toward(from: &Position, to: &Position, step_km: f64) -> Result<Position, GeoError> {
    if !step_km.is_finite() {
        return Err(GeoError::NonFiniteStep { step_km });
    }

    let separation_km = haversine_distance_km(from, to);
    if separation_km <= EPSILON || step_km <= 0.0 {
        return Ok(*from);
    }
    if step_km >= separation_km {
        return Ok(*to);
    }

    let fraction = step_km / separation_km;
    let latitude = from.latitude() + (to.latitude() - from.latitude()) * fraction;
    let longitude = normalize_longitude_degrees(
        from.longitude() + shortest_longitude_delta(from.longitude(), to.longitude()) * fraction,
    );

    Ok(Position::new(latitude, longitude)?)
}

fn haversine_central_angle(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let delta_lat = lat2 - lat1;
    let delta_lon = lon2 - lon1;

    let haversine = ((delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    2.0 * haversine.sqrt().asin()
}

fn shortest_longitude_delta(from: f64, to: f64) -> f64 {
    let mut delta = to - from;
    while delta > 180.0 {
        delta -= 360.0;
    }
    while delta < -180.0 {
        delta += 360.0;
    }
    delta
}

fn normalize_longitude_degrees(value: f64) -> f64 {
    let mut normalized = (value + 180.0).rem_euclid(360.0) - 180.0;
    if (normalized + 180.0).abs() <= EPSILON {
        normalized = 180.0;
    }
    normalized
}

fn normalize_bearing_degrees(value: f64) -> f64 {
    value.rem_euclid(360.0)
}
