use thiserror::Error;

pub mod prelude {
    pub use trainsafe_config::{
        load_fleet, parse_fleet, ConfigError, LogFormat, LogLevel, LoggingConfig, TrainsafeConfig,
    };
    pub use trainsafe_core::{CoreError, Position, SpeedKmh, TrackId, TrainId, MAX_TRACK};
    pub use trainsafe_geo::{
        destination_point, haversine_distance_km, initial_bearing_degrees, move_toward, GeoError,
        MEAN_EARTH_RADIUS_KM,
    };
    pub use trainsafe_sim::{
        simulate, Conflict, ConflictAlert, Engine, EngineConfig, EngineError, Scenario,
        ScenarioError, TickReport, Train, TrainRow, TrainSpec, TrainStatus, STOP_THRESHOLD_KM,
    };
}

pub type Result<T> = std::result::Result<T, TrainsafeError>;

#[derive(Debug, Error)]
pub enum TrainsafeError {
    #[error(transparent)]
    Core(#[from] trainsafe_core::CoreError),
    #[error(transparent)]
    Geo(#[from] trainsafe_geo::GeoError),
    #[error(transparent)]
    Scenario(#[from] trainsafe_sim::ScenarioError),
    #[error(transparent)]
    Engine(#[from] trainsafe_sim::EngineError),
    #[error(transparent)]
    Config(#[from] trainsafe_config::ConfigError),
}
