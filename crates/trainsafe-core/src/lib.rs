pub mod model;

pub use model::{CoreError, Position, SpeedKmh, TrackId, TrainId, MAX_TRACK};
