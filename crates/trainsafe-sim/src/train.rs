use std::fmt;

use trainsafe_core::{Position, SpeedKmh, TrackId, TrainId};
use trainsafe_geo::{haversine_distance_km, initial_bearing_degrees};

/// Speed at or below which a moving train reports as crawling.
pub const SLOW_ZONE_KMH: f64 = 5.0;

/// A train in the active fleet.
///
/// `stopped` is a per-tick verdict, not persisted intent: the engine clears
/// it at the start of every tick and re-derives it from the conflict scan.
/// The `speed` datum survives a hold; only the reported effective speed
/// drops to zero while the train is held.
#[derive(Debug, Clone, PartialEq)]
pub struct Train {
    id: TrainId,
    route: String,
    position: Position,
    target: Position,
    speed: SpeedKmh,
    track: TrackId,
    stopped: bool,
    distance_to_target_km: f64,
}

impl Train {
    #[must_use]
    pub fn new(
        id: TrainId,
        route: impl Into<String>,
        position: Position,
        target: Position,
        speed: SpeedKmh,
        track: TrackId,
    ) -> Self {
        let distance_to_target_km = haversine_distance_km(&position, &target);
        Self {
            id,
            route: route.into(),
            position,
            target,
            speed,
            track,
            stopped: false,
            distance_to_target_km,
        }
    }

    #[must_use]
    pub fn id(&self) -> &TrainId {
        &self.id
    }

    #[must_use]
    pub fn route(&self) -> &str {
        &self.route
    }

    #[must_use]
    pub fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub fn target(&self) -> Position {
        self.target
    }

    #[must_use]
    pub fn speed(&self) -> SpeedKmh {
        self.speed
    }

    #[must_use]
    pub fn track(&self) -> TrackId {
        self.track
    }

    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    #[must_use]
    pub fn distance_to_target_km(&self) -> f64 {
        self.distance_to_target_km
    }

    /// Speed as reported to displays: zero while held, the data value
    /// otherwise.
    #[must_use]
    pub fn effective_speed_kmh(&self) -> f64 {
        if self.stopped {
            0.0
        } else {
            self.speed.value()
        }
    }

    #[must_use]
    pub fn status(&self) -> TrainStatus {
        if self.stopped || self.speed.is_zero() {
            TrainStatus::Held
        } else if self.speed.value() <= SLOW_ZONE_KMH {
            TrainStatus::SlowZone
        } else {
            TrainStatus::Running
        }
    }

    /// Forward azimuth towards the target; `None` once the train has
    /// arrived.
    #[must_use]
    pub fn heading_degrees(&self) -> Option<f64> {
        if self.distance_to_target_km > 0.0 {
            Some(initial_bearing_degrees(&self.position, &self.target))
        } else {
            None
        }
    }

    /// Minutes until the target at the effective speed; `None` while held
    /// or when the train is not moving.
    #[must_use]
    pub fn eta_minutes(&self) -> Option<f64> {
        let speed = self.effective_speed_kmh();
        if speed > 0.0 {
            Some(self.distance_to_target_km / speed * 60.0)
        } else {
            None
        }
    }

    pub(crate) fn clear_stopped(&mut self) {
        self.stopped = false;
    }

    pub(crate) fn mark_stopped(&mut self) {
        self.stopped = true;
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn refresh_distance(&mut self) {
        self.distance_to_target_km = haversine_distance_km(&self.position, &self.target);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainStatus {
    /// Held by a conflict or not moving at all.
    Held,
    /// Moving at walking pace, typically inside a signal zone.
    SlowZone,
    Running,
}

impl fmt::Display for TrainStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Held => write!(f, "stopped - waiting for clearance"),
            Self::SlowZone => write!(f, "slow / signal zone"),
            Self::Running => write!(f, "running"),
        }
    }
}
