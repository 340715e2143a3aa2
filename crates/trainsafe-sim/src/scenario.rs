use std::collections::BTreeSet;

use thiserror::Error;
use trainsafe_core::{CoreError, Position, SpeedKmh, TrackId, TrainId};

use crate::train::Train;

/// Offsets applied to a train's start position when its spec carries no
/// explicit target, so every train has somewhere to go.
pub const DEFAULT_TARGET_LAT_OFFSET: f64 = 0.3;
pub const DEFAULT_TARGET_LON_OFFSET: f64 = 0.2;

/// One train as declared by a fleet document, before engine state exists.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainSpec {
    pub id: TrainId,
    pub route: String,
    pub position: Position,
    pub speed: SpeedKmh,
    pub track: TrackId,
    pub target: Option<Position>,
}

/// A named initial fleet. The engine keeps the fleet built from this so a
/// reset restores the declared starting positions exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: String,
    pub trains: Vec<TrainSpec>,
}

impl Scenario {
    #[must_use]
    pub fn new(name: impl Into<String>, trains: Vec<TrainSpec>) -> Self {
        Self {
            name: name.into(),
            trains,
        }
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.trim().is_empty() {
            return Err(ScenarioError::EmptyName);
        }
        if self.trains.is_empty() {
            return Err(ScenarioError::NoTrains);
        }

        let mut seen = BTreeSet::new();
        for spec in &self.trains {
            if !seen.insert(spec.id.clone()) {
                return Err(ScenarioError::DuplicateTrainId {
                    id: spec.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate and materialize the fleet, filling in default targets.
    pub fn build_fleet(&self) -> Result<Vec<Train>, ScenarioError> {
        self.validate()?;

        let mut fleet = Vec::with_capacity(self.trains.len());
        for spec in &self.trains {
            let target = match spec.target {
                Some(target) => target,
                None => default_target(&spec.position)?,
            };
            fleet.push(Train::new(
                spec.id.clone(),
                spec.route.clone(),
                spec.position,
                target,
                spec.speed,
                spec.track,
            ));
        }
        Ok(fleet)
    }
}

fn default_target(position: &Position) -> Result<Position, ScenarioError> {
    let latitude = (position.latitude() + DEFAULT_TARGET_LAT_OFFSET).min(90.0);
    let mut longitude = position.longitude() + DEFAULT_TARGET_LON_OFFSET;
    if longitude > 180.0 {
        longitude -= 360.0;
    }
    Ok(Position::new(latitude, longitude)?)
}

#[derive(Debug, Error, PartialEq)]
pub enum ScenarioError {
    #[error("scenario name must not be empty")]
    EmptyName,

    #[error("scenario must declare at least one train")]
    NoTrains,

    #[error("duplicate train id `{id}` in scenario")]
    DuplicateTrainId { id: TrainId },

    #[error(transparent)]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use trainsafe_core::{Position, SpeedKmh, TrackId, TrainId};

    use crate::scenario::{
        Scenario, ScenarioError, TrainSpec, DEFAULT_TARGET_LAT_OFFSET, DEFAULT_TARGET_LON_OFFSET,
    };

    fn spec(id: &str, lat: f64, lon: f64, target: Option<(f64, f64)>) -> TrainSpec {
        TrainSpec {
            id: TrainId::new(id).expect("id"),
            route: format!("{id} route"),
            position: Position::new(lat, lon).expect("position"),
            speed: SpeedKmh::new(110.0).expect("speed"),
            track: TrackId::new(1).expect("track"),
            target: target.map(|(lat, lon)| Position::new(lat, lon).expect("target")),
        }
    }

    #[test]
    fn validate_rejects_empty_name_and_empty_fleet() {
        let empty_name = Scenario::new("", vec![spec("a", 20.0, 77.0, None)]);
        assert_eq!(empty_name.validate(), Err(ScenarioError::EmptyName));

        let no_trains = Scenario::new("western corridor", vec![]);
        assert_eq!(no_trains.validate(), Err(ScenarioError::NoTrains));
    }

    #[test]
    fn validate_rejects_duplicate_train_ids() {
        let scenario = Scenario::new(
            "western corridor",
            vec![spec("12951", 20.0, 77.0, None), spec("12951", 21.0, 78.0, None)],
        );

        let error = scenario.validate().expect_err("duplicate must fail");
        assert_eq!(
            error,
            ScenarioError::DuplicateTrainId {
                id: TrainId::new("12951").expect("id"),
            }
        );
    }

    #[test]
    fn build_fleet_fills_in_offset_target_when_missing() {
        let scenario = Scenario::new("demo", vec![spec("a", 20.0, 77.0, None)]);

        let fleet = scenario.build_fleet().expect("fleet");
        let target = fleet[0].target();
        assert_eq!(target.latitude(), 20.0 + DEFAULT_TARGET_LAT_OFFSET);
        assert_eq!(target.longitude(), 77.0 + DEFAULT_TARGET_LON_OFFSET);
    }

    #[test]
    fn build_fleet_keeps_explicit_target() {
        let scenario = Scenario::new("demo", vec![spec("a", 20.0, 77.0, Some((25.0, 80.0)))]);

        let fleet = scenario.build_fleet().expect("fleet");
        assert_eq!(fleet[0].target(), Position::new(25.0, 80.0).expect("target"));
    }

    #[test]
    fn default_target_near_the_pole_clamps_latitude() {
        let scenario = Scenario::new("demo", vec![spec("a", 89.9, 10.0, None)]);

        let fleet = scenario.build_fleet().expect("fleet");
        assert_eq!(fleet[0].target().latitude(), 90.0);
    }

    #[test]
    fn default_target_wraps_longitude_across_the_antimeridian() {
        let scenario = Scenario::new("demo", vec![spec("a", 0.0, 179.9, None)]);

        let fleet = scenario.build_fleet().expect("fleet");
        let longitude = fleet[0].target().longitude();
        assert!((longitude - (179.9 + DEFAULT_TARGET_LON_OFFSET - 360.0)).abs() < 1e-9);
    }
}
