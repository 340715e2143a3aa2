use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use trainsafe_core::{Position, SpeedKmh, TrackId, TrainId};
use trainsafe_sim::{Scenario, TrainSpec};

use crate::ConfigError;

/// Fleet file shape: a JSON object keyed by train name.
pub(crate) type FleetDocument = BTreeMap<String, TrainDocument>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TrainDocument {
    /// Defaults to the map key; when present it must match it.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub route: String,
    pub lat: f64,
    pub lon: f64,
    pub speed: f64,
    pub track: u8,
    #[serde(default)]
    pub target: Option<TargetDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct TargetDocument {
    pub lat: f64,
    pub lon: f64,
}

impl TrainDocument {
    fn into_spec(self, key: &str) -> Result<TrainSpec, ConfigError> {
        let name = match self.name {
            Some(name) if name != key => {
                return Err(ConfigError::FleetKeyNameMismatch {
                    key: key.to_string(),
                    name,
                });
            }
            Some(name) => name,
            None => key.to_string(),
        };

        let target = self
            .target
            .map(|target| Position::new(target.lat, target.lon))
            .transpose()?;

        Ok(TrainSpec {
            id: TrainId::new(name)?,
            route: self.route,
            position: Position::new(self.lat, self.lon)?,
            speed: SpeedKmh::new(self.speed)?,
            track: TrackId::new(self.track)?,
            target,
        })
    }
}

/// Parse a fleet JSON document into a validated scenario.
pub fn parse_fleet(json: &str, name: impl Into<String>) -> Result<Scenario, ConfigError> {
    let document: FleetDocument =
        serde_json::from_str(json).map_err(|source| ConfigError::Json { source })?;

    let mut specs = Vec::with_capacity(document.len());
    for (key, train) in document {
        specs.push(train.into_spec(&key)?);
    }

    let scenario = Scenario::new(name, specs);
    scenario.validate()?;
    Ok(scenario)
}

/// Read a fleet file; the scenario takes its name from the file stem.
pub fn load_fleet(path: &Path) -> Result<Scenario, ConfigError> {
    let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let name = path
        .file_stem()
        .map_or_else(|| "fleet".to_string(), |stem| stem.to_string_lossy().into_owned());
    parse_fleet(&json, name)
}

#[cfg(test)]
mod tests {
    use trainsafe_core::Position;
    use trainsafe_sim::ScenarioError;

    use crate::fleet::parse_fleet;
    use crate::ConfigError;

    const FLEET_JSON: &str = r#"{
        "Rajdhani Express": {
            "name": "Rajdhani Express",
            "route": "New Delhi - Mumbai Central",
            "lat": 28.6139,
            "lon": 77.209,
            "speed": 130,
            "track": 1,
            "target": { "lat": 19.076, "lon": 72.8777 }
        },
        "Shatabdi Express": {
            "route": "New Delhi - Bhopal",
            "lat": 28.62,
            "lon": 77.21,
            "speed": 150,
            "track": 1
        }
    }"#;

    #[test]
    fn parses_a_keyed_fleet_document() {
        let scenario = parse_fleet(FLEET_JSON, "demo").expect("fleet should parse");

        assert_eq!(scenario.name, "demo");
        assert_eq!(scenario.trains.len(), 2);

        let rajdhani = &scenario.trains[0];
        assert_eq!(rajdhani.id.as_str(), "Rajdhani Express");
        assert_eq!(rajdhani.route, "New Delhi - Mumbai Central");
        assert_eq!(
            rajdhani.target,
            Some(Position::new(19.076, 72.8777).expect("target"))
        );

        // Name falls back to the map key; the missing target stays open
        // for the scenario's default-offset rule.
        let shatabdi = &scenario.trains[1];
        assert_eq!(shatabdi.id.as_str(), "Shatabdi Express");
        assert_eq!(shatabdi.target, None);
    }

    #[test]
    fn missing_target_is_filled_at_fleet_build() {
        let scenario = parse_fleet(FLEET_JSON, "demo").expect("fleet should parse");
        let fleet = scenario.build_fleet().expect("fleet builds");

        let shatabdi = fleet
            .iter()
            .find(|train| train.id().as_str() == "Shatabdi Express")
            .expect("train");
        assert!((shatabdi.target().latitude() - (28.62 + 0.3)).abs() < 1e-9);
        assert!((shatabdi.target().longitude() - (77.21 + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn mismatching_name_and_key_is_rejected() {
        let json = r#"{ "A": { "name": "B", "lat": 0.0, "lon": 0.0, "speed": 10, "track": 1 } }"#;
        let error = parse_fleet(json, "demo").expect_err("mismatch must fail");
        assert!(matches!(error, ConfigError::FleetKeyNameMismatch { .. }));
    }

    #[test]
    fn invalid_track_is_rejected_through_core_validation() {
        let json = r#"{ "A": { "lat": 0.0, "lon": 0.0, "speed": 10, "track": 9 } }"#;
        let error = parse_fleet(json, "demo").expect_err("track must fail");
        assert!(matches!(error, ConfigError::Core(_)));
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let json = r#"{ "A": { "lat": 0.0, "lon": 0.0, "speed": 10, "track": 1, "colour": "red" } }"#;
        let error = parse_fleet(json, "demo").expect_err("unknown field must fail");
        assert!(matches!(error, ConfigError::Json { .. }));
    }

    #[test]
    fn empty_fleet_is_rejected_by_scenario_validation() {
        let error = parse_fleet("{}", "demo").expect_err("empty fleet must fail");
        assert!(matches!(
            error,
            ConfigError::Scenario(ScenarioError::NoTrains)
        ));
    }
}
