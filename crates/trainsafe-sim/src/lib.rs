pub mod conflict;
pub mod engine;
pub mod report;
pub mod scenario;
pub mod train;

pub use conflict::{decide_yield, scan_conflicts, Conflict, STOP_THRESHOLD_KM};
pub use engine::{Engine, EngineConfig, EngineError, MAX_SPEED_MULTIPLIER};
pub use report::{ConflictAlert, TickReport, TrainRow};
pub use scenario::{
    Scenario, ScenarioError, TrainSpec, DEFAULT_TARGET_LAT_OFFSET, DEFAULT_TARGET_LON_OFFSET,
};
pub use train::{Train, TrainStatus, SLOW_ZONE_KMH};

/// Build an engine from a scenario and drive it to its tick bound.
pub fn simulate(scenario: &Scenario, config: EngineConfig) -> Result<Vec<TickReport>, EngineError> {
    Engine::from_scenario(scenario, config)?.run()
}
