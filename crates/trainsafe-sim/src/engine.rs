use thiserror::Error;
use trainsafe_geo::{move_toward, GeoError};

use crate::conflict::{scan_conflicts, STOP_THRESHOLD_KM};
use crate::report::{ConflictAlert, TickReport, TrainRow};
use crate::scenario::{Scenario, ScenarioError};
use crate::train::Train;

/// Upper bound of the simulation speed multiplier, matching the 1..=10
/// range the demo exposed.
pub const MAX_SPEED_MULTIPLIER: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Simulated wall-clock seconds covered by one tick before the
    /// multiplier is applied.
    pub step_seconds: f64,
    /// Visual speed-up factor; scales the distance covered per tick.
    pub speed_multiplier: u32,
    pub stop_threshold_km: f64,
    /// `Some(n)` bounds the session at n ticks; `None` runs until the
    /// caller stops driving `advance`.
    pub max_ticks: Option<u64>,
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), EngineError> {
        if !self.step_seconds.is_finite() || self.step_seconds <= 0.0 {
            return Err(EngineError::InvalidStepSeconds {
                step_seconds: self.step_seconds,
            });
        }
        if self.speed_multiplier == 0 || self.speed_multiplier > MAX_SPEED_MULTIPLIER {
            return Err(EngineError::SpeedMultiplierOutOfRange {
                multiplier: self.speed_multiplier,
            });
        }
        if !self.stop_threshold_km.is_finite() || self.stop_threshold_km <= 0.0 {
            return Err(EngineError::InvalidStopThreshold {
                threshold_km: self.stop_threshold_km,
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            step_seconds: 1.0,
            speed_multiplier: 3,
            stop_threshold_km: STOP_THRESHOLD_KM,
            max_ticks: Some(200),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("step_seconds must be finite and > 0.0, got {step_seconds}")]
    InvalidStepSeconds { step_seconds: f64 },

    #[error("speed_multiplier must be in [1, {MAX_SPEED_MULTIPLIER}], got {multiplier}")]
    SpeedMultiplierOutOfRange { multiplier: u32 },

    #[error("stop_threshold_km must be finite and > 0.0, got {threshold_km}")]
    InvalidStopThreshold { threshold_km: f64 },

    #[error("engine requires at least one train")]
    EmptyFleet,

    #[error("run() needs max_ticks set; drive an unbounded session with advance()")]
    UnboundedRun,

    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

/// Deterministic fleet stepper.
///
/// Each `advance` applies one tick: clear every hold, scan same-track
/// pairs, flag yielders, then move whatever is still cleared. The fleet
/// built at construction is retained so `reset` restores the session to
/// its exact starting state, including re-arming the one-shot alert
/// latch.
#[derive(Debug, Clone, PartialEq)]
pub struct Engine {
    config: EngineConfig,
    trains: Vec<Train>,
    initial: Vec<Train>,
    tick: u64,
    sim_elapsed_seconds: f64,
    alert_emitted: bool,
}

impl Engine {
    pub fn new(fleet: Vec<Train>, config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        if fleet.is_empty() {
            return Err(EngineError::EmptyFleet);
        }

        Ok(Self {
            config,
            initial: fleet.clone(),
            trains: fleet,
            tick: 0,
            sim_elapsed_seconds: 0.0,
            alert_emitted: false,
        })
    }

    pub fn from_scenario(scenario: &Scenario, config: EngineConfig) -> Result<Self, EngineError> {
        Self::new(scenario.build_fleet()?, config)
    }

    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[must_use]
    pub fn sim_elapsed_seconds(&self) -> f64 {
        self.sim_elapsed_seconds
    }

    #[must_use]
    pub fn alert_emitted(&self) -> bool {
        self.alert_emitted
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.config
            .max_ticks
            .is_some_and(|max_ticks| self.tick >= max_ticks)
    }

    /// Apply one tick and report the resulting fleet state.
    pub fn advance(&mut self) -> Result<TickReport, EngineError> {
        self.tick = self.tick.saturating_add(1);
        let step_hours =
            self.config.step_seconds / 3600.0 * f64::from(self.config.speed_multiplier);
        self.sim_elapsed_seconds += step_hours * 3600.0;

        for train in &mut self.trains {
            train.clear_stopped();
        }

        let conflicts = scan_conflicts(&mut self.trains, self.config.stop_threshold_km);
        let alert = if !conflicts.is_empty() && !self.alert_emitted {
            self.alert_emitted = true;
            Some(ConflictAlert::from_conflict(&conflicts[0]))
        } else {
            None
        };

        for train in &mut self.trains {
            train.refresh_distance();
            if train.is_stopped() {
                continue;
            }
            let step_km = train.speed().value() * step_hours;
            let next = move_toward(&train.position(), &train.target(), step_km)?;
            train.set_position(next);
            train.refresh_distance();
        }

        Ok(TickReport {
            tick: self.tick,
            sim_elapsed_seconds: self.sim_elapsed_seconds,
            trains: self.trains.iter().map(TrainRow::from_train).collect(),
            conflicts,
            alert,
        })
    }

    /// Restore the session to its initial fleet, tick zero, and an
    /// unarmed alert latch.
    pub fn reset(&mut self) {
        self.trains = self.initial.clone();
        self.tick = 0;
        self.sim_elapsed_seconds = 0.0;
        self.alert_emitted = false;
    }

    /// Drive the session to its configured tick bound and collect every
    /// report. Unbounded configs must use `advance` directly.
    pub fn run(&mut self) -> Result<Vec<TickReport>, EngineError> {
        if self.config.max_ticks.is_none() {
            return Err(EngineError::UnboundedRun);
        }

        let mut reports = Vec::new();
        while !self.is_exhausted() {
            reports.push(self.advance()?);
        }
        Ok(reports)
    }
}
