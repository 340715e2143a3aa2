use std::fmt;

use trainsafe_core::{Position, TrackId, TrainId};

use crate::conflict::Conflict;
use crate::train::{Train, TrainStatus};

/// One train's row in a tick report, as a sidebar would show it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainRow {
    pub id: TrainId,
    pub route: String,
    pub position: Position,
    pub track: TrackId,
    pub status: TrainStatus,
    pub effective_speed_kmh: f64,
    pub distance_to_target_km: f64,
    pub eta_minutes: Option<f64>,
    pub heading_degrees: Option<f64>,
}

impl TrainRow {
    pub(crate) fn from_train(train: &Train) -> Self {
        Self {
            id: train.id().clone(),
            route: train.route().to_string(),
            position: train.position(),
            track: train.track(),
            status: train.status(),
            effective_speed_kmh: train.effective_speed_kmh(),
            distance_to_target_km: train.distance_to_target_km(),
            eta_minutes: train.eta_minutes(),
            heading_degrees: train.heading_degrees(),
        }
    }
}

impl fmt::Display for TrainRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} | {} | track {} | {} | {:.0} km/h | {:.2} km to target",
            self.id,
            self.route,
            self.position,
            self.track,
            self.status,
            self.effective_speed_kmh,
            self.distance_to_target_km
        )?;
        if let Some(eta) = self.eta_minutes {
            write!(f, " | eta {eta:.2} min")?;
        }
        if let Some(heading) = self.heading_degrees {
            write!(f, " | hdg {heading:.0}")?;
        }
        Ok(())
    }
}

/// The one-shot alert raised the first time a session detects any
/// conflict. Later conflicts, including between different pairs, do not
/// re-raise it; the latch only re-arms on a full reset.
#[derive(Debug, Clone, PartialEq)]
pub struct ConflictAlert {
    pub left: TrainId,
    pub right: TrainId,
    pub track: TrackId,
    pub separation_km: f64,
    pub yielding: TrainId,
}

impl ConflictAlert {
    pub(crate) fn from_conflict(conflict: &Conflict) -> Self {
        Self {
            left: conflict.left.clone(),
            right: conflict.right.clone(),
            track: conflict.track,
            separation_km: conflict.separation_km,
            yielding: conflict.yielding.clone(),
        }
    }
}

impl fmt::Display for ConflictAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "conflict: {} and {} on track {} within {:.2} km; {} instructed to stop",
            self.left, self.right, self.track, self.separation_km, self.yielding
        )
    }
}

/// Everything one tick produced: the advanced fleet, the conflicts found
/// while scanning it, and the alert if the latch fired this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub sim_elapsed_seconds: f64,
    pub trains: Vec<TrainRow>,
    pub conflicts: Vec<Conflict>,
    pub alert: Option<ConflictAlert>,
}

impl TickReport {
    #[must_use]
    pub fn train(&self, id: &TrainId) -> Option<&TrainRow> {
        self.trains.iter().find(|row| &row.id == id)
    }
}

#[cfg(test)]
mod tests {
    use trainsafe_core::{Position, SpeedKmh, TrackId, TrainId};

    use crate::report::{ConflictAlert, TrainRow};
    use crate::train::Train;

    #[test]
    fn train_row_mirrors_train_state() {
        let train = Train::new(
            TrainId::new("12002").expect("id"),
            "Bhopal Shatabdi",
            Position::new(28.6139, 77.209).expect("position"),
            Position::new(23.2599, 77.4126).expect("target"),
            SpeedKmh::new(150.0).expect("speed"),
            TrackId::new(2).expect("track"),
        );

        let row = TrainRow::from_train(&train);
        assert_eq!(row.id, *train.id());
        assert_eq!(row.effective_speed_kmh, 150.0);
        assert_eq!(row.distance_to_target_km, train.distance_to_target_km());
        assert!(row.eta_minutes.is_some());
        assert!(row.heading_degrees.is_some());
    }

    #[test]
    fn alert_message_names_both_trains_and_the_yielder() {
        let alert = ConflictAlert {
            left: TrainId::new("12951").expect("id"),
            right: TrainId::new("12002").expect("id"),
            track: TrackId::new(1).expect("track"),
            separation_km: 7.4321,
            yielding: TrainId::new("12002").expect("id"),
        };

        let message = alert.to_string();
        assert_eq!(
            message,
            "conflict: 12951 and 12002 on track 1 within 7.43 km; 12002 instructed to stop"
        );
    }
}
