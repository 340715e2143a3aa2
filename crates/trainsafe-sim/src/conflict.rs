use trainsafe_core::{TrackId, TrainId};
use trainsafe_geo::haversine_distance_km;

use crate::train::Train;

/// Two trains on the same track closer than this are in conflict.
pub const STOP_THRESHOLD_KM: f64 = 10.0;

/// A same-track proximity conflict found during one tick's pairwise scan.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub left: TrainId,
    pub right: TrainId,
    pub track: TrackId,
    pub separation_km: f64,
    pub yielding: TrainId,
}

/// Which train of a conflicting pair yields: the one with the larger
/// remaining distance to its own target. On equal distances the right
/// train yields — the comparison is strict, so ties fall through to the
/// second operand.
#[must_use]
pub fn decide_yield<'a>(left: &'a Train, right: &'a Train) -> &'a TrainId {
    if left.distance_to_target_km() > right.distance_to_target_km() {
        left.id()
    } else {
        right.id()
    }
}

/// Pairwise scan over the fleet in order.
///
/// Refreshes both trains' cached target distances for every pair visited
/// and flags the yielding train of each conflict. Trains on different
/// tracks never conflict, whatever their separation.
pub fn scan_conflicts(trains: &mut [Train], threshold_km: f64) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for i in 0..trains.len() {
        for j in (i + 1)..trains.len() {
            let (head, tail) = trains.split_at_mut(j);
            let left = &mut head[i];
            let right = &mut tail[0];

            left.refresh_distance();
            right.refresh_distance();

            let separation_km = haversine_distance_km(&left.position(), &right.position());
            if left.track() != right.track() || separation_km > threshold_km {
                continue;
            }

            let yielding = decide_yield(left, right).clone();
            if yielding == *left.id() {
                left.mark_stopped();
            } else {
                right.mark_stopped();
            }

            conflicts.push(Conflict {
                left: left.id().clone(),
                right: right.id().clone(),
                track: left.track(),
                separation_km,
                yielding,
            });
        }
    }

    conflicts
}
