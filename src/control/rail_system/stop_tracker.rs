//! Per-train stop-target FSM: tracks which stop a train is currently
//! approaching, the distance remaining to it, and a dwell timer covering the
//! gap between "the stop vanished from the forward search because the train
//! passed it" and "the train is cleared to treat the next stop as current".
//!
//! Exploits the assumption that a train physically halts at its stop (the
//! position-tag signal stops arriving) and that, once halted, the train has
//! already passed the stop's mileage — so the forward search no longer finds
//! it. `departure_time` bridges that gap; while it is set the train is held
//! at `stop_distance = 0`.

use crate::control::rail_system::config::RailwayConfig;
use crate::control::rail_system::forward_search::get_forward_stop;
use crate::control::rail_system::state::RailwayState;
use crate::general::TrainId;

/// Ticks a train is held at its stop before the next one becomes current.
pub const STOPPAGE_TIME: u64 = 50;

/// Advances every train's stop-target FSM by one step, per spec.md §4.4.
///
/// Must run after the switch director and before the speed profiler: the
/// profiler's ATO stop distance reads `train_state.stop_distance` written
/// here.
pub fn update_stops(config: &RailwayConfig, state: &mut RailwayState) {
    let train_ids: Vec<TrainId> = state.trains.keys().cloned().collect();

    for train_id in train_ids {
        let forward = get_forward_stop(config, state, &train_id);
        let train_state = state
            .trains
            .get_mut(&train_id)
            .expect("train_ids was collected from state.trains");

        match (&train_state.stop, &forward) {
            // No target yet, still none ahead: nothing to track.
            (None, None) => {
                train_state.stop_distance = 0.0;
            }
            // No target yet, found one: adopt it immediately.
            (None, Some((stop, distance))) => {
                train_state.stop = Some(stop.clone());
                train_state.stop_distance = *distance;
            }
            // Same target as last tick: just refresh the distance.
            (Some(current), Some((forward_stop, distance))) if current == forward_stop => {
                train_state.stop_distance = *distance;
            }
            // Target changed or vanished (train passed it, or it was lost to
            // a section blockage). Start or continue the dwell.
            _ => match train_state.departure_time {
                None => {
                    train_state.departure_time = Some(state.time + STOPPAGE_TIME);
                    train_state.stop_distance = 0.0;
                }
                Some(departure) if state.time >= departure => {
                    train_state.departure_time = None;
                    train_state.stop = forward.as_ref().map(|(stop, _)| stop.clone());
                    train_state.stop_distance =
                        forward.as_ref().map_or(0.0, |(_, distance)| *distance);
                }
                Some(_) => {
                    // Still dwelling: hold stop/stop_distance as they are.
                }
            },
        }
    }
}
