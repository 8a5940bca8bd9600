//! ATP/ATO speed profiler: the last step of `update()`. Computes, per train,
//! an Automatic Train Protection stop distance, clamps it to an ATP speed
//! ceiling, folds in the stop tracker's Automatic Train Operation target,
//! and smooths the result by an acceleration cap so the commanded speed
//! never jumps.

use crate::control::rail_system::config::RailwayConfig;
use crate::control::rail_system::forward_search::get_forward_train;
use crate::control::rail_system::position::next_hop_strict;
use crate::control::rail_system::state::RailwayState;
use crate::general::TrainId;

/// Braking deceleration used for the ATP stop-distance-to-speed-limit
/// conversion, cm/s².
pub const BRAKE_ACCEL: f64 = 10.0;
/// Comfortable acceleration/deceleration used for the ATO speed target and
/// the command-smoothing cap, cm/s².
pub const NORMAL_ACCEL: f64 = 5.0;
/// Fleet-wide speed ceiling, cm/s.
pub const MAX_SPEED: f64 = 40.0;
/// Clearance kept short of a forward train's tail or an unaligned/blocked
/// junction, cm.
pub const MARGIN: f64 = 10.0;
/// Control-loop period assumed by the acceleration cap, seconds.
pub const LOOP_PERIOD: f64 = 0.1;

/// Step 1 (§4.6): the distance from `train`'s nose to the first point it
/// must stop short of, walking forward section by section until one of the
/// three halting conditions fires.
///
/// `pub(crate)` rather than private so `railroad_test.rs`'s scenario suite
/// can assert the accumulated distance directly, independent of whatever a
/// nearer stop's `stop_distance` would otherwise clamp the commanded speed
/// to (spec.md §9's downstream-accumulation Open Question).
pub(crate) fn atp_stop_distance(config: &RailwayConfig, state: &RailwayState, train: &TrainId) -> f64 {
    let train_state = &state.trains[train];
    let mut section = train_state.current_section.clone();
    let mut target_junction = train_state.target_junction.clone();
    let mut distance = 0.0;
    let mut first_section = true;
    // Guards against a fully-navigable loop with no other train on it: in
    // practice `get_forward_train` finds the train as its own leader once
    // the walk comes back around (spec.md §4.5), but a malformed topology
    // should not be able to hang `update()` regardless.
    let max_hops = config.sections.len() + 1;
    let mut hops = 0;

    loop {
        hops += 1;
        if hops > max_hops {
            break;
        }
        let section_config = &config.sections[&section];

        // Halting condition 1: resident in a section that is not our own and
        // it is blocked (a train may finish running to its stop inside a
        // section that blocks out from under it, but must not enter one).
        if !first_section && state.sections[&section].blocked {
            break;
        }

        // Halting condition 2: a forward train is reachable from here.
        if let Some((_, tail_distance)) = get_forward_train(config, state, train) {
            distance = tail_distance - MARGIN;
            break;
        }

        let strict_next = next_hop_strict(config, state, &section, &target_junction);
        let next_blocked = strict_next
            .as_ref()
            .map(|(next_section, _)| state.sections[next_section].blocked)
            .unwrap_or(false);

        // Halting condition 3: the approach ahead is not strictly navigable,
        // or the next section is blocked.
        if strict_next.is_none() || next_blocked {
            if first_section {
                if target_junction == section_config.junction_0 {
                    distance += train_state.mileage - MARGIN;
                } else {
                    distance += section_config.length - train_state.mileage - MARGIN;
                }
            } else {
                distance += section_config.length - MARGIN;
            }
            break;
        }

        // No halt here: discharge this section's remaining length and hop.
        if first_section {
            distance += if target_junction == section_config.junction_0 {
                train_state.mileage
            } else {
                section_config.length - train_state.mileage
            };
        } else {
            distance += section_config.length;
        }

        let (next_section, next_target_junction) =
            strict_next.expect("checked is_none above");
        section = next_section;
        target_junction = next_target_junction;
        first_section = false;
    }

    distance.max(0.0)
}

/// Computes and writes the ATP/ATO speed command for every train, per
/// spec.md §4.6. Must run after the stop tracker: step 3 reads
/// `train_state.stop_distance`.
pub fn update_speeds(config: &RailwayConfig, state: &RailwayState, command: &mut crate::control::rail_system::command::RailwayCommand) {
    let train_ids: Vec<TrainId> = state.trains.keys().cloned().collect();

    for train_id in train_ids {
        let train_state = &state.trains[&train_id];

        // Step 1.
        let d_atp = atp_stop_distance(config, state, &train_id);

        // Step 2.
        let v_lim = (2.0 * BRAKE_ACCEL * d_atp).sqrt().min(MAX_SPEED);

        // Step 3.
        let d_ato = if train_state.stop.is_some() {
            d_atp.min(train_state.stop_distance)
        } else {
            d_atp
        }
        .max(0.0);

        // Step 4.
        let v_stop = (2.0 * NORMAL_ACCEL * d_ato).sqrt().min(v_lim);

        // Step 5.
        let v_prev = command.trains[&train_id].speed;
        let v_command = if v_stop > v_prev + NORMAL_ACCEL * LOOP_PERIOD {
            v_prev + NORMAL_ACCEL * LOOP_PERIOD
        } else {
            v_stop
        };

        command.trains.get_mut(&train_id).unwrap().speed = v_command;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::rail_system::command::RailwayCommand;
    use crate::control::rail_system::config::RailwayConfig;
    use crate::control::rail_system::state::RailwayState;
    use crate::general::{JunctionId, SectionId};

    fn config_and_state() -> (RailwayConfig, RailwayState) {
        let config = RailwayConfig::default_layout();
        let state = RailwayState::new(&config);
        (config, state)
    }

    #[test]
    fn accelerates_from_standstill_by_exactly_one_ramp_step() {
        let (config, mut state) = config_and_state();
        state
            .place_train(
                &config,
                TrainId::new("t0"),
                SectionId::new("s0"),
                JunctionId::new("j1"),
                0.0,
            )
            .unwrap();
        let mut command = RailwayCommand::new(&config);

        update_speeds(&config, &state, &mut command);

        assert_eq!(
            command.trains[&TrainId::new("t0")].speed,
            NORMAL_ACCEL * LOOP_PERIOD
        );
    }

    #[test]
    fn blocked_section_ahead_stops_short_of_junction() {
        let (config, mut state) = config_and_state();
        state
            .place_train(
                &config,
                TrainId::new("t0"),
                SectionId::new("s0"),
                JunctionId::new("j1"),
                10.0,
            )
            .unwrap();
        state.sections.get_mut(&SectionId::new("s1")).unwrap().blocked = true;
        let mut command = RailwayCommand::new(&config);

        let d_atp = atp_stop_distance(&config, &state, &TrainId::new("t0"));
        assert_eq!(d_atp, 100.0 - 10.0 - MARGIN);

        update_speeds(&config, &state, &mut command);
        let expected_v_lim = (2.0 * BRAKE_ACCEL * d_atp).sqrt().min(MAX_SPEED);
        assert_eq!(
            command.trains[&TrainId::new("t0")].speed,
            (NORMAL_ACCEL * LOOP_PERIOD).min(expected_v_lim)
        );
    }

    #[test]
    fn blocked_section_two_hops_downstream_accumulates_intervening_unblocked_section() {
        // Train in s0 (mileage 10, heading j1); s1 is the immediately
        // adjacent section and is left clear; s2, two hops downstream, is
        // blocked. d_atp must accumulate the whole of the clear s1 rather
        // than halting there, and stop at the entry of s2 — the first
        // *blocked* section reached, per spec.md §9's Open Question on
        // downstream accumulation.
        let (config, mut state) = config_and_state();
        state
            .place_train(
                &config,
                TrainId::new("t0"),
                SectionId::new("s0"),
                JunctionId::new("j1"),
                10.0,
            )
            .unwrap();
        state.sections.get_mut(&SectionId::new("s2")).unwrap().blocked = true;

        let d_atp = atp_stop_distance(&config, &state, &TrainId::new("t0"));
        // Remaining s0 (100 - 10) + all of s1 (200) - MARGIN, entering s2.
        assert_eq!(d_atp, (100.0 - 10.0) + 200.0 - MARGIN);
    }

    #[test]
    fn leader_follower_clamps_to_zero() {
        let (config, mut state) = config_and_state();
        state
            .place_train(
                &config,
                TrainId::new("t0"),
                SectionId::new("s0"),
                JunctionId::new("j1"),
                80.0,
            )
            .unwrap();
        state
            .place_train(
                &config,
                TrainId::new("t1"),
                SectionId::new("s0"),
                JunctionId::new("j1"),
                20.0,
            )
            .unwrap();
        let mut command = RailwayCommand::new(&config);

        update_speeds(&config, &state, &mut command);

        assert_eq!(command.trains[&TrainId::new("t1")].speed, 0.0);
    }
}
