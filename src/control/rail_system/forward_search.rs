//! Bounded forward searches: the nearest train ahead, and the nearest
//! uncleared stop ahead.

use std::collections::HashSet;

use crate::control::rail_system::config::RailwayConfig;
use crate::control::rail_system::position::next_hop_strict;
use crate::control::rail_system::state::RailwayState;
use crate::general::{JunctionId, SectionId, StopId, TrainId};

/// A train's physical length, subtracted from the nose-to-nose distance a
/// forward-train search returns so callers get clearance to the *tail* of
/// the train ahead.
pub const TRAIN_LENGTH: f64 = 60.0;

/// Finds the nearest train ahead of `train` along its current heading and
/// the remaining distance to its tail.
///
/// Walks forward through strictly-navigable sections, accumulating
/// distance, until another train is found occupying the section just
/// entered. Bounded by the number of sections in the topology: a
/// fully-circumscribing loop with no other train on it returns `None`
/// rather than spinning forever — except that on a loop exactly as long as
/// the whole topology, a train can legitimately find *itself* back at its
/// own position, which this search treats as "the train is its own leader"
/// (matching the original core, which does not exclude the searching train
/// from sections visited after the first).
pub fn get_forward_train(
    config: &RailwayConfig,
    state: &RailwayState,
    train: &TrainId,
) -> Option<(TrainId, f64)> {
    let train_state = state.trains.get(train)?;
    let section_config = config
        .sections
        .get(&train_state.current_section)
        .unwrap_or_else(|| panic!("get_forward_train: no section {} in config", train_state.current_section));

    let mut forward: Option<(TrainId, f64)> = None;

    // The train's own starting section: only other trains count here.
    for (other_id, other_state) in &state.trains {
        if other_id == train {
            continue;
        }
        if other_state.current_section != train_state.current_section {
            continue;
        }
        let candidate = if train_state.target_junction == section_config.junction_0
            && other_state.mileage <= train_state.mileage
        {
            Some(train_state.mileage - other_state.mileage)
        } else if train_state.target_junction == section_config.junction_1
            && other_state.mileage >= train_state.mileage
        {
            Some(other_state.mileage - train_state.mileage)
        } else {
            None
        };

        if let Some(d) = candidate {
            if forward.as_ref().map_or(true, |(_, fd)| d < *fd) {
                forward = Some((other_id.clone(), d));
            }
        }
    }

    let mut distance = if train_state.target_junction == section_config.junction_0 {
        train_state.mileage
    } else {
        section_config.length - train_state.mileage
    };

    let mut section = train_state.current_section.clone();
    let mut target_junction = train_state.target_junction.clone();
    let max_hops = config.sections.len();
    let mut hops = 0;

    while forward.is_none() {
        hops += 1;
        if hops > max_hops {
            break;
        }

        let Some((next_section, next_target_junction)) =
            next_hop_strict(config, state, &section, &target_junction)
        else {
            break;
        };
        section = next_section;
        target_junction = next_target_junction;
        let section_config = config
            .sections
            .get(&section)
            .unwrap_or_else(|| panic!("get_forward_train: dangling section reference {section}"));

        // Subsequent sections: the searching train itself is not excluded,
        // so a fully-circumscribing loop finds it leading itself.
        for (other_id, other_state) in &state.trains {
            if other_state.current_section != section {
                continue;
            }
            let new_distance = if target_junction == section_config.junction_0 {
                distance + section_config.length - other_state.mileage
            } else {
                distance + other_state.mileage
            };
            if forward.as_ref().map_or(true, |(_, fd)| new_distance < *fd) {
                forward = Some((other_id.clone(), new_distance));
            }
        }

        distance += section_config.length;
    }

    forward.map(|(id, d)| (id, d - TRAIN_LENGTH))
}

/// Finds the nearest stop ahead of `train` along its current heading.
///
/// Same shape as [`get_forward_train`], but over `config.stops` rather than
/// other trains, and with explicit loop detection: a `(section,
/// target_junction)` pair visited twice means the walk found a loop with no
/// stop on it, and the search gives up (`None`) rather than ever finding
/// itself, since a stop is a point on the layout, not a train that can lead
/// itself around a loop.
pub fn get_forward_stop(
    config: &RailwayConfig,
    state: &RailwayState,
    train: &TrainId,
) -> Option<(StopId, f64)> {
    let train_state = state.trains.get(train)?;
    let section_config = config
        .sections
        .get(&train_state.current_section)
        .unwrap_or_else(|| panic!("get_forward_stop: no section {} in config", train_state.current_section));

    let mut forward: Option<(StopId, f64)> = None;

    for (stop_id, stop_config) in &config.stops {
        if stop_config.section != train_state.current_section {
            continue;
        }
        if stop_config.target_junction != train_state.target_junction {
            continue;
        }
        let candidate = if train_state.target_junction == section_config.junction_0
            && stop_config.mileage <= train_state.mileage
        {
            Some(train_state.mileage - stop_config.mileage)
        } else if train_state.target_junction == section_config.junction_1
            && stop_config.mileage >= train_state.mileage
        {
            Some(stop_config.mileage - train_state.mileage)
        } else {
            None
        };

        if let Some(d) = candidate {
            if forward.as_ref().map_or(true, |(_, fd)| d < *fd) {
                forward = Some((stop_id.clone(), d));
            }
        }
    }

    let mut distance = if train_state.target_junction == section_config.junction_0 {
        train_state.mileage
    } else {
        section_config.length - train_state.mileage
    };

    let mut section = train_state.current_section.clone();
    let mut target_junction = train_state.target_junction.clone();
    let mut visited: HashSet<(SectionId, JunctionId)> = HashSet::new();

    while forward.is_none() {
        let Some(next) = next_hop_strict(config, state, &section, &target_junction) else {
            break;
        };
        if visited.contains(&next) {
            return None;
        }
        visited.insert(next.clone());
        let (next_section, next_target_junction) = next;
        section = next_section;
        target_junction = next_target_junction;
        let section_config = config
            .sections
            .get(&section)
            .unwrap_or_else(|| panic!("get_forward_stop: dangling section reference {section}"));

        for (stop_id, stop_config) in &config.stops {
            if stop_config.section != section || stop_config.target_junction != target_junction {
                continue;
            }
            let new_distance = if target_junction == section_config.junction_0 {
                distance + section_config.length - stop_config.mileage
            } else {
                distance + stop_config.mileage
            };
            if forward.as_ref().map_or(true, |(_, fd)| new_distance < *fd) {
                forward = Some((stop_id.clone(), new_distance));
            }
        }

        distance += section_config.length;
    }

    forward
}
