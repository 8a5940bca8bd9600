//! Observed state: everything `update_junction`, `block_section`,
//! `move_train` and friends mutate, and everything position arithmetic and
//! the speed profiler read back.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::control::rail_system::config::RailwayConfig;
use crate::error::ControlError;
use crate::general::{Direction, JunctionId, SectionId, StopId, TrainId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct JunctionState {
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SectionState {
    pub blocked: bool,
}

/// Where a train sits on the network and what its stop-target tracker has
/// decided.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainState {
    pub current_section: SectionId,
    pub target_junction: JunctionId,
    pub mileage: f64,
    /// The stop this train is currently tracking, if any.
    pub stop: Option<StopId>,
    /// Distance remaining to `stop`, or `0` once arrived.
    pub stop_distance: f64,
    /// Set while dwelling at a stop; the tick at which the train is cleared
    /// to depart.
    pub departure_time: Option<u64>,
}

impl TrainState {
    pub fn new(current_section: SectionId, target_junction: JunctionId, mileage: f64) -> Self {
        TrainState {
            current_section,
            target_junction,
            mileage,
            stop: None,
            stop_distance: 0.0,
            departure_time: None,
        }
    }
}

/// The mutable world the orchestrator reads and writes every tick.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RailwayState {
    pub junctions: HashMap<JunctionId, JunctionState>,
    pub sections: HashMap<SectionId, SectionState>,
    pub trains: HashMap<TrainId, TrainState>,
    pub time: u64,
}

impl RailwayState {
    /// Junctions default to `Straight`, sections default to unblocked, no
    /// trains are placed yet — callers place trains with
    /// [`RailwayState::place_train`] before the first `update()`.
    pub fn new(config: &RailwayConfig) -> Self {
        let junctions = config
            .junctions
            .keys()
            .map(|id| {
                (
                    id.clone(),
                    JunctionState {
                        direction: Direction::Straight,
                    },
                )
            })
            .collect();
        let sections = config
            .sections
            .keys()
            .map(|id| (id.clone(), SectionState::default()))
            .collect();

        RailwayState {
            junctions,
            sections,
            trains: HashMap::new(),
            time: 0,
        }
    }

    /// Places a train at an explicit track position, validating that `train`
    /// is declared in `config.trains` and that `target_junction` is
    /// actually an endpoint of `section` (the invariants a state
    /// constructor can check up front rather than leaving to the speed
    /// profiler or the first `advance` call to panic on).
    pub fn place_train(
        &mut self,
        config: &RailwayConfig,
        train: TrainId,
        section: SectionId,
        target_junction: JunctionId,
        mileage: f64,
    ) -> Result<(), ControlError> {
        if !config.trains.contains_key(&train) {
            return Err(ControlError::UnknownTrain { train });
        }

        let section_config = config.sections.get(&section).unwrap_or_else(|| {
            panic!("place_train: section {section} is not part of this config")
        });
        if target_junction != section_config.junction_0 && target_junction != section_config.junction_1
        {
            return Err(ControlError::DanglingTargetJunction {
                train,
                section,
                target_junction,
            });
        }
        if !(0.0..=section_config.length).contains(&mileage) {
            panic!(
                "place_train: mileage {mileage} out of bounds for section {section} (length {})",
                section_config.length
            );
        }

        self.trains
            .insert(train, TrainState::new(section, target_junction, mileage));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_defaults_junctions_straight_and_sections_unblocked() {
        let config = RailwayConfig::default_layout();
        let state = RailwayState::new(&config);

        for junction in state.junctions.values() {
            assert!(matches!(junction.direction, Direction::Straight));
        }
        for section in state.sections.values() {
            assert!(!section.blocked);
        }
        assert!(state.trains.is_empty());
    }

    #[test]
    fn place_train_rejects_train_not_declared_in_config() {
        let config = RailwayConfig::default_layout();
        let mut state = RailwayState::new(&config);

        let result = state.place_train(
            &config,
            TrainId::new("no-such-train"),
            SectionId::new("s0"),
            JunctionId::new("j1"),
            10.0,
        );

        assert!(matches!(result, Err(ControlError::UnknownTrain { .. })));
        assert!(!state.trains.contains_key(&TrainId::new("no-such-train")));
    }

    #[test]
    fn place_train_rejects_foreign_target_junction() {
        let config = RailwayConfig::default_layout();
        let mut state = RailwayState::new(&config);

        let result = state.place_train(
            &config,
            TrainId::new("t0"),
            SectionId::new("s0"),
            JunctionId::new("j2"),
            10.0,
        );

        assert!(matches!(
            result,
            Err(ControlError::DanglingTargetJunction { .. })
        ));
    }
}
