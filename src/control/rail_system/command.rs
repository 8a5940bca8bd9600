//! Commanded state: what the orchestrator asks the outside world to
//! actuate. Never read back by position arithmetic — actuation may lag the
//! command by however long the adapter's hardware takes, which is why
//! `state.junctions` (the *observed* direction) is the one position
//! arithmetic trusts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::control::rail_system::config::RailwayConfig;
use crate::general::{Direction, JunctionId, TrainId};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrainCommand {
    pub speed: f64,
}

impl Default for TrainCommand {
    fn default() -> Self {
        TrainCommand { speed: 0.0 }
    }
}

/// What the orchestrator currently wants the world to do.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RailwayCommand {
    pub junctions: HashMap<JunctionId, Direction>,
    pub trains: HashMap<TrainId, TrainCommand>,
}

impl RailwayCommand {
    /// Junctions default to `Straight`, trains default to stopped.
    pub fn new(config: &RailwayConfig) -> Self {
        let junctions = config
            .junctions
            .keys()
            .map(|id| (id.clone(), Direction::Straight))
            .collect();
        let trains = config
            .trains
            .keys()
            .map(|id| (id.clone(), TrainCommand::default()))
            .collect();

        RailwayCommand { junctions, trains }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_command_defaults_to_straight_and_stopped() {
        let config = RailwayConfig::default_layout();
        let command = RailwayCommand::new(&config);

        for direction in command.junctions.values() {
            assert!(matches!(direction, Direction::Straight));
        }
        for train in command.trains.values() {
            assert_eq!(train.speed, 0.0);
        }
    }
}
