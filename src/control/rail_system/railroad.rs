//! The orchestrator: owns one `(RailwayConfig, RailwayState, RailwayCommand)`
//! triple and exposes the ingress operations plus the single `update()` tick
//! that runs the switch director, stop tracker and speed profiler in that
//! order, mirroring `original_source/ptcs/ptcs_control/control.py::Control`.
//!
//! Single-threaded and non-suspending (spec.md §5): every method here takes
//! `&mut self` and returns without blocking. A host process that serves
//! multiple hardware links or an HTTP surface is responsible for serialising
//! its calls into a single owner before they reach a `Railroad` — no
//! synchronization primitive is visible at this layer.

use crate::control::rail_system::command::RailwayCommand;
use crate::control::rail_system::config::RailwayConfig;
use crate::control::rail_system::position::{advance, TrackPosition};
use crate::control::rail_system::speed_profiler::update_speeds;
use crate::control::rail_system::state::RailwayState;
use crate::control::rail_system::stop_tracker::update_stops;
use crate::control::rail_system::switch_director::{select_pattern, toggle_prohibited};
use crate::error::ControlError;
use crate::general::{Direction, JunctionId, PositionId, SectionId, TrainId};

/// Owns the config/state/command triple and drives it one tick at a time.
#[derive(Debug, Clone)]
pub struct Railroad {
    config: RailwayConfig,
    state: RailwayState,
    command: RailwayCommand,
}

impl Railroad {
    /// Builds a railroad over `config`, with every junction `Straight`,
    /// every section unblocked, no trains placed yet and every command at
    /// its default (matching `Control.__init__`'s `init_state`/`init_command`).
    /// Callers place trains with [`Railroad::place_train`] before the first
    /// `update()`.
    pub fn new(config: RailwayConfig) -> Self {
        let state = RailwayState::new(&config);
        let command = RailwayCommand::new(&config);
        Railroad {
            config,
            state,
            command,
        }
    }

    pub fn config(&self) -> &RailwayConfig {
        &self.config
    }

    pub fn state(&self) -> &RailwayState {
        &self.state
    }

    pub fn command(&self) -> &RailwayCommand {
        &self.command
    }

    /// Places a train at an explicit track position. Not part of the
    /// original's ingress surface (the original seeds `init_state` directly
    /// with hardcoded train positions); exposed here so hosts and tests can
    /// populate trains without reconstructing the whole state.
    pub fn place_train(
        &mut self,
        train: TrainId,
        section: SectionId,
        target_junction: JunctionId,
        mileage: f64,
    ) -> Result<(), ControlError> {
        self.state
            .place_train(&self.config, train, section, target_junction, mileage)
    }

    /// Advances the internal tick counter by `n`.
    pub fn tick(&mut self, n: u64) {
        self.state.time += n;
    }

    /// Marks `section` as blocked (an obstacle has appeared on it).
    pub fn block_section(&mut self, section: &SectionId) {
        if let Some(section_state) = self.state.sections.get_mut(section) {
            section_state.blocked = true;
        }
    }

    /// Clears a previously blocked section.
    pub fn unblock_section(&mut self, section: &SectionId) {
        if let Some(section_state) = self.state.sections.get_mut(section) {
            section_state.blocked = false;
        }
    }

    /// Commands `junction` towards `direction`. Does not actuate anything by
    /// itself — actuation happens (or is overridden) the next time
    /// `update()` runs the switch director, which is the only writer that
    /// respects `toggle_prohibited`.
    pub fn toggle_junction(&mut self, junction: JunctionId, direction: Direction) {
        self.command.junctions.insert(junction, direction);
    }

    /// Operator override of a train's commanded speed. Overwritten by the
    /// speed profiler on the next `update()`.
    pub fn set_speed(&mut self, train: TrainId, speed: f64) {
        self.command
            .trains
            .entry(train)
            .or_insert_with(Default::default)
            .speed = speed;
    }

    /// Records the actually-observed direction of a switch, as reported by a
    /// servo echo or limit switch. Position arithmetic trusts this, not
    /// `command.junctions`.
    pub fn update_junction(&mut self, junction: &JunctionId, direction: Direction) {
        if let Some(junction_state) = self.state.junctions.get_mut(junction) {
            junction_state.direction = direction;
        }
    }

    /// Translates a motor-rotation count into linear distance via the
    /// train's `delta_per_motor_rotation` and re-seats it with `move_train`.
    pub fn move_train_mr(&mut self, train: &TrainId, motor_rotations: f64) {
        let delta_per_rotation = self.config.trains[train].delta_per_motor_rotation;
        self.move_train(train, motor_rotations * delta_per_rotation);
    }

    /// Re-seats `train` by `delta` along its current heading, crossing
    /// junctions per the *observed* switch state. Positive `delta` advances
    /// towards `target_junction`; negative runs the train backwards.
    ///
    /// Panics if `delta` would carry the train across a misaligned switch —
    /// an Open Question in spec.md §9 resolved as "the spec chooses to
    /// panic (topology violation)", since `move_train` is only specified for
    /// topology reachable under the currently-observed switch directions.
    pub fn move_train(&mut self, train: &TrainId, delta: f64) {
        let train_state = &self.state.trains[train];
        let pos = TrackPosition {
            section: train_state.current_section.clone(),
            target_junction: train_state.target_junction.clone(),
            mileage: train_state.mileage,
        };

        let new_pos = advance(&self.config, &self.state, &pos, delta);

        let train_state = self.state.trains.get_mut(train).expect("checked above");
        train_state.current_section = new_pos.section;
        train_state.target_junction = new_pos.target_junction;
        train_state.mileage = new_pos.mileage;
    }

    /// Jumps `train` to the stored position of `position`, used to
    /// re-localise on reading an on-track position tag.
    pub fn put_train(&mut self, train: &TrainId, position: &PositionId) {
        let position_config = &self.config.positions[position];
        let train_state = self
            .state
            .trains
            .get_mut(train)
            .unwrap_or_else(|| panic!("put_train: no train {train} in state"));
        train_state.current_section = position_config.section.clone();
        train_state.target_junction = position_config.target_junction.clone();
        train_state.mileage = position_config.mileage;
    }

    /// Recomputes every commanded output from the current state, in the
    /// fixed order the original enforces: switch director, then stop
    /// tracker, then speed profiler. Each later stage depends on a field the
    /// earlier one writes (the profiler reads `stop_distance`; the stop
    /// tracker's forward search does not depend on the director's output,
    /// but keeping the original's order keeps the two implementations easy
    /// to compare tick-for-tick).
    pub fn update(&mut self) {
        match select_pattern(&self.config, &self.state) {
            Ok(pattern) => {
                for (junction, direction) in pattern.directions() {
                    if toggle_prohibited(&self.config, &self.state, &junction) {
                        tracing::warn!(%junction, "switch toggle suppressed: train straddling junction");
                        continue;
                    }
                    self.command.junctions.insert(junction, direction);
                }
            }
            Err(err) => {
                tracing::error!(%err, "switch director found no matching pattern, leaving junction commands unchanged");
            }
        }

        update_stops(&self.config, &mut self.state);
        update_speeds(&self.config, &self.state, &mut self.command);

        tracing::debug!(tick = self.state.time, "update() complete");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::general::{JunctionId, SectionId, TrainId};

    #[test]
    fn new_railroad_starts_with_defaults_and_no_trains() {
        let railroad = Railroad::new(RailwayConfig::default_layout());

        assert!(railroad.state().trains.is_empty());
        for direction in railroad.command().junctions.values() {
            assert!(matches!(direction, Direction::Straight));
        }
    }

    #[test]
    fn move_train_crosses_a_junction_boundary() {
        let mut railroad = Railroad::new(RailwayConfig::default_layout());
        railroad
            .place_train(
                TrainId::new("t0"),
                SectionId::new("s0"),
                JunctionId::new("j1"),
                95.0,
            )
            .unwrap();

        railroad.move_train(&TrainId::new("t0"), 10.0);

        let train = &railroad.state().trains[&TrainId::new("t0")];
        assert_eq!(train.current_section, SectionId::new("s1"));
        assert_eq!(train.mileage, 5.0);
    }

    #[test]
    fn put_train_jumps_to_stored_position() {
        let mut railroad = Railroad::new(RailwayConfig::default_layout());
        railroad
            .place_train(
                TrainId::new("t0"),
                SectionId::new("s0"),
                JunctionId::new("j1"),
                50.0,
            )
            .unwrap();

        railroad.put_train(&TrainId::new("t0"), &PositionId::new("position_1"));

        let train = &railroad.state().trains[&TrainId::new("t0")];
        assert_eq!(train.current_section, SectionId::new("s3"));
        assert_eq!(train.target_junction, JunctionId::new("j0"));
        assert_eq!(train.mileage, 10.0);
    }

    #[test]
    fn update_runs_director_then_stops_then_speed_without_panicking() {
        let mut railroad = Railroad::new(RailwayConfig::default_layout());
        railroad
            .place_train(
                TrainId::new("t0"),
                SectionId::new("s0"),
                JunctionId::new("j1"),
                0.0,
            )
            .unwrap();

        railroad.update();

        assert!(railroad.command().trains[&TrainId::new("t0")].speed > 0.0);
    }

    #[test]
    fn block_then_unblock_section_round_trips() {
        let mut railroad = Railroad::new(RailwayConfig::default_layout());
        let s1 = SectionId::new("s1");

        railroad.block_section(&s1);
        assert!(railroad.state().sections[&s1].blocked);

        railroad.unblock_section(&s1);
        assert!(!railroad.state().sections[&s1].blocked);
    }
}
