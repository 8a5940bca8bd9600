//! Switch director: picks one of four enumerated junction-direction patterns
//! every tick from a handful of boolean facts about the world, and guards
//! against toggling a switch out from under a train that straddles it.
//!
//! The four patterns and their selection rules are hardcoded to this
//! default topology's junction and section IDs (`j0`..`j3`, `s1`, `s3`,
//! `s4`, `s5`), mirroring `original_source/ptcs/ptcs_control/control.py`'s
//! `_calc_direction` exactly rather than generalizing to arbitrary
//! topologies — an explicit Open Question resolution (see DESIGN.md).

use crate::control::rail_system::config::RailwayConfig;
use crate::control::rail_system::position::{advance, TrackPosition};
use crate::control::rail_system::state::RailwayState;
use crate::error::ControlError;
use crate::general::{Direction, JunctionId, SectionId, TrainId};

/// Margin added to a train's length when checking whether it straddles a
/// junction being considered for a toggle.
pub const MARGIN_LOCKOUT: f64 = 40.0;

/// One of the four enumerated junction-direction patterns.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum SwitchPattern {
    Pattern1,
    Pattern2,
    Pattern3,
    Pattern4,
}

impl SwitchPattern {
    /// The `(junction, direction)` assignments this pattern commands.
    pub fn directions(self) -> [(JunctionId, Direction); 4] {
        use Direction::{Curve, Straight};
        let j = |s: &str| JunctionId::new(s);

        match self {
            SwitchPattern::Pattern1 => [
                (j("j0"), Straight),
                (j("j1"), Straight),
                (j("j2"), Straight),
                (j("j3"), Straight),
            ],
            SwitchPattern::Pattern2 => [
                (j("j0"), Straight),
                (j("j1"), Curve),
                (j("j2"), Straight),
                (j("j3"), Curve),
            ],
            SwitchPattern::Pattern3 => [
                (j("j0"), Curve),
                (j("j1"), Straight),
                (j("j2"), Curve),
                (j("j3"), Straight),
            ],
            SwitchPattern::Pattern4 => [
                (j("j0"), Curve),
                (j("j1"), Curve),
                (j("j2"), Curve),
                (j("j3"), Curve),
            ],
        }
    }
}

/// Selects the pattern that fits the observed world, or
/// `ControlError::InconsistentWorld` if no rule's guard matches.
///
/// Guards are evaluated in the order below; the first match wins.
pub fn select_pattern(
    _config: &RailwayConfig,
    state: &RailwayState,
) -> Result<SwitchPattern, ControlError> {
    let j1 = JunctionId::new("j1");
    let j3 = JunctionId::new("j3");
    let s1 = SectionId::new("s1");
    let s3 = SectionId::new("s3");
    let s4 = SectionId::new("s4");
    let s5 = SectionId::new("s5");

    let s1_j1 = state
        .trains
        .values()
        .any(|t| t.current_section == s1 && t.target_junction == j1);
    let s1_j3 = state
        .trains
        .values()
        .any(|t| t.current_section == s1 && t.target_junction == j3);
    let s4_present = state.trains.values().any(|t| t.current_section == s4);
    let s5_present = state.trains.values().any(|t| t.current_section == s5);
    let s3_blocked = state
        .sections
        .get(&s3)
        .map(|s| s.blocked)
        .unwrap_or(false);

    if s3_blocked {
        if !s1_j1 && (s1_j3 || !s5_present) {
            Ok(SwitchPattern::Pattern3)
        } else if s1_j1 || (!s1_j3 && s5_present) {
            Ok(SwitchPattern::Pattern4)
        } else {
            Err(ControlError::InconsistentWorld)
        }
    } else if !s1_j1 && !s4_present && !s5_present {
        Ok(SwitchPattern::Pattern1)
    } else if (s1_j1 || s4_present) && !s5_present {
        Ok(SwitchPattern::Pattern2)
    } else if !s1_j1 && (s1_j3 || !s5_present) {
        Ok(SwitchPattern::Pattern3)
    } else if !s1_j3 && s5_present {
        Ok(SwitchPattern::Pattern4)
    } else {
        Err(ControlError::InconsistentWorld)
    }
}

/// True if toggling `junction` right now would move a switch out from under
/// a train currently straddling it.
///
/// Walks each train's tail backwards (opposite heading, `TRAIN_LENGTH +
/// MARGIN_LOCKOUT` back) and checks whether that tail has already crossed
/// into `junction` while the train's nose has not yet reached it — i.e. the
/// train's body currently occupies the junction.
pub fn toggle_prohibited(config: &RailwayConfig, state: &RailwayState, junction: &JunctionId) -> bool {
    use crate::control::rail_system::forward_search::TRAIN_LENGTH;

    for train_state in state.trains.values() {
        let section_config = config
            .sections
            .get(&train_state.current_section)
            .unwrap_or_else(|| {
                panic!(
                    "toggle_prohibited: no section {} in config",
                    train_state.current_section
                )
            });
        let reverse_target_junction = section_config
            .opposite(&train_state.target_junction)
            .unwrap_or_else(|| {
                panic!(
                    "{}",
                    ControlError::DanglingTargetJunction {
                        train: TrainId::new("<toggle_prohibited>"),
                        section: train_state.current_section.clone(),
                        target_junction: train_state.target_junction.clone(),
                    }
                )
            });

        let reverse_pos = TrackPosition {
            section: train_state.current_section.clone(),
            target_junction: reverse_target_junction,
            mileage: train_state.mileage,
        };
        let tail = advance(config, state, &reverse_pos, TRAIN_LENGTH + MARGIN_LOCKOUT);

        let tail_section_config = config
            .sections
            .get(&tail.section)
            .unwrap_or_else(|| panic!("toggle_prohibited: no section {} in config", tail.section));
        let tail_target_junction = tail_section_config
            .opposite(&tail.target_junction)
            .unwrap_or_else(|| {
                panic!(
                    "{}",
                    ControlError::DanglingJunctionReference {
                        section: tail.section.clone(),
                        target_junction: tail.target_junction.clone(),
                    }
                )
            });

        if train_state.target_junction != *junction && tail_target_junction == *junction {
            return true;
        }
    }

    false
}
