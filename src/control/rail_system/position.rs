//! Position arithmetic: the single place that knows how to walk a mileage
//! across a junction. Everything else (forward search, the speed profiler,
//! `move_train`) is built on `advance`, `next_hop` and `next_hop_strict`.
//!
//! These functions panic on topology violations — a `target_junction` that
//! isn't an endpoint of its section, or a junction config that doesn't wire
//! the joint a caller claims to have entered from. There is no legal
//! recovery for a caller that fed in an inconsistent topology.

use crate::control::rail_system::config::RailwayConfig;
use crate::control::rail_system::state::RailwayState;
use crate::error::ControlError;
use crate::general::{Direction, JunctionId, Joint, SectionId};

/// A train's (or stop's, or forward-search cursor's) location: a section, a
/// mileage along it, and the junction that mileage increases towards.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackPosition {
    pub section: SectionId,
    pub target_junction: JunctionId,
    pub mileage: f64,
}

/// The next `(section, target_junction)` reached when crossing
/// `target_junction`, following the junction's *actual* observed switch
/// direction. Always defined for a consistent topology: a `Through` or
/// `Diverging` entry always reaches the `Converging` exit; a `Converging`
/// entry reaches `Through` if the switch is `Straight`, `Diverging` if
/// `Curve`.
pub fn next_hop(
    config: &RailwayConfig,
    state: &RailwayState,
    section: &SectionId,
    target_junction: &JunctionId,
) -> (SectionId, JunctionId) {
    let junction = config
        .junctions
        .get(target_junction)
        .unwrap_or_else(|| panic!("next_hop: no junction {target_junction} in config"));
    let junction_state = state
        .junctions
        .get(target_junction)
        .unwrap_or_else(|| panic!("next_hop: no junction state for {target_junction}"));

    let entry_joint = junction.joint_of(section).unwrap_or_else(|| {
        panic!(
            "{}",
            ControlError::UnknownEntryJoint {
                junction: target_junction.clone(),
                section: section.clone(),
            }
        )
    });

    let next_section = match entry_joint {
        Joint::Through | Joint::Diverging => junction.section_at(Joint::Converging),
        Joint::Converging => match junction_state.direction {
            Direction::Straight => junction.section_at(Joint::Through),
            Direction::Curve => junction.section_at(Joint::Diverging),
        },
    }
    .unwrap_or_else(|| {
        panic!(
            "next_hop: junction {target_junction} has no section wired for the expected exit joint"
        )
    })
    .clone();

    let next_section_config = config
        .sections
        .get(&next_section)
        .unwrap_or_else(|| panic!("next_hop: dangling section reference {next_section}"));
    let next_target_junction = next_section_config
        .opposite(target_junction)
        .unwrap_or_else(|| {
            panic!(
                "{}",
                ControlError::DanglingJunctionReference {
                    section: next_section.clone(),
                    target_junction: target_junction.clone(),
                }
            )
        });

    (next_section, next_target_junction)
}

/// Like [`next_hop`], but returns `None` when the approach is not strictly
/// navigable given the junction's *current* switch setting: a `Through`
/// entry requires `Straight`, a `Diverging` entry requires `Curve`. Used by
/// forward search to probe ahead without assuming a train can physically
/// pass a misaligned point.
pub fn next_hop_strict(
    config: &RailwayConfig,
    state: &RailwayState,
    section: &SectionId,
    target_junction: &JunctionId,
) -> Option<(SectionId, JunctionId)> {
    let junction = config
        .junctions
        .get(target_junction)
        .unwrap_or_else(|| panic!("next_hop_strict: no junction {target_junction} in config"));
    let junction_state = state
        .junctions
        .get(target_junction)
        .unwrap_or_else(|| panic!("next_hop_strict: no junction state for {target_junction}"));

    let entry_joint = junction.joint_of(section).unwrap_or_else(|| {
        panic!(
            "{}",
            ControlError::UnknownEntryJoint {
                junction: target_junction.clone(),
                section: section.clone(),
            }
        )
    });

    let passable = match entry_joint {
        Joint::Through => matches!(junction_state.direction, Direction::Straight),
        Joint::Diverging => matches!(junction_state.direction, Direction::Curve),
        Joint::Converging => true,
    };

    if !passable {
        return None;
    }

    Some(next_hop(config, state, section, target_junction))
}

/// Advances `pos` by `delta` (mileage towards `target_junction`; negative
/// runs the other way), crossing as many junctions as needed, following the
/// actual observed switch state at each one. Equivalent to the combined
/// `_get_new_position` / `move_train` loop of the original core: the same
/// shape handles both forward motion and the reversed-heading walk
/// `toggle_prohibited` uses to find a train's tail.
pub fn advance(
    config: &RailwayConfig,
    state: &RailwayState,
    pos: &TrackPosition,
    delta: f64,
) -> TrackPosition {
    let mut section = pos.section.clone();
    let mut target_junction = pos.target_junction.clone();
    let mut mileage = pos.mileage;
    let mut section_config = config
        .sections
        .get(&section)
        .unwrap_or_else(|| panic!("advance: no section {section} in config"));

    if target_junction == section_config.junction_1 {
        mileage += delta;
    } else if target_junction == section_config.junction_0 {
        mileage -= delta;
    } else {
        panic!(
            "{}",
            ControlError::DanglingJunctionReference {
                section: section.clone(),
                target_junction: target_junction.clone(),
            }
        )
    }

    while mileage > section_config.length || mileage < 0.0 {
        let surplus = if mileage > section_config.length {
            mileage - section_config.length
        } else {
            -mileage
        };

        let (next_section, next_target_junction) = next_hop(config, state, &section, &target_junction);
        section = next_section;
        target_junction = next_target_junction;
        section_config = config
            .sections
            .get(&section)
            .unwrap_or_else(|| panic!("advance: dangling section reference {section}"));

        if target_junction == section_config.junction_1 {
            mileage = surplus;
        } else if target_junction == section_config.junction_0 {
            mileage = section_config.length - surplus;
        } else {
            panic!(
                "{}",
                ControlError::DanglingJunctionReference {
                    section: section.clone(),
                    target_junction: target_junction.clone(),
                }
            )
        }
    }

    TrackPosition {
        section,
        target_junction,
        mileage,
    }
}
