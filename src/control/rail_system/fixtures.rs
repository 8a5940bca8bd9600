//! Default topology fixture for the scenario test suite (spec.md §8),
//! grounded in `railroad_test.rs::create_test_railroad`'s role as the
//! teacher's one shared test layout.

use crate::control::rail_system::config::RailwayConfig;
use crate::control::rail_system::railroad::Railroad;
use crate::general::{JunctionId, SectionId, TrainId};

/// Builds the default six-section, four-junction layout with no trains
/// placed, matching `RailwayConfig::default_layout()` plus freshly-derived
/// state and command.
pub fn default_railroad() -> Railroad {
    Railroad::new(RailwayConfig::default_layout())
}

/// Builds the default layout with a single train `t0` placed at the head of
/// `s0` heading towards `j1`, the starting point for most of the §8
/// single-train scenarios (S1, S2, S4).
pub fn single_train_on_s0() -> Railroad {
    let mut railroad = default_railroad();
    railroad
        .place_train(
            TrainId::new("t0"),
            SectionId::new("s0"),
            JunctionId::new("j1"),
            0.0,
        )
        .expect("s0/j1 is a valid position on the default layout");
    railroad
}

/// Builds the default layout with two trains on `s0` heading towards `j1`,
/// `lead` ahead of `trail`, for the leader-follower scenario (S3).
pub fn leader_follower_on_s0(lead_mileage: f64, trail_mileage: f64) -> Railroad {
    let mut railroad = default_railroad();
    railroad
        .place_train(
            TrainId::new("t0"),
            SectionId::new("s0"),
            JunctionId::new("j1"),
            lead_mileage,
        )
        .expect("s0/j1 is a valid position on the default layout");
    railroad
        .place_train(
            TrainId::new("t1"),
            SectionId::new("s0"),
            JunctionId::new("j1"),
            trail_mileage,
        )
        .expect("s0/j1 is a valid position on the default layout");
    railroad
}
