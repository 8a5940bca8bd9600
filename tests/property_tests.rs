//! Property-based checks for the invariants and round-trips spec.md §8
//! calls out explicitly, using `proptest` the way the wider retrieval pack
//! (`seanchatmangpt-knhk`'s `tests/integration/prop_concurrency.rs`) reaches
//! for it for randomized scenario coverage rather than hand-enumerated cases.

use proptest::prelude::*;

use ptc_core::control::rail_system::config::RailwayConfig;
use ptc_core::control::rail_system::position::{advance, TrackPosition};
use ptc_core::control::rail_system::railroad::Railroad;
use ptc_core::control::rail_system::speed_profiler::{LOOP_PERIOD, MAX_SPEED, NORMAL_ACCEL};
use ptc_core::control::rail_system::state::RailwayState;
use ptc_core::general::{JunctionId, PositionId, SectionId, TrainId};

// Total length of the s0->s1->s2->s3 loop the default layout's all-`Straight`
// switches resolve to; bounding generated deltas below this keeps the
// round-trip check clear of exact-boundary floating point ambiguity.
const LOOP_LENGTH: f64 = 100.0 + 200.0 + 100.0 + 150.0;

proptest! {
    /// `advance(advance(p, x), -x) == p` on topology navigable in both
    /// directions (spec.md §8 "Round-trips"): with every switch at its
    /// default `Straight`, the s0-s1-s2-s3 loop is symmetric in either
    /// heading, so any bounded forward-then-back walk returns to the start.
    #[test]
    fn advance_round_trips_on_navigable_topology(
        start_mileage in 0.0_f64..100.0,
        delta in -LOOP_LENGTH..LOOP_LENGTH,
    ) {
        let config = RailwayConfig::default_layout();
        let state = RailwayState::new(&config);
        let start = TrackPosition {
            section: SectionId::new("s0"),
            target_junction: JunctionId::new("j1"),
            mileage: start_mileage,
        };

        let forward = advance(&config, &state, &start, delta);
        let back = advance(&config, &state, &forward, -delta);

        prop_assert_eq!(back.section, start.section);
        prop_assert_eq!(back.target_junction, start.target_junction);
        prop_assert!((back.mileage - start.mileage).abs() < 1e-6);
    }

    /// `put_train(t, pos); read(t) = pos` (spec.md §8): regardless of where a
    /// train started, jumping it to a position tag reseats it exactly at
    /// that tag's stored coordinates.
    #[test]
    fn put_train_read_back_matches_stored_position(
        start_mileage in 0.0_f64..100.0,
        use_position_0 in any::<bool>(),
    ) {
        let config = RailwayConfig::default_layout();
        let mut railroad = Railroad::new(config);
        let train = TrainId::new("t0");
        railroad
            .place_train(train.clone(), SectionId::new("s0"), JunctionId::new("j1"), start_mileage)
            .unwrap();

        let position_id = if use_position_0 {
            PositionId::new("position_0")
        } else {
            PositionId::new("position_1")
        };
        railroad.put_train(&train, &position_id);

        let expected = &railroad.config().positions[&position_id];
        let got = &railroad.state().trains[&train];
        prop_assert_eq!(&got.section, &expected.section);
        prop_assert_eq!(&got.target_junction, &expected.target_junction);
        prop_assert_eq!(got.mileage, expected.mileage);
    }

    /// Mileage stays within section bounds (invariant 1) and the speed
    /// command never exceeds `MAX_SPEED` nor accelerates faster than
    /// `NORMAL_ACCEL * LOOP_PERIOD` per tick (invariants 4 and 5), across an
    /// arbitrary sequence of `update()`/`move_train` calls.
    #[test]
    fn invariants_hold_across_random_tick_sequences(
        deltas in prop::collection::vec(-60.0_f64..60.0, 1..30),
    ) {
        let config = RailwayConfig::default_layout();
        let mut railroad = Railroad::new(config);
        let train = TrainId::new("t0");
        railroad
            .place_train(train.clone(), SectionId::new("s0"), JunctionId::new("j1"), 0.0)
            .unwrap();

        let mut previous_speed = 0.0;
        for delta in deltas {
            railroad.move_train(&train, delta);
            railroad.tick(1);
            railroad.update();

            let state = railroad.state();
            let train_state = &state.trains[&train];
            let section_length = railroad.config().sections[&train_state.current_section].length;
            prop_assert!(train_state.mileage >= -1e-9 && train_state.mileage <= section_length + 1e-9);

            let speed = railroad.command().trains[&train].speed;
            prop_assert!(speed <= MAX_SPEED + 1e-9);
            prop_assert!(speed - previous_speed <= NORMAL_ACCEL * LOOP_PERIOD + 1e-9);
            previous_speed = speed;
        }
    }
}
