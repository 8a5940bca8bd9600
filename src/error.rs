//! The one recoverable fault the core can produce.
//!
//! Everything else that can go wrong at this layer is a topology violation:
//! a config that references a junction or joint that doesn't exist. Those
//! are programmer/config bugs with no legal recovery, so the position
//! arithmetic in [`crate::control::rail_system::position`] panics on them
//! instead of threading a `Result` through every call site.

use crate::general::{JunctionId, SectionId, TrainId};
use thiserror::Error;

/// Fault surfaced to a caller of the orchestrator.
#[derive(Debug, Error)]
pub enum ControlError {
    /// A train's (or stop's, or position's) `target_junction` is not one of
    /// the two endpoints of the section it claims to sit on.
    #[error(
        "train {train} targets junction {target_junction}, which is not an endpoint of section {section}"
    )]
    DanglingTargetJunction {
        train: TrainId,
        section: SectionId,
        target_junction: JunctionId,
    },

    /// Same violation as `DanglingTargetJunction`, raised from inside
    /// position arithmetic where no particular train is implicated (e.g.
    /// while walking a junction's own section wiring).
    #[error("target junction {target_junction} is not an endpoint of section {section}")]
    DanglingJunctionReference {
        section: SectionId,
        target_junction: JunctionId,
    },

    /// A junction's config does not wire any of its three joints to the
    /// section a caller claims to have entered from.
    #[error("junction {junction} has no joint wired to section {section}")]
    UnknownEntryJoint {
        junction: JunctionId,
        section: SectionId,
    },

    /// The switch director found no selection rule whose guard matched the
    /// observed world. Recoverable: the orchestrator leaves
    /// `command.junctions` unchanged for the tick and logs the fault rather
    /// than aborting.
    #[error("switch director found no pattern rule matching the observed world")]
    InconsistentWorld,

    /// A train was placed that isn't declared in `config.trains`. Caught at
    /// the `place_train` call site rather than left to surface later as an
    /// `Index` panic in the speed profiler, which only ever looks up
    /// commands for trains `config.trains` declares.
    #[error("train {train} is not declared in this config's trains")]
    UnknownTrain { train: TrainId },
}
