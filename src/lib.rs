//! Decision core of a model-railway Positive Train Control supervisor.
//!
//! This crate holds the topology model, position arithmetic, switch
//! director, forward search, stop-target tracker and ATP/ATO speed profiler
//! behind a single synchronous [`control::rail_system::railroad::Railroad`]
//! orchestrator. It does not talk to hardware, persist configuration, or
//! define a wire format — it is a pure function of the config/state/command
//! values an adapter process feeds it.
pub mod control;
/// Opaque IDs and closed enums shared by every value space.
pub mod general;

pub use error::ControlError;

mod error;
