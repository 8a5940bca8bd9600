/// Config/State/Command data model.
pub mod command;
pub mod config;
pub mod state;

/// Position arithmetic: `advance`, `next_hop`, `next_hop_strict`.
pub mod position;
/// Bounded forward searches for the nearest train and stop ahead.
pub mod forward_search;
/// Switch pattern selection and toggle lockout.
pub mod switch_director;
/// Per-train stop-target dwell/departure FSM.
pub mod stop_tracker;
/// ATP/ATO speed computation.
pub mod speed_profiler;

/// The orchestrator tying every component together behind `update()`.
pub mod railroad;

/// Default topology fixture used by the test suite.
#[cfg(test)]
pub mod fixtures;
