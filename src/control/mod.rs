/// The rail system: topology, position arithmetic and the `Railroad`
/// orchestrator.
pub mod rail_system;
