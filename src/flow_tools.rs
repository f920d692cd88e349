//! # Flow tools
//! Adaptive time stepping and global diagnostics, both evaluated
//! through dictionary handlers of the solver's evaluator.
pub mod cfl;
pub mod flow_property;
pub use cfl::Cfl;
pub use flow_property::GlobalFlowProperty;
