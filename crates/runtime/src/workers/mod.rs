//! Worker tasks that back the runtime orchestration.
//!
//! The simulation worker owns the state and the stand-in world and executes
//! every gameplay command in arrival order.

mod simulation;

pub use simulation::{Command, SimulationWorker};
