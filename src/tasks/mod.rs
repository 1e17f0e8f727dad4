//! Background tasks
//!
//! Long-running helpers started by the binaries.

mod sweeper;

pub use sweeper::{spawn_sweeper, SweeperHandle};
