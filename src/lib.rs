//! Terminal task timer. Pick a task, start and pause the stopwatch, and reset it to add the
//! elapsed time to that task's running total.
//!

pub mod cli;
pub mod session;
pub mod utils;
pub mod view;
