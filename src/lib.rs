//! Robobrain: a line-oriented command interpreter for a simulated trading
//! robot.

pub mod brain;
pub mod config;
pub mod console;
pub mod lang;
