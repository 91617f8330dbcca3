//! bpcalc: backpack capacity tracking and greedy trail-kit fitting.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;
