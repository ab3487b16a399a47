//! Team generation logic: the greedy balancer and its store-backed entry point.

mod balance;
mod generate;

pub use balance::{balance_teams, JITTER_MAX, MIN_PLAYERS};
pub use generate::generate_teams;
