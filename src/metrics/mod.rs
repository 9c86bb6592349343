//! Simulated live-metrics feed for the dashboard.
//!
//! - [`generator`] draws random deltas (the stand-in for real telemetry)
//! - [`series`] holds the fixed 24-sample chart windows
//! - [`sales`] holds the capped newest-first recent-sales list
//! - [`updater`] owns the state and the interval timer that mutates it

pub mod generator;
pub mod sales;
pub mod series;
pub mod snapshot;
pub mod updater;

pub use updater::{Dashboard, Ticker};

use rand::SeedableRng;
use rand::rngs::StdRng;

/// A fixed-seed RNG when `seed` is set, otherwise one seeded from the OS.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
