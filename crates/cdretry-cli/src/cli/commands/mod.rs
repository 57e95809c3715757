//! CLI command handlers, one per file.

mod classify;
mod probe;
mod schedule;
mod simulate;

pub use classify::run_classify;
pub use probe::run_probe;
pub use schedule::run_schedule;
pub use simulate::run_simulate;

#[cfg(test)]
pub(crate) use classify::classify_row;
#[cfg(test)]
pub(crate) use schedule::schedule_lines;

use cdretry_core::retry::{JitterSource, RandJitter};

/// Jitter for commands that accept `--seed`.
fn jitter_for(seed: Option<u64>) -> Box<dyn JitterSource + Send> {
    match seed {
        Some(seed) => Box::new(RandJitter::seeded(seed)),
        None => Box::new(RandJitter::from_entropy()),
    }
}
