//! `cdretry schedule` – print the backoff schedule of the configured policy.

use anyhow::Result;
use cdretry_core::retry::{JitterSource, RetryPolicy};

use super::jitter_for;

/// One line per wait: the wait after attempt n, its bounds and a sampled value.
pub(crate) fn schedule_lines(
    policy: &RetryPolicy,
    jitter: &mut dyn JitterSource,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for attempt in 1..policy.max_attempts() {
        let (low, high) = policy.delay_bounds(attempt)?;
        let sampled = policy.retry_delay(attempt, jitter)?;
        lines.push(format!(
            "after attempt {}: {} ms (range {}..={} ms)",
            attempt,
            sampled.as_millis(),
            low.as_millis(),
            high.as_millis()
        ));
    }
    Ok(lines)
}

pub fn run_schedule(policy: &RetryPolicy, seed: Option<u64>) -> Result<()> {
    println!(
        "max attempts {}, base delay {} ms, jitter up to {:.0}%",
        policy.max_attempts(),
        policy.base_delay().as_millis(),
        policy.jitter_ratio() * 100.0
    );
    let mut jitter = jitter_for(seed);
    let lines = schedule_lines(policy, &mut *jitter)?;
    if lines.is_empty() {
        println!("no retries: a single attempt is made");
    }
    for line in lines {
        println!("  {}", line);
    }
    Ok(())
}
