//! `cdretry simulate` – run a scripted failing operation through the retrier.

use std::sync::atomic::{AtomicU32, Ordering};

use anyhow::Result;
use cdretry_core::error::TypedError;
use cdretry_core::retry::{Retrier, RetryPolicy};

use super::jitter_for;

pub async fn run_simulate(
    policy: &RetryPolicy,
    code: &str,
    failures: u32,
    seed: Option<u64>,
) -> Result<()> {
    let calls = AtomicU32::new(0);
    let retrier = Retrier::new(*policy).with_jitter(jitter_for(seed));
    let started = tokio::time::Instant::now();

    let result = retrier
        .run(Some("simulate"), None, || {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            let elapsed = started.elapsed().as_millis();
            let outcome = if n <= failures {
                println!("attempt {} at +{} ms: fails with {}", n, elapsed, code);
                Err(TypedError::new(code, format!("simulated failure {}", n)))
            } else {
                println!("attempt {} at +{} ms: succeeds", n, elapsed);
                Ok(n)
            };
            std::future::ready(outcome)
        })
        .await;

    match result {
        Ok(n) => {
            println!("succeeded after {} attempt(s)", n);
            Ok(())
        }
        Err(e) => {
            println!(
                "gave up after {} attempt(s): {}",
                calls.load(Ordering::SeqCst),
                e
            );
            Err(e.into())
        }
    }
}
