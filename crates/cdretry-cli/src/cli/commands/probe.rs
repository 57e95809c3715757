//! `cdretry probe` – GET a URL through the retrier.

use std::time::Duration;

use anyhow::Result;
use cdretry_core::retry::{classify, Retrier, RetryPolicy};
use cdretry_core::transport;
use tokio_util::sync::CancellationToken;

pub async fn run_probe(
    policy: &RetryPolicy,
    url: &str,
    label: Option<&str>,
    timeout: Duration,
) -> Result<()> {
    let cancel = CancellationToken::new();
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, cancelling pending retry");
                cancel.cancel();
            }
        });
    }

    let retrier = Retrier::new(*policy);
    let result = retrier
        .run(label.or(Some("probe")), Some(&cancel), || {
            transport::fetch(url, timeout)
        })
        .await;

    match result {
        Ok(response) => {
            println!("HTTP {} ({} bytes)", response.status, response.body.len());
            Ok(())
        }
        Err(e) => {
            if let Some(typed) = e.typed() {
                println!("failed: {} [{}]", typed, classify(typed).as_str());
                for (key, value) in typed.details() {
                    println!("  {}: {}", key, value);
                }
            }
            Err(e.into())
        }
    }
}
