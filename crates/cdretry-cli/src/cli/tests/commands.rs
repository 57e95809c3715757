//! Tests for command helpers that do not touch the network.

use crate::cli::commands::{classify_row, schedule_lines};
use cdretry_core::retry::{ErrorClass, FixedJitter, RetryPolicy};
use std::time::Duration;

#[test]
fn classify_rows() {
    assert_eq!(
        classify_row("HTTP_502"),
        ("HTTP_502".to_string(), ErrorClass::Transient, true)
    );
    assert_eq!(
        classify_row("VALIDATION_ERROR"),
        ("VALIDATION_ERROR".to_string(), ErrorClass::Client, false)
    );
    assert_eq!(
        classify_row("TEAPOT"),
        ("TEAPOT".to_string(), ErrorClass::Unknown, false)
    );
}

#[test]
fn default_schedule_has_two_waits() {
    let lines = schedule_lines(&RetryPolicy::default(), &mut FixedJitter(0.0)).unwrap();
    assert_eq!(
        lines,
        vec![
            "after attempt 1: 1000 ms (range 1000..=1100 ms)",
            "after attempt 2: 2000 ms (range 2000..=2200 ms)",
        ]
    );
}

#[test]
fn single_attempt_policy_has_no_waits() {
    let policy = RetryPolicy::new(1, Duration::from_millis(500), 0.0).unwrap();
    assert!(schedule_lines(&policy, &mut FixedJitter(0.0)).unwrap().is_empty());
}
