//! `cdretry classify` – show retry class per error code.

use cdretry_core::retry::{classify_str, ErrorClass};

/// One output row: code, class, retryable.
pub(crate) fn classify_row(code: &str) -> (String, ErrorClass, bool) {
    let class = classify_str(code);
    (code.to_string(), class, class.is_retryable())
}

pub fn run_classify(codes: &[String]) {
    println!("{:<20} {:<10} {}", "CODE", "CLASS", "RETRYABLE");
    for code in codes {
        let (code, class, retryable) = classify_row(code);
        println!(
            "{:<20} {:<10} {}",
            code,
            class.as_str(),
            if retryable { "yes" } else { "no" }
        );
    }
}
