//! Typed failure records.
//!
//! Every failure that reaches the retry engine is first turned into a
//! [`TypedError`]: a stable string [`ErrorCode`], a human message, structured
//! details and the instant it was created. The code alone drives retry
//! classification; the rest is carried through untouched for callers.

mod code;
mod envelope;
mod typed;

pub use code::ErrorCode;
pub use typed::TypedError;
