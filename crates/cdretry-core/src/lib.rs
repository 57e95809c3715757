pub mod config;
pub mod logging;

pub mod error;
pub mod retry;
pub mod transport;

pub use error::{ErrorCode, TypedError};
pub use retry::{with_retry, Retrier, RetryError, RetryPolicy};
