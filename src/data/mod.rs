//! Remote data access: HTTP fetch client, run-scoped cache, cancellation.

pub mod cache;
pub mod cancel;
pub mod client;

#[cfg(test)]
pub(crate) mod testing;

pub use cache::{DataCache, SharedCache, shared_cache};
pub use cancel::CancelToken;
pub use client::{FetchClient, FetchOutcome, MindicadorSource, RetryPolicy, SeriesSource};
