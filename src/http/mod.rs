//! HTTP client module
//!
//! Provides the single-shot transport used to fetch pages.
//!
//! # Features
//!
//! - **No Retries**: One network round trip per call; callers decide what to do on failure
//! - **Rate Limiting**: Token bucket rate limiter using governor
//! - **Status Classification**: Non-2xx responses and timeouts become typed errors

mod client;
mod rate_limit;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
