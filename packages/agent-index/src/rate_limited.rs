//! Rate-limited API wrapper.
//!
//! Wraps any [`AgentApi`] with a fixed-interval gate using the governor
//! crate: every call, successful or not, waits until at least `interval` has
//! passed since the previous call was let through. The quota has a burst
//! size of one, so idle time does not accumulate credit.
//!
//! Spacing is measured from one grant to the next, not from the end of the
//! previous response. A slow response eats into the following wait.

use async_trait::async_trait;
use governor::clock::Clock;
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use moltbook_client::{AgentProfile, Post, PostQuery};
use std::time::Duration;

use crate::error::ApiResult;
use crate::traits::api::AgentApi;

/// Default spacing between collaborator requests.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(1000);

/// Clock backed by `tokio::time`, so a paused test runtime drives the limiter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioClock;

impl Clock for TokioClock {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        tokio::time::Instant::now().into_std()
    }
}

type DirectRateLimiter =
    RateLimiter<NotKeyed, InMemoryState, TokioClock, NoOpMiddleware<std::time::Instant>>;

/// Sequential fixed-delay gate.
///
/// A zero interval disables limiting.
pub struct FixedIntervalGate {
    interval: Duration,
    limiter: Option<DirectRateLimiter>,
}

impl FixedIntervalGate {
    pub fn new(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval)
            .map(|quota| RateLimiter::direct_with_clock(quota, TokioClock));
        Self { interval, limiter }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until `interval` has elapsed since the previous grant.
    ///
    /// The first acquisition returns immediately.
    pub async fn acquire(&self) {
        let Some(limiter) = &self.limiter else {
            return;
        };
        while let Err(not_until) = limiter.check() {
            let wait = not_until.wait_time_from(TokioClock.now());
            tokio::time::sleep(wait).await;
        }
    }
}

/// An API wrapper that spaces out every request.
pub struct RateLimitedApi<A: AgentApi> {
    inner: A,
    gate: FixedIntervalGate,
}

impl<A: AgentApi> RateLimitedApi<A> {
    /// Wrap `api`, allowing one request per `interval`.
    pub fn new(api: A, interval: Duration) -> Self {
        Self {
            inner: api,
            gate: FixedIntervalGate::new(interval),
        }
    }

    /// The wrapped API.
    pub fn inner(&self) -> &A {
        &self.inner
    }
}

#[async_trait]
impl<A: AgentApi> AgentApi for RateLimitedApi<A> {
    async fn fetch_posts(&self, query: &PostQuery) -> ApiResult<Vec<Post>> {
        self.gate.acquire().await;
        self.inner.fetch_posts(query).await
    }

    async fn fetch_agent_profile(&self, name: &str) -> ApiResult<AgentProfile> {
        self.gate.acquire().await;
        self.inner.fetch_agent_profile(name).await
    }
}

/// Extension trait for easy rate limiting.
pub trait AgentApiExt: AgentApi + Sized {
    /// Wrap this API so requests are at least `interval` apart.
    fn rate_limited(self, interval: Duration) -> RateLimitedApi<Self> {
        RateLimitedApi::new(self, interval)
    }
}

impl<A: AgentApi + Sized> AgentApiExt for A {}
