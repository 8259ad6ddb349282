use governor::{
    Quota, RateLimiter as GovernorRateLimiter,
    clock::{QuantaClock, QuantaInstant},
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
};
use std::{num::NonZeroU32, time::Duration};

// No two requests to the profile sites closer together than this.
const MS_BETWEEN_REQ: Duration = Duration::from_millis(100);

type SpecificGovernorRateLimiter =
    GovernorRateLimiter<NotKeyed, InMemoryState, QuantaClock, NoOpMiddleware<QuantaInstant>>;

pub struct RateLimiter {
    req_per_sec: SpecificGovernorRateLimiter,
    ms_between_req: SpecificGovernorRateLimiter,
}

impl RateLimiter {
    pub fn new(req_per_sec: NonZeroU32) -> Self {
        // Limit to X total req/sec on average.
        let quota_per_sec = Quota::per_second(req_per_sec);
        let req_per_sec = GovernorRateLimiter::direct(quota_per_sec);

        // Limit to Y req/ms (i.e. no two requests closer than Y ms).
        let gap_quota = Quota::with_period(MS_BETWEEN_REQ).unwrap_or(quota_per_sec);
        let ms_between_req = GovernorRateLimiter::direct(gap_quota);

        RateLimiter {
            req_per_sec,
            ms_between_req,
        }
    }

    pub async fn wait_until_ready(&self) {
        // Average rate first, then the minimum gap. Awaiting them the other way
        // round lets a burst of callers that cleared the gap check stampede
        // through the per-second limiter together.
        self.req_per_sec.until_ready().await;
        self.ms_between_req.until_ready().await;
    }
}
