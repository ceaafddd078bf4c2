use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

pub const DAY_LIMIT_HEADER: &str = "x-rate-limit-day";
pub const MINUTE_LIMIT_HEADER: &str = "x-rate-limit-minute";
pub const DAY_RESET_HEADER: &str = "x-rate-limit-day-reset";
pub const MINUTE_RESET_HEADER: &str = "x-rate-limit-minute-reset";

pub const DEFAULT_TTL_FLOOR: Duration = Duration::from_secs(10);
pub const DEFAULT_TTL_CEILING: Duration = Duration::from_secs(60);

/// Request budget advertised by the ranking API on its last response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitInfo {
    pub requests_per_day: Option<u32>,
    pub requests_per_minute: Option<u32>,
    pub day_reset_at: Option<DateTime<Utc>>,
    pub minute_reset_at: Option<DateTime<Utc>>,
    pub observed_at: DateTime<Utc>,
}

impl RateLimitInfo {
    /// Reads the `x-rate-limit-*` headers. Returns `None` when none of them
    /// is present or parseable.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let info = Self {
            requests_per_day: header_number(headers, DAY_LIMIT_HEADER),
            requests_per_minute: header_number(headers, MINUTE_LIMIT_HEADER),
            day_reset_at: header_number(headers, DAY_RESET_HEADER)
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            minute_reset_at: header_number(headers, MINUTE_RESET_HEADER)
                .and_then(|secs| DateTime::from_timestamp(secs, 0)),
            observed_at: Utc::now(),
        };

        let empty = info.requests_per_day.is_none()
            && info.requests_per_minute.is_none()
            && info.day_reset_at.is_none()
            && info.minute_reset_at.is_none();

        (!empty).then_some(info)
    }
}

fn header_number<T: FromStr>(headers: &HeaderMap, name: &str) -> Option<T> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}

/// Subscription tier, used only to seed the budget before the first response
/// has been observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlanTier {
    Discover,
    #[default]
    Individual,
    Builder,
    Enterprise,
}

impl PlanTier {
    pub fn assumed_requests_per_minute(self) -> u32 {
        match self {
            PlanTier::Discover => 4,
            PlanTier::Individual => 10,
            PlanTier::Builder => 100,
            PlanTier::Enterprise => 500,
        }
    }
}

impl fmt::Display for PlanTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlanTier::Discover => write!(f, "discover"),
            PlanTier::Individual => write!(f, "individual"),
            PlanTier::Builder => write!(f, "builder"),
            PlanTier::Enterprise => write!(f, "enterprise"),
        }
    }
}

impl FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "discover" | "free" => Ok(PlanTier::Discover),
            "individual" => Ok(PlanTier::Individual),
            "builder" => Ok(PlanTier::Builder),
            "enterprise" => Ok(PlanTier::Enterprise),
            other => Err(format!("unknown LunarCrush plan: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RateLimitState {
    Unknown,
    Estimated(RateLimitInfo),
}

/// Tracks the ranking API's per-minute budget and turns it into a cache TTL.
///
/// Last observation wins; there is no averaging between responses.
#[derive(Debug)]
pub struct RateLimitTracker {
    state: RwLock<RateLimitState>,
    floor: Duration,
    ceiling: Duration,
    fallback: Duration,
}

impl RateLimitTracker {
    pub fn new(plan: PlanTier) -> Self {
        Self::with_bounds(plan, DEFAULT_TTL_FLOOR, DEFAULT_TTL_CEILING)
    }

    pub fn with_bounds(plan: PlanTier, floor: Duration, ceiling: Duration) -> Self {
        let ceiling = ceiling.max(floor);
        let fallback = clamp_budget(Some(plan.assumed_requests_per_minute()), floor, ceiling);

        Self {
            state: RwLock::new(RateLimitState::Unknown),
            floor,
            ceiling,
            fallback,
        }
    }

    /// Updates the estimate from a response's headers, successful or not.
    /// Returns whether the headers carried any limit information.
    pub fn observe(&self, headers: &HeaderMap) -> bool {
        match RateLimitInfo::from_headers(headers) {
            Some(info) => {
                self.record(info);
                true
            }
            None => false,
        }
    }

    pub fn record(&self, info: RateLimitInfo) {
        debug!(
            per_minute = ?info.requests_per_minute,
            per_day = ?info.requests_per_day,
            "rate limit observed"
        );
        *self.state.write() = RateLimitState::Estimated(info);
    }

    pub fn state(&self) -> RateLimitState {
        self.state.read().clone()
    }

    pub fn snapshot(&self) -> Option<RateLimitInfo> {
        match &*self.state.read() {
            RateLimitState::Estimated(info) => Some(info.clone()),
            RateLimitState::Unknown => None,
        }
    }

    /// `60s / per-minute budget`, kept within `[floor, ceiling]`.
    pub fn current_ttl(&self) -> Duration {
        match &*self.state.read() {
            RateLimitState::Estimated(info) => {
                clamp_budget(info.requests_per_minute, self.floor, self.ceiling)
            }
            RateLimitState::Unknown => self.fallback,
        }
    }
}

fn clamp_budget(requests_per_minute: Option<u32>, floor: Duration, ceiling: Duration) -> Duration {
    match requests_per_minute.filter(|&budget| budget > 0) {
        Some(budget) => (Duration::from_secs(60) / budget).clamp(floor, ceiling),
        None => floor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(*name, HeaderValue::from_str(value).expect("header value"));
        }
        headers
    }

    #[test]
    fn parses_all_four_headers() {
        let info = RateLimitInfo::from_headers(&headers(&[
            (DAY_LIMIT_HEADER, "2000"),
            (MINUTE_LIMIT_HEADER, "10"),
            (DAY_RESET_HEADER, "1735776000"),
            (MINUTE_RESET_HEADER, "1735689660"),
        ]))
        .expect("info");

        assert_eq!(info.requests_per_day, Some(2000));
        assert_eq!(info.requests_per_minute, Some(10));
        assert_eq!(info.day_reset_at.map(|t| t.timestamp()), Some(1_735_776_000));
        assert_eq!(info.minute_reset_at.map(|t| t.timestamp()), Some(1_735_689_660));
    }

    #[test]
    fn unknown_state_uses_plan_fallback() {
        assert_eq!(RateLimitTracker::new(PlanTier::Individual).current_ttl(), Duration::from_secs(10));
        assert_eq!(RateLimitTracker::new(PlanTier::Discover).current_ttl(), Duration::from_secs(15));
        assert_eq!(RateLimitTracker::new(PlanTier::Builder).current_ttl(), Duration::from_secs(10));
    }

    #[test]
    fn ttl_follows_per_minute_budget() {
        let tracker = RateLimitTracker::new(PlanTier::Individual);

        assert!(tracker.observe(&headers(&[(MINUTE_LIMIT_HEADER, "2")])));
        assert_eq!(tracker.current_ttl(), Duration::from_secs(30));

        assert!(tracker.observe(&headers(&[(MINUTE_LIMIT_HEADER, "4")])));
        assert_eq!(tracker.current_ttl(), Duration::from_secs(15));
    }

    #[test]
    fn generous_budget_is_clamped_to_floor() {
        let tracker = RateLimitTracker::new(PlanTier::Individual);
        tracker.observe(&headers(&[(MINUTE_LIMIT_HEADER, "600")]));
        assert_eq!(tracker.current_ttl(), DEFAULT_TTL_FLOOR);
    }

    #[test]
    fn zero_or_missing_minute_budget_clamps_to_floor() {
        let tracker = RateLimitTracker::new(PlanTier::Discover);

        tracker.observe(&headers(&[(MINUTE_LIMIT_HEADER, "0")]));
        assert_eq!(tracker.current_ttl(), DEFAULT_TTL_FLOOR);

        tracker.observe(&headers(&[(DAY_LIMIT_HEADER, "100")]));
        assert_eq!(tracker.current_ttl(), DEFAULT_TTL_FLOOR);
    }

    #[test]
    fn ceiling_caps_tiny_budgets() {
        let tracker = RateLimitTracker::with_bounds(
            PlanTier::Individual,
            Duration::from_secs(10),
            Duration::from_secs(20),
        );
        tracker.observe(&headers(&[(MINUTE_LIMIT_HEADER, "1")]));
        assert_eq!(tracker.current_ttl(), Duration::from_secs(20));
    }

    #[test]
    fn headers_without_limits_keep_previous_estimate() {
        let tracker = RateLimitTracker::new(PlanTier::Individual);
        tracker.observe(&headers(&[(MINUTE_LIMIT_HEADER, "3")]));

        assert!(!tracker.observe(&headers(&[("content-type", "application/json")])));
        assert_eq!(tracker.current_ttl(), Duration::from_secs(20));
        assert!(matches!(tracker.state(), RateLimitState::Estimated(_)));
    }

    #[test]
    fn parses_plan_names() {
        assert_eq!("Builder".parse::<PlanTier>(), Ok(PlanTier::Builder));
        assert_eq!("free".parse::<PlanTier>(), Ok(PlanTier::Discover));
        assert!("platinum".parse::<PlanTier>().is_err());
    }
}
