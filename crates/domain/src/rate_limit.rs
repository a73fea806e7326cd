use std::collections::VecDeque;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use ticketdesk_core::{AppError, AppResult};

/// Ticket creation throttling parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RateLimitSettings {
    /// When false every check is allowed.
    pub enabled: bool,
    /// Maximum actions in any rolling hour.
    pub max_per_hour: u32,
    /// Maximum actions in any rolling 24 hours.
    pub max_per_day: u32,
    /// Minimum gap between two actions.
    pub cooldown_minutes: u32,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_per_hour: 3,
            max_per_day: 10,
            cooldown_minutes: 5,
        }
    }
}

impl RateLimitSettings {
    /// Validates limits before they are stored.
    pub fn validate(&self) -> AppResult<()> {
        if self.max_per_hour == 0 || self.max_per_day == 0 {
            return Err(AppError::Validation(
                "rateLimiting maxPerHour and maxPerDay must be greater than zero".to_owned(),
            ));
        }

        if self.max_per_hour > self.max_per_day {
            return Err(AppError::Validation(
                "rateLimiting maxPerHour must not exceed maxPerDay".to_owned(),
            ));
        }

        Ok(())
    }
}

/// Why a rate-limited action was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitReason {
    /// The cooldown since the previous action has not elapsed.
    Cooldown,
    /// The hourly window is full.
    HourlyLimit,
    /// The daily window is full.
    DailyLimit,
}

impl RateLimitReason {
    /// Returns a stable transport value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cooldown => "cooldown",
            Self::HourlyLimit => "hourly_limit",
            Self::DailyLimit => "daily_limit",
        }
    }
}

/// Outcome of a rate-limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    /// The action may proceed.
    Allowed,
    /// The action must be refused.
    Rejected {
        /// Which limit was hit.
        reason: RateLimitReason,
        /// Seconds until the limit no longer applies.
        remaining_seconds: i64,
    },
}

impl RateLimitDecision {
    /// Returns whether the action may proceed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }
}

/// Sliding-window counters for one actor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateLimitState {
    hourly: VecDeque<DateTime<Utc>>,
    daily: VecDeque<DateTime<Utc>>,
    last_action_at: Option<DateTime<Utc>>,
}

impl RateLimitState {
    /// Drops timestamps that left their window.
    pub fn prune(&mut self, now: DateTime<Utc>) {
        let hour_ago = now - Duration::hours(1);
        let day_ago = now - Duration::hours(24);

        while self.hourly.front().is_some_and(|at| *at <= hour_ago) {
            self.hourly.pop_front();
        }
        while self.daily.front().is_some_and(|at| *at <= day_ago) {
            self.daily.pop_front();
        }
    }

    /// Checks the limits without charging an action.
    ///
    /// Cooldown is checked first, then the hourly window, then the daily one.
    pub fn check(&mut self, settings: &RateLimitSettings, now: DateTime<Utc>) -> RateLimitDecision {
        if !settings.enabled {
            return RateLimitDecision::Allowed;
        }

        self.prune(now);

        if let Some(last_action_at) = self.last_action_at {
            let cooldown = Duration::minutes(i64::from(settings.cooldown_minutes));
            let elapsed = now - last_action_at;
            if elapsed < cooldown {
                return RateLimitDecision::Rejected {
                    reason: RateLimitReason::Cooldown,
                    remaining_seconds: ceil_seconds(cooldown - elapsed),
                };
            }
        }

        if let Some(oldest) = self.window_full(&self.hourly, settings.max_per_hour) {
            return RateLimitDecision::Rejected {
                reason: RateLimitReason::HourlyLimit,
                remaining_seconds: ceil_seconds(oldest + Duration::hours(1) - now),
            };
        }

        if let Some(oldest) = self.window_full(&self.daily, settings.max_per_day) {
            return RateLimitDecision::Rejected {
                reason: RateLimitReason::DailyLimit,
                remaining_seconds: ceil_seconds(oldest + Duration::hours(24) - now),
            };
        }

        RateLimitDecision::Allowed
    }

    /// Charges one successful action.
    pub fn record(&mut self, now: DateTime<Utc>) {
        self.hourly.push_back(now);
        self.daily.push_back(now);
        self.last_action_at = Some(now);
    }

    /// Returns whether the state holds nothing that could still reject an action.
    #[must_use]
    pub fn is_idle(&self, now: DateTime<Utc>) -> bool {
        let day_ago = now - Duration::hours(24);
        self.daily.iter().all(|at| *at <= day_ago)
            && self.last_action_at.is_none_or(|at| at <= day_ago)
    }

    /// Returns the number of actions inside the hourly window as of the last prune.
    #[must_use]
    pub fn hourly_count(&self) -> usize {
        self.hourly.len()
    }

    /// Returns the number of actions inside the daily window as of the last prune.
    #[must_use]
    pub fn daily_count(&self) -> usize {
        self.daily.len()
    }

    fn window_full(&self, window: &VecDeque<DateTime<Utc>>, limit: u32) -> Option<DateTime<Utc>> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        if window.len() >= limit {
            window.front().copied()
        } else {
            None
        }
    }
}

fn ceil_seconds(duration: Duration) -> i64 {
    let milliseconds = duration.num_milliseconds().max(0);
    ((milliseconds + 999) / 1000).max(1)
}
