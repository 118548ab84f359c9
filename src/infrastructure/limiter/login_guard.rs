use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::errors::AuthError;

#[derive(Debug, Default, Clone)]
struct Attempts {
    failures: u32,
    locked_until: Option<DateTime<Utc>>,
}

/// Per-account login lockout.
///
/// After `max_failures` consecutive failures the account is locked for
/// `lockout`; a successful login clears the counter. Keys are lower-cased
/// emails so lockout does not depend on how the address was typed.
#[derive(Debug, Clone)]
pub struct LoginGuard {
    attempts: Arc<DashMap<String, Attempts>>,
    max_failures: u32,
    lockout: Duration,
}

impl LoginGuard {
    pub fn new(max_failures: u32, lockout: Duration) -> Self {
        LoginGuard {
            attempts: Arc::new(DashMap::new()),
            max_failures: max_failures.max(1),
            lockout,
        }
    }

    /// Fails with the remaining lock time, in seconds, while locked out.
    pub fn check(&self, email: &str) -> Result<(), AuthError> {
        self.check_at(email, Utc::now())
    }

    pub fn check_at(&self, email: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        let key = normalize(email);
        let Some(mut entry) = self.attempts.get_mut(&key) else {
            return Ok(());
        };

        match entry.locked_until {
            Some(until) if until > now => Err(AuthError::LockedOut((until - now).num_seconds().max(1))),
            Some(_) => {
                // Lock expired, start counting again.
                *entry = Attempts::default();
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub fn record_failure(&self, email: &str) {
        self.record_failure_at(email, Utc::now());
    }

    pub fn record_failure_at(&self, email: &str, now: DateTime<Utc>) {
        let key = normalize(email);
        let mut entry = self.attempts.entry(key.clone()).or_default();
        entry.failures += 1;

        if entry.failures >= self.max_failures && entry.locked_until.is_none() {
            entry.locked_until = Some(now + self.lockout);
            tracing::warn!(account = %key, failures = entry.failures, "Account locked after repeated login failures");
        }
    }

    pub fn reset(&self, email: &str) {
        self.attempts.remove(&normalize(email));
    }
}

fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}
