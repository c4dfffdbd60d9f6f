use std::time::Duration;

/// Reconnect schedule for a feed connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub initial_delay: Duration,
    pub max_delay: Duration,
    /// Consecutive failed attempts tolerated before giving up.
    pub max_retries: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            max_retries: 10,
        }
    }
}

/// Exponential backoff state: the delay doubles per failure up to
/// `max_delay` and both delay and retry count reset on a good connection.
#[derive(Debug)]
pub struct Backoff {
    policy: ReconnectPolicy,
    next: Duration,
    retries: u32,
}

impl Backoff {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            next: policy.initial_delay,
            retries: 0,
        }
    }

    /// Delay before the next attempt, or `None` once retries are exhausted.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.retries >= self.policy.max_retries {
            return None;
        }

        let delay = self.next;
        self.retries += 1;
        self.next = (self.next * 2).min(self.policy.max_delay);
        Some(delay)
    }

    pub fn reset(&mut self) {
        self.next = self.policy.initial_delay;
        self.retries = 0;
    }

    pub fn retries(&self) -> u32 {
        self.retries
    }
}
