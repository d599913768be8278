use super::constants::{DEFAULT_RECONNECT_ATTEMPTS, DEFAULT_RECONNECT_DELAY_MS};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReconnectPolicy {
    /// Consecutive failed connections (the first one included) before giving up.
    pub max_attempts: u32,
    /// Delay unit; the n-th retry waits `n * base_delay_ms`.
    pub base_delay_ms: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_RECONNECT_ATTEMPTS,
            base_delay_ms: DEFAULT_RECONNECT_DELAY_MS,
        }
    }
}

impl ReconnectPolicy {
    #[inline]
    pub fn delay_ms(&self, attempt: u32) -> u32 {
        self.base_delay_ms.saturating_mul(attempt)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// What to do after the socket went away.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReconnectDecision {
    Retry { attempt: u32, delay_ms: u32 },
    GiveUp,
    /// Duplicate notification for a failure already handled (error then close).
    Ignore,
}

/// Transport-independent connection lifecycle with linear backoff.
#[derive(Clone, Debug)]
pub struct Connection {
    policy: ReconnectPolicy,
    state: ConnectionState,
    failures: u32,
    exhausted: bool,
}

impl Connection {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self {
            policy,
            state: ConnectionState::Disconnected,
            failures: 0,
            exhausted: false,
        }
    }

    /// Enter `Connecting`. Refused once the retry budget is spent.
    pub fn begin_connect(&mut self) -> bool {
        if self.exhausted {
            return false;
        }
        self.state = ConnectionState::Connecting;
        true
    }

    pub fn on_open(&mut self) {
        self.state = ConnectionState::Connected;
        self.failures = 0;
    }

    /// Socket closed or errored.
    pub fn on_closed(&mut self) -> ReconnectDecision {
        if self.state == ConnectionState::Disconnected {
            return ReconnectDecision::Ignore;
        }
        self.state = ConnectionState::Disconnected;
        self.failures += 1;
        if self.failures >= self.policy.max_attempts {
            self.exhausted = true;
            return ReconnectDecision::GiveUp;
        }
        ReconnectDecision::Retry {
            attempt: self.failures,
            delay_ms: self.policy.delay_ms(self.failures),
        }
    }

    #[inline]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    #[inline]
    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    #[inline]
    pub fn failures(&self) -> u32 {
        self.failures
    }

    #[inline]
    pub fn policy(&self) -> &ReconnectPolicy {
        &self.policy
    }

    /// Short label for the status line.
    pub fn status_label(&self) -> String {
        match self.state {
            ConnectionState::Connected => "Connected".to_string(),
            ConnectionState::Connecting if self.failures == 0 => "Connecting…".to_string(),
            ConnectionState::Connecting => format!(
                "Reconnecting ({}/{})…",
                self.failures, self.policy.max_attempts
            ),
            ConnectionState::Disconnected if self.exhausted => "Offline".to_string(),
            ConnectionState::Disconnected => "Disconnected".to_string(),
        }
    }
}
