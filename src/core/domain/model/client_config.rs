use std::time::Duration;

/// Tuning knobs shared by every request a manager makes.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Age after which a login ticket is refreshed before use. Proxmox
    /// tickets are valid for two hours.
    pub ticket_lifetime: Duration,
    /// Client-side request rate limit; `None` disables limiting.
    pub rate_limit: Option<RateLimitConfig>,
    /// Minimum `zxcvbn` score for passwords set through the manager.
    pub password_min_score: Option<zxcvbn::Score>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            ticket_lifetime: Duration::from_secs(2 * 60 * 60 - 5 * 60),
            rate_limit: None,
            password_min_score: None,
        }
    }
}

/// A token-bucket rate limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub requests_per_second: u32,
    pub burst_size: u32,
}
