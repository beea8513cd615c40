//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Minimum Argon2id memory cost in KiB (64 MiB).
pub const MIN_MEMORY_COST_KIB: u32 = 65536;

/// Minimum Argon2id iteration count.
pub const MIN_TIME_COST: u32 = 3;

/// Authentication and credential configuration.
///
/// The two signing secrets are independent on purpose: a leaked access
/// token cannot be replayed against the refresh endpoint, and rotating
/// the refresh secret invalidates only long-lived credentials.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for access token signing (HMAC-SHA256). Required.
    pub access_secret: String,
    /// Secret key for refresh token signing (HMAC-SHA256). Required.
    pub refresh_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Argon2id memory cost in KiB. Clamped to [`MIN_MEMORY_COST_KIB`].
    #[serde(default = "default_memory_cost")]
    pub argon_memory_cost_kib: u32,
    /// Argon2id iteration count. Clamped to [`MIN_TIME_COST`].
    #[serde(default = "default_time_cost")]
    pub argon_time_cost: u32,
}

impl AuthConfig {
    /// Effective Argon2 memory cost: the configured value, floored.
    pub fn memory_cost(&self) -> u32 {
        self.argon_memory_cost_kib.max(MIN_MEMORY_COST_KIB)
    }

    /// Effective Argon2 time cost: the configured value, floored.
    pub fn time_cost(&self) -> u32 {
        self.argon_time_cost.max(MIN_TIME_COST)
    }
}

fn default_access_ttl() -> u64 {
    5
}

fn default_refresh_ttl() -> u64 {
    30
}

fn default_memory_cost() -> u32 {
    MIN_MEMORY_COST_KIB
}

fn default_time_cost() -> u32 {
    MIN_TIME_COST
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(memory: u32, time: u32) -> AuthConfig {
        AuthConfig {
            access_secret: "a".into(),
            refresh_secret: "r".into(),
            access_ttl_minutes: 5,
            refresh_ttl_days: 30,
            argon_memory_cost_kib: memory,
            argon_time_cost: time,
        }
    }

    #[test]
    fn argon_params_are_floored() {
        let cfg = config_with(1024, 1);
        assert_eq!(cfg.memory_cost(), MIN_MEMORY_COST_KIB);
        assert_eq!(cfg.time_cost(), MIN_TIME_COST);
    }

    #[test]
    fn argon_params_above_floor_pass_through() {
        let cfg = config_with(131072, 4);
        assert_eq!(cfg.memory_cost(), 131072);
        assert_eq!(cfg.time_cost(), 4);
    }
}
