// Bridge configuration.
//
// Constructed explicitly by the host application and passed into
// `SchoolBridge::new` — there is no module-level state. Store clients are
// injected separately as trait objects; their lifecycle belongs to the host.

use schoolbridge_core::logger::LoggerConfig;

/// Top-level configuration for the auth bridge.
#[derive(Debug, Clone, Default)]
pub struct BridgeOptions {
    /// Logger configuration shared by the adapter, linker, and guard.
    pub logger: LoggerConfig,

    /// Clock-skew allowance, in seconds, applied when the guard checks
    /// session expiry. A session is accepted while
    /// `expires_at + skew > now`. Default: 0.
    pub session_clock_skew_secs: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = BridgeOptions::default();
        assert_eq!(options.session_clock_skew_secs, 0);
        assert!(!options.logger.disabled);
    }
}
