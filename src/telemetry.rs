//! Telemetry helpers for applications embedding `chartloom`.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the host. With the `telemetry` feature these helpers install a compact
//! `fmt` subscriber.

/// Installs a subscriber filtered by `RUST_LOG`, falling back to `info`.
///
/// Returns `false` when the feature is disabled or a global subscriber is
/// already set.
#[must_use]
pub fn init_default_tracing() -> bool {
    init_tracing_with_filter("info")
}

/// Installs a subscriber filtered by `RUST_LOG`, falling back to `directives`
/// (e.g. `"chartloom=trace"`).
#[must_use]
pub fn init_tracing_with_filter(directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(directives));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .compact()
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directives;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::{init_default_tracing, init_tracing_with_filter};

    #[test]
    fn second_initialization_is_refused() {
        let _ = init_tracing_with_filter("chartloom=debug");
        assert!(!init_default_tracing());
    }
}
