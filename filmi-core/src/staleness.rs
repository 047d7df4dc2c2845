use chrono::{DateTime, Duration, Utc};

/// Whether a cached record must be re-resolved.
///
/// A record whose age equals `window` exactly is still fresh; only a strictly
/// older one is stale. A timestamp ahead of `now` counts as fresh.
pub fn is_stale(
    last_updated: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    window: Duration,
) -> bool {
    match last_updated {
        None => true,
        Some(at) => now.signed_duration_since(at) > window,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn window() -> Duration {
        Duration::hours(24)
    }

    #[test]
    fn absent_timestamp_is_stale() {
        assert!(is_stale(None, Utc::now(), window()));
    }

    #[test]
    fn exactly_at_window_edge_is_fresh() {
        let now = Utc::now();
        assert!(!is_stale(Some(now - window()), now, window()));
    }

    #[test]
    fn just_under_window_is_fresh() {
        let now = Utc::now();
        let at = now - window() + Duration::milliseconds(1);
        assert!(!is_stale(Some(at), now, window()));
    }

    #[test]
    fn just_over_window_is_stale() {
        let now = Utc::now();
        let at = now - window() - Duration::milliseconds(1);
        assert!(is_stale(Some(at), now, window()));
    }

    #[test]
    fn future_timestamp_is_fresh() {
        let now = Utc::now();
        assert!(!is_stale(Some(now + Duration::minutes(5)), now, window()));
    }
}
