use chrono::{DateTime, Duration, Utc};

use crate::domain::subscriber::Subscriber;

/// Window used to count a subscriber as "new" on the dashboard.
pub const NEW_SUBSCRIBER_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriberStats {
    pub total: usize,
    pub active: usize,
    pub inactive: usize,
    pub unsubscribed: usize,
    pub new_last_30_days: usize,
    /// Percentage of subscribers that are active, 0 when there are none.
    pub retention_rate: f64,
}

impl SubscriberStats {
    pub fn from_subscribers(subscribers: &[Subscriber], now: DateTime<Utc>) -> SubscriberStats {
        let window_start = now - Duration::days(NEW_SUBSCRIBER_WINDOW_DAYS);
        let mut stats = SubscriberStats::default();

        for subscriber in subscribers {
            stats.total += 1;

            if subscriber.status.is_active() {
                stats.active += 1;
            } else if subscriber.status.is_inactive() {
                stats.inactive += 1;
            } else if subscriber.status.is_unsubscribed() {
                stats.unsubscribed += 1;
            }

            if subscriber.signed_up_at >= window_start {
                stats.new_last_30_days += 1;
            }
        }

        if stats.total > 0 {
            stats.retention_rate = stats.active as f64 / stats.total as f64 * 100.0;
        }

        stats
    }
}
