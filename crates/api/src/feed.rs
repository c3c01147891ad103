// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Overview statistics, the activity feed and notifications.

use crate::dashboard::Dashboard;
use itouru_domain::{
    Activity, ActivityFeedItem, DashboardStats, Fields, Notification, NotificationItem, RecordId,
    mock_activities, mock_notifications, mock_stats,
};
use itouru_persistence::{FEED_REQUEST_TIMEOUT, LogicalTable, Persistence, PersistenceError};
use serde_json::Value;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, error, info, warn};

/// Default number of feed entries.
pub const DEFAULT_ACTIVITY_LIMIT: usize = 10;

/// Counts a logical table.
///
/// An absent table, or one the backend refuses to count, counts as zero.
/// Transport failures and timeouts are returned.
async fn count_or_zero(
    persistence: &Persistence,
    logical: LogicalTable,
) -> Result<u64, PersistenceError> {
    match persistence.count(logical).await {
        Err(e @ (PersistenceError::TableUnresolvable(_) | PersistenceError::Backend { .. })) => {
            debug!("counting {} as 0: {}", logical, e);
            Ok(0)
        }
        result => result,
    }
}

fn read_changes() -> Fields {
    let read_at: Value = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_or(Value::Null, Value::from);

    let mut changes: Fields = Fields::new();
    changes.insert(String::from("is_read"), Value::Bool(true));
    changes.insert(String::from("read_at"), read_at);
    changes
}

impl Dashboard {
    /// Headline counts.
    ///
    /// The four counts run concurrently under a single request timeout. A
    /// timeout or transport failure, and demo mode, yields the placeholder
    /// statistics.
    pub async fn stats(&self) -> DashboardStats {
        let Some(persistence) = self.persistence() else {
            return mock_stats();
        };

        let counts = futures::future::try_join4(
            count_or_zero(persistence, LogicalTable::Users),
            count_or_zero(persistence, LogicalTable::Buildings),
            count_or_zero(persistence, LogicalTable::ContentItems),
            count_or_zero(persistence, LogicalTable::Tours),
        );

        match tokio::time::timeout(persistence.request_timeout(), counts).await {
            Ok(Ok((total_users, buildings_mapped, content_items, tour_views))) => {
                let stats: DashboardStats = DashboardStats {
                    total_users,
                    buildings_mapped,
                    content_items,
                    tour_views,
                };
                info!("stats retrieved: {:?}", stats);
                stats
            }
            Ok(Err(e)) => {
                error!("error fetching dashboard stats: {}", e);
                mock_stats()
            }
            Err(_) => {
                error!(
                    "dashboard stats timed out after {:?}",
                    persistence.request_timeout()
                );
                mock_stats()
            }
        }
    }

    /// The most recent activities, newest first.
    ///
    /// Demo mode, an absent activity table and any read failure yield the
    /// placeholder feed.
    pub async fn activities(&self, limit: usize) -> Vec<ActivityFeedItem> {
        let placeholder = || -> Vec<ActivityFeedItem> {
            mock_activities().into_iter().take(limit).collect()
        };
        let Some(persistence) = self.persistence() else {
            return placeholder();
        };
        if persistence.schema().table(LogicalTable::Activities).is_none() {
            info!("activities table not configured, using placeholder feed");
            return placeholder();
        }

        let repository = persistence.repository::<Activity>();
        let read = repository.list_limited(limit);
        match tokio::time::timeout(FEED_REQUEST_TIMEOUT, read).await {
            Ok(Ok(activities)) => {
                let now: OffsetDateTime = OffsetDateTime::now_utc();
                activities
                    .iter()
                    .map(|activity| ActivityFeedItem::from_activity(activity, now))
                    .collect()
            }
            Ok(Err(e)) => {
                info!("activities query failed, using placeholder feed: {}", e);
                placeholder()
            }
            Err(_) => {
                info!("activities query timed out, using placeholder feed");
                placeholder()
            }
        }
    }

    /// Notifications, newest first, optionally for one user.
    ///
    /// Demo mode, an absent table and any read failure yield the
    /// placeholder notifications.
    pub async fn notifications(&self, user: Option<&RecordId>) -> Vec<NotificationItem> {
        let Some(persistence) = self.persistence() else {
            return mock_notifications();
        };
        if persistence
            .schema()
            .table(LogicalTable::Notifications)
            .is_none()
        {
            info!("notifications table not configured, using placeholder notifications");
            return mock_notifications();
        }

        let repository = persistence.repository::<Notification>();
        let read = async {
            match user {
                Some(user) => repository.list_where("user_id", user.to_value()).await,
                None => repository.list().await,
            }
        };

        match tokio::time::timeout(FEED_REQUEST_TIMEOUT, read).await {
            Ok(Ok(notifications)) => {
                let now: OffsetDateTime = OffsetDateTime::now_utc();
                notifications
                    .iter()
                    .map(|notification| NotificationItem::from_notification(notification, now))
                    .collect()
            }
            Ok(Err(e)) => {
                info!("notifications query failed, using placeholders: {}", e);
                mock_notifications()
            }
            Err(_) => {
                info!("notifications query timed out, using placeholders");
                mock_notifications()
            }
        }
    }

    /// Marks one notification read.
    ///
    /// Demo mode and an absent table report success.
    pub async fn mark_notification_read(&self, id: &RecordId) -> bool {
        let Some(persistence) = self.persistence() else {
            debug!("demo mode, marked notification {} as read", id);
            return true;
        };
        if persistence
            .schema()
            .table(LogicalTable::Notifications)
            .is_none()
        {
            warn!("notifications table not found, skipping update");
            return true;
        }

        match persistence
            .repository::<Notification>()
            .update_where(&[("id", id.to_value())], read_changes())
            .await
        {
            Ok(_) => true,
            Err(e) => {
                error!("error marking notification {} as read: {}", id, e);
                false
            }
        }
    }

    /// Marks every unread notification read, optionally for one user.
    ///
    /// Demo mode and an absent table report success.
    pub async fn mark_all_notifications_read(&self, user: Option<&RecordId>) -> bool {
        let Some(persistence) = self.persistence() else {
            debug!("demo mode, marked all notifications as read");
            return true;
        };
        if persistence
            .schema()
            .table(LogicalTable::Notifications)
            .is_none()
        {
            warn!("notifications table not found, skipping update");
            return true;
        }

        let mut filters: Vec<(&str, Value)> = vec![("is_read", Value::Bool(false))];
        if let Some(user) = user {
            filters.push(("user_id", user.to_value()));
        }

        match persistence
            .repository::<Notification>()
            .update_where(&filters, read_changes())
            .await
        {
            Ok(updated) => {
                debug!("marked {} notification(s) as read", updated.len());
                true
            }
            Err(e) => {
                error!("error marking all notifications as read: {}", e);
                false
            }
        }
    }
}
