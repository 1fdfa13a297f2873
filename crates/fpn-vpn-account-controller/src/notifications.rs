// Copyright 2024 - Nym Technologies SA <contact@nymtech.net>
// SPDX-License-Identifier: GPL-3.0-only

use tokio::{
    runtime::{Handle, TryCurrentError},
    sync::broadcast::{self, error::RecvError},
};
use tokio_util::sync::CancellationToken;

use crate::services::VpnServices;

const NOTIFICATION_CHANNEL_CAPACITY: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppNotification {
    SubscriptionExpired,
}

/// Process wide notifications. Cheap to clone, every clone posts to the same subscribers.
#[derive(Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<AppNotification>,
}

impl NotificationBus {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(NOTIFICATION_CHANNEL_CAPACITY);
        NotificationBus { tx }
    }

    pub fn post(&self, notification: AppNotification) {
        tracing::debug!("Posting notification: {:?}", notification);
        if self.tx.send(notification).is_err() {
            tracing::debug!("No subscribers for {:?}", notification);
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AppNotification> {
        self.tx.subscribe()
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn spawn_expired_subscription_listener(
    notifications: &NotificationBus,
    services: VpnServices,
    cancel_token: CancellationToken,
) -> Result<(), TryCurrentError> {
    let runtime = Handle::try_current()?;
    let notification_rx = notifications.subscribe();
    runtime.spawn(run_expired_subscription_listener(
        notification_rx,
        services,
        cancel_token,
    ));
    Ok(())
}

// Expiry only stops connectivity, the account and everything persisted stays as is.
async fn run_expired_subscription_listener(
    mut notification_rx: broadcast::Receiver<AppNotification>,
    services: VpnServices,
    cancel_token: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                tracing::trace!("Received cancellation signal");
                break;
            }
            notification = notification_rx.recv() => match notification {
                Ok(AppNotification::SubscriptionExpired) => {
                    tracing::info!("Subscription expired");
                    services.stop_vpn_service();
                }
                Err(RecvError::Lagged(skipped)) => {
                    // Every notification we can miss is an expiry
                    tracing::warn!("Missed {} notifications, assuming subscription expired", skipped);
                    services.stop_vpn_service();
                }
                Err(RecvError::Closed) => {
                    tracing::debug!("Notification channel closed");
                    break;
                }
            }
        }
    }
    tracing::debug!("Expired subscription listener is exiting");
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::testing::TestServices;

    #[test]
    fn posting_without_subscribers_is_fine() {
        NotificationBus::new().post(AppNotification::SubscriptionExpired);
    }

    #[tokio::test]
    async fn missed_notifications_count_as_an_expiry() {
        let bus = NotificationBus::new();
        let services = TestServices::default();
        let cancel_token = CancellationToken::new();
        spawn_expired_subscription_listener(&bus, services.vpn_services(), cancel_token.clone())
            .unwrap();

        // The listener has not been polled yet, so it falls behind
        let posted = NOTIFICATION_CHANNEL_CAPACITY + 4;
        for _ in 0..posted {
            bus.post(AppNotification::SubscriptionExpired);
        }

        tokio::time::timeout(Duration::from_secs(5), async {
            while services.tunnel.stops() < NOTIFICATION_CHANNEL_CAPACITY + 1 {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap();
        services.assert_stopped(NOTIFICATION_CHANNEL_CAPACITY + 1);
        cancel_token.cancel();
    }

    #[tokio::test]
    async fn cancelled_listener_ignores_notifications() {
        let bus = NotificationBus::new();
        let services = TestServices::default();
        let cancel_token = CancellationToken::new();
        spawn_expired_subscription_listener(&bus, services.vpn_services(), cancel_token.clone())
            .unwrap();

        cancel_token.cancel();
        bus.post(AppNotification::SubscriptionExpired);
        tokio::time::sleep(Duration::from_millis(50)).await;

        services.assert_stopped(0);
    }

    #[test]
    fn listener_needs_a_runtime() {
        let bus = NotificationBus::new();
        let services = TestServices::default();

        let result =
            spawn_expired_subscription_listener(&bus, services.vpn_services(), CancellationToken::new());
        assert!(result.is_err());
    }
}
