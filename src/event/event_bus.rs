// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Event bus for broadcasting poller events.

use tokio::sync::broadcast;

use super::PollEvent;

/// Default channel capacity for the event bus.
const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Broadcasts [`PollEvent`]s to any number of subscribers.
///
/// A slow subscriber that falls more than the channel capacity behind
/// loses the oldest events and sees `RecvError::Lagged`. Sweep results are
/// also available through the dataset watch channel, which never lags.
///
/// # Examples
///
/// ```
/// use gmg_cloud::event::{EventBus, PollEvent};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PollEvent::SweepFailed { error: "offline".to_string() });
/// assert!(rx.try_recv().unwrap().is_sweep());
/// ```
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<PollEvent>,
}

impl EventBus {
    /// Creates a new event bus with default capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Creates a new event bus buffering up to `capacity` events.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Subscribes to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publishes an event to all subscribers.
    ///
    /// Without subscribers the event is discarded.
    pub fn publish(&self, event: PollEvent) {
        // No subscribers is not an error.
        let _ = self.sender.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::poller::Cadence;

    fn interval_event() -> PollEvent {
        PollEvent::IntervalChanged {
            cadence: Cadence::Idle,
            interval: Duration::from_secs(60),
        }
    }

    #[test]
    fn subscriber_count_follows_receivers() {
        let bus = EventBus::new();
        assert_eq!(bus.subscriber_count(), 0);

        let rx1 = bus.subscribe();
        let _rx2 = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 2);

        drop(rx1);
        assert_eq!(bus.subscriber_count(), 1);
    }

    #[tokio::test]
    async fn publish_delivers_to_every_subscriber() {
        let bus = EventBus::new();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(interval_event());

        for rx in [&mut rx1, &mut rx2] {
            match rx.recv().await.unwrap() {
                PollEvent::IntervalChanged { cadence, interval } => {
                    assert_eq!(cadence, Cadence::Idle);
                    assert_eq!(interval, Duration::from_secs(60));
                }
                other => panic!("unexpected event: {other:?}"),
            }
        }
    }

    #[test]
    fn publish_without_subscribers_is_silent() {
        EventBus::new().publish(interval_event());
    }

    #[test]
    fn clone_shares_same_channel() {
        let bus1 = EventBus::with_capacity(8);
        let bus2 = bus1.clone();

        let mut rx = bus1.subscribe();
        bus2.publish(interval_event());

        assert!(rx.try_recv().is_ok());
    }
}
