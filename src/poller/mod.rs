// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adaptive polling of every grill in the directory.
//!
//! A [`Poller`] runs one timer loop. Each tick sweeps all cached grills
//! concurrently, publishes the resulting [`Dataset`] and then picks the
//! next interval with [`PollingCadence`]:
//!
//! | Cadence | When | Default |
//! |---------|------|---------|
//! | burst | a command was sent less than 30 s ago | 1 s |
//! | active | a grill was running at the last sweep | 2 s |
//! | idle | nothing was running | 60 s |
//! | fallback | before the first sweep | 30 s |

mod cadence;

pub use cadence::{Cadence, PollingCadence, PollingConfig};

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{Notify, broadcast, watch};
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::Instant;

use crate::auth::IdentityProvider;
use crate::cloud::GrillCloud;
use crate::error::{Error, Result};
use crate::event::{EventBus, PollEvent};
use crate::state::{Dataset, GrillEntry};

/// State shared between the poller handle and its timer loop.
#[derive(Debug)]
struct Shared<P> {
    cloud: Arc<GrillCloud<P>>,
    cadence: Mutex<PollingCadence>,
    dataset: watch::Sender<Option<Arc<Dataset>>>,
    events: EventBus,
    /// Wakes the loop so it re-reads the interval.
    wake: Notify,
    /// Asks the loop to sweep now.
    refresh: Notify,
    shutdown: watch::Sender<bool>,
    /// Held for the duration of a sweep.
    sweep_lock: tokio::sync::Mutex<()>,
}

/// Periodically refreshes the state of every grill in the directory.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use gmg_cloud::GrillCloud;
/// use gmg_cloud::auth::{CognitoIdentityProvider, Credentials};
/// use gmg_cloud::poller::{Poller, PollingConfig};
/// use gmg_cloud::protocol::CloudConfig;
///
/// # async fn example() -> gmg_cloud::Result<()> {
/// let cloud = Arc::new(GrillCloud::new(
///     CloudConfig::new(),
///     Credentials::new("cook@example.com", "secret"),
///     CognitoIdentityProvider::gmg()?,
/// )?);
/// cloud.authenticate().await?;
/// cloud.list_devices().await?;
///
/// let poller = Poller::new(cloud, PollingConfig::new());
/// let mut datasets = poller.watch();
/// poller.refresh().await?;
/// poller.start();
///
/// while datasets.changed().await.is_ok() {
///     if let Some(dataset) = datasets.borrow_and_update().clone() {
///         println!("{} grills, {} online", dataset.len(), dataset.online_count());
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Poller<P> {
    shared: Arc<Shared<P>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<P: IdentityProvider> Poller<P> {
    /// Creates a poller with its own event bus. The timer loop is not
    /// running until [`start`](Self::start).
    #[must_use]
    pub fn new(cloud: Arc<GrillCloud<P>>, config: PollingConfig) -> Self {
        Self::with_event_bus(cloud, config, EventBus::new())
    }

    /// Creates a poller publishing on an existing event bus.
    #[must_use]
    pub fn with_event_bus(cloud: Arc<GrillCloud<P>>, config: PollingConfig, events: EventBus) -> Self {
        let (dataset, _) = watch::channel(None);
        let (shutdown, _) = watch::channel(false);

        Self {
            shared: Arc::new(Shared {
                cloud,
                cadence: Mutex::new(PollingCadence::new(config)),
                dataset,
                events,
                wake: Notify::new(),
                refresh: Notify::new(),
                shutdown,
                sweep_lock: tokio::sync::Mutex::new(()),
            }),
            task: Mutex::new(None),
        }
    }

    /// Returns the cloud client.
    #[must_use]
    pub fn cloud(&self) -> &Arc<GrillCloud<P>> {
        &self.shared.cloud
    }

    /// Returns the interval settings.
    #[must_use]
    pub fn config(&self) -> PollingConfig {
        *self.shared.cadence.lock().config()
    }

    /// Returns the current polling interval.
    #[must_use]
    pub fn current_interval(&self) -> Duration {
        self.shared.cadence.lock().interval()
    }

    /// Returns the cadence governing the current interval.
    #[must_use]
    pub fn cadence(&self) -> Cadence {
        self.shared.cadence.lock().cadence()
    }

    /// Returns the last published dataset.
    #[must_use]
    pub fn dataset(&self) -> Option<Arc<Dataset>> {
        self.shared.dataset.borrow().clone()
    }

    /// Returns a receiver that sees every published dataset.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Option<Arc<Dataset>>> {
        self.shared.dataset.subscribe()
    }

    /// Subscribes to poller events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PollEvent> {
        self.shared.events.subscribe()
    }

    /// Returns the event bus.
    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.shared.events
    }

    /// Sweeps every grill now and publishes the dataset.
    ///
    /// Waits for a sweep already in progress to finish first.
    ///
    /// # Errors
    ///
    /// Returns error if any grill fetch raised (missing token, failed task).
    /// The previous dataset then stays published.
    pub async fn refresh(&self) -> Result<Arc<Dataset>> {
        self.shared.sweep().await
    }

    /// Switches to the burst interval for the configured burst duration.
    ///
    /// A burst already running is extended, never shortened. The timer loop
    /// is woken so that the shorter interval applies right away.
    pub fn request_burst(&self) {
        let (changed, cadence, interval, until) = {
            let mut state = self.shared.cadence.lock();
            let changed = state.request_burst(Instant::now());
            (changed, state.cadence(), state.interval(), state.burst_until())
        };

        tracing::debug!(?until, "Burst polling requested");

        if changed {
            self.shared.interval_changed(cadence, interval);
            self.shared.wake.notify_one();
        }
    }

    /// Asks the timer loop to sweep as soon as possible.
    ///
    /// Does nothing visible if the loop is not running.
    pub fn request_refresh(&self) {
        self.shared.refresh.notify_one();
    }

    /// Spawns the timer loop. Returns false if it is already running.
    pub fn start(&self) -> bool {
        let mut task = self.task.lock();
        if task.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        self.shared.shutdown.send_replace(false);
        let shared = Arc::clone(&self.shared);
        *task = Some(tokio::spawn(run(shared)));

        tracing::debug!(interval = ?self.current_interval(), "Poller started");
        true
    }

    /// Returns true while the timer loop is running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the timer loop and waits for it to exit.
    ///
    /// A sweep in progress is allowed to finish.
    pub async fn stop(&self) {
        self.shared.shutdown.send_replace(true);
        let handle = self.task.lock().take();

        if let Some(handle) = handle {
            if let Err(err) = handle.await {
                tracing::warn!(error = %err, "Poller task ended abnormally");
            }
            tracing::debug!("Poller stopped");
        }
    }
}

impl<P> Drop for Poller<P> {
    fn drop(&mut self) {
        self.shared.shutdown.send_replace(true);
    }
}

impl<P: IdentityProvider> Shared<P> {
    async fn sweep(&self) -> Result<Arc<Dataset>> {
        let _sweep = self.sweep_lock.lock().await;

        let devices = self.cloud.cached_devices();
        let mut tasks = JoinSet::new();
        for device in devices {
            let cloud = Arc::clone(&self.cloud);
            tasks.spawn(async move {
                let state = cloud.fetch_state(&device).await;
                (device, state)
            });
        }

        let mut entries = Vec::with_capacity(tasks.len());
        let mut failure = None;
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((device, Ok(state))) => entries.push(GrillEntry::new(device, state)),
                Ok((device, Err(err))) => {
                    tracing::warn!(grill_id = device.id(), error = %err, "Grill fetch failed");
                    failure.get_or_insert(err);
                }
                Err(err) => {
                    tracing::warn!(error = %err, "Grill fetch task failed");
                    failure.get_or_insert(Error::Task(err.to_string()));
                }
            }
        }

        if let Some(err) = failure {
            let previous_active = self
                .dataset
                .borrow()
                .as_ref()
                .is_some_and(|dataset| dataset.any_active());
            self.events.publish(PollEvent::SweepFailed {
                error: err.to_string(),
            });
            self.recompute(previous_active);
            return Err(err);
        }

        let dataset = Arc::new(Dataset::from_entries(entries));
        tracing::debug!(
            grills = dataset.len(),
            online = dataset.online_count(),
            any_active = dataset.any_active(),
            "Sweep completed"
        );

        self.dataset.send_replace(Some(Arc::clone(&dataset)));
        self.events.publish(PollEvent::SweepCompleted {
            dataset: Arc::clone(&dataset),
        });
        self.recompute(dataset.any_active());

        Ok(dataset)
    }

    fn recompute(&self, any_active: bool) {
        let change = {
            let mut state = self.cadence.lock();
            state
                .recompute(Instant::now(), any_active)
                .then(|| (state.cadence(), state.interval()))
        };

        if let Some((cadence, interval)) = change {
            self.interval_changed(cadence, interval);
        }
    }

    fn interval_changed(&self, cadence: Cadence, interval: Duration) {
        tracing::info!(%cadence, ?interval, "Polling interval changed");
        self.events
            .publish(PollEvent::IntervalChanged { cadence, interval });
    }

    fn interval(&self) -> Duration {
        self.cadence.lock().interval()
    }
}

/// Timer loop: sweeps whenever the interval since the last sweep elapsed,
/// re-reading the interval whenever it is woken.
async fn run<P: IdentityProvider>(shared: Arc<Shared<P>>) {
    let mut shutdown = shared.shutdown.subscribe();
    let mut last_sweep = Instant::now();

    loop {
        if *shutdown.borrow_and_update() {
            break;
        }

        let deadline = last_sweep + shared.interval();

        tokio::select! {
            biased;
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
                continue;
            }
            () = shared.wake.notified() => continue,
            () = shared.refresh.notified() => {}
            () = tokio::time::sleep_until(deadline) => {}
        }

        last_sweep = Instant::now();
        if let Err(err) = shared.sweep().await {
            tracing::debug!(error = %err, "Scheduled sweep failed");
        }
    }

    tracing::debug!("Poller loop exited");
}
