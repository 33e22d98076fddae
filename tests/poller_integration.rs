// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the adaptive poller using wiremock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{
    CountingProvider, GRILL_ID, STATE_PATH, fast_polling, grill, mount_directory, mount_state,
    ready_cloud, state,
};
use gmg_cloud::event::PollEvent;
use gmg_cloud::poller::{Cadence, Poller};
use gmg_cloud::{Error, GrillCloud};
use serde_json::json;
use tokio::sync::broadcast;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Waits for the first event matching `predicate`.
async fn wait_for(
    events: &mut broadcast::Receiver<PollEvent>,
    timeout: Duration,
    predicate: impl Fn(&PollEvent) -> bool,
) -> Option<PollEvent> {
    tokio::time::timeout(timeout, async {
        loop {
            match events.recv().await {
                Ok(event) if predicate(&event) => return Some(event),
                Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    })
    .await
    .ok()
    .flatten()
}

/// One grill in the directory whose state endpoint returns `grill_state`.
async fn single_grill(grill_state: i64) -> (MockServer, Arc<GrillCloud<CountingProvider>>) {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/grill"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([grill(GRILL_ID, "Backyard")])))
        .expect(1)
        .mount(&server)
        .await;
    mount_state(
        &server,
        STATE_PATH,
        ResponseTemplate::new(200).set_body_json(state(grill_state, 200)),
    )
    .await;

    let cloud = ready_cloud(&server).await;
    (server, cloud)
}

// ============================================================================
// Sweeps
// ============================================================================

mod sweeps {
    use super::*;

    #[tokio::test]
    async fn one_entry_per_grill_online_iff_snapshot() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/grill"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                grill("1", "Running"),
                grill("2", "Offline"),
                grill("3", "Broken")
            ])))
            .mount(&server)
            .await;
        mount_state(
            &server,
            "/v1/grill/remote%7C1/state",
            ResponseTemplate::new(200).set_body_json(state(1, 250)),
        )
        .await;
        mount_state(&server, "/v1/grill/remote%7C2/state", ResponseTemplate::new(404)).await;
        mount_state(&server, "/v1/grill/remote%7C3/state", ResponseTemplate::new(500)).await;

        let cloud = ready_cloud(&server).await;
        let poller = Poller::new(cloud, fast_polling());

        let dataset = poller.refresh().await.unwrap();

        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.online_count(), 1);
        assert!(dataset.get("1").unwrap().online());
        assert!(!dataset.get("2").unwrap().online());
        assert_eq!(dataset.get("3").unwrap().status_label(), "offline");
        assert!(dataset.any_active());
        assert_eq!(poller.cadence(), Cadence::Active);
        assert_eq!(poller.current_interval(), Duration::from_millis(60));
    }

    #[tokio::test]
    async fn all_grills_offline_select_idle_interval() {
        let server = MockServer::start().await;
        mount_directory(&server, json!([grill("1", "Patio"), grill("2", "Garage")])).await;
        mount_state(&server, "/v1/grill/remote%7C1/state", ResponseTemplate::new(404)).await;
        mount_state(&server, "/v1/grill/remote%7C2/state", ResponseTemplate::new(404)).await;

        let cloud = ready_cloud(&server).await;
        let poller = Poller::new(cloud, fast_polling());

        let dataset = poller.refresh().await.unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.online_count(), 0);
        assert!(!dataset.get("1").unwrap().online());
        assert!(!dataset.get("2").unwrap().online());
        assert!(!dataset.any_active());
        assert_eq!(poller.cadence(), Cadence::Idle);
        assert_eq!(poller.current_interval(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn mistyped_snapshot_fields_keep_grill_online_and_active() {
        let server = MockServer::start().await;
        mount_directory(&server, json!([grill(GRILL_ID, "Backyard")])).await;
        mount_state(
            &server,
            STATE_PATH,
            ResponseTemplate::new(200).set_body_json(json!({
                "grillState": 1,
                "grillTemp": "226",
                "firmwareVersion": 174
            })),
        )
        .await;

        let cloud = ready_cloud(&server).await;
        let poller = Poller::new(cloud, fast_polling());

        let dataset = poller.refresh().await.unwrap();

        let entry = dataset.get(GRILL_ID).unwrap();
        assert!(entry.online());
        assert_eq!(entry.state().unwrap().grill_temperature(), Some(226.0));
        assert!(dataset.any_active());
        assert_eq!(poller.cadence(), Cadence::Active);
    }

    #[tokio::test]
    async fn idle_grills_select_idle_interval() {
        let (_server, cloud) = single_grill(0).await;
        let poller = Poller::new(cloud, fast_polling());
        assert_eq!(poller.cadence(), Cadence::Fallback);

        let dataset = poller.refresh().await.unwrap();

        assert!(!dataset.any_active());
        assert_eq!(dataset.get(GRILL_ID).unwrap().status_label(), "off");
        assert_eq!(poller.cadence(), Cadence::Idle);
        assert_eq!(poller.current_interval(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn sweep_publishes_dataset_and_event() {
        let (_server, cloud) = single_grill(3).await;
        let poller = Poller::new(cloud, fast_polling());
        let mut events = poller.subscribe();
        let watch = poller.watch();
        assert!(watch.borrow().is_none());

        let dataset = poller.refresh().await.unwrap();

        assert_eq!(watch.borrow().as_deref(), Some(dataset.as_ref()));
        let event = wait_for(&mut events, Duration::from_secs(1), PollEvent::is_sweep).await;
        assert_eq!(event.unwrap().dataset().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn directory_is_not_refetched_by_sweeps() {
        let (server, cloud) = single_grill(0).await;
        let poller = Poller::new(Arc::clone(&cloud), fast_polling());

        poller.refresh().await.unwrap();
        poller.refresh().await.unwrap();
        poller.refresh().await.unwrap();

        assert_eq!(cloud.cached_devices().len(), 1);
        // The directory mock expects exactly one call.
        server.verify().await;
    }

    #[tokio::test]
    async fn failed_sweep_keeps_previous_dataset() {
        let (_server, cloud) = single_grill(1).await;
        let poller = Poller::new(Arc::clone(&cloud), fast_polling());
        let previous = poller.refresh().await.unwrap();
        let mut events = poller.subscribe();

        cloud.session().close();
        let result = poller.refresh().await;

        assert!(matches!(result, Err(Error::NotAuthenticated)));
        assert_eq!(poller.dataset().unwrap().completed_at(), previous.completed_at());
        assert_eq!(poller.cadence(), Cadence::Active);

        let failed = wait_for(&mut events, Duration::from_secs(1), |e| {
            matches!(e, PollEvent::SweepFailed { .. })
        })
        .await;
        assert!(failed.is_some());
    }
}

// ============================================================================
// Cadence
// ============================================================================

mod cadence {
    use super::*;

    #[tokio::test]
    async fn burst_applies_before_next_tick() {
        let (_server, cloud) = single_grill(0).await;
        let poller = Poller::new(cloud, fast_polling());
        poller.refresh().await.unwrap();
        assert_eq!(poller.cadence(), Cadence::Idle);
        poller.start();
        let mut events = poller.subscribe();

        poller.request_burst();
        assert_eq!(poller.cadence(), Cadence::Burst);
        assert_eq!(poller.current_interval(), Duration::from_millis(20));

        // Idle would wait 5 s; the burst interval brings the next sweep in
        // well under a second.
        let sweep = wait_for(&mut events, Duration::from_secs(1), |e| {
            matches!(e, PollEvent::SweepCompleted { .. })
        })
        .await;
        assert!(sweep.is_some());

        poller.stop().await;
    }

    #[tokio::test]
    async fn burst_expires_back_to_activity_interval() {
        let (_server, cloud) = single_grill(1).await;
        let poller = Poller::new(cloud, fast_polling());
        poller.refresh().await.unwrap();
        let mut events = poller.subscribe();
        poller.start();

        poller.request_burst();

        let back = wait_for(&mut events, Duration::from_secs(2), |e| {
            matches!(e, PollEvent::IntervalChanged { cadence: Cadence::Active, .. })
        })
        .await;
        assert!(back.is_some());
        assert_eq!(poller.current_interval(), Duration::from_millis(60));

        poller.stop().await;
    }

    #[tokio::test]
    async fn rearming_burst_never_shortens_it() {
        let (_server, cloud) = single_grill(0).await;
        let poller = Poller::new(cloud, fast_polling().with_burst_duration(Duration::from_secs(30)));

        poller.request_burst();
        let first = poller.current_interval();
        tokio::time::sleep(Duration::from_millis(10)).await;
        poller.request_burst();

        assert_eq!(first, poller.current_interval());
        assert_eq!(poller.cadence(), Cadence::Burst);
        poller.refresh().await.unwrap();
        assert_eq!(poller.cadence(), Cadence::Burst);
    }

    #[tokio::test]
    async fn request_refresh_sweeps_while_idle() {
        let (_server, cloud) = single_grill(0).await;
        let poller = Poller::new(cloud, fast_polling());
        poller.refresh().await.unwrap();
        let mut events = poller.subscribe();
        poller.start();

        poller.request_refresh();

        let sweep = wait_for(&mut events, Duration::from_secs(1), |e| {
            matches!(e, PollEvent::SweepCompleted { .. })
        })
        .await;
        assert!(sweep.is_some());
        assert_eq!(poller.cadence(), Cadence::Idle);

        poller.stop().await;
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

mod lifecycle {
    use super::*;

    #[tokio::test]
    async fn start_is_idempotent_and_stop_waits() {
        let (_server, cloud) = single_grill(0).await;
        let poller = Poller::new(cloud, fast_polling());

        assert!(poller.start());
        assert!(!poller.start());
        assert!(poller.is_running());

        poller.stop().await;
        assert!(!poller.is_running());

        assert!(poller.start());
        poller.stop().await;
    }

    #[tokio::test]
    async fn stopped_poller_does_not_sweep() {
        let (_server, cloud) = single_grill(0).await;
        let poller = Poller::new(cloud, fast_polling());
        poller.start();
        poller.stop().await;
        let mut events = poller.subscribe();

        poller.request_burst();

        let sweep = wait_for(&mut events, Duration::from_millis(200), |e| {
            matches!(e, PollEvent::SweepCompleted { .. })
        })
        .await;
        assert!(sweep.is_none());
        assert!(poller.dataset().is_none());
    }
}
