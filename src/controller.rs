use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;
use tokio::sync::{RwLock, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::client::{EventClient, FetchError};
use crate::page::{Endpoints, Page};

pub type SharedPage = Arc<RwLock<Page>>;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Event detail could not be loaded: {0}")]
    Detail(#[source] FetchError),
    #[error("Registration availability could not be refreshed: {0}")]
    Availability(#[source] FetchError),
}

/// Drives the regions of one event overview page: the detail is fetched once,
/// availability on every poll tick.
pub struct PageController {
    client: EventClient,
    endpoints: Endpoints,
    page: SharedPage,
    poll_interval: Duration,
    timezone: Tz,
}

impl PageController {
    pub fn new(client: EventClient, endpoints: Endpoints, page: SharedPage) -> Self {
        Self {
            client,
            endpoints,
            page,
            poll_interval: DEFAULT_POLL_INTERVAL,
            timezone: Tz::UTC,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timezone(mut self, timezone: Tz) -> Self {
        self.timezone = timezone;
        self
    }

    pub fn page(&self) -> SharedPage {
        Arc::clone(&self.page)
    }

    /// Renders route, aid stations and schedule. On failure only the route
    /// container is replaced with a fallback message.
    pub async fn fetch_detail(&self) -> Result<(), PageError> {
        let Some(url) = &self.endpoints.detail else {
            return Ok(());
        };
        match self.client.fetch_detail(url).await {
            Ok(detail) => {
                debug!(
                    segments = detail.route_segments.len(),
                    aid_stations = detail.aid_stations.len(),
                    schedules = detail.schedules.len(),
                    "event detail loaded"
                );
                self.page.write().await.apply_detail(detail, self.timezone);
                Ok(())
            }
            Err(err) => {
                warn!(url = %url, error = %err, "event detail request failed");
                self.page.write().await.apply_detail_failure();
                Err(PageError::Detail(err))
            }
        }
    }

    /// Refreshes the availability regions. On failure only the availability
    /// label changes; the next tick tries again.
    pub async fn update_availability(&self) -> Result<(), PageError> {
        let Some(url) = &self.endpoints.availability else {
            return Ok(());
        };
        match self.client.fetch_availability(url).await {
            Ok(availability) => {
                debug!(
                    remaining = ?availability.remaining,
                    capacity_ratio = availability.capacity_ratio,
                    open = availability.is_registration_open,
                    "availability refreshed"
                );
                self.page.write().await.apply_availability(&availability);
                Ok(())
            }
            Err(err) => {
                warn!(url = %url, error = %err, "availability request failed");
                self.page.write().await.apply_availability_failure();
                Err(PageError::Availability(err))
            }
        }
    }

    /// Starts the one-shot detail fetch and the availability poller. The first
    /// availability fetch happens immediately; both run until the returned
    /// handle is stopped or the runtime shuts down.
    pub fn start(self) -> PollHandle {
        let controller = Arc::new(self);
        info!(
            poll_interval_secs = controller.poll_interval.as_secs_f64(),
            "starting event overview controller"
        );

        let detail = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move {
                let _ = controller.fetch_detail().await;
            })
        };

        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();
        let poller = tokio::spawn(async move {
            let mut interval = tokio::time::interval(controller.poll_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = &mut stop_rx => break,
                    _ = interval.tick() => {
                        let _ = controller.update_availability().await;
                    }
                }
            }
            debug!("availability poller stopped");
        });

        PollHandle {
            stop: Some(stop_tx),
            detail,
            poller,
        }
    }
}

/// Owner of the running controller tasks. Dropping it without calling
/// [`PollHandle::stop`] ends the poller right away but leaves a pending
/// detail fetch running.
pub struct PollHandle {
    stop: Option<oneshot::Sender<()>>,
    detail: JoinHandle<()>,
    poller: JoinHandle<()>,
}

impl PollHandle {
    /// Cancels a pending detail fetch and stops the poller. An availability
    /// fetch already in flight is allowed to finish. Calling it again is a no-op.
    pub async fn stop(&mut self) {
        self.detail.abort();
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
            let _ = (&mut self.poller).await;
        }
    }

    pub fn is_running(&self) -> bool {
        !self.poller.is_finished()
    }
}
