//! Bounded polling waits

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{E2eError, E2eResult};
use crate::locator::Locator;
use crate::page::Page;

/// Run `probe` until it yields `Some` or `timeout` elapses.
///
/// The probe always runs at least once, so a zero timeout still gets one look.
pub async fn poll<T, F, Fut>(timeout: Duration, interval: Duration, mut probe: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Option<T>>,
{
    let deadline = Instant::now() + timeout;
    let mut attempts = 0usize;

    loop {
        attempts += 1;
        if let Some(value) = probe().await {
            return Some(value);
        }

        let now = Instant::now();
        if now >= deadline {
            debug!("Gave up after {} attempt(s)", attempts);
            return None;
        }
        sleep(interval.min(deadline - now)).await;
    }
}

/// Wait for `locator` to become visible
pub async fn wait_visible(
    page: &dyn Page,
    locator: &Locator,
    timeout: Duration,
    interval: Duration,
) -> E2eResult<()> {
    let visible = poll(timeout, interval, move || async move {
        match page.is_visible(locator).await {
            Ok(true) => Some(()),
            Ok(false) => None,
            Err(e) => {
                debug!("Visibility probe for {} failed: {}", locator, e);
                None
            }
        }
    })
    .await;

    visible.ok_or_else(|| {
        E2eError::Timeout(format!("{} to be visible ({} ms)", locator, timeout.as_millis()))
    })
}
