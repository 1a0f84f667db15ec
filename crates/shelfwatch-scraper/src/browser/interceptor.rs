use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFinished, EventResponseReceived, GetResponseBodyParams, RequestId,
};
use chromiumoxide::Page;
use chrono::{DateTime, Utc};
use futures::StreamExt;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use shelfwatch_core::SearchTask;

use crate::error::ScrapeError;

/// One backend response that matched the adapter's URL patterns, captured in
/// arrival order. Owned by the interceptor until drained; discarded after
/// mapping unless raw-body persistence is enabled.
#[derive(Debug, Clone)]
pub struct CapturedResponse {
    pub matched_url: String,
    pub body: String,
    pub task: SearchTask,
    pub captured_at: DateTime<Utc>,
}

#[derive(Default)]
struct CaptureState {
    /// The task captures are attributed to. `None` disarms the listeners.
    current_task: Option<SearchTask>,
    /// Matched responses whose bodies are not yet readable. Bodies only
    /// become available once the browser reports loading finished.
    pending: HashMap<RequestId, String>,
    captured: Vec<CapturedResponse>,
}

/// Passive observer of a page's network traffic.
///
/// Requests are never blocked or rewritten; the storefront's own
/// request-construction logic stays untouched and bodies are read after the
/// fact over the DevTools protocol. One interceptor is bound to exactly one
/// page for its lifetime.
pub struct ResponseInterceptor {
    state: Arc<Mutex<CaptureState>>,
    listeners: Vec<JoinHandle<()>>,
}

impl ResponseInterceptor {
    /// Attaches network listeners to `page`. Responses whose URL contains one
    /// of `patterns` are buffered while a task is armed via
    /// [`Self::begin_task`].
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Interceptor`] if the event streams cannot be
    /// subscribed.
    pub async fn attach(page: &Page, patterns: &[String]) -> Result<Self, ScrapeError> {
        let patterns: Arc<[String]> = patterns.into();
        let state = Arc::new(Mutex::new(CaptureState::default()));

        let mut responses = page
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(|e| ScrapeError::Interceptor {
                reason: e.to_string(),
            })?;
        let mut finished = page
            .event_listener::<EventLoadingFinished>()
            .await
            .map_err(|e| ScrapeError::Interceptor {
                reason: e.to_string(),
            })?;

        let match_state = Arc::clone(&state);
        let matcher = tokio::spawn(async move {
            while let Some(event) = responses.next().await {
                let url = &event.response.url;
                if !patterns.iter().any(|p| url.contains(p.as_str())) {
                    continue;
                }
                let mut state = match_state.lock().await;
                if state.current_task.is_none() {
                    // Between tasks; stragglers from a finished search are
                    // dropped rather than attributed to the wrong task.
                    continue;
                }
                trace!(url, status = event.response.status, "matched backend response");
                state.pending.insert(event.request_id.clone(), url.clone());
            }
        });

        let body_state = Arc::clone(&state);
        let body_page = page.clone();
        let collector = tokio::spawn(async move {
            while let Some(event) = finished.next().await {
                let url = {
                    let mut state = body_state.lock().await;
                    match state.pending.remove(&event.request_id) {
                        Some(url) => url,
                        None => continue,
                    }
                };
                // Body fetch happens outside the lock; the protocol round
                // trip can be slow.
                let body = match body_page
                    .execute(GetResponseBodyParams::new(event.request_id.clone()))
                    .await
                {
                    Ok(resp) => decode_body(&resp.body, resp.base64_encoded),
                    Err(e) => {
                        // The browser evicts bodies under memory pressure;
                        // losing one capture is tolerable, losing the task is
                        // not.
                        warn!(url, error = %e, "response body unavailable, skipping capture");
                        continue;
                    }
                };
                let mut state = body_state.lock().await;
                let Some(task) = state.current_task.clone() else {
                    continue;
                };
                debug!(url, bytes = body.len(), "captured backend response");
                state.captured.push(CapturedResponse {
                    matched_url: url,
                    body,
                    task,
                    captured_at: Utc::now(),
                });
            }
        });

        Ok(Self {
            state,
            listeners: vec![matcher, collector],
        })
    }

    /// Arms capture for `task`, dropping any state left over from a previous
    /// task. Listeners ignore traffic while no task is armed, so responses
    /// from one search can never leak into the next.
    pub async fn begin_task(&self, task: &SearchTask) {
        let mut state = self.state.lock().await;
        state.current_task = Some(task.clone());
        state.pending.clear();
        state.captured.clear();
    }

    /// Waits for capture to settle: first for an initial capture to arrive
    /// within `initial_wait`, then for `idle_gap` to pass with no new
    /// arrivals (pagination and refetches land in bursts). Returns the number
    /// of captures buffered so far; zero is a valid outcome, not an error.
    pub async fn wait_for_quiescence(&self, initial_wait: Duration, idle_gap: Duration) -> usize {
        let poll = Duration::from_millis(100);
        let deadline = tokio::time::Instant::now() + initial_wait;

        let mut count = loop {
            let n = self.state.lock().await.captured.len();
            if n > 0 {
                break n;
            }
            if tokio::time::Instant::now() >= deadline {
                return 0;
            }
            tokio::time::sleep(poll).await;
        };

        let mut last_growth = tokio::time::Instant::now();
        loop {
            tokio::time::sleep(poll).await;
            let n = self.state.lock().await.captured.len();
            if n > count {
                count = n;
                last_growth = tokio::time::Instant::now();
            } else if last_growth.elapsed() >= idle_gap {
                return count;
            }
        }
    }

    /// Disarms capture and hands the buffered responses over in arrival
    /// order.
    pub async fn drain(&self) -> Vec<CapturedResponse> {
        let mut state = self.state.lock().await;
        state.current_task = None;
        state.pending.clear();
        std::mem::take(&mut state.captured)
    }
}

impl Drop for ResponseInterceptor {
    fn drop(&mut self) {
        for listener in &self.listeners {
            listener.abort();
        }
    }
}

fn decode_body(body: &str, base64_encoded: bool) -> String {
    if !base64_encoded {
        return body.to_owned();
    }
    match STANDARD.decode(body) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(e) => {
            warn!(error = %e, "base64 response body failed to decode");
            String::new()
        }
    }
}
