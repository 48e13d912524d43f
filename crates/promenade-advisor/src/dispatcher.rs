//! Debounced, fire-and-forget advisor dispatch.
//!
//! The frame loop calls [`AdvisorHandle::request`], which only pushes onto
//! an unbounded channel and never waits. A background task holds the most
//! recent request until the channel has been quiet for the debounce delay,
//! then claims a slot generation and sends the prompt from a spawned task.
//! A later request that is dispatched before that call returns makes its
//! result stale; [`AdvisorySlot::complete`] drops it.

use std::sync::Arc;
use std::time::Duration;

use promenade_types::Season;
use serde::Serialize;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::llm::AdviceBackend;
use crate::prompt::PromptEngine;
use crate::slot::{Advisory, AdvisorySlot};

/// The scenario the advisor is asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdvisoryRequest {
    /// Month of the year.
    pub season: Season,
    /// Hour of the day, 0..=23.
    pub hour: u8,
    /// Tourist count for this month and hour.
    pub density: u32,
}

/// Cheap, cloneable entry point to the advisor task.
#[derive(Debug, Clone)]
pub struct AdvisorHandle {
    tx: Option<mpsc::UnboundedSender<AdvisoryRequest>>,
    slot: Arc<AdvisorySlot>,
}

impl AdvisorHandle {
    /// A handle that accepts requests and does nothing with them.
    ///
    /// Used when no API key is configured; the slot stays idle.
    pub const fn disabled(slot: Arc<AdvisorySlot>) -> Self {
        Self { tx: None, slot }
    }

    /// Whether requests reach a backend.
    pub const fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a request. Returns `false` if it was not queued.
    pub fn request(&self, request: AdvisoryRequest) -> bool {
        self.tx.as_ref().is_some_and(|tx| tx.send(request).is_ok())
    }

    /// The slot results are written to.
    pub const fn slot(&self) -> &Arc<AdvisorySlot> {
        &self.slot
    }
}

/// Start the advisor task on the current tokio runtime.
///
/// The task ends once every clone of the returned handle is dropped.
pub fn spawn_advisor<B: AdviceBackend>(
    backend: B,
    prompts: PromptEngine,
    debounce: Duration,
    slot: Arc<AdvisorySlot>,
) -> AdvisorHandle {
    let (tx, rx) = mpsc::unbounded_channel();
    info!(
        backend = backend.name(),
        debounce_ms = debounce.as_millis(),
        "insight advisor started"
    );
    let backend = Arc::new(backend);
    tokio::spawn(debounce_loop(rx, backend, prompts, debounce, Arc::clone(&slot)));
    AdvisorHandle { tx: Some(tx), slot }
}

async fn debounce_loop<B: AdviceBackend>(
    mut rx: mpsc::UnboundedReceiver<AdvisoryRequest>,
    backend: Arc<B>,
    prompts: PromptEngine,
    debounce: Duration,
    slot: Arc<AdvisorySlot>,
) {
    while let Some(mut latest) = rx.recv().await {
        loop {
            tokio::select! {
                next = rx.recv() => {
                    if let Some(request) = next {
                        latest = request;
                    } else {
                        debug!("advisor channel closed, dropping pending request");
                        return;
                    }
                }
                () = tokio::time::sleep(debounce) => break,
            }
        }
        dispatch(latest, &backend, &prompts, &slot).await;
    }
    debug!("insight advisor stopped");
}

async fn dispatch<B: AdviceBackend>(
    request: AdvisoryRequest,
    backend: &Arc<B>,
    prompts: &PromptEngine,
    slot: &Arc<AdvisorySlot>,
) {
    let generation = slot.begin().await;
    debug!(
        generation,
        season = %request.season,
        hour = request.hour,
        density = request.density,
        "dispatching advisory request"
    );

    let prompt = match prompts.render(&request) {
        Ok(prompt) => prompt,
        Err(e) => {
            warn!(error = %e, "advisory prompt failed to render");
            slot.complete(generation, Advisory::Fallback).await;
            return;
        }
    };

    let backend = Arc::clone(backend);
    let slot = Arc::clone(slot);
    tokio::spawn(async move {
        let advisory = match backend.complete(&prompt).await {
            Ok(text) => Advisory::Ready(text),
            Err(e) => {
                warn!(error = %e, backend = backend.name(), "advisory request failed");
                Advisory::Fallback
            }
        };
        if !slot.complete(generation, advisory).await {
            debug!(generation, "discarding superseded advisory");
        }
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;
    use crate::error::AdvisorError;
    use crate::prompt::RenderedPrompt;
    use crate::slot::FALLBACK_ADVICE;

    /// Replies from a script; records each user prompt it receives.
    struct ScriptedBackend {
        script: Mutex<VecDeque<(Duration, Result<String, String>)>>,
        calls: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedBackend {
        fn new(script: Vec<(u64, Result<&str, &str>)>) -> (Self, Arc<Mutex<Vec<String>>>) {
            let calls = Arc::new(Mutex::new(Vec::new()));
            let script = script
                .into_iter()
                .map(|(ms, r)| {
                    (
                        Duration::from_millis(ms),
                        r.map(ToOwned::to_owned).map_err(ToOwned::to_owned),
                    )
                })
                .collect();
            (
                Self {
                    script: Mutex::new(script),
                    calls: Arc::clone(&calls),
                },
                calls,
            )
        }
    }

    impl AdviceBackend for ScriptedBackend {
        async fn complete(&self, prompt: &RenderedPrompt) -> Result<String, AdvisorError> {
            self.calls.lock().unwrap().push(prompt.user.clone());
            let (delay, reply) = self
                .script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or((Duration::ZERO, Err("script exhausted".to_owned())));
            tokio::time::sleep(delay).await;
            reply.map_err(AdvisorError::Backend)
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn request(season: u8, hour: u8, density: u32) -> AdvisoryRequest {
        AdvisoryRequest {
            season: Season::from_index(season).unwrap(),
            hour,
            density,
        }
    }

    fn start(backend: ScriptedBackend) -> AdvisorHandle {
        spawn_advisor(
            backend,
            PromptEngine::new().unwrap(),
            Duration::from_millis(800),
            Arc::new(AdvisorySlot::new()),
        )
    }

    async fn wait(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn burst_of_changes_sends_one_request_with_last_params() {
        let (backend, calls) = ScriptedBackend::new(vec![(0, Ok("Go early."))]);
        let handle = start(backend);

        assert!(handle.request(request(5, 10, 100)));
        wait(300).await;
        assert!(handle.request(request(6, 12, 300)));
        wait(300).await;
        assert!(handle.request(request(7, 19, 720)));
        wait(2_000).await;

        let calls = calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1);
        assert!(calls.first().unwrap().contains("August"));
        assert!(calls.first().unwrap().contains("19:00"));
        assert!(calls.first().unwrap().contains("720"));
        assert_eq!(
            handle.slot().current().await.advisory,
            Advisory::Ready("Go early.".to_owned())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_is_sent_before_the_delay_elapses() {
        let (backend, calls) = ScriptedBackend::new(vec![(0, Ok("ok"))]);
        let handle = start(backend);

        handle.request(request(0, 8, 20));
        wait(700).await;
        assert!(calls.lock().unwrap().is_empty());
        assert_eq!(handle.slot().current().await.advisory, Advisory::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn slot_is_pending_while_the_call_is_in_flight() {
        let (backend, _calls) = ScriptedBackend::new(vec![(1_000, Ok("Later."))]);
        let handle = start(backend);

        handle.request(request(3, 9, 50));
        wait(900).await;
        assert_eq!(handle.slot().current().await.advisory, Advisory::Pending);

        wait(1_000).await;
        assert_eq!(
            handle.slot().current().await.advisory,
            Advisory::Ready("Later.".to_owned())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn superseded_response_is_discarded() {
        let (backend, calls) = ScriptedBackend::new(vec![
            (5_000, Ok("stale advice")),
            (0, Ok("fresh advice")),
        ]);
        let handle = start(backend);

        handle.request(request(1, 10, 30));
        wait(1_000).await;
        handle.request(request(7, 19, 720));
        wait(7_000).await;

        assert_eq!(calls.lock().unwrap().len(), 2);
        assert_eq!(
            handle.slot().current().await.advisory,
            Advisory::Ready("fresh advice".to_owned())
        );
    }

    #[tokio::test(start_paused = true)]
    async fn failure_resolves_to_fallback() {
        let (backend, _calls) = ScriptedBackend::new(vec![(0, Err("503"))]);
        let handle = start(backend);

        handle.request(request(11, 21, 12));
        wait(1_000).await;

        let snap = handle.slot().current().await;
        assert_eq!(snap.advisory, Advisory::Fallback);
        assert_eq!(snap.display_text.as_deref(), Some(FALLBACK_ADVICE));
    }

    #[tokio::test]
    async fn disabled_handle_is_a_no_op() {
        let handle = AdvisorHandle::disabled(Arc::new(AdvisorySlot::new()));
        assert!(!handle.is_enabled());
        assert!(!handle.request(request(7, 19, 720)));
        assert_eq!(handle.slot().current().await.advisory, Advisory::Idle);
    }
}
