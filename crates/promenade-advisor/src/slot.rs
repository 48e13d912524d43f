//! The advisory slot: the one place advisor results land.
//!
//! Only the advisor writes here and only the observer reads. Each dispatched
//! request claims a new generation with [`AdvisorySlot::begin`]. A completion
//! carrying an older generation is discarded, so a superseded answer can
//! never overwrite a newer one.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;

/// Shown when the advisor call fails for any reason.
pub const FALLBACK_ADVICE: &str = "Local guides are offline. Trust your instincts!";

/// Shown while a request is outstanding.
pub const PENDING_ADVICE: &str = "Consulting local guides...";

/// Current advisory state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "text", rename_all = "lowercase")]
pub enum Advisory {
    /// No request has been made yet.
    Idle,
    /// A request is in flight.
    Pending,
    /// The backend answered.
    Ready(String),
    /// The backend failed.
    Fallback,
}

impl Advisory {
    /// Text to put in front of the user, if any.
    pub fn display_text(&self) -> Option<&str> {
        match self {
            Self::Idle => None,
            Self::Pending => Some(PENDING_ADVICE),
            Self::Ready(text) => Some(text),
            Self::Fallback => Some(FALLBACK_ADVICE),
        }
    }
}

/// Point-in-time copy of the slot, as served to observers.
#[derive(Debug, Clone, Serialize)]
pub struct AdvisorySnapshot {
    /// Current advisory.
    pub advisory: Advisory,
    /// Display string for `advisory`, if any.
    pub display_text: Option<String>,
    /// Generation of the request that produced `advisory`.
    pub generation: u64,
    /// When the slot last changed.
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
struct SlotInner {
    advisory: Advisory,
    generation: u64,
    updated_at: Option<DateTime<Utc>>,
}

/// Shared, generation-guarded advisory cell.
#[derive(Debug)]
pub struct AdvisorySlot {
    inner: RwLock<SlotInner>,
}

impl Default for AdvisorySlot {
    fn default() -> Self {
        Self::new()
    }
}

impl AdvisorySlot {
    /// An idle slot.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(SlotInner {
                advisory: Advisory::Idle,
                generation: 0,
                updated_at: None,
            }),
        }
    }

    /// Start a new request: mark the slot pending and return its generation.
    pub async fn begin(&self) -> u64 {
        let mut inner = self.inner.write().await;
        inner.generation = inner.generation.saturating_add(1);
        inner.advisory = Advisory::Pending;
        inner.updated_at = Some(Utc::now());
        inner.generation
    }

    /// Store a result if `generation` is still the latest.
    ///
    /// Returns `false` when the result was stale and dropped.
    pub async fn complete(&self, generation: u64, advisory: Advisory) -> bool {
        let mut inner = self.inner.write().await;
        if inner.generation != generation {
            return false;
        }
        inner.advisory = advisory;
        inner.updated_at = Some(Utc::now());
        true
    }

    /// Copy out the current state.
    pub async fn current(&self) -> AdvisorySnapshot {
        let inner = self.inner.read().await;
        AdvisorySnapshot {
            advisory: inner.advisory.clone(),
            display_text: inner.advisory.display_text().map(ToOwned::to_owned),
            generation: inner.generation,
            updated_at: inner.updated_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn starts_idle() {
        let slot = AdvisorySlot::new();
        let snap = slot.current().await;
        assert_eq!(snap.advisory, Advisory::Idle);
        assert_eq!(snap.display_text, None);
        assert_eq!(snap.generation, 0);
    }

    #[tokio::test]
    async fn begin_marks_pending() {
        let slot = AdvisorySlot::new();
        let generation = slot.begin().await;
        assert_eq!(generation, 1);
        let snap = slot.current().await;
        assert_eq!(snap.advisory, Advisory::Pending);
        assert_eq!(snap.display_text.as_deref(), Some(PENDING_ADVICE));
    }

    #[tokio::test]
    async fn stale_completion_is_dropped() {
        let slot = AdvisorySlot::new();
        let first = slot.begin().await;
        let second = slot.begin().await;

        let old = Advisory::Ready("old".to_owned());
        assert!(!slot.complete(first, old).await);
        assert_eq!(slot.current().await.advisory, Advisory::Pending);

        let new = Advisory::Ready("new".to_owned());
        assert!(slot.complete(second, new).await);
        assert_eq!(slot.current().await.display_text.as_deref(), Some("new"));
    }

    #[test]
    fn fallback_text() {
        assert_eq!(Advisory::Fallback.display_text(), Some(FALLBACK_ADVICE));
    }

    #[test]
    fn serializes_with_status_tag() {
        let json = serde_json::to_value(Advisory::Ready("Go early.".to_owned())).unwrap();
        assert_eq!(json["status"], "ready");
        assert_eq!(json["text"], "Go early.");
        let json = serde_json::to_value(Advisory::Pending).unwrap();
        assert_eq!(json["status"], "pending");
    }
}
