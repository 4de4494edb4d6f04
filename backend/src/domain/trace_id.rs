//! Correlation identifier shared by logs, error bodies and the `trace-id`
//! response header.
//!
//! The identifier lives in Tokio task-local storage for the duration of a
//! request. Task locals do not follow `tokio::spawn` or `spawn_blocking`;
//! wrap such work in [`TraceId::scope`] to keep errors stamped.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Header used both to accept a caller-supplied id and to echo the active one.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static ACTIVE: TraceId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Adopt `candidate` when it is a well-formed UUID, otherwise mint a new id.
    ///
    /// ```
    /// use layout_backend::TraceId;
    ///
    /// let adopted = TraceId::inherit_or_generate(Some("4b9a1c1e-3f59-4b6e-9a49-0c4f2f4b1d2a"));
    /// assert_eq!(adopted.to_string(), "4b9a1c1e-3f59-4b6e-9a49-0c4f2f4b1d2a");
    ///
    /// let fresh = TraceId::inherit_or_generate(Some("not a uuid"));
    /// assert_ne!(fresh.to_string(), "not a uuid");
    /// ```
    #[must_use]
    pub fn inherit_or_generate(candidate: Option<&str>) -> Self {
        candidate
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// The identifier of the request currently being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        ACTIVE.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the active identifier.
    pub async fn scope<Fut: Future>(trace_id: Self, fut: Fut) -> Fut::Output {
        ACTIVE.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
