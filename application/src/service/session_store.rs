//! Per-caller session state
//!
//! Each caller session owns a root cancellation token and at most one
//! debate. Operations run on child tokens, so cancelling the session stops
//! everything it started without affecting other sessions.

use crate::use_cases::debate_orchestrator::DebateRecord;
use palaver_domain::DebateSession;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// Identifies one caller of the service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The session used by a single-user front end such as the CLI.
    pub fn local() -> Self {
        Self::new("local")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to a debate started through [`ForumService::start_debate`](super::ForumService::start_debate).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebateHandle {
    pub session: SessionId,
    pub debate_id: String,
}

#[derive(Default)]
struct SessionState {
    root: CancellationToken,
    debate: Option<Arc<DebateRecord>>,
}

#[derive(Default)]
pub struct SessionStore {
    sessions: Mutex<HashMap<SessionId, SessionState>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh token for one operation of `session`.
    pub fn operation_token(&self, session: &SessionId) -> CancellationToken {
        let mut sessions = self.lock();
        sessions.entry(session.clone()).or_default().root.child_token()
    }

    /// Install a new debate for `session`, cancelling the one it replaces.
    pub fn install_debate(&self, session: &SessionId, debate: DebateSession) -> Arc<DebateRecord> {
        let mut sessions = self.lock();
        let state = sessions.entry(session.clone()).or_default();
        if let Some(previous) = state.debate.take() {
            previous.cancel_token().cancel();
        }
        let record = Arc::new(DebateRecord::new(debate, state.root.child_token()));
        state.debate = Some(record.clone());
        record
    }

    /// The debate behind `handle`, if it is still the session's current one.
    pub async fn debate(&self, handle: &DebateHandle) -> Option<Arc<DebateRecord>> {
        let record = self.lock().get(&handle.session)?.debate.clone()?;
        if record.snapshot().await.id() == handle.debate_id {
            Some(record)
        } else {
            None
        }
    }

    /// Stop every operation of `session`. Later operations get a fresh root.
    ///
    /// Returns `false` when the session is unknown.
    pub fn cancel(&self, session: &SessionId) -> bool {
        let mut sessions = self.lock();
        match sessions.get_mut(session) {
            Some(state) => {
                state.root.cancel();
                state.root = CancellationToken::new();
                true
            }
            None => false,
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, SessionState>> {
        // state stays consistent even if a holder panicked
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
