//! Orchestration event port
//!
//! Defines the push surface through which callers observe queries and
//! debates while they run: model chunks, batch and round boundaries, and
//! completion.

use palaver_domain::{Argument, ChunkEvent, ModelId, ModelResult, SummaryResult};
use serde::Serialize;
use tokio::sync::mpsc;

/// Something observable happened during a query or debate.
///
/// Every streamed model produces exactly one `Chunk` whose `done` flag is
/// set, after its last text chunk, regardless of outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ForumEvent {
    QueryStarted {
        models: Vec<ModelId>,
        concurrency: usize,
        stream: bool,
    },
    BatchStarted {
        /// Zero-based batch index
        index: usize,
        models: Vec<ModelId>,
    },
    Chunk(ChunkEvent),
    ModelFinished(ModelResult),
    QueryCompleted {
        succeeded: usize,
        failed: usize,
    },
    DebateStarted {
        debate_id: String,
        topic: String,
        participants: Vec<ModelId>,
        rounds: u32,
    },
    RoundStarted {
        round: u32,
        total_rounds: u32,
    },
    RoundCompleted {
        round: u32,
        arguments: Vec<Argument>,
    },
    SummaryStarted {
        debate_id: String,
    },
    DebateCompleted {
        debate_id: String,
        summary: SummaryResult,
    },
    DebateCancelled {
        debate_id: String,
        completed_rounds: u32,
    },
}

impl ForumEvent {
    /// Event type name as used in structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            ForumEvent::QueryStarted { .. } => "query_started",
            ForumEvent::BatchStarted { .. } => "batch_started",
            ForumEvent::Chunk(_) => "chunk",
            ForumEvent::ModelFinished(_) => "model_finished",
            ForumEvent::QueryCompleted { .. } => "query_completed",
            ForumEvent::DebateStarted { .. } => "debate_started",
            ForumEvent::RoundStarted { .. } => "round_started",
            ForumEvent::RoundCompleted { .. } => "round_completed",
            ForumEvent::SummaryStarted { .. } => "summary_started",
            ForumEvent::DebateCompleted { .. } => "debate_completed",
            ForumEvent::DebateCancelled { .. } => "debate_cancelled",
        }
    }
}

/// Receiver of orchestration events
///
/// Implementations live in the presentation and infrastructure layers.
/// `emit` is synchronous and infallible; a sink that cannot deliver an event
/// drops it.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: ForumEvent);
}

/// No-op sink for when nobody is listening
pub struct NoEvents;

impl EventSink for NoEvents {
    fn emit(&self, _event: ForumEvent) {}
}

impl<F> EventSink for F
where
    F: Fn(ForumEvent) + Send + Sync,
{
    fn emit(&self, event: ForumEvent) {
        self(event)
    }
}

/// Sink that forwards events into a channel, turning the push surface into
/// a stream the caller can consume at its own pace.
pub struct ChannelSink {
    sender: mpsc::UnboundedSender<ForumEvent>,
}

impl ChannelSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ForumEvent>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl EventSink for ChannelSink {
    fn emit(&self, event: ForumEvent) {
        // a dropped receiver means nobody is listening any more
        let _ = self.sender.send(event);
    }
}

/// Sink that delegates to several sinks in order.
pub struct CompositeSink<'a> {
    delegates: Vec<&'a dyn EventSink>,
}

impl<'a> CompositeSink<'a> {
    pub fn new(delegates: Vec<&'a dyn EventSink>) -> Self {
        Self { delegates }
    }
}

impl EventSink for CompositeSink<'_> {
    fn emit(&self, event: ForumEvent) {
        if let Some((last, rest)) = self.delegates.split_last() {
            for d in rest {
                d.emit(event.clone());
            }
            last.emit(event);
        }
    }
}
