//! Debate orchestrator
//!
//! Drives a [`DebateSession`] through its rounds. Participants speak one at
//! a time in participant order; each sees the earlier arguments of the
//! others. After the final round the session is sealed and summarized.

use super::inference_client::InferenceClient;
use super::summarize_debate::SummarizeDebateUseCase;
use crate::config::DebateParams;
use crate::ports::event_sink::{EventSink, ForumEvent};
use palaver_domain::{
    Argument, ConsensusReport, DebatePhase, DebateSession, DomainError, ModelId, PromptTemplate,
    SummaryResult,
};
use std::time::Duration;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// A debate as seen by readers while and after it runs.
///
/// The session is written only by the orchestrator; readers take short read
/// locks and may observe a debate mid-round.
pub struct DebateRecord {
    session: RwLock<DebateSession>,
    summary: RwLock<Option<SummaryResult>>,
    cancel: CancellationToken,
}

impl DebateRecord {
    pub fn new(session: DebateSession, cancel: CancellationToken) -> Self {
        Self {
            session: RwLock::new(session),
            summary: RwLock::new(None),
            cancel,
        }
    }

    pub async fn snapshot(&self) -> DebateSession {
        self.session.read().await.clone()
    }

    pub async fn phase(&self) -> DebatePhase {
        self.session.read().await.phase()
    }

    pub async fn summary(&self) -> Option<SummaryResult> {
        self.summary.read().await.clone()
    }

    pub async fn consensus(&self) -> ConsensusReport {
        ConsensusReport::for_session(&*self.session.read().await)
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }
}

pub struct DebateOrchestrator {
    client: InferenceClient,
    summarizer: SummarizeDebateUseCase,
    model_pause: Duration,
    round_pause: Duration,
}

impl DebateOrchestrator {
    pub fn new(client: InferenceClient, params: &DebateParams) -> Self {
        let summarizer = SummarizeDebateUseCase::new(
            client.clone(),
            params.summary_preferences.clone(),
            params.summary_timeout,
        );
        Self {
            client,
            summarizer,
            model_pause: params.model_pause,
            round_pause: params.round_pause,
        }
    }

    /// Run the debate held by `record` until it completes or is cancelled.
    ///
    /// `available` is the model list the summary model is chosen from when
    /// no participant produced an argument. Returns the terminal phase.
    pub async fn run(
        &self,
        record: &DebateRecord,
        available: &[ModelId],
        sink: &dyn EventSink,
    ) -> Result<DebatePhase, DomainError> {
        let (debate_id, topic, participants, rounds) = {
            let session = record.session.read().await;
            (
                session.id().to_string(),
                session.topic().to_string(),
                session.participants().to_vec(),
                session.round_count(),
            )
        };
        info!(
            "Debate {} started: {} participants, {} rounds",
            debate_id,
            participants.len(),
            rounds
        );
        sink.emit(ForumEvent::DebateStarted {
            debate_id: debate_id.clone(),
            topic: topic.clone(),
            participants: participants.clone(),
            rounds,
        });

        for round in 1..=rounds {
            if record.cancel.is_cancelled() {
                return self.abort(record, &debate_id, round - 1, sink).await;
            }
            record.session.write().await.begin_round(round)?;
            sink.emit(ForumEvent::RoundStarted {
                round,
                total_rounds: rounds,
            });

            for (turn, model) in participants.iter().enumerate() {
                if turn > 0 {
                    pause(self.model_pause, &record.cancel).await;
                }
                if record.cancel.is_cancelled() {
                    return self.abort(record, &debate_id, round - 1, sink).await;
                }

                let prompt = {
                    let session = record.session.read().await;
                    let prior: Vec<&Argument> =
                        session.prior_arguments_excluding(model, round).collect();
                    PromptTemplate::debate_round(&topic, model, round, rounds, &prior)
                };
                let result = self.client.query_streaming(model, &prompt, sink).await;
                match result.error {
                    None => {
                        record
                            .session
                            .write()
                            .await
                            .record(model.clone(), result.response)?;
                    }
                    Some(e) => warn!("{} skipped round {}: {}", model, round, e),
                }
            }

            let arguments: Vec<Argument> = record
                .session
                .read()
                .await
                .arguments_in_round(round)
                .cloned()
                .collect();
            info!("Round {} finished with {} arguments", round, arguments.len());
            sink.emit(ForumEvent::RoundCompleted { round, arguments });

            if round < rounds {
                pause(self.round_pause, &record.cancel).await;
            }
        }

        let arguments = {
            let mut session = record.session.write().await;
            session.begin_synthesis()?;
            session.arguments().to_vec()
        };
        sink.emit(ForumEvent::SummaryStarted {
            debate_id: debate_id.clone(),
        });

        let summary = self
            .summarizer
            .summarize(&topic, &arguments, &participants, available)
            .await;
        *record.summary.write().await = Some(summary.clone());
        record.session.write().await.complete()?;

        info!("Debate {} completed", debate_id);
        sink.emit(ForumEvent::DebateCompleted { debate_id, summary });
        Ok(DebatePhase::Completed)
    }

    async fn abort(
        &self,
        record: &DebateRecord,
        debate_id: &str,
        completed_rounds: u32,
        sink: &dyn EventSink,
    ) -> Result<DebatePhase, DomainError> {
        record.session.write().await.cancel()?;
        info!(
            "Debate {} cancelled after {} rounds",
            debate_id, completed_rounds
        );
        sink.emit(ForumEvent::DebateCancelled {
            debate_id: debate_id.to_string(),
            completed_rounds,
        });
        Ok(DebatePhase::Cancelled)
    }
}

/// Sleep for `duration`, waking early if `cancel` fires.
async fn pause(duration: Duration, cancel: &CancellationToken) {
    if duration.is_zero() {
        return;
    }
    tokio::select! {
        _ = tokio::time::sleep(duration) => {}
        _ = cancel.cancelled() => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::event_sink::{ChannelSink, NoEvents};
    use crate::testing::ScriptedBackend;
    use palaver_domain::{DebateRules, InferenceError};
    use std::sync::Arc;

    fn ids(names: &[&str]) -> Vec<ModelId> {
        names.iter().map(|n| ModelId::new(*n)).collect()
    }

    fn params() -> DebateParams {
        DebateParams::default().with_pacing(Duration::ZERO, Duration::ZERO)
    }

    fn record(participants: &[&str], rounds: u32) -> DebateRecord {
        let session =
            DebateSession::start("Tabs or spaces?", ids(participants), rounds, &DebateRules::default())
                .unwrap();
        DebateRecord::new(session, CancellationToken::new())
    }

    #[tokio::test]
    async fn test_three_participants_two_rounds() {
        let backend = Arc::new(ScriptedBackend::with_models(&["a", "b", "c"]));
        let orchestrator = DebateOrchestrator::new(InferenceClient::new(backend.clone()), &params());
        let record = record(&["a", "b", "c"], 2);

        let phase = orchestrator
            .run(&record, &ids(&["a", "b", "c"]), &NoEvents)
            .await
            .unwrap();
        assert_eq!(phase, DebatePhase::Completed);

        let session = record.snapshot().await;
        assert_eq!(session.arguments().len(), 6);
        assert!(session.ended_at().is_some());

        // round 2 shows the others' round-1 arguments, never the model's own
        let prompts = backend.prompts_for("a");
        let rebuttal = &prompts[1];
        assert!(rebuttal.contains("b says hi"));
        assert!(rebuttal.contains("c says hi"));
        assert!(!rebuttal.contains("a says hi"));

        let summary = record.summary().await.unwrap();
        assert!(summary.success);
        assert_eq!(summary.model, Some(ModelId::new("a")));
    }

    #[tokio::test]
    async fn test_failed_turns_are_omitted() {
        let backend = Arc::new(
            ScriptedBackend::with_models(&["a", "b"]).failing("b", InferenceError::ModelNotFound),
        );
        let orchestrator = DebateOrchestrator::new(InferenceClient::new(backend), &params());
        let record = record(&["a", "b"], 2);

        orchestrator
            .run(&record, &ids(&["a", "b"]), &NoEvents)
            .await
            .unwrap();

        let session = record.snapshot().await;
        assert_eq!(session.arguments().len(), 2);
        assert!(session.arguments().iter().all(|a| a.model.as_str() == "a"));
        assert_eq!(session.phase(), DebatePhase::Completed);
    }

    #[tokio::test]
    async fn test_cancelled_debate_stops_without_summary() {
        let backend = Arc::new(ScriptedBackend::with_models(&["a", "b"]));
        let orchestrator = DebateOrchestrator::new(InferenceClient::new(backend.clone()), &params());
        let record = record(&["a", "b"], 3);
        record.cancel_token().cancel();
        let (sink, mut rx) = ChannelSink::channel();

        let phase = orchestrator
            .run(&record, &ids(&["a", "b"]), &sink)
            .await
            .unwrap();
        assert_eq!(phase, DebatePhase::Cancelled);
        assert!(record.summary().await.is_none());
        assert!(backend.prompts.lock().unwrap().is_empty());

        drop(sink);
        let mut last = None;
        while let Some(event) = rx.recv().await {
            last = Some(event);
        }
        assert!(matches!(
            last,
            Some(ForumEvent::DebateCancelled {
                completed_rounds: 0,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_round_events_carry_arguments() {
        let backend = Arc::new(ScriptedBackend::with_models(&["a", "b"]));
        let orchestrator = DebateOrchestrator::new(InferenceClient::new(backend), &params());
        let record = record(&["a", "b"], 2);
        let (sink, mut rx) = ChannelSink::channel();

        orchestrator
            .run(&record, &ids(&["a", "b"]), &sink)
            .await
            .unwrap();
        drop(sink);

        let mut rounds = Vec::new();
        while let Some(event) = rx.recv().await {
            if let ForumEvent::RoundCompleted { round, arguments } = event {
                rounds.push((round, arguments.len()));
            }
        }
        assert_eq!(rounds, vec![(1, 2), (2, 2)]);
    }
}
