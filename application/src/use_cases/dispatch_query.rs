//! Dispatch query use case
//!
//! Sends one prompt to many models, running at most `concurrency` of them at
//! a time. Models are processed in consecutive batches: a batch starts only
//! after every model of the previous batch has finished.

use super::inference_client::InferenceClient;
use crate::ports::event_sink::{EventSink, ForumEvent};
use futures::future::join_all;
use palaver_domain::{InferenceError, ModelResult, QueryRequest};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

pub struct DispatchQueryUseCase {
    client: InferenceClient,
}

impl DispatchQueryUseCase {
    pub fn new(client: InferenceClient) -> Self {
        Self { client }
    }

    /// Run the request and return one result per model, in request order.
    ///
    /// Cancellation is checked before each batch. Models whose batch never
    /// started are reported as [`InferenceError::Cancelled`] failures so the
    /// result list always matches the request.
    pub async fn execute(
        &self,
        request: &QueryRequest,
        sink: Option<&dyn EventSink>,
        cancel: &CancellationToken,
    ) -> Vec<ModelResult> {
        let concurrency = request.concurrency();
        info!(
            "Dispatching to {} models (concurrency {})",
            request.models().len(),
            concurrency
        );
        emit(
            sink,
            ForumEvent::QueryStarted {
                models: request.models().to_vec(),
                concurrency,
                stream: request.is_streaming(),
            },
        );

        let mut results = Vec::with_capacity(request.models().len());
        for (index, batch) in request.models().chunks(concurrency).enumerate() {
            if cancel.is_cancelled() {
                debug!("Query cancelled before batch {}", index);
                for model in batch {
                    let result = ModelResult::failure(model.clone(), InferenceError::Cancelled, 0.0);
                    emit(sink, ForumEvent::ModelFinished(result.clone()));
                    results.push(result);
                }
                continue;
            }

            emit(
                sink,
                ForumEvent::BatchStarted {
                    index,
                    models: batch.to_vec(),
                },
            );
            let calls = batch.iter().map(|model| {
                self.client
                    .query_with(model, request.prompt(), request.is_streaming(), sink)
            });
            for result in join_all(calls).await {
                emit(sink, ForumEvent::ModelFinished(result.clone()));
                results.push(result);
            }
        }

        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let failed = results.len() - succeeded;
        info!("Query finished: {} succeeded, {} failed", succeeded, failed);
        emit(sink, ForumEvent::QueryCompleted { succeeded, failed });
        results
    }
}

fn emit(sink: Option<&dyn EventSink>, event: ForumEvent) {
    if let Some(sink) = sink {
        sink.emit(event);
    }
}
