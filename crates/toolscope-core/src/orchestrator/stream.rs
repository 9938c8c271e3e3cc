//! Relay of the completion stream to the caller

use std::pin::Pin;

use futures::{stream, Stream, StreamExt};

use super::error::{OrchestrationError, OrchestrationResult};
use crate::completion::StreamResponse;
use crate::types::{CancellationToken, StreamChunk};

/// Response stream handed to callers of `execute_streaming`
pub type ResponseStream = Pin<Box<dyn Stream<Item = OrchestrationResult<StreamChunk>> + Send>>;

struct RelayState {
    upstream: Option<StreamResponse>,
    cancel: CancellationToken,
}

enum Step {
    Cancelled,
    Item(Option<crate::completion::CompletionResult<StreamChunk>>),
}

/// Forward `upstream` chunk by chunk, in order.
///
/// Nothing is pulled until the caller polls. Cancellation is checked before
/// every item; after a cancellation or the first error one `Err` is yielded
/// and the upstream stream is dropped.
pub fn relay(upstream: StreamResponse, cancel: CancellationToken) -> ResponseStream {
    let state = RelayState {
        upstream: Some(upstream),
        cancel,
    };

    Box::pin(stream::unfold(state, |mut state| async move {
        let step = {
            let upstream = state.upstream.as_mut()?;
            tokio::select! {
                biased;
                _ = state.cancel.cancelled() => Step::Cancelled,
                next = upstream.next() => Step::Item(next),
            }
        };

        match step {
            Step::Item(Some(Ok(chunk))) => Some((Ok(chunk), state)),
            Step::Item(None) => None,
            Step::Item(Some(Err(e))) => {
                state.upstream = None;
                Some((Err(OrchestrationError::from(e)), state))
            }
            Step::Cancelled => {
                state.upstream = None;
                Some((Err(OrchestrationError::Cancelled), state))
            }
        }
    }))
}
