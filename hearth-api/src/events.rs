use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures_util::{Stream, StreamExt};
use std::convert::Infallible;
use tokio_stream::wrappers::BroadcastStream;

use crate::state::AppState;

/// GET /v1/events
/// Server-sent stream of transition events for the notification
/// collaborator. Lagged subscribers drop events rather than block commits.
pub async fn transition_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.events.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(event) => match Event::default().event("transition").json_data(&event) {
                Ok(sse_event) => Some(Ok(sse_event)),
                Err(err) => {
                    tracing::error!("failed to serialize transition event: {}", err);
                    None
                }
            },
            // Receiver lagged behind the channel capacity; skip and continue
            Err(_) => None,
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/events", get(transition_events))
}
