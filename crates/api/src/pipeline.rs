//! Capture pipeline.
//!
//! RECEIVED -> (THROTTLED | CLASSIFIED) -> LOGGED -> RESPONDED.
//! Throttled requests skip body reading and classification. Every path
//! ends in one of the fixed [`DecoyResponse`] shapes.

use axum::{body::Body, extract::Request};
use event_sink::EventSink;
use snare_core::{identity, limits::MAX_BODY_BYTES, Event, EventBuilder, InboundRequest, Outcome};
use std::time::Instant;
use telemetry::metrics;
use tracing::{debug, error, info, warn};

use crate::extractors::{inbound_head, peer_addr, read_capped};
use crate::response::DecoyResponse;
use crate::state::AppState;

/// Run one request through the pipeline.
///
/// Admission is decided inline; everything after it runs on its own task,
/// so a client that disconnects mid-body cannot drop the request before its
/// event is written. Decoy versus not-found is decided from the path against
/// the decoy table.
pub async fn capture(state: AppState, request: Request) -> DecoyResponse {
    let start = Instant::now();
    metrics().requests_received.inc();

    let (parts, body) = request.into_parts();
    let inbound = inbound_head(&parts);
    let forwarded_for = if state.trust_forwarded_for {
        inbound.forwarded_for.as_deref()
    } else {
        None
    };
    let identity = identity::resolve(forwarded_for, peer_addr(&parts));
    let admitted = state.rate_limiter.admit(&identity, state.clock.now());

    let handle = tokio::spawn(async move {
        let response = if admitted {
            capture_admitted(&state, inbound, body, &identity).await
        } else {
            capture_throttled(&state, &inbound, &identity).await
        };
        metrics()
            .capture_latency_ms
            .observe(start.elapsed().as_millis() as u64);
        response
    });

    match handle.await {
        Ok(response) => response,
        Err(e) => {
            error!(error = %e, "Capture task failed");
            DecoyResponse::NotFound
        }
    }
}

async fn capture_throttled(state: &AppState, inbound: &InboundRequest, identity: &str) -> DecoyResponse {
    metrics().requests_throttled.inc();
    warn!(identity = %identity, path = %inbound.path, "Request throttled");

    let event = EventBuilder::throttled(inbound, identity, state.clock.as_ref());
    record(state.sink.as_ref(), &event).await;
    DecoyResponse::TooManyRequests
}

async fn capture_admitted(
    state: &AppState,
    mut inbound: InboundRequest,
    body: Body,
    identity: &str,
) -> DecoyResponse {
    inbound.body = read_capped(body, MAX_BODY_BYTES).await;

    let classification = state.classifier.classify(
        &inbound.method,
        &inbound.path_text(),
        &inbound.query_text(),
        &inbound.body_text(),
    );
    metrics()
        .classification_counter(classification.as_str())
        .inc();

    let route = state.decoys.lookup(&inbound.path);
    let outcome = if route.is_some() {
        metrics().requests_served.inc();
        Outcome::Served
    } else {
        metrics().requests_not_found.inc();
        Outcome::NotFound
    };

    let event = EventBuilder::build(
        &inbound,
        identity,
        classification,
        outcome,
        state.clock.as_ref(),
    );
    if event.has_credentials() {
        metrics().credential_submissions.inc();
    }

    info!(
        identity = %identity,
        method = %inbound.method,
        path = %inbound.path,
        classification = %classification,
        outcome = %outcome,
        "Request captured"
    );

    record(state.sink.as_ref(), &event).await;
    DecoyResponse::for_outcome(outcome, &inbound.method, route)
}

/// Append the event. Failures are logged and never reach the client.
async fn record(sink: &dyn EventSink, event: &Event) {
    match sink.write(event).await {
        Ok(()) => debug!(event_id = %event.event_id, "Event recorded"),
        Err(e) => error!(event_id = %event.event_id, error = %e, "Failed to record event"),
    }
}
