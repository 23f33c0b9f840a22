//! Decoy handler.
//!
//! Mounted on every decoy path and as the fallback. The pipeline looks the
//! path up in the decoy table itself.

use axum::extract::{Request, State};

use crate::pipeline::capture;
use crate::response::DecoyResponse;
use crate::state::AppState;

pub async fn capture_handler(State(state): State<AppState>, request: Request) -> DecoyResponse {
    capture(state, request).await
}
