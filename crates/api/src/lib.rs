//! Decoy HTTP surface for the snare deception endpoint.
//!
//! Every request runs through [`pipeline::capture`]: identity resolution,
//! rate limiting, classification, event recording, then one of the fixed
//! decoy responses.

pub mod decoys;
pub mod extractors;
pub mod middleware;
pub mod pipeline;
pub mod response;
pub mod routes;
pub mod state;

pub use decoys::{DecoyRoute, DecoyTable, DEFAULT_DECOY_PATHS};
pub use middleware::{RateLimitConfig, RateLimiter};
pub use response::DecoyResponse;
pub use routes::{internal_router, router};
pub use state::AppState;
