//! Core types, classification, and redaction for the snare deception endpoint.

pub mod builder;
pub mod classify;
pub mod clock;
pub mod error;
pub mod events;
pub mod identity;
pub mod limits;
pub mod redact;

pub use builder::*;
pub use classify::{Classifier, ClassificationRule, RulePredicate};
pub use clock::*;
pub use error::{Error, Result};
pub use events::*;
pub use redact::{credential_digest, Credentials};
