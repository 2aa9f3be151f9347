#![forbid(unsafe_code)]

//! Optional LLM pass over prop-provenance violations.
//!
//! Each violation becomes one chat-completion request carrying a bounded
//! slice of the transcript. Verdicts are parsed fail-closed: anything that is
//! not a well-formed `{ "approved": bool, ... }` object counts as a rejection,
//! and so does any transport error. A batch never aborts on a single item.

pub mod adjudicator;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod prompt;
pub mod response;
pub mod truncate;
pub mod violation;

pub use adjudicator::*;
pub use client::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use prompt::*;
pub use response::*;
pub use truncate::*;
pub use violation::*;
