#![forbid(unsafe_code)]

//! Shared model for the component-schema validator.
//!
//! Everything here is plain data: parsed interface declarations, the
//! `componentsSchema` definitions of a conversation document, the transcript
//! itself, and the result types every check produces.

pub mod conversation;
pub mod error;
pub mod model;
pub mod report;
pub mod schema;

pub use conversation::*;
pub use error::*;
pub use model::*;
pub use report::*;
pub use schema::*;
