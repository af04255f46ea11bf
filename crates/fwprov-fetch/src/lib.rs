//! Resolve firmware artifacts into memory.
//!
//! # Architecture
//!
//! - [`data`] - Artifacts, sources, release identifiers and progress types
//! - [`core`] - Pure transformations (source classification, release URLs)
//! - [`effects`] - I/O: the HTTP client seam and the resolver
//!
//! Every artifact ends up as an owned [`Payload`]; nothing touches the
//! destination until the caller decides to write it.

mod core;
mod data;
mod effects;
mod error;

pub use core::{is_remote, release_url};
pub use data::{Artifact, FetchOptions, FetchPhase, Payload, Progress, Release, Source};
pub use effects::{BoxStream, HttpClient, HttpResponse, Resolver};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{FetchError, Result};
