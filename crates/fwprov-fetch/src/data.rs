mod artifact;
mod options;
mod progress;
mod source;

pub use artifact::{Artifact, Payload};
pub use options::{FetchOptions, FetchPhase};
pub use progress::Progress;
pub use source::{Release, Source};
