//! Event nodes
//!
//! Root nodes the host fires to start an evaluation.

mod on_interact;
mod on_start;

pub use on_interact::OnInteractNode;
pub use on_start::OnStartNode;
