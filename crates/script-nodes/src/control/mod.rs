//! Control nodes
//!
//! Impure nodes that choose which execution outputs fire.

mod branch;
mod sequence;

pub use branch::BranchNode;
pub use sequence::SequenceNode;
