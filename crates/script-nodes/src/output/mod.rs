//! Output nodes
//!
//! Nodes whose side effects are visible to the host.

mod print;

pub use print::PrintNode;
