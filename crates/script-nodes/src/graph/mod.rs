//! Graph nodes
//!
//! Nodes that evaluate other graphs on the same context.

mod call_graph;

pub use call_graph::CallGraphNode;
