//! Script Engine - Evaluation core for visual-scripting node graphs
//!
//! Graphs contain two kinds of nodes:
//!
//! - **Impure** nodes have side effects and run when something fires them
//!   through an execution edge (push).
//! - **Pure** nodes compute values from their inputs and run on demand when a
//!   consumer needs one of their outputs (pull), at most once per evaluation.
//!
//! # Architecture
//!
//! - `Graph`: node arena plus data edges, execution edges and execution inputs
//! - `NodeDefinition`: shared type information and evaluation routine
//! - `DefinitionRegistry`: node types by name, built-ins collected via `inventory`
//! - `EvalContext`: single-use scheduler with an output cache and graph stack
//! - `EventSink`: optional observer of scheduling progress
//!
//! # Example
//!
//! ```ignore
//! use script_engine::{DefinitionRegistry, EvalContext, Graph};
//! use std::sync::Arc;
//!
//! let registry = DefinitionRegistry::with_builtins();
//! let mut graph = Graph::new("main");
//! let start = graph.add_root(registry.create_node("on-interact")?);
//! let print = graph.add_node(registry.create_node("print")?);
//! graph.add_execution_edge(start, 0, print)?;
//!
//! let mut ctx = EvalContext::new();
//! ctx.evaluate_graph_from_root(Arc::new(graph), start)?;
//! ```

pub mod arena;
pub mod config;
pub mod context;
pub mod definition;
pub mod error;
pub mod events;
pub mod extensions;
pub mod graph;
pub mod index;
pub mod node;
pub mod registry;
pub mod value;

// Re-export key types
pub use arena::Arena;
pub use config::EvalConfig;
pub use context::{Diagnostic, EvalContext, EvalStats};
pub use definition::{
    DefinitionFn, FieldMetadata, NodeCategory, NodeDefinition, NodeDescriptor, NodeEvaluator,
    NodeMetadata, PortKind, PortMetadata, VariadicInput,
};
pub use error::{PortDirection, Result, ScriptEngineError};
pub use events::{EvalEntry, EvalEvent, EventError, EventSink, NullEventSink, VecEventSink};
pub use extensions::{extension_keys, EvalExtensions};
pub use graph::{ExecutionInput, Graph, GraphLibrary};
pub use index::{GraphId, NodeIndex, PortIndex};
pub use node::{InputPort, Node, OutputPort};
pub use registry::DefinitionRegistry;
pub use value::{FromValue, Value, ValueType};
