//! Error types for the script engine

use std::fmt;

use thiserror::Error;

use crate::index::NodeIndex;
use crate::value::ValueType;

/// Result type alias using ScriptEngineError
pub type Result<T> = std::result::Result<T, ScriptEngineError>;

/// Which side of a node a port ordinal refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
    Field,
}

impl fmt::Display for PortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Input => write!(f, "input"),
            Self::Output => write!(f, "output"),
            Self::Field => write!(f, "field"),
        }
    }
}

/// Errors that can occur while building or evaluating a graph
#[derive(Debug, Error)]
pub enum ScriptEngineError {
    /// A port or field was read as the wrong type
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: ValueType,
    },

    /// An impure node was referenced as an unevaluated data dependency
    #[error("Invalid data flow: node {node:?} depends on unevaluated impure node {upstream:?}")]
    InvalidDataFlow { node: NodeIndex, upstream: NodeIndex },

    /// Pure data dependencies form a cycle through this node
    #[error("Cyclic data dependency through node {node:?}")]
    CyclicDependency { node: NodeIndex },

    /// A pure dependency was dropped earlier in this evaluation
    #[error("Node {node:?} depends on dropped node {upstream:?}")]
    UpstreamDropped { node: NodeIndex, upstream: NodeIndex },

    /// A wired output has no cached value
    #[error("Node {upstream:?} produced no value on output {port}")]
    MissingOutput { upstream: NodeIndex, port: usize },

    /// The node's definition carries no evaluation routine
    #[error("No evaluation routine for node type '{0}'")]
    MissingEvaluation(String),

    /// Root evaluation requested on a node that is not a root
    #[error("Node type '{0}' is not a root")]
    NotRoot(String),

    /// Requested execution input does not exist on the graph
    #[error("Execution input {index} out of range (graph declares {count})")]
    ExecutionInputOutOfRange { index: usize, count: usize },

    /// Handle does not belong to this graph
    #[error("Node {0:?} not found")]
    NodeNotFound(NodeIndex),

    /// Port ordinal is outside the definition's declared counts
    #[error("{direction} {port} out of range for node type '{node_type}' ({count} declared)")]
    PortOutOfRange {
        node_type: String,
        direction: PortDirection,
        port: usize,
        count: usize,
    },

    /// Input has neither a data edge nor a constant
    #[error("Input {port} of node {node:?} has neither a data edge nor a constant")]
    UnboundInput { node: NodeIndex, port: usize },

    /// Input already has an upstream producer
    #[error("Input {port} of node {node:?} is already connected")]
    InputAlreadyConnected { node: NodeIndex, port: usize },

    /// Port kind does not fit the requested edge
    #[error("Output {port} of node type '{node_type}' is not {expected} port")]
    PortKindMismatch {
        node_type: String,
        port: usize,
        expected: &'static str,
    },

    /// Pure nodes never take part in execution edges
    #[error("Pure node type '{0}' cannot take part in execution edges")]
    PureExecutionEdge(String),

    /// Definition metadata is inconsistent
    #[error("Invalid node definition '{node_type}': {reason}")]
    InvalidDefinition { node_type: String, reason: String },

    /// Node type not present in the registry
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// Named graph not present in the library
    #[error("Unknown graph: {0}")]
    UnknownGraph(String),

    /// Port access outside a running node body
    #[error("No active node")]
    NoActiveNode,

    /// Queue or lookup outside an active evaluation
    #[error("No active graph")]
    NoActiveGraph,

    /// The configured step budget ran out
    #[error("Evaluation exceeded step limit of {0}")]
    StepLimitExceeded(usize),

    /// Nested evaluation went too deep
    #[error("Graph nesting exceeded depth limit of {0}")]
    GraphDepthExceeded(usize),

    /// A node body failed
    #[error("Node evaluation failed: {0}")]
    EvaluationFailed(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ScriptEngineError {
    /// Create an evaluation failed error with a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Self::EvaluationFailed(msg.into())
    }

    /// Whether the error describes a broken data dependency
    pub fn is_data_flow(&self) -> bool {
        matches!(
            self,
            Self::InvalidDataFlow { .. }
                | Self::CyclicDependency { .. }
                | Self::UpstreamDropped { .. }
                | Self::MissingOutput { .. }
        )
    }
}
