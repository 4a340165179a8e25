//! Node definitions: the shared schema behind every node instance
//!
//! A [`NodeDefinition`] pairs serializable [`NodeMetadata`] (ports, fields,
//! purity, root flag) with the evaluation routine that runs when a node of
//! that type is dequeued. Definitions are immutable once built and shared
//! between nodes through `Arc`.
//!
//! Built-in node crates describe their nodes with [`NodeDescriptor`] and
//! submit a [`DefinitionFn`] so the registry can collect them at link time:
//!
//! ```ignore
//! impl NodeDescriptor for PrintNode {
//!     fn definition() -> NodeDefinition {
//!         NodeDefinition::new(metadata, PrintNode)
//!     }
//! }
//!
//! inventory::submit!(script_engine::DefinitionFn(PrintNode::definition));
//! ```

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::context::EvalContext;
use crate::error::{Result, ScriptEngineError};
use crate::value::{Value, ValueType};

/// Category of a node, used for grouping in authoring tools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    /// Entry points fired by the host
    Event,
    /// Constants and pure computations
    Value,
    /// Branching and sequencing
    Control,
    /// Side effects visible to the host
    Output,
    /// Calls into other graphs
    Graph,
}

/// What a port carries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "valueType", rename_all = "snake_case")]
pub enum PortKind {
    /// A value of the given type
    Data(ValueType),
    /// A control-flow trigger
    Execution,
}

/// Metadata for a single input or output port
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortMetadata {
    /// Port identifier
    pub id: String,
    /// Human-readable label
    pub label: String,
    /// Data or execution
    pub kind: PortKind,
}

impl PortMetadata {
    /// Create a data port
    pub fn data(id: impl Into<String>, label: impl Into<String>, value_type: ValueType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: PortKind::Data(value_type),
        }
    }

    /// Create an execution port
    pub fn execution(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: PortKind::Execution,
        }
    }

    pub fn is_execution(&self) -> bool {
        matches!(self.kind, PortKind::Execution)
    }
}

/// Template for inputs appended after the fixed inputs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariadicInput {
    /// Port shape shared by every variadic input
    pub port: PortMetadata,
    /// How many variadic inputs a new node starts with
    pub default_count: usize,
}

/// A per-node configuration value with a definition-level default
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    pub id: String,
    pub label: String,
    /// Value a freshly created node starts with
    pub default: Value,
}

impl FieldMetadata {
    pub fn new(id: impl Into<String>, label: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            default: default.into(),
        }
    }
}

/// Serializable description of a node type
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    /// Unique type identifier (e.g., "print")
    pub node_type: String,
    /// Category for grouping
    pub category: NodeCategory,
    /// Human-readable label
    pub label: String,
    /// Description of what the node does
    pub description: String,
    /// Fixed input ports
    pub inputs: Vec<PortMetadata>,
    /// Optional variadic input template
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variadic: Option<VariadicInput>,
    /// Output ports, data and execution
    pub outputs: Vec<PortMetadata>,
    /// Configuration fields
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldMetadata>,
    /// No execution ports, outputs depend only on inputs
    pub is_pure: bool,
    /// May be used as a top-level entry point
    pub is_root: bool,
}

impl NodeMetadata {
    /// Check the invariants every definition must satisfy
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| ScriptEngineError::InvalidDefinition {
            node_type: self.node_type.clone(),
            reason: reason.to_string(),
        };

        if self.node_type.is_empty() {
            return Err(invalid("node type is empty"));
        }
        if self.inputs.iter().any(PortMetadata::is_execution) {
            return Err(invalid("execution inputs are implicit and cannot be declared"));
        }
        if let Some(variadic) = &self.variadic {
            if variadic.port.is_execution() {
                return Err(invalid("variadic inputs must be data ports"));
            }
        }
        if self.is_pure {
            if self.outputs.iter().any(PortMetadata::is_execution) {
                return Err(invalid("pure nodes cannot declare execution outputs"));
            }
            if self.is_root {
                return Err(invalid("pure nodes cannot be roots"));
            }
        }
        Ok(())
    }

    /// Number of fixed inputs
    pub fn fixed_input_count(&self) -> usize {
        self.inputs.len()
    }

    /// Number of variadic inputs a new node starts with
    pub fn variadic_input_count(&self) -> usize {
        self.variadic.as_ref().map_or(0, |v| v.default_count)
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Declaration of an input, with variadic inputs following the fixed ones
    pub fn input_port(&self, index: usize) -> Option<&PortMetadata> {
        self.inputs
            .get(index)
            .or_else(|| self.variadic.as_ref().map(|v| &v.port))
    }
}

/// Evaluation routine of a node type
///
/// Runs with the node pushed on the context's call stack, so every port
/// access on `ctx` acts on behalf of that node. Closures of the right shape
/// implement this trait directly.
pub trait NodeEvaluator: Send + Sync {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()>;
}

impl<F> NodeEvaluator for F
where
    F: Fn(&mut EvalContext) -> Result<()> + Send + Sync,
{
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        self(ctx)
    }
}

/// Shared, immutable schema of a node type
#[derive(Clone)]
pub struct NodeDefinition {
    metadata: NodeMetadata,
    evaluation: Option<Arc<dyn NodeEvaluator>>,
}

impl NodeDefinition {
    /// Create a definition with an evaluation routine
    pub fn new(metadata: NodeMetadata, evaluator: impl NodeEvaluator + 'static) -> Self {
        Self {
            metadata,
            evaluation: Some(Arc::new(evaluator)),
        }
    }

    /// Create a definition without an evaluation routine
    ///
    /// Nodes of this type are reported and skipped when dequeued.
    pub fn metadata_only(metadata: NodeMetadata) -> Self {
        Self {
            metadata,
            evaluation: None,
        }
    }

    pub fn metadata(&self) -> &NodeMetadata {
        &self.metadata
    }

    pub fn node_type(&self) -> &str {
        &self.metadata.node_type
    }

    pub fn is_pure(&self) -> bool {
        self.metadata.is_pure
    }

    pub fn is_root(&self) -> bool {
        self.metadata.is_root
    }

    /// The evaluation routine, if this definition has one
    pub fn evaluation(&self) -> Option<Arc<dyn NodeEvaluator>> {
        self.evaluation.clone()
    }
}

impl fmt::Debug for NodeDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeDefinition")
            .field("metadata", &self.metadata)
            .field("has_evaluation", &self.evaluation.is_some())
            .finish()
    }
}

/// Trait for node types that can describe their own definition
///
/// The node implementation defines both its behavior and its metadata,
/// keeping a single source of truth per node type.
pub trait NodeDescriptor {
    fn definition() -> NodeDefinition
    where
        Self: Sized;
}

/// Link-time registration of a built-in definition constructor
pub struct DefinitionFn(pub fn() -> NodeDefinition);

inventory::collect!(DefinitionFn);
