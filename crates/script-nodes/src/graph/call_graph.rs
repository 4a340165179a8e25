//! Call Graph Node
//!
//! Runs another graph through one of its execution inputs, then continues.

use std::sync::Arc;

use script_engine::{
    extension_keys, EvalContext, FieldMetadata, GraphLibrary, NodeCategory, NodeDefinition,
    NodeDescriptor, NodeEvaluator, NodeMetadata, PortMetadata, Result, ScriptEngineError,
};

/// Call Graph Node
///
/// Looks up the graph named by the `graph` field in the [`GraphLibrary`]
/// extension and evaluates it on the same context, entering through the
/// execution input numbered by `entry`. The nested evaluation completes
/// before `next` fires.
///
/// # Fields
/// - `graph` (string) - Name of the graph in the library
/// - `entry` (int, default 0) - Execution input ordinal of the called graph
///
/// # Outputs
/// - `next` (execution) - Fired after the called graph finishes
pub struct CallGraphNode;

impl CallGraphNode {
    /// Field index of `graph`
    pub const FIELD_GRAPH: usize = 0;
    /// Field index of `entry`
    pub const FIELD_ENTRY: usize = 1;
    /// Output index of `next`
    pub const OUTPUT_NEXT: usize = 0;
}

impl NodeDescriptor for CallGraphNode {
    fn definition() -> NodeDefinition {
        NodeDefinition::new(
            NodeMetadata {
                node_type: "call-graph".to_string(),
                category: NodeCategory::Graph,
                label: "Call Graph".to_string(),
                description: "Evaluates another graph, then continues".to_string(),
                inputs: Vec::new(),
                variadic: None,
                outputs: vec![PortMetadata::execution("next", "Next")],
                fields: vec![
                    FieldMetadata::new("graph", "Graph", ""),
                    FieldMetadata::new("entry", "Entry", 0i64),
                ],
                is_pure: false,
                is_root: false,
            },
            CallGraphNode,
        )
    }
}

inventory::submit!(script_engine::DefinitionFn(CallGraphNode::definition));

impl NodeEvaluator for CallGraphNode {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        let name: String = ctx.get_field(Self::FIELD_GRAPH)?;
        let entry: i64 = ctx.get_field(Self::FIELD_ENTRY)?;
        let entry = usize::try_from(entry).map_err(|_| {
            ScriptEngineError::failed(format!("execution input {} is negative", entry))
        })?;

        let library = ctx
            .extensions()
            .get::<Arc<GraphLibrary>>(extension_keys::GRAPH_LIBRARY)
            .cloned()
            .ok_or_else(|| ScriptEngineError::failed("no graph library installed"))?;
        let graph = library.get(&name)?;

        log::debug!(
            "CallGraph {:?}: entering '{}' at execution input {}",
            ctx.active_node()?,
            name,
            entry
        );
        ctx.evaluate_graph(graph, entry)?;
        ctx.execute_targets_of_port(Self::OUTPUT_NEXT)
    }
}
