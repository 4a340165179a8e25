//! Sequence Node

use script_engine::{
    EvalContext, NodeCategory, NodeDefinition, NodeDescriptor, NodeEvaluator, NodeMetadata,
    PortMetadata, Result,
};

/// Fires `first` and then `second`
///
/// Both outputs are queued during the same evaluation, so every target of
/// `first` is dequeued before any target of `second`. Work queued later by
/// `first`'s targets runs after `second`'s targets.
pub struct SequenceNode;

impl SequenceNode {
    pub const OUTPUT_FIRST: usize = 0;
    pub const OUTPUT_SECOND: usize = 1;
}

impl NodeDescriptor for SequenceNode {
    fn definition() -> NodeDefinition {
        NodeDefinition::new(
            NodeMetadata {
                node_type: "sequence".to_string(),
                category: NodeCategory::Control,
                label: "Sequence".to_string(),
                description: "Fires First, then Second".to_string(),
                inputs: Vec::new(),
                variadic: None,
                outputs: vec![
                    PortMetadata::execution("first", "First"),
                    PortMetadata::execution("second", "Second"),
                ],
                fields: Vec::new(),
                is_pure: false,
                is_root: false,
            },
            SequenceNode,
        )
    }
}

inventory::submit!(script_engine::DefinitionFn(SequenceNode::definition));

impl NodeEvaluator for SequenceNode {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        ctx.execute_targets_of_port(Self::OUTPUT_FIRST)?;
        ctx.execute_targets_of_port(Self::OUTPUT_SECOND)
    }
}
