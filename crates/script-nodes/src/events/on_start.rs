//! On Start Node

use script_engine::{
    EvalContext, NodeCategory, NodeDefinition, NodeDescriptor, NodeEvaluator, NodeMetadata,
    PortMetadata, Result,
};

/// Root node fired once when the host starts the script
pub struct OnStartNode;

impl OnStartNode {
    pub const OUTPUT_NEXT: usize = 0;
}

impl NodeDescriptor for OnStartNode {
    fn definition() -> NodeDefinition {
        NodeDefinition::new(
            NodeMetadata {
                node_type: "on-start".to_string(),
                category: NodeCategory::Event,
                label: "On Start".to_string(),
                description: "Fires when the script starts".to_string(),
                inputs: Vec::new(),
                variadic: None,
                outputs: vec![PortMetadata::execution("next", "Next")],
                fields: Vec::new(),
                is_pure: false,
                is_root: true,
            },
            OnStartNode,
        )
    }
}

inventory::submit!(script_engine::DefinitionFn(OnStartNode::definition));

impl NodeEvaluator for OnStartNode {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        ctx.execute_targets_of_port(Self::OUTPUT_NEXT)
    }
}
