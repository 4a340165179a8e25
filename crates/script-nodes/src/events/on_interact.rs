//! On Interact Node
//!
//! Entry point fired when the user interacts with the scripted object.

use script_engine::{
    EvalContext, NodeCategory, NodeDefinition, NodeDescriptor, NodeEvaluator, NodeMetadata,
    PortMetadata, Result,
};

/// On Interact Node
///
/// Root node with no inputs. Evaluating it fires `next`.
///
/// # Outputs
/// - `next` (execution) - Fired once per evaluation
pub struct OnInteractNode;

impl OnInteractNode {
    /// Output index of the `next` execution port
    pub const OUTPUT_NEXT: usize = 0;
}

impl NodeDescriptor for OnInteractNode {
    fn definition() -> NodeDefinition {
        NodeDefinition::new(
            NodeMetadata {
                node_type: "on-interact".to_string(),
                category: NodeCategory::Event,
                label: "On Interact".to_string(),
                description: "Fires when the object is interacted with".to_string(),
                inputs: Vec::new(),
                variadic: None,
                outputs: vec![PortMetadata::execution("next", "Next")],
                fields: Vec::new(),
                is_pure: false,
                is_root: true,
            },
            OnInteractNode,
        )
    }
}

inventory::submit!(script_engine::DefinitionFn(OnInteractNode::definition));

impl NodeEvaluator for OnInteractNode {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        log::debug!("OnInteract {:?}: firing next", ctx.active_node()?);
        ctx.execute_targets_of_port(Self::OUTPUT_NEXT)
    }
}
