//! Branch Node
//!
//! Routes execution based on a boolean condition.
//! This node enables branching in script graphs by firing exactly one of
//! its two execution outputs.

use script_engine::{
    EvalContext, NodeCategory, NodeDefinition, NodeDescriptor, NodeEvaluator, NodeMetadata,
    PortMetadata, Result, ValueType,
};

/// Branch Node
///
/// When the condition is true, `then` fires. When it is false, `else` fires.
///
/// # Inputs
/// - `condition` (bool, required) - Usually wired to a pure comparison
///
/// # Outputs
/// - `then` (execution) - Fired when the condition is true
/// - `else` (execution) - Fired when the condition is false
pub struct BranchNode;

impl BranchNode {
    /// Input index of `condition`
    pub const INPUT_CONDITION: usize = 0;
    /// Output index of `then`
    pub const OUTPUT_THEN: usize = 0;
    /// Output index of `else`
    pub const OUTPUT_ELSE: usize = 1;
}

impl NodeDescriptor for BranchNode {
    fn definition() -> NodeDefinition {
        NodeDefinition::new(
            NodeMetadata {
                node_type: "branch".to_string(),
                category: NodeCategory::Control,
                label: "Branch".to_string(),
                description: "Fires Then or Else based on a condition".to_string(),
                inputs: vec![PortMetadata::data("condition", "Condition", ValueType::Bool)],
                variadic: None,
                outputs: vec![
                    PortMetadata::execution("then", "Then"),
                    PortMetadata::execution("else", "Else"),
                ],
                fields: Vec::new(),
                is_pure: false,
                is_root: false,
            },
            BranchNode,
        )
    }
}

inventory::submit!(script_engine::DefinitionFn(BranchNode::definition));

impl NodeEvaluator for BranchNode {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        let condition: bool = ctx.get_input(Self::INPUT_CONDITION)?;
        log::debug!(
            "Branch {:?}: condition={}, routing execution",
            ctx.active_node()?,
            condition
        );

        if condition {
            ctx.execute_targets_of_port(Self::OUTPUT_THEN)
        } else {
            ctx.execute_targets_of_port(Self::OUTPUT_ELSE)
        }
    }
}
