//! Greater Than Node

use script_engine::{
    EvalContext, NodeCategory, NodeDefinition, NodeDescriptor, NodeEvaluator, NodeMetadata,
    PortMetadata, Result, ValueType,
};

/// Compares two integers
///
/// # Inputs
/// - `a` (int)
/// - `b` (int)
///
/// # Outputs
/// - `result` (bool) - `a > b`
pub struct GreaterThanNode;

impl GreaterThanNode {
    pub const INPUT_A: usize = 0;
    pub const INPUT_B: usize = 1;
    pub const OUTPUT_RESULT: usize = 0;
}

impl NodeDescriptor for GreaterThanNode {
    fn definition() -> NodeDefinition {
        NodeDefinition::new(
            NodeMetadata {
                node_type: "greater-than".to_string(),
                category: NodeCategory::Value,
                label: "Greater Than".to_string(),
                description: "True when A is greater than B".to_string(),
                inputs: vec![
                    PortMetadata::data("a", "A", ValueType::Int),
                    PortMetadata::data("b", "B", ValueType::Int),
                ],
                variadic: None,
                outputs: vec![PortMetadata::data("result", "Result", ValueType::Bool)],
                fields: Vec::new(),
                is_pure: true,
                is_root: false,
            },
            GreaterThanNode,
        )
    }
}

inventory::submit!(script_engine::DefinitionFn(GreaterThanNode::definition));

impl NodeEvaluator for GreaterThanNode {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        let a: i64 = ctx.get_input(Self::INPUT_A)?;
        let b: i64 = ctx.get_input(Self::INPUT_B)?;
        ctx.set_output(Self::OUTPUT_RESULT, a > b)
    }
}
