//! Boolean Node

use script_engine::{
    EvalContext, FieldMetadata, NodeCategory, NodeDefinition, NodeDescriptor, NodeEvaluator,
    NodeMetadata, PortMetadata, Result, ValueType,
};

/// Outputs the boolean stored in its `value` field
pub struct BooleanNode;

impl BooleanNode {
    pub const FIELD_VALUE: usize = 0;
    pub const OUTPUT_VALUE: usize = 0;
}

impl NodeDescriptor for BooleanNode {
    fn definition() -> NodeDefinition {
        NodeDefinition::new(
            NodeMetadata {
                node_type: "boolean".to_string(),
                category: NodeCategory::Value,
                label: "Boolean".to_string(),
                description: "A constant boolean".to_string(),
                inputs: Vec::new(),
                variadic: None,
                outputs: vec![PortMetadata::data("value", "Value", ValueType::Bool)],
                fields: vec![FieldMetadata::new("value", "Value", false)],
                is_pure: true,
                is_root: false,
            },
            BooleanNode,
        )
    }
}

inventory::submit!(script_engine::DefinitionFn(BooleanNode::definition));

impl NodeEvaluator for BooleanNode {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        let value: bool = ctx.get_field(Self::FIELD_VALUE)?;
        ctx.set_output(Self::OUTPUT_VALUE, value)
    }
}
