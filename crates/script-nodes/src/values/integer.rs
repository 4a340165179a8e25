//! Integer Node
//!
//! Outputs the integer stored in its `value` field.

use script_engine::{
    EvalContext, FieldMetadata, NodeCategory, NodeDefinition, NodeDescriptor, NodeEvaluator,
    NodeMetadata, PortMetadata, Result, ValueType,
};

/// Integer Node
///
/// # Fields
/// - `value` (int, default 0)
///
/// # Outputs
/// - `value` (int) - The field value
pub struct IntegerNode;

impl IntegerNode {
    /// Field index of `value`
    pub const FIELD_VALUE: usize = 0;
    /// Output index of `value`
    pub const OUTPUT_VALUE: usize = 0;
}

impl NodeDescriptor for IntegerNode {
    fn definition() -> NodeDefinition {
        NodeDefinition::new(
            NodeMetadata {
                node_type: "integer".to_string(),
                category: NodeCategory::Value,
                label: "Integer".to_string(),
                description: "A constant integer".to_string(),
                inputs: Vec::new(),
                variadic: None,
                outputs: vec![PortMetadata::data("value", "Value", ValueType::Int)],
                fields: vec![FieldMetadata::new("value", "Value", 0i64)],
                is_pure: true,
                is_root: false,
            },
            IntegerNode,
        )
    }
}

inventory::submit!(script_engine::DefinitionFn(IntegerNode::definition));

impl NodeEvaluator for IntegerNode {
    fn evaluate(&self, ctx: &mut EvalContext) -> Result<()> {
        let value: i64 = ctx.get_field(Self::FIELD_VALUE)?;
        ctx.set_output(Self::OUTPUT_VALUE, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use script_engine::Value;

    #[test]
    fn test_descriptor() {
        let def = IntegerNode::definition();
        assert_eq!(def.node_type(), "integer");
        assert!(def.is_pure());
        assert!(!def.is_root());
        assert_eq!(def.metadata().fields[IntegerNode::FIELD_VALUE].default, Value::Int(0));
        assert_eq!(
            def.metadata().outputs[IntegerNode::OUTPUT_VALUE].kind,
            script_engine::PortKind::Data(ValueType::Int)
        );
    }
}
